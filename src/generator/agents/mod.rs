//! agent定义
//!
//! 提供带有指令与能力（Web检索）的 [`AgentDescriptor`]，
//! 以及协调者可委派的全部agent对照表 [`Roster`]。
//! 每次调查都根据学校名与年度标签重新构建。

use std::collections::BTreeMap;
use std::fmt::Display;

use crate::config::ModelTier;
use crate::i18n::ReportLanguage;

pub mod prompts;

/// agent角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AgentRole {
    SchoolExistenceChecker,
    OfficialInfoResearcher,
    DetailedExamInfoResearcher,
    TranscriptScoreResearcher,
    DeviationScoreResearcher,
    FutureTrendsResearcher,
    FactChecker,
    Writer,
    Coordinator,
}

impl Display for AgentRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AgentRole::SchoolExistenceChecker => "SchoolExistenceChecker",
            AgentRole::OfficialInfoResearcher => "OfficialInfoResearcher",
            AgentRole::DetailedExamInfoResearcher => "DetailedExamInfoResearcher",
            AgentRole::TranscriptScoreResearcher => "TranscriptScoreResearcher",
            AgentRole::DeviationScoreResearcher => "DeviationScoreResearcher",
            AgentRole::FutureTrendsResearcher => "FutureTrendsResearcher",
            AgentRole::FactChecker => "FactCheckerAgent",
            AgentRole::Writer => "WriterAgent",
            AgentRole::Coordinator => "CoordinatorAgent",
        };
        write!(f, "{}", name)
    }
}

impl AgentRole {
    /// 调研阶段并行执行的5个调研agent（编组顺序）
    pub const RESEARCHERS: [AgentRole; 5] = [
        AgentRole::OfficialInfoResearcher,
        AgentRole::DetailedExamInfoResearcher,
        AgentRole::TranscriptScoreResearcher,
        AgentRole::DeviationScoreResearcher,
        AgentRole::FutureTrendsResearcher,
    ];

    /// 协调者的委派对象
    pub const HANDOFF_TARGETS: [AgentRole; 8] = [
        AgentRole::SchoolExistenceChecker,
        AgentRole::OfficialInfoResearcher,
        AgentRole::DetailedExamInfoResearcher,
        AgentRole::TranscriptScoreResearcher,
        AgentRole::DeviationScoreResearcher,
        AgentRole::FutureTrendsResearcher,
        AgentRole::FactChecker,
        AgentRole::Writer,
    ];

    /// 用于报告与汇总文本标题的名称
    pub fn display_name(&self) -> &'static str {
        match self {
            AgentRole::SchoolExistenceChecker => "学校の存在確認",
            AgentRole::OfficialInfoResearcher => "入試要綱・日程（公式情報）",
            AgentRole::DetailedExamInfoResearcher => "試験の詳細（科目・時間・配点）",
            AgentRole::TranscriptScoreResearcher => "内申点の要否・評価方法",
            AgentRole::DeviationScoreResearcher => "偏差値",
            AgentRole::FutureTrendsResearcher => "今後の動向・変更点",
            AgentRole::FactChecker => "ファクトチェック",
            AgentRole::Writer => "最終レポート",
            AgentRole::Coordinator => "コーディネーター",
        }
    }

    pub fn is_researcher(&self) -> bool {
        Self::RESEARCHERS.contains(self)
    }

    /// 存在确认与5个调研agent带有Web检索
    pub fn uses_web_search(&self) -> bool {
        matches!(self, AgentRole::SchoolExistenceChecker) || self.is_researcher()
    }

    pub fn model_tier(&self) -> ModelTier {
        match self {
            AgentRole::FactChecker | AgentRole::Writer | AgentRole::Coordinator => {
                ModelTier::Powerful
            }
            _ => ModelTier::Efficient,
        }
    }
}

/// 可赋予agent的能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    WebSearch,
}

/// 单个agent的定义
#[derive(Debug, Clone, PartialEq)]
pub struct AgentDescriptor {
    pub role: AgentRole,
    pub name: String,
    pub instructions: String,
    pub capabilities: Vec<Capability>,
}

impl AgentDescriptor {
    pub fn new(role: AgentRole, instructions: String) -> Self {
        let capabilities = if role.uses_web_search() {
            vec![Capability::WebSearch]
        } else {
            vec![]
        };
        Self {
            role,
            name: role.to_string(),
            instructions,
            capabilities,
        }
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn model_tier(&self) -> ModelTier {
        self.role.model_tier()
    }
}

/// 一次调查所用的全部agent
///
/// 包含协调者，以及按角色查找定义的委派表。
#[derive(Debug, Clone)]
pub struct Roster {
    coordinator: AgentDescriptor,
    handoffs: BTreeMap<AgentRole, AgentDescriptor>,
}

impl Roster {
    /// 根据学校名与年度标签构建全部agent
    pub fn build(school: &str, year_label: &str, language: &ReportLanguage) -> Self {
        let handoffs = AgentRole::HANDOFF_TARGETS
            .iter()
            .map(|role| {
                let instructions = prompts::instructions_for(*role, school, year_label, language);
                (*role, AgentDescriptor::new(*role, instructions))
            })
            .collect();

        let coordinator = AgentDescriptor::new(
            AgentRole::Coordinator,
            prompts::instructions_for(AgentRole::Coordinator, school, year_label, language),
        );

        Self {
            coordinator,
            handoffs,
        }
    }

    pub fn coordinator(&self) -> &AgentDescriptor {
        &self.coordinator
    }

    /// 按角色查找委派对象，不包含协调者本身
    pub fn handoff(&self, role: AgentRole) -> Option<&AgentDescriptor> {
        self.handoffs.get(&role)
    }

    pub fn handoffs(&self) -> impl Iterator<Item = &AgentDescriptor> {
        AgentRole::HANDOFF_TARGETS
            .into_iter()
            .filter_map(move |role| self.handoffs.get(&role))
    }

    /// 以Markdown输出编组与协调者计划（dry-run用）
    pub fn describe(&self) -> String {
        let mut content = String::new();
        content.push_str(&format!("# {}\n\n", self.coordinator.name));
        content.push_str(&self.coordinator.instructions);
        content.push_str("\n\n");

        for agent in self.handoffs() {
            let tools = if agent.has_capability(Capability::WebSearch) {
                "web_search"
            } else {
                "-"
            };
            content.push_str(&format!(
                "## {} ({})\n- tools: {}\n\n{}\n\n",
                agent.name,
                agent.role.display_name(),
                tools,
                agent.instructions
            ));
        }
        content
    }
}
