use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use nyushi_scout::config::Config;
use nyushi_scout::generator::agents::prompts::{NOT_FOUND_MESSAGE, SCHOOL_NOT_FOUND};
use nyushi_scout::generator::agents::{AgentDescriptor, AgentRole};
use nyushi_scout::generator::context::GeneratorContext;
use nyushi_scout::generator::outlet::{DiskOutlet, Outlet};
use nyushi_scout::generator::runner;
use nyushi_scout::generator::runtime::AgentRuntime;
use nyushi_scout::generator::types::{Outcome, ResearchRequest};
use nyushi_scout::i18n::ReportLanguage;
use nyushi_scout::launch;
use nyushi_scout::ui::controller::{StartOutcome, UiController};
use nyushi_scout::ui::session::SessionState;

/// 模拟外部agent运行时：按角色返回固定文本并记录调用
struct FakeRuntime {
    known_school: String,
    failing: Option<AgentRole>,
    calls: Mutex<Vec<(AgentRole, String)>>,
}

impl FakeRuntime {
    fn new(known_school: &str) -> Self {
        Self {
            known_school: known_school.to_string(),
            failing: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing_at(mut self, role: AgentRole) -> Self {
        self.failing = Some(role);
        self
    }

    fn roles(&self) -> Vec<AgentRole> {
        self.calls.lock().unwrap().iter().map(|(r, _)| *r).collect()
    }

    fn input_of(&self, role: AgentRole) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, input)| input.clone())
    }
}

#[async_trait]
impl AgentRuntime for FakeRuntime {
    async fn run_agent(&self, agent: &AgentDescriptor, input: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((agent.role, input.to_string()));

        if self.failing == Some(agent.role) {
            bail!("upstream 503");
        }

        Ok(match agent.role {
            AgentRole::SchoolExistenceChecker => {
                if input.contains(&self.known_school) {
                    self.known_school.clone()
                } else {
                    SCHOOL_NOT_FOUND.to_string()
                }
            }
            AgentRole::FactChecker => format!("VERIFIED\n{}", input.len()),
            AgentRole::Writer => format!("# {} 入試情報\n\n- 一般入試\n", self.known_school),
            researcher => format!("{} の調査結果", researcher),
        })
    }
}

fn context_in(dir: &TempDir, runtime: Arc<FakeRuntime>) -> GeneratorContext {
    let config = Config {
        output_path: dir.path().join("reports"),
        ..Default::default()
    };
    GeneratorContext::with_runtime(config, runtime)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
}

#[tokio::test]
async fn test_full_research_and_export() {
    let temp_dir = TempDir::new().unwrap();
    let runtime = Arc::new(FakeRuntime::new("開成高等学校"));
    let context = context_in(&temp_dir, runtime.clone());

    let result = runner::run(&context, ResearchRequest::new("開成高等学校", "2026年度"))
        .await
        .unwrap();

    assert_eq!(result.outcome, Outcome::Report);
    assert!(result.final_output.starts_with("# 開成高等学校 入試情報"));

    let roles = runtime.roles();
    assert_eq!(roles.len(), 8);
    assert_eq!(roles.first(), Some(&AgentRole::SchoolExistenceChecker));
    assert_eq!(roles.last(), Some(&AgentRole::Writer));

    let writer_input = runtime.input_of(AgentRole::Writer).unwrap();
    assert!(writer_input.starts_with("VERIFIED"));

    let saved = DiskOutlet::new(&ReportLanguage::English)
        .save(&context, &result)
        .await
        .unwrap();
    assert_eq!(saved.len(), 3);
    let findings = fs::read_to_string(temp_dir.path().join("reports/findings.md")).unwrap();
    assert!(findings.contains("FutureTrendsResearcher の調査結果"));
}

#[tokio::test]
async fn test_unknown_school_stops_after_existence_check() {
    let temp_dir = TempDir::new().unwrap();
    let runtime = Arc::new(FakeRuntime::new("開成高等学校"));
    let context = context_in(&temp_dir, runtime.clone());

    let result = runner::run(&context, ResearchRequest::new("存在しない学園", "2026年度"))
        .await
        .unwrap();

    assert_eq!(result.final_output, NOT_FOUND_MESSAGE);
    assert_eq!(runtime.roles(), vec![AgentRole::SchoolExistenceChecker]);
}

#[tokio::test]
async fn test_session_start_and_reset() {
    let temp_dir = TempDir::new().unwrap();
    let runtime = Arc::new(FakeRuntime::new("灘高等学校"));
    let context = context_in(&temp_dir, runtime.clone());
    let controller = UiController::new(&context);
    let mut state = SessionState::new(today());

    let outcome = controller.start(&mut state, today()).await;
    assert!(matches!(outcome, StartOutcome::Rejected(_)));
    assert!(runtime.roles().is_empty());

    state.set_school("灘高等学校").unwrap();
    state.set_manual_year(2030).unwrap();
    let outcome = controller.start(&mut state, today()).await;
    assert!(matches!(outcome, StartOutcome::Completed(_)));
    assert!(state.result_text.contains("灘高等学校"));
    assert!(
        runtime
            .input_of(AgentRole::OfficialInfoResearcher)
            .unwrap()
            .contains("2030年度")
    );
    assert!(!state.is_running);

    state.reset(today()).unwrap();
    assert_eq!(state, SessionState::new(today()));
    assert_eq!(state.manual_year, 2026);
}

#[tokio::test]
async fn test_session_failure_sets_error_marker() {
    let temp_dir = TempDir::new().unwrap();
    let runtime =
        Arc::new(FakeRuntime::new("開成高等学校").failing_at(AgentRole::TranscriptScoreResearcher));
    let context = context_in(&temp_dir, runtime.clone());
    let mut state = SessionState::new(today());
    state.set_school("開成高等学校").unwrap();

    let outcome = UiController::new(&context).start(&mut state, today()).await;

    assert!(matches!(outcome, StartOutcome::Failed(_)));
    assert!(state.result_text.starts_with("エラーが発生しました"));
    assert!(state.result_text.contains("upstream 503"));
    assert!(!runtime.roles().contains(&AgentRole::Writer));
    assert!(!state.is_running);
}

#[tokio::test]
async fn test_dry_run_launch() {
    let config = Config {
        school: Some("開成高等学校".to_string()),
        dry_run: true,
        ..Default::default()
    };

    assert!(launch(&config).await.is_ok());
}

#[test]
fn test_config_defaults() {
    let config = Config::default();

    assert_eq!(config.output_path, std::path::PathBuf::from("./nyushi.reports"));
    assert_eq!(config.target_language, ReportLanguage::Japanese);
    assert!(config.school_name().is_none());
    assert!(config.llm.max_parallels >= 1);
}
