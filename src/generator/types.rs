use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::generator::workflow::TimingScope;

/// 调查请求（学校名与已解析的年度标签）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub school: String,
    pub year_label: String,
}

impl ResearchRequest {
    pub fn new(school: impl Into<String>, year_label: impl Into<String>) -> Self {
        Self {
            school: school.into().trim().to_string(),
            year_label: year_label.into().trim().to_string(),
        }
    }
}

/// 调查的终止状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// WriterAgent的报告
    Report,
    /// 存在确认未找到学校
    NotFound,
}

/// 一次调查的结果
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run_id: Uuid,
    pub final_output: String,
    pub outcome: Outcome,
    pub timing: TimingScope,
}

impl RunResult {
    pub fn is_not_found(&self) -> bool {
        self.outcome == Outcome::NotFound
    }
}
