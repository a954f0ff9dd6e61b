//! 調査開始ボタンの処理

use chrono::NaiveDate;
use tracing::warn;

use crate::error::ScoutError;
use crate::generator::context::GeneratorContext;
use crate::generator::runner;
use crate::generator::types::{ResearchRequest, RunResult};
use crate::ui::session::SessionState;

pub const WARN_EMPTY_SCHOOL: &str = "学校名を入力してください。";
pub const WARN_EMPTY_YEAR: &str = "年度を指定してください。";

/// 開始操作の結果
#[derive(Debug)]
pub enum StartOutcome {
    /// 入力不足で開始しなかった（警告文）
    Rejected(&'static str),
    /// 調査が完了した（レポートまたは学校が見つからない）
    Completed(RunResult),
    /// 調査中にエラーが起きた
    Failed(ScoutError),
}

/// 調査中フラグを立て、スコープを抜けるときに必ず下ろす
pub struct RunningGuard<'a> {
    state: &'a mut SessionState,
}

impl<'a> RunningGuard<'a> {
    pub fn new(state: &'a mut SessionState) -> Self {
        state.is_running = true;
        Self { state }
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.state.is_running = false;
    }
}

pub fn format_error(error: &ScoutError) -> String {
    format!("エラーが発生しました: {}", error)
}

pub struct UiController<'a> {
    context: &'a GeneratorContext,
}

impl<'a> UiController<'a> {
    pub fn new(context: &'a GeneratorContext) -> Self {
        Self { context }
    }

    /// 入力を検証して調査を1回実行し、結果を `state.result_text` に反映する
    pub async fn start(&self, state: &mut SessionState, today: NaiveDate) -> StartOutcome {
        let school = state.target_school.trim().to_string();
        if school.is_empty() {
            return StartOutcome::Rejected(WARN_EMPTY_SCHOOL);
        }
        let year_label = state.year_label(today);
        if year_label.trim().is_empty() {
            return StartOutcome::Rejected(WARN_EMPTY_YEAR);
        }

        state.result_text.clear();
        let request = ResearchRequest::new(school, year_label);

        let result = {
            let _guard = RunningGuard::new(state);
            runner::run(self.context, request).await
        };

        match result {
            Ok(result) => {
                state.result_text = result.final_output.clone();
                StartOutcome::Completed(result)
            }
            Err(e) => {
                warn!(error = %e, "research run ended with error");
                state.result_text = format_error(&e);
                StartOutcome::Failed(e)
            }
        }
    }
}
