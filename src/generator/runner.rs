//! 单次调查的执行封装

use tracing::{error, info};

use crate::error::ScoutError;
use crate::generator::context::GeneratorContext;
use crate::generator::orchestrator::Coordinator;
use crate::generator::types::{ResearchRequest, RunResult};

/// 校验输入并完整执行协调者
///
/// 成功时返回非空的最终文本；学校不存在时同样返回 `Ok`（`Outcome::NotFound`）。
pub async fn run(
    context: &GeneratorContext,
    request: ResearchRequest,
) -> Result<RunResult, ScoutError> {
    if request.school.is_empty() {
        return Err(ScoutError::Validation("学校名を入力してください。".to_string()));
    }
    if request.year_label.is_empty() {
        return Err(ScoutError::Validation("年度を指定してください。".to_string()));
    }

    let coordinator = Coordinator::new(context, request);
    let result = match coordinator.execute().await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "research run failed");
            return Err(e);
        }
    };

    if result.final_output.trim().is_empty() {
        return Err(ScoutError::EmptyOutput(
            coordinator.roster().coordinator().name.clone(),
        ));
    }

    info!(
        run_id = %result.run_id,
        outcome = ?result.outcome,
        elapsed_ms = result.timing.get_total_duration().as_millis() as u64,
        "research run finished"
    );
    Ok(result)
}
