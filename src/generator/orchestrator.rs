//! 协调者的执行计划
//!
//! 存在确认 → (SCHOOL_NOT_FOUND 时结束) → 5个调研agent → 事实核查 → 撰写
//! 固定的控制结构在这里保证，各agent的内部行为交给运行时。

use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ScoutError;
use crate::generator::agents::prompts::{self, NOT_FOUND_MESSAGE};
use crate::generator::agents::{AgentRole, Roster};
use crate::generator::context::GeneratorContext;
use crate::generator::memory::{MemoryRetriever, MemoryScope, ScopedKeys};
use crate::generator::types::{Outcome, ResearchRequest, RunResult};
use crate::generator::workflow::{TimingKeys, TimingScope};
use crate::utils::threads::do_parallel_with_limit;

/// 执行计划的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestrationState {
    Start,
    ExistenceCheck,
    NotFound,
    Research,
    Verify,
    Write,
    Done,
}

impl std::fmt::Display for OrchestrationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrchestrationState::Start => "START",
            OrchestrationState::ExistenceCheck => "EXISTENCE_CHECK",
            OrchestrationState::NotFound => "NOT_FOUND",
            OrchestrationState::Research => "RESEARCH",
            OrchestrationState::Verify => "VERIFY",
            OrchestrationState::Write => "WRITE",
            OrchestrationState::Done => "DONE",
        };
        write!(f, "{}", name)
    }
}

/// 协调者
pub struct Coordinator<'a> {
    context: &'a GeneratorContext,
    roster: Roster,
    request: ResearchRequest,
}

impl<'a> Coordinator<'a> {
    pub fn new(context: &'a GeneratorContext, request: ResearchRequest) -> Self {
        let roster = Roster::build(
            &request.school,
            &request.year_label,
            &context.config.target_language,
        );
        Self {
            context,
            roster,
            request,
        }
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// 执行完整计划
    pub async fn execute(&self) -> Result<RunResult, ScoutError> {
        let run_id = Uuid::new_v4();
        let mut timing = TimingScope::new();
        let mut state = OrchestrationState::Start;
        info!(%run_id, school = %self.request.school, year = %self.request.year_label, "{}", state);

        self.context
            .clear_memory_scope(MemoryScope::EXAM_RESEARCH)
            .await;
        if let Err(e) = self
            .context
            .store_to_memory(MemoryScope::EXAM_RESEARCH, ScopedKeys::REQUEST, &self.request)
            .await
        {
            warn!(error = %e, "failed to record research request");
        }

        Self::transition(&run_id, &mut state, OrchestrationState::ExistenceCheck);
        timing.start_phase(TimingKeys::EXISTENCE_CHECK);
        let existence = self
            .invoke(AgentRole::SchoolExistenceChecker, &self.request.school)
            .await?;
        timing.end_phase(TimingKeys::EXISTENCE_CHECK);

        if prompts::is_school_not_found(&existence) {
            Self::transition(&run_id, &mut state, OrchestrationState::NotFound);
            return Ok(RunResult {
                run_id,
                final_output: NOT_FOUND_MESSAGE.to_string(),
                outcome: Outcome::NotFound,
                timing,
            });
        }

        Self::transition(&run_id, &mut state, OrchestrationState::Research);
        timing.start_phase(TimingKeys::RESEARCH);
        let request = prompts::initial_prompt(&self.request.school, &self.request.year_label);
        let findings = self.research(&request).await?;
        timing.end_phase(TimingKeys::RESEARCH);

        Self::transition(&run_id, &mut state, OrchestrationState::Verify);
        timing.start_phase(TimingKeys::VERIFY);
        let aggregate = prompts::aggregate_findings(&findings);
        if let Err(e) = self
            .context
            .store_to_memory(MemoryScope::EXAM_RESEARCH, ScopedKeys::AGGREGATE, &aggregate)
            .await
        {
            warn!(error = %e, "failed to record aggregated findings");
        }
        let verified = self.invoke(AgentRole::FactChecker, &aggregate).await?;
        timing.end_phase(TimingKeys::VERIFY);

        Self::transition(&run_id, &mut state, OrchestrationState::Write);
        timing.start_phase(TimingKeys::WRITE);
        let report = self.invoke(AgentRole::Writer, &verified).await?;
        timing.end_phase(TimingKeys::WRITE);

        Self::transition(&run_id, &mut state, OrchestrationState::Done);
        Ok(RunResult {
            run_id,
            final_output: report,
            outcome: Outcome::Report,
            timing,
        })
    }

    fn transition(run_id: &Uuid, state: &mut OrchestrationState, next: OrchestrationState) {
        info!(%run_id, from = %state, to = %next, "coordinator state changed");
        *state = next;
    }

    /// 并行执行5个调研agent，等待全部完成
    async fn research(&self, request: &str) -> Result<Vec<(AgentRole, String)>, ScoutError> {
        let max_parallels = self.context.config.llm.max_parallels;
        let futures: Vec<_> = AgentRole::RESEARCHERS
            .into_iter()
            .map(|role| {
                let message = prompts::handoff_message(role, request);
                async move { (role, self.invoke(role, &message).await) }
            })
            .collect();

        let results = do_parallel_with_limit(futures, max_parallels).await;

        let mut findings = Vec::with_capacity(results.len());
        for (role, result) in results {
            findings.push((role, result?));
        }
        Ok(findings)
    }

    /// 执行一次委派agent，空输出视为错误
    async fn invoke(&self, role: AgentRole, input: &str) -> Result<String, ScoutError> {
        let agent = self
            .roster
            .handoff(role)
            .ok_or_else(|| ScoutError::Runtime {
                role: role.to_string(),
                message: "エージェントが編成に含まれていません".to_string(),
            })?;

        let output = self
            .context
            .runtime
            .run_agent(agent, input)
            .await
            .map_err(|e| ScoutError::runtime(agent.name.clone(), &e))?;

        if output.trim().is_empty() {
            return Err(ScoutError::EmptyOutput(agent.name.clone()));
        }

        if let Err(e) = self.context.store_finding(role, &output).await {
            warn!(agent = %agent.name, error = %e, "failed to record agent output");
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::generator::runtime::AgentRuntime;
    use crate::generator::testing::ScriptedRuntime;
    use std::sync::Arc;

    fn context_with(runtime: Arc<ScriptedRuntime>) -> GeneratorContext {
        GeneratorContext::with_runtime(Config::default(), runtime as Arc<dyn AgentRuntime>)
    }

    fn request() -> ResearchRequest {
        ResearchRequest::new("開成高等学校", "2027年度")
    }

    #[tokio::test]
    async fn test_not_found_short_circuits() {
        let runtime = Arc::new(ScriptedRuntime::new().respond(
            AgentRole::SchoolExistenceChecker,
            "SCHOOL_NOT_FOUND",
        ));
        let context = context_with(runtime.clone());

        let result = Coordinator::new(&context, request()).execute().await.unwrap();

        assert_eq!(result.outcome, Outcome::NotFound);
        assert_eq!(result.final_output, NOT_FOUND_MESSAGE);
        assert_eq!(runtime.invoked_roles(), vec![AgentRole::SchoolExistenceChecker]);
    }

    #[tokio::test]
    async fn test_full_pipeline_order() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let context = context_with(runtime.clone());

        let result = Coordinator::new(&context, request()).execute().await.unwrap();

        assert_eq!(result.outcome, Outcome::Report);
        let roles = runtime.invoked_roles();
        assert_eq!(roles.len(), 8);
        assert_eq!(roles[0], AgentRole::SchoolExistenceChecker);

        let fact_check_at = roles
            .iter()
            .position(|r| *r == AgentRole::FactChecker)
            .unwrap();
        for researcher in AgentRole::RESEARCHERS {
            let at = roles.iter().position(|r| *r == researcher).unwrap();
            assert!(at < fact_check_at, "{researcher} ran after fact checker");
        }
        assert_eq!(roles[7], AgentRole::Writer);
    }

    #[tokio::test]
    async fn test_writer_receives_only_fact_check_output() {
        let runtime = Arc::new(
            ScriptedRuntime::new().respond(AgentRole::FactChecker, "検証済み: 確定情報のみ"),
        );
        let context = context_with(runtime.clone());

        Coordinator::new(&context, request()).execute().await.unwrap();

        assert_eq!(
            runtime.input_for(AgentRole::Writer).as_deref(),
            Some("検証済み: 確定情報のみ")
        );
    }

    #[tokio::test]
    async fn test_fact_checker_receives_every_finding() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let context = context_with(runtime.clone());

        Coordinator::new(&context, request()).execute().await.unwrap();

        let input = runtime.input_for(AgentRole::FactChecker).unwrap();
        for researcher in AgentRole::RESEARCHERS {
            assert!(input.contains(&format!("{} output", researcher)));
        }
    }

    #[tokio::test]
    async fn test_researcher_failure_fails_run_before_verify() {
        let runtime = Arc::new(
            ScriptedRuntime::new().fail(AgentRole::DeviationScoreResearcher, "timeout"),
        );
        let context = context_with(runtime.clone());

        let err = Coordinator::new(&context, request())
            .execute()
            .await
            .unwrap_err();

        match err {
            ScoutError::Runtime { role, message } => {
                assert_eq!(role, "DeviationScoreResearcher");
                assert!(message.contains("timeout"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!runtime.invoked_roles().contains(&AgentRole::FactChecker));
    }

    #[tokio::test]
    async fn test_empty_writer_output_is_error() {
        let runtime = Arc::new(ScriptedRuntime::new().respond(AgentRole::Writer, "  \n"));
        let context = context_with(runtime);

        let err = Coordinator::new(&context, request())
            .execute()
            .await
            .unwrap_err();
        assert!(matches!(err, ScoutError::EmptyOutput(name) if name == "WriterAgent"));
    }

    #[tokio::test]
    async fn test_findings_are_kept_in_memory() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let context = context_with(runtime);

        Coordinator::new(&context, request()).execute().await.unwrap();

        assert_eq!(
            context
                .get_finding(AgentRole::OfficialInfoResearcher)
                .await
                .as_deref(),
            Some("OfficialInfoResearcher output")
        );
        let stored: Option<ResearchRequest> = context
            .get_from_memory(MemoryScope::EXAM_RESEARCH, ScopedKeys::REQUEST)
            .await;
        assert_eq!(stored, Some(request()));
    }

    #[tokio::test]
    async fn test_timing_records_each_phase() {
        let runtime = Arc::new(ScriptedRuntime::new());
        let context = context_with(runtime);

        let result = Coordinator::new(&context, request()).execute().await.unwrap();
        let phases: Vec<&str> = result
            .timing
            .get_phase_durations()
            .iter()
            .map(|(name, _)| name.as_str())
            .collect();

        assert_eq!(
            phases,
            vec![
                TimingKeys::EXISTENCE_CHECK,
                TimingKeys::RESEARCH,
                TimingKeys::VERIFY,
                TimingKeys::WRITE
            ]
        );
    }
}
