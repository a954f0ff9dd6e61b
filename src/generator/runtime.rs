use anyhow::Result;
use async_trait::async_trait;

use crate::generator::agents::AgentDescriptor;
use crate::llm::client::LLMClient;

/// 执行agent的外部运行时边界
///
/// 编排层只依赖这个trait。
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    /// 按 `agent` 的指令处理 `input`，返回最终文本
    async fn run_agent(&self, agent: &AgentDescriptor, input: &str) -> Result<String>;
}

#[async_trait]
impl AgentRuntime for LLMClient {
    async fn run_agent(&self, agent: &AgentDescriptor, input: &str) -> Result<String> {
        LLMClient::run_agent(self, agent, input).await
    }
}
