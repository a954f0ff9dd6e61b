//! LLM客户端 - 提供统一的LLM服务接口

use anyhow::{Context, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::generator::agents::{AgentDescriptor, Capability};
use crate::llm::tools::web_search::AgentToolWebSearch;

mod providers;
mod react_executor;

use providers::{ProviderAgent, ProviderClient};
use react_executor::ReActExecutor;

/// LLM客户端 - 提供统一的LLM服务接口
#[derive(Clone)]
pub struct LLMClient {
    config: Config,
    client: ProviderClient,
    web_search: AgentToolWebSearch,
}

impl LLMClient {
    /// 创建新的LLM客户端
    pub fn new(config: Config) -> Result<Self> {
        let client = ProviderClient::new(&config.llm)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.llm.timeout_seconds))
            .build()
            .context("Failed to build HTTP client for web search")?;
        let web_search = AgentToolWebSearch::new(&config.search, http);
        Ok(Self {
            config,
            client,
            web_search,
        })
    }

    /// 检查模型连接是否正常
    pub async fn check_connection(&self) -> Result<()> {
        println!("🔄 モデルへの接続を確認しています...");
        let agent = self.client.create_agent(
            &self.config.llm.model_efficient,
            "You are a helpful assistant.",
            &self.config.llm,
        );
        match agent.prompt("Hello").await {
            Ok(_) => {
                println!("✅ モデルへの接続は正常です");
                Ok(())
            }
            Err(e) => {
                eprintln!("❌ モデルへの接続に失敗しました: {}", e);
                Err(e)
            }
        }
    }

    /// 通用重试逻辑，每次尝试都受 timeout_seconds 限制
    async fn retry_with_backoff<T, F, Fut>(&self, tag: &str, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let llm_config = &self.config.llm;
        let max_retries = llm_config.retry_attempts.max(1);
        let timeout = Duration::from_secs(llm_config.timeout_seconds);
        let mut retries = 0;

        loop {
            let attempt = match tokio::time::timeout(timeout, operation()).await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!(
                    "{}秒以内に応答がありませんでした",
                    llm_config.timeout_seconds
                )),
            };

            match attempt {
                Ok(result) => return Ok(result),
                Err(err) => {
                    retries += 1;
                    warn!(
                        agent = tag,
                        attempt = retries,
                        max_retries,
                        error = %err,
                        "model call failed"
                    );
                    if retries >= max_retries {
                        return Err(err);
                    }
                    tokio::time::sleep(Duration::from_millis(llm_config.retry_delay_ms)).await;
                }
            }
        }
    }

    fn build_agent(&self, descriptor: &AgentDescriptor) -> ProviderAgent {
        let model = self.config.llm.model_for(descriptor.model_tier());
        if descriptor.has_capability(Capability::WebSearch) {
            self.client.create_agent_with_search(
                model,
                &descriptor.instructions,
                &self.config.llm,
                &self.web_search,
            )
        } else {
            self.client
                .create_agent(model, &descriptor.instructions, &self.config.llm)
        }
    }

    /// 以指定的agent定义执行一次调用，返回最终文本
    pub async fn run_agent(&self, descriptor: &AgentDescriptor, input: &str) -> Result<String> {
        let agent = self.build_agent(descriptor);
        let uses_tools = descriptor.has_capability(Capability::WebSearch);
        let max_iterations = self.config.llm.max_iterations;

        info!(agent = %descriptor.name, uses_tools, "agent invoked");
        let output = self
            .retry_with_backoff(&descriptor.name, || async {
                if uses_tools {
                    ReActExecutor::execute(&agent, input, max_iterations).await
                } else {
                    agent.prompt(input).await
                }
            })
            .await?;
        debug!(agent = %descriptor.name, chars = output.chars().count(), "agent finished");

        Ok(output)
    }
}
