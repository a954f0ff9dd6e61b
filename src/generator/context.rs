use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::{
    config::Config, generator::runtime::AgentRuntime, llm::client::LLMClient, memory::Memory,
};

#[derive(Clone)]
pub struct GeneratorContext {
    /// 执行agent的运行时（生产环境为LLM客户端）
    pub runtime: Arc<dyn AgentRuntime>,
    /// LLM客户端；使用自定义运行时构建时为空
    pub llm_client: Option<LLMClient>,
    /// 配置
    pub config: Config,
    /// 本次会话中最近一次调查的中间结果
    pub memory: Arc<RwLock<Memory>>,
}

impl GeneratorContext {
    /// 使用真实LLM客户端创建上下文
    pub fn new(config: Config) -> Result<Self> {
        let llm_client = LLMClient::new(config.clone())?;
        let runtime: Arc<dyn AgentRuntime> = Arc::new(llm_client.clone());
        Ok(Self {
            runtime,
            llm_client: Some(llm_client),
            config,
            memory: Arc::new(RwLock::new(Memory::new())),
        })
    }

    /// 使用指定运行时创建上下文
    pub fn with_runtime(config: Config, runtime: Arc<dyn AgentRuntime>) -> Self {
        Self {
            runtime,
            llm_client: None,
            config,
            memory: Arc::new(RwLock::new(Memory::new())),
        }
    }

    /// 存储数据到 Memory
    pub async fn store_to_memory<T>(&self, scope: &str, key: &str, data: T) -> Result<()>
    where
        T: Serialize + Send + Sync,
    {
        let mut memory = self.memory.write().await;
        memory.store(scope, key, data)
    }

    /// 从 Memory 获取数据
    pub async fn get_from_memory<T>(&self, scope: &str, key: &str) -> Option<T>
    where
        T: for<'a> Deserialize<'a> + Send + Sync,
    {
        let memory = self.memory.read().await;
        memory.get(scope, key)
    }

    pub async fn clear_memory_scope(&self, scope: &str) {
        let mut memory = self.memory.write().await;
        memory.clear_scope(scope);
    }
}
