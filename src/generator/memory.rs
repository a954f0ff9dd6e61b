use crate::generator::agents::AgentRole;
use crate::generator::context::GeneratorContext;

pub struct MemoryScope;

impl MemoryScope {
    pub const EXAM_RESEARCH: &'static str = "exam_research";
}

pub struct ScopedKeys;

impl ScopedKeys {
    pub const REQUEST: &'static str = "request";
    pub const AGGREGATE: &'static str = "aggregate";
}

#[allow(async_fn_in_trait)]
pub trait MemoryRetriever {
    async fn store_finding(&self, role: AgentRole, text: &str) -> anyhow::Result<()>;

    async fn get_finding(&self, role: AgentRole) -> Option<String>;
}

impl MemoryRetriever for GeneratorContext {
    /// 存储某个agent的输出
    async fn store_finding(&self, role: AgentRole, text: &str) -> anyhow::Result<()> {
        self.store_to_memory(MemoryScope::EXAM_RESEARCH, &role.to_string(), text)
            .await
    }

    /// 获取某个agent的输出
    async fn get_finding(&self, role: AgentRole) -> Option<String> {
        self.get_from_memory(MemoryScope::EXAM_RESEARCH, &role.to_string())
            .await
    }
}
