//! 单元测试用的脚本化运行时

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::generator::agents::{AgentDescriptor, AgentRole};
use crate::generator::runtime::AgentRuntime;

/// 按角色返回固定响应，并记录调用
#[derive(Default)]
pub struct ScriptedRuntime {
    responses: HashMap<AgentRole, Result<String, String>>,
    calls: Mutex<Vec<(AgentRole, String)>>,
}

impl ScriptedRuntime {
    /// 未设置的角色返回 "{role} output"
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, role: AgentRole, output: &str) -> Self {
        self.responses.insert(role, Ok(output.to_string()));
        self
    }

    pub fn fail(mut self, role: AgentRole, message: &str) -> Self {
        self.responses.insert(role, Err(message.to_string()));
        self
    }

    pub fn invoked_roles(&self) -> Vec<AgentRole> {
        self.calls.lock().unwrap().iter().map(|(r, _)| *r).collect()
    }

    pub fn input_for(&self, role: AgentRole) -> Option<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, input)| input.clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AgentRuntime for ScriptedRuntime {
    async fn run_agent(&self, agent: &AgentDescriptor, input: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((agent.role, input.to_string()));

        match self.responses.get(&agent.role) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(anyhow!("{}", message)),
            None => Ok(format!("{} output", agent.role)),
        }
    }
}
