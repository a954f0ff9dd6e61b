//! LLM Provider支持模块

use anyhow::Result;
use rig::{
    agent::Agent,
    client::CompletionClient,
    completion::{Prompt, PromptError},
};

use crate::{
    config::{LLMConfig, LLMProvider},
    llm::tools::web_search::AgentToolWebSearch,
};

/// 统一的Provider客户端枚举
#[derive(Clone)]
pub enum ProviderClient {
    OpenAI(rig::providers::openai::Client),
    Moonshot(rig::providers::moonshot::Client),
    DeepSeek(rig::providers::deepseek::Client),
    Mistral(rig::providers::mistral::Client),
    OpenRouter(rig::providers::openrouter::Client),
    Anthropic(rig::providers::anthropic::Client),
    Gemini(rig::providers::gemini::Client),
    Ollama(rig::providers::ollama::Client),
}

/// 在各provider分支中复用的Agent构建逻辑
macro_rules! build_agent {
    ($builder:expr, $preamble:expr, $config:expr $(, $tool:expr)?) => {
        $builder
            .preamble($preamble)
            .max_tokens($config.max_tokens.into())
            .temperature($config.temperature)
            $(.tool($tool))?
            .build()
    };
}

impl ProviderClient {
    /// 根据配置创建相应的provider客户端
    pub fn new(config: &LLMConfig) -> Result<Self> {
        match config.provider {
            LLMProvider::OpenAI => {
                let client = rig::providers::openai::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::OpenAI(client))
            }
            LLMProvider::Moonshot => {
                let client = rig::providers::moonshot::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::Moonshot(client))
            }
            LLMProvider::DeepSeek => {
                let client = rig::providers::deepseek::Client::builder(&config.api_key)
                    .base_url(&config.api_base_url)
                    .build();
                Ok(ProviderClient::DeepSeek(client))
            }
            LLMProvider::Mistral => {
                let client = rig::providers::mistral::Client::builder(&config.api_key).build();
                Ok(ProviderClient::Mistral(client))
            }
            LLMProvider::OpenRouter => {
                let client = rig::providers::openrouter::Client::builder(&config.api_key).build();
                Ok(ProviderClient::OpenRouter(client))
            }
            LLMProvider::Anthropic => {
                let client =
                    rig::providers::anthropic::ClientBuilder::new(&config.api_key).build()?;
                Ok(ProviderClient::Anthropic(client))
            }
            LLMProvider::Gemini => {
                let client = rig::providers::gemini::Client::builder(&config.api_key).build()?;
                Ok(ProviderClient::Gemini(client))
            }
            LLMProvider::Ollama => {
                let client = rig::providers::ollama::Client::builder().build();
                Ok(ProviderClient::Ollama(client))
            }
        }
    }

    /// 创建不带工具的Agent（事实核查、撰写）
    pub fn create_agent(&self, model: &str, preamble: &str, config: &LLMConfig) -> ProviderAgent {
        match self {
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(build_agent!(
                client.completion_model(model).completions_api().into_agent_builder(),
                preamble,
                config
            )),
            ProviderClient::Moonshot(client) => {
                ProviderAgent::Moonshot(build_agent!(client.agent(model), preamble, config))
            }
            ProviderClient::DeepSeek(client) => {
                ProviderAgent::DeepSeek(build_agent!(client.agent(model), preamble, config))
            }
            ProviderClient::Mistral(client) => {
                ProviderAgent::Mistral(build_agent!(client.agent(model), preamble, config))
            }
            ProviderClient::OpenRouter(client) => {
                ProviderAgent::OpenRouter(build_agent!(client.agent(model), preamble, config))
            }
            ProviderClient::Anthropic(client) => {
                ProviderAgent::Anthropic(build_agent!(client.agent(model), preamble, config))
            }
            ProviderClient::Gemini(client) => {
                ProviderAgent::Gemini(build_agent!(client.agent(model), preamble, config))
            }
            ProviderClient::Ollama(client) => {
                ProviderAgent::Ollama(build_agent!(client.agent(model), preamble, config))
            }
        }
    }

    /// 创建带Web检索工具的Agent（存在确认、各调研agent）
    pub fn create_agent_with_search(
        &self,
        model: &str,
        preamble: &str,
        config: &LLMConfig,
        web_search: &AgentToolWebSearch,
    ) -> ProviderAgent {
        match self {
            ProviderClient::OpenAI(client) => ProviderAgent::OpenAI(build_agent!(
                client.completion_model(model).completions_api().into_agent_builder(),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::Moonshot(client) => ProviderAgent::Moonshot(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::DeepSeek(client) => ProviderAgent::DeepSeek(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::Mistral(client) => ProviderAgent::Mistral(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::OpenRouter(client) => ProviderAgent::OpenRouter(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::Anthropic(client) => ProviderAgent::Anthropic(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::Gemini(client) => ProviderAgent::Gemini(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
            ProviderClient::Ollama(client) => ProviderAgent::Ollama(build_agent!(
                client.agent(model),
                preamble,
                config,
                web_search.clone()
            )),
        }
    }
}

/// 统一的Agent枚举
pub enum ProviderAgent {
    OpenAI(Agent<rig::providers::openai::CompletionModel>),
    Mistral(Agent<rig::providers::mistral::CompletionModel>),
    OpenRouter(Agent<rig::providers::openrouter::CompletionModel>),
    Anthropic(Agent<rig::providers::anthropic::completion::CompletionModel>),
    Gemini(Agent<rig::providers::gemini::completion::CompletionModel>),
    Moonshot(Agent<rig::providers::moonshot::CompletionModel>),
    DeepSeek(Agent<rig::providers::deepseek::CompletionModel>),
    Ollama(Agent<rig::providers::ollama::CompletionModel<reqwest::Client>>),
}

impl ProviderAgent {
    /// 执行单轮prompt
    pub async fn prompt(&self, prompt: &str) -> Result<String> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Moonshot(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Mistral(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::OpenRouter(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Anthropic(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).await.map_err(|e| e.into()),
        }
    }

    /// 执行多轮对话（工具调用需要多轮）
    pub async fn multi_turn(
        &self,
        prompt: &str,
        max_iterations: usize,
    ) -> Result<String, PromptError> {
        match self {
            ProviderAgent::OpenAI(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::Moonshot(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::DeepSeek(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::Mistral(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::OpenRouter(agent) => {
                agent.prompt(prompt).multi_turn(max_iterations).await
            }
            ProviderAgent::Anthropic(agent) => {
                agent.prompt(prompt).multi_turn(max_iterations).await
            }
            ProviderAgent::Gemini(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
            ProviderAgent::Ollama(agent) => agent.prompt(prompt).multi_turn(max_iterations).await,
        }
    }
}
