use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::i18n::ReportLanguage;
use crate::year::validate_manual_year;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "nyushi.toml";

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "mistral")]
    Mistral,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "gemini")]
    Gemini,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LLMProvider::OpenAI => "openai",
            LLMProvider::Moonshot => "moonshot",
            LLMProvider::DeepSeek => "deepseek",
            LLMProvider::Mistral => "mistral",
            LLMProvider::OpenRouter => "openrouter",
            LLMProvider::Anthropic => "anthropic",
            LLMProvider::Gemini => "gemini",
            LLMProvider::Ollama => "ollama",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "mistral" => Ok(LLMProvider::Mistral),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "gemini" => Ok(LLMProvider::Gemini),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 模型档位：调研类任务用efficient，核查与撰写用powerful
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    Efficient,
    Powerful,
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 调查对象学校名
    pub school: Option<String>,

    /// 手动指定的年度，未指定时自动计算
    pub manual_year: Option<i32>,

    /// 报告输出目录
    pub output_path: PathBuf,

    /// 报告语言
    pub target_language: ReportLanguage,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// Web检索配置
    pub search: SearchConfig,

    /// 启动交互式会话
    pub interactive: bool,

    /// 只打印agent编排计划，不调用模型
    pub dry_run: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，用于存在确认与各调研agent
    pub model_efficient: String,

    /// 高质量模型，用于事实核查与报告撰写
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 温度
    pub temperature: f64,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 单次agent调用超时时间（秒）
    pub timeout_seconds: u64,

    /// 调研agent的最大并发数
    pub max_parallels: usize,

    /// 带工具agent的最大推理轮数
    pub max_iterations: usize,
}

/// Web检索配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    /// 检索API KEY
    pub api_key: String,

    /// 检索API地址
    pub api_base_url: String,

    /// 近似用户位置：国家代码
    pub country: String,

    /// 近似用户位置：时区
    pub timezone: String,

    /// 每次检索返回的最大条数
    pub max_results: u32,

    /// basic / advanced
    pub search_depth: String,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &Path) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        if let Some(manual_year) = config.manual_year {
            validate_manual_year(manual_year)
                .with_context(|| format!("Invalid manual_year in config file: {:?}", path))?;
        }
        Ok(config)
    }

    /// 按优先级加载：显式路径 > 当前目录下的 nyushi.toml > 默认值
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        let default_path = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            return Self::from_file(&default_path);
        }

        Ok(Config::default())
    }

    /// 学校名（去除首尾空白）
    pub fn school_name(&self) -> Option<&str> {
        self.school
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl LLMConfig {
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Efficient => &self.model_efficient,
            ModelTier::Powerful => &self.model_powerful,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            school: None,
            manual_year: None,
            output_path: PathBuf::from("./nyushi.reports"),
            target_language: ReportLanguage::default(),
            llm: LLMConfig::default(),
            search: SearchConfig::default(),
            interactive: false,
            dry_run: false,
            verbose: false,
        }
    }
}

fn env_or_default(keys: &[&str]) -> String {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
        .unwrap_or_default()
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: env_or_default(&["NYUSHI_LLM_API_KEY", "OPENAI_API_KEY"]),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o"),
            max_tokens: 16384,
            temperature: 0.2,
            retry_attempts: 3,
            retry_delay_ms: 3000,
            timeout_seconds: 300,
            max_parallels: 5,
            max_iterations: 8,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: env_or_default(&["NYUSHI_SEARCH_API_KEY", "TAVILY_API_KEY"]),
            api_base_url: String::from("https://api.tavily.com/search"),
            country: String::from("JP"),
            timezone: String::from("Asia/Tokyo"),
            max_results: 5,
            search_depth: String::from("basic"),
        }
    }
}
