use crate::config::{Config, LLMProvider};
use crate::i18n::ReportLanguage;
use crate::year::validate_manual_year;
use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::PathBuf;

/// nyushi-scout - 由多个AI agent驱动的学校入试信息调研助手
#[derive(Parser, Debug)]
#[command(name = "nyushi-scout")]
#[command(
    about = "Multi-agent research assistant that collects entrance-exam information for a school and academic year, fact-checks it and writes a report."
)]
#[command(version)]
pub struct Args {
    /// 调查对象学校名，省略时以交互模式启动
    #[arg(short, long)]
    pub school: Option<String>,

    /// 年度 ("auto" 或 2000~2100 的公历年份)
    #[arg(short, long)]
    pub year: Option<String>,

    /// 即使指定了学校名也以交互模式启动（学校名与年度作为初始输入）
    #[arg(short, long)]
    pub interactive: bool,

    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 只显示agent编组与执行计划，不调用模型
    #[arg(long)]
    pub dry_run: bool,

    /// LLM Provider (openai, moonshot, deepseek, mistral, openrouter, anthropic, gemini, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// 高能效模型，用于各调查agent
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，用于事实核查与报告撰写
    #[arg(long)]
    pub model_powerful: Option<String>,

    /// 最大tokens数
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// 温度参数
    #[arg(long)]
    pub temperature: Option<f64>,

    /// 调查agent的最大并行数
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// Web检索API KEY
    #[arg(long)]
    pub search_api_key: Option<String>,

    /// 报告语言 (ja, en)
    #[arg(long)]
    pub target_language: Option<String>,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

/// "auto" 表示自动计算（None），否则为范围内的公历年份
pub fn parse_year_arg(value: &str) -> Result<Option<i32>> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("auto") {
        return Ok(None);
    }
    let year: i32 = value
        .parse()
        .with_context(|| format!("年度として解釈できません: {}", value))?;
    Ok(Some(validate_manual_year(year)?))
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn into_config(self) -> Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;

        if let Some(school) = self.school {
            config.school = Some(school);
        }
        if let Some(year) = self.year {
            config.manual_year = parse_year_arg(&year)?;
        }
        if let Some(output_path) = self.output_path {
            config.output_path = output_path;
        }

        // 覆盖LLM配置
        if let Some(provider_str) = self.llm_provider {
            config.llm.provider = provider_str
                .parse::<LLMProvider>()
                .map_err(|e| anyhow!(e))?;
        }
        if let Some(llm_api_base_url) = self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url;
        }
        if let Some(llm_api_key) = self.llm_api_key {
            config.llm.api_key = llm_api_key;
        }
        if let Some(model_efficient) = self.model_efficient {
            config.llm.model_efficient = model_efficient;
        }
        if let Some(model_powerful) = self.model_powerful {
            config.llm.model_powerful = model_powerful;
        }
        if let Some(max_tokens) = self.max_tokens {
            config.llm.max_tokens = max_tokens;
        }
        if let Some(temperature) = self.temperature {
            config.llm.temperature = temperature;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.llm.max_parallels = max_parallels;
        }
        if let Some(search_api_key) = self.search_api_key {
            config.search.api_key = search_api_key;
        }

        // 目标语言配置
        if let Some(target_language_str) = self.target_language {
            match target_language_str.parse::<ReportLanguage>() {
                Ok(target_language) => config.target_language = target_language,
                Err(_) => eprintln!(
                    "⚠️ 警告: 未知のレポート言語です: {}。既定の言語 ({}) を使います",
                    target_language_str,
                    config.target_language.display_name()
                ),
            }
        }

        config.interactive = config.interactive || self.interactive;
        config.dry_run = config.dry_run || self.dry_run;
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }
}
