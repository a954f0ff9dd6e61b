use crate::config::Config;
use crate::generator::agents::Roster;
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::runner;
use crate::generator::types::ResearchRequest;
use crate::year::{self, YearOption};

use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// 时间跟踪作用域
#[derive(Debug, Clone)]
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<String, Instant>,
    phase_durations: Vec<(String, Duration)>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: Vec::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &str) {
        self.phase_start_times
            .insert(phase_name.to_string(), Instant::now());
    }

    /// 结束一个阶段的计时，未开始的阶段返回 None
    pub fn end_phase(&mut self, phase_name: &str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations
            .push((phase_name.to_string(), duration));
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 按结束顺序获取各阶段的执行时间
    pub fn get_phase_durations(&self) -> &[(String, Duration)] {
        &self.phase_durations
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "総実行時間: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\nフェーズ別の実行時間:\n");
            for (phase, duration) in &self.phase_durations {
                report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const EXISTENCE_CHECK: &'static str = "existence_check";
    pub const RESEARCH: &'static str = "research";
    pub const VERIFY: &'static str = "verify";
    pub const WRITE: &'static str = "write";
}

/// 从配置解析年度标签，指定了手动年度时使用手动模式
pub fn resolve_year_label(config: &Config) -> String {
    let today = year::today();
    match config.manual_year {
        Some(manual_year) => {
            year::resolve_academic_year(YearOption::Manual, manual_year, today)
        }
        None => year::resolve_academic_year(
            YearOption::Auto,
            year::default_manual_year(today),
            today,
        ),
    }
}

/// 根据配置构建编组与执行计划的展示文本（不发起网络调用）
pub fn describe_plan(config: &Config) -> String {
    let school = config.school_name().unwrap_or("（未入力）");
    let year_label = resolve_year_label(config);
    Roster::build(school, &year_label, &config.target_language).describe()
}

/// 启动入试调查工作流
pub async fn launch(config: &Config) -> Result<()> {
    if config.dry_run {
        println!("{}", describe_plan(config));
        return Ok(());
    }

    let context = GeneratorContext::new(config.clone())?;

    let school = match config.school_name() {
        Some(school) if !config.interactive => school.to_string(),
        _ => return crate::ui::interactive::run(context).await,
    };

    // 启动时检查模型连接
    if let Some(llm_client) = &context.llm_client {
        llm_client.check_connection().await?;
    }

    let request = ResearchRequest::new(school, resolve_year_label(config));
    println!(
        "🔍 {} の{}入試情報を調査しています...",
        request.school, request.year_label
    );

    let result = runner::run(&context, request)
        .await
        .map_err(|e| anyhow!("エラーが発生しました: {}", e))?;

    println!("\n{}\n", crate::ui::render::render_markdown(&result.final_output));

    if !result.is_not_found() {
        DiskOutlet::new(&config.target_language)
            .save(&context, &result)
            .await?;
    }

    println!("\n⏱️ {}", result.timing.generate_timing_report());
    Ok(())
}
