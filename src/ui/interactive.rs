//! 対話型セッション

use anyhow::Result;
use colored::*;
use rustyline::{Config as EditorConfig, DefaultEditor, error::ReadlineError};
use spinners::{Spinner, Spinners};
use std::io::{self, Write};

use crate::generator::agents::Roster;
use crate::generator::context::GeneratorContext;
use crate::generator::outlet::{DiskOutlet, Outlet};
use crate::generator::types::RunResult;
use crate::ui::controller::{StartOutcome, UiController};
use crate::ui::render;
use crate::ui::session::SessionState;
use crate::year;

/// 入力行から解釈したコマンド
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    School(String),
    YearAuto,
    YearManual(i32),
    Start,
    Reset,
    Show,
    Plan,
    Save,
    Help,
    Quit,
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Command {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head.to_lowercase().as_str() {
            "school" => Command::School(rest.to_string()),
            "year" => match rest {
                "" => Command::Invalid("year auto または year <西暦> を指定してください".to_string()),
                "auto" => Command::YearAuto,
                value => match value.parse::<i32>() {
                    Ok(year) => Command::YearManual(year),
                    Err(_) => Command::Invalid(format!("年度として解釈できません: {}", value)),
                },
            },
            "start" => Command::Start,
            "reset" => Command::Reset,
            "show" => Command::Show,
            "plan" => Command::Plan,
            "save" => Command::Save,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Invalid(format!("不明なコマンドです: {}", other)),
        }
    }
}

fn print_help() {
    println!("{}", "コマンド一覧".bold());
    println!("  school <学校名>   調べたい学校名を入力");
    println!("  year auto         現在の情報に基づいて年度を自動計算");
    println!("  year <西暦>       年度を手動で指定 (2000〜2100)");
    println!("  start             調査を開始");
    println!("  reset             入力と結果をリセット");
    println!("  show              直前の結果を再表示");
    println!("  plan              エージェント編成と実行計画を表示");
    println!("  save              直前のレポートをファイルに保存");
    println!("  quit              終了");
}

fn print_status(state: &SessionState) {
    let today = year::today();
    let school = if state.target_school.trim().is_empty() {
        "（未入力）".bright_black().to_string()
    } else {
        state.target_school.bright_green().to_string()
    };
    println!("  学校名: {}", school);
    println!("  年度モード: {}", state.year_option);
    println!("  対象年度: {}", state.year_label(today).bright_green());
}

fn print_result(state: &SessionState) {
    if state.result_text.is_empty() {
        println!("{}", "まだ結果はありません".bright_black());
        return;
    }
    println!("{}", render::render_plain(&state.result_text));
    println!();
    println!("{}", render::render_markdown(&state.result_text));
}

/// 対話型セッションを開始する
pub async fn run(context: GeneratorContext) -> Result<()> {
    println!("{}", "🎓 入試情報リサーチアシスタント".bright_blue().bold());
    println!("{}", "学校名と年度を入力して start で調査を開始します。help でコマンド一覧".bright_black());

    let editor_config = EditorConfig::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .build();
    let mut rl = DefaultEditor::with_config(editor_config)?;

    let controller = UiController::new(&context);
    let mut state = SessionState::from_config(&context.config, year::today())?;
    print_status(&state);
    let mut last_result: Option<RunResult> = None;
    let prompt = ":: ".bold().cyan().to_string();

    loop {
        io::stdout().flush()?;
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("{} {:?}", "Error:".bright_red(), err);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Command::School(name) => match state.set_school(&name) {
                Ok(()) => print_status(&state),
                Err(e) => eprintln!("⚠️ {}", e),
            },
            Command::YearAuto => match state.set_year_auto() {
                Ok(()) => print_status(&state),
                Err(e) => eprintln!("⚠️ {}", e),
            },
            Command::YearManual(manual_year) => match state.set_manual_year(manual_year) {
                Ok(()) => print_status(&state),
                Err(e) => eprintln!("⚠️ {}", e),
            },
            Command::Start => {
                let mut spinner = Spinner::new(
                    Spinners::Dots12,
                    "エージェントが調査を実行中です。しばらくお待ちください..."
                        .bright_magenta()
                        .to_string(),
                );
                let today = year::today();
                tokio::select! {
                    outcome = controller.start(&mut state, today) => {
                        spinner.stop_with_newline();
                        match outcome {
                            StartOutcome::Rejected(warning) => {
                                println!("{} {}", "⚠️".yellow(), warning.yellow());
                            }
                            StartOutcome::Completed(result) => {
                                print_result(&state);
                                println!("\n⏱️ {}", result.timing.generate_timing_report());
                                last_result = (!result.is_not_found()).then_some(result);
                            }
                            StartOutcome::Failed(_) => {
                                eprintln!("{}", state.result_text.bright_red());
                                last_result = None;
                            }
                        }
                    }
                    _ = tokio::signal::ctrl_c() => {
                        spinner.stop_with_newline();
                        println!("{}", "調査を中断しました".bright_yellow());
                    }
                }
            }
            Command::Reset => match state.reset(year::today()) {
                Ok(()) => {
                    last_result = None;
                    println!("🔄 入力をリセットしました");
                    print_status(&state);
                }
                Err(e) => eprintln!("⚠️ {}", e),
            },
            Command::Show => {
                print_status(&state);
                print_result(&state);
            }
            Command::Plan => {
                let school = state.target_school.trim();
                let school = if school.is_empty() { "（未入力）" } else { school };
                let roster = Roster::build(
                    school,
                    &state.year_label(year::today()),
                    &context.config.target_language,
                );
                println!("{}", render::render_markdown(&roster.describe()));
            }
            Command::Save => match &last_result {
                Some(result) => {
                    if let Err(e) = DiskOutlet::new(&context.config.target_language)
                        .save(&context, result)
                        .await
                    {
                        eprintln!("❌ 保存に失敗しました: {:#}", e);
                    }
                }
                None => println!("{}", "保存できるレポートがありません".bright_black()),
            },
            Command::Help => print_help(),
            Command::Quit => break,
            Command::Invalid(message) => {
                eprintln!("⚠️ {}", message);
            }
        }
    }

    println!("{}", "👋 終了します".bright_blue());
    Ok(())
}
