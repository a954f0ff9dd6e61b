//! 各agent的指令模板
//!
//! 全部是只依赖 (学校名, 年度标签) 的纯函数。

use super::AgentRole;
use crate::i18n::ReportLanguage;

/// 存在确认agent表示“未找到学校”的固定字符串
pub const SCHOOL_NOT_FOUND: &str = "SCHOOL_NOT_FOUND";

/// 未找到学校时的最终输出
pub const NOT_FOUND_MESSAGE: &str = "入力された学校の情報が見つかりませんでした。";

pub fn instructions_for(
    role: AgentRole,
    school: &str,
    year_label: &str,
    language: &ReportLanguage,
) -> String {
    match role {
        AgentRole::SchoolExistenceChecker => existence_checker(school),
        AgentRole::OfficialInfoResearcher => official_info(school, year_label),
        AgentRole::DetailedExamInfoResearcher => detailed_exam_info(school, year_label),
        AgentRole::TranscriptScoreResearcher => transcript_score(school, year_label),
        AgentRole::DeviationScoreResearcher => deviation_score(school),
        AgentRole::FutureTrendsResearcher => future_trends(school, year_label),
        AgentRole::FactChecker => fact_checker(),
        AgentRole::Writer => writer(language),
        AgentRole::Coordinator => coordinator_plan(school, year_label),
    }
}

fn existence_checker(school: &str) -> String {
    format!(
        "あなたは「{school}」という学校が実在するかをWeb検索で確認する専門家です。\
学校の公式サイトや信頼できる情報源（Wikipedia、教育関連のポータルサイトなど）を探してください。\
実在が確認できた場合は学校の正式名称だけを返してください。\
実在しない、または確認できない場合は '{SCHOOL_NOT_FOUND}' という文字列だけを返してください。"
    )
}

fn official_info(school: &str, year_label: &str) -> String {
    format!(
        "あなたは{school}の公式サイトや信頼できる教育情報サイトから、{year_label}の入試要綱、\
入試の種類、試験科目、日程に関する公式情報を正確に集める専門家です。\
{year_label}の情報が未公開の場合は現時点で公開されている最新の確定情報を使い、その旨を明記してください。\
参照したURLを必ず添えてください。"
    )
}

fn detailed_exam_info(school: &str, year_label: &str) -> String {
    format!(
        "あなたは{school}の{year_label}の各入試（種類と日程）について詳細を深掘りする専門家です。\
各入試のテスト科目、試験時間、配点、出題範囲などを、公式サイトや信頼できる情報源から集めてください。\
入試の種類ごとに整理し、参照したURLを添えてください。"
    )
}

fn transcript_score(school: &str, year_label: &str) -> String {
    format!(
        "あなたは{school}の{year_label}の入試で内申点（調査書点）が必要か、\
必要な場合はどのように評価されるか（点数化の方法、学力検査との比率、重視される学年や教科など）を調べる専門家です。\
公式の入試要綱や信頼できる情報源から正確な情報を集め、参照したURLを添えてください。"
    )
}

fn deviation_score(school: &str) -> String {
    format!(
        "あなたは{school}の偏差値を調べる専門家です。\
大手予備校や高校受験情報サイトなど、信頼できる情報源を複数参照して最新の偏差値を集めてください。\
情報源によって値が異なる場合は、情報源ごとの値とその違いを報告してください。"
    )
}

fn future_trends(school: &str, year_label: &str) -> String {
    format!(
        "あなたは教育関連ニュース、学校の発表、過去の変更履歴などを調べ、\
{year_label}の{school}の入試について予測や変更の可能性がある点を集める専門家です。\
未確定の情報は未確定であることを必ず明記してください。"
    )
}

fn fact_checker() -> String {
    "あなたはリサーチエージェントから提供された情報を検証するファクトチェッカーです。\
情報の正確性、出典の信頼性、URLの妥当性を確認し、情報どうしの矛盾点や未確定な情報があれば指摘してください。\
検証後の情報を項目ごとに整理し、それぞれに確度（確定・要確認・未確定）の注記を付けて返してください。"
        .to_string()
}

fn writer(language: &ReportLanguage) -> String {
    format!(
        "あなたは検証済みの受験情報をもとに、受験生向けの明確で分かりやすいレポートを作成するライターです。\
基本情報、試験の詳細、内申点、偏差値、今後の動向の各項目を含め、参照URLと情報の確度\
（特に将来の情報に関する注意点）を正確に伝えてください。出力はMarkdown形式にしてください。\n\n{}",
        language.prompt_instruction()
    )
}

fn coordinator_plan(school: &str, year_label: &str) -> String {
    let request = research_request(school, year_label);
    format!(
        r#"あなたは高校受験情報調査のコーディネーターです。以下の手順で進めてください。
1. `SchoolExistenceChecker` に学校名「{school}」の存在確認を依頼します。
2. `SchoolExistenceChecker` の応答が '{SCHOOL_NOT_FOUND}' の場合は、他の調査は一切行わず、最終出力として「{NOT_FOUND_MESSAGE}」だけを返します。
3. それ以外の応答の場合のみ、次に進みます。
    a. ユーザーのリクエスト「{request}」を分析します。
    b. 次のリサーチャーにそれぞれ調査を割り当てます:
        - `OfficialInfoResearcher`: 入試要綱、入試の種類、日程
        - `DetailedExamInfoResearcher`: 各入試の科目、試験時間、配点などの詳細
        - `TranscriptScoreResearcher`: 内申点の要否、評価方法、影響度
        - `DeviationScoreResearcher`: 偏差値
        - `FutureTrendsResearcher`: {year_label}の入試に関する予測や変更点
    c. すべてのリサーチャーの結果を `FactCheckerAgent` に渡して検証させます。
    d. 検証済みの情報だけを `WriterAgent` に渡し、基本情報、詳細情報、内申点、偏差値、今後の動向を含む最終レポートを作成させます。"#
    )
}

fn research_request(school: &str, year_label: &str) -> String {
    format!(
        "{school}の{year_label}の入試の要綱、それぞれの入試の実施日時、テストの詳細（科目、時間、配点など）、\
内申点の要否・評価方法、および偏差値を調べてください。"
    )
}

/// 传给协调者的初始prompt
pub fn initial_prompt(school: &str, year_label: &str) -> String {
    research_request(school, year_label)
}

/// 协调者发给调研agent的委派消息
pub fn handoff_message(role: AgentRole, request: &str) -> String {
    format!(
        "コーディネーターからの依頼です。ユーザーのリクエスト:\n{}\n\nこのうち「{}」の調査を担当してください。",
        request,
        role.display_name()
    )
}

/// 按编组顺序加标题，合并5个调研agent的结果
pub fn aggregate_findings(findings: &[(AgentRole, String)]) -> String {
    let mut content = String::from("# リサーチャーの調査結果\n\n");
    for role in AgentRole::RESEARCHERS {
        if let Some((_, text)) = findings.iter().find(|(r, _)| *r == role) {
            content.push_str(&format!("## {}（{}）\n{}\n\n", role.display_name(), role, text.trim()));
        }
    }
    content
}

/// 判断存在确认的输出是否为哨兵字符串
pub fn is_school_not_found(output: &str) -> bool {
    output.trim().trim_matches(|c| c == '\'' || c == '"' || c == '`') == SCHOOL_NOT_FOUND
}
