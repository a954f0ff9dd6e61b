use serde::{Deserialize, Serialize};

/// 报告语言
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum ReportLanguage {
    #[serde(rename = "ja")]
    #[default]
    Japanese,
    #[serde(rename = "en")]
    English,
}

impl std::fmt::Display for ReportLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportLanguage::Japanese => write!(f, "ja"),
            ReportLanguage::English => write!(f, "en"),
        }
    }
}

impl std::str::FromStr for ReportLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ja" | "japanese" | "日本語" => Ok(ReportLanguage::Japanese),
            "en" | "english" | "英語" => Ok(ReportLanguage::English),
            _ => Err(format!("Unknown target language: {}", s)),
        }
    }
}

impl ReportLanguage {
    pub fn display_name(&self) -> &'static str {
        match self {
            ReportLanguage::Japanese => "日本語",
            ReportLanguage::English => "English",
        }
    }

    /// 追加在WriterAgent指令末尾的语言要求
    pub fn prompt_instruction(&self) -> &'static str {
        match self {
            ReportLanguage::Japanese => {
                "レポートは日本語で、受験生と保護者に伝わる平易な表現で作成してください。"
            }
            ReportLanguage::English => {
                "Write the report in English. Keep Japanese proper nouns (school names, exam names) in their original form."
            }
        }
    }

    /// 输出文件名
    pub fn report_filename(&self, doc_type: &str) -> String {
        match self {
            ReportLanguage::Japanese => match doc_type {
                "report" => "調査レポート.md".to_string(),
                "report_html" => "調査レポート.html".to_string(),
                "findings" => "調査メモ.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
            ReportLanguage::English => match doc_type {
                "report" => "report.md".to_string(),
                "report_html" => "report.html".to_string(),
                "findings" => "findings.md".to_string(),
                _ => format!("{}.md", doc_type),
            },
        }
    }
}
