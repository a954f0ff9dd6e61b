use crate::generator::agents::AgentRole;
use crate::generator::context::GeneratorContext;
use crate::generator::memory::MemoryRetriever;
use crate::generator::types::RunResult;
use crate::i18n::ReportLanguage;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// 调查结果的输出目标
#[allow(async_fn_in_trait)]
pub trait Outlet {
    async fn save(&self, context: &GeneratorContext, result: &RunResult) -> Result<Vec<PathBuf>>;
}

/// 文档类型与输出文件名的对应
pub struct DocTree {
    report: String,
    report_html: String,
    findings: String,
}

impl DocTree {
    pub fn new(target_language: &ReportLanguage) -> Self {
        Self {
            report: target_language.report_filename("report"),
            report_html: target_language.report_filename("report_html"),
            findings: target_language.report_filename("findings"),
        }
    }
}

impl Default for DocTree {
    fn default() -> Self {
        Self::new(&ReportLanguage::default())
    }
}

/// 将报告写入 `config.output_path`
pub struct DiskOutlet {
    doc_tree: DocTree,
}

impl DiskOutlet {
    pub fn new(target_language: &ReportLanguage) -> Self {
        Self {
            doc_tree: DocTree::new(target_language),
        }
    }

    fn html_document(title: &str, markdown_text: &str) -> String {
        format!(
            "<!DOCTYPE html>\n<html lang=\"ja\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
            title,
            markdown::to_html(markdown_text)
        )
    }

    /// 汇总各agent输出的调查笔记
    async fn collect_findings(context: &GeneratorContext) -> Option<String> {
        let mut content = String::new();
        for role in AgentRole::HANDOFF_TARGETS {
            if let Some(text) = context.get_finding(role).await {
                content.push_str(&format!(
                    "## {}（{}）\n\n{}\n\n",
                    role.display_name(),
                    role,
                    text.trim()
                ));
            }
        }
        (!content.is_empty()).then(|| format!("# 調査メモ\n\n{}", content))
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, context: &GeneratorContext, result: &RunResult) -> Result<Vec<PathBuf>> {
        println!("\n🖊️ レポートを保存しています...");
        let output_dir = &context.config.output_path;
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

        let mut saved = Vec::new();

        let report_path = output_dir.join(&self.doc_tree.report);
        fs::write(&report_path, &result.final_output)?;
        saved.push(report_path);

        let html_path = output_dir.join(&self.doc_tree.report_html);
        let title = format!("調査レポート {}", result.run_id);
        fs::write(&html_path, Self::html_document(&title, &result.final_output))?;
        saved.push(html_path);

        match Self::collect_findings(context).await {
            Some(findings) => {
                let findings_path = output_dir.join(&self.doc_tree.findings);
                fs::write(&findings_path, findings)?;
                saved.push(findings_path);
            }
            None => eprintln!("⚠️ 警告: 調査メモが見つからないため保存をスキップしました"),
        }

        for path in &saved {
            println!("💾 保存しました: {}", path.display());
        }
        println!("💾 保存が完了しました。出力先: {}", output_dir.display());

        Ok(saved)
    }
}
