//! 端末向けの表示

use colored::*;
use markdown::mdast::Node;
use markdown::{ParseOptions, to_mdast};

const PANEL_WIDTH: usize = 60;

/// 見出し付きの枠で囲む
pub fn render_panel(title: &str, body: &str) -> String {
    let rule = "─".repeat(PANEL_WIDTH);
    format!(
        "┌{}\n│ {}\n├{}\n{}\n└{}",
        rule,
        title.bold(),
        rule,
        body.trim_end(),
        rule
    )
}

/// コピー用のプレーンテキスト表示
pub fn render_plain(text: &str) -> String {
    render_panel("結果（テキスト）", text)
}

/// Markdownを端末向けに装飾して描画する。解析できない場合はそのまま返す
pub fn render_markdown(text: &str) -> String {
    match to_mdast(text, &ParseOptions::gfm()) {
        Ok(root) => {
            let mut out = String::new();
            render_block(&root, 0, &mut out);
            out.trim_end().to_string()
        }
        Err(_) => text.to_string(),
    }
}

fn render_block(node: &Node, indent: usize, out: &mut String) {
    match node {
        Node::Root(root) => {
            for child in &root.children {
                render_block(child, indent, out);
            }
        }
        Node::Heading(heading) => {
            let text = inline_text(&heading.children);
            let styled = match heading.depth {
                1 => text.bold().bright_cyan().underline(),
                2 => text.bold().cyan(),
                _ => text.bold(),
            };
            out.push_str(&format!("{}\n\n", styled));
        }
        Node::Paragraph(paragraph) => {
            out.push_str(&"  ".repeat(indent));
            out.push_str(&inline_text(&paragraph.children));
            out.push_str("\n\n");
        }
        Node::List(list) => {
            let mut number = list.start.unwrap_or(1);
            for item in &list.children {
                let bullet = if list.ordered {
                    let b = format!("{}.", number);
                    number += 1;
                    b
                } else {
                    "•".to_string()
                };
                render_list_item(item, &bullet, indent, out);
            }
            if indent == 0 {
                out.push('\n');
            }
        }
        Node::Code(code) => {
            for line in code.value.lines() {
                out.push_str(&format!("    {}\n", line.bright_black()));
            }
            out.push('\n');
        }
        Node::Blockquote(quote) => {
            let mut inner = String::new();
            for child in &quote.children {
                render_block(child, 0, &mut inner);
            }
            for line in inner.trim_end().lines() {
                out.push_str(&format!("{} {}\n", "▌".bright_black(), line.italic()));
            }
            out.push('\n');
        }
        Node::Table(table) => {
            for (i, row) in table.children.iter().enumerate() {
                let cells: Vec<String> = row
                    .children()
                    .map(|cells| cells.iter().map(cell_text).collect())
                    .unwrap_or_default();
                let line = cells.join(" │ ");
                if i == 0 {
                    out.push_str(&format!("{}\n", line.bold()));
                    out.push_str(&format!("{}\n", "─".repeat(PANEL_WIDTH).bright_black()));
                } else {
                    out.push_str(&format!("{}\n", line));
                }
            }
            out.push('\n');
        }
        Node::ThematicBreak(_) => {
            out.push_str(&format!("{}\n\n", "─".repeat(PANEL_WIDTH).bright_black()));
        }
        other => {
            let text = match other.children() {
                Some(children) => inline_text(children),
                None => other.to_string(),
            };
            if !text.is_empty() {
                out.push_str(&text);
                out.push_str("\n\n");
            }
        }
    }
}

fn render_list_item(item: &Node, bullet: &str, indent: usize, out: &mut String) {
    let Some(children) = item.children() else {
        return;
    };
    let pad = "  ".repeat(indent);
    let mut first = true;
    for child in children {
        match child {
            Node::Paragraph(paragraph) => {
                let text = inline_text(&paragraph.children);
                if first {
                    out.push_str(&format!("{}{} {}\n", pad, bullet.yellow(), text));
                } else {
                    out.push_str(&format!("{}  {}\n", pad, text));
                }
            }
            other => render_block(other, indent + 1, out),
        }
        first = false;
    }
}

fn cell_text(cell: &Node) -> String {
    cell.children()
        .map(|children| inline_text(children))
        .unwrap_or_default()
}

fn inline_text(nodes: &[Node]) -> String {
    nodes.iter().map(inline).collect()
}

fn inline(node: &Node) -> String {
    match node {
        Node::Text(text) => text.value.clone(),
        Node::Strong(strong) => inline_text(&strong.children).bold().to_string(),
        Node::Emphasis(emphasis) => inline_text(&emphasis.children).italic().to_string(),
        Node::Delete(delete) => inline_text(&delete.children).strikethrough().to_string(),
        Node::InlineCode(code) => code.value.bright_magenta().to_string(),
        Node::Link(link) => {
            let label = inline_text(&link.children);
            if label == link.url {
                link.url.blue().underline().to_string()
            } else {
                format!("{} ({})", label, link.url.blue().underline())
            }
        }
        Node::Break(_) => "\n".to_string(),
        other => match other.children() {
            Some(children) => inline_text(children),
            None => other.to_string(),
        },
    }
}
