//! ReAct执行器 - 带工具agent的多轮推理

use anyhow::Result;
use rig::completion::{AssistantContent, Message, PromptError};
use tracing::{debug, warn};

use super::providers::ProviderAgent;

/// ReAct执行器
pub struct ReActExecutor;

impl ReActExecutor {
    /// 执行ReAct循环；达到最大轮数时返回已有的最后一段回答
    pub async fn execute(
        agent: &ProviderAgent,
        user_prompt: &str,
        max_iterations: usize,
    ) -> Result<String> {
        debug!(max_iterations, "ReAct loop started");

        match agent.multi_turn(user_prompt, max_iterations).await {
            Ok(response) => Ok(response),
            Err(PromptError::MaxDepthError {
                max_depth,
                chat_history,
                prompt: _,
            }) => {
                warn!(max_depth, "ReAct loop reached max depth");
                match Self::last_assistant_text(&chat_history) {
                    Some(content) => Ok(format!(
                        "{}\n\n（注意: 検索の最大回数 {} に達したため、調査は途中で打ち切られています）",
                        content, max_depth
                    )),
                    None => Err(anyhow::anyhow!(
                        "エージェントが最大反復回数({})までに回答を返しませんでした",
                        max_depth
                    )),
                }
            }
            Err(e) => Err(anyhow::anyhow!("エージェントの実行に失敗しました: {}", e)),
        }
    }

    /// 从聊天历史中提取最后一条助手文本
    fn last_assistant_text(chat_history: &[Message]) -> Option<String> {
        chat_history.iter().rev().find_map(|msg| {
            if let Message::Assistant { content, .. } = msg {
                let text_content = content
                    .iter()
                    .filter_map(|c| {
                        if let AssistantContent::Text(text) = c {
                            Some(text.text.clone())
                        } else {
                            None
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n");

                if text_content.trim().is_empty() {
                    None
                } else {
                    Some(text_content)
                }
            } else {
                None
            }
        })
    }
}
