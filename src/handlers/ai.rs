use anyhow::Result;
use teloxide::{prelude::*, types::ChatAction};

use super::send_reply;
use crate::ai::{AiAnswer, AiGateway};
use crate::flow::Reply;
use crate::messages::{escape_html, AI_BUSY, AI_DISABLED, AI_FAILED};

/// Text sent to the user for a gateway outcome. Raw errors stay in the logs.
pub fn answer_text(answer: AiAnswer) -> String {
    match answer {
        AiAnswer::Success(text) => escape_html(&text),
        AiAnswer::Exhausted => AI_BUSY.to_string(),
        AiAnswer::Failed(reason) => {
            tracing::warn!(reason = %reason, "AI request failed");
            AI_FAILED.to_string()
        }
    }
}

pub async fn answer_question(
    bot: &Bot,
    chat: ChatId,
    gateway: Option<&AiGateway>,
    question: &str,
) -> Result<()> {
    let Some(gateway) = gateway else {
        return send_reply(bot, chat, Reply::main_menu(AI_DISABLED)).await;
    };
    if let Err(err) = bot.send_chat_action(chat, ChatAction::Typing).await {
        tracing::debug!(error = %err, "Failed to send typing action");
    }
    let answer = gateway.ask(question).await;
    send_reply(bot, chat, Reply::main_menu(answer_text(answer))).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_never_leak_details() {
        let text = answer_text(AiAnswer::Failed("HTTP 401: invalid token".into()));
        assert_eq!(text, AI_FAILED);
        assert_eq!(answer_text(AiAnswer::Exhausted), AI_BUSY);
        assert_eq!(answer_text(AiAnswer::Success("a < b".into())), "a &lt; b");
    }
}
