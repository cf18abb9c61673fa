use anyhow::Result;
use teloxide::prelude::*;

use super::send_reply;
use crate::flow::Reply;
use crate::messages::escape_html;
use crate::system_info::get_system_info;

pub async fn show_system_info(bot: &Bot, chat: ChatId) -> Result<()> {
    tracing::debug!(chat_id = chat.0, "Showing system info");
    send_reply(bot, chat, Reply::text(escape_html(&get_system_info()))).await
}
