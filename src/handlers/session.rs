use std::future::Future;

use anyhow::Result;
use teloxide::{
    prelude::*,
    types::{MessageId, User},
};

use super::{apply_effect, send_reply, show_view, FlowDialogue, Services};
use crate::commands::Command;
use crate::db::UserKey;
use crate::flow::{step, Action, FlowContext, Input, Reply, State};
use crate::messages::{GENERIC_FAILURE, MAIN_MENU_TEXT, UNKNOWN_ACTION};
use crate::router::{route, Route};

/// Storage key for the sender; falls back to the chat for anonymous posts.
pub fn user_key(from: Option<&User>, chat: ChatId) -> UserKey {
    match from {
        Some(user) => UserKey::from(user.id),
        None => UserKey(chat.0.unsigned_abs()),
    }
}

/// Run one unit of work; any error is logged, reported as a generic failure
/// and the session is reset.
async fn guarded<F>(bot: &Bot, chat: ChatId, dialogue: &FlowDialogue, work: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    if let Err(err) = work.await {
        tracing::error!(error = %err, chat_id = chat.0, "Handler failed");
        if let Err(err) = dialogue.exit().await {
            tracing::warn!(error = %err, chat_id = chat.0, "Failed to reset session");
        }
        send_reply(bot, chat, Reply::main_menu(GENERIC_FAILURE)).await?;
    }
    Ok(())
}

pub async fn on_text(
    bot: Bot,
    msg: Message,
    dialogue: FlowDialogue,
    services: Services,
) -> Result<()> {
    let Some(text) = msg.text() else {
        tracing::trace!(chat_id = msg.chat.id.0, "Ignoring non-text message");
        return Ok(());
    };
    let chat = msg.chat.id;
    let user = user_key(msg.from.as_ref(), chat);
    let input = Input::Text(text.to_string());
    guarded(&bot, chat, &dialogue, turn(&bot, chat, None, user, &dialogue, &services, input)).await
}

pub async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: FlowDialogue,
    services: Services,
) -> Result<()> {
    let chat = msg.chat.id;
    let user = user_key(msg.from.as_ref(), chat);
    guarded(&bot, chat, &dialogue, cmd.dispatch(&bot, chat, user, &dialogue, &services)).await
}

pub async fn on_callback(
    bot: Bot,
    q: CallbackQuery,
    dialogue: FlowDialogue,
    services: Services,
) -> Result<()> {
    if let Err(err) = bot.answer_callback_query(q.id.clone()).await {
        tracing::warn!(error = %err, "Failed to answer callback query");
    }
    let (Some(data), Some(message)) = (q.data.as_deref(), q.message.as_ref()) else {
        return Ok(());
    };
    let chat = message.chat().id;
    let origin = Some(message.id());
    let user = UserKey::from(q.from.id);
    match data.parse::<Action>() {
        Ok(action) => {
            let input = Input::Action(action);
            let work = turn(&bot, chat, origin, user, &dialogue, &services, input);
            guarded(&bot, chat, &dialogue, work).await
        }
        Err(err) => {
            tracing::warn!(error = %err, chat_id = chat.0, "Unknown callback data");
            send_reply(&bot, chat, Reply::text(UNKNOWN_ACTION)).await
        }
    }
}

async fn turn(
    bot: &Bot,
    chat: ChatId,
    origin: Option<MessageId>,
    user: UserKey,
    dialogue: &FlowDialogue,
    services: &Services,
    input: Input,
) -> Result<()> {
    let state = dialogue.get_or_default().await?;
    match route(&state, input) {
        Route::Reset => {
            tracing::debug!(chat_id = chat.0, from = state.name(), "Session reset");
            dialogue.exit().await?;
            send_reply(bot, chat, Reply::main_menu(MAIN_MENU_TEXT)).await
        }
        Route::View(view) => show_view(bot, chat, origin, user, services, view).await,
        Route::Flow(input) => advance_flow(bot, chat, user, dialogue, services, state, input).await,
    }
}

/// Feed one input to the state machine, store the next state, send the
/// reply and carry out the requested effect.
pub async fn advance_flow(
    bot: &Bot,
    chat: ChatId,
    user: UserKey,
    dialogue: &FlowDialogue,
    services: &Services,
    state: State,
    input: Input,
) -> Result<()> {
    let ctx = FlowContext {
        catalog: &services.catalog,
        ai_enabled: services.ai.is_some(),
    };
    let from = state.name();
    let transition = step(state, input, &ctx);
    tracing::debug!(chat_id = chat.0, from, to = transition.next.name(), "Flow step");

    if transition.next.is_idle() {
        dialogue.exit().await?;
    } else {
        dialogue.update(transition.next).await?;
    }
    if let Some(reply) = transition.reply {
        send_reply(bot, chat, reply).await?;
    }
    if let Some(effect) = transition.effect {
        apply_effect(bot, chat, user, services, effect).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::types::UserId;

    #[test]
    fn user_key_prefers_sender() {
        let user = User {
            id: UserId(7),
            is_bot: false,
            first_name: "Test".into(),
            last_name: None,
            username: None,
            language_code: None,
            is_premium: false,
            added_to_attachment_menu: false,
        };
        assert_eq!(user_key(Some(&user), ChatId(-100)), UserKey(7));
        assert_eq!(user_key(None, ChatId(-100)), UserKey(100));
    }
}
