use anyhow::Result;
use teloxide::prelude::*;

use super::{answer_question, send_reply, Services};
use crate::db::UserKey;
use crate::flow::{Action, Button, Effect, Keyboard, Reply};
use crate::messages::{self, ADD_ITEM_LABEL, LIST_EXISTS, NOTE_SAVED, OPEN_LIST_LABEL};
use crate::shopping_list::AddOutcome;

fn list_actions(list: &str) -> Keyboard {
    Keyboard::Inline(vec![vec![
        Button::new(ADD_ITEM_LABEL, Action::AddItem(list.to_string())),
        Button::new(OPEN_LIST_LABEL, Action::OpenList(list.to_string())),
    ]])
}

/// Carry out the side effect of a finished flow and report the outcome.
pub async fn apply_effect(
    bot: &Bot,
    chat: ChatId,
    user: UserKey,
    services: &Services,
    effect: Effect,
) -> Result<()> {
    match effect {
        Effect::SaveCalculation(report) => {
            let id = services.db.save_calculation(user, &report).await?;
            tracing::info!(user = user.0, calculation_id = id.0, "Saved calculation");
            send_reply(bot, chat, Reply::main_menu(messages::calculation_saved(id))).await
        }
        Effect::SaveNote(text) => {
            let id = services.db.add_note(user, &text).await?;
            tracing::info!(user = user.0, note_id = id, "Saved note");
            send_reply(bot, chat, Reply::main_menu(NOTE_SAVED)).await
        }
        Effect::CreateList(name) => {
            if services.lists.create_list(user, &name).await? {
                tracing::info!(user = user.0, list = %name, "Created shopping list");
                let reply = Reply::text(messages::list_created(&name)).with_keyboard(list_actions(&name));
                send_reply(bot, chat, reply).await
            } else {
                send_reply(bot, chat, Reply::main_menu(LIST_EXISTS)).await
            }
        }
        Effect::AddItem { list, item } => {
            let outcome = services.lists.add_item(user, &list, item.clone()).await?;
            tracing::info!(user = user.0, list = %list, item = %item.name, ?outcome, "Stored list item");
            let text = messages::item_added(&list, &item, outcome == AddOutcome::Updated);
            send_reply(bot, chat, Reply::text(text).with_keyboard(list_actions(&list))).await
        }
        Effect::Ask(question) => answer_question(bot, chat, services.ai.as_ref(), &question).await,
    }
}
