use anyhow::Result;
use teloxide::{prelude::*, types::MessageId};

use super::{catalog, edit_or_send, history, lists, notes, Services};
use crate::db::{CalculationId, UserKey};
use crate::flow::Reply;
use crate::messages::{
    CALCULATION_DELETED, CALCULATION_NOT_FOUND, LIST_DELETED, LIST_NOT_FOUND, NOTE_DELETED,
    NOTE_NOT_FOUND,
};
use crate::router::View;

/// Build and deliver a view. `origin` is the message whose button was pressed;
/// when present the view replaces it.
#[tracing::instrument(level = "debug", skip(bot, services, origin), fields(chat_id = chat.0))]
pub async fn show_view(
    bot: &Bot,
    chat: ChatId,
    origin: Option<MessageId>,
    user: UserKey,
    services: &Services,
    view: View,
) -> Result<()> {
    let reply = match view {
        View::Catalog => catalog::categories(&services.catalog),
        View::Category(index) => catalog::category(&services.catalog, index),
        View::Subcategory(category, index) => catalog::material(&services.catalog, category, index),

        View::Lists => lists::overview(&services.lists.lists(user).await),
        View::List(name) => open_list(user, services, &name).await,
        View::RemoveItem(name, index) => {
            match services.lists.remove_at(user, &name, index).await? {
                Some(item) => tracing::info!(user = user.0, list = %name, item = %item.name, "Removed list item"),
                None => tracing::debug!(user = user.0, list = %name, index, "Nothing to remove"),
            }
            open_list(user, services, &name).await
        }
        View::ClearList(name) => {
            if services.lists.clear_list(user, &name).await? {
                tracing::info!(user = user.0, list = %name, "Cleared list");
            }
            open_list(user, services, &name).await
        }
        View::DeleteList(name) => {
            let deleted = services.lists.delete_list(user, &name).await?;
            let overview = lists::overview(&services.lists.lists(user).await);
            if deleted {
                tracing::info!(user = user.0, list = %name, "Deleted list");
                overview.prefixed(LIST_DELETED)
            } else {
                overview.prefixed(LIST_NOT_FOUND)
            }
        }

        View::History => {
            let rows = services
                .db
                .list_calculations(user, history::HISTORY_LIMIT)
                .await?;
            history::recent(&rows)
        }
        View::DeleteCalculation(id) => {
            let notice = if services.db.delete_calculation(user, CalculationId(id)).await? {
                CALCULATION_DELETED
            } else {
                CALCULATION_NOT_FOUND
            };
            let rows = services
                .db
                .list_calculations(user, history::HISTORY_LIMIT)
                .await?;
            history::recent(&rows).prefixed(notice)
        }

        View::Notes => notes::recent(&services.db.list_notes(user, notes::NOTES_LIMIT).await?),
        View::DeleteNote(id) => {
            let notice = if services.db.delete_note(user, id).await? {
                NOTE_DELETED
            } else {
                NOTE_NOT_FOUND
            };
            notes::recent(&services.db.list_notes(user, notes::NOTES_LIMIT).await?).prefixed(notice)
        }
    };
    edit_or_send(bot, chat, origin, reply).await
}

async fn open_list(user: UserKey, services: &Services, name: &str) -> Reply {
    let items = services.lists.items(user, name).await;
    lists::open(name, items.as_deref())
}
