use anyhow::Result;
use teloxide::prelude::*;

use super::{send_reply, Services};
use crate::db::{CalculationId, CalculationSummary, SavedCalculation, UserKey};
use crate::flow::{Action, Button, Keyboard, Reply};
use crate::messages::{
    self, CALCULATION_NOT_FOUND, CALC_ID_REQUIRED, DELETE_CALCULATION_LABEL, NO_HISTORY,
};

/// How many calculations `/history` shows.
pub const HISTORY_LIMIT: i64 = 10;

pub fn recent(rows: &[CalculationSummary]) -> Reply {
    if rows.is_empty() {
        return Reply::text(NO_HISTORY);
    }
    let buttons = rows
        .iter()
        .map(|row| Button::new(format!("🗑 №{}", row.id), Action::DeleteCalculation(row.id)))
        .collect();
    Reply::text(messages::format_history(rows)).with_keyboard(Keyboard::grid(buttons, 3))
}

pub fn details(saved: Option<&SavedCalculation>) -> Reply {
    match saved {
        Some(saved) => Reply::text(messages::format_saved_calculation(saved)).with_keyboard(
            Keyboard::single(Button::new(
                DELETE_CALCULATION_LABEL,
                Action::DeleteCalculation(saved.id.0),
            )),
        ),
        None => Reply::text(CALCULATION_NOT_FOUND),
    }
}

pub async fn show_calculation(
    bot: &Bot,
    chat: ChatId,
    user: UserKey,
    services: &Services,
    id: Option<i64>,
) -> Result<()> {
    let Some(id) = id else {
        return send_reply(bot, chat, Reply::text(CALC_ID_REQUIRED)).await;
    };
    let saved = services.db.get_calculation(user, CalculationId(id)).await?;
    send_reply(bot, chat, details(saved.as_ref())).await
}
