use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue::InMemStorage, UpdateHandler},
    prelude::*,
};

use crate::ai::AiGateway;
use crate::catalog::Catalog;
use crate::commands::Command;
use crate::db::Database;
use crate::flow::State;
use crate::shopping_list::ShoppingListStore;

pub mod ai;
pub mod catalog;
pub mod effects;
pub mod history;
pub mod info;
pub mod lists;
pub mod notes;
pub mod render;
pub mod session;
pub mod views;

pub use ai::answer_question;
pub use effects::apply_effect;
pub use history::show_calculation;
pub use info::show_system_info;
pub use render::{edit_or_send, markup, send_reply};
pub use session::{advance_flow, on_callback, on_command, on_text};
pub use views::show_view;

pub type FlowDialogue = Dialogue<State, InMemStorage<State>>;

/// Everything a handler needs besides the bot and the update.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<Catalog>,
    pub db: Database,
    pub lists: ShoppingListStore,
    pub ai: Option<AiGateway>,
}

/// Handler tree for the dispatcher.
///
/// Dependencies: `Services` and `Arc<InMemStorage<State>>`.
pub fn schema() -> UpdateHandler<anyhow::Error> {
    dptree::entry()
        .enter_dialogue::<Update, InMemStorage<State>, State>()
        .branch(Update::filter_callback_query().endpoint(on_callback))
        .branch(
            Update::filter_message()
                .branch(dptree::entry().filter_command::<Command>().endpoint(on_command))
                .branch(dptree::endpoint(on_text)),
        )
}
