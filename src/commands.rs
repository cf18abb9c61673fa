use anyhow::Result;
use teloxide::{prelude::*, utils::command::BotCommands};

use crate::db::UserKey;
use crate::flow::{Input, MenuItem, Reply, State};
use crate::handlers::{
    advance_flow, send_reply, show_calculation, show_system_info, show_view, FlowDialogue,
    Services,
};
use crate::messages::{HELP_TEXT, MAIN_MENU_TEXT, WELCOME};
use crate::router::View;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase", description = "Доступные команды:")]
pub enum Command {
    #[command(description = "начать работу.")]
    Start,
    #[command(description = "показать справку.")]
    Help,
    #[command(description = "главное меню.")]
    Menu,
    #[command(description = "отменить текущий ввод.")]
    Cancel,
    #[command(description = "все списки покупок.")]
    Lists,
    #[command(description = "открыть список по названию.")]
    List(String),
    #[command(description = "последние расчёты.")]
    History,
    #[command(description = "показать расчёт по номеру.")]
    Calc(String),
    #[command(description = "удалить расчёт по номеру.")]
    DelCalc(String),
    #[command(description = "спросить ИИ.")]
    Ask(String),
    #[command(description = "заметки.")]
    Notes,
    #[command(description = "информация о сборке.")]
    Info,
}

/// Parse the numeric argument of `/calc` and `/delcalc`.
pub fn parse_id(arg: &str) -> Option<i64> {
    arg.trim().trim_start_matches('#').parse().ok()
}

impl Command {
    pub async fn dispatch(
        self,
        bot: &Bot,
        chat: ChatId,
        user: UserKey,
        dialogue: &FlowDialogue,
        services: &Services,
    ) -> Result<()> {
        tracing::debug!(chat_id = chat.0, command = ?self, "Handling command");
        match self {
            Command::Start => {
                dialogue.exit().await?;
                send_reply(bot, chat, Reply::main_menu(WELCOME)).await?;
            }
            Command::Help => send_reply(bot, chat, Reply::main_menu(HELP_TEXT)).await?,
            Command::Menu | Command::Cancel => {
                dialogue.exit().await?;
                send_reply(bot, chat, Reply::main_menu(MAIN_MENU_TEXT)).await?;
            }
            Command::Lists => show_view(bot, chat, None, user, services, View::Lists).await?,
            Command::List(name) => {
                let name = name.trim();
                let view = if name.is_empty() {
                    View::Lists
                } else {
                    View::List(name.to_string())
                };
                show_view(bot, chat, None, user, services, view).await?;
            }
            Command::History => show_view(bot, chat, None, user, services, View::History).await?,
            Command::Calc(arg) => show_calculation(bot, chat, user, services, parse_id(&arg)).await?,
            Command::DelCalc(arg) => match parse_id(&arg) {
                Some(id) => {
                    let view = View::DeleteCalculation(id);
                    show_view(bot, chat, None, user, services, view).await?;
                }
                None => show_calculation(bot, chat, user, services, None).await?,
            },
            Command::Notes => show_view(bot, chat, None, user, services, View::Notes).await?,
            Command::Ask(question) => {
                dialogue.exit().await?;
                let (state, input) = if question.trim().is_empty() {
                    (State::Idle, Input::Text(MenuItem::Ask.label().to_string()))
                } else {
                    (State::AiQuestion, Input::Text(question))
                };
                advance_flow(bot, chat, user, dialogue, services, state, input).await?;
            }
            Command::Info => show_system_info(bot, chat).await?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        let cmd = Command::parse("/list Кухня", "bot").unwrap();
        assert_eq!(cmd, Command::List("Кухня".into()));
        let cmd = Command::parse("/delcalc 7", "bot").unwrap();
        assert_eq!(cmd, Command::DelCalc("7".into()));
        assert_eq!(Command::parse("/cancel", "bot").unwrap(), Command::Cancel);
    }

    #[test]
    fn ids_accept_hash_prefix() {
        assert_eq!(parse_id(" #12 "), Some(12));
        assert_eq!(parse_id("abc"), None);
    }
}
