use anyhow::Result;
use teloxide::{
    prelude::*,
    types::{
        InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, MessageId,
        ParseMode, ReplyMarkup,
    },
};

use crate::flow::{Button, Keyboard, Reply};

fn inline_button(button: &Button) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(button.label.clone(), button.action.to_string())
}

fn inline_markup(rows: &[Vec<Button>]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(
        rows.iter()
            .map(|row| row.iter().map(inline_button).collect::<Vec<_>>()),
    )
}

pub fn markup(keyboard: &Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::MainMenu => {
            let rows = Keyboard::main_menu_rows()
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());
            ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
        }
        Keyboard::Inline(rows) => ReplyMarkup::InlineKeyboard(inline_markup(rows)),
    }
}

pub async fn send_reply(bot: &Bot, chat: ChatId, reply: Reply) -> Result<()> {
    let mut request = bot
        .send_message(chat, reply.text)
        .parse_mode(ParseMode::Html);
    if let Some(keyboard) = &reply.keyboard {
        request = request.reply_markup(markup(keyboard));
    }
    request.await?;
    Ok(())
}

/// Replace the message whose button was pressed, or send a new one.
///
/// Only inline keyboards can be attached to an edited message, so replies
/// carrying the main menu are always sent fresh.
pub async fn edit_or_send(
    bot: &Bot,
    chat: ChatId,
    origin: Option<MessageId>,
    reply: Reply,
) -> Result<()> {
    let (Some(message_id), None | Some(Keyboard::Inline(_))) = (origin, &reply.keyboard) else {
        return send_reply(bot, chat, reply).await;
    };
    let rows = match &reply.keyboard {
        Some(Keyboard::Inline(rows)) => rows.clone(),
        _ => Vec::new(),
    };
    let edited = bot
        .edit_message_text(chat, message_id, reply.text.clone())
        .parse_mode(ParseMode::Html)
        .reply_markup(inline_markup(&rows))
        .await;
    if let Err(err) = edited {
        tracing::warn!(
            error = %err,
            chat_id = chat.0,
            message_id = message_id.0,
            "Failed to edit message, sending a new one",
        );
        send_reply(bot, chat, reply).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::Action;
    use reqwest::Client;
    use teloxide::types::InlineKeyboardButtonKind;
    use wiremock::{
        matchers::{body_string_contains, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn inline_buttons_carry_action_tokens() {
        let keyboard = Keyboard::grid(
            vec![
                Button::new("Окно", Action::Skip),
                Button::new("Кухня", Action::OpenList("Кухня".into())),
            ],
            1,
        );
        let ReplyMarkup::InlineKeyboard(markup) = markup(&keyboard) else {
            panic!("expected inline keyboard");
        };
        assert_eq!(markup.inline_keyboard.len(), 2);
        match &markup.inline_keyboard[1][0].kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "list:Кухня"),
            _ => panic!("expected callback data"),
        }
    }

    #[test]
    fn main_menu_is_a_reply_keyboard() {
        let ReplyMarkup::Keyboard(markup) = markup(&Keyboard::MainMenu) else {
            panic!("expected reply keyboard");
        };
        assert_eq!(markup.keyboard.len(), 5);
        assert_eq!(markup.keyboard[4][1].text, "↩️ Главное меню");
    }

    #[tokio::test]
    async fn edit_falls_back_to_send() -> anyhow::Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/EditMessageText"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ok":false,"error_code":400,"description":"Bad Request: message to edit not found"}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/botTEST/SendMessage"))
            .and(body_string_contains("hello"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ok":true,"result":{"message_id":5,"date":0,"chat":{"id":1,"type":"private"}}}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build()?;
        let bot = Bot::with_client("TEST", client).set_api_url(reqwest::Url::parse(&server.uri())?);
        edit_or_send(&bot, ChatId(1), Some(MessageId(2)), Reply::text("hello")).await?;
        server.verify().await;
        Ok(())
    }
}
