//! Transport-neutral description of an outbound message.

use super::action::Action;
use super::menu::MenuItem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub action: Action,
}

impl Button {
    pub fn new(label: impl Into<String>, action: Action) -> Self {
        Self {
            label: label.into(),
            action,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Persistent reply keyboard with the main menu labels.
    MainMenu,
    /// Inline buttons under the message.
    Inline(Vec<Vec<Button>>),
}

impl Keyboard {
    /// Lay buttons out `per_row` to a row.
    pub fn grid(buttons: Vec<Button>, per_row: usize) -> Self {
        Keyboard::Inline(Self::rows(buttons, per_row))
    }

    pub fn rows(buttons: Vec<Button>, per_row: usize) -> Vec<Vec<Button>> {
        buttons
            .chunks(per_row.max(1))
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn single(button: Button) -> Self {
        Keyboard::Inline(vec![vec![button]])
    }

    /// Labels of a main-menu keyboard, row by row.
    pub fn main_menu_rows() -> Vec<Vec<&'static str>> {
        MenuItem::LAYOUT
            .iter()
            .map(|row| row.iter().map(|item| item.label()).collect())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    pub fn main_menu(text: impl Into<String>) -> Self {
        Self::text(text).with_keyboard(Keyboard::MainMenu)
    }

    /// Put `text` above this reply, keeping its keyboard.
    pub fn prefixed(mut self, text: &str) -> Self {
        self.text = format!("{text}\n\n{}", self.text);
        self
    }
}
