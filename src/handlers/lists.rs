use crate::flow::{Action, Button, Keyboard, Reply};
use crate::messages::{
    self, ADD_ITEM_LABEL, BACK_TO_LISTS_LABEL, CLEAR_LIST_LABEL, DELETE_LIST_LABEL,
    LIST_NOT_FOUND, LIST_VIEW_LIMIT, NEW_LIST_LABEL, NO_LISTS,
};
use crate::shopping_list::ShoppingItem;

/// All lists of a user, one button each.
pub fn overview(lists: &[(String, usize)]) -> Reply {
    let new_list = vec![Button::new(NEW_LIST_LABEL, Action::NewList)];
    if lists.is_empty() {
        return Reply::text(NO_LISTS).with_keyboard(Keyboard::Inline(vec![new_list]));
    }
    let mut rows: Vec<Vec<Button>> = lists
        .iter()
        .take(LIST_VIEW_LIMIT)
        .map(|(name, count)| {
            vec![Button::new(
                format!("{name} ({count})"),
                Action::OpenList(name.clone()),
            )]
        })
        .collect();
    rows.push(new_list);
    Reply::text(messages::format_lists_overview(lists)).with_keyboard(Keyboard::Inline(rows))
}

/// One list with a remove button per shown item.
pub fn open(name: &str, items: Option<&[ShoppingItem]>) -> Reply {
    let Some(items) = items else {
        return Reply::text(LIST_NOT_FOUND)
            .with_keyboard(Keyboard::single(Button::new(BACK_TO_LISTS_LABEL, Action::Lists)));
    };
    let mut rows: Vec<Vec<Button>> = items
        .iter()
        .take(LIST_VIEW_LIMIT)
        .enumerate()
        .map(|(index, item)| {
            vec![Button::new(
                format!("❌ {}", item.name),
                Action::RemoveItem(name.to_string(), index),
            )]
        })
        .collect();
    rows.push(vec![
        Button::new(ADD_ITEM_LABEL, Action::AddItem(name.to_string())),
        Button::new(CLEAR_LIST_LABEL, Action::ClearList(name.to_string())),
    ]);
    rows.push(vec![
        Button::new(DELETE_LIST_LABEL, Action::DeleteList(name.to_string())),
        Button::new(BACK_TO_LISTS_LABEL, Action::Lists),
    ]);
    Reply::text(messages::format_list(name, items)).with_keyboard(Keyboard::Inline(rows))
}
