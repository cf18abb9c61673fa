//! Decides what an inbound text or button press means for the current session.

use crate::flow::{Action, Input, MenuItem, State};

/// Screens that read or edit stored data without touching the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Catalog,
    Category(usize),
    Subcategory(usize, usize),
    Lists,
    List(String),
    RemoveItem(String, usize),
    ClearList(String),
    DeleteList(String),
    History,
    DeleteCalculation(i64),
    Notes,
    DeleteNote(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Drop partial input and show the main menu.
    Reset,
    View(View),
    Flow(Input),
}

fn view_for_action(action: &Action) -> Option<View> {
    let view = match action {
        Action::Catalog => View::Catalog,
        Action::Category(index) => View::Category(*index),
        Action::Subcategory(cat, sub) => View::Subcategory(*cat, *sub),
        Action::Lists => View::Lists,
        Action::OpenList(list) => View::List(list.clone()),
        Action::RemoveItem(list, index) => View::RemoveItem(list.clone(), *index),
        Action::ClearList(list) => View::ClearList(list.clone()),
        Action::DeleteList(list) => View::DeleteList(list.clone()),
        Action::DeleteCalculation(id) => View::DeleteCalculation(*id),
        Action::DeleteNote(id) => View::DeleteNote(*id),
        _ => return None,
    };
    Some(view)
}

fn view_for_menu(item: MenuItem) -> Option<View> {
    match item {
        MenuItem::Materials => Some(View::Catalog),
        MenuItem::Lists => Some(View::Lists),
        MenuItem::Notes => Some(View::Notes),
        MenuItem::History => Some(View::History),
        _ => None,
    }
}

/// Inline view buttons work from any state; menu labels only open views
/// while no flow is in progress.
pub fn route(state: &State, input: Input) -> Route {
    if input.is_main_menu() {
        return Route::Reset;
    }
    let view = match &input {
        Input::Action(action) => view_for_action(action),
        Input::Text(text) if state.is_idle() => MenuItem::from_label(text).and_then(view_for_menu),
        Input::Text(_) => None,
    };
    match view {
        Some(view) => Route::View(view),
        None => Route::Flow(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_menu_resets() {
        assert_eq!(
            route(&State::Budget, Input::Text(MenuItem::MainMenu.label().into())),
            Route::Reset
        );
        assert_eq!(route(&State::Idle, Input::Action(Action::Menu)), Route::Reset);
    }

    #[test]
    fn menu_views_only_from_idle() {
        let lists = Input::Text(MenuItem::Lists.label().into());
        assert_eq!(route(&State::Idle, lists.clone()), Route::View(View::Lists));
        assert_eq!(route(&State::NoteText, lists.clone()), Route::Flow(lists));
    }

    #[test]
    fn view_buttons_work_mid_flow() {
        assert_eq!(
            route(&State::QuickArea, Input::Action(Action::Category(2))),
            Route::View(View::Category(2))
        );
        assert_eq!(
            route(&State::Idle, Input::Action(Action::RemoveItem("Кухня".into(), 1))),
            Route::View(View::RemoveItem("Кухня".into(), 1))
        );
    }

    #[test]
    fn everything_else_goes_to_the_flow() {
        let text = Input::Text("5.2 4.8".into());
        assert_eq!(route(&State::QuickArea, text.clone()), Route::Flow(text));
        let skip = Input::Action(Action::Skip);
        assert_eq!(route(&State::RoomShape, skip.clone()), Route::Flow(skip));
    }
}
