//! Stateless catalog browsing: categories, their materials, one material card.

use crate::catalog::Catalog;
use crate::flow::{Action, Button, Keyboard, Reply};
use crate::messages::{
    self, BACK_LABEL, BACK_TO_CATALOG_LABEL, CATALOG_HEADER, CATALOG_MISS, MENU_LABEL,
};

pub fn categories(catalog: &Catalog) -> Reply {
    let mut rows: Vec<Vec<Button>> = catalog
        .categories()
        .into_iter()
        .enumerate()
        .map(|(index, name)| vec![Button::new(name, Action::Category(index))])
        .collect();
    rows.push(vec![Button::new(MENU_LABEL, Action::Menu)]);
    Reply::text(CATALOG_HEADER).with_keyboard(Keyboard::Inline(rows))
}

pub fn category(catalog: &Catalog, index: usize) -> Reply {
    let Some((name, subcategories)) = catalog.category(index) else {
        return Reply::text(CATALOG_MISS).with_keyboard(back());
    };
    let mut rows: Vec<Vec<Button>> = subcategories
        .into_iter()
        .enumerate()
        .map(|(sub, label)| vec![Button::new(label, Action::Subcategory(index, sub))])
        .collect();
    rows.push(vec![Button::new(BACK_TO_CATALOG_LABEL, Action::Catalog)]);
    let title = format!("📂 <b>{}</b>", messages::escape_html(name));
    Reply::text(title).with_keyboard(Keyboard::Inline(rows))
}

pub fn material(catalog: &Catalog, category: usize, index: usize) -> Reply {
    let Some(material) = catalog.subcategory(category, index) else {
        return Reply::text(CATALOG_MISS).with_keyboard(back());
    };
    Reply::text(messages::format_material_card(&material)).with_keyboard(Keyboard::Inline(vec![
        vec![Button::new(BACK_LABEL, Action::Category(category))],
        vec![Button::new(BACK_TO_CATALOG_LABEL, Action::Catalog)],
    ]))
}

fn back() -> Keyboard {
    Keyboard::single(Button::new(BACK_TO_CATALOG_LABEL, Action::Catalog))
}
