/// Entries of the persistent main-menu keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    QuickArea,
    Room,
    Materials,
    Cost,
    Budget,
    Lists,
    Notes,
    History,
    Ask,
    MainMenu,
}

impl MenuItem {
    pub const LAYOUT: [&'static [MenuItem]; 5] = [
        &[MenuItem::QuickArea, MenuItem::Room],
        &[MenuItem::Materials, MenuItem::Cost],
        &[MenuItem::Budget, MenuItem::Lists],
        &[MenuItem::Notes, MenuItem::History],
        &[MenuItem::Ask, MenuItem::MainMenu],
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::QuickArea => "📐 Рассчитать площадь",
            MenuItem::Room => "🏠 Расчёт комнаты",
            MenuItem::Materials => "🔍 Выбрать материалы",
            MenuItem::Cost => "💰 Оценить стоимость",
            MenuItem::Budget => "💵 Подбор по бюджету",
            MenuItem::Lists => "🛒 Списки покупок",
            MenuItem::Notes => "📝 Заметки",
            MenuItem::History => "📚 История расчётов",
            MenuItem::Ask => "🤖 Спросить ИИ",
            MenuItem::MainMenu => "↩️ Главное меню",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        MenuItem::LAYOUT
            .iter()
            .flat_map(|row| row.iter().copied())
            .find(|item| item.label() == text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_label_resolves() {
        for item in MenuItem::LAYOUT.iter().flat_map(|row| row.iter().copied()) {
            assert_eq!(MenuItem::from_label(item.label()), Some(item));
        }
        assert_eq!(MenuItem::from_label("Ламинат 25"), None);
    }
}
