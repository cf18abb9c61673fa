//! Shared text sent by the bot.
//!
//! Keep all user-facing strings in this module so they stay in one place and are
//! easy to update or translate.

use crate::calc::{Deduction, MaterialEstimate, Plan, RoomReport, RoomShape};
use crate::catalog::Material;
use crate::db::{CalculationSummary, Note, SavedCalculation};
use crate::shopping_list::ShoppingItem;
use crate::text_utils::{format_number, truncate_chars};

/// Notes are shown shortened so that a full `/notes` page fits one message.
pub const NOTE_PREVIEW_CHARS: usize = 150;
/// Rows shown for one list or for the list overview; keeps text and buttons
/// within Telegram's message limits.
pub const LIST_VIEW_LIMIT: usize = 40;

pub const WELCOME: &str = "👷 Привет! Я СтройПомощник.\n\
     Помогу посчитать площадь и объём помещения, подобрать материалы, \
     оценить стоимость и вести списки покупок.\n\n\
     Выберите действие в меню ниже.";

pub const HELP_TEXT: &str = "<b>Что я умею:</b>\n\
     📐 Рассчитать площадь: быстрый расчёт по длине и ширине.\n\
     🏠 Расчёт комнаты: форма, размеры, высота и проёмы.\n\
     🔍 Выбрать материалы: каталог с ценами и брендами.\n\
     💰 Оценить стоимость: количество материала и сумма со скидкой.\n\
     💵 Подбор по бюджету: материалы не дороже заданной цены.\n\
     🛒 Списки покупок, 📝 Заметки, 📚 История расчётов.\n\
     🤖 Спросить ИИ: ответ на вопрос о ремонте.\n\n\
     <b>Команды:</b>\n\
     /menu - главное меню (прерывает текущий ввод).\n\
     /cancel - отменить текущий ввод.\n\
     /lists - все списки покупок.\n\
     /list &lt;название&gt; - открыть список.\n\
     /history - последние расчёты.\n\
     /calc &lt;номер&gt; - показать расчёт.\n\
     /delcalc &lt;номер&gt; - удалить расчёт.\n\
     /notes - заметки.\n\
     /ask &lt;вопрос&gt; - спросить ИИ.\n\
     /info - информация о сборке.";

pub const MAIN_MENU_TEXT: &str = "Главное меню. Выберите действие:";
pub const IDLE_HINT: &str = "Не понял запрос. Выберите действие в меню или отправьте /help.";
pub const GENERIC_FAILURE: &str = "😔 Что-то пошло не так. Попробуйте ещё раз.";
pub const UNKNOWN_ACTION: &str = "Эта кнопка больше не действует.";

pub const QUICK_AREA_PROMPT: &str = "Введите длину и ширину комнаты в метрах через пробел, например: 5.2 4.8";
pub const SHAPE_PROMPT: &str = "Выберите форму комнаты:";
pub const UNIT_PROMPT: &str = "В каких единицах будете вводить размеры?";
pub const HEIGHT_PROMPT_SUFFIX: &str = "(можно пропустить)";
pub const DEDUCTION_PROMPT: &str = "Добавить проём (окно, дверь)? Выберите тип или нажмите «Готово».";
pub const DEDUCTIONS_DONE_LABEL: &str = "✅ Готово";
pub const SKIP_LABEL: &str = "⏭ Пропустить";
pub const MENU_LABEL: &str = "↩️ Меню";

pub const BUDGET_PROMPT: &str = "Введите бюджет на единицу материала в рублях:";
pub const COST_MATERIAL_PROMPT: &str =
    "Выберите материал или отправьте «название количество», например: Ламинат 25";
pub const DISCOUNT_PROMPT: &str = "Укажите скидку в процентах или пропустите:";

pub const LIST_NAME_PROMPT: &str = "Введите название нового списка (до 20 символов):";
pub const ITEM_QUANTITY_PROMPT: &str = "Сколько нужно? Например: 10 или 10 м². Можно пропустить.";
pub const NOTE_PROMPT: &str = "Напишите текст заметки:";
pub const AI_QUESTION_PROMPT: &str = "Задайте вопрос о ремонте или материалах:";

pub const AI_DISABLED: &str = "🤖 Консультант ИИ сейчас не настроен.";
pub const AI_THINKING: &str = "🤖 Думаю над ответом…";
pub const AI_BUSY: &str = "🤖 Сервис ИИ перегружен. Попробуйте позже.";
pub const AI_FAILED: &str = "🤖 Не удалось получить ответ. Попробуйте переформулировать вопрос.";

pub const NO_LISTS: &str = "У вас пока нет списков покупок.";
pub const LIST_NOT_FOUND: &str = "Такой список не найден.";
pub const LIST_EXISTS: &str = "Список с таким названием уже есть.";
pub const LIST_EMPTY: &str = "Список пуст.";
pub const NEW_LIST_LABEL: &str = "➕ Новый список";
pub const ADD_ITEM_LABEL: &str = "➕ Добавить";
pub const CLEAR_LIST_LABEL: &str = "🧹 Очистить";
pub const DELETE_LIST_LABEL: &str = "🗑 Удалить список";
pub const BACK_TO_LISTS_LABEL: &str = "⬅️ К спискам";
pub const OPEN_LIST_LABEL: &str = "🛒 Открыть";
pub const LIST_DELETED: &str = "🗑 Список удалён.";

pub const NO_HISTORY: &str = "История расчётов пуста.";
pub const CALCULATION_NOT_FOUND: &str = "Расчёт не найден.";
pub const CALCULATION_DELETED: &str = "🗑 Расчёт удалён.";
pub const DELETE_CALCULATION_LABEL: &str = "🗑 Удалить";
pub const CALC_ID_REQUIRED: &str = "Укажите номер расчёта, например: /calc 3";

pub const NO_NOTES: &str = "Заметок пока нет.";
pub const NOTE_SAVED: &str = "📝 Заметка сохранена.";
pub const NOTE_DELETED: &str = "🗑 Заметка удалена.";
pub const NOTE_NOT_FOUND: &str = "Заметка не найдена.";
pub const NEW_NOTE_LABEL: &str = "➕ Новая заметка";

pub const CATALOG_HEADER: &str = "📚 Каталог материалов. Выберите категорию:";
pub const CATALOG_MISS: &str = "Такого раздела в каталоге нет.";
pub const BACK_TO_CATALOG_LABEL: &str = "⬅️ К категориям";
pub const BACK_LABEL: &str = "⬅️ Назад";

pub fn quick_area(area: f64) -> String {
    format!("Площадь комнаты: {area:.2} м²")
}

pub fn dimension_prompt(first: bool, circle: bool, unit_symbol: &str) -> String {
    let what = match (first, circle) {
        (_, true) => "диаметр",
        (true, false) => "длину",
        (false, false) => "ширину",
    };
    format!("Введите {what} комнаты ({unit_symbol}):")
}

pub fn side_prompt(unit_symbol: &str) -> String {
    format!("Введите длину стороны комнаты ({unit_symbol}):")
}

pub fn height_prompt(unit_symbol: &str) -> String {
    format!("Введите высоту потолка ({unit_symbol}) {HEIGHT_PROMPT_SUFFIX}:")
}

pub fn deduction_dimension_prompt(kind: &str, first: bool, unit_symbol: &str) -> String {
    let what = if first { "ширину" } else { "высоту" };
    format!("{kind}: введите {what} ({unit_symbol}):")
}

pub fn cost_quantity_prompt(material: &str, unit: &str) -> String {
    format!("{material}: сколько нужно ({unit})?")
}

pub fn item_selection_prompt(list: &str) -> String {
    format!(
        "Что добавить в список «{}»? Выберите материал или напишите название.",
        escape_html(list)
    )
}

fn plan_line(plan: &Plan) -> String {
    match *plan {
        Plan::Rectangle { length, width } => {
            format!("{} × {} м", format_number(length), format_number(width))
        }
        Plan::Circle { diameter } => format!("⌀ {} м", format_number(diameter)),
    }
}

pub fn format_report(report: &RoomReport) -> String {
    let mut text = format!(
        "📐 <b>Результаты расчёта</b>\n\
         Форма: {}, {}\n\
         Площадь пола: {:.2} м²\n\
         Периметр: {:.2} м",
        report.shape.name(),
        plan_line(&report.plan),
        report.floor_area,
        report.perimeter,
    );
    if let (Some(height), Some(wall), Some(volume)) =
        (report.height, report.wall_area, report.volume)
    {
        text.push_str(&format!(
            "\nВысота: {} м\nПлощадь стен: {wall:.2} м²\nОбъём: {volume:.3} м³",
            format_number(height)
        ));
    }
    if !report.deductions.is_empty() {
        text.push_str("\nПроёмы:");
        for d in &report.deductions {
            text.push_str(&format!(
                "\n• {} {} × {} м = {:.2} м²",
                d.kind.name(),
                format_number(d.length),
                format_number(d.width),
                d.area
            ));
        }
        text.push_str(&format!("\nВычтено: {:.2} м²", report.deducted_area()));
    }
    if let Some(net) = report.net_wall_area() {
        text.push_str(&format!("\nЧистая площадь стен: {net:.2} м²"));
    }
    text
}

pub fn deduction_added(deduction: &Deduction, net_wall_area: Option<f64>) -> String {
    let mut text = format!(
        "➖ {} {:.2} м² учтено.",
        deduction.kind.name(),
        deduction.area
    );
    if let Some(net) = net_wall_area {
        text.push_str(&format!(" Чистая площадь стен: {net:.2} м²"));
    }
    text
}

pub fn calculation_saved(id: impl std::fmt::Display) -> String {
    format!("💾 Расчёт сохранён под номером {id}. Смотрите /history.")
}

pub fn format_saved_calculation(saved: &SavedCalculation) -> String {
    format!("<b>Расчёт №{}</b>\n{}", saved.id, format_report(&saved.report))
}

pub fn format_history(rows: &[CalculationSummary]) -> String {
    let mut text = String::from("📚 <b>Последние расчёты</b>\n");
    for row in rows {
        let shape = match RoomShape::from_code(&row.shape) {
            Some(shape) => shape.name(),
            None => row.shape.as_str(),
        };
        text.push_str(&format!("\n№{} · {shape} · пол {:.2} м²", row.id, row.floor_area));
        if let Some(net) = row.net_wall_area {
            text.push_str(&format!(" · стены {net:.2} м²"));
        }
    }
    text.push_str("\n\nПодробнее: /calc &lt;номер&gt;");
    text
}

pub fn format_estimate(material: &str, price: f64, unit: &str, estimate: &MaterialEstimate) -> String {
    let mut text = format!(
        "💰 <b>{}</b>\n\
         Цена: {} ₽/{unit}\n\
         Количество: {} {unit}\n\
         Стоимость: {:.2} ₽",
        escape_html(material),
        format_number(price),
        format_number(estimate.amount),
        estimate.base_cost,
    );
    if estimate.discount > 0.0 {
        text.push_str(&format!(
            "\nСкидка: −{:.2} ₽\nИтого: {:.2} ₽",
            estimate.discount, estimate.total_cost
        ));
    }
    text
}

pub fn format_budget(budget: f64, materials: &[Material<'_>]) -> String {
    if materials.is_empty() {
        return format!(
            "В пределах {} ₽ ничего не найдено. Попробуйте увеличить бюджет.",
            format_number(budget)
        );
    }
    let mut text = format!("💵 <b>Материалы до {} ₽</b>\n", format_number(budget));
    for m in materials {
        text.push_str(&format!(
            "\n• {} ({}): {} ₽/{}",
            escape_html(m.name),
            escape_html(m.category),
            format_number(m.entry.price),
            m.entry.unit
        ));
    }
    text
}

pub fn format_material_card(material: &Material<'_>) -> String {
    let mut text = format!(
        "<b>{}</b>\nКатегория: {}\nЦена: {} ₽/{}",
        escape_html(material.name),
        escape_html(material.category),
        format_number(material.entry.price),
        material.entry.unit
    );
    if !material.entry.brands.is_empty() {
        let brands = material.entry.brands.join(", ");
        text.push_str(&format!("\nБренды: {}", escape_html(&brands)));
    }
    if !material.entry.description.is_empty() {
        text.push_str(&format!("\n{}", escape_html(&material.entry.description)));
    }
    text
}

pub fn format_item(item: &ShoppingItem) -> String {
    let name = escape_html(&item.name);
    match (item.quantity, &item.unit) {
        (Some(q), Some(unit)) => format!("{name} — {} {}", format_number(q), escape_html(unit)),
        (Some(q), None) => format!("{name} — {}", format_number(q)),
        _ => name,
    }
}

pub fn format_list(name: &str, items: &[ShoppingItem]) -> String {
    let name = escape_html(name);
    if items.is_empty() {
        return format!("🛒 <b>{name}</b>\n{LIST_EMPTY}");
    }
    let mut text = format!("🛒 <b>{name}</b>\n");
    for (i, item) in items.iter().take(LIST_VIEW_LIMIT).enumerate() {
        text.push_str(&format!("\n{}. {}", i + 1, format_item(item)));
    }
    push_hidden(&mut text, items.len());
    text
}

fn push_hidden(text: &mut String, total: usize) {
    if total > LIST_VIEW_LIMIT {
        text.push_str(&format!("\n…и ещё {}", total - LIST_VIEW_LIMIT));
    }
}

pub fn format_lists_overview(lists: &[(String, usize)]) -> String {
    let mut text = String::from("🛒 <b>Ваши списки</b>\n");
    for (name, count) in lists.iter().take(LIST_VIEW_LIMIT) {
        text.push_str(&format!("\n• {} ({count})", escape_html(name)));
    }
    push_hidden(&mut text, lists.len());
    text
}

pub fn list_created(name: &str) -> String {
    format!("✅ Список «{}» создан.", escape_html(name))
}

pub fn item_added(list: &str, item: &ShoppingItem, updated: bool) -> String {
    let verb = if updated { "обновлён" } else { "добавлен" };
    format!("✅ «{}» {verb} в списке «{}».", format_item(item), escape_html(list))
}

pub fn format_notes(notes: &[Note]) -> String {
    let mut text = String::from("📝 <b>Заметки</b>\n");
    for note in notes {
        let preview = truncate_chars(&note.text, NOTE_PREVIEW_CHARS);
        text.push_str(&format!("\n{}. {}", note.id, escape_html(&preview)));
    }
    text
}

/// Escape text that is interpolated into HTML-formatted messages.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
