use thiserror::Error;
use tracing::trace;

use crate::calc::positive;

/// Longest list name accepted; list names travel inside callback data.
pub const MAX_LIST_NAME_CHARS: usize = 20;
pub const MAX_ITEM_NAME_CHARS: usize = 64;
pub const MAX_NOTE_CHARS: usize = 1000;
pub const MAX_QUESTION_CHARS: usize = 1000;
/// Telegram's limit for one message after entity parsing.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Why a piece of user input was not accepted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Нужно ввести число.")]
    NotANumber,
    #[error("Значение должно быть больше нуля.")]
    NotPositive,
    #[error("Введите два числа через пробел.")]
    ExpectedTwoNumbers,
    #[error("Текст не должен быть пустым.")]
    Empty,
    #[error("Слишком длинный текст (максимум {0} символов).")]
    TooLong(usize),
    #[error("Выберите вариант с помощью кнопок.")]
    UnexpectedChoice,
    #[error("Ожидается текстовый ответ.")]
    ExpectedText,
    #[error("Скидка должна быть от 0 до 100 %.")]
    PercentOutOfRange,
    #[error("Материал «{0}» не найден. Проверьте название.")]
    UnknownMaterial(String),
    #[error("Сначала завершите ввод или нажмите «↩️ Главное меню».")]
    MenuDuringInput,
    #[error("Слишком большое значение, проверьте ввод.")]
    OutOfRange,
}

/// Parse a decimal number, accepting a comma as the decimal separator.
pub fn parse_number(text: &str) -> Result<f64, InputError> {
    let cleaned = text.trim().replace(',', ".");
    trace!(?cleaned, "Parsing number");
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(InputError::NotANumber)
}

pub fn parse_positive(text: &str) -> Result<f64, InputError> {
    positive(parse_number(text)?)
}

/// Parse two whitespace separated positive numbers such as `"5.2 4.8"`.
pub fn parse_two_numbers(text: &str) -> Result<(f64, f64), InputError> {
    let parts: Vec<&str> = text.split_whitespace().collect();
    let [first, second] = parts.as_slice() else {
        return Err(InputError::ExpectedTwoNumbers);
    };
    let first = parse_number(first).map_err(|_| InputError::ExpectedTwoNumbers)?;
    let second = parse_number(second).map_err(|_| InputError::ExpectedTwoNumbers)?;
    Ok((positive(first)?, positive(second)?))
}

/// Split `"Ламинат 25"` into the material name and a positive quantity.
pub fn parse_material_and_quantity(text: &str) -> Option<(String, f64)> {
    let (name, number) = text.trim().rsplit_once(char::is_whitespace)?;
    let quantity = parse_positive(number).ok()?;
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some((name.to_string(), quantity))
    }
}

/// Parse a quantity with an optional trailing unit: `"10"`, `"10 м²"`, `"3,5 рулона"`.
pub fn parse_quantity(text: &str) -> Result<(f64, Option<String>), InputError> {
    let trimmed = text.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);
    if number.is_empty() {
        return Err(InputError::NotANumber);
    }
    let quantity = parse_positive(number)?;
    let unit = unit.trim();
    let unit = (!unit.is_empty()).then(|| unit.to_string());
    Ok((quantity, unit))
}

/// A discount in percent; `0 <= value < 100`.
pub fn parse_percent(text: &str) -> Result<f64, InputError> {
    let value = parse_number(text.trim().trim_end_matches('%'))?;
    if (0.0..100.0).contains(&value) {
        Ok(value)
    } else {
        Err(InputError::PercentOutOfRange)
    }
}

/// Trim free text and enforce a length limit.
pub fn parse_free_text(text: &str, max_chars: usize) -> Result<String, InputError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }
    if trimmed.chars().count() > max_chars {
        return Err(InputError::TooLong(max_chars));
    }
    Ok(trimmed.to_string())
}

/// Cut `text` to `max_chars` characters, marking the cut with `…`.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a number without a trailing `.0` for whole values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("стяжка", 10), "стяжка");
        assert_eq!(truncate_chars("стяжка", 3), "стя…");
    }

    #[test]
    fn parses_comma_decimals() {
        assert_eq!(parse_number("5,2"), Ok(5.2));
        assert_eq!(parse_number(" 4.8 "), Ok(4.8));
        assert_eq!(parse_number("abc"), Err(InputError::NotANumber));
        assert_eq!(parse_number("inf"), Err(InputError::NotANumber));
    }

    #[test]
    fn two_numbers_need_exactly_two_positive_values() {
        assert_eq!(parse_two_numbers("5.2 4.8"), Ok((5.2, 4.8)));
        assert_eq!(parse_two_numbers("5.2"), Err(InputError::ExpectedTwoNumbers));
        assert_eq!(parse_two_numbers("5 x"), Err(InputError::ExpectedTwoNumbers));
        assert_eq!(parse_two_numbers("5 0"), Err(InputError::NotPositive));
    }

    #[test]
    fn material_and_quantity_split_on_last_space() {
        assert_eq!(
            parse_material_and_quantity("Штукатурка (гипсовая) 12,5"),
            Some(("Штукатурка (гипсовая)".to_string(), 12.5))
        );
        assert_eq!(parse_material_and_quantity("Ламинат"), None);
        assert_eq!(parse_material_and_quantity("Ламинат -3"), None);
    }

    #[test]
    fn quantity_with_optional_unit() {
        assert_eq!(parse_quantity("10"), Ok((10.0, None)));
        assert_eq!(parse_quantity("10 м²"), Ok((10.0, Some("м²".to_string()))));
        assert_eq!(parse_quantity("3,5шт"), Ok((3.5, Some("шт".to_string()))));
        assert_eq!(parse_quantity("много"), Err(InputError::NotANumber));
        assert_eq!(parse_quantity("0 шт"), Err(InputError::NotPositive));
    }

    #[test]
    fn percent_bounds() {
        assert_eq!(parse_percent("10%"), Ok(10.0));
        assert_eq!(parse_percent("0"), Ok(0.0));
        assert_eq!(parse_percent("100"), Err(InputError::PercentOutOfRange));
        assert_eq!(parse_percent("-1"), Err(InputError::PercentOutOfRange));
    }

    #[test]
    fn free_text_limits() {
        assert_eq!(parse_free_text("  Кухня ", 20), Ok("Кухня".to_string()));
        assert_eq!(parse_free_text("   ", 20), Err(InputError::Empty));
        assert_eq!(parse_free_text(&"я".repeat(21), 20), Err(InputError::TooLong(20)));
    }

    #[test]
    fn number_formatting() {
        assert_eq!(format_number(25.0), "25");
        assert_eq!(format_number(24.96), "24.96");
        assert_eq!(format_number(2.5), "2.5");
    }

    #[test]
    fn capitalize_handles_cyrillic() {
        assert_eq!(capitalize_first("клей"), "Клей");
        assert_eq!(capitalize_first(""), "");
    }
}
