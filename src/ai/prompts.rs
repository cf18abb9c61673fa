//! Prompt text sent to the model.

/// Placeholder replaced with the user's question.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

pub const ADVISOR_PROMPT: &str = "Ты — опытный прораб и консультант по ремонту и строительным материалам. \
Отвечай по-русски, кратко и по делу, с практическими советами и примерными расчётами, если они уместны.\n\
Вопрос: {question}\n\
Ответ:";

pub fn build_prompt(question: &str) -> String {
    ADVISOR_PROMPT.replace(QUESTION_PLACEHOLDER, question.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_is_interpolated() {
        let prompt = build_prompt("  Сколько сохнет стяжка? ");
        assert!(prompt.contains("Вопрос: Сколько сохнет стяжка?\n"));
        assert!(prompt.ends_with("Ответ:"));
        assert!(!prompt.contains(QUESTION_PLACEHOLDER));
    }
}
