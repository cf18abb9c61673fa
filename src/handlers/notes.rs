use crate::db::Note;
use crate::flow::{Action, Button, Keyboard, Reply};
use crate::messages::{self, NEW_NOTE_LABEL, NO_NOTES};

/// How many notes `/notes` shows.
pub const NOTES_LIMIT: i64 = 20;

pub fn recent(notes: &[Note]) -> Reply {
    let new_note = Button::new(NEW_NOTE_LABEL, Action::NewNote);
    if notes.is_empty() {
        return Reply::text(NO_NOTES).with_keyboard(Keyboard::single(new_note));
    }
    let deletes = notes
        .iter()
        .map(|note| Button::new(format!("🗑 {}", note.id), Action::DeleteNote(note.id)))
        .collect();
    let mut rows = Keyboard::rows(deletes, 4);
    rows.push(vec![new_note]);
    Reply::text(messages::format_notes(notes)).with_keyboard(Keyboard::Inline(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text_utils::{MAX_MESSAGE_CHARS, MAX_NOTE_CHARS};

    #[test]
    fn notes_are_escaped_and_deletable() {
        let notes = vec![Note {
            id: 3,
            text: "купить <саморезы>".into(),
            created_at: 0,
        }];
        let reply = recent(&notes);
        assert!(reply.text.contains("3. купить &lt;саморезы&gt;"));
        let Some(Keyboard::Inline(rows)) = reply.keyboard else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows[0][0].action, Action::DeleteNote(3));
        assert_eq!(rows[1][0].action, Action::NewNote);
    }

    #[test]
    fn full_page_of_long_notes_fits_one_message() {
        let notes: Vec<Note> = (1..=NOTES_LIMIT)
            .map(|id| Note {
                id,
                text: "я".repeat(MAX_NOTE_CHARS),
                created_at: 0,
            })
            .collect();
        let reply = recent(&notes);
        assert!(reply.text.chars().count() <= MAX_MESSAGE_CHARS);
        assert!(reply.text.contains('…'));
        let Some(Keyboard::Inline(rows)) = reply.keyboard else {
            panic!("expected inline keyboard");
        };
        assert_eq!(rows.iter().map(Vec::len).sum::<usize>(), NOTES_LIMIT as usize + 1);
    }
}
