use anyhow::Result;

use super::{unix_now, Database, UserKey};

#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub text: String,
    pub created_at: i64,
}

impl Database {
    pub async fn add_note(&self, user: UserKey, text: &str) -> Result<i64> {
        tracing::trace!(user = user.0, "Adding note");
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO notes (user_id, text, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(user.as_i64())
        .bind(text)
        .bind(unix_now())
        .fetch_one(self.pool())
        .await?;
        Ok(id)
    }

    pub async fn list_notes(&self, user: UserKey, limit: i64) -> Result<Vec<Note>> {
        tracing::trace!(user = user.0, "Listing notes");
        sqlx::query_as(
            "SELECT id, text, created_at FROM notes WHERE user_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(user.as_i64())
        .bind(limit)
        .fetch_all(self.pool())
        .await
        .map_err(Into::into)
    }

    pub async fn delete_note(&self, user: UserKey, id: i64) -> Result<bool> {
        tracing::debug!(user = user.0, note_id = id, "Deleting note");
        let result = sqlx::query("DELETE FROM notes WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user.as_i64())
            .execute(self.pool())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[tokio::test]
    async fn notes_are_per_user_and_newest_first() -> Result<()> {
        let db = open_in_memory().await?;
        let alice = UserKey(1);
        let bob = UserKey(2);

        db.add_note(alice, "Купить грунтовку").await?;
        let second = db.add_note(alice, "Замерить ванную").await?;
        db.add_note(bob, "Чужая заметка").await?;

        let notes = db.list_notes(alice, 10).await?;
        let texts: Vec<&str> = notes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["Замерить ванную", "Купить грунтовку"]);

        assert!(!db.delete_note(bob, second).await?);
        assert!(db.delete_note(alice, second).await?);
        assert_eq!(db.list_notes(alice, 10).await?.len(), 1);
        Ok(())
    }
}
