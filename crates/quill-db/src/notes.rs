//! PostgreSQL note store implementation.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::debug;

use quill_core::{CreateNoteRequest, Error, Note, NoteStore, Result};

/// PostgreSQL implementation of `NoteStore`.
///
/// Expected schema:
///
/// ```sql
/// CREATE TABLE note (
///     id          BIGSERIAL PRIMARY KEY,
///     owner_id    TEXT NOT NULL,
///     name        TEXT NOT NULL,
///     content     TEXT NOT NULL DEFAULT '',
///     image_url   TEXT NOT NULL DEFAULT '',
///     created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
///     updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
/// );
/// ```
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row_to_note(row: sqlx::postgres::PgRow) -> Note {
    Note {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        content: row.get("content"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, req: CreateNoteRequest) -> Result<i64> {
        let row = sqlx::query(
            "INSERT INTO note (owner_id, name, content, image_url)
             VALUES ($1, $2, '', $3)
             RETURNING id",
        )
        .bind(&req.owner_id)
        .bind(&req.name)
        .bind(&req.image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let id: i64 = row.get("id");
        debug!(note_id = id, "Created note");
        Ok(id)
    }

    async fn fetch(&self, id: i64) -> Result<Note> {
        // Fetch all matches so a duplicated id (a broken uniqueness
        // invariant) surfaces as an error instead of an arbitrary row.
        let rows = sqlx::query(
            "SELECT id, owner_id, name, content, image_url, created_at, updated_at
             FROM note WHERE id = $1",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        match rows.len() {
            0 => Err(Error::NoteNotFound(id)),
            1 => Ok(map_row_to_note(rows.into_iter().next().expect("len checked"))),
            n => Err(Error::Internal(format!(
                "note id {} matched {} rows; store uniqueness violated",
                id, n
            ))),
        }
    }

    async fn update_content(&self, id: i64, content: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE note SET content = $2, updated_at = now() WHERE id = $1",
        )
        .bind(id)
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NoteNotFound(id));
        }

        debug!(note_id = id, content_len = content.len(), "Updated note content");
        Ok(())
    }
}
