use crate::Result as DbErrorResult;

use gf_core::BroadcastCursor;

use chrono::{DateTime, Utc};
use sqlx::Row;

pub struct CursorRepository;

impl CursorRepository {
    pub async fn find<'e, E>(executor: E, stream_id: &str) -> DbErrorResult<Option<BroadcastCursor>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(
            r#"
              SELECT stream_id, last_seq, updated_at
              FROM broadcast_cursors
              WHERE stream_id = ?
              "#,
        )
        .bind(stream_id)
        .fetch_optional(executor)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let updated_at: i64 = row.try_get("updated_at")?;

        Ok(Some(BroadcastCursor {
            stream_id: row.try_get("stream_id")?,
            last_seq: row.try_get("last_seq")?,
            updated_at: DateTime::<Utc>::from_timestamp(updated_at, 0).unwrap_or_default(),
        }))
    }

    /// Insert the cursor unless the stream already has one.
    pub async fn create_if_absent<'e, E>(
        executor: E,
        stream_id: &str,
        seq: i64,
    ) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              INSERT INTO broadcast_cursors (stream_id, last_seq, updated_at)
              VALUES (?, ?, ?)
              ON CONFLICT (stream_id) DO NOTHING
              "#,
        )
        .bind(stream_id)
        .bind(seq)
        .bind(Utc::now().timestamp())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Compare-and-set: stores `seq` only when it exceeds the stored value.
    /// Returns whether the row changed.
    pub async fn advance<'e, E>(executor: E, stream_id: &str, seq: i64) -> DbErrorResult<bool>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let result = sqlx::query(
            r#"
              INSERT INTO broadcast_cursors (stream_id, last_seq, updated_at)
              VALUES (?, ?, ?)
              ON CONFLICT (stream_id) DO UPDATE
                  SET last_seq = excluded.last_seq,
                      updated_at = excluded.updated_at
                  WHERE excluded.last_seq > broadcast_cursors.last_seq
              "#,
        )
        .bind(stream_id)
        .bind(seq)
        .bind(Utc::now().timestamp())
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
