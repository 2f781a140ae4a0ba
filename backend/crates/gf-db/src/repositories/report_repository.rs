use crate::Result as DbErrorResult;

use gf_core::{BoundingBox, Report};

use chrono::{DateTime, Utc};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

pub struct ReportRepository;

impl ReportRepository {
    /// Insert a report and return its sequence. A `seq` of zero or less lets
    /// the database assign the next one.
    pub async fn create<'e, E>(executor: E, report: &Report) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let seq = (report.seq > 0).then_some(report.seq);

        let result = sqlx::query(
            r#"
              INSERT INTO reports (
                  seq, ts, id, team, latitude, longitude, x, y, action_id
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(seq)
        .bind(report.timestamp.timestamp())
        .bind(&report.id)
        .bind(report.team)
        .bind(report.latitude)
        .bind(report.longitude)
        .bind(report.x)
        .bind(report.y)
        .bind(&report.action_id)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn max_seq<'e, E>(executor: E) -> DbErrorResult<i64>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let max: Option<i64> = sqlx::query_scalar("SELECT MAX(seq) FROM reports")
            .fetch_one(executor)
            .await?;

        Ok(max.unwrap_or(0))
    }

    /// One page of candidates: reports after `since_seq` whose location falls
    /// in `bbox` and that have at least one analysis, ascending by sequence.
    ///
    /// The bounding box is only a prefilter. Callers apply the exact
    /// containment test.
    pub async fn find_analyzed_in_bbox<'e, E>(
        executor: E,
        since_seq: i64,
        bbox: &BoundingBox,
        page_size: i64,
    ) -> DbErrorResult<Vec<Report>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let rows = sqlx::query(
            r#"
              SELECT r.seq, r.ts, r.id, r.team, r.latitude, r.longitude,
                     r.x, r.y, r.action_id
              FROM reports r
              WHERE r.seq > ?
                AND r.latitude BETWEEN ? AND ?
                AND r.longitude BETWEEN ? AND ?
                AND EXISTS (SELECT 1 FROM report_analysis a WHERE a.seq = r.seq)
              ORDER BY r.seq ASC
              LIMIT ?
              "#,
        )
        .bind(since_seq)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .bind(page_size)
        .fetch_all(executor)
        .await?;

        rows.iter().map(report_from_row).collect()
    }

    pub async fn find_by_seq<'e, E>(executor: E, seq: i64) -> DbErrorResult<Option<Report>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        let row = sqlx::query(
            r#"
              SELECT seq, ts, id, team, latitude, longitude, x, y, action_id
              FROM reports
              WHERE seq = ?
              "#,
        )
        .bind(seq)
        .fetch_optional(executor)
        .await?;

        row.as_ref().map(report_from_row).transpose()
    }
}

fn report_from_row(row: &SqliteRow) -> DbErrorResult<Report> {
    let ts: i64 = row.try_get("ts")?;

    Ok(Report {
        seq: row.try_get("seq")?,
        timestamp: DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default(),
        id: row.try_get("id")?,
        team: row.try_get("team")?,
        latitude: row.try_get("latitude")?,
        longitude: row.try_get("longitude")?,
        x: row.try_get("x")?,
        y: row.try_get("y")?,
        action_id: row.try_get("action_id")?,
    })
}
