use crate::Result as DbErrorResult;

use gf_core::Analysis;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite};

pub struct AnalysisRepository;

impl AnalysisRepository {
    pub async fn create<'e, E>(executor: E, analysis: &Analysis) -> DbErrorResult<()>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        sqlx::query(
            r#"
              INSERT INTO report_analysis (
                  seq, source, analysis_text, title, description,
                  litter_probability, hazard_probability, severity_level,
                  summary, language, created_at
              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
              "#,
        )
        .bind(analysis.seq)
        .bind(&analysis.source)
        .bind(&analysis.analysis_text)
        .bind(&analysis.title)
        .bind(&analysis.description)
        .bind(analysis.litter_probability)
        .bind(analysis.hazard_probability)
        .bind(analysis.severity_level)
        .bind(&analysis.summary)
        .bind(&analysis.language)
        .bind(analysis.created_at.timestamp())
        .execute(executor)
        .await?;

        Ok(())
    }

    /// All analyses for the given sequences, ordered by sequence then language.
    pub async fn find_by_seqs<'e, E>(executor: E, seqs: &[i64]) -> DbErrorResult<Vec<Analysis>>
    where
        E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
    {
        if seqs.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(
            r#"
              SELECT seq, source, analysis_text, title, description,
                     litter_probability, hazard_probability, severity_level,
                     summary, language, created_at
              FROM report_analysis
              WHERE seq IN ("#,
        );
        let mut separated = query.separated(", ");
        for seq in seqs {
            separated.push_bind(*seq);
        }
        separated.push_unseparated(") ORDER BY seq ASC, language ASC, source ASC");

        let rows = query.build().fetch_all(executor).await?;

        rows.iter().map(analysis_from_row).collect()
    }
}

fn analysis_from_row(row: &SqliteRow) -> DbErrorResult<Analysis> {
    let created_at: i64 = row.try_get("created_at")?;

    Ok(Analysis {
        seq: row.try_get("seq")?,
        source: row.try_get("source")?,
        analysis_text: row.try_get("analysis_text")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        litter_probability: row.try_get("litter_probability")?,
        hazard_probability: row.try_get("hazard_probability")?,
        severity_level: row.try_get("severity_level")?,
        summary: row.try_get("summary")?,
        language: row.try_get("language")?,
        created_at: DateTime::<Utc>::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}
