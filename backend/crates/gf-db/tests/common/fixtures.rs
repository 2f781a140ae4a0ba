use gf_core::{Analysis, GeographicBoundary, Report};
use gf_db::{AnalysisRepository, ReportRepository};

use sqlx::SqlitePool;

/// Square from (19, 42) to (20, 43), lon/lat.
pub fn square_boundary() -> GeographicBoundary {
    GeographicBoundary::polygon(
        "-53296",
        "Montenegro",
        vec![vec![(19.0, 42.0), (20.0, 42.0), (20.0, 43.0), (19.0, 43.0)]],
    )
}

/// Same bounding box as the square, but only its south-west half.
pub fn triangle_boundary() -> GeographicBoundary {
    GeographicBoundary::polygon(
        "triangle",
        "South-west half",
        vec![vec![(19.0, 42.0), (20.0, 42.0), (19.0, 43.0)]],
    )
}

pub const INSIDE: (f64, f64) = (42.2, 19.2);
pub const OUTSIDE: (f64, f64) = (45.0, 15.0);
/// Inside the square's bounding box but not the triangle
pub const NORTH_EAST: (f64, f64) = (42.9, 19.9);

pub async fn insert_report(pool: &SqlitePool, (latitude, longitude): (f64, f64)) -> i64 {
    let report = Report::new(0, "reporter", latitude, longitude);

    ReportRepository::create(pool, &report)
        .await
        .expect("Failed to insert report")
}

pub async fn insert_analysis(pool: &SqlitePool, seq: i64, language: &str) -> Analysis {
    let mut analysis = Analysis::new(seq, "gemini", language);
    analysis.title = format!("Report {seq} ({language})");
    analysis.litter_probability = 0.8;

    AnalysisRepository::create(pool, &analysis)
        .await
        .expect("Failed to insert analysis");

    analysis
}

/// Report plus one English analysis.
pub async fn insert_analyzed_report(pool: &SqlitePool, location: (f64, f64)) -> i64 {
    let seq = insert_report(pool, location).await;
    insert_analysis(pool, seq, "en").await;
    seq
}
