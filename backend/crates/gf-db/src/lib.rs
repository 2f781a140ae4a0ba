pub mod connection;
pub mod error;
pub mod repositories;
pub mod stores;

pub use connection::pool::{create_pool, run_migrations};
pub use error::{DbError, Result};
pub use repositories::analysis_repository::AnalysisRepository;
pub use repositories::cursor_repository::CursorRepository;
pub use repositories::report_repository::ReportRepository;
pub use stores::sqlite_cursor_store::SqliteCursorStore;
pub use stores::sqlite_report_store::SqliteReportStore;
