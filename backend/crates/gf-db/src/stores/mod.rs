pub mod sqlite_cursor_store;
pub mod sqlite_report_store;
