pub mod analysis_repository;
pub mod cursor_repository;
pub mod report_repository;
