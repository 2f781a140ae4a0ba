pub mod analysis;
pub mod broadcast_cursor;
pub mod geographic_boundary;
pub mod report;
pub mod report_batch;
pub mod report_with_analysis;
