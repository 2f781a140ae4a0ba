pub mod boundary_catalog;
pub mod error;
pub mod geometry;
pub mod models;
pub mod store;

#[cfg(test)]
mod tests;

pub use boundary_catalog::BoundaryCatalog;
pub use error::{CoreError, Result};
pub use error_location::ErrorLocation;
pub use geometry::bounding_box::BoundingBox;
pub use geometry::containment_predicate::ContainmentPredicate;
pub use geometry::geometry_adapter::to_containment_predicate;
pub use geometry::position::Position;
pub use geometry::predicate_cache::PredicateCache;
pub use models::analysis::Analysis;
pub use models::broadcast_cursor::BroadcastCursor;
pub use models::geographic_boundary::{BoundaryGeometry, GeographicBoundary};
pub use models::report::Report;
pub use models::report_batch::ReportBatch;
pub use models::report_with_analysis::ReportWithAnalysis;
pub use store::cursor_store::CursorStore;
pub use store::report_store::ReportStore;

#[cfg(any(test, feature = "test-support"))]
pub use store::memory::{InMemoryCursorStore, InMemoryReportStore};
