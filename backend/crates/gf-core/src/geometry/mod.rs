pub mod bounding_box;
pub mod containment_predicate;
pub mod geometry_adapter;
pub mod position;
pub mod predicate_cache;
