pub mod cursor_store;
pub mod report_store;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;
