pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod server_state;
pub mod streams;


pub use error::{Result, ServerError};
pub use routes::build_router;
pub use server_state::{ServerState, StreamEntry};
pub use streams::{StreamRuntime, initialize_streams, load_boundaries};
