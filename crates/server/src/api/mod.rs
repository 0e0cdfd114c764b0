pub mod downloads;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod middleware;
pub mod routes;

pub use error::ErrorResponse;
pub use routes::create_router;
