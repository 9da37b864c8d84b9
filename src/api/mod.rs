pub mod auth;
pub mod error;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod validation;

pub use error::ApiError;
pub use rate_limit::api_rate_limiter;
pub use routes::{cors_layer, create_router};
pub use state::AppState;
