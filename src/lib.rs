pub mod api;
pub mod config;
pub mod services;
pub mod types;

pub use config::Config;
pub use services::{Aggregator, PaymentService, TokenService};
pub use types::*;
