use std::sync::Arc;

use crate::api::error::ApiError;
use crate::services::{Aggregator, PaymentService, ServiceError, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub payments: Arc<PaymentService>,
    pub tokens: Arc<TokenService>,
    pub admin_wallet_address: Option<String>,
    pub expose_error_details: bool,
}

impl AppState {
    /// Logs a failed operation and turns it into the response the caller sees.
    pub fn failure(&self, message: &'static str, error: ServiceError) -> ApiError {
        tracing::error!("{}: {}", message, error);
        ApiError::Operation {
            message,
            detail: self.expose_error_details.then(|| error.to_string()),
        }
    }

    pub fn internal(&self, reason: &str) -> ApiError {
        tracing::error!("Internal error: {}", reason);
        ApiError::Internal {
            detail: self.expose_error_details.then(|| reason.to_string()),
        }
    }
}
