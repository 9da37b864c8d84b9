use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;

use super::auth::{verify_admin, verify_wallet_signature, WalletCredentials};
use super::error::ApiError;
use super::state::AppState;
use super::validation::{
    validate_token_creation, validate_wallet_address, CreateTokenBody, WalletBody,
};
use crate::services::admin;
use crate::types::models::{
    AdminStats, BalanceCheck, FeeReceipt, FeeTransactionRecord, FeedKind, TokenSummary,
};

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: None,
            data,
        })
    }

    fn with_message(message: &'static str, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: Some(message),
            data,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedToken {
    pub token_id: String,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub transaction_signature: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionReport {
    pub transactions: Vec<FeeTransactionRecord>,
    pub total_fees: f64,
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::Validation(e.body_text()))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}

pub async fn trending_tokens(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<TokenSummary>>> {
    ApiResponse::ok(state.aggregator.list(FeedKind::Trending).await)
}

pub async fn new_tokens(State(state): State<AppState>) -> Json<ApiResponse<Vec<TokenSummary>>> {
    ApiResponse::ok(state.aggregator.list(FeedKind::New).await)
}

pub async fn create_token(
    State(state): State<AppState>,
    body: Result<Json<CreateTokenBody>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CreatedToken>>), ApiError> {
    let body = json_body(body)?;
    verify_wallet_signature(body.wallet_address.as_deref(), body.signature.as_deref())?;
    let request = validate_token_creation(&body)?;

    tracing::info!("Collecting token creation fee from wallet: {}", request.wallet_address);
    let fee = state
        .payments
        .collect_fee(&request.wallet_address)
        .map_err(|e| state.failure("Failed to collect token creation fee", e))?;

    tracing::info!(
        "Creating token: {} ({}) for wallet: {}, fee reference {}",
        request.name,
        request.symbol,
        request.wallet_address,
        fee.transaction_signature
    );
    let minted = state
        .tokens
        .create_token(&request)
        .await
        .map_err(|e| state.failure("Token creation failed", e))?;

    let created = CreatedToken {
        token_id: minted.token_id,
        name: request.name,
        symbol: request.symbol,
        decimals: request.decimals,
        transaction_signature: minted.transaction_signature,
    };
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message("Token created successfully", created),
    ))
}

pub async fn collect_fee(
    State(state): State<AppState>,
    body: Result<Json<WalletCredentials>, JsonRejection>,
) -> Result<Json<ApiResponse<FeeReceipt>>, ApiError> {
    let credentials = json_body(body)?;
    let wallet = verify_wallet_signature(
        credentials.wallet_address.as_deref(),
        credentials.signature.as_deref(),
    )?;

    tracing::info!("Processing fee payment from wallet: {}", wallet);
    let receipt = state
        .payments
        .collect_fee(wallet)
        .map_err(|e| state.failure("Failed to collect fee", e))?;

    Ok(ApiResponse::with_message("Fee collected successfully", receipt))
}

pub async fn verify_balance(
    State(state): State<AppState>,
    body: Result<Json<WalletBody>, JsonRejection>,
) -> Result<Json<ApiResponse<BalanceCheck>>, ApiError> {
    let body = json_body(body)?;
    let wallet = validate_wallet_address(body.wallet_address.as_deref())?;

    tracing::info!("Verifying balance for wallet: {}", wallet);
    let check = state
        .payments
        .verify_balance(&wallet)
        .await
        .map_err(|e| state.failure("Failed to verify wallet balance", e))?;

    Ok(ApiResponse::ok(check))
}

fn require_admin(state: &AppState, credentials: &WalletCredentials) -> Result<(), ApiError> {
    let admin_wallet = state
        .admin_wallet_address
        .as_deref()
        .ok_or_else(|| state.internal("Admin wallet address not configured"))?;
    verify_admin(credentials, admin_wallet)
}

pub async fn admin_transactions(
    State(state): State<AppState>,
    Query(credentials): Query<WalletCredentials>,
) -> Result<Json<ApiResponse<TransactionReport>>, ApiError> {
    require_admin(&state, &credentials)?;

    let transactions = admin::fee_transactions(Utc::now());
    let total_fees = admin::total_fees(&transactions);
    tracing::info!("Admin fetched transaction history");

    Ok(ApiResponse::ok(TransactionReport {
        transactions,
        total_fees,
    }))
}

pub async fn admin_stats(
    State(state): State<AppState>,
    Query(credentials): Query<WalletCredentials>,
) -> Result<Json<ApiResponse<AdminStats>>, ApiError> {
    require_admin(&state, &credentials)?;
    tracing::info!("Admin fetched dashboard statistics");
    Ok(ApiResponse::ok(admin::dashboard_stats()))
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}
