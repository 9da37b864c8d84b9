use serde::Deserialize;

use crate::api::error::ApiError;
use crate::services::token::{DEFAULT_DECIMALS, MAX_DECIMALS};
use crate::types::models::CreateTokenRequest;

const MAX_NAME_CHARS: usize = 50;
const MAX_SYMBOL_CHARS: usize = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenBody {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<i64>,
    pub wallet_address: Option<String>,
    pub signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBody {
    pub wallet_address: Option<String>,
}

fn bounded_text(value: Option<&str>, label: &str, max_chars: usize) -> Result<String, ApiError> {
    let value = value.unwrap_or_default();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{} is required", label)));
    }
    if value.chars().count() > max_chars {
        return Err(ApiError::Validation(format!(
            "{} must be less than {} characters",
            label, max_chars
        )));
    }
    Ok(value.to_string())
}

pub fn validate_token_creation(body: &CreateTokenBody) -> Result<CreateTokenRequest, ApiError> {
    let name = bounded_text(body.name.as_deref(), "Token name", MAX_NAME_CHARS)?;
    let symbol = bounded_text(body.symbol.as_deref(), "Token symbol", MAX_SYMBOL_CHARS)?;

    let decimals = match body.decimals {
        None => DEFAULT_DECIMALS,
        Some(d) if d < 0 => {
            return Err(ApiError::Validation(
                "Decimals must be at least 0".to_string(),
            ))
        }
        Some(d) if d > MAX_DECIMALS as i64 => {
            return Err(ApiError::Validation(format!(
                "Decimals must be less than {}",
                MAX_DECIMALS + 1
            )))
        }
        Some(d) => d as u8,
    };

    let wallet_address = validate_wallet_address(body.wallet_address.as_deref())?;
    if body.signature.as_deref().map_or(true, str::is_empty) {
        return Err(ApiError::Validation("Signature is required".to_string()));
    }

    Ok(CreateTokenRequest {
        name,
        symbol,
        decimals,
        wallet_address,
    })
}

pub fn validate_wallet_address(wallet_address: Option<&str>) -> Result<String, ApiError> {
    match wallet_address.map(str::trim) {
        Some(wallet) if !wallet.is_empty() => Ok(wallet.to_string()),
        _ => Err(ApiError::Validation("Wallet address is required".to_string())),
    }
}
