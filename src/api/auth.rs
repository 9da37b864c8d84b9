use serde::Deserialize;

use crate::api::error::ApiError;

/// Wallet signatures are not verified cryptographically yet; a signed
/// request is recognized by this prefix.
pub const SIMULATED_SIGNATURE_PREFIX: &str = "simulated_signature_";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCredentials {
    pub wallet_address: Option<String>,
    pub signature: Option<String>,
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Returns the wallet address once the request carries a recognized signature.
pub fn verify_wallet_signature<'a>(
    wallet_address: Option<&'a str>,
    signature: Option<&str>,
) -> Result<&'a str, ApiError> {
    let (wallet, signature) = match (present(wallet_address), present(signature)) {
        (Some(wallet), Some(signature)) => (wallet, signature),
        _ => return Err(ApiError::MissingCredentials),
    };

    if !signature.starts_with(SIMULATED_SIGNATURE_PREFIX) {
        tracing::warn!("Invalid signature format for wallet: {}", wallet);
        return Err(ApiError::InvalidSignature);
    }

    tracing::info!("Wallet signature verified for: {}", wallet);
    Ok(wallet)
}

/// The caller must be the admin wallet and carry a recognized signature.
pub fn verify_admin(
    credentials: &WalletCredentials,
    admin_wallet_address: &str,
) -> Result<(), ApiError> {
    let (wallet, signature) = match (
        present(credentials.wallet_address.as_deref()),
        present(credentials.signature.as_deref()),
    ) {
        (Some(wallet), Some(signature)) => (wallet, signature),
        _ => return Err(ApiError::MissingCredentials),
    };

    if wallet != admin_wallet_address {
        tracing::warn!("Unauthorized admin access attempt from wallet: {}", wallet);
        return Err(ApiError::Forbidden);
    }
    if !signature.starts_with(SIMULATED_SIGNATURE_PREFIX) {
        tracing::warn!("Invalid admin signature format for wallet: {}", wallet);
        return Err(ApiError::InvalidSignature);
    }

    tracing::info!("Admin access verified for: {}", wallet);
    Ok(())
}
