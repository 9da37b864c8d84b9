use std::sync::Arc;

use chrono::Utc;
use solana_sdk::{
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{Keypair, Signer},
    system_instruction,
    transaction::Transaction,
};
use spl_token::state::Mint;

use crate::services::error::ServiceError;
use crate::services::ledger::LedgerClient;
use crate::services::payment::parse_wallet;
use crate::types::models::{CreateTokenRequest, MintReceipt};

pub const DEFAULT_DECIMALS: u8 = 9;
pub const MAX_DECIMALS: u8 = 9;

pub struct TokenService {
    ledger: Arc<dyn LedgerClient>,
    network: String,
}

impl TokenService {
    pub fn new(ledger: Arc<dyn LedgerClient>, network: &str) -> Self {
        Self {
            ledger,
            network: network.to_string(),
        }
    }

    /// Prepares the SPL mint for `request`. The transaction is assembled for
    /// the creator's wallet to sign; nothing is submitted here.
    pub async fn create_token(
        &self,
        request: &CreateTokenRequest,
    ) -> Result<MintReceipt, ServiceError> {
        if request.decimals > MAX_DECIMALS {
            return Err(ServiceError::InvalidInput(format!(
                "Decimals must be at most {}, got {}",
                MAX_DECIMALS, request.decimals
            )));
        }
        let creator = parse_wallet(&request.wallet_address)?;
        tracing::info!(
            "Preparing {} ({}) on Solana {}",
            request.name,
            request.symbol,
            self.network
        );

        let mint_account = Keypair::new();
        tracing::info!("Generated mint account: {}", mint_account.pubkey());

        let lamports = self.ledger.rent_exempt_minimum(Mint::LEN).await?;
        let transaction =
            mint_transaction(&creator, &mint_account.pubkey(), lamports, request.decimals)?;
        tracing::debug!(
            "Mint transaction has {} instructions, rent {} lamports",
            transaction.message.instructions.len(),
            lamports
        );

        let token_id = mint_account.pubkey().to_string();
        let transaction_signature =
            format!("simulated_signature_{}", Utc::now().timestamp_millis());
        tracing::info!("Token created successfully: {}", token_id);

        Ok(MintReceipt {
            token_id,
            transaction_signature,
        })
    }
}

/// Account creation sized for a mint, then mint initialization with the
/// creator as both mint and freeze authority.
fn mint_transaction(
    creator: &Pubkey,
    mint: &Pubkey,
    lamports: u64,
    decimals: u8,
) -> Result<Transaction, ServiceError> {
    let create_account = system_instruction::create_account(
        creator,
        mint,
        lamports,
        Mint::LEN as u64,
        &spl_token::id(),
    );
    let initialize_mint = spl_token::instruction::initialize_mint(
        &spl_token::id(),
        mint,
        creator,
        Some(creator),
        decimals,
    )
    .map_err(|e| ServiceError::InvalidInput(format!("Failed to build mint instruction: {}", e)))?;

    Ok(Transaction::new_with_payer(
        &[create_account, initialize_mint],
        Some(creator),
    ))
}
