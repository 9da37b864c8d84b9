use std::str::FromStr;
use std::sync::Arc;

use chrono::Utc;
use solana_sdk::{
    native_token::lamports_to_sol, pubkey::Pubkey, system_instruction, transaction::Transaction,
};

use crate::services::error::ServiceError;
use crate::services::ledger::LedgerClient;
use crate::types::models::{BalanceCheck, FeeReceipt};

/// Token creation fee, 0.2 SOL.
pub const CREATION_FEE_LAMPORTS: u64 = 200_000_000;
/// Balance a wallet needs before it may create a token, 0.5 SOL.
pub const MINIMUM_BALANCE_LAMPORTS: u64 = 500_000_000;

pub struct PaymentService {
    ledger: Arc<dyn LedgerClient>,
    fee_recipient: Option<String>,
}

impl PaymentService {
    pub fn new(ledger: Arc<dyn LedgerClient>, fee_recipient: Option<String>) -> Self {
        Self { ledger, fee_recipient }
    }

    /// Records the creation fee as paid. The transfer is built but never
    /// signed or submitted, so every call with a configured recipient succeeds.
    pub fn collect_fee(&self, wallet_address: &str) -> Result<FeeReceipt, ServiceError> {
        let recipient = self
            .fee_recipient
            .as_deref()
            .ok_or_else(|| {
                ServiceError::Configuration("Admin wallet address not configured".to_string())
            })?;
        let recipient = Pubkey::from_str(recipient).map_err(|e| {
            ServiceError::Configuration(format!("Invalid admin wallet address: {}", e))
        })?;
        let payer = parse_wallet(wallet_address)?;

        let transaction = fee_transfer(&payer, &recipient);
        tracing::debug!(
            "Prepared fee transfer with {} instruction(s) for {}",
            transaction.message.instructions.len(),
            payer
        );

        let transaction_signature =
            format!("simulated_fee_payment_{}", Utc::now().timestamp_millis());
        let amount = lamports_to_sol(CREATION_FEE_LAMPORTS);
        tracing::info!(
            "Fee collected successfully: {} SOL from {} to {}",
            amount,
            wallet_address,
            recipient
        );

        Ok(FeeReceipt {
            amount,
            transaction_signature,
        })
    }

    pub async fn verify_balance(&self, wallet_address: &str) -> Result<BalanceCheck, ServiceError> {
        let wallet = parse_wallet(wallet_address)?;
        let lamports = self.ledger.lamports_balance(&wallet).await?;

        let has_enough_balance = lamports >= MINIMUM_BALANCE_LAMPORTS;
        let balance = lamports_to_sol(lamports);
        tracing::info!(
            "Wallet {} balance check: {} SOL, sufficient: {}",
            wallet_address,
            balance,
            has_enough_balance
        );

        Ok(BalanceCheck {
            has_enough_balance,
            balance,
            minimum_required: lamports_to_sol(MINIMUM_BALANCE_LAMPORTS),
        })
    }
}

pub(crate) fn parse_wallet(wallet_address: &str) -> Result<Pubkey, ServiceError> {
    Pubkey::from_str(wallet_address.trim()).map_err(|e| {
        ServiceError::InvalidInput(format!("Invalid wallet address {}: {}", wallet_address, e))
    })
}

fn fee_transfer(payer: &Pubkey, recipient: &Pubkey) -> Transaction {
    let instruction = system_instruction::transfer(payer, recipient, CREATION_FEE_LAMPORTS);
    Transaction::new_with_payer(&[instruction], Some(payer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use solana_sdk::system_program;

    struct FixedLedger(Result<u64, String>);

    #[async_trait]
    impl LedgerClient for FixedLedger {
        async fn lamports_balance(&self, _address: &Pubkey) -> Result<u64, ServiceError> {
            self.0.clone().map_err(ServiceError::Network)
        }

        async fn rent_exempt_minimum(&self, _data_len: usize) -> Result<u64, ServiceError> {
            Ok(1_461_600)
        }
    }

    fn service(balance: Result<u64, String>, recipient: Option<&str>) -> PaymentService {
        PaymentService::new(Arc::new(FixedLedger(balance)), recipient.map(str::to_string))
    }

    fn wallet() -> String {
        Pubkey::new_unique().to_string()
    }

    #[test]
    fn fee_always_reported_with_recipient() {
        let recipient = wallet();
        let payments = service(Ok(0), Some(&recipient));
        for _ in 0..3 {
            let receipt = payments.collect_fee(&wallet()).unwrap();
            assert_eq!(receipt.amount, 0.2);
            assert!(receipt.transaction_signature.starts_with("simulated_fee_payment_"));
        }
    }

    #[test]
    fn missing_recipient_is_configuration_error() {
        let err = service(Ok(0), None).collect_fee(&wallet()).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));

        let err = service(Ok(0), Some("not-a-key")).collect_fee(&wallet()).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));
    }

    #[test]
    fn bad_wallet_is_invalid_input() {
        let err = service(Ok(0), Some(&wallet())).collect_fee("abc").unwrap_err();
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn fee_transfer_is_single_system_instruction() {
        let payer = Pubkey::new_unique();
        let recipient = Pubkey::new_unique();
        let tx = fee_transfer(&payer, &recipient);
        assert_eq!(tx.message.instructions.len(), 1);
        let program = tx.message.account_keys[tx.message.instructions[0].program_id_index as usize];
        assert_eq!(program, system_program::id());
        assert_eq!(tx.message.account_keys[0], payer);
    }

    #[tokio::test]
    async fn balance_is_compared_against_minimum() {
        let rich = service(Ok(MINIMUM_BALANCE_LAMPORTS), None)
            .verify_balance(&wallet())
            .await
            .unwrap();
        assert!(rich.has_enough_balance);
        assert_eq!(rich.balance, 0.5);
        assert_eq!(rich.minimum_required, 0.5);

        let poor = service(Ok(MINIMUM_BALANCE_LAMPORTS - 1), None)
            .verify_balance(&wallet())
            .await
            .unwrap();
        assert!(!poor.has_enough_balance);
    }

    #[tokio::test]
    async fn rpc_failure_surfaces() {
        let err = service(Err("connection refused".to_string()), None)
            .verify_balance(&wallet())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Network(_)));
    }
}
