use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;

use crate::services::error::ServiceError;

/// The two chain reads the payment and mint flows need.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    async fn lamports_balance(&self, address: &Pubkey) -> Result<u64, ServiceError>;

    async fn rent_exempt_minimum(&self, data_len: usize) -> Result<u64, ServiceError>;
}

#[async_trait]
impl LedgerClient for RpcClient {
    async fn lamports_balance(&self, address: &Pubkey) -> Result<u64, ServiceError> {
        self.get_balance(address)
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))
    }

    async fn rent_exempt_minimum(&self, data_len: usize) -> Result<u64, ServiceError> {
        self.get_minimum_balance_for_rent_exemption(data_len)
            .await
            .map_err(|e| ServiceError::Network(e.to_string()))
    }
}
