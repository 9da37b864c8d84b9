use chrono::{DateTime, Duration, Utc};
use solana_sdk::native_token::lamports_to_sol;

use crate::services::payment::CREATION_FEE_LAMPORTS;
use crate::types::models::{AdminStats, FeeTransactionRecord};

// No fee ledger is kept; the admin views are sample data built per request.

pub fn fee_transactions(now: DateTime<Utc>) -> Vec<FeeTransactionRecord> {
    let fee = lamports_to_sol(CREATION_FEE_LAMPORTS);
    [
        ("tx1", "user1wallet123", 1, "simulated_fee_payment_1234567890"),
        ("tx2", "user2wallet456", 2, "simulated_fee_payment_0987654321"),
    ]
    .into_iter()
    .map(|(id, wallet, hours_ago, signature)| FeeTransactionRecord {
        id: id.to_string(),
        wallet_address: wallet.to_string(),
        amount: fee,
        timestamp: now - Duration::hours(hours_ago),
        transaction_signature: signature.to_string(),
        status: "completed".to_string(),
    })
    .collect()
}

pub fn total_fees(transactions: &[FeeTransactionRecord]) -> f64 {
    transactions.iter().map(|tx| tx.amount).sum()
}

pub fn dashboard_stats() -> AdminStats {
    let total_tokens_created = 42;
    AdminStats {
        total_tokens_created,
        total_fees_collected: total_tokens_created as f64 * lamports_to_sol(CREATION_FEE_LAMPORTS),
        active_users: 38,
        last_day_transactions: 5,
        last_week_transactions: 18,
    }
}
