use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const TAG_MEME: &str = "meme";
pub const TAG_NEW: &str = "new";
pub const TAG_HOT: &str = "hot";

pub const DEFAULT_TOKEN_NAME: &str = "Unknown Token";
pub const DEFAULT_TOKEN_SYMBOL: &str = "UNKNOWN";

/// Which discovery listing a caller asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Trending,
    New,
}

impl FeedKind {
    pub fn path(&self) -> &'static str {
        match self {
            FeedKind::Trending => "trending",
            FeedKind::New => "new",
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, FeedKind::New)
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Normalized token entry returned by every discovery tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSummary {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub market_cap: f64,
    pub price: f64,
    #[serde(rename = "volume24h")]
    pub volume_24h: f64,
    pub last_activity_time: DateTime<Utc>,
    pub reply_count: u64,
    pub tags: BTreeSet<String>,
    pub is_new: bool,
    pub image_url: String,
}

/// Image location for a mint. Every tier goes through here so the same id
/// always maps to the same url.
pub fn image_url(base: &str, id: &str) -> String {
    format!("{}{}.png", base, id)
}

/// Tag set every tier starts from.
pub fn base_tags() -> BTreeSet<String> {
    let mut tags = BTreeSet::new();
    tags.insert(TAG_MEME.to_string());
    tags
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeReceipt {
    pub amount: f64,
    pub transaction_signature: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCheck {
    pub has_enough_balance: bool,
    pub balance: f64,
    pub minimum_required: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTokenRequest {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MintReceipt {
    pub token_id: String,
    pub transaction_signature: String,
}

/// Fee ledger row shown to the admin. Fabricated per request, never stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeTransactionRecord {
    pub id: String,
    pub wallet_address: String,
    pub amount: f64,
    pub timestamp: DateTime<Utc>,
    pub transaction_signature: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_tokens_created: u64,
    pub total_fees_collected: f64,
    pub active_users: u64,
    pub last_day_transactions: u64,
    pub last_week_transactions: u64,
}
