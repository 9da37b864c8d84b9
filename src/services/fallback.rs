use std::collections::BTreeSet;

use chrono::{Duration, Utc};

use crate::types::models::{image_url, FeedKind, TokenSummary};

struct BuiltinToken {
    id: &'static str,
    name: &'static str,
    symbol: &'static str,
    market_cap: f64,
    price: f64,
    volume_24h: f64,
    seconds_since_activity: i64,
    reply_count: u64,
    tags: &'static [&'static str],
}

const TRENDING: &[BuiltinToken] = &[
    BuiltinToken {
        id: "sol123456789",
        name: "Solana Doge",
        symbol: "SOLDOGE",
        market_cap: 2_500_000.0,
        price: 0.00025,
        volume_24h: 350_000.0,
        seconds_since_activity: 120,
        reply_count: 42,
        tags: &["meme", "trending"],
    },
    BuiltinToken {
        id: "sol987654321",
        name: "Bonk Cat",
        symbol: "BCAT",
        market_cap: 4_200_000.0,
        price: 0.0042,
        volume_24h: 630_000.0,
        seconds_since_activity: 300,
        reply_count: 88,
        tags: &["meme", "trending", "hot"],
    },
    BuiltinToken {
        id: "sol555666777",
        name: "Moon Frog",
        symbol: "MFROG",
        market_cap: 1_750_000.0,
        price: 0.00175,
        volume_24h: 262_500.0,
        seconds_since_activity: 540,
        reply_count: 27,
        tags: &["meme", "trending"],
    },
];

const NEW: &[BuiltinToken] = &[
    BuiltinToken {
        id: "sol111222333",
        name: "Fresh Mint",
        symbol: "FRMT",
        market_cap: 850_000.0,
        price: 0.000085,
        volume_24h: 120_000.0,
        seconds_since_activity: 30,
        reply_count: 12,
        tags: &["meme", "new"],
    },
    BuiltinToken {
        id: "sol444555666",
        name: "Day One",
        symbol: "DAY1",
        market_cap: 320_000.0,
        price: 0.00032,
        volume_24h: 48_000.0,
        seconds_since_activity: 75,
        reply_count: 6,
        tags: &["meme", "new", "hot"],
    },
];

/// Last-resort tier: a fixed table per feed kind.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    image_base_url: String,
}

impl StaticFeed {
    pub fn new(image_base_url: &str) -> Self {
        Self {
            image_base_url: image_base_url.to_string(),
        }
    }

    pub fn tokens(&self, kind: FeedKind) -> Vec<TokenSummary> {
        let table = match kind {
            FeedKind::Trending => TRENDING,
            FeedKind::New => NEW,
        };
        let now = Utc::now();

        table
            .iter()
            .map(|entry| TokenSummary {
                id: entry.id.to_string(),
                name: entry.name.to_string(),
                symbol: entry.symbol.to_string(),
                market_cap: entry.market_cap,
                price: entry.price,
                volume_24h: entry.volume_24h,
                last_activity_time: now - Duration::seconds(entry.seconds_since_activity),
                reply_count: entry.reply_count,
                tags: entry.tags.iter().map(|t| t.to_string()).collect::<BTreeSet<_>>(),
                is_new: kind.is_new(),
                image_url: image_url(&self.image_base_url, entry.id),
            })
            .collect()
    }
}
