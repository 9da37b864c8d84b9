#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use solana_sdk::pubkey::Pubkey;

use memelaunch::config::DiscoveryPolicy;
use memelaunch::services::{bitquery, pumpfun};
use memelaunch::services::{
    Aggregator, FeedError, LedgerClient, ServiceError, StaticFeed, TokenFeed,
};
use memelaunch::{FeedKind, TokenSummary};

pub const IMAGES: &str = "https://pump.fun/token-images/";

pub enum Upstream {
    Down,
    PumpFunBody(&'static str),
    BitqueryBody(&'static str),
    Hangs,
}

/// Stand-in feed that answers from canned bodies through the real
/// normalization and counts how often it is asked.
pub struct FakeFeed {
    upstream: Upstream,
    timeout: Duration,
    calls: Arc<AtomicUsize>,
}

impl FakeFeed {
    pub fn new(upstream: Upstream) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let feed = Self {
            upstream,
            timeout: Duration::from_millis(200),
            calls: calls.clone(),
        };
        (feed, calls)
    }
}

#[async_trait]
impl TokenFeed for FakeFeed {
    fn name(&self) -> &str {
        "fake"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, kind: FeedKind) -> Result<Vec<TokenSummary>, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.upstream {
            Upstream::Down => Err(FeedError::Unavailable("connection refused".to_string())),
            Upstream::PumpFunBody(body) => pumpfun::parse_listing(body, kind, IMAGES, Utc::now()),
            Upstream::BitqueryBody(body) => {
                bitquery::parse_trades(body, kind, &DiscoveryPolicy::default(), IMAGES, Utc::now())
            }
            Upstream::Hangs => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(Vec::new())
            }
        }
    }
}

pub struct Cascade {
    pub aggregator: Aggregator,
    pub primary_calls: Arc<AtomicUsize>,
    pub secondary_calls: Arc<AtomicUsize>,
}

pub fn cascade(primary: Upstream, secondary: Upstream) -> Cascade {
    let (primary, primary_calls) = FakeFeed::new(primary);
    let (secondary, secondary_calls) = FakeFeed::new(secondary);
    Cascade {
        aggregator: Aggregator::new(
            Box::new(primary),
            Box::new(secondary),
            StaticFeed::new(IMAGES),
        ),
        primary_calls,
        secondary_calls,
    }
}

pub fn calls(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}

pub struct FakeLedger {
    pub balance: u64,
}

#[async_trait]
impl LedgerClient for FakeLedger {
    async fn lamports_balance(&self, _address: &Pubkey) -> Result<u64, ServiceError> {
        Ok(self.balance)
    }

    async fn rent_exempt_minimum(&self, _data_len: usize) -> Result<u64, ServiceError> {
        Ok(1_461_600)
    }
}
