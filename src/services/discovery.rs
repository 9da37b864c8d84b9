use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::DiscoveryConfig;
use crate::services::bitquery::BitqueryFeed;
use crate::services::error::FeedError;
use crate::services::fallback::StaticFeed;
use crate::services::pumpfun::PumpFunFeed;
use crate::types::models::{FeedKind, TokenSummary};

/// An upstream that can answer a discovery listing, already normalized.
#[async_trait]
pub trait TokenFeed: Send + Sync {
    fn name(&self) -> &str;

    /// Longest the aggregator waits for `fetch` before moving on.
    fn timeout(&self) -> Duration;

    async fn fetch(&self, kind: FeedKind) -> Result<Vec<TokenSummary>, FeedError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Primary,
    Secondary,
    Static,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub source: Tier,
    pub tokens: Vec<TokenSummary>,
}

/// Serves discovery listings from the first tier that answers: the primary
/// feed, then the secondary feed, then the built-in table.
pub struct Aggregator {
    primary: Box<dyn TokenFeed>,
    secondary: Box<dyn TokenFeed>,
    fallback: StaticFeed,
}

impl Aggregator {
    pub fn new(
        primary: Box<dyn TokenFeed>,
        secondary: Box<dyn TokenFeed>,
        fallback: StaticFeed,
    ) -> Self {
        Self {
            primary,
            secondary,
            fallback,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &DiscoveryConfig) -> Self {
        Self::new(
            Box::new(PumpFunFeed::new(client.clone(), config)),
            Box::new(BitqueryFeed::new(client, config)),
            StaticFeed::new(&config.image_base_url),
        )
    }

    pub async fn list(&self, kind: FeedKind) -> Vec<TokenSummary> {
        self.list_with_source(kind).await.tokens
    }

    pub async fn list_with_source(&self, kind: FeedKind) -> Listing {
        tracing::info!("Fetching {} tokens", kind);

        let tiers = [
            (Tier::Primary, self.primary.as_ref()),
            (Tier::Secondary, self.secondary.as_ref()),
        ];
        for (tier, feed) in tiers {
            match attempt(feed, kind).await {
                Ok(tokens) => {
                    tracing::info!("Serving {} {} tokens from {}", tokens.len(), kind, feed.name());
                    return Listing { source: tier, tokens };
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {} tokens from {}: {}", kind, feed.name(), e);
                }
            }
        }

        tracing::warn!("All upstream feeds failed, using built-in {} tokens", kind);
        Listing {
            source: Tier::Static,
            tokens: self.fallback.tokens(kind),
        }
    }
}

async fn attempt(feed: &dyn TokenFeed, kind: FeedKind) -> Result<Vec<TokenSummary>, FeedError> {
    let limit = feed.timeout();
    let tokens = match tokio::time::timeout(limit, feed.fetch(kind)).await {
        Ok(result) => result?,
        Err(_) => return Err(FeedError::Timeout(limit)),
    };

    let tokens = retain_unique_ids(tokens);
    if tokens.is_empty() {
        return Err(FeedError::Empty);
    }
    Ok(tokens)
}

/// Drops entries without an id and any repeat of an id already seen.
fn retain_unique_ids(tokens: Vec<TokenSummary>) -> Vec<TokenSummary> {
    let mut seen = HashSet::new();
    tokens
        .into_iter()
        .filter(|token| !token.id.is_empty() && seen.insert(token.id.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::models::{base_tags, image_url};
    use chrono::Utc;

    fn summary(id: &str) -> TokenSummary {
        TokenSummary {
            id: id.to_string(),
            name: "Name".to_string(),
            symbol: "SYM".to_string(),
            market_cap: 0.0,
            price: 0.0,
            volume_24h: 0.0,
            last_activity_time: Utc::now(),
            reply_count: 0,
            tags: base_tags(),
            is_new: false,
            image_url: image_url("https://img/", id),
        }
    }

    #[test]
    fn duplicate_and_blank_ids_are_dropped() {
        let mut second = summary("A");
        second.name = "Second".to_string();
        let tokens = vec![summary("A"), summary(""), summary("B"), second];

        let kept = retain_unique_ids(tokens);
        let ids: Vec<&str> = kept.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "B"]);
        assert_eq!(kept[0].name, "Name");
    }
}
