use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::DiscoveryConfig;
use crate::services::discovery::TokenFeed;
use crate::services::error::FeedError;
use crate::types::models::{
    base_tags, image_url, FeedKind, TokenSummary, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL,
    TAG_NEW,
};

/// Direct pump.fun listing API.
pub struct PumpFunFeed {
    client: reqwest::Client,
    base_url: String,
    image_base_url: String,
    timeout: Duration,
}

/// Only the envelope is strict: `tokens` must be a sequence. Records are
/// decoded one by one and non-object entries are skipped.
#[derive(Debug, Deserialize)]
pub struct PumpFunEnvelope {
    pub tokens: Vec<Value>,
}

/// Upstream record. Every field tolerates a wrong type and falls back to
/// `None`, which the mapping turns into the documented default.
#[derive(Debug, Default, Deserialize)]
pub struct PumpFunToken {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub volume_24h: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_buy_time: Option<RawTimestamp>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub reply_count: Option<f64>,
    #[serde(default, deserialize_with = "lenient_tags")]
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_new: Option<bool>,
}

/// pump.fun reports times either as ISO strings or epoch milliseconds
/// (sometimes fractional).
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Millis(f64),
    Text(String),
}

impl RawTimestamp {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Millis(ms) => millis_to_utc(*ms),
            RawTimestamp::Text(text) => match DateTime::parse_from_rfc3339(text.trim()) {
                Ok(t) => Some(t.with_timezone(&Utc)),
                Err(_) => text.trim().parse::<f64>().ok().and_then(millis_to_utc),
            },
        }
    }
}

fn millis_to_utc(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() || ms.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(ms.trunc() as i64).single()
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<RawTimestamp>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().map(RawTimestamp::Millis),
        Value::String(s) => Some(RawTimestamp::Text(s)),
        _ => None,
    })
}

fn lenient_tags<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(tag) => Some(tag),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => Some(flag),
        _ => None,
    })
}

impl PumpFunToken {
    /// Maps one upstream record onto the common shape. `None` when the record
    /// carries no mint id.
    pub fn into_summary(
        self,
        kind: FeedKind,
        image_base_url: &str,
        now: DateTime<Utc>,
    ) -> Option<TokenSummary> {
        let id = self
            .id
            .or(self.address)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())?;

        let is_new = kind.is_new() || self.is_new.unwrap_or(false);
        let mut tags = base_tags();
        tags.extend(self.tags.unwrap_or_default());
        if is_new {
            tags.insert(TAG_NEW.to_string());
        }

        Some(TokenSummary {
            image_url: image_url(image_base_url, &id),
            id,
            name: self.name.unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string()),
            symbol: self.symbol.unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string()),
            market_cap: non_negative(self.market_cap),
            price: non_negative(self.price),
            volume_24h: non_negative(self.volume_24h),
            last_activity_time: self
                .last_buy_time
                .as_ref()
                .and_then(RawTimestamp::to_utc)
                .unwrap_or(now),
            reply_count: non_negative(self.reply_count).round() as u64,
            tags,
            is_new,
        })
    }
}

fn non_negative(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v,
        _ => 0.0,
    }
}

/// Checks the body exposes a `tokens` sequence and normalizes it.
pub fn parse_listing(
    body: &str,
    kind: FeedKind,
    image_base_url: &str,
    now: DateTime<Utc>,
) -> Result<Vec<TokenSummary>, FeedError> {
    let envelope: PumpFunEnvelope =
        serde_json::from_str(body).map_err(|e| FeedError::MalformedPayload(e.to_string()))?;

    Ok(envelope
        .tokens
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|record| serde_json::from_value::<PumpFunToken>(record).ok())
        .filter_map(|token| token.into_summary(kind, image_base_url, now))
        .collect())
}

impl PumpFunFeed {
    pub fn new(client: reqwest::Client, config: &DiscoveryConfig) -> Self {
        Self {
            client,
            base_url: config.pumpfun_api_url.trim_end_matches('/').to_string(),
            image_base_url: config.image_base_url.clone(),
            timeout: config.pumpfun_timeout,
        }
    }
}

#[async_trait]
impl TokenFeed for PumpFunFeed {
    fn name(&self) -> &str {
        "pump.fun"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, kind: FeedKind) -> Result<Vec<TokenSummary>, FeedError> {
        let url = format!("{}/{}", self.base_url, kind.path());
        tracing::debug!("Requesting {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Unavailable(format!(
                "pump.fun returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_listing(&body, kind, &self.image_base_url, Utc::now())
    }
}
