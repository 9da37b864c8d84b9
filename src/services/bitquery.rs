use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::Deserialize;
use serde_json::json;

use crate::config::{DiscoveryConfig, DiscoveryPolicy};
use crate::services::discovery::TokenFeed;
use crate::services::error::FeedError;
use crate::types::models::{
    base_tags, image_url, FeedKind, TokenSummary, DEFAULT_TOKEN_NAME, DEFAULT_TOKEN_SYMBOL,
    TAG_HOT, TAG_NEW,
};

/// Bitquery GraphQL, queried for recent pump.fun DEX trades.
pub struct BitqueryFeed {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    image_base_url: String,
    timeout: Duration,
    policy: DiscoveryPolicy,
}

#[derive(Debug, Deserialize)]
pub struct BitqueryEnvelope {
    pub data: Option<BitqueryData>,
    pub errors: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct BitqueryData {
    #[serde(rename = "Solana")]
    pub solana: Option<ChainTrades>,
}

#[derive(Debug, Deserialize)]
pub struct ChainTrades {
    #[serde(rename = "DEXTrades")]
    pub dex_trades: Option<Vec<DexTrade>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DexTrade {
    pub trade: Option<Trade>,
    pub block: Option<Block>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Trade {
    pub buy: Option<TradeBuy>,
    pub block: Option<Block>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TradeBuy {
    pub price: Option<f64>,
    #[serde(rename = "PriceInUSD")]
    pub price_in_usd: Option<f64>,
    pub currency: Option<Currency>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Currency {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub mint_address: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    pub time: Option<String>,
}

/// Sort field and lookback window (days) for each listing.
fn query_shape(kind: FeedKind) -> (&'static str, i64) {
    match kind {
        FeedKind::New => ("Block_Time", 1),
        FeedKind::Trending => ("Trade_Buy_Price", 7),
    }
}

pub fn build_query(kind: FeedKind, now: DateTime<Utc>) -> String {
    let (order_by, lookback_days) = query_shape(kind);
    let since = (now - chrono::Duration::days(lookback_days))
        .to_rfc3339_opts(SecondsFormat::Millis, true);

    format!(
        r#"{{
  Solana {{
    DEXTrades(
      limitBy: {{ by: Trade_Buy_Currency_MintAddress, count: 1 }}
      limit: {{ count: 10 }}
      orderBy: {{ descending: {order_by} }}
      where: {{
        Trade: {{
          Dex: {{ ProtocolName: {{ is: "pump" }} }}
          Buy: {{ Currency: {{ MintAddress: {{ notIn: ["11111111111111111111111111111111"] }} }} }}
          PriceAsymmetry: {{ le: 0.1 }}
          Sell: {{ AmountInUSD: {{ gt: "10" }} }}
        }}
        Transaction: {{ Result: {{ Success: true }} }}
        Block: {{ Time: {{ since: "{since}" }} }}
      }}
    ) {{
      Trade {{
        Buy {{
          Price(maximum: Block_Time)
          PriceInUSD(maximum: Block_Time)
          Currency {{ Name Symbol MintAddress Decimals Fungible Uri }}
        }}
      }}
      Block {{ Time }}
      Transaction {{ Signature }}
    }}
  }}
}}"#
    )
}

pub fn is_hot(market_cap: f64, price_in_usd: f64, policy: &DiscoveryPolicy) -> bool {
    market_cap > policy.hot_market_cap_usd || price_in_usd > policy.hot_price_usd
}

impl DexTrade {
    /// Maps one trade onto the common shape, estimating the figures the trade
    /// feed does not carry. `None` when the trade names no mint.
    pub fn into_summary<R: Rng + ?Sized>(
        self,
        kind: FeedKind,
        policy: &DiscoveryPolicy,
        image_base_url: &str,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Option<TokenSummary> {
        let trade = self.trade?;
        let block = self.block.or(trade.block);
        let buy = trade.buy?;
        let currency = buy.currency.unwrap_or_default();
        let id = currency
            .mint_address
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())?;

        let price = buy.price.filter(|p| p.is_finite() && *p > 0.0).unwrap_or(0.0);
        let price_in_usd = buy.price_in_usd.unwrap_or(0.0);
        let market_cap = price * policy.assumed_total_supply;

        let mut tags = base_tags();
        if kind.is_new() {
            tags.insert(TAG_NEW.to_string());
        }
        if is_hot(market_cap, price_in_usd, policy) {
            tags.insert(TAG_HOT.to_string());
        }

        let last_activity_time = block
            .and_then(|b| b.time)
            .and_then(|t| DateTime::parse_from_rfc3339(&t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or(now);

        Some(TokenSummary {
            image_url: image_url(image_base_url, &id),
            id,
            name: currency.name.unwrap_or_else(|| DEFAULT_TOKEN_NAME.to_string()),
            symbol: currency.symbol.unwrap_or_else(|| DEFAULT_TOKEN_SYMBOL.to_string()),
            market_cap,
            price,
            volume_24h: market_cap * policy.volume_to_market_cap_ratio,
            last_activity_time,
            reply_count: rng.gen_range(policy.reply_count_min..=policy.reply_count_max),
            tags,
            is_new: kind.is_new(),
        })
    }
}

/// Checks the GraphQL envelope carries `data.Solana.DEXTrades` and
/// normalizes the trades.
pub fn parse_trades(
    body: &str,
    kind: FeedKind,
    policy: &DiscoveryPolicy,
    image_base_url: &str,
    now: DateTime<Utc>,
) -> Result<Vec<TokenSummary>, FeedError> {
    let envelope: BitqueryEnvelope =
        serde_json::from_str(body).map_err(|e| FeedError::MalformedPayload(e.to_string()))?;

    let trades = match envelope.data.and_then(|d| d.solana).and_then(|s| s.dex_trades) {
        Some(trades) => trades,
        None => {
            let reason = match envelope.errors {
                Some(errors) => format!("missing data.Solana.DEXTrades, errors: {}", errors),
                None => "missing data.Solana.DEXTrades".to_string(),
            };
            return Err(FeedError::MalformedPayload(reason));
        }
    };

    let mut rng = rand::thread_rng();
    Ok(trades
        .into_iter()
        .filter_map(|trade| trade.into_summary(kind, policy, image_base_url, now, &mut rng))
        .collect())
}

impl BitqueryFeed {
    pub fn new(client: reqwest::Client, config: &DiscoveryConfig) -> Self {
        Self {
            client,
            api_url: config.bitquery_api_url.clone(),
            api_key: config.bitquery_api_key.clone(),
            image_base_url: config.image_base_url.clone(),
            timeout: config.bitquery_timeout,
            policy: config.policy.clone(),
        }
    }
}

#[async_trait]
impl TokenFeed for BitqueryFeed {
    fn name(&self) -> &str {
        "bitquery"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn fetch(&self, kind: FeedKind) -> Result<Vec<TokenSummary>, FeedError> {
        let query = build_query(kind, Utc::now());

        let response = self
            .client
            .post(&self.api_url)
            .header("X-API-KEY", &self.api_key)
            .json(&json!({ "query": query }))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Unavailable(format!(
                "bitquery returned status {}",
                status
            )));
        }

        let body = response.text().await?;
        parse_trades(&body, kind, &self.policy, &self.image_base_url, Utc::now())
    }
}
