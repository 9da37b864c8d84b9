use std::num::NonZeroU32;
use std::time::Duration;

use nonzero_ext::nonzero;

pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
pub const DEFAULT_PUMPFUN_API_URL: &str = "https://api.pump.fun";
pub const DEFAULT_BITQUERY_API_URL: &str = "https://graphql.bitquery.io";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://pump.fun/token-images/";
pub const DEFAULT_FRONTEND_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub solana: SolanaConfig,
    pub discovery: DiscoveryConfig,
    pub payment: PaymentConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// Include internal error text in failure responses.
    pub expose_error_details: bool,
    /// Requests allowed per rate limit window (15 minutes).
    pub rate_limit_per_window: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub network: String,
}

#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub pumpfun_api_url: String,
    pub pumpfun_timeout: Duration,
    pub bitquery_api_url: String,
    pub bitquery_api_key: String,
    pub bitquery_timeout: Duration,
    pub image_base_url: String,
    pub policy: DiscoveryPolicy,
}

/// Estimates applied to upstream records that lack market figures.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryPolicy {
    pub assumed_total_supply: f64,
    pub volume_to_market_cap_ratio: f64,
    pub reply_count_min: u64,
    pub reply_count_max: u64,
    pub hot_market_cap_usd: f64,
    pub hot_price_usd: f64,
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            assumed_total_supply: 1_000_000_000.0,
            volume_to_market_cap_ratio: 0.15,
            reply_count_min: 5,
            reply_count_max: 104,
            hot_market_cap_usd: 3_000_000.0,
            hot_price_usd: 0.0003,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Wallet credited with creation fees; also the only admin wallet.
    pub admin_wallet_address: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let app_env = value_or_default(&lookup, "APP_ENV", "production".to_string())?;
        let rate_limit: u32 = value_or_default(&lookup, "RATE_LIMIT_PER_WINDOW", 100)?;

        let defaults = DiscoveryPolicy::default();
        let policy = DiscoveryPolicy {
            assumed_total_supply: value_or_default(
                &lookup,
                "ASSUMED_TOTAL_SUPPLY",
                defaults.assumed_total_supply,
            )?,
            volume_to_market_cap_ratio: value_or_default(
                &lookup,
                "VOLUME_TO_MARKET_CAP_RATIO",
                defaults.volume_to_market_cap_ratio,
            )?,
            reply_count_min: value_or_default(
                &lookup,
                "REPLY_COUNT_MIN",
                defaults.reply_count_min,
            )?,
            reply_count_max: value_or_default(
                &lookup,
                "REPLY_COUNT_MAX",
                defaults.reply_count_max,
            )?,
            hot_market_cap_usd: value_or_default(
                &lookup,
                "HOT_MARKET_CAP_USD",
                defaults.hot_market_cap_usd,
            )?,
            hot_price_usd: value_or_default(&lookup, "HOT_PRICE_USD", defaults.hot_price_usd)?,
        };
        policy.validate()?;

        Ok(Config {
            server: ServerConfig {
                host: value_or_default(&lookup, "SERVER_HOST", "0.0.0.0".to_string())?,
                port: value_or_default(&lookup, "PORT", 3001)?,
                frontend_url: value_or_default(
                    &lookup,
                    "FRONTEND_URL",
                    DEFAULT_FRONTEND_URL.to_string(),
                )?,
                expose_error_details: app_env == "development",
                rate_limit_per_window: NonZeroU32::new(rate_limit).unwrap_or(nonzero!(100u32)),
            },
            solana: SolanaConfig {
                rpc_url: value_or_default(&lookup, "SOLANA_RPC_URL", DEFAULT_RPC_URL.to_string())?,
                network: value_or_default(&lookup, "SOLANA_NETWORK", "devnet".to_string())?,
            },
            discovery: DiscoveryConfig {
                pumpfun_api_url: value_or_default(
                    &lookup,
                    "PUMPFUN_API_URL",
                    DEFAULT_PUMPFUN_API_URL.to_string(),
                )?,
                pumpfun_timeout: Duration::from_millis(value_or_default(
                    &lookup,
                    "PUMPFUN_TIMEOUT_MS",
                    5_000,
                )?),
                bitquery_api_url: value_or_default(
                    &lookup,
                    "BITQUERY_API_URL",
                    DEFAULT_BITQUERY_API_URL.to_string(),
                )?,
                bitquery_api_key: value_or_default(&lookup, "BITQUERY_API_KEY", String::new())?,
                bitquery_timeout: Duration::from_millis(value_or_default(
                    &lookup,
                    "BITQUERY_TIMEOUT_MS",
                    10_000,
                )?),
                image_base_url: value_or_default(
                    &lookup,
                    "TOKEN_IMAGE_BASE_URL",
                    DEFAULT_IMAGE_BASE_URL.to_string(),
                )?,
                policy,
            },
            payment: PaymentConfig {
                admin_wallet_address: lookup("ADMIN_WALLET_ADDRESS")
                    .filter(|v| !v.trim().is_empty()),
            },
        })
    }
}

impl DiscoveryPolicy {
    /// Rejects settings that would produce negative or non-finite estimates.
    pub fn validate(&self) -> anyhow::Result<()> {
        let figures = [
            ("ASSUMED_TOTAL_SUPPLY", self.assumed_total_supply),
            ("VOLUME_TO_MARKET_CAP_RATIO", self.volume_to_market_cap_ratio),
            ("HOT_MARKET_CAP_USD", self.hot_market_cap_usd),
            ("HOT_PRICE_USD", self.hot_price_usd),
        ];
        for (key, value) in figures {
            if !value.is_finite() || value < 0.0 {
                return Err(anyhow::anyhow!(
                    "{} must be a finite, non-negative number (got {})",
                    key,
                    value
                ));
            }
        }

        if self.reply_count_min > self.reply_count_max {
            return Err(anyhow::anyhow!(
                "REPLY_COUNT_MIN ({}) must not exceed REPLY_COUNT_MAX ({})",
                self.reply_count_min,
                self.reply_count_max
            ));
        }
        Ok(())
    }
}

fn value_or_default<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(val) => val
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", key, e)),
        None => Ok(default),
    }
}
