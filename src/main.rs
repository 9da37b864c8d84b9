use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::Client as ReqwestClient;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use tokio::net::TcpListener;

use memelaunch::api::{api_rate_limiter, cors_layer, create_router, AppState};
use memelaunch::services::LedgerClient;
use memelaunch::{Aggregator, Config, PaymentService, TokenService};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    if config.payment.admin_wallet_address.is_none() {
        tracing::warn!(
            "ADMIN_WALLET_ADDRESS is not set; fee collection and admin routes will fail"
        );
    }

    let http_client = ReqwestClient::builder()
        .timeout(Duration::from_secs(30))
        .build()?;

    let rpc_client = Arc::new(RpcClient::new_with_timeout_and_commitment(
        config.solana.rpc_url.clone(),
        Duration::from_secs(60),
        CommitmentConfig::confirmed(),
    ));

    // Test RPC connection at startup
    match rpc_client.get_version().await {
        Ok(version) => tracing::info!(
            "Connected to Solana {} RPC (version: {})",
            config.solana.network,
            version.solana_core
        ),
        Err(e) => tracing::error!("Failed to connect to RPC: {:?}", e),
    };

    let ledger: Arc<dyn LedgerClient> = rpc_client;
    let state = AppState {
        aggregator: Arc::new(Aggregator::from_config(http_client, &config.discovery)),
        payments: Arc::new(PaymentService::new(
            ledger.clone(),
            config.payment.admin_wallet_address.clone(),
        )),
        tokens: Arc::new(TokenService::new(ledger, &config.solana.network)),
        admin_wallet_address: config.payment.admin_wallet_address.clone(),
        expose_error_details: config.server.expose_error_details,
    };

    let limiter = api_rate_limiter(config.server.rate_limit_per_window);

    // Forget idle client buckets
    let sweeper = limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(15 * 60));
        loop {
            interval.tick().await;
            sweeper.retain_recent();
            tracing::debug!("Rate limiter tracking {} clients", sweeper.len());
        }
    });

    let app = create_router(state, limiter).layer(cors_layer(&config.server.frontend_url)?);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
