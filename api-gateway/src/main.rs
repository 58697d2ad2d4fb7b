//! API gateway binary for the ledger service

use std::sync::Arc;
use std::time::Duration;

use api_gateway::config::AppConfig;
use api_gateway::rate_limit::{cleanup_task, RateLimitLayer};
use api_gateway::{router, AppState};
use clap::Parser;
use dotenv::dotenv;
use ledger_core::{LedgerConfig, LedgerEngine};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        api_gateway::api::session::login,
        api_gateway::api::account::create_account,
        api_gateway::api::account::get_account,
        api_gateway::api::account::deposit,
        api_gateway::api::account::withdraw,
        api_gateway::api::account::transfer,
    ),
    components(
        schemas(
            api_gateway::api::session::LoginRequest,
            api_gateway::api::session::LoginResponse,
            api_gateway::api::account::CreateAccountRequest,
            api_gateway::api::account::AmountRequest,
            api_gateway::api::account::BalanceResponse,
            api_gateway::api::account::TransferRequest,
            common::model::account::Account,
            common::model::account::TransferOutcome,
            common::model::currency::Currency,
        )
    ),
    tags(
        (name = "session", description = "Token issuance"),
        (name = "ledger", description = "Account, deposit, withdraw, and transfer endpoints")
    ),
    info(
        title = "Ledger Service API",
        version = "1.0.0",
        description = "Minimal authenticated ledger with cross-currency transfers"
    )
)]
struct ApiDoc;

/// Ledger service API server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening address, overrides the PORT environment variable
    #[clap(short, long)]
    addr: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Debug level logging when DEBUG=1 env var is set
    let env = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Debug logging enabled");

    // Build the core before the router; it knows nothing about auth or HTTP
    let config = Arc::new(AppConfig::from_env());
    let ledger_config = LedgerConfig::new(config.transactions_log.clone());
    let ledger = Arc::new(LedgerEngine::with_config(&ledger_config)?);

    let rate_limit = RateLimitLayer::new(config.rate_limit.clone());
    tokio::spawn(cleanup_task(
        rate_limit.state(),
        Duration::from_secs(60),
        Duration::from_secs(600),
    ));

    let state = Arc::new(AppState {
        ledger,
        config: Arc::clone(&config),
    });

    let swagger_ui =
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());
    let app = router(state, rate_limit).merge(swagger_ui);

    let addr: std::net::SocketAddr = args
        .addr
        .unwrap_or_else(|| format!("127.0.0.1:{}", config.port))
        .parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
