//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, the rate-limit store, third-party clients
//! and the Axum server lifecycle.

use crate::config::Config;
use crate::domain::gateways::PaymentProcessor;
use crate::domain::rate_limit::RateLimitStore;
use crate::infrastructure::payments::{PayPalProcessor, StripeProcessor};
use crate::infrastructure::persistence::{
    PgEnergyProjectRepository, PgPropertyRepository, PgSessionRepository, PgValuationRepository,
};
use crate::infrastructure::rate_limit::{MemoryRateLimitStore, RedisRateLimitStore};
use crate::infrastructure::statistics::CbsClient;
use crate::routes::app_router;
use crate::state::{AppState, Integrations, Repositories, SessionSettings};

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// Opens the PostgreSQL pool with the configured limits.
pub async fn connect_database(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

async fn rate_limit_store(config: &Config) -> Arc<dyn RateLimitStore> {
    let Some(redis_url) = &config.redis_url else {
        tracing::info!("Rate limit store: in-process (REDIS_URL not set)");
        return Arc::new(MemoryRateLimitStore::new());
    };

    match RedisRateLimitStore::connect(redis_url).await {
        Ok(store) => {
            tracing::info!("Rate limit store: Redis");
            Arc::new(store)
        }
        Err(e) => {
            tracing::warn!("Failed to connect to Redis: {}. Using in-process store.", e);
            Arc::new(MemoryRateLimitStore::new())
        }
    }
}

fn payment_processors(config: &Config, http: &reqwest::Client) -> Vec<Arc<dyn PaymentProcessor>> {
    let mut processors: Vec<Arc<dyn PaymentProcessor>> = Vec::new();

    if let Some(stripe) = &config.stripe {
        processors.push(Arc::new(StripeProcessor::new(
            http.clone(),
            stripe.secret_key.clone(),
            stripe.api_base.clone(),
        )));
    }

    if let Some(paypal) = &config.paypal {
        processors.push(Arc::new(PayPalProcessor::new(
            http.clone(),
            paypal.client_id.clone(),
            paypal.client_secret.clone(),
            paypal.api_base.clone(),
        )));
    }

    if processors.is_empty() {
        tracing::warn!("No payment provider configured; payment endpoints will reject requests");
    }

    processors
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool
/// - Apply migrations
/// - Rate-limit store (Redis, or in-process fallback)
/// - HTTP client for CBS and the payment gateways
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = connect_database(&config).await?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_client_timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let pool = Arc::new(pool);
    let repositories = Repositories {
        properties: Arc::new(PgPropertyRepository::new(pool.clone())),
        energy_projects: Arc::new(PgEnergyProjectRepository::new(pool.clone())),
        valuations: Arc::new(PgValuationRepository::new(pool.clone())),
        sessions: Arc::new(PgSessionRepository::new(pool)),
    };

    let integrations = Integrations {
        statistics: Arc::new(CbsClient::new(
            http.clone(),
            config.cbs_api_base.clone(),
            config.cbs_table_id.clone(),
        )),
        payment_processors: payment_processors(&config, &http),
        rate_limit_store: rate_limit_store(&config).await,
    };

    let state = AppState::new(
        repositories,
        integrations,
        SessionSettings {
            signing_secret: config.session_signing_secret.clone(),
            access_token_ttl_seconds: config.access_token_ttl_seconds,
        },
        config.behind_proxy,
    );

    let app = app_router(state, config.behind_proxy);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
