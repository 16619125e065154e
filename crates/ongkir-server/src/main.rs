mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use ongkir_scraper::{CarrierClient, TariffLookup};
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = ongkir_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    // One client, one gate: the resolver and the fetcher share the budget.
    let client = Arc::new(CarrierClient::from_config(&config)?);
    let lookup = TariffLookup::new(
        Arc::clone(&client),
        Arc::clone(&client),
        Duration::from_secs(config.aggregate_deadline_secs),
    );
    let app = build_app(AppState {
        lookup: Arc::new(lookup),
    });

    tracing::info!(
        env = %config.env,
        bind_addr = %config.bind_addr,
        carrier = %config.carrier_base_url,
        max_concurrent_fetches = config.max_concurrent_fetches,
        "starting ongkir server"
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
