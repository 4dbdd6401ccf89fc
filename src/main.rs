//! # `central` - the order-intake server
//!
//! Binds a TCP listener, assembles the [`OrderCentral`] core, and serves
//! client sessions until Ctrl-C. See [`order_central::config`] for the
//! environment knobs.

use order_central::config::ServiceConfig;
use order_central::lifecycle::{setup_tracing, OrderCentral};
use order_central::net;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = ServiceConfig::from_env()?;
    info!(addr = %config.addr, "Starting order central");

    let central = OrderCentral::new(&config);
    let listener = TcpListener::bind(&config.addr).await?;

    tokio::select! {
        served = net::serve(listener, central.session_context()) => served?,
        _ = tokio::signal::ctrl_c() => info!("Shutdown signal received"),
    }

    central.shutdown().await;
    Ok(())
}
