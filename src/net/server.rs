//! TCP acceptor loop.

use tokio::net::TcpListener;
use tracing::{info, warn};

use super::session::{self, SessionContext};

/// Accepts connections forever, spawning one session task per client.
///
/// Thread-per-connection (well, task-per-connection) is a known scaling
/// ceiling; it is fine at this service's intended scale and keeps each
/// session's control flow linear.
pub async fn serve(listener: TcpListener, ctx: SessionContext) -> std::io::Result<()> {
    let local = listener.local_addr()?;
    info!(addr = %local, "Accepting connections");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                // Transient accept failures (e.g. EMFILE) should not kill
                // the acceptor.
                warn!(error = %e, "Failed to accept connection");
                continue;
            }
        };
        info!(%peer, "Connection established");

        let ctx = ctx.clone();
        tokio::spawn(async move {
            if let Err(e) = session::handle_session(stream, peer, ctx).await {
                warn!(%peer, error = %e, "Session ended with error");
            }
        });
    }
}
