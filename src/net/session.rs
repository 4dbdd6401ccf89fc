//! Per-connection session loop speaking the line-based menu protocol.
//!
//! The protocol is deliberately plain text, one message per line:
//!
//! ```text
//! S: Welcome to the order center.
//! S: Options:
//! S: 1. List products
//! S: 2. Place order
//! S: 3. Quit
//! C: 2
//! S: Enter orders as 'product,quantity'. Type 'DONE' to finish.
//! C: product2,5
//! S: Order for PRODUCT2 received.
//! C: DONE
//! ```
//!
//! Each session also counts as one arrival toward the start quorum: workers
//! begin draining the queue only once enough clients have connected. A peer
//! that hangs up while the quorum is still forming breaks the gate so nobody
//! else waits forever.

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::catalog::CatalogStore;
use crate::core::{GateError, OrderQueue, StartGate};
use crate::model::Order;

const WELCOME: &str = "Welcome to the order center.";
const MENU: &str = "Options:\n1. List products\n2. Place order\n3. Quit";
const ORDER_PROMPT: &str = "Enter orders as 'product,quantity'. Type 'DONE' to finish.";
const STARTING: &str = "Service is starting, please wait...";
const GOODBYE: &str = "Thank you for using the order center. Goodbye!";

/// Everything a session needs from the core, shared by `Arc`.
#[derive(Clone)]
pub struct SessionContext {
    pub catalog: Arc<CatalogStore>,
    pub queue: Arc<OrderQueue>,
    pub gate: Arc<StartGate>,
}

/// Errors that terminate a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Another participant broke the start gate while this session waited.
    #[error(transparent)]
    Gate(#[from] GateError),

    /// This peer disconnected before the start quorum was reached; the gate
    /// was broken on its behalf.
    #[error("peer disconnected before the start quorum was reached")]
    AbandonedQuorum,
}

/// Runs one client session to completion.
pub async fn handle_session(
    stream: TcpStream,
    peer: SocketAddr,
    ctx: SessionContext,
) -> Result<(), SessionError> {
    let (read_half, mut writer) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    writer.write_all(format!("{WELCOME}\n{MENU}\n").as_bytes()).await?;

    // The session is one arrival toward the start quorum. Watch the socket
    // while we wait: a peer that hangs up mid-rendezvous must break the gate
    // rather than leave the other participants blocked forever.
    let arrive = ctx.gate.arrive();
    tokio::pin!(arrive);
    let leader = loop {
        // Biased: once the gate is open, prefer proceeding over answering
        // another command with the still-starting notice.
        tokio::select! {
            biased;
            arrived = &mut arrive => break arrived?,
            line = lines.next_line() => match line? {
                None => {
                    warn!(%peer, "Peer disconnected while the start quorum was forming");
                    ctx.gate.abort().await;
                    return Err(SessionError::AbandonedQuorum);
                }
                Some(_) => {
                    // Commands sent before the quorum forms are not queued up.
                    writer.write_all(format!("{STARTING}\n").as_bytes()).await?;
                }
            },
        }
    };
    if leader {
        info!(%peer, quorum = ctx.gate.quorum(), "Session completed the start quorum");
    }

    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "1" => {
                let mut listing = String::from("Available products:\n");
                for entry in ctx.catalog.list().await {
                    listing.push_str(&format!("{}: {}\n", entry.product, entry.available));
                }
                writer.write_all(listing.as_bytes()).await?;
            }
            "2" => {
                writer.write_all(format!("{ORDER_PROMPT}\n").as_bytes()).await?;
                take_orders(&mut lines, &mut writer, peer, &ctx).await?;
            }
            "3" => {
                writer.write_all(format!("{GOODBYE}\n").as_bytes()).await?;
                break;
            }
            other => {
                debug!(%peer, command = other, "Invalid menu option");
                writer
                    .write_all(b"Invalid option. Please choose a valid option.\n")
                    .await?;
            }
        }
        // Re-send the menu after every action, so the client always knows
        // where it stands.
        writer.write_all(format!("{MENU}\n").as_bytes()).await?;
    }

    info!(%peer, "Session ended");
    Ok(())
}

/// Inner loop for order mode: `product,quantity` lines until a terminator.
///
/// `DONE` is the advertised terminator; `FIN` is accepted as an alias for
/// clients of the predecessor protocol.
async fn take_orders<R>(
    lines: &mut tokio::io::Lines<R>,
    writer: &mut (impl AsyncWriteExt + Unpin),
    peer: SocketAddr,
    ctx: &SessionContext,
) -> Result<(), SessionError>
where
    R: AsyncBufReadExt + Unpin,
{
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if is_order_terminator(line) {
            writer.write_all(b"Orders finished.\n").await?;
            return Ok(());
        }

        let Some((product, quantity)) = parse_order_line(line) else {
            writer
                .write_all(b"Error: invalid order format. Use 'product,quantity'.\n")
                .await?;
            continue;
        };

        // Reservation is the commit point: stock is decremented here, and
        // only then does the order go on the queue. Enqueue may block on
        // backpressure; that is flow control, not a fault.
        match ctx.catalog.check_and_reserve(&product, quantity).await {
            Ok(()) => {
                let order = Order::new(peer, product.clone(), quantity);
                if ctx.queue.enqueue(order).await.is_err() {
                    writer.write_all(b"Service is shutting down.\n").await?;
                    return Ok(());
                }
                info!(%peer, %product, quantity, "Order accepted");
                writer
                    .write_all(format!("Order for {product} received.\n").as_bytes())
                    .await?;
            }
            Err(e) => {
                writer.write_all(format!("Error: {e}.\n").as_bytes()).await?;
            }
        }
    }
    // Peer vanished mid-order-mode; nothing left to do.
    Ok(())
}

fn is_order_terminator(line: &str) -> bool {
    line.eq_ignore_ascii_case("DONE") || line.eq_ignore_ascii_case("FIN")
}

/// Parses `product,quantity`, upper-casing the product key.
fn parse_order_line(line: &str) -> Option<(String, u32)> {
    let (product, quantity) = line.split_once(',')?;
    let product = product.trim().to_uppercase();
    if product.is_empty() {
        return None;
    }
    let quantity: u32 = quantity.trim().parse().ok()?;
    Some((product, quantity))
}
