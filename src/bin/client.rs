//! # `central-client` - interactive client for the order center
//!
//! Connects to the server, prints everything it says, and forwards stdin
//! lines as commands:
//!
//! ```bash
//! cargo run --bin central-client -- 127.0.0.1:9000
//! ```

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let addr = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "127.0.0.1:9000".to_string());

    let stream = TcpStream::connect(&addr).await?;
    println!("Connected to {addr}");
    let (read_half, mut write_half) = stream.into_split();

    // Relay server lines to stdout until the server closes the connection.
    let printer = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("{line}");
        }
        println!("Server closed the connection.");
    });

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = stdin.next_line().await? {
        write_half.write_all(line.as_bytes()).await?;
        write_half.write_all(b"\n").await?;
        if line.trim() == "3" {
            break;
        }
    }

    // Let the goodbye line land before exiting.
    let _ = tokio::time::timeout(std::time::Duration::from_secs(1), printer).await;
    Ok(())
}
