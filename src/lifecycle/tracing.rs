//! # Observability & Tracing
//!
//! Structured logging for the whole service via the `tracing` crate.
//!
//! The format is compact and hides module paths (`with_target(false)`);
//! every log line instead carries structured fields like `worker`, `peer`,
//! `product`, or `pending` that identify what it is about.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --bin central    # lifecycle + per-order events
//! RUST_LOG=debug cargo run --bin central   # queue depth, raw commands
//! ```
//!
//! With `RUST_LOG=info` a typical order flows like this:
//!
//! ```text
//! INFO Connection established peer=127.0.0.1:51324
//! INFO Start gate opened quorum=1
//! INFO Worker released worker=0
//! INFO Stock reserved product="PRODUCT2" quantity=5 remaining=45
//! INFO Order accepted peer=127.0.0.1:51324 product="PRODUCT2" quantity=5
//! INFO Order fulfilled worker=0 product="PRODUCT2" quantity=5 total=1
//! ```

/// Initializes the global tracing subscriber. Call once, at process start.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Structured fields identify the source instead
        .compact()
        .init();
}
