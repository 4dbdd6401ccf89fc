//! One-shot start gate coordinating when workers may begin draining.
//!
//! # Architecture Note
//! The service must not let workers consume orders before enough client
//! sessions have shown up. Earlier revisions of this pattern tend to drift
//! between a barrier, a bare condition variable, or sentinel "go" elements
//! pushed onto the data queue. All of those collapse into one abstraction
//! here:
//!
//! - **Arrivals** (client sessions) call [`StartGate::arrive`]. The call
//!   blocks until the quorum is reached; exactly one caller - the last
//!   arriver - is told it was the leader.
//! - **Releasees** (workers) call [`StartGate::await_open`] and sleep until
//!   the gate opens.
//!
//! Internally the gate is the broadcast-flag shape: a phase value behind a
//! `watch` channel, set once and re-checked by every waiter on wake-up, so a
//! spurious wake can never release anyone early. The state machine is
//! `CLOSED → OPEN` (terminal) with a side exit `CLOSED → BROKEN` when a
//! participant abandons the rendezvous; a broken gate wakes every waiter with
//! [`GateError::Broken`] instead of stranding them.

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{info, warn};

/// Errors surfaced to gate participants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GateError {
    /// A participant abandoned the rendezvous before the quorum was reached.
    /// The gate is unusable from here on; recovery is a process restart.
    #[error("start gate broken: a participant aborted before the quorum was reached")]
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Closed,
    Open,
    Broken,
}

/// A single-use quorum gate.
///
/// Monotonic: once open it stays open, and late arrivals pass straight
/// through without blocking.
pub struct StartGate {
    quorum: usize,
    /// Arrival counter. The lock also serializes the phase transition, so the
    /// gate can only open once and `abort` cannot race past an opening.
    arrived: Mutex<usize>,
    phase: watch::Sender<Phase>,
}

impl StartGate {
    /// Creates a gate that opens once `quorum` participants have arrived.
    ///
    /// A quorum of zero or one opens on the first arrival.
    pub fn new(quorum: usize) -> Self {
        let (phase, _) = watch::channel(Phase::Closed);
        Self {
            quorum: quorum.max(1),
            arrived: Mutex::new(0),
            phase,
        }
    }

    pub fn quorum(&self) -> usize {
        self.quorum
    }

    pub fn is_open(&self) -> bool {
        *self.phase.borrow() == Phase::Open
    }

    /// Registers one arrival and blocks until the quorum is complete.
    ///
    /// Returns `Ok(true)` for exactly one caller - the arrival that completed
    /// the quorum and opened the gate. Arrivals after the gate is already
    /// open return `Ok(false)` immediately.
    pub async fn arrive(&self) -> Result<bool, GateError> {
        // Subscribe before releasing the counter lock so an open/abort that
        // fires in between is still observed.
        let mut rx = self.phase.subscribe();
        {
            let mut arrived = self.arrived.lock().await;
            match *self.phase.borrow() {
                Phase::Open => return Ok(false),
                Phase::Broken => return Err(GateError::Broken),
                Phase::Closed => {}
            }
            *arrived += 1;
            if *arrived >= self.quorum {
                info!(quorum = self.quorum, "Start gate opened");
                self.phase.send_replace(Phase::Open);
                return Ok(true);
            }
        }

        loop {
            if rx.changed().await.is_err() {
                return Err(GateError::Broken);
            }
            match *rx.borrow_and_update() {
                Phase::Open => return Ok(false),
                Phase::Broken => return Err(GateError::Broken),
                Phase::Closed => continue,
            }
        }
    }

    /// Blocks until the gate opens. Re-checks the phase on every wake-up, so
    /// no releasee can slip through early or more than once.
    pub async fn await_open(&self) -> Result<(), GateError> {
        let mut rx = self.phase.subscribe();
        loop {
            match *rx.borrow_and_update() {
                Phase::Open => return Ok(()),
                Phase::Broken => return Err(GateError::Broken),
                Phase::Closed => {}
            }
            if rx.changed().await.is_err() {
                return Err(GateError::Broken);
            }
        }
    }

    /// Breaks a still-closed gate, waking every blocked participant with
    /// [`GateError::Broken`]. A no-op once the gate has opened: open is
    /// terminal.
    pub async fn abort(&self) {
        let _arrived = self.arrived.lock().await;
        if *self.phase.borrow() == Phase::Closed {
            warn!("Start gate broken before the quorum was reached");
            self.phase.send_replace(Phase::Broken);
        }
    }
}
