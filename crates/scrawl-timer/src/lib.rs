//! Phase countdown for Scrawl rooms.
//!
//! Each room owns exactly one [`PhaseCountdown`]. Arming it starts a
//! countdown for the current phase; arming again replaces the previous
//! countdown, so two can never run at once for the same room. While a
//! countdown is active it emits one tick per interval (the room turns
//! these into "remaining time" broadcasts) and finally
//! [`CountdownEvent::Elapsed`], the room's cue to advance the phase.
//!
//! # Integration
//!
//! The countdown is designed to sit inside a room actor's
//! `tokio::select!` loop:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         event = countdown.next_event() => match event {
//!             CountdownEvent::Tick { remaining, leading } => { /* broadcast */ }
//!             CountdownEvent::Elapsed => { /* advance phase */ }
//!         }
//!     }
//! }
//! ```
//!
//! While disarmed, [`PhaseCountdown::next_event`] pends forever — the
//! `select!` simply keeps servicing its other branches. Because the
//! owning actor is the only task that arms, cancels, and polls, a stale
//! tick from a cancelled countdown cannot fire.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace, warn};

/// Tick cadence used when none is configured (one broadcast per second).
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// What the countdown produced when polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// An interval boundary was reached.
    Tick {
        /// Nominal time left, counted down from the armed total in whole
        /// intervals. The leading tick carries the full total.
        remaining: Duration,
        /// `true` only for the first tick of a countdown. The room sends
        /// the phase identifier on this tick and omits it afterwards.
        leading: bool,
    },
    /// The countdown ran to its deadline and disarmed itself.
    Elapsed,
}

struct ActiveCountdown {
    /// When `Elapsed` fires. Fixed at arm time.
    deadline: Instant,
    /// When the next tick fires.
    next_tick: Instant,
    /// Nominal remaining time reported by the next tick.
    remaining: Duration,
    leading: bool,
}

/// A single cancellable countdown, at most one active at a time.
pub struct PhaseCountdown {
    interval: Duration,
    active: Option<ActiveCountdown>,
}

impl PhaseCountdown {
    /// Creates a disarmed countdown ticking at `interval`.
    ///
    /// A zero interval would spin; it is replaced with
    /// [`DEFAULT_TICK_INTERVAL`].
    pub fn new(interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            warn!("countdown interval of zero — using default");
            DEFAULT_TICK_INTERVAL
        } else {
            interval
        };
        Self {
            interval,
            active: None,
        }
    }

    /// Starts a countdown of `total`, replacing any active one.
    ///
    /// The leading tick fires immediately; `Elapsed` fires `total` from
    /// now regardless of how `total` divides into intervals.
    pub fn arm(&mut self, total: Duration) {
        let now = Instant::now();
        debug!(total_ms = total.as_millis() as u64, "countdown armed");
        self.active = Some(ActiveCountdown {
            deadline: now + total,
            next_tick: now,
            remaining: total,
            leading: true,
        });
    }

    /// Stops the active countdown. No further events fire until the next
    /// [`arm`](Self::arm). Idempotent.
    pub fn cancel(&mut self) {
        if self.active.take().is_some() {
            debug!("countdown cancelled");
        }
    }

    /// Whether a countdown is currently running.
    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    /// Wall-clock time left until `Elapsed`, if armed.
    ///
    /// Unlike the nominal per-tick value, this is measured against the
    /// deadline — it's what a late joiner should be told.
    pub fn remaining(&self) -> Option<Duration> {
        self.active
            .as_ref()
            .map(|a| a.deadline.saturating_duration_since(Instant::now()))
    }

    /// Waits for the next tick or the deadline.
    ///
    /// Pends forever while disarmed. Cancel-safe: dropping the future
    /// (e.g. when another `select!` branch wins) loses nothing, the next
    /// call resumes from the same schedule.
    pub async fn next_event(&mut self) -> CountdownEvent {
        let (next_tick, deadline) = match &self.active {
            Some(a) => (a.next_tick, a.deadline),
            None => {
                // Disarmed: never resolves, select! services other branches.
                std::future::pending::<()>().await;
                unreachable!()
            }
        };

        if next_tick >= deadline {
            time::sleep_until(deadline).await;
            self.active = None;
            trace!("countdown elapsed");
            return CountdownEvent::Elapsed;
        }

        time::sleep_until(next_tick).await;

        // Nothing else can re-arm between the check above and here: the
        // owning actor is the only caller and it wasn't running commands
        // while this future was pending.
        let active = self
            .active
            .as_mut()
            .expect("countdown still armed across its own sleep");
        let remaining = active.remaining;
        let leading = active.leading;
        active.leading = false;
        active.remaining = active.remaining.saturating_sub(self.interval);
        active.next_tick += self.interval;

        trace!(remaining_ms = remaining.as_millis() as u64, "countdown tick");
        CountdownEvent::Tick { remaining, leading }
    }
}
