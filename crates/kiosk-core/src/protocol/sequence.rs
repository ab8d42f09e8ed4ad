//! Process-wide counter used to build print-job claim markers.
//!
//! # Why a counter? (for beginners)
//!
//! When the uploader takes a spooled file it renames it to
//! `<name>.<n>.printed`.  The `<n>` part comes from this counter.  Two files
//! with the same name (the spooler reuses names) therefore never collide
//! once claimed, and a claimed name is never produced twice within one
//! process.

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out claim numbers 0, 1, 2, ... without a lock.
///
/// ```rust
/// use kiosk_core::protocol::ClaimCounter;
///
/// let claims = ClaimCounter::default();
/// assert_eq!(claims.next_claim(), 0);
/// assert_eq!(claims.next_claim(), 1);
/// assert_eq!(claims.issued(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ClaimCounter {
    issued: AtomicU64,
}

impl ClaimCounter {
    /// Reserves the next claim number.
    // Relaxed: the number only has to be unique.
    pub fn next_claim(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::Relaxed)
    }

    /// How many claim numbers have been handed out.
    pub fn issued(&self) -> u64 {
        self.issued.load(Ordering::Relaxed)
    }
}
