//! Collision-resistant artifact identifiers.
//!
//! An id combines a UTC timestamp (milliseconds), a process-wide monotonic
//! counter, and a random 32-bit token. The counter keeps ids unique inside
//! one process even when the clock does not advance; the token separates
//! processes started within the same millisecond.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId {
    timestamp: DateTime<Utc>,
    sequence: u64,
    token: u32,
}

impl ArtifactId {
    /// A fresh id for the current instant.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            timestamp: Utc::now(),
            sequence: SEQUENCE.fetch_add(1, Ordering::Relaxed),
            token: rand::random(),
        }
    }

    /// The sequence number within this process.
    #[must_use]
    pub const fn sequence(&self) -> u64 {
        self.sequence
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:06}-{:08x}",
            self.timestamp.format("%Y%m%dT%H%M%S%3fZ"),
            self.sequence,
            self.token
        )
    }
}
