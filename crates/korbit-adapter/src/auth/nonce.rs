/*
[INPUT]:  Process wall clock (milliseconds)
[OUTPUT]: Unique, ordered nonces for private requests
[POS]:    Auth layer - per-request nonce generation
[UPDATE]: When nonce format or counter width changes
*/

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;

use crate::http::KorbitError;

/// Digits reserved for the per-millisecond counter.
const COUNTER_WIDTH: usize = 4;

/// A request nonce: millisecond timestamp followed by a zero-padded counter.
///
/// Counters up to 9999 keep the string form ordered the same way as the
/// `(timestamp_ms, counter)` pair. Past that the string gains a digit and
/// parsing back is no longer exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Nonce {
    pub timestamp_ms: i64,
    pub counter: u32,
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:0width$}",
            self.timestamp_ms,
            self.counter,
            width = COUNTER_WIDTH
        )
    }
}

impl FromStr for Nonce {
    type Err = KorbitError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || KorbitError::InvalidParameter(format!("malformed nonce: {value}"));

        if value.len() <= COUNTER_WIDTH || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }

        let (timestamp, counter) = value.split_at(value.len() - COUNTER_WIDTH);
        Ok(Self {
            timestamp_ms: timestamp.parse().map_err(|_| malformed())?,
            counter: counter.parse().map_err(|_| malformed())?,
        })
    }
}

#[derive(Debug)]
struct NonceState {
    last_timestamp_ms: i64,
    counter_within_ms: u32,
}

/// Thread-safe nonce source shared by every private call of one client.
#[derive(Debug, Clone)]
pub struct NonceGenerator {
    state: Arc<Mutex<NonceState>>,
}

impl NonceGenerator {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(NonceState {
                last_timestamp_ms: i64::MIN,
                counter_within_ms: 0,
            })),
        }
    }

    /// Next nonce in its wire form.
    pub fn next(&self) -> String {
        self.next_nonce().to_string()
    }

    pub fn next_nonce(&self) -> Nonce {
        self.issue(Utc::now().timestamp_millis())
    }

    /// Issue a nonce for the given clock reading.
    ///
    /// A clock that steps backwards is pinned to the last seen millisecond so
    /// the sequence never repeats.
    pub(crate) fn issue(&self, now_ms: i64) -> Nonce {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let now_ms = now_ms.max(state.last_timestamp_ms);
        if now_ms == state.last_timestamp_ms {
            state.counter_within_ms += 1;
        } else {
            state.last_timestamp_ms = now_ms;
            state.counter_within_ms = 0;
        }

        Nonce {
            timestamp_ms: now_ms,
            counter: state.counter_within_ms,
        }
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
