//! Readiness-wait timeout model and validators.

use thiserror::Error;

use crate::fdset::FD_SETSIZE;

/// Bounded-wait duration for the readiness multiplexer.
///
/// `Timeout::poll()` (both fields zero) requests a non-blocking poll;
/// passing no timeout at all means "block until ready or interrupted".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeout {
    pub secs: i64,
    pub micros: i64,
}

/// Errors from timeout validation.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutError {
    /// Negative field, or microseconds not below one second.
    #[error("invalid timeout ({secs}s, {micros}us): fields must be non-negative and micros < 1000000")]
    Invalid { secs: i64, micros: i64 },
}

impl Timeout {
    pub const fn new(secs: i64, micros: i64) -> Self {
        Self { secs, micros }
    }

    /// The non-blocking poll timeout, `(0, 0)`.
    pub const fn poll() -> Self {
        Self { secs: 0, micros: 0 }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            secs: millis / 1000,
            micros: (millis % 1000) * 1000,
        }
    }

    pub const fn is_poll(self) -> bool {
        self.secs == 0 && self.micros == 0
    }

    /// Checks the field ranges before the value reaches a native call.
    pub fn validate(self) -> Result<(), TimeoutError> {
        if self.secs < 0 || self.micros < 0 || self.micros >= 1_000_000 {
            return Err(TimeoutError::Invalid {
                secs: self.secs,
                micros: self.micros,
            });
        }
        Ok(())
    }
}

/// Returns true if `nfds` is within range for a descriptor set.
pub const fn valid_nfds(nfds: i32) -> bool {
    nfds >= 0 && nfds as usize <= FD_SETSIZE
}
