//! Release-once handle state machine.
//!
//! Every native resource handed to the host rides on a [`RawHandle`]:
//! a native address plus a kind tag, where address `0` means "already
//! released". The first [`RawHandle::release`] yields the address so
//! the owner can perform the native free; every later call yields
//! `None` and performs no work. Owning wrappers invoke release from
//! both their explicit close and their `Drop`, so the explicit-close +
//! finalizer double invocation is always safe.

use std::fmt;

use thiserror::Error;

/// Kind tag carried by every native handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleKind {
    Directory,
    Library,
    Symbol,
}

impl HandleKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            HandleKind::Directory => "directory",
            HandleKind::Library => "library",
            HandleKind::Symbol => "symbol",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from operating on a handle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    /// The handle's native resource was already released.
    #[error("{0} handle is closed")]
    Closed(HandleKind),
}

/// A native address bound to a release-once contract.
#[derive(Debug)]
pub struct RawHandle {
    kind: HandleKind,
    addr: usize,
}

impl RawHandle {
    /// Binds a live native address. Callers construct this only after a
    /// successful native open, so `addr` must be non-zero.
    pub fn new(kind: HandleKind, addr: usize) -> Self {
        debug_assert!(addr != 0, "a live handle needs a non-null address");
        Self { kind, addr }
    }

    pub const fn kind(&self) -> HandleKind {
        self.kind
    }

    /// Liveness predicate. Pure; valid on released handles.
    pub const fn is_live(&self) -> bool {
        self.addr != 0
    }

    /// Returns the live address, or the closed condition. Operations
    /// other than release and liveness checks go through here so that a
    /// released handle can never reach a native call.
    pub fn get(&self) -> Result<usize, HandleError> {
        if self.addr == 0 {
            Err(HandleError::Closed(self.kind))
        } else {
            Ok(self.addr)
        }
    }

    /// Yields the address exactly once and marks the handle released.
    /// Subsequent calls return `None`.
    pub fn release(&mut self) -> Option<usize> {
        match self.addr {
            0 => None,
            addr => {
                self.addr = 0;
                Some(addr)
            }
        }
    }
}
