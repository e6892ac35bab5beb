//! Dynamic library handles, symbols, and the loader error state.
//!
//! Wraps `dlopen`/`dlsym`/`dlclose`/`dlerror` behind a release-once
//! [`Library`] handle. Option names are validated in `oslink-core`
//! before any native call.
//!
//! The loader keeps one process-wide error string: each native loader
//! operation clears it before running and a failing one overwrites it
//! with the `dlerror` text. [`last_error`] reads it without clearing,
//! so callers query it promptly after a failure, before the next
//! loader call overwrites it.

use std::ffi::{CStr, CString, c_void};

use oslink_core::dlfcn as dlfcn_core;
use oslink_core::handle::{HandleError, HandleKind, RawHandle};
use parking_lot::Mutex;
use thiserror::Error;

static LAST_ERROR: Mutex<String> = Mutex::new(String::new());

fn clear_last_error() {
    LAST_ERROR.lock().clear();
}

fn set_last_error(msg: &str) {
    let mut guard = LAST_ERROR.lock();
    guard.clear();
    guard.push_str(msg);
}

/// Reads and consumes the native `dlerror` text, if any.
fn native_dlerror() -> Option<String> {
    // SAFETY: dlerror returns NULL or a NUL-terminated string that stays
    // valid until the next dlerror-affecting call; we copy it out here.
    let p = unsafe { libc::dlerror() };
    if p.is_null() {
        None
    } else {
        Some(unsafe { CStr::from_ptr(p) }.to_string_lossy().into_owned())
    }
}

/// Current process-wide loader error. Empty when the most recent native
/// loader operation succeeded. Non-destructive: reading does not clear.
pub fn last_error() -> String {
    LAST_ERROR.lock().clone()
}

/// Errors from library and symbol operations.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// An option name failed validation; no native call was made.
    #[error(transparent)]
    Option(#[from] dlfcn_core::OptionError),
    /// The path cannot be passed to the OS as a C string.
    #[error("{path}: path contains an interior NUL byte")]
    BadPath { path: String },
    /// The symbol name cannot be passed to the OS as a C string.
    #[error("{name}: symbol name contains an interior NUL byte")]
    BadName { name: String },
    /// The native `dlopen` call failed.
    #[error("{path}: {detail}")]
    Open { path: String, detail: String },
    /// The native `dlsym` call failed.
    #[error("{name}: {detail}")]
    Symbol { name: String, detail: String },
    /// Operation on a closed library handle.
    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// A loaded native code object.
#[derive(Debug)]
pub struct Library {
    raw: RawHandle,
}

/// A symbol resolved from a [`Library`].
///
/// Weak by contract: the symbol does not own or extend the library's
/// lifetime, and nothing links the two once resolution has happened.
/// Using the address after the owning library has been closed is
/// undefined, exactly as with a raw `dlsym` result.
#[derive(Debug)]
pub struct Symbol {
    raw: RawHandle,
}

impl Symbol {
    /// The resolved address.
    pub fn addr(&self) -> usize {
        // A symbol handle is never released, so the address is always live.
        self.raw.get().unwrap_or(0)
    }

    pub fn as_ptr(&self) -> *const c_void {
        self.addr() as *const c_void
    }
}

impl Library {
    /// Loads the shared object at `path` with the named options.
    ///
    /// Unknown option names fail here, before any native load attempt.
    /// On a native failure the diagnostic comes from `dlerror` and is
    /// also left in the process-wide state for [`last_error`].
    pub fn open<S: AsRef<str>>(path: &str, options: &[S]) -> Result<Self, LoaderError> {
        let flags = dlfcn_core::flags_for(options)?;
        let c_path = CString::new(path).map_err(|_| LoaderError::BadPath {
            path: path.to_owned(),
        })?;
        clear_last_error();
        // SAFETY: valid C string; flags were validated against the
        // option table.
        let handle = unsafe { libc::dlopen(c_path.as_ptr(), flags) };
        if handle.is_null() {
            let detail =
                native_dlerror().unwrap_or_else(|| "unknown dynamic loader error".to_owned());
            set_last_error(&detail);
            return Err(LoaderError::Open {
                path: path.to_owned(),
                detail,
            });
        }
        Ok(Self {
            raw: RawHandle::new(HandleKind::Library, handle as usize),
        })
    }

    /// Resolves `name` in this library.
    ///
    /// Fails with the closed condition once the library is released; a
    /// missing symbol fails with the `dlerror` text and leaves it in
    /// the process-wide state.
    pub fn symbol(&self, name: &str) -> Result<Symbol, LoaderError> {
        let handle = self.raw.get()? as *mut c_void;
        let c_name = CString::new(name).map_err(|_| LoaderError::BadName {
            name: name.to_owned(),
        })?;
        clear_last_error();
        // SAFETY: live handle from dlopen; valid C string.
        let sym = unsafe { libc::dlsym(handle, c_name.as_ptr()) };
        if sym.is_null() {
            let detail = native_dlerror().unwrap_or_else(|| "undefined symbol".to_owned());
            set_last_error(&detail);
            return Err(LoaderError::Symbol {
                name: name.to_owned(),
                detail,
            });
        }
        Ok(Symbol {
            raw: RawHandle::new(HandleKind::Symbol, sym as usize),
        })
    }

    /// Releases the library. The first call performs the native
    /// `dlclose` and reports its result; every later call returns
    /// `false` and performs no native call.
    pub fn close(&mut self) -> bool {
        match self.raw.release() {
            Some(addr) => {
                clear_last_error();
                // SAFETY: the address was produced by dlopen and
                // release() hands it out exactly once.
                let rc = unsafe { libc::dlclose(addr as *mut c_void) };
                if rc != 0
                    && let Some(detail) = native_dlerror()
                {
                    set_last_error(&detail);
                }
                rc == 0
            }
            None => false,
        }
    }

    /// Liveness predicate; valid on closed handles.
    pub fn is_live(&self) -> bool {
        self.raw.is_live()
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        // Finalizer path: redundant release is a no-op and there is no
        // caller left to observe a close failure.
        let _ = self.close();
    }
}
