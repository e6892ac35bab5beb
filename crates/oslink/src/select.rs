//! Readiness multiplexing over `select`.
//!
//! [`wait`] is the only call in this layer that may block. It blocks
//! until a descriptor is ready, the bounded timeout expires, or a
//! signal interrupts it; the three outcomes are distinguishable and the
//! layer never retries after an interruption on its own.

use std::io;
use std::mem::MaybeUninit;

use oslink_core::fdset::FdSet;
use oslink_core::select::{Timeout, TimeoutError, valid_nfds};
use thiserror::Error;

/// Errors from a readiness wait.
#[derive(Debug, Error)]
pub enum WaitError {
    /// `nfds` outside `0..=FD_SETSIZE`; no native call was made.
    #[error("nfds {0} out of range for a descriptor set of capacity 1024")]
    BadNfds(i32),
    /// Malformed timeout; no native call was made.
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    /// A signal interrupted the wait before readiness or expiry.
    #[error("wait interrupted by signal")]
    Interrupted,
    /// The native `select` call failed.
    #[error("select failed: {0}")]
    Native(#[source] io::Error),
}

/// Builds a native `fd_set` from the descriptors below `nfds`.
fn to_native(set: Option<&FdSet>, nfds: i32) -> Option<libc::fd_set> {
    let set = set?;
    // SAFETY: FD_ZERO fully initializes the set.
    let mut native = unsafe {
        let mut raw = MaybeUninit::<libc::fd_set>::uninit();
        libc::FD_ZERO(raw.as_mut_ptr());
        raw.assume_init()
    };
    for fd in set.iter() {
        if fd as i32 >= nfds {
            break;
        }
        // SAFETY: fd < nfds, and nfds was validated against FD_SETSIZE.
        unsafe { libc::FD_SET(fd as i32, &mut native) };
    }
    Some(native)
}

fn as_mut_ptr(set: &mut Option<libc::fd_set>) -> *mut libc::fd_set {
    match set {
        Some(s) => s,
        None => std::ptr::null_mut(),
    }
}

/// Rewrites `dst` to exactly the ready descriptors the OS reported.
fn write_back(dst: Option<&mut FdSet>, src: &libc::fd_set, nfds: i32) {
    let Some(dst) = dst else { return };
    dst.zero();
    for fd in 0..nfds {
        // SAFETY: fd < nfds <= FD_SETSIZE, and src was filled by select.
        if unsafe { libc::FD_ISSET(fd, src) } {
            // In range by the loop bound.
            let _ = dst.set(fd as usize);
        }
    }
}

/// Waits for readiness on up to three descriptor sets.
///
/// Absent sets are treated as empty; with all three absent the call
/// degrades to a timed sleep returning `Ok(0)` at expiry. No timeout
/// blocks indefinitely; [`Timeout::poll`] returns immediately with the
/// current readiness count. On success the passed sets are mutated in
/// place to the ready subset and the ready count is returned; a bounded
/// timeout that expires yields `Ok(0)`.
pub fn wait(
    nfds: i32,
    read: Option<&mut FdSet>,
    write: Option<&mut FdSet>,
    error: Option<&mut FdSet>,
    timeout: Option<Timeout>,
) -> Result<usize, WaitError> {
    if !valid_nfds(nfds) {
        return Err(WaitError::BadNfds(nfds));
    }
    if let Some(t) = timeout {
        t.validate()?;
    }

    let mut read_native = to_native(read.as_deref(), nfds);
    let mut write_native = to_native(write.as_deref(), nfds);
    let mut error_native = to_native(error.as_deref(), nfds);
    let mut tv = timeout.map(|t| libc::timeval {
        tv_sec: t.secs as libc::time_t,
        tv_usec: t.micros as libc::suseconds_t,
    });
    let tv_ptr = match tv.as_mut() {
        Some(t) => t as *mut libc::timeval,
        None => std::ptr::null_mut(),
    };

    // SAFETY: each set pointer is null or points at an initialized
    // fd_set; tv_ptr likewise; nfds is within FD_SETSIZE.
    let rc = unsafe {
        libc::select(
            nfds,
            as_mut_ptr(&mut read_native),
            as_mut_ptr(&mut write_native),
            as_mut_ptr(&mut error_native),
            tv_ptr,
        )
    };
    if rc < 0 {
        let err = io::Error::last_os_error();
        return Err(if err.raw_os_error() == Some(libc::EINTR) {
            WaitError::Interrupted
        } else {
            WaitError::Native(err)
        });
    }

    if let Some(native) = &read_native {
        write_back(read, native, nfds);
    }
    if let Some(native) = &write_native {
        write_back(write, native, nfds);
    }
    if let Some(native) = &error_native {
        write_back(error, native, nfds);
    }
    Ok(rc as usize)
}
