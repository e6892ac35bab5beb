//! Directory stream handles.
//!
//! Wraps `opendir`/`readdir`/`telldir`/`seekdir`/`rewinddir`/`closedir`
//! behind a release-once [`DirStream`]. The cursor operations speak the
//! OS's opaque offsets, not logical indices: a cursor obtained from
//! [`DirStream::position`] is only meaningful when handed back to
//! [`DirStream::seek`] on the same stream.

use std::ffi::{CString, OsString};
use std::io;
use std::os::unix::ffi::OsStringExt;

use oslink_core::dirent::DirEntry;
use oslink_core::handle::{HandleError, HandleKind, RawHandle};
use thiserror::Error;

/// Errors from opening a directory stream.
#[derive(Debug, Error)]
pub enum DirError {
    /// The path cannot be passed to the OS as a C string.
    #[error("{path}: path contains an interior NUL byte")]
    BadPath { path: String },
    /// The native `opendir` call failed.
    #[error("{path}: {source}")]
    Open { path: String, source: io::Error },
}

/// A stateful iterator over the entries of one directory.
#[derive(Debug)]
pub struct DirStream {
    raw: RawHandle,
}

impl DirStream {
    /// Opens a directory stream over `path`.
    pub fn open(path: &str) -> Result<Self, DirError> {
        let c_path = CString::new(path).map_err(|_| DirError::BadPath {
            path: path.to_owned(),
        })?;
        // SAFETY: c_path is a valid NUL-terminated string for the call.
        let dirp = unsafe { libc::opendir(c_path.as_ptr()) };
        if dirp.is_null() {
            return Err(DirError::Open {
                path: path.to_owned(),
                source: io::Error::last_os_error(),
            });
        }
        Ok(Self {
            raw: RawHandle::new(HandleKind::Directory, dirp as usize),
        })
    }

    fn dirp(&self) -> Result<*mut libc::DIR, HandleError> {
        Ok(self.raw.get()? as *mut libc::DIR)
    }

    /// Advances the stream one entry.
    ///
    /// Yields `Ok(None)` once the stream is exhausted, and keeps doing
    /// so until [`rewind`](Self::rewind) or [`seek`](Self::seek) moves
    /// the cursor back.
    pub fn next(&mut self) -> Result<Option<DirEntry>, HandleError> {
        let dirp = self.dirp()?;
        // SAFETY: dirp came from a successful opendir and is still live.
        let ent = unsafe { libc::readdir(dirp) };
        if ent.is_null() {
            return Ok(None);
        }
        // SAFETY: readdir returned a record owned by the stream; every
        // field is copied out before the next native call on it.
        let entry = unsafe {
            let d = &*ent;
            let name_len = libc::strlen(d.d_name.as_ptr());
            let name_bytes =
                std::slice::from_raw_parts(d.d_name.as_ptr().cast::<u8>(), name_len).to_vec();
            #[cfg(target_os = "linux")]
            let offset = Some(d.d_off);
            #[cfg(not(target_os = "linux"))]
            let offset = None;
            DirEntry {
                ino: d.d_ino as u64,
                offset,
                reclen: d.d_reclen,
                kind: d.d_type,
                name: OsString::from_vec(name_bytes),
            }
        };
        Ok(Some(entry))
    }

    /// Current stream cursor, an OS-assigned opaque value.
    pub fn position(&mut self) -> Result<i64, HandleError> {
        let dirp = self.dirp()?;
        // SAFETY: live stream.
        Ok(unsafe { libc::telldir(dirp) } as i64)
    }

    /// Moves the cursor to a value previously returned by `position`.
    pub fn seek(&mut self, cursor: i64) -> Result<(), HandleError> {
        let dirp = self.dirp()?;
        // SAFETY: live stream; seekdir has no failure mode to report.
        unsafe { libc::seekdir(dirp, cursor as libc::c_long) };
        Ok(())
    }

    /// Resets iteration to the first entry.
    pub fn rewind(&mut self) -> Result<(), HandleError> {
        let dirp = self.dirp()?;
        // SAFETY: live stream.
        unsafe { libc::rewinddir(dirp) };
        Ok(())
    }

    /// Releases the native stream. The first call performs the native
    /// close and reports its result; every later call returns `false`
    /// and performs no native call.
    pub fn close(&mut self) -> bool {
        match self.raw.release() {
            // SAFETY: the address was produced by opendir and release()
            // hands it out exactly once.
            Some(addr) => unsafe { libc::closedir(addr as *mut libc::DIR) == 0 },
            None => false,
        }
    }

    /// Liveness predicate; valid on closed streams.
    pub fn is_live(&self) -> bool {
        self.raw.is_live()
    }
}

impl Drop for DirStream {
    fn drop(&mut self) {
        // Finalizer path: redundant release is a no-op and there is no
        // caller left to observe a close failure.
        let _ = self.close();
    }
}
