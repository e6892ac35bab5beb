//! # oslink
//!
//! Native boundary of the oslink bindings: directory streams, dynamic
//! library handles, and descriptor readiness waits for an embedding
//! host runtime.
//!
//! Every resource type follows the same contract: a constructor returns
//! a usable handle or an error whose `Display` is the diagnostic the
//! host surfaces; `close` is idempotent (first call frees, later calls
//! return `false`); any other operation on a closed handle fails with
//! the closed condition instead of touching a freed native pointer; and
//! `Drop` reuses the same release path, silently, so host finalizers
//! can run after an explicit close.
//!
//! Handles are single-threaded by contract. The one piece of shared
//! state is the process-wide loader error, documented in [`dlfcn`].

pub mod dirent;
pub mod dlfcn;
pub mod select;

pub use oslink_core::dirent::{DirEntry, type_name};
pub use oslink_core::dlfcn::{OPTION_NAMES, OptionError};
pub use oslink_core::fdset::{FD_SETSIZE, FdSet, FdSetError};
pub use oslink_core::handle::{HandleError, HandleKind};
pub use oslink_core::select::{Timeout, TimeoutError};

pub use dirent::{DirError, DirStream};
pub use dlfcn::{Library, LoaderError, Symbol, last_error};
pub use select::{WaitError, wait};
