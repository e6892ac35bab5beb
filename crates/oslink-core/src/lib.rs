//! # oslink-core
//!
//! Pure contract logic for the oslink bindings: the release-once handle
//! state machine, the descriptor-set bitmap, loader option tables, the
//! directory-entry record, and the readiness timeout model.
//!
//! Nothing in this crate touches the OS. All native calls live in the
//! `oslink` crate; keeping the contracts here means every invariant can
//! be tested without opening a single file descriptor.

#![deny(unsafe_code)]

pub mod dirent;
pub mod dlfcn;
pub mod fdset;
pub mod handle;
pub mod select;
