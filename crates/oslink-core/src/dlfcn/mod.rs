//! Dynamic loader option tables and validation.
//!
//! Host code names `dlopen` flags rather than passing raw bits; this
//! module owns the name table and the name-to-flag mapping. Validation
//! runs before any native load attempt, so a typo in an option name can
//! never reach the loader.

use thiserror::Error;

/// dlopen mode flags (Linux values).
pub const RTLD_LAZY: i32 = 0x00001;
pub const RTLD_NOW: i32 = 0x00002;
pub const RTLD_NOLOAD: i32 = 0x00004;
pub const RTLD_GLOBAL: i32 = 0x00100;
pub const RTLD_LOCAL: i32 = 0x00000;
pub const RTLD_NODELETE: i32 = 0x01000;
/// glibc extension.
#[cfg(target_env = "gnu")]
pub const RTLD_DEEPBIND: i32 = 0x00008;

/// Errors from loader option validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OptionError {
    /// Option name not in the table (or not available on this libc).
    #[error("unknown dlopen option {0:?}")]
    Unknown(String),
}

/// Option names accepted by [`flags_for`], in table order.
#[cfg(target_env = "gnu")]
pub const OPTION_NAMES: &[&str] =
    &["lazy", "now", "global", "local", "nodelete", "noload", "deepbind"];
#[cfg(not(target_env = "gnu"))]
pub const OPTION_NAMES: &[&str] = &["lazy", "now", "global", "local", "nodelete", "noload"];

/// Maps a single option name to its flag bit.
pub fn flag_for(name: &str) -> Result<i32, OptionError> {
    match name {
        "lazy" => Ok(RTLD_LAZY),
        "now" => Ok(RTLD_NOW),
        "global" => Ok(RTLD_GLOBAL),
        "local" => Ok(RTLD_LOCAL),
        "nodelete" => Ok(RTLD_NODELETE),
        "noload" => Ok(RTLD_NOLOAD),
        #[cfg(target_env = "gnu")]
        "deepbind" => Ok(RTLD_DEEPBIND),
        _ => Err(OptionError::Unknown(name.to_owned())),
    }
}

/// Folds a list of option names into a dlopen flag word.
///
/// Fails on the first unknown name. An empty list yields `0`, exactly
/// as a call site naming no options would have passed to the loader.
pub fn flags_for<S: AsRef<str>>(options: &[S]) -> Result<i32, OptionError> {
    let mut flags = 0;
    for opt in options {
        flags |= flag_for(opt.as_ref())?;
    }
    Ok(flags)
}
