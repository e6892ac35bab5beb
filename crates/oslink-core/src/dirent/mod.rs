//! Directory entry record and type codes.

use std::ffi::OsString;

/// Entry type codes, as reported in `d_type`.
pub const DT_UNKNOWN: u8 = 0;
pub const DT_FIFO: u8 = 1;
pub const DT_CHR: u8 = 2;
pub const DT_DIR: u8 = 4;
pub const DT_BLK: u8 = 6;
pub const DT_REG: u8 = 8;
pub const DT_LNK: u8 = 10;
pub const DT_SOCK: u8 = 12;
pub const DT_WHT: u8 = 14;

/// Human-readable name for a `d_type` code, or `None` for codes the
/// platform did not define.
pub fn type_name(code: u8) -> Option<&'static str> {
    match code {
        DT_UNKNOWN => Some("unknown"),
        DT_FIFO => Some("fifo"),
        DT_CHR => Some("chr"),
        DT_DIR => Some("dir"),
        DT_BLK => Some("blk"),
        DT_REG => Some("reg"),
        DT_LNK => Some("lnk"),
        DT_SOCK => Some("sock"),
        DT_WHT => Some("wht"),
        _ => None,
    }
}

/// One directory entry, copied out of the native record.
///
/// `offset` is the OS stream cursor (`d_off`) and exists only on
/// platforms that report it; elsewhere it is `None`, never zero-filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub ino: u64,
    pub offset: Option<i64>,
    pub reclen: u16,
    pub kind: u8,
    pub name: OsString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_type_codes_have_names() {
        assert_eq!(type_name(DT_REG), Some("reg"));
        assert_eq!(type_name(DT_DIR), Some("dir"));
        assert_eq!(type_name(DT_LNK), Some("lnk"));
        assert_eq!(type_name(DT_UNKNOWN), Some("unknown"));
    }

    #[test]
    fn undefined_codes_have_none() {
        assert_eq!(type_name(3), None);
        assert_eq!(type_name(255), None);
    }
}
