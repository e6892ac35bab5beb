//! Descriptor-set bitmap.
//!
//! A fixed-capacity bit-vector identifying a subset of I/O descriptors,
//! mirroring the native `fd_set` without holding any OS resource. Values
//! copy and compare freely; there is no release step.

use thiserror::Error;

/// Maximum number of file descriptors in a set.
pub const FD_SETSIZE: usize = 1024;

const WORDS: usize = FD_SETSIZE / 64;

/// Errors from descriptor-set operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FdSetError {
    /// Descriptor index at or beyond [`FD_SETSIZE`].
    #[error("descriptor {0} out of range for a set of capacity 1024")]
    OutOfRange(usize),
}

/// Fixed-capacity descriptor bitmap.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FdSet {
    bits: [u64; WORDS],
}

impl Default for FdSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FdSet {
    /// An empty set.
    pub const fn new() -> Self {
        Self { bits: [0; WORDS] }
    }

    fn slot(fd: usize) -> Result<(usize, u64), FdSetError> {
        if fd >= FD_SETSIZE {
            return Err(FdSetError::OutOfRange(fd));
        }
        Ok((fd / 64, 1u64 << (fd % 64)))
    }

    /// Clears every descriptor.
    pub fn zero(&mut self) {
        self.bits = [0; WORDS];
    }

    /// Adds `fd` to the set.
    pub fn set(&mut self, fd: usize) -> Result<(), FdSetError> {
        let (word, mask) = Self::slot(fd)?;
        self.bits[word] |= mask;
        Ok(())
    }

    /// Removes `fd` from the set.
    pub fn clear(&mut self, fd: usize) -> Result<(), FdSetError> {
        let (word, mask) = Self::slot(fd)?;
        self.bits[word] &= !mask;
        Ok(())
    }

    /// Membership test for `fd`.
    pub fn is_set(&self, fd: usize) -> Result<bool, FdSetError> {
        let (word, mask) = Self::slot(fd)?;
        Ok(self.bits[word] & mask != 0)
    }

    /// True when no descriptor is set.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Number of descriptors in the set.
    pub fn len(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Set descriptors in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        (0..FD_SETSIZE).filter(move |&fd| self.bits[fd / 64] & (1u64 << (fd % 64)) != 0)
    }

    /// Highest descriptor in the set, if any.
    pub fn highest(&self) -> Option<usize> {
        self.iter().last()
    }
}

impl std::fmt::Debug for FdSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_set_clear_cycle() {
        let mut set = FdSet::new();
        for fd in [0usize, 1, 63, 64, 511, FD_SETSIZE - 1] {
            assert_eq!(set.is_set(fd), Ok(false));
            set.set(fd).unwrap();
            assert_eq!(set.is_set(fd), Ok(true));
            set.clear(fd).unwrap();
            assert_eq!(set.is_set(fd), Ok(false));
        }
    }

    #[test]
    fn zero_wipes_all_bits() {
        let mut set = FdSet::new();
        set.set(3).unwrap();
        set.set(700).unwrap();
        set.zero();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn out_of_range_is_a_bounds_error() {
        let mut set = FdSet::new();
        assert_eq!(set.set(FD_SETSIZE), Err(FdSetError::OutOfRange(FD_SETSIZE)));
        assert_eq!(set.clear(usize::MAX), Err(FdSetError::OutOfRange(usize::MAX)));
        assert_eq!(set.is_set(FD_SETSIZE), Err(FdSetError::OutOfRange(FD_SETSIZE)));
        // Failed operations leave the set untouched.
        assert!(set.is_empty());
    }

    #[test]
    fn iter_ascending_and_highest() {
        let mut set = FdSet::new();
        for fd in [900usize, 2, 64] {
            set.set(fd).unwrap();
        }
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![2, 64, 900]);
        assert_eq!(set.highest(), Some(900));
        assert_eq!(FdSet::new().highest(), None);
    }

    #[test]
    fn copies_are_independent() {
        let mut a = FdSet::new();
        a.set(5).unwrap();
        let mut b = a;
        b.clear(5).unwrap();
        assert_eq!(a.is_set(5), Ok(true));
        assert_eq!(b.is_set(5), Ok(false));
        assert_ne!(a, b);
    }
}
