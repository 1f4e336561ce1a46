//! List every mark a configuration can produce, with the address that
//! produces it.
//!
//! This is the inverse of [`ValidConfig::mark_of`]: instead of reading the
//! client index out of an address, the index is written into the prefix
//! address. It is meant for dumps and tests, never for the packet path.
use std::fmt;
use std::iter::FusedIterator;

use crate::addr::Address128;
use crate::config::Prefix;
use crate::mark::ValidConfig;

/// One `(mark, address)` pair yielded by [`Enumerate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkEntry {
    /// The mark.
    pub mark: u32,
    /// The prefix address with the client index written into it.
    pub address: Address128,
    /// The sub-prefix length, so that `address/len` covers every address
    /// given `mark`.
    pub len: u8,
}

impl MarkEntry {
    /// The sub-prefix covered by this entry.
    pub fn prefix(&self) -> Prefix {
        Prefix::from_raw(self.address, self.len)
    }
}

impl fmt::Display for MarkEntry {
    /// `<mark>\t0x<mark>\t<address>/<len>`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{:#x}\t{}/{}", self.mark, self.mark, self.address, self.len)
    }
}

/// Iterator over the client indices `0..2^(sub_prefix_len - prefix.len)`.
///
/// Marks come out strictly ascending and contiguous, starting at the mark
/// offset. The iterator holds no state besides its position, so calling
/// [`ValidConfig::enumerate`] again starts over.
#[derive(Debug, Clone)]
pub struct Enumerate {
    cfg: ValidConfig,
    next: u64,
    end: u64,
}

impl Enumerate {
    pub(crate) fn new(cfg: ValidConfig) -> Self {
        Self {
            cfg,
            next: 0,
            end: cfg.client_count(),
        }
    }

    // Entry for client index `index`, `index < end`.
    fn entry(&self, index: u64) -> MarkEntry {
        let index = index as u32;
        let address = match self.cfg.client_range() {
            Some(range) => range.deposit(self.cfg.prefix().address(), index),
            None => self.cfg.prefix().address(),
        };
        MarkEntry {
            mark: self.cfg.mark_offset() + index,
            address,
            len: self.cfg.sub_prefix_len(),
        }
    }
}

impl Iterator for Enumerate {
    type Item = MarkEntry;

    fn next(&mut self) -> Option<MarkEntry> {
        if self.next == self.end {
            return None;
        }
        let entry = self.entry(self.next);
        self.next += 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        match usize::try_from(remaining) {
            Ok(remaining) => (remaining, Some(remaining)),
            Err(_) => (usize::MAX, None),
        }
    }

    fn nth(&mut self, n: usize) -> Option<MarkEntry> {
        let skip = u64::try_from(n).unwrap_or(u64::MAX);
        self.next = self.next.saturating_add(skip).min(self.end);
        self.next()
    }

    fn count(self) -> usize {
        self.size_hint().0
    }

    fn last(mut self) -> Option<MarkEntry> {
        if self.next == self.end {
            return None;
        }
        self.next = self.end - 1;
        self.next()
    }
}

impl FusedIterator for Enumerate {}

#[cfg(test)]
mod tests {
    use crate::{MarkConfig, Prefix};

    #[test]
    fn entry_display() {
        let prefix: Prefix = "2001:db8::/126".parse().unwrap();
        let cfg = MarkConfig::new(prefix, 128, 16).into_valid().unwrap();
        let lines: Vec<String> = cfg.enumerate().map(|e| e.to_string()).collect();
        assert_eq!(
            lines,
            [
                "16\t0x10\t2001:db8::/128",
                "17\t0x11\t2001:db8::1/128",
                "18\t0x12\t2001:db8::2/128",
                "19\t0x13\t2001:db8::3/128",
            ]
        );
    }

    #[test]
    fn skipping_is_cheap() {
        let prefix: Prefix = "::/0".parse().unwrap();
        let cfg = MarkConfig::new(prefix, 32, 0).into_valid().unwrap();

        let mut iter = cfg.enumerate();
        let entry = iter.nth(0xffff_fffe).unwrap();
        assert_eq!(entry.mark, 0xffff_fffe);
        assert_eq!(entry.address, "ffff:fffe::".parse().unwrap());

        let entry = iter.next().unwrap();
        assert_eq!(entry.mark, u32::MAX);
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
