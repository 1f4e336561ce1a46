//! Mark configurations and the checks that make them safe to evaluate.
use std::fmt;

use crate::addr::{Address128, ADDR_BITS, WORD_BITS};
use crate::mark::ValidConfig;

/// Largest mark value.
pub const MAX_MARK: u64 = u32::MAX as u64;

quick_error! {
    /// Why a [`MarkConfig`] was refused.
    ///
    /// Every variant is terminal: the configuration must not be installed.
    /// The fields carry the offending values.
    #[allow(missing_docs)]
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub enum ValidationError {
        /// The sub-prefix is shorter than the prefix.
        InvalidRange { prefix_len: u8, sub_prefix_len: u8 } {
            display("sub-prefix length {} is shorter than the prefix length {}", sub_prefix_len, prefix_len)
        }
        /// The client index needs more than 32 bits; `bits` is its width.
        AddressSpaceTooLarge { bits: u8 } {
            display("client index needs {} bits, there are only 2^32 marks", bits)
        }
        /// The last mark, `max_mark`, does not fit in 32 bits.
        MarkSpaceOverflow { max_mark: u64 } {
            display("largest mark would be {:#x}, there are only 2^32 marks", max_mark)
        }
    }
}

/// An IPv6 prefix: an address and the number of leading bits that identify
/// the network.
///
/// Bits past `len` are usually zero, but nothing here relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Prefix {
    address: Address128,
    len: u8,
}

impl Prefix {
    /// Create a prefix, or `None` if `len` exceeds 128.
    pub fn new(address: Address128, len: u8) -> Option<Self> {
        if len <= ADDR_BITS {
            Some(Self { address, len })
        } else {
            None
        }
    }

    // Callers guarantee `len <= 128`.
    pub(crate) const fn from_raw(address: Address128, len: u8) -> Self {
        Self { address, len }
    }

    /// The prefix address.
    pub fn address(&self) -> Address128 {
        self.address
    }

    /// The prefix length, in `[0, 128]`.
    pub fn len(&self) -> u8 {
        self.len
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.address, self.len)
    }
}

/// An unchecked mark configuration.
///
/// Addresses whose bits `[prefix.len, sub_prefix_len)` read as the client
/// index `i` are given the mark `mark_offset + i`. Turn it into a
/// [`ValidConfig`] with [`MarkConfig::into_valid`] before computing marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkConfig {
    /// The network prefix the clients live in.
    pub prefix: Prefix,
    /// End of the client index bits.
    pub sub_prefix_len: u8,
    /// Mark of client 0.
    pub mark_offset: u32,
}

impl MarkConfig {
    /// Bundle the three parameters. Nothing is checked yet.
    pub fn new(prefix: Prefix, sub_prefix_len: u8, mark_offset: u32) -> Self {
        Self {
            prefix,
            sub_prefix_len,
            mark_offset,
        }
    }

    /// Check that every mark this configuration can produce fits in 32 bits.
    ///
    /// The checks run in order and stop at the first failure:
    /// 1. `sub_prefix_len >= prefix.len`,
    /// 2. `sub_prefix_len - prefix.len <= 32`,
    /// 3. `mark_offset + 2^(sub_prefix_len - prefix.len) - 1 <= 2^32 - 1`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.client_bits().map(|_| ())
    }

    /// Validate and return the read-only form used to compute marks.
    pub fn into_valid(self) -> Result<ValidConfig, ValidationError> {
        let bits = self.client_bits()?;
        Ok(ValidConfig::new(self, bits))
    }

    // Run the checks and return the width of the client index.
    pub(crate) fn client_bits(&self) -> Result<u8, ValidationError> {
        let prefix_len = self.prefix.len;
        let sub_prefix_len = self.sub_prefix_len;

        if sub_prefix_len < prefix_len {
            return_err!(ValidationError::InvalidRange {
                prefix_len,
                sub_prefix_len
            })
        }

        let bits = sub_prefix_len - prefix_len;
        if bits > WORD_BITS {
            return_err!(ValidationError::AddressSpaceTooLarge { bits })
        }

        // 2^32 needs the 64-bit intermediate.
        let client_count = 1u64 << bits;
        let max_mark = u64::from(self.mark_offset) + client_count - 1;
        if max_mark > MAX_MARK {
            return_err!(ValidationError::MarkSpaceOverflow { max_mark })
        }

        Ok(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(prefix_len: u8, sub_prefix_len: u8, mark_offset: u32) -> MarkConfig {
        let prefix = Prefix::new(Address128::UNSPECIFIED, prefix_len).unwrap();
        MarkConfig::new(prefix, sub_prefix_len, mark_offset)
    }

    #[test]
    fn checks_run_in_order() {
        // Shorter sub-prefix wins over the width check.
        assert_eq!(
            config(100, 0, u32::MAX).validate(),
            Err(ValidationError::InvalidRange {
                prefix_len: 100,
                sub_prefix_len: 0
            })
        );
        // Width is checked before the offset.
        assert_eq!(
            config(0, 128, u32::MAX).validate(),
            Err(ValidationError::AddressSpaceTooLarge { bits: 128 })
        );
    }

    #[test]
    fn prefix_len_bound() {
        assert!(Prefix::new(Address128::UNSPECIFIED, 128).is_some());
        assert!(Prefix::new(Address128::UNSPECIFIED, 129).is_none());
    }
}
