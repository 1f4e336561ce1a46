//! Read and write a span of up to 32 contiguous bits of an [`Address128`].
use crate::addr::{Address128, BitPos, ADDR_BITS, WORD_BITS};

quick_error! {
    /// Reasons a `[from, to)` bit span cannot be read as a `u32`.
    ///
    /// `from` and `to` are the bounds as given, `at` is the bound of an empty
    /// span.
    #[allow(missing_docs)]
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub enum RangeError {
        /// `from` is past `to`.
        Reversed { from: u8, to: u8 } {
            display("bit range [{}, {}) ends before it starts", from, to)
        }
        /// `to` is past bit 128.
        OutOfBounds { to: u8 } {
            display("bit range ends at {}, past the last bit of a 128-bit address", to)
        }
        /// `from == to`.
        Empty { at: u8 } {
            display("bit range [{}, {}) is empty", at, at)
        }
        /// More than 32 bits.
        TooWide { from: u8, to: u8 } {
            display("bit range [{}, {}) spans {} bits, at most 32 fit in a mark",
                from, to, i16::from(*to) - i16::from(*from))
        }
    }
}

/// A non-empty span `[from, to)` of at most 32 address bits.
///
/// The span is stored as its first and last bit:
/// ```text
///  word 1                          word 2
/// |0 1 2 3 ...                 31|0 1 2 3 4 5 ...              31|
///        |<----------- client index ---------->|
///        start                                 end
/// ```
/// When `start` and `end` sit in different words, the words are adjacent
/// because the span never exceeds 32 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    start: BitPos,
    end: BitPos,
}

impl BitRange {
    /// Create the range `[from, to)`.
    ///
    /// `from <= to <= 128`, `from != to` and `to - from <= 32` must hold.
    pub fn new(from: u8, to: u8) -> Result<Self, RangeError> {
        if from > to {
            return_err!(RangeError::Reversed { from, to })
        }
        if to > ADDR_BITS {
            return_err!(RangeError::OutOfBounds { to })
        }
        if from == to {
            return_err!(RangeError::Empty { at: from })
        }
        if to - from > WORD_BITS {
            return_err!(RangeError::TooWide { from, to })
        }

        Ok(Self {
            start: BitPos::from_raw(from),
            end: BitPos::from_raw(to - 1),
        })
    }

    /// The first bit of the range.
    pub fn from(&self) -> u8 {
        self.start.to_global_pos()
    }

    /// One past the last bit of the range.
    pub fn to(&self) -> u8 {
        self.end.to_global_pos() + 1
    }

    /// Number of bits in the range, in `[1, 32]`.
    pub fn width(&self) -> u8 {
        self.to() - self.from()
    }

    /// The largest value the range can hold.
    pub fn max_value(&self) -> u32 {
        ones(self.width())
    }

    /// Read the bits of `addr` covered by this range as a right-aligned
    /// big-endian integer.
    ///
    /// Bit `from` becomes the most significant bit of the result and bit
    /// `to - 1` the least significant one.
    #[inline]
    pub fn extract(&self, addr: &Address128) -> u32 {
        // Keep the bits of the first word from `start` onwards:
        // 0 1 2 3 4 5 6 7 ...
        //     |  field ...
        // is and-ed with
        // 0 0 1 1 1 1 1 1 ...
        let head = addr.word(self.start.word_pos()) & ones(WORD_BITS - self.start.bit_pos());

        // Number of bits right of `end` in the word holding `end`.
        let drop = WORD_BITS - 1 - self.end.bit_pos();

        if self.start.word_pos() == self.end.word_pos() {
            // 0 1 2 3 4 5 6 7 ...
            //     | field |
            // Right-shift the bits that follow the field away.
            head >> drop
        } else {
            // 0 1 2 ... 31|0 1 2 ...
            //     | field ....  |
            // Make room for the bits taken from the next word, then bring
            // them in. `taken` is in [1, 31] here.
            let taken = u32::from(self.end.bit_pos()) + 1;
            let head = (u64::from(head) << taken) as u32;
            head | (addr.word(self.end.word_pos()) >> drop)
        }
    }

    /// Return a copy of `addr` whose bits in this range are replaced by the
    /// big-endian representation of `value`.
    ///
    /// Bits of `value` above the range width are ignored. Bits outside the
    /// range are left untouched.
    pub fn deposit(&self, addr: Address128, value: u32) -> Address128 {
        let shift = u32::from(ADDR_BITS - self.to());
        let mask = u128::from(self.max_value()) << shift;
        let field = (u128::from(value) << shift) & mask;
        Address128::from_u128((addr.to_u128() & !mask) | field)
    }
}

/// Read the bits `[from, to)` of `addr` as a right-aligned `u32`.
///
/// This is a checked shorthand for [`BitRange::new`] followed by
/// [`BitRange::extract`].
pub fn extract(addr: &Address128, from: u8, to: u8) -> Result<u32, RangeError> {
    BitRange::new(from, to).map(|range| range.extract(addr))
}

// `width` low bits set, for `width` in [0, 32]. The 64-bit intermediate keeps
// the full-word case from shifting a `u32` by 32.
#[inline]
fn ones(width: u8) -> u32 {
    ((1u64 << width) - 1) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address128 {
        s.parse().unwrap()
    }

    #[test]
    fn ones_mask() {
        assert_eq!(ones(0), 0);
        assert_eq!(ones(1), 1);
        assert_eq!(ones(31), 0x7fff_ffff);
        assert_eq!(ones(32), 0xffff_ffff);
    }

    #[test]
    fn error_display_any_bounds() {
        let err = RangeError::TooWide { from: 200, to: 100 };
        assert_eq!(
            err.to_string(),
            "bit range [200, 100) spans -100 bits, at most 32 fit in a mark"
        );
    }

    #[test]
    fn range_accessors() {
        let range = BitRange::new(98, 127).unwrap();
        assert_eq!(range.from(), 98);
        assert_eq!(range.to(), 127);
        assert_eq!(range.width(), 29);
        assert_eq!(range.max_value(), 0x1fff_ffff);

        assert_eq!(BitRange::new(96, 128).unwrap().max_value(), u32::MAX);
    }

    #[test]
    fn same_word_and_straddling() {
        // Inside word 0.
        assert_eq!(extract(&addr("0ba0::"), 4, 12), Ok(0xba));
        // Word 0 into word 1.
        assert_eq!(extract(&addr("0:3:4000::"), 28, 36), Ok(0x34));
        // Word 2 into word 3.
        assert_eq!(extract(&addr("::1:7000:0"), 94, 102), Ok(0x5c));
    }

    #[test]
    fn deposit_writes_back() {
        let range = BitRange::new(4, 12).unwrap();
        assert_eq!(range.deposit(Address128::UNSPECIFIED, 0xba), addr("0ba0::"));

        // Neighbouring bits survive.
        let full = addr("ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff");
        assert_eq!(range.deposit(full, 0), addr("f00f:ffff:ffff:ffff:ffff:ffff:ffff:ffff"));

        // Excess value bits are dropped.
        assert_eq!(range.deposit(Address128::UNSPECIFIED, 0x1ba), addr("0ba0::"));
    }
}
