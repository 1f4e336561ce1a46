//! A 128-bit address viewed as bits and as big-endian words.
use std::fmt;
use std::net::{AddrParseError, Ipv6Addr};
use std::str::FromStr;

use byteorder::{ByteOrder, NetworkEndian};

/// Number of bits in an [`Address128`].
pub const ADDR_BITS: u8 = 128;

/// Number of bits in one address word.
pub const WORD_BITS: u8 = 32;

/// Number of 32-bit words in an [`Address128`].
pub const ADDR_WORDS: usize = 4;

/// `BitPos` locates a single bit of an [`Address128`].
///
/// Bits are numbered from the most significant one. Each position is stored
/// as the index of the 32-bit word holding the bit, and the offset of the bit
/// inside that word:
/// ```text
///  word 0           word 1                 word 3
/// |0 1 ....... 31|32 33 ....... 63| ... |96 ....... 127|
///   ^                  ^
///   BitPos(0, 1)       BitPos(1, 1)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitPos {
    word_pos: u8,
    bit_pos: u8,
}

impl BitPos {
    /// The most significant bit.
    pub const FIRST: Self = Self::from_raw(0);

    /// The least significant bit.
    pub const LAST: Self = Self::from_raw(ADDR_BITS - 1);

    /// Create a `BitPos` from a global bit position.
    ///
    /// Returns `None` if `global_bit_pos` does not address a bit of a 128-bit
    /// value.
    pub fn new(global_bit_pos: u8) -> Option<Self> {
        if global_bit_pos < ADDR_BITS {
            Some(Self::from_raw(global_bit_pos))
        } else {
            None
        }
    }

    // Callers guarantee `global_bit_pos < 128`.
    pub(crate) const fn from_raw(global_bit_pos: u8) -> Self {
        Self {
            word_pos: global_bit_pos >> 5,
            bit_pos: global_bit_pos & 0x1f,
        }
    }

    /// The global bit position, in `[0, 128)`.
    pub fn to_global_pos(&self) -> u8 {
        self.word_pos * WORD_BITS + self.bit_pos
    }

    /// Index of the word that holds this bit.
    pub fn word_pos(&self) -> usize {
        usize::from(self.word_pos)
    }

    /// Offset of this bit inside its word, counted from the word's most
    /// significant bit.
    pub fn bit_pos(&self) -> u8 {
        self.bit_pos
    }
}

/// An immutable 128-bit big-endian address.
///
/// The octets are kept in network order. Bit 0 is the most significant bit
/// of octet 0, and word `i` is the big-endian `u32` read from octets
/// `4 * i .. 4 * i + 4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address128([u8; 16]);

impl Address128 {
    /// The all-zero address, `::`.
    pub const UNSPECIFIED: Self = Self([0; 16]);

    /// Create an address from its network-order octets.
    pub const fn from_octets(octets: [u8; 16]) -> Self {
        Self(octets)
    }

    /// Create an address from a 16-byte slice, as found in an IPv6 header.
    pub fn from_slice(buf: &[u8]) -> Option<Self> {
        buf.try_into().ok().map(Self)
    }

    /// Create an address from four words, most significant word first.
    pub fn from_words(words: [u32; ADDR_WORDS]) -> Self {
        let mut octets = [0; 16];
        NetworkEndian::write_u32_into(&words[..], &mut octets[..]);
        Self(octets)
    }

    /// The network-order octets of this address.
    pub const fn octets(&self) -> [u8; 16] {
        self.0
    }

    /// Word `index` of the address, `index` in `[0, 4)`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is 4 or larger.
    #[inline]
    pub fn word(&self, index: usize) -> u32 {
        NetworkEndian::read_u32(&self.0[index * 4..index * 4 + 4])
    }

    /// All four words, most significant word first.
    pub fn words(&self) -> [u32; ADDR_WORDS] {
        let mut words = [0; ADDR_WORDS];
        NetworkEndian::read_u32_into(&self.0[..], &mut words[..]);
        words
    }

    /// Read the bit at `pos`.
    #[inline]
    pub fn bit(&self, pos: BitPos) -> bool {
        (self.word(pos.word_pos()) >> (WORD_BITS - 1 - pos.bit_pos())) & 1 == 1
    }

    /// Return a copy of this address with the bit at `pos` set to `value`.
    pub fn with_bit(mut self, pos: BitPos, value: bool) -> Self {
        let global = usize::from(pos.to_global_pos());
        let mask = 0x80u8 >> (global % 8);
        if value {
            self.0[global / 8] |= mask;
        } else {
            self.0[global / 8] &= !mask;
        }
        self
    }

    /// The address as a single big-endian integer.
    pub fn to_u128(&self) -> u128 {
        u128::from_be_bytes(self.0)
    }

    /// Create an address from a big-endian integer.
    pub fn from_u128(value: u128) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<Ipv6Addr> for Address128 {
    fn from(addr: Ipv6Addr) -> Self {
        Self(addr.octets())
    }
}

impl From<Address128> for Ipv6Addr {
    fn from(addr: Address128) -> Self {
        Ipv6Addr::from(addr.0)
    }
}

impl From<[u8; 16]> for Address128 {
    fn from(octets: [u8; 16]) -> Self {
        Self(octets)
    }
}

impl From<u128> for Address128 {
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl FromStr for Address128 {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ipv6Addr::from_str(s).map(Self::from)
    }
}

impl fmt::Display for Address128 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Ipv6Addr::from(*self), f)
    }
}
