#![allow(dead_code)]

use marksrc::{Address128, MarkConfig, Prefix, ValidConfig};

pub fn addr(s: &str) -> Address128 {
    s.parse().unwrap()
}

// The engine never reads the prefix bits, so the prefix address is left zero
// unless a test needs it.
pub fn config(prefix_len: u8, sub_prefix_len: u8, mark_offset: u32) -> MarkConfig {
    let prefix = Prefix::new(Address128::UNSPECIFIED, prefix_len).unwrap();
    MarkConfig::new(prefix, sub_prefix_len, mark_offset)
}

pub fn valid(prefix_len: u8, sub_prefix_len: u8, mark_offset: u32) -> ValidConfig {
    config(prefix_len, sub_prefix_len, mark_offset)
        .into_valid()
        .unwrap()
}

pub fn valid_under(prefix: &str, sub_prefix_len: u8, mark_offset: u32) -> ValidConfig {
    MarkConfig::new(prefix.parse().unwrap(), sub_prefix_len, mark_offset)
        .into_valid()
        .unwrap()
}

// Asserts that `src` is marked `expected` under the given configuration.
#[allow(unused_macros)]
macro_rules! assert_mark {
    ($src: expr, $plen: expr, $splen: expr, $offset: expr, $expected: expr) => {{
        let offset: u32 = $offset;
        let expected: u32 = $expected;
        let cfg = common::valid($plen, $splen, offset);
        let actual = cfg.mark_of(&common::addr($src));
        assert_eq!(
            actual, expected,
            "{} /{}/{} offset {}: expected {:#x}, got {:#x}",
            $src, $plen, $splen, offset, expected, actual
        );
    }};
}
