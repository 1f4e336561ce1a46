#![warn(missing_docs, missing_debug_implementations, rust_2018_idioms)]

//! Assign 32-bit packet marks from sub-ranges of an IPv6 source prefix.
//!
//! A [`MarkConfig`] names a prefix, a sub-prefix length and a mark offset.
//! Once validated into a [`ValidConfig`], the bits of an address between the
//! prefix length and the sub-prefix length are read as a client index, and the
//! mark is `mark_offset + index`.
//!
//! ```
//! use marksrc::{Address128, MarkConfig};
//!
//! let cfg = MarkConfig::new("2001:db8::/120".parse().unwrap(), 128, 100)
//!     .into_valid()
//!     .unwrap();
//! let addr: Address128 = "2001:db8::2a".parse().unwrap();
//! assert_eq!(cfg.mark_of(&addr), 142);
//! ```

#[macro_use]
extern crate quick_error;

#[macro_use]
mod macros;

pub mod addr;
pub use addr::{Address128, BitPos};

pub mod bits;
pub use bits::{extract, BitRange, RangeError};

pub mod config;
pub use config::{MarkConfig, Prefix, ValidationError};

pub mod mark;
pub use mark::{mark_of, ValidConfig};

pub mod enumerate;
pub use enumerate::{Enumerate, MarkEntry};

pub mod rule;
pub mod target;

mod error;
pub use error::Error;
