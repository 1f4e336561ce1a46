//! Translate rule input into a [`ValidConfig`] and render it back.
//!
//! A rule supplies the source prefix as an address plus a netmask, and the
//! target options `--mark-offset` and `--sub-prefix-len`. The configuration
//! is validated once, when the rule is inserted.
use std::fmt;
use std::str::FromStr;

use log::error;

use crate::addr::{Address128, ADDR_BITS};
use crate::config::{MarkConfig, Prefix, ValidationError};
use crate::mark::ValidConfig;
use crate::Error;

quick_error! {
    /// Malformed rule input.
    #[allow(missing_docs)]
    #[derive(Debug, Clone, Eq, PartialEq)]
    pub enum RuleError {
        /// Not an unsigned integer.
        Number(text: String) {
            display("cannot parse '{}' as an unsigned integer", text)
        }
        /// The integer `text` is outside `[min, max]`.
        OutOfRange { text: String, min: u64, max: u64 } {
            display("'{}' is out of bounds ({}-{})", text, min, max)
        }
        /// Not an IPv6 address.
        Address(text: String) {
            display("cannot parse '{}' as an IPv6 address", text)
        }
        /// A netmask whose one bits are not contiguous.
        Netmask(mask: Address128) {
            display("{} is not a contiguous netmask", mask)
        }
        /// An option this target does not know.
        UnknownOption(opt: String) {
            display("unknown option '{}'", opt)
        }
        /// An option given without its value.
        MissingValue(opt: String) {
            display("option '{}' requires a value", opt)
        }
        /// An option given twice.
        DuplicateOption(opt: String) {
            display("option '{}' was given more than once", opt)
        }
    }
}

/// Name of the mark offset option.
pub const OPT_MARK_OFFSET: &str = "--mark-offset";

/// Name of the sub-prefix length option.
pub const OPT_SUB_PREFIX_LEN: &str = "--sub-prefix-len";

/// Parse an unsigned integer in `[min, max]`.
///
/// Decimal and `0x`-prefixed hexadecimal are accepted. There is no octal
/// form: a leading zero is still decimal, so `010` is ten, not eight as
/// `xtables_strtoui` would read it.
pub fn parse_uint(text: &str, min: u64, max: u64) -> Result<u64, RuleError> {
    let (digits, radix) = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (text, 10),
    };

    // `from_str_radix` would also take a sign.
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return_err!(RuleError::Number(text.to_string()))
    }

    let value = match u64::from_str_radix(digits, radix) {
        Ok(value) => value,
        // Only overflow is left at this point.
        Err(_) => return_err!(RuleError::OutOfRange {
            text: text.to_string(),
            min,
            max
        }),
    };

    if value < min || value > max {
        return_err!(RuleError::OutOfRange {
            text: text.to_string(),
            min,
            max
        })
    }
    Ok(value)
}

impl FromStr for Prefix {
    type Err = RuleError;

    /// Parse `<IPv6 address>[/<length>]`, e.g. `64:ff9b::/96`.
    ///
    /// A missing length means a single address (`/128`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr_str, len_str) = match s.split_once('/') {
            Some((addr_str, len_str)) => (addr_str, Some(len_str)),
            None => (s, None),
        };

        let address = addr_str
            .parse::<Address128>()
            .map_err(|_| RuleError::Address(addr_str.to_string()))?;
        let len = match len_str {
            Some(len_str) => parse_uint(len_str, 0, u64::from(ADDR_BITS))? as u8,
            None => ADDR_BITS,
        };

        Ok(Prefix::from_raw(address, len))
    }
}

/// Convert a netmask such as `ffff:ffff:ffff:ff00::` into its prefix
/// length (`56`).
pub fn prefix_len_from_netmask(mask: &Address128) -> Result<u8, RuleError> {
    let bits = mask.to_u128();
    let len = bits.leading_ones();
    if len < u32::from(ADDR_BITS) && bits << len != 0 {
        return_err!(RuleError::Netmask(*mask))
    }
    Ok(len as u8)
}

/// The netmask of a `len`-bit prefix, `len` clamped to 128.
pub fn netmask_from_prefix_len(len: u8) -> Address128 {
    let len = u32::from(len.min(ADDR_BITS));
    Address128::from_u128(u128::MAX.checked_shl(128 - len).unwrap_or(0))
}

/// The options of a mark target, before a source prefix is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetOptions {
    /// Number from which marks are assigned.
    ///
    /// Parsed by [`parse_uint`], so `010` means ten.
    pub mark_offset: u32,
    /// End of the client index bits.
    pub sub_prefix_len: u8,
}

impl Default for TargetOptions {
    fn default() -> Self {
        Self {
            mark_offset: 0,
            sub_prefix_len: ADDR_BITS,
        }
    }
}

impl TargetOptions {
    /// Parse target arguments, e.g. `["--mark-offset", "100",
    /// "--sub-prefix-len", "120"]`.
    ///
    /// Options that are not given keep their default value.
    pub fn parse_args<I, S>(args: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut mark_offset = None;
        let mut sub_prefix_len = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let opt = arg.as_ref();
            let slot = match opt {
                OPT_MARK_OFFSET => &mut mark_offset,
                OPT_SUB_PREFIX_LEN => &mut sub_prefix_len,
                _ => return_err!(RuleError::UnknownOption(opt.to_string())),
            };
            if slot.is_some() {
                return_err!(RuleError::DuplicateOption(opt.to_string()))
            }

            let value = args
                .next()
                .ok_or_else(|| RuleError::MissingValue(opt.to_string()))?;
            let max = match opt {
                OPT_MARK_OFFSET => u64::from(u32::MAX),
                _ => u64::from(ADDR_BITS),
            };
            *slot = Some(parse_uint(value.as_ref(), 0, max)?);
        }

        let defaults = Self::default();
        Ok(Self {
            mark_offset: mark_offset.map_or(defaults.mark_offset, |v| v as u32),
            sub_prefix_len: sub_prefix_len.map_or(defaults.sub_prefix_len, |v| v as u8),
        })
    }

    /// Attach a source prefix. The result still has to be validated.
    pub fn into_config(self, prefix: Prefix) -> MarkConfig {
        MarkConfig::new(prefix, self.sub_prefix_len, self.mark_offset)
    }
}

/// Build and validate the configuration of a rule being inserted.
///
/// `source` and `netmask` are the rule's source match; the prefix length is
/// derived from the netmask. Rejections are logged before being returned.
pub fn check_entry(
    source: Address128,
    netmask: Address128,
    opts: &TargetOptions,
) -> Result<ValidConfig, Error> {
    let len = prefix_len_from_netmask(&netmask)?;
    let prefix = Prefix::from_raw(source, len);

    opts.into_config(prefix).into_valid().map_err(|err| {
        match err {
            ValidationError::InvalidRange { .. } => {
                error!("{prefix}: sub-prefix-len is supposed to be longer or equal than the source's length")
            }
            ValidationError::AddressSpaceTooLarge { .. }
            | ValidationError::MarkSpaceOverflow { .. } => {
                error!("{prefix}: client count exceeds the amount of marks available (there are only 2^32 marks)")
            }
        }
        error!("{prefix}: {err}");
        Error::from(err)
    })
}

/// Human-readable listing form of a rule target, see
/// [`ValidConfig::summary`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSummary<'a>(&'a ValidConfig);

impl fmt::Display for RuleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cfg = self.0;
        write!(
            f,
            "marks {}-{} ({:#x}-{:#x}) /{}/{} ",
            cfg.first_mark(),
            cfg.last_mark(),
            cfg.first_mark(),
            cfg.last_mark(),
            cfg.prefix().len(),
            cfg.sub_prefix_len()
        )
    }
}

/// Re-parsable form of a rule target's options, see [`ValidConfig::save`].
#[derive(Debug, Clone, Copy)]
pub struct RuleSave<'a>(&'a ValidConfig);

impl fmt::Display for RuleSave<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            " {} {} {} {}",
            OPT_MARK_OFFSET,
            self.0.mark_offset(),
            OPT_SUB_PREFIX_LEN,
            self.0.sub_prefix_len()
        )
    }
}

impl ValidConfig {
    /// `marks <first>-<last> (0x<first>-0x<last>) /<prefix len>/<sub-prefix len> `
    pub fn summary(&self) -> RuleSummary<'_> {
        RuleSummary(self)
    }

    /// ` --mark-offset <offset> --sub-prefix-len <sub-prefix len>`
    pub fn save(&self) -> RuleSave<'_> {
        RuleSave(self)
    }

    /// The target options this configuration was built from.
    pub fn options(&self) -> TargetOptions {
        TargetOptions {
            mark_offset: self.mark_offset(),
            sub_prefix_len: self.sub_prefix_len(),
        }
    }
}
