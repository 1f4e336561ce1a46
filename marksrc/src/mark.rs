//! The per-address hot path.
use crate::addr::Address128;
use crate::bits::BitRange;
use crate::config::{MarkConfig, Prefix};
use crate::enumerate::Enumerate;

/// A [`MarkConfig`] that passed validation.
///
/// It can only be obtained from [`MarkConfig::into_valid`], so every mark it
/// produces fits in 32 bits and [`ValidConfig::mark_of`] cannot fail.
/// It is immutable and can be shared across threads without locking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ValidConfig {
    config: MarkConfig,
    // `None` when the prefix and the sub-prefix have the same length: there is
    // a single client, and every address maps to the offset.
    clients: Option<BitRange>,
}

impl ValidConfig {
    pub(crate) fn new(config: MarkConfig, client_bits: u8) -> Self {
        let clients = if client_bits == 0 {
            None
        } else {
            BitRange::new(config.prefix.len(), config.sub_prefix_len).ok()
        };
        Self { config, clients }
    }

    /// The mark of `addr`: the offset plus the client index read from
    /// `addr`'s bits `[prefix.len, sub_prefix_len)`.
    ///
    /// Bits outside that range are ignored.
    #[inline]
    pub fn mark_of(&self, addr: &Address128) -> u32 {
        match &self.clients {
            // Validation guarantees the sum does not wrap.
            Some(range) => self.config.mark_offset + range.extract(addr),
            None => self.config.mark_offset,
        }
    }

    /// Every `(mark, address)` pair this configuration can produce, in
    /// ascending mark order.
    pub fn enumerate(&self) -> Enumerate {
        Enumerate::new(*self)
    }

    /// The configuration this was validated from.
    pub fn config(&self) -> &MarkConfig {
        &self.config
    }

    /// The network prefix.
    pub fn prefix(&self) -> Prefix {
        self.config.prefix
    }

    /// End of the client index bits.
    pub fn sub_prefix_len(&self) -> u8 {
        self.config.sub_prefix_len
    }

    /// Mark of client 0.
    pub fn mark_offset(&self) -> u32 {
        self.config.mark_offset
    }

    /// The client index bits, or `None` for a single-client configuration.
    pub fn client_range(&self) -> Option<BitRange> {
        self.clients
    }

    /// Width of the client index, in `[0, 32]`.
    pub fn client_bits(&self) -> u8 {
        self.clients.map_or(0, |range| range.width())
    }

    /// Number of distinct clients, in `[1, 2^32]`.
    pub fn client_count(&self) -> u64 {
        1u64 << self.client_bits()
    }

    /// The smallest mark produced.
    pub fn first_mark(&self) -> u32 {
        self.config.mark_offset
    }

    /// The largest mark produced.
    pub fn last_mark(&self) -> u32 {
        self.config.mark_offset + self.clients.map_or(0, |range| range.max_value())
    }
}

/// The mark of `addr` under `cfg`.
#[inline]
pub fn mark_of(addr: &Address128, cfg: &ValidConfig) -> u32 {
    cfg.mark_of(addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_client() {
        let prefix = Prefix::new("2001:db8::".parse().unwrap(), 128).unwrap();
        let cfg = MarkConfig::new(prefix, 128, 7).into_valid().unwrap();

        assert!(cfg.client_range().is_none());
        assert_eq!(cfg.client_bits(), 0);
        assert_eq!(cfg.client_count(), 1);
        assert_eq!(cfg.mark_of(&"::ffff".parse().unwrap()), 7);
        assert_eq!((cfg.first_mark(), cfg.last_mark()), (7, 7));
    }

    #[test]
    fn full_mark_space() {
        let prefix = Prefix::new(Address128::UNSPECIFIED, 0).unwrap();
        let cfg = MarkConfig::new(prefix, 32, 0).into_valid().unwrap();

        assert_eq!(cfg.client_count(), 1 << 32);
        assert_eq!((cfg.first_mark(), cfg.last_mark()), (0, u32::MAX));
    }

    #[test]
    fn shared_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ValidConfig>();
    }
}
