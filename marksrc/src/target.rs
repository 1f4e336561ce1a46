//! Mark packets by their IPv6 source address.
//!
//! [`MarkTarget`] is the per-packet side of a rule. It owns a validated
//! configuration and only reads it, so one target can serve any number of
//! threads at once.
use log::debug;
use smoltcp::wire::Ipv6Packet;

use crate::addr::Address128;
use crate::mark::ValidConfig;

quick_error! {
    /// A buffer that does not start with a usable IPv6 header.
    #[allow(missing_docs)]
    #[derive(Debug, Clone, Copy, Eq, PartialEq)]
    pub enum TargetError {
        /// The `len` byte buffer is shorter than the IPv6 header, or than the
        /// payload length it announces.
        Truncated { len: usize } {
            display("truncated IPv6 packet of {} bytes", len)
        }
        /// Not an IPv6 packet.
        Version(version: u8) {
            display("IP version {} is not supported", version)
        }
    }
}

/// What the caller should do with a packet after it was marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Keep evaluating the packet; marking never drops or accepts it.
    Continue,
}

/// Marks packets according to one [`ValidConfig`].
#[derive(Debug, Clone)]
pub struct MarkTarget {
    cfg: ValidConfig,
}

impl MarkTarget {
    /// Create a target for `cfg`.
    pub fn new(cfg: ValidConfig) -> Self {
        Self { cfg }
    }

    /// The configuration used by this target.
    pub fn config(&self) -> &ValidConfig {
        &self.cfg
    }

    /// Compute the mark of the IPv6 packet in `pkt`.
    ///
    /// Since the configuration describes prefixes, every packet whose source
    /// falls in a sub-prefix gets that sub-prefix's mark, not just the
    /// sub-prefix's first address.
    pub fn mark_packet(&self, pkt: &[u8]) -> Result<u32, TargetError> {
        let src = source_address(pkt)?;
        let mark = self.cfg.mark_of(&src);
        debug!("Packet from {} was marked {}.", src, mark);
        Ok(mark)
    }

    /// Write the mark of `pkt` into the packet metadata `mark`.
    ///
    /// On error `mark` is left untouched.
    pub fn apply(&self, pkt: &[u8], mark: &mut u32) -> Result<Verdict, TargetError> {
        *mark = self.mark_packet(pkt)?;
        Ok(Verdict::Continue)
    }
}

/// Read the source address of the IPv6 header at the start of `pkt`.
pub fn source_address(pkt: &[u8]) -> Result<Address128, TargetError> {
    let ipv6 =
        Ipv6Packet::new_checked(pkt).map_err(|_| TargetError::Truncated { len: pkt.len() })?;
    if ipv6.version() != 6 {
        return_err!(TargetError::Version(ipv6.version()))
    }

    Address128::from_slice(ipv6.src_addr().as_bytes())
        .ok_or(TargetError::Truncated { len: pkt.len() })
}
