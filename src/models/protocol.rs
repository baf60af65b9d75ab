//! IP protocol version tags.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::Error;

/// The two IP protocol versions.
///
/// The variants are the canonical process-wide instances: comparing two
/// `Protocol` values is a tag comparison, and there is no other way to
/// obtain one. `Ipv4` orders before `Ipv6`, matching [`std::net::IpAddr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Protocol {
    /// IPv4, 32-bit addresses written as dotted quads.
    Ipv4,
    /// IPv6, 128-bit addresses written in colon-hex form.
    Ipv6,
}

impl Protocol {
    /// Address width in bits (32 or 128).
    pub const fn bits(self) -> u32 {
        match self {
            Protocol::Ipv4 => 32,
            Protocol::Ipv6 => 128,
        }
    }

    /// Packed payload size in bytes.
    pub const fn octet_count(self) -> usize {
        (self.bits() / 8) as usize
    }

    /// Payload size in big-endian 32-bit words.
    pub const fn word_count(self) -> usize {
        (self.bits() / 32) as usize
    }

    /// Classify a textual address as IPv4 or IPv6.
    ///
    /// Standard textual-form rules apply: dotted quad with octets 0-255 for
    /// IPv4, colon-hex including `::` zero compression for IPv6. Text that
    /// matches neither form fails with [`Error::InvalidFormat`].
    pub fn from_address(text: &str) -> Result<Protocol, Error> {
        match IpAddr::from_str(text) {
            Ok(IpAddr::V4(_)) => Ok(Protocol::Ipv4),
            Ok(IpAddr::V6(_)) => Ok(Protocol::Ipv6),
            Err(_) => Err(Error::InvalidFormat(text.to_string())),
        }
    }

    /// Check that a prefix length fits this protocol.
    pub fn validate_prefix(self, prefix: u32) -> Result<(), Error> {
        if prefix > self.bits() {
            Err(Error::OutOfRange {
                protocol: self,
                prefix,
                max: self.bits(),
            })
        } else {
            Ok(())
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Ipv4 => write!(f, "IPv4"),
            Protocol::Ipv6 => write!(f, "IPv6"),
        }
    }
}
