//! Packed IP addresses with word-level access and netmask math.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use super::Protocol;
use crate::error::Error;

/// A single IP address: a protocol tag plus its packed binary payload.
///
/// The payload occupies the first [`Protocol::octet_count`] bytes of a fixed
/// 16-byte buffer; for IPv4 the tail stays zero. The value is immutable and
/// every transformation ([`Address::apply_netmask`]) yields a new one.
#[derive(Debug, Clone, Copy)]
pub struct Address {
    protocol: Protocol,
    bytes: [u8; 16],
}

impl Address {
    /// Parse a textual address, detecting the protocol from its form.
    pub fn parse(text: &str) -> Result<Address, Error> {
        log::trace!("parse address {text:?}");
        match IpAddr::from_str(text) {
            Ok(addr) => Ok(Address::from(addr)),
            Err(_) => Err(Error::InvalidFormat(text.to_string())),
        }
    }

    /// Build an address from big-endian 32-bit words, most significant first.
    ///
    /// Exactly [`Protocol::word_count`] words are required.
    pub fn from_words(protocol: Protocol, words: &[u32]) -> Result<Address, Error> {
        let expected = protocol.word_count();
        if words.len() != expected {
            return Err(Error::ArityMismatch {
                protocol,
                expected,
                found: words.len(),
            });
        }
        let mut bytes = [0u8; 16];
        for (chunk, word) in bytes.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        Ok(Address { protocol, bytes })
    }

    /// Build the netmask for a prefix length: the top `prefix` bits set.
    pub fn netmask(protocol: Protocol, prefix: u32) -> Result<Address, Error> {
        protocol.validate_prefix(prefix)?;
        let mut remaining = prefix;
        let mut words = Vec::with_capacity(protocol.word_count());
        for _ in 0..protocol.word_count() {
            let bits = remaining.min(32);
            let right_len = 32 - bits;
            // Widened so the shift stays defined when the block is empty.
            let word = ((u32::MAX as u64 >> right_len) << right_len) as u32;
            words.push(word);
            remaining -= bits;
        }
        Address::from_words(protocol, &words)
    }

    /// The payload decomposed into big-endian 32-bit words, most significant
    /// word first.
    pub fn words(&self) -> Vec<u32> {
        self.octets()
            .chunks_exact(4)
            .map(|chunk| u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect()
    }

    /// Apply a netmask of the same protocol, yielding the network address.
    ///
    /// Neither operand is modified. A netmask of the other protocol fails
    /// with [`Error::ProtocolMismatch`] naming both versions.
    pub fn apply_netmask(&self, netmask: &Address) -> Result<Address, Error> {
        if netmask.protocol != self.protocol {
            return Err(Error::ProtocolMismatch {
                expected: self.protocol,
                found: netmask.protocol,
            });
        }
        let words: Vec<u32> = self
            .words()
            .iter()
            .zip(netmask.words())
            .map(|(word, mask)| word & mask)
            .collect();
        Address::from_words(self.protocol, &words)
    }

    /// The protocol this address belongs to.
    pub fn version(&self) -> Protocol {
        self.protocol
    }

    /// The packed payload: 4 bytes for IPv4, 16 for IPv6.
    pub fn octets(&self) -> &[u8] {
        &self.bytes[..self.protocol.octet_count()]
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Address {
        let mut bytes = [0u8; 16];
        bytes[..4].copy_from_slice(&addr.octets());
        Address {
            protocol: Protocol::Ipv4,
            bytes,
        }
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Address {
        Address {
            protocol: Protocol::Ipv6,
            bytes: addr.octets(),
        }
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Address {
        match addr {
            IpAddr::V4(v4) => Address::from(v4),
            IpAddr::V6(v6) => Address::from(v6),
        }
    }
}

impl From<Address> for IpAddr {
    fn from(addr: Address) -> IpAddr {
        match addr.protocol {
            Protocol::Ipv4 => IpAddr::V4(Ipv4Addr::new(
                addr.bytes[0],
                addr.bytes[1],
                addr.bytes[2],
                addr.bytes[3],
            )),
            Protocol::Ipv6 => IpAddr::V6(Ipv6Addr::from(addr.bytes)),
        }
    }
}

impl FromStr for Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Address, Error> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", IpAddr::from(*self))
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Address) -> bool {
        if self.protocol != other.protocol {
            return false;
        }
        // Full-buffer compare; never returns early on the first
        // differing byte.
        let mut diff = 0u8;
        for (a, b) in self.bytes.iter().zip(other.bytes.iter()) {
            diff |= a ^ b;
        }
        diff == 0
    }
}

impl Eq for Address {}

impl Hash for Address {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.protocol.hash(state);
        self.bytes.hash(state);
    }
}

impl Ord for Address {
    fn cmp(&self, other: &Address) -> Ordering {
        self.protocol
            .cmp(&other.protocol)
            .then_with(|| self.bytes.cmp(&other.bytes))
    }
}

impl PartialOrd for Address {
    fn partial_cmp(&self, other: &Address) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s).map_err(de::Error::custom)
    }
}
