//! CIDR subnet blocks.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::de;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Address, Protocol};
use crate::error::Error;

/// A CIDR block: the canonical first address, its netmask, and the prefix
/// length that produced them.
///
/// The first address is always the raw input masked down, so blocks written
/// from different host addresses inside the same network compare equal.
#[derive(Debug, Clone, Copy)]
pub struct Subnet {
    first: Address,
    netmask: Address,
    prefix: u32,
}

impl Subnet {
    /// Parse CIDR text of the form `<address>/<prefix>`.
    ///
    /// Exactly one `/` is required; the prefix must be a base-10
    /// non-negative integer and is range-checked against the protocol of the
    /// address part.
    pub fn parse(cidr: &str) -> Result<Subnet, Error> {
        log::trace!("parse subnet {cidr:?}");
        let cidr = cidr.trim();
        let parts: Vec<&str> = cidr.split('/').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidFormat(cidr.to_string()));
        }
        let address = Address::parse(parts[0])?;
        let prefix: u32 = parts[1]
            .parse()
            .map_err(|_| Error::InvalidFormat(cidr.to_string()))?;
        Subnet::new(address, prefix)
    }

    /// Build a block from any address inside it and a prefix length.
    ///
    /// The address is masked down to the network address; the host bits of
    /// the input are discarded.
    pub fn new(address: Address, prefix: u32) -> Result<Subnet, Error> {
        let netmask = Address::netmask(address.version(), prefix)?;
        let first = address.apply_netmask(&netmask)?;
        Ok(Subnet {
            first,
            netmask,
            prefix,
        })
    }

    /// The network (lowest) address of the block.
    pub fn first_address(&self) -> &Address {
        &self.first
    }

    /// The netmask derived from the prefix length.
    pub fn netmask(&self) -> &Address {
        &self.netmask
    }

    /// The prefix length.
    pub fn prefix(&self) -> u32 {
        self.prefix
    }

    /// The protocol of the block.
    pub fn version(&self) -> Protocol {
        self.first.version()
    }

    /// The broadcast (highest) address of the block: all host bits set.
    pub fn last_address(&self) -> Address {
        let words: Vec<u32> = self
            .first
            .words()
            .iter()
            .zip(self.netmask.words())
            .map(|(word, mask)| word | !mask)
            .collect();
        Address::from_words(self.version(), &words)
            .unwrap_or_else(|e| panic!("Error building last address of {}: {}", self, e))
    }

    /// Whether the block contains the address.
    ///
    /// An address of the other protocol is never contained.
    pub fn contains(&self, address: &Address) -> bool {
        match address.apply_netmask(&self.netmask) {
            Ok(masked) => masked == self.first,
            Err(_) => false,
        }
    }

    /// Strict subnet test: `other` lies inside this block and is narrower.
    ///
    /// A block never has itself, an equal-width sibling, or a wider block as
    /// a subnet.
    pub fn has_subnet(&self, other: &Subnet) -> bool {
        self.contains(other.first_address()) && self.prefix < other.prefix
    }

    /// Whether two blocks share any address.
    pub fn overlaps(&self, other: &Subnet) -> bool {
        self.contains(other.first_address()) || other.contains(self.first_address())
    }
}

impl FromStr for Subnet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Subnet, Error> {
        Subnet::parse(s)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.prefix)
    }
}

impl PartialEq for Subnet {
    fn eq(&self, other: &Subnet) -> bool {
        self.first == other.first && self.prefix == other.prefix
    }
}

impl Eq for Subnet {}

impl Hash for Subnet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.first.hash(state);
        self.prefix.hash(state);
    }
}

impl Ord for Subnet {
    fn cmp(&self, other: &Subnet) -> Ordering {
        self.first
            .cmp(&other.first)
            .then_with(|| self.prefix.cmp(&other.prefix))
    }
}

impl PartialOrd for Subnet {
    fn partial_cmp(&self, other: &Subnet) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for Subnet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Subnet {
    fn deserialize<D>(deserializer: D) -> Result<Subnet, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Subnet::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_v4() {
        let net = Subnet::parse("192.168.0.0/16").unwrap();
        assert_eq!(net.version(), Protocol::Ipv4);
        assert_eq!(net.first_address().to_string(), "192.168.0.0");
        assert_eq!(net.netmask().to_string(), "255.255.0.0");
        assert_eq!(net.prefix(), 16);
        assert_eq!(net.to_string(), "192.168.0.0/16");
    }

    #[test]
    fn test_parse_masks_host_bits() {
        // written from a host address inside the block
        let net = Subnet::parse("192.168.205.14/24").unwrap();
        assert_eq!(net.to_string(), "192.168.205.0/24");
        assert_eq!(net, Subnet::parse("192.168.205.0/24").unwrap());
    }

    #[test]
    fn test_parse_v6() {
        let net = Subnet::parse("fec0::1/16").unwrap();
        assert_eq!(net.version(), Protocol::Ipv6);
        assert_eq!(net.first_address().to_string(), "fec0::");
        assert_eq!(net.netmask().to_string(), "ffff::");
        assert_eq!(net.prefix(), 16);
        assert_eq!(net.to_string(), "fec0::/16");
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(
            Subnet::parse("  10.0.0.0/8 ").unwrap(),
            Subnet::parse("10.0.0.0/8").unwrap()
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(
            Subnet::parse("192.168.0.0").unwrap_err(),
            Error::InvalidFormat("192.168.0.0".to_string())
        );
        assert!(Subnet::parse("192.168.0.0/16/24").is_err());
        assert!(Subnet::parse("192.168.0.0/sixteen").is_err());
        assert!(Subnet::parse("192.168.0.0/-1").is_err());
        assert!(Subnet::parse("192.168.0.0/").is_err());
        assert!(Subnet::parse("bogus/16").is_err());
        assert!(Subnet::parse("/16").is_err());
        assert!(Subnet::parse("").is_err());
    }

    #[test]
    fn test_prefix_out_of_range() {
        assert_eq!(
            Subnet::parse("1.2.3.4/123").unwrap_err(),
            Error::OutOfRange {
                protocol: Protocol::Ipv4,
                prefix: 123,
                max: 32
            }
        );
        assert_eq!(
            Subnet::parse("fec0::1/300").unwrap_err(),
            Error::OutOfRange {
                protocol: Protocol::Ipv6,
                prefix: 300,
                max: 128
            }
        );
    }

    #[test]
    fn test_last_address() {
        assert_eq!(
            Subnet::parse("192.168.0.0/16")
                .unwrap()
                .last_address()
                .to_string(),
            "192.168.255.255"
        );
        assert_eq!(
            Subnet::parse("10.1.2.3/32")
                .unwrap()
                .last_address()
                .to_string(),
            "10.1.2.3"
        );
        assert_eq!(
            Subnet::parse("fec0::/16").unwrap().last_address().to_string(),
            "fec0:ffff:ffff:ffff:ffff:ffff:ffff:ffff"
        );
    }

    #[test]
    fn test_contains() {
        let net = Subnet::parse("fec0::1/16").unwrap();
        assert!(net.contains(&Address::parse("fec0:fe08:123:4567:89ab:cdef:1234:5678").unwrap()));
        assert!(net.contains(net.first_address()));
        assert!(net.contains(&net.last_address()));
        assert!(!net.contains(&Address::parse("fed0::1").unwrap()));

        // the other protocol is never contained
        assert!(!net.contains(&Address::parse("192.168.1.1").unwrap()));
    }

    #[test]
    fn test_has_subnet() {
        let wide = Subnet::parse("fec0::1/16").unwrap();
        let narrow = Subnet::parse("fec0:fe08::/32").unwrap();
        assert!(wide.has_subnet(&narrow));
        assert!(!narrow.has_subnet(&wide));

        // strict: never contains itself
        assert!(!wide.has_subnet(&wide));
        // equal prefix, different network
        assert!(!wide.has_subnet(&Subnet::parse("fed0::/16").unwrap()));
        // cross protocol
        assert!(!wide.has_subnet(&Subnet::parse("10.0.0.0/24").unwrap()));
    }

    #[test]
    fn test_overlaps() {
        let a = Subnet::parse("10.0.0.0/8").unwrap();
        let b = Subnet::parse("10.1.0.0/16").unwrap();
        let c = Subnet::parse("11.0.0.0/8").unwrap();
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(a.overlaps(&a));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&Subnet::parse("fec0::/16").unwrap()));
    }

    #[test]
    fn test_eq_and_ordering() {
        let n1 = Subnet::parse("10.0.0.0/16").unwrap();
        let n2 = Subnet::parse("10.0.0.0/16").unwrap();
        let n3 = Subnet::parse("10.0.0.0/24").unwrap();
        assert_eq!(n1, n2);
        assert_ne!(n1, n3);
        assert!(n1 < n3);

        let mut nets = vec![
            Subnet::parse("10.0.10.0/24").unwrap(),
            Subnet::parse("10.0.0.0/8").unwrap(),
            Subnet::parse("10.0.10.64/26").unwrap(),
        ];
        nets.sort();
        let rendered: Vec<String> = nets.iter().map(|n| n.to_string()).collect();
        assert_eq!(
            rendered,
            vec!["10.0.0.0/8", "10.0.10.0/24", "10.0.10.64/26"]
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let net = Subnet::parse("fec0::1/16").unwrap();
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, "\"fec0::/16\"");
        let back: Subnet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, net);

        let bad: Result<Subnet, _> = serde_json::from_str("\"10.0.0.0\"");
        assert!(bad.is_err());
    }
}
