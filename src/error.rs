//! Crate-wide error type.

use crate::models::Protocol;

/// Errors produced while parsing or combining addressing values.
///
/// Every failure is detected before any value is constructed; no operation
/// returns a partially built address or subnet.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Text does not parse as an address, or CIDR text is malformed
    /// (wrong separator count, non-numeric prefix).
    #[error("invalid address format: {0:?}")]
    InvalidFormat(String),

    /// Prefix length outside `0..=bits` for the protocol.
    #[error("prefix length {prefix} out of range for {protocol} (maximum {max})")]
    OutOfRange {
        /// Protocol the prefix was validated against.
        protocol: Protocol,
        /// The rejected prefix length.
        prefix: u32,
        /// Largest prefix the protocol allows.
        max: u32,
    },

    /// An IPv4 value was combined with an IPv6 value, or vice versa.
    #[error("protocol mismatch: expected an {expected} operand, got {found}")]
    ProtocolMismatch {
        /// Protocol of the value the operation was called on.
        expected: Protocol,
        /// Protocol of the operand that was passed in.
        found: Protocol,
    },

    /// Wrong number of 32-bit words for the protocol.
    #[error("{protocol} addresses take {expected} words, got {found}")]
    ArityMismatch {
        /// Protocol the words were assembled for.
        protocol: Protocol,
        /// Word count the protocol requires.
        expected: usize,
        /// Word count that was passed in.
        found: usize,
    },
}
