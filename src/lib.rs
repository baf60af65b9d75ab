//! Immutable IP addressing values: protocol versions, packed addresses, and
//! CIDR subnet blocks.
//!
//! The crate parses human-readable address and CIDR text into validated
//! binary values, derives netmasks, tests address and subnet containment,
//! and renders values back to canonical text. There is no I/O here; every
//! operation is a pure computation returning a new value.
//!
//! ```
//! use netblock::{Address, Subnet};
//!
//! let block = Subnet::parse("fec0::1/16")?;
//! assert_eq!(block.to_string(), "fec0::/16");
//! assert!(block.contains(&Address::parse("fec0:fe08::1")?));
//! # Ok::<(), netblock::Error>(())
//! ```

mod error;
pub mod models;

pub use error::Error;
pub use models::{Address, Protocol, Subnet};
