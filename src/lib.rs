#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(deprecated)]

//!
//! Bitmask permission calculator.
//!
//! A fixed registry of named permission flags, each owning one bit of a `u64`,
//! and a small calculator that combines, queries and enumerates them.
//!
//! ```
//! use permission_calculator::{PermissionCalculator, PermissionFlags};
//!
//! let mut calc = PermissionCalculator::new(["KICK_MEMBERS", "BAN_MEMBERS"])?;
//! calc.add(PermissionFlags::SEND_POLLS)?;
//! assert!(calc.has(["KICK_MEMBERS", "SEND_POLLS"])?);
//! assert!(!calc.has("ADMINISTRATOR")?);
//! assert_eq!(calc.permissions_list(), ["KICK_MEMBERS", "BAN_MEMBERS", "SEND_POLLS"]);
//! # Ok::<(), permission_calculator::PermissionError>(())
//! ```

// Permission value and resolvable input types.
pub mod types;

// Flag registry: names, bits and declaration order.
pub mod flags;

// The calculator and its parsing utilities.
pub mod calculator;

// Error types.
pub mod error;

pub use calculator::PermissionCalculator;
pub use error::PermissionError;
pub use flags::PermissionFlags;
pub use types::{PermissionBits, PermissionResolvable, RawPermission, SingleFlag};
