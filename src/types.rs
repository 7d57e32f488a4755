//!
//! Input and value types shared by the registry and the calculator.

use crate::flags::PermissionFlags;

/// A permission value: the bitwise OR of zero or more flag bits.
/// Always a full 64-bit unsigned integer; flags above bit 31 and above bit 53
/// are routine, so narrower or floating-point storage is never used.
pub type PermissionBits = u64;

/// One loosely typed permission input, as it arrives from caller code or a wire payload.
///
/// Only `Bits` and `Name` are accepted by the strict resolution path. `Number` and
/// `Null` exist so the lenient `parse` can ingest them and the strict path can
/// name the offending type.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPermission {
    /// An already-resolved bit value. Accepted as-is, unknown bits included.
    Bits(PermissionBits),
    /// A flag name, or a numeric string when handed to `parse`.
    Name(String),
    /// A plain (floating-point) number.
    Number(f64),
    /// An absent value.
    Null,
}

impl RawPermission {
    /// Descriptive name of the variant's type, used in `InvalidType` errors.
    pub fn type_name(&self) -> &'static str {
        match self {
            RawPermission::Bits(_) => "bits",
            RawPermission::Name(_) => "string",
            RawPermission::Number(_) => "number",
            RawPermission::Null => "null",
        }
    }
}

impl From<PermissionBits> for RawPermission {
    fn from(bits: PermissionBits) -> Self {
        RawPermission::Bits(bits)
    }
}

impl From<PermissionFlags> for RawPermission {
    fn from(flags: PermissionFlags) -> Self {
        RawPermission::Bits(flags.bits())
    }
}

impl From<&str> for RawPermission {
    fn from(name: &str) -> Self {
        RawPermission::Name(name.to_owned())
    }
}

impl From<String> for RawPermission {
    fn from(name: String) -> Self {
        RawPermission::Name(name)
    }
}

impl From<f64> for RawPermission {
    fn from(n: f64) -> Self {
        RawPermission::Number(n)
    }
}

// Signed integers are numbers, not bit values; only `u64` means bits.
impl From<i32> for RawPermission {
    fn from(n: i32) -> Self {
        RawPermission::Number(f64::from(n))
    }
}

impl<T: SingleFlag> From<Option<T>> for RawPermission {
    fn from(value: Option<T>) -> Self {
        value.map_or(RawPermission::Null, Into::into)
    }
}

/// Marker for types that convert into a single [`RawPermission`].
/// Drives the blanket conversions into [`PermissionResolvable`].
pub trait SingleFlag: Into<RawPermission> {}

impl SingleFlag for RawPermission {}
impl SingleFlag for PermissionBits {}
impl SingleFlag for PermissionFlags {}
impl SingleFlag for &str {}
impl SingleFlag for String {}
impl SingleFlag for f64 {}
impl SingleFlag for i32 {}
impl<T: SingleFlag> SingleFlag for Option<T> {}

/// One permission or an ordered list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum PermissionResolvable {
    Single(RawPermission),
    List(Vec<RawPermission>),
}

impl Default for PermissionResolvable {
    fn default() -> Self {
        PermissionResolvable::Single(RawPermission::Bits(0))
    }
}

impl<T: SingleFlag> From<T> for PermissionResolvable {
    fn from(item: T) -> Self {
        PermissionResolvable::Single(item.into())
    }
}

impl<T: SingleFlag> From<Vec<T>> for PermissionResolvable {
    fn from(items: Vec<T>) -> Self {
        PermissionResolvable::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: SingleFlag, const N: usize> From<[T; N]> for PermissionResolvable {
    fn from(items: [T; N]) -> Self {
        PermissionResolvable::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: SingleFlag + Clone> From<&[T]> for PermissionResolvable {
    fn from(items: &[T]) -> Self {
        PermissionResolvable::List(items.iter().cloned().map(Into::into).collect())
    }
}
