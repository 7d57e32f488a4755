//!
//! Permission calculator: one 64-bit permission value plus the operations to
//! combine, query and enumerate it.
//!
//! Two resolution paths exist side by side:
//! * [`PermissionCalculator::parse`] is lenient. Any input it cannot turn into an exact
//!   non-negative `u64` becomes `0`, so loose wire values degrade to "no permissions".
//! * [`PermissionCalculator::parse_permission`] and everything built on it is strict.
//!   Unknown flag names and unsupported input types are returned as [`PermissionError`].

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::error::PermissionError;
use crate::flags::{self, PermissionFlags};
use crate::types::{PermissionBits, PermissionResolvable, RawPermission};

/// Holds the union of granted permission bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PermissionCalculator {
    permissions: PermissionBits,
}

impl PermissionCalculator {
    /// Creates a calculator from any resolvable input.
    ///
    /// # Errors
    /// Fails on unknown flag names or inputs that are neither bits nor names.
    pub fn new(initial: impl Into<PermissionResolvable>) -> Result<Self, PermissionError> {
        Ok(Self::from_bits(Self::parse_permissions(initial)?))
    }

    /// Wraps an already-resolved value. Unknown bits are kept.
    pub const fn from_bits(permissions: PermissionBits) -> Self {
        Self { permissions }
    }

    /// ORs the resolved input into the current value.
    ///
    /// The value is left untouched when resolution fails.
    pub fn add(&mut self, permission: impl Into<PermissionResolvable>) -> Result<&mut Self, PermissionError> {
        let bits = Self::parse_permissions(permission)?;
        tracing::trace!(current = self.permissions, adding = bits, "adding permissions");
        self.permissions |= bits;
        Ok(self)
    }

    /// Clears the resolved input's bits from the current value.
    ///
    /// The value is left untouched when resolution fails.
    pub fn remove(&mut self, permission: impl Into<PermissionResolvable>) -> Result<&mut Self, PermissionError> {
        let bits = Self::parse_permissions(permission)?;
        tracing::trace!(current = self.permissions, removing = bits, "removing permissions");
        self.permissions &= !bits;
        Ok(self)
    }

    /// Returns `true` if every bit of the resolved input is set.
    /// Multiple flags are an all-of check; an empty input is always contained.
    pub fn has(&self, permission: impl Into<PermissionResolvable>) -> Result<bool, PermissionError> {
        Ok(self.contains(Self::parse_permissions(permission)?))
    }

    #[inline]
    fn contains(&self, bits: PermissionBits) -> bool {
        (self.permissions & bits) == bits
    }

    /// The combined permission value.
    pub const fn value(&self) -> PermissionBits {
        self.permissions
    }

    /// Names of the granted flags in registry order.
    pub fn permissions_list(&self) -> Vec<&'static str> {
        self.iter().collect()
    }

    /// Lazily yields the names of the granted flags in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &'static str> {
        let current = *self;
        flags::entries()
            .filter(move |(_, bit)| current.contains(*bit))
            .map(|(name, _)| name)
    }

    /// Names of the flags contained in a raw value, parsed leniently.
    pub fn permissions_from_value(value: impl Into<RawPermission>) -> Vec<&'static str> {
        flags::names_in(Self::parse(value))
    }

    /// Converts a raw value into a permission value, falling back to `0`.
    ///
    /// Accepts bits, numbers, decimal strings (also `0x`, `0o` and `0b` prefixed) and null.
    /// Strings are trimmed and an empty string is `0`. Negative, fractional,
    /// non-finite and out-of-range inputs all yield `0`.
    pub fn parse(value: impl Into<RawPermission>) -> PermissionBits {
        let raw = value.into();
        match parse_raw(&raw) {
            Some(bits) => bits,
            None => {
                tracing::debug!(input = ?raw, "unparseable permission value, treating as no permissions");
                0
            }
        }
    }

    /// Resolves one permission or folds a list of them with bitwise OR.
    /// An empty list resolves to `0`.
    pub fn parse_permissions(value: impl Into<PermissionResolvable>) -> Result<PermissionBits, PermissionError> {
        match value.into() {
            PermissionResolvable::List(items) => {
                let mut bits = 0;
                for item in items {
                    bits |= Self::parse_permission(item)?;
                }
                Ok(bits)
            }
            PermissionResolvable::Single(item) => Self::parse_permission(item),
        }
    }

    /// Resolves a single permission.
    ///
    /// Bits are returned unchanged without checking them against the registry.
    /// Names must be registered.
    ///
    /// # Errors
    /// `InvalidKey` for an unknown name, `InvalidType` for numbers and null.
    pub fn parse_permission(item: impl Into<RawPermission>) -> Result<PermissionBits, PermissionError> {
        match item.into() {
            RawPermission::Bits(bits) => Ok(bits),
            RawPermission::Name(name) => flags::lookup(&name),
            other => Err(PermissionError::InvalidType(other.type_name())),
        }
    }
}

fn parse_raw(raw: &RawPermission) -> Option<PermissionBits> {
    match raw {
        RawPermission::Bits(bits) => Some(*bits),
        RawPermission::Null => Some(0),
        RawPermission::Name(s) => parse_numeric_str(s),
        RawPermission::Number(n) => number_to_bits(*n),
    }
}

fn parse_numeric_str(s: &str) -> Option<PermissionBits> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0);
    }
    let (digits, radix) = match s.get(..2) {
        Some("0x") | Some("0X") => (&s[2..], 16),
        Some("0o") | Some("0O") => (&s[2..], 8),
        Some("0b") | Some("0B") => (&s[2..], 2),
        _ => (s, 10),
    };
    // from_str_radix tolerates a sign after the prefix; a prefixed literal never has one.
    if radix != 10 && digits.starts_with(['+', '-']) {
        return None;
    }
    PermissionBits::from_str_radix(digits, radix).ok()
}

fn number_to_bits(n: f64) -> Option<PermissionBits> {
    // u64::MAX as f64 rounds up to 2^64, the first value out of range.
    if n.is_finite() && n.fract() == 0.0 && n >= 0.0 && n < PermissionBits::MAX as f64 {
        Some(n as PermissionBits)
    } else {
        None
    }
}

impl From<PermissionBits> for PermissionCalculator {
    fn from(bits: PermissionBits) -> Self {
        Self::from_bits(bits)
    }
}

impl From<PermissionFlags> for PermissionCalculator {
    fn from(flags: PermissionFlags) -> Self {
        Self::from_bits(flags.bits())
    }
}

impl From<PermissionCalculator> for PermissionBits {
    fn from(calculator: PermissionCalculator) -> Self {
        calculator.permissions
    }
}

/// Decimal form, the representation platforms transmit.
impl fmt::Display for PermissionCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.permissions)
    }
}

impl Serialize for PermissionCalculator {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.permissions)
    }
}

impl<'de> Deserialize<'de> for PermissionCalculator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PermissionValueVisitor)
    }
}

/// Accepts the loose shapes a payload may carry and resolves them through `parse`.
struct PermissionValueVisitor;

impl<'de> Visitor<'de> for PermissionValueVisitor {
    type Value = PermissionCalculator;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a permission value as a decimal string or an integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(PermissionCalculator::from_bits(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(PermissionCalculator::from_bits(PermissionCalculator::parse(v.to_string())))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(PermissionCalculator::from_bits(PermissionCalculator::parse(v)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(PermissionCalculator::from_bits(PermissionCalculator::parse(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PermissionCalculator::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(PermissionCalculator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KICK: PermissionBits = PermissionFlags::KICK_MEMBERS.bits();
    const BAN: PermissionBits = PermissionFlags::BAN_MEMBERS.bits();
    const ADMIN: PermissionBits = PermissionFlags::ADMINISTRATOR.bits();

    #[test]
    fn test_default_is_empty() {
        assert_eq!(PermissionCalculator::default().value(), 0);
        assert!(PermissionCalculator::default().permissions_list().is_empty());
    }

    #[test]
    fn test_new_with_initial_permissions() {
        let calc = PermissionCalculator::new(PermissionFlags::ADMINISTRATOR).unwrap();
        assert_eq!(calc.value(), ADMIN);
        let calc = PermissionCalculator::new(["KICK_MEMBERS", "BAN_MEMBERS"]).unwrap();
        assert_eq!(calc.value(), KICK | BAN);
    }

    #[test]
    fn test_add_single_and_multiple() {
        let mut calc = PermissionCalculator::default();
        calc.add(KICK).unwrap();
        assert_eq!(calc.value(), KICK);

        let mut calc = PermissionCalculator::default();
        calc.add([KICK, BAN]).unwrap();
        assert_eq!(calc.value(), KICK | BAN);
    }

    #[test]
    fn test_add_and_remove_chain() {
        let mut calc = PermissionCalculator::default();
        calc.add("ADMINISTRATOR")
            .unwrap()
            .add(["KICK_MEMBERS", "BAN_MEMBERS"])
            .unwrap()
            .remove("ADMINISTRATOR")
            .unwrap();
        assert_eq!(calc.value(), KICK | BAN);
    }

    #[test]
    fn test_remove_single_and_multiple() {
        let mut calc = PermissionCalculator::from_bits(KICK);
        calc.remove(KICK).unwrap();
        assert_eq!(calc.value(), 0);

        let mut calc = PermissionCalculator::new([KICK, BAN]).unwrap();
        calc.remove([KICK, BAN]).unwrap();
        assert_eq!(calc.value(), 0);
    }

    #[test]
    fn test_remove_unset_flag_is_noop() {
        let mut calc = PermissionCalculator::from_bits(KICK);
        calc.remove(BAN).unwrap();
        assert_eq!(calc.value(), KICK);
    }

    #[test]
    fn test_failed_add_leaves_value_untouched() {
        let mut calc = PermissionCalculator::from_bits(KICK);
        let err = calc.add(vec![RawPermission::from("BAN_MEMBERS"), RawPermission::from("NOPE")]).unwrap_err();
        assert_eq!(err, PermissionError::InvalidKey("NOPE".into()));
        assert_eq!(calc.value(), KICK);
    }

    #[test]
    fn test_has() {
        let calc = PermissionCalculator::new([KICK, BAN]).unwrap();
        assert!(calc.has(KICK).unwrap());
        assert!(calc.has("BAN_MEMBERS").unwrap());
        assert!(!calc.has(ADMIN).unwrap());
    }

    #[test]
    fn test_has_is_all_of() {
        let calc = PermissionCalculator::new(["KICK_MEMBERS", "BAN_MEMBERS"]).unwrap();
        assert!(calc.has(["KICK_MEMBERS", "BAN_MEMBERS"]).unwrap());
        assert!(!calc.has(["KICK_MEMBERS", "ADMINISTRATOR"]).unwrap());
    }

    #[test]
    fn test_has_empty_input() {
        let calc = PermissionCalculator::default();
        assert!(calc.has(0u64).unwrap());
        assert!(calc.has(Vec::<&str>::new()).unwrap());
    }

    #[test]
    fn test_has_propagates_errors() {
        let calc = PermissionCalculator::default();
        assert_eq!(calc.has(5i32), Err(PermissionError::InvalidType("number")));
    }

    #[test]
    fn test_permissions_list_uses_registry_order() {
        let calc = PermissionCalculator::new([KICK, BAN]).unwrap();
        assert_eq!(calc.permissions_list(), ["KICK_MEMBERS", "BAN_MEMBERS"]);
        let calc = PermissionCalculator::new(["BAN_MEMBERS", "KICK_MEMBERS"]).unwrap();
        assert_eq!(calc.permissions_list(), ["KICK_MEMBERS", "BAN_MEMBERS"]);
        assert_eq!(calc.iter().count(), 2);
    }

    #[test]
    fn test_permissions_from_value() {
        let mut list = PermissionCalculator::permissions_from_value(ADMIN | BAN);
        list.sort();
        assert_eq!(list, ["ADMINISTRATOR", "BAN_MEMBERS"]);
        assert_eq!(PermissionCalculator::permissions_from_value("4"), ["BAN_MEMBERS"]);
        assert!(PermissionCalculator::permissions_from_value("garbage").is_empty());
        assert!(PermissionCalculator::permissions_from_value(None::<u64>).is_empty());
    }

    #[test]
    fn test_wide_flags() {
        let calc = PermissionCalculator::new(["SEND_POLLS", "USE_EXTERNAL_APPS"]).unwrap();
        assert_eq!(calc.value(), (1 << 49) | (1 << 50));
        assert_eq!(calc.permissions_list(), ["SEND_POLLS", "USE_EXTERNAL_APPS"]);
        assert_eq!(PermissionCalculator::parse(calc.to_string()), calc.value());
    }

    #[test]
    fn test_parse_permission() {
        assert_eq!(PermissionCalculator::parse_permission("ADMINISTRATOR"), Ok(ADMIN));
        assert_eq!(PermissionCalculator::parse_permission(KICK), Ok(KICK));
        assert_eq!(PermissionCalculator::parse_permission(1u64 << 63), Ok(1 << 63));
    }

    #[test]
    fn test_parse_permission_errors() {
        let err = PermissionCalculator::parse_permission("INVALID_KEY").unwrap_err();
        assert_eq!(err.to_string(), "Invalid permission key: INVALID_KEY");
        let err = PermissionCalculator::parse_permission(123i32).unwrap_err();
        assert_eq!(err.to_string(), "Invalid permission type: number");
        let err = PermissionCalculator::parse_permission(RawPermission::Null).unwrap_err();
        assert_eq!(err, PermissionError::InvalidType("null"));
    }

    #[test]
    fn test_parse_permissions() {
        assert_eq!(PermissionCalculator::parse_permissions(["KICK_MEMBERS", "BAN_MEMBERS"]), Ok(KICK | BAN));
        assert_eq!(PermissionCalculator::parse_permissions([KICK, BAN]), Ok(KICK | BAN));
        assert_eq!(PermissionCalculator::parse_permissions(Vec::<u64>::new()), Ok(0));
        assert_eq!(
            PermissionCalculator::parse_permissions(vec![RawPermission::from("KICK_MEMBERS"), RawPermission::from(BAN)]),
            Ok(KICK | BAN)
        );
    }

    #[test]
    fn test_parse_lenient() {
        assert_eq!(PermissionCalculator::parse("123"), 123);
        assert_eq!(PermissionCalculator::parse("invalid"), 0);
        assert_eq!(PermissionCalculator::parse(None::<&str>), 0);
        assert_eq!(PermissionCalculator::parse(RawPermission::Null), 0);
        assert_eq!(PermissionCalculator::parse(" 42\n"), 42);
        assert_eq!(PermissionCalculator::parse(""), 0);
        assert_eq!(PermissionCalculator::parse("-5"), 0);
        assert_eq!(PermissionCalculator::parse("1.5"), 0);
        assert_eq!(PermissionCalculator::parse("18446744073709551615"), u64::MAX);
        assert_eq!(PermissionCalculator::parse("18446744073709551616"), 0);
    }

    #[test]
    fn test_parse_prefixed_strings() {
        assert_eq!(PermissionCalculator::parse("0x10"), 16);
        assert_eq!(PermissionCalculator::parse("0o10"), 8);
        assert_eq!(PermissionCalculator::parse("0b101"), 5);
        assert_eq!(PermissionCalculator::parse("0x"), 0);
        assert_eq!(PermissionCalculator::parse("0x-1"), 0);
    }

    #[test]
    fn test_parse_numbers() {
        assert_eq!(PermissionCalculator::parse(8i32), 8);
        assert_eq!(PermissionCalculator::parse(2048.0), 2048);
        assert_eq!(PermissionCalculator::parse(-1i32), 0);
        assert_eq!(PermissionCalculator::parse(0.5), 0);
        assert_eq!(PermissionCalculator::parse(f64::NAN), 0);
        assert_eq!(PermissionCalculator::parse(f64::INFINITY), 0);
        assert_eq!(PermissionCalculator::parse(1e20), 0);
    }

    #[test]
    fn test_display_and_conversions() {
        let calc = PermissionCalculator::from(PermissionFlags::USE_EXTERNAL_APPS);
        assert_eq!(calc.to_string(), "1125899906842624");
        assert_eq!(PermissionBits::from(calc), 1 << 50);
    }

    #[test]
    fn test_serde_uses_decimal_strings() {
        let calc = PermissionCalculator::new(["ADMINISTRATOR", "SEND_POLLS"]).unwrap();
        let json = serde_json::to_string(&calc).unwrap();
        assert_eq!(json, "\"562949953421320\"");
        let back: PermissionCalculator = serde_json::from_str(&json).unwrap();
        assert_eq!(back, calc);
    }

    #[test]
    fn test_deserialize_is_lenient() {
        let from_int: PermissionCalculator = serde_json::from_str("6").unwrap();
        assert_eq!(from_int.value(), KICK | BAN);
        let from_junk: PermissionCalculator = serde_json::from_str("\"junk\"").unwrap();
        assert_eq!(from_junk.value(), 0);
        let from_null: PermissionCalculator = serde_json::from_str("null").unwrap();
        assert_eq!(from_null.value(), 0);
        let from_negative: PermissionCalculator = serde_json::from_str("-8").unwrap();
        assert_eq!(from_negative.value(), 0);
    }
}
