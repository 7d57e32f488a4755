#![no_main]

// Harness: parse_lenient
// Arbitrary strings never panic the lenient parser, and any value it accepts
// survives a decimal round-trip.

use libfuzzer_sys::fuzz_target;
use permission_calculator::PermissionCalculator;

fuzz_target!(|input: &str| {
    let bits = PermissionCalculator::parse(input);
    assert_eq!(PermissionCalculator::parse(bits.to_string()), bits);

    // Listing may drop unknown bits but never invents one.
    let names = PermissionCalculator::permissions_from_value(bits);
    let relisted = PermissionCalculator::parse_permissions(names.clone()).unwrap();
    assert_eq!(relisted & bits, relisted);
});
