#![no_main]

// Harness: resolve_strict
// Mixed lists of bits, names and numbers: resolution either fails without
// touching the calculator or yields a value that `has` then reports as contained.

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use permission_calculator::{PermissionCalculator, RawPermission};

#[derive(Arbitrary, Debug, Clone)]
enum Item {
    Bits(u64),
    Name(String),
    Number(f64),
    Null,
}

impl From<Item> for RawPermission {
    fn from(item: Item) -> Self {
        match item {
            Item::Bits(bits) => RawPermission::Bits(bits),
            Item::Name(name) => RawPermission::Name(name),
            Item::Number(n) => RawPermission::Number(n),
            Item::Null => RawPermission::Null,
        }
    }
}

fuzz_target!(|input: (u64, Vec<Item>)| {
    let (start, items) = input;
    let items: Vec<RawPermission> = items.into_iter().map(Into::into).collect();
    let mut calc = PermissionCalculator::from_bits(start);

    match calc.add(items.clone()) {
        Ok(_) => {
            assert!(calc.has(items.clone()).unwrap());
            calc.remove(items).unwrap();
            assert_eq!(calc.value() & start, calc.value());
        }
        Err(_) => assert_eq!(calc.value(), start),
    }
});
