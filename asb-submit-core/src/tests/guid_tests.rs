use std::collections::HashSet;
use std::hash::{BuildHasher, RandomState};

use super::*;

fn sequential_bytes() -> [u8; 16] {
    let mut b = [0u8; 16];
    for (i, v) in b.iter_mut().enumerate() {
        *v = i as u8;
    }
    b
}

#[test]
fn empty_renders_as_zeros_and_is_falsy() {
    let g = Guid::from_bytes(&[0u8; 16]).unwrap();
    assert_eq!(g.to_string(), "00000000-0000-0000-0000-000000000000");
    assert!(g.is_empty());
    assert_eq!(g, Guid::empty());
    assert_eq!(g, Guid::default());
}

#[test]
fn from_bytes_is_little_endian_for_head_fields() {
    let g = Guid::from_bytes(&sequential_bytes()).unwrap();
    assert_eq!(g.to_string(), "03020100-0504-0706-0809-0a0b0c0d0e0f");
    assert_eq!(g.head(), (0x0302_0100, 0x0504, 0x0706));
    assert_eq!(g.tail(), [8, 9, 10, 11, 12, 13, 14, 15]);
}

#[test]
fn bytes_round_trip() {
    let samples = [
        [0u8; 16],
        [0xFF; 16],
        sequential_bytes(),
        *b"officialserver00",
    ];
    for bytes in samples {
        let g = Guid::from_bytes(&bytes).unwrap();
        assert_eq!(g.to_bytes(), bytes);
        assert_eq!(Guid::from_bytes(&g.to_bytes()).unwrap(), g);
    }
}

#[test]
fn from_bytes_rejects_wrong_length() {
    assert_eq!(
        Guid::from_bytes(&[1, 2, 3]),
        Err(FormatError::WrongLength {
            expected: 16,
            actual: 3
        })
    );
    assert!(Guid::from_bytes(&[0u8; 17]).is_err());
}

#[test]
fn sentinels_match_their_ascii_bytes() {
    assert_eq!(OFFICIAL_SERVER.to_bytes(), *b"officialserver00");
    assert_eq!(OFFICIAL_SINGLEPLAYER.to_bytes(), *b"officialsinglepl");
    assert_eq!(
        OFFICIAL_SERVER.to_string(),
        "6966666f-6963-6c61-7365-727665723030"
    );
    assert_ne!(OFFICIAL_SERVER, OFFICIAL_SINGLEPLAYER);
}

#[test]
fn int_pair_packs_small_values_into_one_u64() {
    let g = Guid::from_int_pair(1, 2).unwrap();
    assert_eq!(g.to_string(), "00000002-0001-0000-0000-000000000000");
}

#[test]
fn int_pair_uses_two_halves_when_wider_than_32_bits() {
    let a = 0x1_0000_0000u128;
    let g = Guid::from_int_pair(a, 7).unwrap();
    let mut expected = [0u8; 16];
    expected[..8].copy_from_slice(&(a as u64).to_le_bytes());
    expected[8..].copy_from_slice(&7u64.to_le_bytes());
    assert_eq!(g.to_bytes(), expected);
}

#[test]
fn int_pair_with_zero_second_takes_wide_single_value() {
    let wide = (0xAAu128 << 64) | 0xBB;
    let g = Guid::from_int_pair(wide, 0).unwrap();
    assert_eq!(g, Guid::from_int(wide));
    let mut expected = [0u8; 16];
    expected[..8].copy_from_slice(&0xAAu64.to_le_bytes());
    expected[8..].copy_from_slice(&0xBBu64.to_le_bytes());
    assert_eq!(g.to_bytes(), expected);
}

#[test]
fn int_pair_rejects_values_no_packing_fits() {
    let wide = u64::MAX as u128 + 1;
    assert_eq!(
        Guid::from_int_pair(wide, wide),
        Err(FormatError::ValueTooLarge { a: wide, b: wide })
    );
    assert!(Guid::from_int_pair(1, wide).is_err());
}

#[test]
fn int_pair_survives_string_round_trip() {
    let pairs = [
        (0u128, 0u128),
        (123_456_789, 987_654_321),
        (u32::MAX as u128, u32::MAX as u128),
        (u64::MAX as u128, 1),
        (u128::MAX, 0),
    ];
    for (a, b) in pairs {
        let g = Guid::from_int_pair(a, b).unwrap();
        let parsed = Guid::from_canonical_str(&g.to_canonical_string()).unwrap();
        assert_eq!(parsed, g, "pair ({a}, {b})");
    }
}

#[test]
fn parse_accepts_upper_case_and_renders_lower() {
    let g: Guid = "6966666F-6963-6C61-7365-727665723030".parse().unwrap();
    assert_eq!(g, OFFICIAL_SERVER);
    assert_eq!(g.to_string(), "6966666f-6963-6c61-7365-727665723030");
}

#[test]
fn parse_rejects_malformed_strings() {
    let bad = [
        "",
        "00000000-0000-0000-0000-00000000000",
        "00000000-0000-0000-0000-0000000000000",
        "00000000_0000-0000-0000-000000000000",
        "0000000-00000-0000-0000-000000000000",
        "0000000g-0000-0000-0000-000000000000",
        "+0000000-0000-0000-0000-000000000000",
        "00000000-0000-0000-0000-00000000000\u{e9}",
    ];
    for s in bad {
        assert!(
            matches!(Guid::from_canonical_str(s), Err(FormatError::BadString(_))),
            "{s:?} should be rejected"
        );
    }
}

#[test]
fn constructors_agree_on_equal_bits() {
    let from_ints = Guid::from_int_pair(0xDEAD, 0xBEEF).unwrap();
    let from_bytes = Guid::from_bytes(&from_ints.to_bytes()).unwrap();
    let from_str = Guid::from_canonical_str(&from_ints.to_string()).unwrap();

    assert_eq!(from_ints, from_bytes);
    assert_eq!(from_ints, from_str);
    assert_eq!(from_ints.hash_code(), from_bytes.hash_code());
    assert_eq!(from_ints.hash_code(), from_str.hash_code());

    let state = RandomState::new();
    assert_eq!(state.hash_one(from_ints), state.hash_one(from_str));
}

#[test]
fn hash_code_mixes_expected_fields() {
    let g = Guid::from_bytes(&sequential_bytes()).unwrap();
    let expected = 0x0302_0100u32 ^ ((0x0504u32 << 16) | 0x0706) ^ ((10u32 << 24) | 15);
    assert_eq!(g.hash_code(), expected);
    assert_eq!(Guid::empty().hash_code(), 0);
}

#[test]
fn random_is_not_empty_and_varies() {
    let ids: HashSet<Guid> = (0..32).map(|_| Guid::random()).collect();
    assert!(ids.len() > 1);
    assert!(ids.iter().all(|g| !g.is_empty()));
}

#[test]
fn random_embeds_process_id() {
    let g = Guid::random();
    let tail = g.tail();
    let pid = (std::process::id() & 0xFFFF) as u16;
    assert_eq!(u16::from_be_bytes([tail[0], tail[1]]), pid);
}
