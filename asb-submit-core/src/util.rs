/// Number of bytes needed to hold `value` (zero still takes one byte).
pub fn bytes_needed(value: u128) -> u32 {
    if value == 0 {
        return 1;
    }
    (128 - value.leading_zeros()).div_ceil(8)
}

/// Whether `s` consists only of ASCII hex digits (and is non-empty).
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_needed() {
        assert_eq!(bytes_needed(0), 1);
        assert_eq!(bytes_needed(1), 1);
        assert_eq!(bytes_needed(0xFF), 1);
        assert_eq!(bytes_needed(0x100), 2);
        assert_eq!(bytes_needed(0xFFFF_FFFF), 4);
        assert_eq!(bytes_needed(0x1_0000_0000), 5);
        assert_eq!(bytes_needed(u64::MAX as u128), 8);
        assert_eq!(bytes_needed(u64::MAX as u128 + 1), 9);
        assert_eq!(bytes_needed(u128::MAX), 16);
    }

    #[test]
    fn test_is_hex() {
        assert!(is_hex("deadBEEF09"));
        assert!(!is_hex(""));
        assert!(!is_hex("+123"));
        assert!(!is_hex("12g4"));
    }
}
