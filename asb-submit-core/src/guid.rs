//! 128-bit identifiers in the classic GUID layout.
//!
//! A [`Guid`] is stored as 11 ordered sub-fields: one `u32`, two `u16` and
//! eight `u8`. The byte encoding is little-endian for the three multi-byte
//! fields followed by the eight raw bytes, so `from_bytes(g.to_bytes())`
//! always yields `g` again.
//!
//! Identifiers are built through explicit named constructors, each one
//! validating its own input:
//!
//! - [`Guid::from_bytes`] for raw 16-byte values
//! - [`Guid::from_int_pair`] / [`Guid::from_int`] for integer sources
//! - [`Guid::from_canonical_str`] (and `FromStr`) for the hyphenated form
//! - [`Guid::random`] for fresh values (best-effort unique, not secure)

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::FormatError;
use crate::util::{bytes_needed, is_hex};

/// Length of the canonical `8-4-4-4-12` string form.
pub const CANONICAL_LEN: usize = 36;

/// Byte offsets of the four hyphens in the canonical form.
const HYPHENS: [usize; 4] = [8, 13, 18, 23];

/// Identifier used for sessions declared as official servers.
pub const OFFICIAL_SERVER: Guid = Guid::from_array(*b"officialserver00");

/// Identifier used for sessions declared as official singleplayer.
pub const OFFICIAL_SINGLEPLAYER: Guid = Guid::from_array(*b"officialsinglepl");

/// A 128-bit identifier for a creature record or a server session.
///
/// The all-zero value is the "empty" sentinel (see [`Guid::is_empty`]).
/// Equality compares all 11 sub-fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Guid {
    a: u32,
    b: u16,
    c: u16,
    d: u8,
    e: u8,
    f: u8,
    g: u8,
    h: u8,
    i: u8,
    j: u8,
    k: u8,
}

impl Guid {
    /// The all-zero sentinel.
    pub const fn empty() -> Self {
        Self::from_array([0; 16])
    }

    /// Build from an exact 16-byte array.
    pub const fn from_array(b: [u8; 16]) -> Self {
        Self {
            a: u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
            b: u16::from_le_bytes([b[4], b[5]]),
            c: u16::from_le_bytes([b[6], b[7]]),
            d: b[8],
            e: b[9],
            f: b[10],
            g: b[11],
            h: b[12],
            i: b[13],
            j: b[14],
            k: b[15],
        }
    }

    /// Build from a byte slice, which must be exactly 16 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let array: [u8; 16] = bytes
            .try_into()
            .map_err(|_| FormatError::wrong_length(bytes.len()))?;
        Ok(Self::from_array(array))
    }

    /// Build from a pair of integers, picking the narrowest packing that
    /// holds both values losslessly:
    ///
    /// 1. both fit in 32 bits: `(a << 32) | b` as one little-endian `u64`,
    ///    upper 8 bytes zero
    /// 2. both fit in 64 bits: `a` then `b`, each a little-endian `u64`
    /// 3. `b` is zero: `a` alone, as in [`Guid::from_int`]
    ///
    /// Anything else is [`FormatError::ValueTooLarge`].
    pub fn from_int_pair(a: u128, b: u128) -> Result<Self, FormatError> {
        if bytes_needed(a) <= 8 && bytes_needed(b) <= 8 {
            Ok(Self::from_u64_pair(a as u64, b as u64))
        } else if b == 0 {
            Ok(Self::from_int(a))
        } else {
            Err(FormatError::value_too_large(a, b))
        }
    }

    /// [`Guid::from_int_pair`] for values already known to fit in 64 bits,
    /// where no packing can fail.
    pub fn from_u64_pair(a: u64, b: u64) -> Self {
        if a <= u32::MAX as u64 && b <= u32::MAX as u64 {
            Self::from_halves((a << 32) | b, 0)
        } else {
            Self::from_halves(a, b)
        }
    }

    /// Build from a single integer of up to 128 bits.
    ///
    /// Values that fit in 64 bits occupy the first 8 bytes (little-endian);
    /// wider values are split into high and low 64-bit halves, each written
    /// little-endian in that order.
    pub fn from_int(value: u128) -> Self {
        if bytes_needed(value) <= 8 {
            Self::from_halves(value as u64, 0)
        } else {
            Self::from_halves((value >> 64) as u64, value as u64)
        }
    }

    fn from_halves(first: u64, second: u64) -> Self {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&first.to_le_bytes());
        bytes[8..].copy_from_slice(&second.to_le_bytes());
        Self::from_array(bytes)
    }

    /// Parse the 36-character `XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX` form.
    ///
    /// Hex digits may be upper or lower case; rendering is always lower case.
    pub fn from_canonical_str(s: &str) -> Result<Self, FormatError> {
        let bad = || FormatError::bad_string(s);
        if s.len() != CANONICAL_LEN || !s.is_ascii() {
            return Err(bad());
        }
        let bytes = s.as_bytes();
        if HYPHENS.iter().any(|&pos| bytes[pos] != b'-') {
            return Err(bad());
        }
        let groups: Vec<&str> = s.split('-').collect();
        if groups.len() != 5 || !groups.iter().all(|g| is_hex(g)) {
            return Err(bad());
        }

        let hex = |digits: &str| u32::from_str_radix(digits, 16).map_err(|_| bad());
        let byte = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| bad());
        let tail = groups[4];
        Ok(Self {
            a: hex(groups[0])?,
            b: hex(groups[1])? as u16,
            c: hex(groups[2])? as u16,
            d: byte(&groups[3][0..2])?,
            e: byte(&groups[3][2..4])?,
            f: byte(&tail[0..2])?,
            g: byte(&tail[2..4])?,
            h: byte(&tail[4..6])?,
            i: byte(&tail[6..8])?,
            j: byte(&tail[8..10])?,
            k: byte(&tail[10..12])?,
        })
    }

    /// Generate a fresh identifier.
    ///
    /// Layout: a random `u32`, the lower 32 bits of a host identifier, the
    /// low 16 bits of the process id, and the low 48 bits of the current
    /// Unix time in microseconds (three 16-bit chunks). Uniqueness depends on
    /// clock granularity and pid reuse; this is not a security primitive.
    pub fn random() -> Self {
        let host = host_id();
        let pid = (std::process::id() & 0xFFFF) as u16;
        let micros = chrono::Utc::now().timestamp_micros() as u64 & 0xFFFF_FFFF_FFFF;
        let [pid_hi, pid_lo] = pid.to_be_bytes();
        let ts = micros.to_be_bytes();
        Self {
            a: rand::random(),
            b: (host >> 16) as u16,
            c: host as u16,
            d: pid_hi,
            e: pid_lo,
            f: ts[2],
            g: ts[3],
            h: ts[4],
            i: ts[5],
            j: ts[6],
            k: ts[7],
        }
    }

    /// Whether this is the all-zero sentinel.
    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }

    /// The 16-byte little-endian encoding, inverse of [`Guid::from_bytes`].
    pub fn to_bytes(&self) -> [u8; 16] {
        let mut out = [0u8; 16];
        out[0..4].copy_from_slice(&self.a.to_le_bytes());
        out[4..6].copy_from_slice(&self.b.to_le_bytes());
        out[6..8].copy_from_slice(&self.c.to_le_bytes());
        out[8..].copy_from_slice(&self.tail());
        out
    }

    /// The lowercase hyphenated form; same as `to_string()`.
    pub fn to_canonical_string(&self) -> String {
        self.to_string()
    }

    /// The three multi-byte fields.
    pub fn head(&self) -> (u32, u16, u16) {
        (self.a, self.b, self.c)
    }

    /// The eight trailing single-byte fields.
    pub fn tail(&self) -> [u8; 8] {
        [
            self.d, self.e, self.f, self.g, self.h, self.i, self.j, self.k,
        ]
    }

    /// Non-cryptographic hash, stable across processes.
    ///
    /// `a ^ (b << 16 | c) ^ (f << 24 | k)`
    pub fn hash_code(&self) -> u32 {
        self.a
            ^ (((self.b as u32) << 16) | self.c as u32)
            ^ (((self.f as u32) << 24) | self.k as u32)
    }
}

impl Hash for Guid {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.hash_code());
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.a, self.b, self.c, self.d, self.e, self.f, self.g, self.h, self.i, self.j, self.k
        )
    }
}

impl FromStr for Guid {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_canonical_str(s)
    }
}

impl TryFrom<&[u8]> for Guid {
    type Error = FormatError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl From<[u8; 16]> for Guid {
    fn from(bytes: [u8; 16]) -> Self {
        Self::from_array(bytes)
    }
}

/// Lower 32 bits of an MD5 over the host name, computed once per process.
fn host_id() -> u32 {
    static HOST_ID: OnceLock<u32> = OnceLock::new();
    *HOST_ID.get_or_init(|| {
        let name = hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_default();
        let digest = md5::compute(name.as_bytes()).0;
        u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]])
    })
}

#[cfg(test)]
#[path = "tests/guid_tests.rs"]
mod tests;
