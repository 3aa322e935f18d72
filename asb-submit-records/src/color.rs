use std::fmt;

use crate::error::ExtractionError;
use crate::fields::FieldKind;

/// One color region of a creature.
///
/// Channels are always stored normalized to `0.0..=1.0`, which is what game
/// exports contain. [`Color::from_rgba8`] converts from 0–255 values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        let n = |v: u8| v as f64 / 255.0;
        Self::new(n(r), n(g), n(b), n(a))
    }

    /// Parse `(R=0.1,G=0.2,B=0.3,A=1.0)`.
    ///
    /// Channel keys are case-insensitive and may come in any order; a channel
    /// that is not mentioned stays at zero.
    pub fn parse(field: &str, raw: &str) -> Result<Self, ExtractionError> {
        let body = raw.trim().trim_start_matches('(').trim_end_matches(')');
        let mut color = Self::default();
        for part in body.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| ExtractionError::color(field, raw))?;
            let value: f64 = value
                .trim()
                .parse()
                .map_err(|_| ExtractionError::field(field, FieldKind::Float, value.trim()))?;
            match key.trim().to_ascii_lowercase().as_str() {
                "r" => color.r = value,
                "g" => color.g = value,
                "b" => color.b = value,
                "a" => color.a = value,
                _ => return Err(ExtractionError::color(field, raw)),
            }
        }
        Ok(color)
    }

    /// Render as `(R=..,G=..,B=..,A=..)`, either normalized with six
    /// decimals or as truncated 0–255 integers.
    pub fn to_rgba_string(&self, hex_values: bool) -> String {
        if hex_values {
            let h = |v: f64| (v * 255.0) as i64;
            format!(
                "(R={},G={},B={},A={})",
                h(self.r),
                h(self.g),
                h(self.b),
                h(self.a)
            )
        } else {
            format!(
                "(R={:.6},G={:.6},B={:.6},A={:.6})",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rgba_string(false))
    }
}
