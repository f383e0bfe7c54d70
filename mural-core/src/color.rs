//! RGBA color with hex and normalized-float construction.

use std::ops::Mul;

use serde::{Deserialize, Serialize};

/// A color with four 8-bit channels.
///
/// The default color is opaque white, matching the background of a
/// freshly created canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Opaque black.
    pub const BLACK: Self = Self::new(0, 0, 0, 255);

    /// Create a color from four 8-bit channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a `RRGGBB` or `#RRGGBB` hex string into an opaque color.
    ///
    /// Both forms are equivalent; alpha is always forced to opaque.
    /// Returns `None` when the string is not exactly six hex digits
    /// after the optional `#`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
            a: 255,
        })
    }

    /// Create a color from normalized channel values in `0.0..=1.0`.
    ///
    /// Values outside the range saturate at the channel limits.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_normalized(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: (r * 255.0) as u8,
            g: (g * 255.0) as u8,
            b: (b * 255.0) as u8,
            a: (a * 255.0) as u8,
        }
    }

    /// The color with red, green, and blue inverted; alpha unchanged.
    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
            a: self.a,
        }
    }

    /// Pack the channels into a `0xRRGGBBAA` integer.
    #[must_use]
    pub fn to_rgba_u32(self) -> u32 {
        u32::from(self.r) << 24
            | u32::from(self.g) << 16
            | u32::from(self.b) << 8
            | u32::from(self.a)
    }
}

impl Mul for Color {
    type Output = Self;

    /// Channel-wise multiplication in normalized space.
    fn mul(self, rhs: Self) -> Self {
        fn norm(channel: u8) -> f32 {
            f32::from(channel) / 255.0
        }
        Self::from_normalized(
            norm(self.r) * norm(rhs.r),
            norm(self.g) * norm(rhs.g),
            norm(self.b) * norm(rhs.b),
            norm(self.a) * norm(rhs.a),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_opaque_white() {
        let color = Color::default();
        assert_eq!(color, Color::new(255, 255, 255, 255));
    }

    #[test]
    fn test_from_hex_accepts_both_forms() {
        let bare = Color::from_hex("1a2b3c").expect("bare form should parse");
        let hashed = Color::from_hex("#1a2b3c").expect("hashed form should parse");
        assert_eq!(bare, hashed);
        assert_eq!(bare, Color::new(0x1a, 0x2b, 0x3c, 255));
    }

    #[test]
    fn test_from_hex_forces_opaque_alpha() {
        let color = Color::from_hex("000000").expect("should parse");
        assert_eq!(color.a, 255);
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(Color::from_hex("").is_none());
        assert!(Color::from_hex("12345").is_none());
        assert!(Color::from_hex("1234567").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
        assert!(Color::from_hex("#12345z").is_none());
        assert!(Color::from_hex("##12345").is_none());
    }

    #[test]
    fn test_from_normalized_saturates() {
        let color = Color::from_normalized(0.5, 1.5, -0.5, 1.0);
        assert_eq!(color.r, 127);
        assert_eq!(color.g, 255);
        assert_eq!(color.b, 0);
        assert_eq!(color.a, 255);
    }

    #[test]
    fn test_multiply_is_channel_wise() {
        let half_gray = Color::from_normalized(0.5, 0.5, 0.5, 1.0);
        let product = Color::WHITE * half_gray;
        assert_eq!(product, half_gray);

        let black = Color::BLACK * Color::WHITE;
        assert_eq!((black.r, black.g, black.b), (0, 0, 0));
    }

    #[test]
    fn test_inverted_preserves_alpha() {
        let color = Color::new(10, 20, 30, 40);
        let inv = color.inverted();
        assert_eq!(inv, Color::new(245, 235, 225, 40));
        assert_eq!(inv.inverted(), color);
    }

    #[test]
    fn test_to_rgba_u32_packs_in_order() {
        let color = Color::new(0x11, 0x22, 0x33, 0x44);
        assert_eq!(color.to_rgba_u32(), 0x1122_3344);
    }
}
