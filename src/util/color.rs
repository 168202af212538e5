//! `#rrggbb` colours as written in presets.

use std::borrow::Cow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An sRGB colour stored as `0xRRGGBB`, serialized as `"#rrggbb"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(pub u32);

impl HexColor {
    /// Black.
    pub const BLACK: Self = Self(0x000000);

    /// Gamma-encoded channels in `[0, 1]`.
    pub fn to_srgb(self) -> [f32; 3] {
        let channel = |shift: u32| ((self.0 >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }

    /// Linear-light channels, for shading and sRGB render targets.
    pub fn to_linear(self) -> [f32; 3] {
        self.to_srgb().map(srgb_to_linear)
    }

    /// Linear channels with an explicit alpha.
    pub fn to_linear_rgba(self, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.to_linear();
        [r, g, b, alpha]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Rejected colour string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a colour like \"#7affff\", got {:?}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl TryFrom<String> for HexColor {
    type Error = ParseColorError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl std::str::FromStr for HexColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ParseColorError(s.to_owned()));
        }
        u32::from_str_radix(digits, 16)
            .map(Self)
            .map_err(|_| ParseColorError(s.to_owned()))
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0 & 0x00ff_ffff)
    }
}

impl JsonSchema for HexColor {
    fn schema_name() -> Cow<'static, str> {
        "HexColor".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_generator: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "pattern": "^#[0-9a-fA-F]{6}$",
            "format": "color"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!("#7affff".parse::<HexColor>().unwrap(), HexColor(0x7affff));
        assert_eq!("3A7073".parse::<HexColor>().unwrap(), HexColor(0x3a7073));
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in ["", "#fff", "#12345g", "#1234567", "+12345"] {
            assert!(bad.parse::<HexColor>().is_err(), "{bad}");
        }
    }

    #[test]
    fn displays_lowercase_six_digits() {
        assert_eq!(HexColor(0x0000ff).to_string(), "#0000ff");
        assert_eq!(HexColor(0xD5FBFD).to_string(), "#d5fbfd");
    }

    #[test]
    fn linear_conversion_endpoints() {
        assert_eq!(HexColor::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = HexColor(0xffffff).to_linear();
        assert!(white.iter().all(|c| (c - 1.0).abs() < 1e-6));
        // mid grey is darker in linear light
        let [g, _, _] = HexColor(0x808080).to_linear();
        assert!((g - 0.2158).abs() < 1e-3);
    }
}
