//! Validated `#RRGGBB` color strings.

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// A display color in `#RRGGBB` form.
///
/// The original spelling is preserved so colors round-trip unchanged
/// through configuration and rendering payloads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor(String);

impl HexColor {
    /// Parse a `#RRGGBB` string.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidColor`] if the value is not a `#` followed by
    /// exactly six hex digits.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        let digits = value.strip_prefix('#').unwrap_or_default();
        if digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(value.to_string()))
        } else {
            Err(CoreError::InvalidColor {
                value: value.to_string(),
            })
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Red, green and blue channels.
    #[must_use]
    pub fn rgb(&self) -> (u8, u8, u8) {
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.0[range], 16).unwrap_or_default()
        };
        (channel(1..3), channel(3..5), channel(5..7))
    }

    /// CSS `rgba(...)` form with the given opacity, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn rgba(&self, opacity: f64) -> String {
        let (r, g, b) = self.rgb();
        format!("rgba({r}, {g}, {b}, {})", opacity.clamp(0.0, 1.0))
    }
}

impl TryFrom<String> for HexColor {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.0
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl JsonSchema for HexColor {
    fn schema_name() -> Cow<'static, str> {
        "HexColor".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": "^#[0-9A-Fa-f]{6}$"
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("#1f77b4")]
    #[case("#2E8B57")]
    #[case("#000000")]
    fn accepts_six_hex_digits(#[case] value: &str) {
        let color = HexColor::parse(value).unwrap();
        assert_eq!(color.as_str(), value);
    }

    #[rstest]
    #[case("1f77b4")]
    #[case("#fff")]
    #[case("#12345g")]
    #[case("#1234567")]
    #[case("")]
    fn rejects_malformed_colors(#[case] value: &str) {
        assert!(matches!(
            HexColor::parse(value),
            Err(CoreError::InvalidColor { .. })
        ));
    }

    #[test]
    fn rgba_uses_channels_and_opacity() {
        let color = HexColor::parse("#1f77b4").unwrap();
        assert_eq!(color.rgb(), (31, 119, 180));
        assert_eq!(color.rgba(0.6), "rgba(31, 119, 180, 0.6)");
        assert_eq!(color.rgba(3.0), "rgba(31, 119, 180, 1)");
    }

    #[test]
    fn deserialization_validates() {
        let ok: HexColor = serde_json::from_str("\"#d62728\"").unwrap();
        assert_eq!(ok.to_string(), "#d62728");
        assert!(serde_json::from_str::<HexColor>("\"red\"").is_err());
    }
}
