//! Colour tokens and alpha blending for calendar blocks.
//!
//! Events and courses carry either one of eight named palette tokens or a
//! literal hex string. Both resolve to an [`Rgba`] value that renders as a
//! CSS `rgba(...)` string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Fixed palette of semantic colour tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamedColor {
    #[default]
    Blue,
    Green,
    Red,
    Yellow,
    Purple,
    Pink,
    Indigo,
    Teal,
}

impl NamedColor {
    pub const ALL: [NamedColor; 8] = [
        Self::Blue,
        Self::Green,
        Self::Red,
        Self::Yellow,
        Self::Purple,
        Self::Pink,
        Self::Indigo,
        Self::Teal,
    ];

    /// Look up a token case-insensitively.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "blue" => Some(Self::Blue),
            "green" => Some(Self::Green),
            "red" => Some(Self::Red),
            "yellow" => Some(Self::Yellow),
            "purple" => Some(Self::Purple),
            "pink" => Some(Self::Pink),
            "indigo" => Some(Self::Indigo),
            "teal" => Some(Self::Teal),
            _ => None,
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Red => "red",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Indigo => "indigo",
            Self::Teal => "teal",
        }
    }

    /// Palette entry as `#rrggbb`.
    pub fn hex(&self) -> &'static str {
        match self {
            Self::Blue => "#3b82f6",
            Self::Green => "#22c55e",
            Self::Red => "#ef4444",
            Self::Yellow => "#facc15",
            Self::Purple => "#a855f7",
            Self::Pink => "#ec4899",
            Self::Indigo => "#6366f1",
            Self::Teal => "#14b8a6",
        }
    }

    fn rgb(&self) -> (u8, u8, u8) {
        // Palette literals are well-formed; blue is the last resort.
        parse_hex(self.hex()).unwrap_or((0x3b, 0x82, 0xf6))
    }
}

/// Colour of an event or course: a palette token or a hex literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Color {
    Named(NamedColor),
    Hex(String),
}

impl Default for Color {
    fn default() -> Self {
        Self::Named(NamedColor::Blue)
    }
}

impl Color {
    /// Parse a wire value. Strings starting with `#` are hex literals,
    /// anything else is a token; unknown tokens fall back to blue.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.starts_with('#') {
            return Self::Hex(value.to_string());
        }
        match NamedColor::from_token(value) {
            Some(named) => Self::Named(named),
            None => {
                tracing::debug!("unknown colour token '{value}', using blue");
                Self::Named(NamedColor::Blue)
            }
        }
    }

    /// Red, green and blue components.
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Self::Named(named) => named.rgb(),
            Self::Hex(hex) => parse_hex(hex).unwrap_or_else(|| {
                tracing::debug!("malformed hex colour '{hex}', using blue");
                NamedColor::Blue.rgb()
            }),
        }
    }

    /// Blend with the given alpha, clamped to `[0, 1]`.
    pub fn rgba(&self, alpha: f32) -> Rgba {
        let (r, g, b) = self.rgb();
        Rgba {
            r,
            g,
            b,
            a: alpha.clamp(0.0, 1.0),
        }
    }

    /// Normalised `#rrggbb` form.
    pub fn to_hex(&self) -> String {
        let (r, g, b) = self.rgb();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => f.write_str(named.token()),
            Self::Hex(hex) => f.write_str(hex),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// A colour with alpha, rendered as `rgba(r, g, b, a)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse `#RGB` or `#RRGGBB`, expanding the shorthand form.
pub fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let digits = value.trim().strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let expanded = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect::<String>(),
        6 => digits.to_string(),
        _ => return None,
    };

    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blue_token_is_stable() {
        let first = Color::parse("blue").rgba(0.35).to_string();
        let second = Color::Named(NamedColor::Blue).rgba(0.35).to_string();
        assert_eq!(first, "rgba(59, 130, 246, 0.35)");
        assert_eq!(first, second);
    }

    #[test]
    fn shorthand_hex_expands() {
        assert_eq!(parse_hex("#fff"), Some((255, 255, 255)));
        assert_eq!(
            Color::parse("#fff").rgba(0.5),
            Color::parse("#ffffff").rgba(0.5)
        );
        assert_eq!(Color::parse("#AbC").to_hex(), "#aabbcc");
    }

    #[test]
    fn malformed_hex_is_rejected_by_parser() {
        assert_eq!(parse_hex("#ffff"), None);
        assert_eq!(parse_hex("#ggg"), None);
        assert_eq!(parse_hex("fff"), None);
        assert_eq!(parse_hex("#"), None);
    }

    #[test]
    fn malformed_hex_resolves_to_blue() {
        assert_eq!(Color::Hex("#12".into()).rgb(), (0x3b, 0x82, 0xf6));
    }

    #[test]
    fn unknown_token_defaults_to_blue() {
        assert_eq!(Color::parse("chartreuse"), Color::Named(NamedColor::Blue));
        assert_eq!(Color::parse(""), Color::Named(NamedColor::Blue));
    }

    #[test]
    fn tokens_are_case_insensitive() {
        assert_eq!(Color::parse("Teal"), Color::Named(NamedColor::Teal));
        assert_eq!(Color::parse(" PINK "), Color::Named(NamedColor::Pink));
    }

    #[test]
    fn every_palette_entry_parses() {
        for named in NamedColor::ALL {
            assert!(parse_hex(named.hex()).is_some(), "{}", named.token());
            assert_eq!(NamedColor::from_token(named.token()), Some(named));
        }
    }

    #[test]
    fn alpha_is_clamped() {
        assert_eq!(Color::default().rgba(4.0).a, 1.0);
        assert_eq!(Color::default().rgba(-1.0).a, 0.0);
    }

    #[test]
    fn serde_uses_wire_string() {
        let color: Color = serde_json::from_str("\"#10b981\"").unwrap();
        assert_eq!(color, Color::Hex("#10b981".into()));
        assert_eq!(serde_json::to_string(&Color::parse("green")).unwrap(), "\"green\"");
        let rgba = serde_json::to_string(&Color::parse("red").rgba(0.85)).unwrap();
        assert_eq!(rgba, "\"rgba(239, 68, 68, 0.85)\"");
    }
}
