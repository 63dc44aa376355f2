#![forbid(unsafe_code)]

//! Particle colors and the color specification that resolves them.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Keyword selecting an independent random color for every particle.
pub const RANDOM_KEYWORD: &str = "random-per-particle";

/// Legacy spelling of [`RANDOM_KEYWORD`].
pub const RANDOM_KEYWORD_LEGACY: &str = "rainbow";

/// A resolved, concrete sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse CSS hex notation (`#rgb` or `#rrggbb`, case-insensitive).
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidColor(s.to_owned());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |hex: &str| u8::from_str_radix(hex, 16).map_err(|_| invalid());
        match digits.len() {
            3 => {
                let expand = |i: usize| channel(&digits[i..=i].repeat(2));
                Ok(Self::new(expand(0)?, expand(1)?, expand(2)?))
            }
            6 => Ok(Self::new(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            _ => Err(invalid()),
        }
    }

    /// Uniformly random 24-bit color.
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let v: u32 = rng.random_range(0..=0x00FF_FFFF);
        Self::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Lowercase `#rrggbb`, suitable for a canvas `fillStyle`.
    #[must_use]
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// How each particle's color is chosen at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawColorSpec", into = "RawColorSpec")]
pub enum ColorSpec {
    /// Every particle shares this color.
    Single(Rgb),
    /// Each particle picks one entry uniformly.
    Palette(Vec<Rgb>),
    /// Each particle gets its own random color.
    RandomPerParticle,
}

impl ColorSpec {
    /// Parse a single string: a hex color or the random keyword.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case(RANDOM_KEYWORD)
            || trimmed.eq_ignore_ascii_case(RANDOM_KEYWORD_LEGACY)
        {
            return Ok(Self::RandomPerParticle);
        }
        Rgb::from_hex(trimmed).map(Self::Single)
    }

    /// Build a palette, rejecting an empty list.
    pub fn palette<I, S>(colors: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let colors = colors
            .into_iter()
            .map(|c| Rgb::from_hex(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        if colors.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        Ok(Self::Palette(colors))
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Palette(colors) if colors.is_empty() => Err(ConfigError::EmptyPalette),
            _ => Ok(()),
        }
    }

    /// Resolve the concrete color for one particle.
    pub fn resolve<R: Rng>(&self, rng: &mut R) -> Rgb {
        match self {
            Self::Single(c) => *c,
            Self::Palette(colors) => match colors.len() {
                0 => Rgb::WHITE,
                n => colors[rng.random_range(0..n)],
            },
            Self::RandomPerParticle => Rgb::random(rng),
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        Self::Single(Rgb::WHITE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawColorSpec {
    One(String),
    Many(Vec<String>),
}

impl TryFrom<RawColorSpec> for ColorSpec {
    type Error = ConfigError;

    fn try_from(raw: RawColorSpec) -> Result<Self, Self::Error> {
        match raw {
            RawColorSpec::One(s) => Self::parse(&s),
            RawColorSpec::Many(list) => Self::palette(list),
        }
    }
}

impl From<ColorSpec> for RawColorSpec {
    fn from(spec: ColorSpec) -> Self {
        match spec {
            ColorSpec::Single(c) => Self::One(c.to_css()),
            ColorSpec::Palette(colors) => Self::Many(colors.into_iter().map(Rgb::to_css).collect()),
            ColorSpec::RandomPerParticle => Self::One(RANDOM_KEYWORD.to_owned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn parses_long_and_short_hex() {
        assert_eq!(Rgb::from_hex("#ff0080").unwrap(), Rgb::new(0xff, 0x00, 0x80));
        assert_eq!(Rgb::from_hex("#0000FF").unwrap(), Rgb::new(0, 0, 0xff));
        assert_eq!(Rgb::from_hex("#fa0").unwrap(), Rgb::new(0xff, 0xaa, 0x00));
    }

    #[test]
    fn rejects_malformed_hex() {
        for bad in ["ff0080", "#ff008", "#gg0000", "", "#", "#ff00800"] {
            assert!(
                matches!(Rgb::from_hex(bad), Err(ConfigError::InvalidColor(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn css_output_is_lowercase_six_digits() {
        assert_eq!(Rgb::from_hex("#FF0080").unwrap().to_css(), "#ff0080");
        assert_eq!(Rgb::new(0, 0, 1).to_css(), "#000001");
    }

    #[test]
    fn keyword_and_legacy_alias_select_random() {
        assert_eq!(ColorSpec::parse(RANDOM_KEYWORD).unwrap(), ColorSpec::RandomPerParticle);
        assert_eq!(ColorSpec::parse("rainbow").unwrap(), ColorSpec::RandomPerParticle);
    }

    #[test]
    fn empty_palette_is_rejected() {
        let empty: [&str; 0] = [];
        assert_eq!(ColorSpec::palette(empty), Err(ConfigError::EmptyPalette));
    }

    #[test]
    fn deserializes_string_and_array_forms() {
        let single: ColorSpec = serde_json::from_str("\"#ff0080\"").unwrap();
        assert_eq!(single, ColorSpec::Single(Rgb::new(0xff, 0, 0x80)));

        let palette: ColorSpec = serde_json::from_str("[\"#aa0000\", \"#00aa00\"]").unwrap();
        assert_eq!(
            palette,
            ColorSpec::Palette(vec![Rgb::new(0xaa, 0, 0), Rgb::new(0, 0xaa, 0)])
        );

        let random: ColorSpec = serde_json::from_str("\"random-per-particle\"").unwrap();
        assert_eq!(random, ColorSpec::RandomPerParticle);

        assert!(serde_json::from_str::<ColorSpec>("[]").is_err());
        assert!(serde_json::from_str::<ColorSpec>("\"blue\"").is_err());
    }

    #[test]
    fn single_color_resolves_to_itself() {
        let mut rng = StdRng::seed_from_u64(7);
        let spec = ColorSpec::Single(Rgb::new(1, 2, 3));
        for _ in 0..10 {
            assert_eq!(spec.resolve(&mut rng), Rgb::new(1, 2, 3));
        }
    }

    #[test]
    fn palette_resolves_to_members_only() {
        let mut rng = StdRng::seed_from_u64(11);
        let a = Rgb::new(0xaa, 0, 0);
        let b = Rgb::new(0, 0xaa, 0);
        let spec = ColorSpec::Palette(vec![a, b]);
        let mut seen = (0, 0);
        for _ in 0..200 {
            match spec.resolve(&mut rng) {
                c if c == a => seen.0 += 1,
                c if c == b => seen.1 += 1,
                other => panic!("unexpected color {other}"),
            }
        }
        assert!(seen.0 > 0 && seen.1 > 0, "both palette entries should appear: {seen:?}");
    }
}
