#![forbid(unsafe_code)]

//! Effect configuration and the stock page presets.
//!
//! Configuration arrives from the host as JSON. Parsing is split in two
//! stages so that shape errors ([`ConfigError::Malformed`]) are distinguished
//! from value errors (count, speed, overlap, colors).

use serde::{Deserialize, Serialize};

use crate::color::{ColorSpec, Rgb};
use crate::error::ConfigError;

pub const DEFAULT_COUNT: u32 = 30;
pub const DEFAULT_SPEED: f64 = 1.0;
pub const DEFAULT_OVERLAP: f64 = 0.0;

/// Validated effect configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEffectConfig")]
pub struct EffectConfig {
    /// Number of particles; fixed for the life of the field.
    pub count: u32,
    pub color: ColorSpec,
    /// Motion magnitude multiplier.
    pub speed: f64,
    /// Canvas padding in pixels on every side of the target.
    pub overlap: f64,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            color: ColorSpec::default(),
            speed: DEFAULT_SPEED,
            overlap: DEFAULT_OVERLAP,
        }
    }
}

impl EffectConfig {
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.count = count;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: ColorSpec) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_overlap(mut self, overlap: f64) -> Self {
        self.overlap = overlap;
        self
    }

    /// Check every field. Called by the applicator before anything is built.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::InvalidCount(0));
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(ConfigError::InvalidSpeed(self.speed));
        }
        if !self.overlap.is_finite() || self.overlap < 0.0 {
            return Err(ConfigError::InvalidOverlap(self.overlap));
        }
        self.color.validate()
    }

    /// Parse and validate a JSON object. Absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let raw: RawEffectConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        Self::try_from(raw)
    }
}

/// Unvalidated wire shape. Count is signed so negative input is reported as
/// an invalid count rather than a type error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawEffectConfig {
    count: Option<i64>,
    color: Option<ColorSpec>,
    speed: Option<f64>,
    overlap: Option<f64>,
}

impl TryFrom<RawEffectConfig> for EffectConfig {
    type Error = ConfigError;

    fn try_from(raw: RawEffectConfig) -> Result<Self, Self::Error> {
        let count = match raw.count {
            None => DEFAULT_COUNT,
            Some(n) => u32::try_from(n)
                .ok()
                .filter(|&n| n > 0)
                .ok_or(ConfigError::InvalidCount(n))?,
        };
        let config = Self {
            count,
            color: raw.color.unwrap_or_default(),
            speed: raw.speed.unwrap_or(DEFAULT_SPEED),
            overlap: raw.overlap.unwrap_or(DEFAULT_OVERLAP),
        };
        config.validate()?;
        Ok(config)
    }
}

/// A CSS selector bound to a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectPreset {
    pub selector: &'static str,
    pub config: EffectConfig,
}

fn stock_palette() -> ColorSpec {
    let pink = Rgb::new(0xff, 0x00, 0x80);
    let blue = Rgb::new(0x00, 0x00, 0xff);
    // Pink is listed twice so it is drawn two thirds of the time.
    ColorSpec::Palette(vec![pink, pink, blue])
}

/// The stock page bindings: `.sparkle`, `.sparkle-more`, `.sparkle-less`.
#[must_use]
pub fn default_presets() -> Vec<EffectPreset> {
    let preset = |selector, count, speed, overlap| EffectPreset {
        selector,
        config: EffectConfig {
            count,
            color: stock_palette(),
            speed,
            overlap,
        },
    };
    vec![
        preset(".sparkle", 40, 3.0, 30.0),
        preset(".sparkle-more", 30, 10.0, 10.0),
        preset(".sparkle-less", 5, 2.0, 5.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_object_yields_defaults() {
        let config = EffectConfig::from_json("{}").unwrap();
        assert_eq!(config, EffectConfig::default());
        assert_eq!(config.color, ColorSpec::Single(Rgb::WHITE));
    }

    #[test]
    fn full_object_parses() {
        let config = EffectConfig::from_json(
            r##"{"count": 5, "overlap": 10, "speed": 1, "color": "#ff0080"}"##,
        )
        .unwrap();
        assert_eq!(config.count, 5);
        assert_eq!(config.overlap, 10.0);
        assert_eq!(config.speed, 1.0);
        assert_eq!(config.color, ColorSpec::Single(Rgb::new(0xff, 0, 0x80)));
    }

    #[test]
    fn non_positive_count_is_rejected() {
        assert_eq!(
            EffectConfig::from_json(r#"{"count": 0}"#),
            Err(ConfigError::InvalidCount(0))
        );
        assert_eq!(
            EffectConfig::from_json(r#"{"count": -3}"#),
            Err(ConfigError::InvalidCount(-3))
        );
        assert_eq!(
            EffectConfig::default().with_count(0).validate(),
            Err(ConfigError::InvalidCount(0))
        );
    }

    #[test]
    fn non_positive_speed_is_rejected() {
        assert_eq!(
            EffectConfig::from_json(r#"{"speed": 0}"#),
            Err(ConfigError::InvalidSpeed(0.0))
        );
        assert!(matches!(
            EffectConfig::default().with_speed(f64::NAN).validate(),
            Err(ConfigError::InvalidSpeed(_))
        ));
    }

    #[test]
    fn negative_overlap_is_rejected() {
        assert_eq!(
            EffectConfig::from_json(r#"{"overlap": -1}"#),
            Err(ConfigError::InvalidOverlap(-1.0))
        );
        assert!(EffectConfig::default().with_overlap(0.0).validate().is_ok());
    }

    #[test]
    fn malformed_input_is_reported_as_such() {
        assert!(matches!(
            EffectConfig::from_json("not json"),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            EffectConfig::from_json(r#"{"count": "many"}"#),
            Err(ConfigError::Malformed(_))
        ));
        assert!(matches!(
            EffectConfig::from_json(r##"{"colour": "#fff"}"##),
            Err(ConfigError::Malformed(_))
        ));
    }

    #[test]
    fn bad_color_is_reported() {
        assert!(matches!(
            EffectConfig::from_json(r#"{"color": "nope"}"#),
            Err(ConfigError::Malformed(_)) | Err(ConfigError::InvalidColor(_))
        ));
    }

    #[test]
    fn presets_match_stock_page_bindings() {
        let presets = default_presets();
        let summary: Vec<_> = presets
            .iter()
            .map(|p| (p.selector, p.config.count, p.config.speed, p.config.overlap))
            .collect();
        assert_eq!(
            summary,
            vec![
                (".sparkle", 40, 3.0, 30.0),
                (".sparkle-more", 30, 10.0, 10.0),
                (".sparkle-less", 5, 2.0, 5.0),
            ]
        );
        for preset in &presets {
            assert!(preset.config.validate().is_ok(), "{}", preset.selector);
        }
    }
}
