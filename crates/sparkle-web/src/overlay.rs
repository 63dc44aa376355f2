#![forbid(unsafe_code)]

//! Host-independent overlay helpers shared by the wasm bindings.

use sparkle_core::config::EffectConfig;
use sparkle_core::effect::OverlayGeometry;
use sparkle_core::error::ConfigError;

/// Class applied to every overlay canvas.
pub const CANVAS_CLASS: &str = "sparkle-canvas";

/// Timer fallback period, approximating a 60 Hz refresh.
pub const FALLBACK_INTERVAL_MS: i32 = 16;

/// Inline style declarations for an overlay with `geometry`.
#[must_use]
pub fn overlay_style(geometry: &OverlayGeometry) -> [(&'static str, String); 4] {
    [
        ("position", "absolute".to_owned()),
        ("top", geometry.css_top()),
        ("left", geometry.css_left()),
        ("pointer-events", "none".to_owned()),
    ]
}

/// Decode the configuration a JS caller passed.
///
/// `json` is `JSON.stringify(config)`, or `None` when the caller passed
/// `undefined`/`null`, which selects every default.
pub fn config_from_json(json: Option<&str>) -> Result<EffectConfig, ConfigError> {
    match json.map(str::trim) {
        None | Some("") | Some("null") => Ok(EffectConfig::default()),
        Some(json) => EffectConfig::from_json(json),
    }
}

/// Pick the tick timestamp.
///
/// Animation-frame callbacks receive a finite high-resolution time. Timer
/// callbacks receive nothing (NaN after conversion), in which case the
/// monotonic fallback clock is read instead.
pub fn resolve_timestamp(raw: f64, fallback_ms: impl FnOnce() -> f64) -> f64 {
    if raw.is_finite() { raw } else { fallback_ms() }
}

/// Combine two uniform `[0, 1)` draws from the host into an RNG seed.
#[must_use]
pub fn seed_from_unit_pair(hi: f64, lo: f64) -> u64 {
    let word = |v: f64| (v.clamp(0.0, 1.0) * f64::from(u32::MAX)) as u64;
    (word(hi) << 32) | word(lo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sparkle_core::color::{ColorSpec, Rgb};
    use sparkle_core::effect::TargetBox;

    #[test]
    fn style_positions_overlay_by_negative_overlap() {
        let g = OverlayGeometry::for_target(TargetBox::new(100.0, 20.0), 30.0);
        assert_eq!(
            overlay_style(&g),
            [
                ("position", "absolute".to_owned()),
                ("top", "-30px".to_owned()),
                ("left", "-30px".to_owned()),
                ("pointer-events", "none".to_owned()),
            ]
        );
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(config_from_json(None).unwrap(), EffectConfig::default());
        assert_eq!(config_from_json(Some("null")).unwrap(), EffectConfig::default());
    }

    #[test]
    fn js_object_config_is_decoded() {
        let config =
            config_from_json(Some(r##"{"count":5,"color":["#aa0000","#00aa00"],"speed":2}"##))
                .unwrap();
        assert_eq!(config.count, 5);
        assert_eq!(config.speed, 2.0);
        assert_eq!(
            config.color,
            ColorSpec::Palette(vec![Rgb::new(0xaa, 0, 0), Rgb::new(0, 0xaa, 0)])
        );
    }

    #[test]
    fn invalid_config_surfaces_error() {
        assert_eq!(
            config_from_json(Some(r#"{"count":0}"#)),
            Err(ConfigError::InvalidCount(0))
        );
    }

    #[test]
    fn timestamp_prefers_frame_time() {
        assert_eq!(resolve_timestamp(1234.5, || 9.0), 1234.5);
        assert_eq!(resolve_timestamp(f64::NAN, || 9.0), 9.0);
    }

    #[test]
    fn seeds_differ_for_different_draws() {
        assert_ne!(seed_from_unit_pair(0.25, 0.5), seed_from_unit_pair(0.5, 0.25));
        assert_eq!(seed_from_unit_pair(0.0, 0.0), 0);
    }
}
