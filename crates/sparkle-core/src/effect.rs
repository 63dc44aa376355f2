#![forbid(unsafe_code)]

//! Effect applicator: sizes the overlay for a target, builds the particle
//! field, and wires it to an animation loop.
//!
//! This is the host-agnostic half of `apply`. A host supplies the target's
//! rendered size, a [`FrameScheduler`], a [`Surface`], and a source of
//! randomness; everything else lives here and is owned per effect.

use rand::Rng;

use crate::animation::{AnimationLoop, AnimationState, TickOutcome};
use crate::config::EffectConfig;
use crate::error::ConfigError;
use crate::field::ParticleField;
use crate::scheduler::FrameScheduler;
use crate::sprite::SpriteSheet;
use crate::surface::Surface;

/// Rendered size of the element the overlay decorates, read once.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetBox {
    pub width: f64,
    pub height: f64,
}

impl TargetBox {
    /// Non-finite or negative dimensions are treated as zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let sane = |v: f64| if v.is_finite() { v.max(0.0) } else { 0.0 };
        Self {
            width: sane(width),
            height: sane(height),
        }
    }
}

/// Canvas size and placement relative to the target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayGeometry {
    /// Canvas backing width in whole pixels: `target + 2 * overlap`.
    pub width: u32,
    /// Canvas backing height in whole pixels: `target + 2 * overlap`.
    pub height: u32,
    /// CSS `left`, in pixels (`-overlap`).
    pub left: f64,
    /// CSS `top`, in pixels (`-overlap`).
    pub top: f64,
}

impl OverlayGeometry {
    #[must_use]
    pub fn for_target(target: TargetBox, overlap: f64) -> Self {
        let pad = overlap * 2.0;
        // `0.0 - 0.0` is +0, so a zero overlap prints as "0px", not "-0px".
        let offset = 0.0 - overlap;
        // Canvas dimensions are integral; fractional sizes truncate.
        let whole = |v: f64| v.max(0.0).min(f64::from(u32::MAX)) as u32;
        Self {
            width: whole(target.width + pad),
            height: whole(target.height + pad),
            left: offset,
            top: offset,
        }
    }

    /// CSS length for `left`.
    #[must_use]
    pub fn css_left(&self) -> String {
        format!("{}px", self.left)
    }

    /// CSS length for `top`.
    #[must_use]
    pub fn css_top(&self) -> String {
        format!("{}px", self.top)
    }
}

/// One running sparkle effect: geometry, particles, lifecycle and RNG.
#[derive(Debug)]
pub struct SparkleEffect<S: FrameScheduler, R> {
    config: EffectConfig,
    geometry: OverlayGeometry,
    field: ParticleField,
    anim: AnimationLoop<S>,
    rng: R,
}

impl<S: FrameScheduler, R: Rng> SparkleEffect<S, R> {
    /// Validate `config`, build the field over the overlay, and start in the
    /// Active state.
    pub fn apply(
        target: TargetBox,
        config: EffectConfig,
        scheduler: S,
        mut rng: R,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = OverlayGeometry::for_target(target, config.overlap);
        let field = ParticleField::new(
            f64::from(geometry.width),
            f64::from(geometry.height),
            &config,
            &mut rng,
        );
        crate::debug!(
            count = config.count,
            width = geometry.width,
            height = geometry.height,
            "sparkle effect applied"
        );
        let mut effect = Self {
            config,
            geometry,
            field,
            anim: AnimationLoop::new(scheduler),
            rng,
        };
        effect.restart();
        Ok(effect)
    }

    /// Transition to FadingOut.
    pub fn fade_out(&mut self) {
        self.anim.out();
    }

    /// Cancel immediately. Idempotent.
    pub fn stop(&mut self) {
        self.anim.stop();
    }

    /// Transition (back) to Active from any state.
    pub fn restart(&mut self) {
        self.anim.over(&mut self.field, &mut self.rng);
    }

    /// Run the pending tick at `time` milliseconds.
    pub fn on_frame<Sf: Surface>(
        &mut self,
        time: f64,
        surface: &mut Sf,
        sprite: &SpriteSheet<Sf::Image>,
    ) -> TickOutcome {
        self.anim
            .on_frame(time, &mut self.field, surface, sprite, &mut self.rng)
    }

    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.anim.state()
    }

    #[must_use]
    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    #[must_use]
    pub fn geometry(&self) -> OverlayGeometry {
        self.geometry
    }

    #[must_use]
    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    #[must_use]
    pub fn animation(&self) -> &AnimationLoop<S> {
        &self.anim
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.anim.scheduler_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorSpec, Rgb};
    use crate::scheduler::ManualScheduler;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn geometry_pads_every_side() {
        let g = OverlayGeometry::for_target(TargetBox::new(100.0, 20.0), 10.0);
        assert_eq!(
            g,
            OverlayGeometry {
                width: 120,
                height: 40,
                left: -10.0,
                top: -10.0,
            }
        );
        assert_eq!(g.css_left(), "-10px");
        assert_eq!(g.css_top(), "-10px");
    }

    #[test]
    fn geometry_truncates_fractional_sizes() {
        let g = OverlayGeometry::for_target(TargetBox::new(10.0, 10.0), 0.75);
        assert_eq!((g.width, g.height), (11, 11));
        assert_eq!(g.css_left(), "-0.75px");
    }

    #[test]
    fn zero_overlap_has_no_negative_zero_offset() {
        let g = OverlayGeometry::for_target(TargetBox::new(10.0, 10.0), 0.0);
        assert_eq!(g.css_top(), "0px");
    }

    #[test]
    fn target_box_sanitizes_input() {
        assert_eq!(TargetBox::new(-5.0, f64::NAN), TargetBox::new(0.0, 0.0));
    }

    #[test]
    fn apply_rejects_invalid_config_before_scheduling() {
        let err = SparkleEffect::apply(
            TargetBox::new(10.0, 10.0),
            EffectConfig::default().with_speed(0.0),
            ManualScheduler::new(),
            StdRng::seed_from_u64(0),
        )
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidSpeed(0.0));
    }

    #[test]
    fn apply_starts_active_with_one_pending_frame() {
        let mut effect = SparkleEffect::apply(
            TargetBox::new(100.0, 20.0),
            EffectConfig::default()
                .with_count(5)
                .with_overlap(10.0)
                .with_color(ColorSpec::Single(Rgb::new(0xff, 0, 0x80))),
            ManualScheduler::new(),
            StdRng::seed_from_u64(99),
        )
        .unwrap();
        assert_eq!(effect.state(), AnimationState::Active);
        assert_eq!(effect.scheduler_mut().pending_count(), 1);
        assert_eq!(effect.field().len(), 5);
        assert_eq!(effect.geometry().width, 120);
    }
}
