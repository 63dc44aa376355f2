#![forbid(unsafe_code)]

//! The particle field: per-tick motion, opacity decay, and the draw pass.
//!
//! # Invariants
//!
//! 1. The particle count never changes after construction.
//! 2. After every tick, `-7 <= x <= width` and `-7 <= y <= height`.
//! 3. After every tick, `0 <= opacity <= 1`.
//! 4. A steady (non-fading) particle whose opacity runs out is reset to 1 on
//!    the same tick; a fading one is pinned at 0.
//!
//! The motion gates compare two independent uniform draws rather than
//! flipping a fair coin. The resulting distribution is intentionally uneven
//! and is kept exactly as is: horizontal motion applies when `a > 2b`,
//! vertical motion applies when `a > 3b` does *not* hold.

use rand::Rng;

use crate::config::EffectConfig;
use crate::particle::{self, Particle};
use crate::sprite::{FRAME_SIZE, SpriteFrame, SpriteSheet};
use crate::surface::{Surface, TINT_ALPHA};

/// Wrap threshold below zero: one sprite width.
pub const WRAP_MARGIN: f64 = FRAME_SIZE as f64;

/// Divisor turning `delta.x * speed` into a per-tick horizontal step.
pub const HORIZONTAL_DIVISOR: f64 = 1500.0;

/// Divisor turning `delta.y * speed` into a per-tick rise.
pub const VERTICAL_DIVISOR: f64 = 800.0;

pub const HORIZONTAL_GATE_SCALE: f64 = 2.0;
pub const VERTICAL_GATE_SCALE: f64 = 3.0;

/// Opacity lost per tick while steady.
pub const STEADY_DECAY: f64 = 0.005;

/// Opacity lost per tick while fading out.
pub const FADE_DECAY: f64 = 0.02;

/// Exclusive upper bound of the per-tick frame-reselection modulus.
const RESELECT_MODULUS_END: i64 = 7;

/// A fixed set of particles on a canvas of fixed size.
#[derive(Debug, Clone)]
pub struct ParticleField {
    width: f64,
    height: f64,
    speed: f64,
    particles: Vec<Particle>,
}

impl ParticleField {
    /// Spawn `config.count` particles over a `width` x `height` canvas.
    pub fn new<R: Rng>(width: f64, height: f64, config: &EffectConfig, rng: &mut R) -> Self {
        Self::from_particles(
            width,
            height,
            config.speed,
            particle::create(width, height, config, rng),
        )
    }

    /// Wrap existing particles, e.g. a hand-built fixture.
    #[must_use]
    pub fn from_particles(width: f64, height: f64, speed: f64, particles: Vec<Particle>) -> Self {
        Self {
            width,
            height,
            speed,
            particles,
        }
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.height
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Give every particle a fresh uniform opacity.
    pub fn reset_opacity<R: Rng>(&mut self, rng: &mut R) {
        for p in &mut self.particles {
            p.opacity = rng.random::<f64>();
        }
    }

    /// Advance every particle by one tick.
    ///
    /// `time` is the scheduler timestamp in milliseconds.
    pub fn update<R: Rng>(&mut self, time: f64, fading: bool, rng: &mut R) {
        // Saturating cast: NaN maps to 0.
        let whole_time = time.floor() as i64;
        let (width, height, speed) = (self.width, self.height, self.speed);

        for p in &mut self.particles {
            let modulus = rng.random_range(1..RESELECT_MODULUS_END);
            if whole_time.rem_euclid(modulus) == 0 {
                p.frame = SpriteFrame::random(rng);
            }

            let move_x = rng.random::<f64>() > rng.random::<f64>() * HORIZONTAL_GATE_SCALE;
            let hold_y = rng.random::<f64>() > rng.random::<f64>() * VERTICAL_GATE_SCALE;
            if move_x {
                p.position.x += p.delta.x * speed / HORIZONTAL_DIVISOR;
            }
            if !hold_y {
                p.position.y -= p.delta.y * speed / VERTICAL_DIVISOR;
            }

            p.position.x = wrap(p.position.x, width);
            p.position.y = wrap(p.position.y, height);

            p.opacity -= if fading { FADE_DECAY } else { STEADY_DECAY };
            if p.opacity <= 0.0 {
                p.opacity = if fading { 0.0 } else { 1.0 };
            }
        }
    }

    /// Clear the surface and composite every particle.
    ///
    /// Sprites are skipped while the sheet has no image; the tint is always
    /// applied.
    pub fn draw<S: Surface>(&self, surface: &mut S, sprite: &SpriteSheet<S::Image>) {
        surface.clear(self.width, self.height);
        let image = sprite.image();
        for p in &self.particles {
            if let Some(image) = image {
                surface.draw_sprite(image, p.frame, p.position, p.opacity);
            }
            surface.tint(p.position, WRAP_MARGIN, p.color, TINT_ALPHA);
        }
    }
}

fn wrap(v: f64, extent: f64) -> f64 {
    if v > extent {
        -WRAP_MARGIN
    } else if v < -WRAP_MARGIN {
        extent
    } else {
        v
    }
}
