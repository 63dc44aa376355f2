#![forbid(unsafe_code)]

//! Particle state and initial field generation.

use rand::Rng;

use crate::color::Rgb;
use crate::config::EffectConfig;
use crate::sprite::SpriteFrame;

/// Half-width of the delta draw: deltas fall in `[-500, 500)`.
pub const DELTA_SPAN: f64 = 500.0;

/// Upper bound of the cosmetic size attribute.
pub const MAX_SIZE: f64 = 2.0;

/// A point or vector in canvas-local pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One sparkle.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub position: Point,
    /// Per-tick motion basis, fixed at creation. `delta.y` is never negative.
    pub delta: Point,
    pub frame: SpriteFrame,
    /// Cosmetic only; kept in state but not used when drawing.
    pub size: f64,
    pub color: Rgb,
    /// In `[0, 1]` at the start and end of every tick.
    pub opacity: f64,
}

impl Particle {
    /// Draw one particle for a `width` x `height` canvas.
    ///
    /// Positions and deltas are whole pixels; `size` keeps two decimals.
    pub fn spawn<R: Rng>(width: f64, height: f64, config: &EffectConfig, rng: &mut R) -> Self {
        let color = config.color.resolve(rng);
        let position = Point::new(
            (rng.random::<f64>() * width).floor(),
            (rng.random::<f64>() * height).floor(),
        );
        let frame = SpriteFrame::random(rng);
        let delta = Point::new(
            (rng.random::<f64>() * 2.0 * DELTA_SPAN).floor() - DELTA_SPAN,
            ((rng.random::<f64>() * 2.0 * DELTA_SPAN).floor() - DELTA_SPAN).abs(),
        );
        let size = (rng.random::<f64>() * MAX_SIZE * 100.0).round() / 100.0;
        let opacity = rng.random::<f64>();
        Self {
            position,
            delta,
            frame,
            size,
            color,
            opacity,
        }
    }
}

/// Build exactly `config.count` particles spread over a `width` x `height`
/// canvas.
pub fn create<R: Rng>(width: f64, height: f64, config: &EffectConfig, rng: &mut R) -> Vec<Particle> {
    (0..config.count)
        .map(|_| Particle::spawn(width, height, config, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSpec;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn create_honors_count_and_ranges() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = EffectConfig::default().with_count(500);
        let particles = create(100.0, 20.0, &config, &mut rng);
        assert_eq!(particles.len(), 500);
        for p in &particles {
            assert!((0.0..100.0).contains(&p.position.x), "{p:?}");
            assert!((0.0..20.0).contains(&p.position.y), "{p:?}");
            assert!((-500.0..500.0).contains(&p.delta.x), "{p:?}");
            assert!((0.0..=500.0).contains(&p.delta.y), "{p:?}");
            assert!((0.0..=2.0).contains(&p.size), "{p:?}");
            assert!((0.0..=1.0).contains(&p.opacity), "{p:?}");
            assert_eq!(p.position.x.fract(), 0.0);
            assert_eq!(p.delta.x.fract(), 0.0);
        }
    }

    #[test]
    fn single_color_applies_to_every_particle() {
        let mut rng = StdRng::seed_from_u64(1);
        let pink = Rgb::new(0xff, 0x00, 0x80);
        let config = EffectConfig::default()
            .with_count(5)
            .with_color(ColorSpec::Single(pink));
        let particles = create(120.0, 40.0, &config, &mut rng);
        assert_eq!(particles.len(), 5);
        assert!(particles.iter().all(|p| p.color.to_css() == "#ff0080"));
    }

    #[test]
    fn random_colors_vary_between_particles() {
        let mut rng = StdRng::seed_from_u64(9);
        let config = EffectConfig::default()
            .with_count(50)
            .with_color(ColorSpec::RandomPerParticle);
        let particles = create(50.0, 50.0, &config, &mut rng);
        let first = particles[0].color;
        assert!(particles.iter().any(|p| p.color != first));
    }

    #[test]
    fn deltas_cover_both_horizontal_directions() {
        let mut rng = StdRng::seed_from_u64(5);
        let config = EffectConfig::default().with_count(200);
        let particles = create(10.0, 10.0, &config, &mut rng);
        assert!(particles.iter().any(|p| p.delta.x < 0.0));
        assert!(particles.iter().any(|p| p.delta.x > 0.0));
    }
}
