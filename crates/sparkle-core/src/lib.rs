#![forbid(unsafe_code)]

//! Sparkle: a sprite-based particle overlay engine.
//!
//! The crate is host-agnostic. It owns particle creation, per-tick motion and
//! opacity, the draw pass against an abstract [`surface::Surface`], and the
//! Active / FadingOut / Stopped lifecycle. A host (see `sparkle-web`)
//! supplies element geometry, a paint-synchronized [`scheduler::FrameScheduler`],
//! a drawing surface, and the sprite atlas.
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use sparkle_core::prelude::*;
//!
//! let mut effect = SparkleEffect::apply(
//!     TargetBox::new(100.0, 20.0),
//!     EffectConfig::default().with_count(5).with_overlap(10.0),
//!     ManualScheduler::new(),
//!     StdRng::seed_from_u64(1),
//! )
//! .unwrap();
//!
//! let mut surface = RecordingSurface::new();
//! let sheet = SpriteSheet::pending();
//! assert_eq!(effect.on_frame(16.0, &mut surface, &sheet), TickOutcome::Rescheduled);
//! effect.stop();
//! assert_eq!(effect.state(), AnimationState::Stopped);
//! ```

pub mod animation;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod field;
pub mod logging;
pub mod particle;
pub mod scheduler;
pub mod sprite;
pub mod surface;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, info, trace, warn};

pub mod prelude {
    //! Common types for hosts.

    pub use crate::animation::{AnimationLoop, AnimationState, FADE_TICKS, TickOutcome};
    pub use crate::color::{ColorSpec, Rgb};
    pub use crate::config::{EffectConfig, EffectPreset, default_presets};
    pub use crate::effect::{OverlayGeometry, SparkleEffect, TargetBox};
    pub use crate::error::{ConfigError, ResourceError, SparkleError};
    pub use crate::field::ParticleField;
    pub use crate::particle::{Particle, Point};
    pub use crate::scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
    pub use crate::sprite::{LoadStatus, SpriteFrame, SpriteSheet, SpriteSource};
    pub use crate::surface::{DrawOp, RecordingSurface, Surface};
}
