#![forbid(unsafe_code)]

//! Draw target abstraction.
//!
//! The draw pass talks to a [`Surface`] rather than to a concrete canvas so
//! the same code drives a browser 2D context and headless recording.

use crate::color::Rgb;
use crate::particle::Point;
use crate::sprite::SpriteFrame;

/// Opacity of the color tint laid over each sprite.
pub const TINT_ALPHA: f64 = 0.5;

/// A 2D raster target.
pub trait Surface {
    /// Host drawable handle for the sprite atlas.
    type Image;

    /// Erase the whole canvas.
    fn clear(&mut self, width: f64, height: f64);

    /// Copy one atlas frame to `at` with normal (source-over) blending.
    fn draw_sprite(&mut self, image: &Self::Image, frame: SpriteFrame, at: Point, alpha: f64);

    /// Fill a `size` x `size` box at `at` with source-atop blending, tinting
    /// only pixels already painted.
    fn tint(&mut self, at: Point, size: f64, color: Rgb, alpha: f64);
}

/// One captured draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        width: f64,
        height: f64,
    },
    Sprite {
        frame: SpriteFrame,
        at: Point,
        alpha: f64,
    },
    Tint {
        at: Point,
        size: f64,
        color: Rgb,
        alpha: f64,
    },
}

/// Headless surface that records every call, one frame at a time.
#[derive(Debug, Default, Clone)]
pub struct RecordingSurface {
    ops: Vec<DrawOp>,
    frames: u64,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calls recorded since the last clear.
    #[must_use]
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Number of clears seen, one per drawn frame.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn sprite_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Sprite { .. }))
            .count()
    }

    pub fn tint_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Tint { .. }))
            .count()
    }
}

impl Surface for RecordingSurface {
    type Image = ();

    fn clear(&mut self, width: f64, height: f64) {
        self.ops.clear();
        self.frames += 1;
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn draw_sprite(&mut self, _image: &(), frame: SpriteFrame, at: Point, alpha: f64) {
        self.ops.push(DrawOp::Sprite { frame, at, alpha });
    }

    fn tint(&mut self, at: Point, size: f64, color: Rgb, alpha: f64) {
        self.ops.push(DrawOp::Tint {
            at,
            size,
            color,
            alpha,
        });
    }
}
