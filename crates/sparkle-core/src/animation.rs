#![forbid(unsafe_code)]

//! Animation lifecycle: Active, FadingOut, Stopped.
//!
//! The loop owns its scheduler and at most one pending [`FrameHandle`]. A
//! tick is scheduled only after the previous tick's update and draw have
//! completed, so ticks of one loop never overlap.
//!
//! ```text
//!            over()                    out()
//!   Stopped ───────▶ Active ──────────────────▶ FadingOut
//!      ▲  ◀─────────  │  ▲                          │
//!      │    stop()    │  └──────── over() ──────────┤
//!      │              │                             │
//!      └──────────────┴──── stop() / countdown < 0 ─┘
//! ```
//!
//! # Invariants
//!
//! 1. `state() == Stopped` iff no frame is pending.
//! 2. `over()` cancels any pending frame before requesting a new one.
//! 3. After `out()`, at most [`FADE_TICKS`]` + 1` ticks run before Stopped.
//! 4. `stop()` with nothing pending is a no-op.
//! 5. Lifecycle calls made between ticks take effect on the next tick.
//! 6. Dropping the loop cancels its pending frame.

use std::fmt;

use rand::Rng;

use crate::field::ParticleField;
use crate::scheduler::{FrameHandle, FrameScheduler};
use crate::sprite::SpriteSheet;
use crate::surface::Surface;

/// Fade countdown budget armed by [`AnimationLoop::out`].
pub const FADE_TICKS: i32 = 100;

/// Observable lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Active,
    FadingOut,
    Stopped,
}

impl AnimationState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::FadingOut => "fading-out",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of delivering one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The tick ran and the next one is pending.
    Rescheduled,
    /// The tick ran and exhausted the fade countdown.
    Finished,
    /// No frame was pending; nothing ran.
    Ignored,
}

/// Self-rescheduling tick driver for one particle field.
#[derive(Debug)]
pub struct AnimationLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
    fading: bool,
    fade_remaining: i32,
    ticks: u64,
}

impl<S: FrameScheduler> AnimationLoop<S> {
    /// A loop in the Stopped state. Call [`Self::over`] to start it.
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            pending: None,
            fading: false,
            fade_remaining: 0,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> AnimationState {
        match (self.pending, self.fading) {
            (None, _) => AnimationState::Stopped,
            (Some(_), true) => AnimationState::FadingOut,
            (Some(_), false) => AnimationState::Active,
        }
    }

    #[must_use]
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fading
    }

    /// Remaining fade budget while the fade flag is set.
    #[must_use]
    pub fn fade_remaining(&self) -> Option<i32> {
        self.fading.then_some(self.fade_remaining)
    }

    /// Ticks run since construction.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// (Re)start: cancel anything pending, re-randomize opacities, clear the
    /// fade flag, and request the first tick. Valid from any state.
    pub fn over<R: Rng>(&mut self, field: &mut ParticleField, rng: &mut R) {
        self.cancel_pending();
        field.reset_opacity(rng);
        self.fading = false;
        self.pending = Some(self.scheduler.request_frame());
        crate::debug!(particles = field.len(), "sparkle loop active");
    }

    /// Arm the fade countdown. The loop keeps ticking with fast decay until
    /// the countdown runs out.
    pub fn out(&mut self) {
        self.fading = true;
        self.fade_remaining = FADE_TICKS;
        crate::debug!(budget = FADE_TICKS, "sparkle loop fading out");
    }

    /// Cancel immediately, bypassing the fade. Idempotent.
    pub fn stop(&mut self) {
        if self.cancel_pending() {
            crate::debug!(ticks = self.ticks, "sparkle loop stopped");
        }
    }

    fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                self.scheduler.cancel_frame(handle);
                true
            }
            None => false,
        }
    }

    /// Deliver the pending frame at `time` (milliseconds): update, draw, then
    /// reschedule or finish.
    pub fn on_frame<Sf, R>(
        &mut self,
        time: f64,
        field: &mut ParticleField,
        surface: &mut Sf,
        sprite: &SpriteSheet<Sf::Image>,
        rng: &mut R,
    ) -> TickOutcome
    where
        Sf: Surface,
        R: Rng,
    {
        if self.pending.take().is_none() {
            return TickOutcome::Ignored;
        }

        field.update(time, self.fading, rng);
        field.draw(surface, sprite);
        self.ticks += 1;

        if self.fading {
            self.fade_remaining -= 1;
            if self.fade_remaining < 0 {
                self.fading = false;
                self.fade_remaining = 0;
                crate::debug!(ticks = self.ticks, "sparkle fade complete");
                return TickOutcome::Finished;
            }
        }

        self.pending = Some(self.scheduler.request_frame());
        crate::trace!(
            time,
            fading = self.fading,
            remaining = self.fade_remaining,
            "sparkle tick"
        );
        TickOutcome::Rescheduled
    }
}

impl<S: FrameScheduler> Drop for AnimationLoop<S> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
