#![forbid(unsafe_code)]

//! [`FrameScheduler`] backed by `requestAnimationFrame`.
//!
//! When the host has no animation-frame primitive the scheduler drops to a
//! fixed-interval `setTimeout` for the rest of its life. Timer callbacks get
//! no timestamp, so the tick closure reads [`FrameClock`] instead.

use sparkle_core::scheduler::{FrameHandle, FrameScheduler};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;
use web_time::Instant;

use crate::overlay::FALLBACK_INTERVAL_MS;

/// Monotonic milliseconds since the effect was created.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FrameClock {
    epoch: Instant,
}

impl FrameClock {
    pub(crate) fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub(crate) fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    AnimationFrame,
    Timer,
}

pub(crate) struct RafScheduler {
    window: Window,
    callback: Closure<dyn FnMut(f64)>,
    mode: Mode,
}

impl RafScheduler {
    pub(crate) fn new(window: Window, callback: Closure<dyn FnMut(f64)>) -> Self {
        Self {
            window,
            callback,
            mode: Mode::AnimationFrame,
        }
    }

    fn request_timer(&self) -> FrameHandle {
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                self.callback.as_ref().unchecked_ref(),
                FALLBACK_INTERVAL_MS,
            ) {
            Ok(id) => FrameHandle(id as u64),
            Err(err) => {
                // The loop stays Active with nothing firing; lifecycle calls
                // still work.
                tracing::warn!(error = ?err, "no frame scheduling available");
                FrameHandle(0)
            }
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        if self.mode == Mode::AnimationFrame {
            match self
                .window
                .request_animation_frame(self.callback.as_ref().unchecked_ref())
            {
                Ok(id) => return FrameHandle(id as u64),
                Err(err) => {
                    tracing::warn!(
                        error = ?err,
                        interval_ms = FALLBACK_INTERVAL_MS,
                        "requestAnimationFrame unavailable; using timer"
                    );
                    self.mode = Mode::Timer;
                }
            }
        }
        self.request_timer()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let id = handle.0 as i32;
        match self.mode {
            Mode::AnimationFrame => {
                let _ = self.window.cancel_animation_frame(id);
            }
            Mode::Timer => self.window.clear_timeout_with_handle(id),
        }
    }
}
