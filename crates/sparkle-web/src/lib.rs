#![forbid(unsafe_code)]

//! WASM frontend for sparkle overlays.
//!
//! Binds `sparkle-core` to the browser: reads target element geometry,
//! creates the canvas overlay, drives ticks from `requestAnimationFrame`
//! (falling back to a timer), composites on a 2D context, and loads the
//! sprite atlas through an `<img>`.
//!
//! Host-independent pieces (overlay styling, config decoding, timestamp
//! resolution) live in [`overlay`] so they are testable on native targets.

pub mod overlay;

#[cfg(target_arch = "wasm32")]
mod canvas;
#[cfg(target_arch = "wasm32")]
mod schedule;
#[cfg(target_arch = "wasm32")]
mod sprite;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{
    EffectHandle, apply, apply_default_presets, apply_to_selector, set_sprite_bytes,
    set_sprite_url,
};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct EffectHandle;

#[cfg(not(target_arch = "wasm32"))]
impl EffectHandle {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
