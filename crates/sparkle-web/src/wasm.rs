#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use sparkle_core::animation::TickOutcome;
use sparkle_core::config::{EffectConfig, default_presets};
use sparkle_core::effect::{SparkleEffect, TargetBox};
use sparkle_core::error::SparkleError;
use sparkle_core::sprite::SpriteSource;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

use crate::canvas::CanvasSurface;
use crate::overlay::{self, CANVAS_CLASS};
use crate::schedule::{FrameClock, RafScheduler};
use crate::sprite::{self, SharedSheet};

type Slot = Rc<RefCell<Option<Mounted>>>;

/// Everything one overlay owns. Dropping it cancels any pending frame, then
/// releases the tick closure.
struct Mounted {
    effect: SparkleEffect<RafScheduler, StdRng>,
    surface: CanvasSurface,
    sheet: SharedSheet,
    canvas: HtmlCanvasElement,
    clock: FrameClock,
}

impl Mounted {
    fn tick(&mut self, raw_time: f64) {
        let time = overlay::resolve_timestamp(raw_time, || self.clock.now_ms());
        let sheet = self.sheet.borrow();
        if self.effect.on_frame(time, &mut self.surface, &sheet) == TickOutcome::Finished {
            tracing::debug!("sparkle overlay faded out");
        }
    }
}

/// JS handle to one running sparkle overlay.
#[wasm_bindgen]
pub struct EffectHandle {
    slot: Slot,
}

#[wasm_bindgen]
impl EffectHandle {
    /// Decay faster and stop after the fade budget runs out.
    #[wasm_bindgen(js_name = fadeOut)]
    pub fn fade_out(&self) {
        self.with(|m| m.effect.fade_out());
    }

    /// Cancel immediately. Safe to call repeatedly.
    pub fn stop(&self) {
        self.with(|m| m.effect.stop());
    }

    /// Return to the active state from any state.
    pub fn restart(&self) {
        self.with(|m| m.effect.restart());
    }

    /// `"active"`, `"fading-out"` or `"stopped"`. A destroyed handle reports
    /// `"stopped"`.
    pub fn state(&self) -> String {
        self.slot
            .borrow()
            .as_ref()
            .map_or("stopped", |m| m.effect.state().as_str())
            .to_owned()
    }

    /// Stop, remove the overlay canvas, and release the frame callback.
    pub fn destroy(&self) {
        let Some(mut mounted) = self.slot.borrow_mut().take() else {
            return;
        };
        mounted.effect.stop();
        mounted.canvas.remove();
        tracing::debug!("sparkle overlay destroyed");
    }
}

impl EffectHandle {
    fn with(&self, f: impl FnOnce(&mut Mounted)) {
        if let Some(mounted) = self.slot.borrow_mut().as_mut() {
            f(mounted);
        }
    }
}

/// Attach a sparkle overlay to `element`.
///
/// `config` is a plain object with optional `count`, `color`, `speed` and
/// `overlap`. Invalid configuration throws.
#[wasm_bindgen]
pub fn apply(element: &HtmlElement, config: JsValue) -> Result<EffectHandle, JsValue> {
    let config = decode_config(&config)?;
    mount(element, config)
}

/// Attach an overlay to every element matching `selector`.
#[wasm_bindgen(js_name = applyToSelector)]
pub fn apply_to_selector(selector: &str, config: JsValue) -> Result<js_sys::Array, JsValue> {
    let config = decode_config(&config)?;
    apply_all(selector, &config)
}

/// Apply the stock `.sparkle`, `.sparkle-more` and `.sparkle-less` presets.
#[wasm_bindgen(js_name = applyDefaultPresets)]
pub fn apply_default_presets() -> Result<js_sys::Array, JsValue> {
    let handles = js_sys::Array::new();
    for preset in default_presets() {
        for handle in apply_all(preset.selector, &preset.config)?.iter() {
            handles.push(&handle);
        }
    }
    Ok(handles)
}

/// Load the atlas used by effects applied from now on.
#[wasm_bindgen(js_name = setSpriteUrl)]
pub fn set_sprite_url(url: &str) -> Result<(), JsValue> {
    sprite::select(&SpriteSource::Url(url.to_owned())).map(drop)
}

/// Load the atlas from in-memory image bytes.
#[wasm_bindgen(js_name = setSpriteBytes)]
pub fn set_sprite_bytes(bytes: &[u8], mime: &str) -> Result<(), JsValue> {
    sprite::select(&SpriteSource::Embedded {
        bytes: bytes.to_vec(),
        mime: mime.to_owned(),
    })
    .map(drop)
}

fn apply_all(selector: &str, config: &EffectConfig) -> Result<js_sys::Array, JsValue> {
    let nodes = window()?
        .document()
        .ok_or_else(|| js_error("no document"))?
        .query_selector_all(selector)?;
    let handles = js_sys::Array::new();
    for i in 0..nodes.length() {
        let Some(element) = nodes
            .get(i)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        handles.push(&JsValue::from(mount(&element, config.clone())?));
    }
    tracing::debug!(selector, matched = handles.length(), "sparkle selector applied");
    Ok(handles)
}

fn mount(element: &HtmlElement, config: EffectConfig) -> Result<EffectHandle, JsValue> {
    let window = window()?;
    let document = window.document().ok_or_else(|| js_error("no document"))?;
    let target = TargetBox::new(
        f64::from(element.offset_width()),
        f64::from(element.offset_height()),
    );
    let sheet = sprite::current()?;

    let slot: Slot = Rc::new(RefCell::new(None));
    let weak = Rc::downgrade(&slot);
    let callback = Closure::<dyn FnMut(f64)>::new(move |time: f64| {
        let Some(slot) = weak.upgrade() else {
            return;
        };
        let Ok(mut guard) = slot.try_borrow_mut() else {
            return;
        };
        if let Some(mounted) = guard.as_mut() {
            mounted.tick(time);
        }
    });

    // Applying requests the first frame. It cannot fire before this function
    // returns, and an early return drops the effect, which cancels it.
    let scheduler = RafScheduler::new(window, callback);
    let effect = SparkleEffect::apply(target, config, scheduler, seeded_rng())
        .map_err(|err| throw(err.into()))?;
    let geometry = effect.geometry();

    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.class_list().add_1(CANVAS_CLASS)?;
    let style = canvas.style();
    for (property, value) in overlay::overlay_style(&geometry) {
        style.set_property(property, &value)?;
    }
    canvas.set_width(geometry.width);
    canvas.set_height(geometry.height);
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| js_error("2d context unavailable"))?
        .dyn_into()?;
    element.append_child(&canvas)?;

    *slot.borrow_mut() = Some(Mounted {
        effect,
        surface: CanvasSurface::new(ctx),
        sheet,
        canvas,
        clock: FrameClock::start(),
    });
    Ok(EffectHandle { slot })
}

fn decode_config(value: &JsValue) -> Result<EffectConfig, JsValue> {
    let json = if value.is_undefined() || value.is_null() {
        None
    } else {
        js_sys::JSON::stringify(value)?.as_string()
    };
    overlay::config_from_json(json.as_deref()).map_err(|err| throw(err.into()))
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(overlay::seed_from_unit_pair(
        js_sys::Math::random(),
        js_sys::Math::random(),
    ))
}

fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| js_error("no window"))
}

fn throw(err: SparkleError) -> JsValue {
    tracing::debug!(error = %err, "sparkle apply rejected");
    js_error(&err.to_string())
}

fn js_error(message: &str) -> JsValue {
    js_sys::Error::new(message).into()
}
