#![forbid(unsafe_code)]

//! Sprite atlas loading through `HtmlImageElement`.
//!
//! One atlas is current per page. Effects capture the current sheet when
//! they are applied; choosing a new source only affects later effects.

use std::cell::RefCell;
use std::rc::Rc;

use sparkle_core::error::ResourceError;
use sparkle_core::sprite::{SpriteSheet, SpriteSource};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Blob, BlobPropertyBag, HtmlImageElement, Url};

pub(crate) type SharedSheet = Rc<RefCell<SpriteSheet<HtmlImageElement>>>;

struct LoadedAtlas {
    sheet: SharedSheet,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

thread_local! {
    static CURRENT: RefCell<Option<LoadedAtlas>> = const { RefCell::new(None) };
}

/// The current atlas, starting a load of the default source on first use.
pub(crate) fn current() -> Result<SharedSheet, JsValue> {
    if let Some(sheet) = CURRENT.with(|slot| slot.borrow().as_ref().map(|a| a.sheet.clone())) {
        return Ok(sheet);
    }
    select(&SpriteSource::default())
}

/// Make `source` current and start loading it.
pub(crate) fn select(source: &SpriteSource) -> Result<SharedSheet, JsValue> {
    let atlas = load(source)?;
    let sheet = atlas.sheet.clone();
    CURRENT.with(|slot| *slot.borrow_mut() = Some(atlas));
    Ok(sheet)
}

fn load(source: &SpriteSource) -> Result<LoadedAtlas, JsValue> {
    let (src, object_url) = match source {
        SpriteSource::Url(url) => (url.clone(), false),
        SpriteSource::Embedded { bytes, mime } => (object_url(bytes, mime)?, true),
    };

    let image = HtmlImageElement::new()?;
    let sheet: SharedSheet = Rc::new(RefCell::new(SpriteSheet::pending()));

    let onload = {
        let sheet = Rc::clone(&sheet);
        let image = image.clone();
        let src = src.clone();
        Closure::<dyn FnMut()>::new(move || {
            // Rejections are already recorded on the sheet.
            let _ = sheet.borrow_mut().mark_ready(
                image.clone(),
                image.natural_width(),
                image.natural_height(),
            );
            if object_url {
                let _ = Url::revoke_object_url(&src);
            }
        })
    };
    let onerror = {
        let sheet = Rc::clone(&sheet);
        let src = src.clone();
        Closure::<dyn FnMut()>::new(move || {
            let label = if object_url { "embedded atlas" } else { src.as_str() };
            sheet
                .borrow_mut()
                .mark_failed(ResourceError::Load(label.to_owned()));
            if object_url {
                let _ = Url::revoke_object_url(&src);
            }
        })
    };

    image.set_onload(Some(onload.as_ref().unchecked_ref()));
    image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    image.set_src(&src);
    tracing::debug!(embedded = object_url, "sprite atlas load started");

    Ok(LoadedAtlas {
        sheet,
        _onload: onload,
        _onerror: onerror,
    })
}

fn object_url(bytes: &[u8], mime: &str) -> Result<String, JsValue> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    Url::create_object_url_with_blob(&blob)
}
