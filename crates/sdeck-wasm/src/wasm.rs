#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the DeckRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::RunnerCore;
use sdeck_web::WebPatch;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn patch_to_js(patch: &WebPatch) -> JsValue {
    let obj = Object::new();
    match patch {
        WebPatch::Markup { html } => {
            set_js(&obj, "kind", JsValue::from_str("markup"));
            set_js(&obj, "html", JsValue::from_str(html));
        }
        WebPatch::Element { node, attrs, style } => {
            set_js(&obj, "kind", JsValue::from_str("element"));
            set_js(&obj, "node", JsValue::from(*node));
            let pairs = Array::new();
            for (name, value) in attrs {
                let pair = Array::new();
                pair.push(&JsValue::from_str(name));
                pair.push(&JsValue::from_str(value));
                pairs.push(&pair);
            }
            set_js(&obj, "attrs", pairs.into());
            set_js(&obj, "style", JsValue::from_str(style));
        }
    }
    obj.into()
}

/// WASM runner for one structure deck.
///
/// Host-driven: JavaScript forwards DOM events as JSON, advances time each
/// frame, applies the returned patches, and pushes history entries for
/// fragments returned by `tick`.
#[wasm_bindgen]
pub struct DeckRunner {
    inner: RunnerCore,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl DeckRunner {
    /// Load a deck from its JSON node tree.
    ///
    /// `perspective` is the host's CSS perspective probe; `userAgent` the
    /// navigator string used for the touch-platform check.
    #[wasm_bindgen(constructor)]
    pub fn new(
        deck_json: &str,
        fragment: &str,
        perspective: bool,
        user_agent: &str,
    ) -> Result<DeckRunner, JsValue> {
        install_panic_hook();
        RunnerCore::new(deck_json, fragment, perspective, user_agent)
            .map(|inner| Self { inner })
            .map_err(|err| JsValue::from_str(&err))
    }

    /// Enter presentation mode: `"activated"`, `"already_active"`,
    /// `"unsupported"` or `"error"`.
    pub fn activate(&mut self) -> String {
        self.inner.activate().to_owned()
    }

    /// Leave presentation mode. Returns `true` if it was on.
    pub fn deactivate(&mut self) -> bool {
        self.inner.deactivate()
    }

    /// Route one JSON-encoded input.
    ///
    /// Returns `{ handled, preventDefault }`, or `null` if the input was
    /// malformed or unmapped.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> JsValue {
        match self.inner.push_encoded_input(json) {
            Some(outcome) => {
                let obj = Object::new();
                set_js(&obj, "handled", JsValue::from_bool(outcome.handled));
                set_js(
                    &obj,
                    "preventDefault",
                    JsValue::from_bool(outcome.prevent_default),
                );
                obj.into()
            }
            None => JsValue::NULL,
        }
    }

    /// Advance deterministic clock by `dt_ms` milliseconds (real-time mode).
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set deterministic clock to absolute nanoseconds (replay mode).
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ns: f64) {
        self.inner.set_time_ns(ts_ns);
    }

    /// Run due deferred work. Returns the fragment to push into history,
    /// or `undefined`.
    pub fn tick(&mut self) -> Option<String> {
        self.inner.tick()
    }

    /// Runner-clock milliseconds of the next deferred write, or `undefined`.
    #[wasm_bindgen(js_name = nextDeadlineMs)]
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner.next_deadline_ms()
    }

    /// Drain patches as `{ kind: "markup", html }` or
    /// `{ kind: "element", node, attrs: [[name, value]], style }`.
    #[wasm_bindgen(js_name = takePatches)]
    pub fn take_patches(&mut self) -> Array {
        let arr = Array::new();
        for patch in self.inner.take_patches() {
            arr.push(&patch_to_js(&patch));
        }
        arr
    }

    /// Take accumulated log lines.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let logs = self.inner.take_logs();
        let arr = Array::new();
        for log in logs {
            arr.push(&JsValue::from_str(&log));
        }
        arr
    }

    /// Patch stats: `{ presents, element_patches, markup_patches, bytes }`,
    /// or `null`.
    #[wasm_bindgen(js_name = patchStats)]
    pub fn patch_stats(&self) -> JsValue {
        match self.inner.patch_stats() {
            Some(stats) => {
                let obj = Object::new();
                set_js(&obj, "presents", stats.presents.into());
                set_js(&obj, "element_patches", stats.element_patches.into());
                set_js(&obj, "markup_patches", stats.markup_patches.into());
                set_js(&obj, "bytes", JsValue::from_f64(stats.bytes as f64));
                obj.into()
            }
            None => JsValue::NULL,
        }
    }

    /// Whether presentation mode is on.
    #[wasm_bindgen(js_name = isPresenting)]
    pub fn is_presenting(&self) -> bool {
        self.inner.is_presenting()
    }

    /// Whether the host should keep its viewport locked.
    #[wasm_bindgen(js_name = viewportLocked)]
    pub fn viewport_locked(&self) -> bool {
        self.inner.viewport_locked()
    }

    #[wasm_bindgen(js_name = activeStepId)]
    pub fn active_step_id(&self) -> Option<String> {
        self.inner.active_step_id()
    }

    #[wasm_bindgen(js_name = stepCount)]
    pub fn step_count(&self) -> u32 {
        u32::try_from(self.inner.step_count()).unwrap_or(u32::MAX)
    }

    /// Scroll-to-origin requests issued so far.
    #[wasm_bindgen(js_name = scrollResets)]
    pub fn scroll_resets(&self) -> u32 {
        self.inner.scroll_resets()
    }

    /// Full current markup, tagged with node ids.
    #[wasm_bindgen(js_name = snapshotMarkup)]
    pub fn snapshot_markup(&self) -> String {
        self.inner.snapshot_markup()
    }
}
