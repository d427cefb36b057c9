#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping `Presentation<WebBackend>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use core::time::Duration;

use sdeck_core::capabilities::SurfaceCapabilities;
use sdeck_core::event::Event;
use sdeck_dom::{Document, NodeSpec};
use sdeck_runtime::{ActivationOutcome, EventOutcome, Presentation};
use sdeck_web::input_parser::parse_encoded_input_to_event;
use sdeck_web::{WebBackend, WebLocation, WebPatch, WebPatchStats, WebPresenter};

/// Platform-independent deck runner.
pub struct RunnerCore {
    inner: Presentation<WebBackend>,
    /// Runner-level diagnostics, merged with presenter logs on drain.
    logs: Vec<String>,
    /// Stats of the last drained patch batch.
    cached_patch_stats: Option<WebPatchStats>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl RunnerCore {
    /// Load a deck from its JSON [`NodeSpec`] and wrap it.
    ///
    /// `fragment` is the page's current hash (deep link), `perspective` the
    /// host's 3-D probe result, and `user_agent` the navigator string.
    pub fn new(
        deck_json: &str,
        fragment: &str,
        perspective: bool,
        user_agent: &str,
    ) -> Result<Self, String> {
        let spec: NodeSpec =
            serde_json::from_str(deck_json).map_err(|e| format!("deck_json_error: {e}"))?;
        let mut doc = Document::new();
        let root = doc.root();
        let container = doc
            .append_spec(root, &spec)
            .map_err(|e| format!("deck_load_error: {e}"))?;

        let caps = SurfaceCapabilities::detect(perspective, user_agent);
        let backend = WebBackend::new()
            .with_location(WebLocation::with_fragment(fragment))
            .with_presenter(WebPresenter::with_capabilities(caps));
        let inner = Presentation::new(backend, doc, container)
            .map_err(|e| format!("deck_init_error: {e}"))?;
        Ok(Self {
            inner,
            logs: Vec::new(),
            cached_patch_stats: None,
        })
    }

    /// Enter presentation mode. Returns a host-facing label.
    pub fn activate(&mut self) -> &'static str {
        match self.inner.activate() {
            Ok(ActivationOutcome::Activated { .. }) => "activated",
            Ok(ActivationOutcome::AlreadyActive) => "already_active",
            Ok(ActivationOutcome::Unsupported) => "unsupported",
            Err(err) => {
                self.logs.push(format!("runner_activate_error: {err}"));
                "error"
            }
        }
    }

    /// Leave presentation mode. Returns `true` if it was on.
    pub fn deactivate(&mut self) -> bool {
        self.inner.deactivate().unwrap_or_else(|err| {
            self.logs.push(format!("runner_deactivate_error: {err}"));
            false
        })
    }

    /// Parse a JSON-encoded input event and route it immediately.
    ///
    /// Returns `None` if the input was malformed or had no `Event` mapping.
    pub fn push_encoded_input(&mut self, json: &str) -> Option<EventOutcome> {
        let event = match parse_encoded_input_to_event(json) {
            Ok(Some(event)) => event,
            Ok(None) => return None,
            Err(err) => {
                self.logs.push(format!("runner_input_error: {err}"));
                return None;
            }
        };
        if let Event::FragmentChange(hash) = &event {
            self.inner
                .backend_mut()
                .location_mut()
                .sync_from_host(hash.as_str());
        }
        match self.inner.handle_event(&event) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.logs.push(format!("runner_event_error: {err}"));
                Some(EventOutcome::IGNORED)
            }
        }
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host input can be noisy (NaN/inf/negative spikes).
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let max_secs = Duration::MAX.as_secs_f64();
        let secs = (dt_ms / 1000.0).min(max_secs);
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.inner.backend_mut().clock_mut().advance(duration);
    }

    /// Set the deterministic clock to absolute nanoseconds.
    pub fn set_time_ns(&mut self, ts_ns: f64) {
        let nanos = if !ts_ns.is_finite() || ts_ns <= 0.0 {
            0
        } else {
            ts_ns.min(u64::MAX as f64) as u64
        };
        self.inner
            .backend_mut()
            .clock_mut()
            .set(Duration::from_nanos(nanos));
    }

    /// Run due deferred work. Returns the fragment the host should push.
    pub fn tick(&mut self) -> Option<String> {
        self.inner.tick().unwrap_or_else(|err| {
            self.logs.push(format!("runner_tick_error: {err}"));
            None
        })
    }

    /// Milliseconds on the runner clock at which [`Self::tick`] has work.
    pub fn next_deadline_ms(&self) -> Option<f64> {
        self.inner
            .next_deadline()
            .map(|d| d.as_secs_f64() * 1000.0)
    }

    /// Drain patches emitted since the last call.
    pub fn take_patches(&mut self) -> Vec<WebPatch> {
        let outputs = self.inner.backend_mut().presenter_mut().take_outputs();
        self.cached_patch_stats = Some(outputs.stats);
        self.logs.extend(outputs.logs);
        outputs.patches
    }

    /// Stats of the last [`Self::take_patches`] batch.
    pub fn patch_stats(&self) -> Option<WebPatchStats> {
        self.cached_patch_stats
    }

    /// Take accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        let presenter = self.inner.backend_mut().presenter_mut();
        let pending = std::mem::take(&mut presenter.outputs_mut().logs);
        self.logs.extend(pending);
        std::mem::take(&mut self.logs)
    }

    /// Whether presentation mode is on.
    pub fn is_presenting(&self) -> bool {
        self.inner.is_active()
    }

    /// Whether the host should lock its viewport.
    pub fn viewport_locked(&self) -> bool {
        self.inner.backend().presenter_ref().outputs().viewport_locked
    }

    /// Identifier of the active step.
    pub fn active_step_id(&self) -> Option<String> {
        self.inner.active_step().map(|s| s.id.clone())
    }

    /// Number of steps in the running session.
    pub fn step_count(&self) -> usize {
        self.inner.steps().len()
    }

    /// Scroll resets the host still has to perform.
    pub fn scroll_resets(&self) -> u32 {
        self.inner.backend().location_ref().scroll_resets()
    }

    /// Full current markup, tagged with node ids.
    pub fn snapshot_markup(&self) -> String {
        let doc = self.inner.document();
        doc.outer_markup_tagged(doc.root(), sdeck_web::NODE_ID_ATTR)
    }
}
