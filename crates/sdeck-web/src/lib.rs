#![forbid(unsafe_code)]

//! `sdeck-web` provides a host-driven backend for browser embeddings.
//!
//! Design goals:
//! - **Host-driven I/O**: the embedding page (JS) pushes input and reads back
//!   document patches; nothing here touches a real DOM.
//! - **Deterministic time**: the host advances a monotonic clock explicitly.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! Fragment writes are recorded as a history list and scroll resets are
//! counted, so tests can assert on them without a browser.

#[cfg(feature = "input-parser")]
pub mod input_parser;

use core::time::Duration;

use sdeck_backend::{Backend, BackendClock, BackendLocation, BackendPresenter};
use sdeck_core::capabilities::SurfaceCapabilities;
use sdeck_dom::{Document, DocumentChanges};

/// Attribute carrying the node id in full-markup patches.
pub const NODE_ID_ATTR: &str = "data-sdeck-node";

/// Web backend error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebBackendError {
    /// Generic unsupported operation.
    Unsupported(&'static str),
    /// A fragment without the leading `#`.
    InvalidFragment(String),
}

impl core::fmt::Display for WebBackendError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
            Self::InvalidFragment(frag) => write!(f, "invalid fragment: {frag:?}"),
        }
    }
}

impl std::error::Error for WebBackendError {}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time.
    pub fn set(&mut self, now: Duration) {
        self.now = now;
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl BackendClock for DeterministicClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Host-mirrored page location.
#[derive(Debug, Default, Clone)]
pub struct WebLocation {
    fragment: String,
    history: Vec<String>,
    scroll_resets: u32,
}

impl WebLocation {
    /// Location with an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Location opened at `fragment` (a deep link).
    #[must_use]
    pub fn with_fragment(fragment: impl Into<String>) -> Self {
        Self {
            fragment: fragment.into(),
            ..Self::default()
        }
    }

    /// Mirror a fragment change made by the host (address bar, back button).
    ///
    /// Unlike [`BackendLocation::set_fragment`] this does not add history.
    pub fn sync_from_host(&mut self, fragment: impl Into<String>) {
        self.fragment = fragment.into();
    }

    /// Fragments written by the engine, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Take the written fragments, leaving the history empty.
    pub fn take_history(&mut self) -> Vec<String> {
        std::mem::take(&mut self.history)
    }

    /// How many times the engine asked to scroll back to the origin.
    #[must_use]
    pub const fn scroll_resets(&self) -> u32 {
        self.scroll_resets
    }
}

impl BackendLocation for WebLocation {
    type Error = WebBackendError;

    fn fragment(&self) -> Result<String, Self::Error> {
        Ok(self.fragment.clone())
    }

    fn set_fragment(&mut self, fragment: &str) -> Result<(), Self::Error> {
        if !fragment.starts_with('#') {
            return Err(WebBackendError::InvalidFragment(fragment.to_owned()));
        }
        self.fragment = fragment.to_owned();
        self.history.push(fragment.to_owned());
        Ok(())
    }

    fn scroll_to_origin(&mut self) -> Result<(), Self::Error> {
        self.scroll_resets = self.scroll_resets.saturating_add(1);
        Ok(())
    }
}

/// One document patch for the host to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebPatch {
    /// Replace the whole document. Every element carries [`NODE_ID_ATTR`].
    Markup { html: String },
    /// Full attribute set and inline style of one element after the change.
    Element {
        node: u32,
        attrs: Vec<(String, String)>,
        style: String,
    },
}

/// Aggregate patch stats for host instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebPatchStats {
    pub presents: u32,
    pub element_patches: u32,
    pub markup_patches: u32,
    pub bytes: u64,
}

impl WebPatchStats {
    fn record(&mut self, patch: &WebPatch) {
        match patch {
            WebPatch::Markup { html } => {
                self.markup_patches = self.markup_patches.saturating_add(1);
                self.bytes = self.bytes.saturating_add(html.len() as u64);
            }
            WebPatch::Element { attrs, style, .. } => {
                self.element_patches = self.element_patches.saturating_add(1);
                let attr_bytes: usize = attrs.iter().map(|(k, v)| k.len() + v.len()).sum();
                self.bytes = self
                    .bytes
                    .saturating_add((attr_bytes + style.len()) as u64);
            }
        }
    }
}

/// Captured presentation outputs for host consumption.
#[derive(Debug, Default, Clone)]
pub struct WebOutputs {
    /// Log lines written by the runtime.
    pub logs: Vec<String>,
    /// Patches emitted since the outputs were last taken, in order.
    pub patches: Vec<WebPatch>,
    /// Accounting for `patches`.
    pub stats: WebPatchStats,
    /// Whether the page viewport is locked for presenting.
    pub viewport_locked: bool,
}

/// Presenter that turns document changes into patches for the host.
#[derive(Debug, Clone)]
pub struct WebPresenter {
    caps: SurfaceCapabilities,
    outputs: WebOutputs,
}

impl WebPresenter {
    /// Create a new presenter with modern capabilities.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(SurfaceCapabilities::modern())
    }

    /// Create a presenter reporting `caps`, as detected by the host.
    #[must_use]
    pub fn with_capabilities(caps: SurfaceCapabilities) -> Self {
        Self {
            caps,
            outputs: WebOutputs::default(),
        }
    }

    /// Get captured outputs.
    #[must_use]
    pub const fn outputs(&self) -> &WebOutputs {
        &self.outputs
    }

    /// Mutably access captured outputs.
    pub fn outputs_mut(&mut self) -> &mut WebOutputs {
        &mut self.outputs
    }

    /// Take captured logs and patches. The viewport lock state is kept.
    pub fn take_outputs(&mut self) -> WebOutputs {
        let viewport_locked = self.outputs.viewport_locked;
        let taken = std::mem::take(&mut self.outputs);
        self.outputs.viewport_locked = viewport_locked;
        taken
    }
}

impl Default for WebPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl BackendPresenter for WebPresenter {
    type Error = WebBackendError;

    fn capabilities(&self) -> &SurfaceCapabilities {
        &self.caps
    }

    fn set_viewport_locked(&mut self, locked: bool) -> Result<(), Self::Error> {
        self.outputs.viewport_locked = locked;
        Ok(())
    }

    fn present(&mut self, doc: &Document, changes: &DocumentChanges) -> Result<(), Self::Error> {
        let patches = build_patches(doc, changes);
        self.outputs.stats.presents = self.outputs.stats.presents.saturating_add(1);
        for patch in &patches {
            self.outputs.stats.record(patch);
        }
        self.outputs.patches.extend(patches);
        Ok(())
    }

    fn write_log(&mut self, text: &str) -> Result<(), Self::Error> {
        self.outputs.logs.push(text.to_owned());
        Ok(())
    }
}

/// Structural changes rebuild the whole document; otherwise one patch per
/// connected dirty element.
#[must_use]
fn build_patches(doc: &Document, changes: &DocumentChanges) -> Vec<WebPatch> {
    if changes.structural {
        return vec![WebPatch::Markup {
            html: doc.outer_markup_tagged(doc.root(), NODE_ID_ATTR),
        }];
    }
    changes
        .dirty
        .iter()
        .filter(|&&node| doc.is_connected(node))
        .filter_map(|&node| {
            let el = doc.element(node)?;
            Some(WebPatch::Element {
                node: node.get(),
                attrs: el
                    .attrs()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect(),
                style: css_text(el.style()),
            })
        })
        .collect()
}

/// `k: v; k2: v2`, the same form markup uses for the `style` attribute.
#[must_use]
pub fn css_text<'a>(props: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    props
        .map(|(k, v)| format!("{k}: {v}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// A minimal, host-driven web backend.
///
/// This backend is intended to be driven by a JS host:
/// - advance time via [`Self::clock_mut`]
/// - mirror address-bar changes via [`Self::location_mut`]
/// - read patches via [`Self::presenter_mut`]
#[derive(Debug, Clone, Default)]
pub struct WebBackend {
    clock: DeterministicClock,
    location: WebLocation,
    presenter: WebPresenter,
}

impl WebBackend {
    /// Create a backend with modern capabilities and an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the location (e.g. to open at a deep link).
    #[must_use]
    pub fn with_location(mut self, location: WebLocation) -> Self {
        self.location = location;
        self
    }

    /// Replace the presenter (e.g. to report other capabilities).
    #[must_use]
    pub fn with_presenter(mut self, presenter: WebPresenter) -> Self {
        self.presenter = presenter;
        self
    }

    /// Mutably access the clock.
    pub fn clock_mut(&mut self) -> &mut DeterministicClock {
        &mut self.clock
    }

    /// Mutably access the location.
    pub fn location_mut(&mut self) -> &mut WebLocation {
        &mut self.location
    }

    /// Read the location.
    #[must_use]
    pub const fn location_ref(&self) -> &WebLocation {
        &self.location
    }

    /// Mutably access the presenter.
    pub fn presenter_mut(&mut self) -> &mut WebPresenter {
        &mut self.presenter
    }

    /// Read the presenter.
    #[must_use]
    pub const fn presenter_ref(&self) -> &WebPresenter {
        &self.presenter
    }
}

impl Backend for WebBackend {
    type Error = WebBackendError;

    type Clock = DeterministicClock;
    type Location = WebLocation;
    type Presenter = WebPresenter;

    fn clock(&self) -> &Self::Clock {
        &self.clock
    }

    fn location(&mut self) -> &mut Self::Location {
        &mut self.location
    }

    fn presenter(&mut self) -> &mut Self::Presenter {
        &mut self.presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdeck_dom::NodeSpec;

    use pretty_assertions::assert_eq;

    #[test]
    fn deterministic_clock_advances_monotonically() {
        let mut c = DeterministicClock::new();
        assert_eq!(c.now_mono(), Duration::ZERO);

        c.advance(Duration::from_millis(10));
        c.advance(Duration::from_millis(5));
        assert_eq!(c.now_mono(), Duration::from_millis(15));

        // Saturation: don't panic or wrap.
        c.set(Duration::MAX);
        c.advance(Duration::from_secs(1));
        assert_eq!(c.now_mono(), Duration::MAX);
    }

    #[test]
    fn location_records_history_and_scrolls() {
        let mut loc = WebLocation::with_fragment("#/intro");
        assert_eq!(loc.fragment().unwrap(), "#/intro");

        loc.set_fragment("#/step-2").unwrap();
        loc.sync_from_host("#/step-3");
        assert_eq!(
            loc.set_fragment("step-4"),
            Err(WebBackendError::InvalidFragment("step-4".to_owned()))
        );
        loc.scroll_to_origin().unwrap();

        assert_eq!(loc.fragment().unwrap(), "#/step-3");
        assert_eq!(loc.history(), ["#/step-2".to_owned()]);
        assert_eq!(loc.scroll_resets(), 1);
        assert_eq!(loc.take_history().len(), 1);
        assert!(loc.history().is_empty());
    }

    #[test]
    fn structural_change_emits_full_markup() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_spec(root, &NodeSpec::element("p")).unwrap();
        let changes = doc.take_changes();

        let mut presenter = WebPresenter::new();
        presenter.present(&doc, &changes).unwrap();
        let outputs = presenter.take_outputs();
        assert_eq!(
            outputs.patches,
            vec![WebPatch::Markup {
                html: format!(
                    r#"<body data-sdeck-node="{}"><p data-sdeck-node="{}"></p></body>"#,
                    root.get(),
                    p.get()
                ),
            }]
        );
        assert_eq!(outputs.stats.markup_patches, 1);
        assert_eq!(outputs.stats.presents, 1);
    }

    #[test]
    fn attribute_changes_emit_element_patches() {
        let mut doc = Document::new();
        let root = doc.root();
        let p = doc.append_spec(root, &NodeSpec::element("p")).unwrap();
        let detached = doc.create_element("div");
        doc.take_changes();

        doc.set_attr(p, "class", "active").unwrap();
        doc.set_style(p, "transform", "scale(2)").unwrap();
        doc.set_style(p, "position", "absolute").unwrap();
        doc.set_attr(detached, "id", "x").unwrap();
        let changes = doc.take_changes();

        let mut presenter = WebPresenter::new();
        presenter.present(&doc, &changes).unwrap();
        assert_eq!(
            presenter.outputs().patches,
            vec![WebPatch::Element {
                node: p.get(),
                attrs: vec![("class".to_owned(), "active".to_owned())],
                style: "position: absolute; transform: scale(2)".to_owned(),
            }]
        );
        assert_eq!(presenter.outputs().stats.element_patches, 1);
    }

    #[test]
    fn take_outputs_keeps_viewport_lock() {
        let mut presenter = WebPresenter::new();
        presenter.write_log("hello").unwrap();
        presenter.set_viewport_locked(true).unwrap();

        let outputs = presenter.take_outputs();
        assert_eq!(outputs.logs, vec!["hello"]);
        assert!(outputs.viewport_locked);
        assert!(presenter.outputs().viewport_locked);
        assert!(presenter.outputs().logs.is_empty());
    }

    #[test]
    fn backend_reports_presenter_capabilities() {
        let mut backend = WebBackend::new()
            .with_presenter(WebPresenter::with_capabilities(SurfaceCapabilities::basic()));
        assert!(!backend.presenter().capabilities().supports_presentation());
        backend.clock_mut().advance(Duration::from_millis(3));
        assert_eq!(backend.clock().now_mono(), Duration::from_millis(3));
    }
}
