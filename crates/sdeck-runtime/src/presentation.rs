#![forbid(unsafe_code)]

//! The presentation controller.
//!
//! [`Presentation`] owns the document and a [`Backend`]. Every public
//! operation mutates the document, then hands the recorded changes to the
//! backend presenter in one batch.
//!
//! # Layers
//!
//! On construction the container's children are wrapped once in a
//! `div.canvas`. While presenting, the container is the zoom layer and the
//! canvas the pan layer (see [`crate::camera`]).
//!
//! # Example
//!
//! ```
//! use sdeck_core::event::{Event, KeyCode, KeyEvent};
//! use sdeck_dom::{Document, NodeSpec};
//! use sdeck_runtime::{Mode, Presentation};
//! use sdeck_web::WebBackend;
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let deck = doc
//!     .append_spec(
//!         root,
//!         &NodeSpec::element("div")
//!             .children([NodeSpec::element("section"), NodeSpec::element("section")]),
//!     )
//!     .unwrap();
//!
//! let mut deck = Presentation::new(WebBackend::new(), doc, deck).unwrap();
//! deck.activate().unwrap();
//! assert_eq!(deck.mode(), Mode::Presentation);
//! assert_eq!(deck.active_index(), Some(0));
//!
//! deck.handle_event(&Event::Key(KeyEvent::new(KeyCode::Right))).unwrap();
//! assert_eq!(deck.active_step().map(|s| s.id.as_str()), Some("step-2"));
//! ```

use core::time::Duration;

use sdeck_backend::{Backend, BackendClock, BackendLocation, BackendPresenter};
use sdeck_core::event::{ActivateEvent, Event, KeyEvent, PointerButton};
use sdeck_core::geometry::{Num, Transform3d};
use sdeck_dom::{Document, DomError, NodeId};

use crate::builder::{Step, build_steps, teardown_steps};
use crate::camera::{CameraState, plan_transition};
use crate::config::DeckConfig;
use crate::deferred::DeferredAction;
use crate::error::{Error, Result};
use crate::input::{
    KeyAction, action_for_key, resolve_activation_target, selection_target,
    step_id_from_fragment,
};
use crate::navigation::NavigationIndex;

/// Class of the pan layer wrapper.
pub const CANVAS_CLASS: &str = "canvas";
/// Class of the active step.
pub const ACTIVE_CLASS: &str = "active";
/// Class on the canvas while presenting.
pub const PRESENTATION_CLASS: &str = "presentation";
/// Class on the container when the surface cannot present.
pub const UNSUPPORTED_CLASS: &str = "structure-not-supported";
/// Prefix of the container class naming the active step.
pub const ACTIVE_TOKEN_PREFIX: &str = "step-";

/// Display mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Plain document layout.
    #[default]
    NotPresentation,
    /// Steps laid out in 3-D with the camera on one of them.
    Presentation,
}

impl Mode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::NotPresentation => Self::Presentation,
            Self::Presentation => Self::NotPresentation,
        }
    }
}

/// Result of [`Presentation::activate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    /// Steps were built; `initial` is the first selected step, if any.
    Activated { steps: usize, initial: Option<usize> },
    /// Presentation mode was already on.
    AlreadyActive,
    /// The surface lacks 3-D support; the document keeps its layout.
    Unsupported,
}

/// How an input event was handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// The presentation acted on the event.
    pub handled: bool,
    /// The host should suppress the event's default action.
    pub prevent_default: bool,
}

impl EventOutcome {
    pub const IGNORED: Self = Self {
        handled: false,
        prevent_default: false,
    };
    pub const HANDLED: Self = Self {
        handled: true,
        prevent_default: false,
    };
    pub const CONSUMED: Self = Self {
        handled: true,
        prevent_default: true,
    };
}

#[derive(Debug)]
struct Session {
    index: NavigationIndex,
    camera: CameraState,
    fragment_write: DeferredAction<String>,
    container_class: Option<String>,
    container_style: Vec<(String, String)>,
}

const LAYER_BASE_STYLE: [(&str, &str); 4] = [
    ("position", "absolute"),
    ("transform-origin", "top left"),
    ("transition", "all 0s ease-in-out"),
    ("transform-style", "preserve-3d"),
];

/// A document presented through a backend.
#[derive(Debug)]
pub struct Presentation<B: Backend> {
    backend: B,
    doc: Document,
    container: NodeId,
    canvas: NodeId,
    config: DeckConfig,
    session: Option<Session>,
}

impl<B: Backend> Presentation<B> {
    /// Wrap `container` with the default configuration.
    pub fn new(backend: B, doc: Document, container: NodeId) -> Result<Self, B::Error> {
        Self::with_config(backend, doc, container, DeckConfig::default())
    }

    /// Wrap `container`, moving its children into a new canvas element.
    pub fn with_config(
        backend: B,
        mut doc: Document,
        container: NodeId,
        config: DeckConfig,
    ) -> Result<Self, B::Error> {
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(Error::InvalidConfig(problems));
        }
        if !doc.contains(container) {
            return Err(Error::Dom(DomError::UnknownNode(container)));
        }
        if doc.element(container).is_none() {
            return Err(Error::Dom(DomError::NotAnElement(container)));
        }

        let canvas = doc.create_element("div");
        doc.set_attr(canvas, "class", CANVAS_CLASS)?;
        let children = doc.children(container).to_vec();
        for child in children {
            doc.append_child(canvas, child)?;
        }
        doc.append_child(container, canvas)?;

        let mut this = Self {
            backend,
            doc,
            container,
            canvas,
            config,
            session: None,
        };
        this.flush()?;
        Ok(this)
    }

    // ── Accessors ───────────────────────────────────────────────────────

    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.session.is_some() {
            Mode::Presentation
        } else {
            Mode::NotPresentation
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The zoom layer.
    #[must_use]
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// The pan layer.
    #[must_use]
    pub fn canvas(&self) -> NodeId {
        self.canvas
    }

    #[must_use]
    pub fn config(&self) -> &DeckConfig {
        &self.config
    }

    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Steps of the running session, empty when not presenting.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        self.session.as_ref().map_or(&[][..], |s| s.index.steps())
    }

    #[must_use]
    pub fn active_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.camera.active())
    }

    #[must_use]
    pub fn active_step(&self) -> Option<&Step> {
        let session = self.session.as_ref()?;
        session.index.get(session.camera.active()?)
    }

    /// Current camera transform.
    #[must_use]
    pub fn camera(&self) -> Option<&Transform3d> {
        self.session.as_ref().map(|s| s.camera.current())
    }

    /// Fragment waiting for its debounce to elapse.
    #[must_use]
    pub fn pending_fragment(&self) -> Option<&str> {
        self.session
            .as_ref()
            .and_then(|s| s.fragment_write.payload())
            .map(String::as_str)
    }

    /// When [`Self::tick`] next has work to do, on the backend clock.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.session.as_ref().and_then(|s| s.fragment_write.due_at())
    }

    // ── Mode ────────────────────────────────────────────────────────────

    /// Enter presentation mode.
    pub fn activate(&mut self) -> Result<ActivationOutcome, B::Error> {
        if self.session.is_some() {
            return Ok(ActivationOutcome::AlreadyActive);
        }

        let caps = *self.backend.presenter().capabilities();
        if !caps.supports_presentation() {
            self.doc.add_class(self.container, UNSUPPORTED_CLASS)?;
            self.backend
                .presenter()
                .write_log("3-D transforms unavailable; keeping the document layout")
                .map_err(Error::Backend)?;
            self.flush()?;
            tracing::warn!(
                target: "sdeck.mode",
                perspective = caps.perspective,
                touch_platform = caps.touch_platform,
                "presentation unsupported on this surface"
            );
            return Ok(ActivationOutcome::Unsupported);
        }

        let container_class = self.doc.attr(self.container, "class").map(str::to_owned);
        let container_style = self
            .doc
            .element(self.container)
            .map(|el| {
                el.style()
                    .map(|(k, v)| (k.to_owned(), v.to_owned()))
                    .collect()
            })
            .unwrap_or_default();

        self.doc.set_attr(self.container, "class", "")?;
        self.doc.add_class(self.canvas, PRESENTATION_CLASS)?;
        self.backend
            .presenter()
            .set_viewport_locked(true)
            .map_err(Error::Backend)?;
        for layer in [self.container, self.canvas] {
            self.doc.set_styles(
                layer,
                LAYER_BASE_STYLE.map(|(k, v)| (k, v.to_owned())),
            )?;
        }
        self.doc.set_styles(
            self.container,
            [
                ("top", "50%".to_owned()),
                ("left", "50%".to_owned()),
                (
                    "perspective",
                    format!("{}px", Num(self.config.base_perspective_px)),
                ),
            ],
        )?;

        let steps = build_steps(&mut self.doc, self.canvas, &self.config)?;
        let count = steps.len();
        self.session = Some(Session {
            index: NavigationIndex::new(steps),
            camera: CameraState::new(),
            fragment_write: DeferredAction::new(),
            container_class,
            container_style,
        });

        let fragment = self.backend.location().fragment().map_err(Error::Backend)?;
        let initial = self.initial_index(&fragment);
        if let Some(index) = initial {
            self.select_index(index)?;
        }
        self.flush()?;
        tracing::info!(
            target: "sdeck.mode",
            steps = count,
            initial = ?initial,
            "presentation mode on"
        );
        Ok(ActivationOutcome::Activated {
            steps: count,
            initial,
        })
    }

    fn initial_index(&self, fragment: &str) -> Option<usize> {
        let index = &self.session.as_ref()?.index;
        let id = step_id_from_fragment(fragment);
        self.doc
            .element_by_id(id)
            .and_then(|node| index.index_of(node))
            .or_else(|| index.next_index(None))
    }

    /// Leave presentation mode, restoring the document.
    ///
    /// Returns `false` when presentation mode was already off.
    pub fn deactivate(&mut self) -> Result<bool, B::Error> {
        let Some(session) = self.session.take() else {
            return Ok(false);
        };
        if let Some(pending) = session.fragment_write.payload() {
            tracing::debug!(
                target: "sdeck.fragment",
                fragment = %pending,
                "dropping pending fragment write"
            );
        }

        teardown_steps(&mut self.doc, session.index.steps())?;
        self.doc.clear_style(self.canvas)?;
        self.doc.remove_class(self.canvas, PRESENTATION_CLASS)?;
        self.doc.clear_style(self.container)?;
        self.doc.set_styles(
            self.container,
            session
                .container_style
                .iter()
                .map(|(k, v)| (k.as_str(), v.clone())),
        )?;
        match session.container_class {
            Some(class) => self.doc.set_attr(self.container, "class", class)?,
            None => {
                self.doc.remove_attr(self.container, "class")?;
            }
        }
        self.backend
            .presenter()
            .set_viewport_locked(false)
            .map_err(Error::Backend)?;
        self.flush()?;
        tracing::info!(target: "sdeck.mode", "presentation mode off");
        Ok(true)
    }

    /// Switch mode, returning the mode now in effect.
    pub fn toggle_mode(&mut self) -> Result<Mode, B::Error> {
        if self.session.is_some() {
            self.deactivate()?;
        } else {
            self.activate()?;
        }
        Ok(self.mode())
    }

    // ── Selection ───────────────────────────────────────────────────────

    /// Move the camera to the step element `target`.
    ///
    /// Returns the new active index, or `None` when `target` is not a step,
    /// is already active, or presentation mode is off. `None` leaves the
    /// document untouched.
    pub fn select(&mut self, target: NodeId) -> Result<Option<usize>, B::Error> {
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let Some(index) = session.index.index_of(target) else {
            tracing::trace!(target: "sdeck.select", node = %target, "not a step");
            return Ok(None);
        };
        let previous = session.camera.active();
        if previous == Some(index) {
            return Ok(None);
        }
        let Some(step) = session.index.get(index) else {
            return Ok(None);
        };
        let (element, transform) = (step.element, step.transform);
        let id = step.id.clone();

        self.backend
            .location()
            .scroll_to_origin()
            .map_err(Error::Backend)?;

        if let Some(prev) = previous.and_then(|i| session.index.get(i)) {
            self.doc.remove_class(prev.element, ACTIVE_CLASS)?;
        }
        self.doc.add_class(element, ACTIVE_CLASS)?;
        self.doc.set_attr(
            self.container,
            "class",
            format!("{ACTIVE_TOKEN_PREFIX}{id}"),
        )?;

        let now = self.backend.clock().now_mono();
        session.fragment_write.arm(
            now,
            self.config.fragment_debounce(),
            format!("{}{id}", self.config.fragment_prefix),
        );

        let plan = plan_transition(
            session.camera.current(),
            &transform,
            session.camera.is_initial(),
            &self.config,
        );
        let (zoom, perspective) = plan.zoom_layer();
        self.doc.set_styles(self.container, zoom.properties())?;
        self.doc.set_style(self.container, "perspective", perspective)?;
        self.doc
            .set_styles(self.canvas, plan.pan_layer().properties())?;
        session.camera.commit(plan.camera, index);

        tracing::debug!(
            target: "sdeck.select",
            id = %id,
            index,
            zooming_in = plan.zooming_in,
            duration_ms = plan.duration.as_millis() as u64,
            "step selected"
        );
        self.flush()?;
        Ok(Some(index))
    }

    /// Select the step at `index`.
    pub fn select_index(&mut self, index: usize) -> Result<Option<usize>, B::Error> {
        let Some(element) = self
            .session
            .as_ref()
            .and_then(|s| s.index.get(index))
            .map(|s| s.element)
        else {
            return Ok(None);
        };
        self.select(element)
    }

    /// Select the step with identifier `id`.
    pub fn select_id(&mut self, id: &str) -> Result<Option<usize>, B::Error> {
        match self.doc.element_by_id(id) {
            Some(node) => self.select(node),
            None => Ok(None),
        }
    }

    /// Select the following step, wrapping to the first.
    pub fn select_next(&mut self) -> Result<Option<usize>, B::Error> {
        let target = self
            .session
            .as_ref()
            .and_then(|s| s.index.next_index(s.camera.active()));
        match target {
            Some(index) => self.select_index(index),
            None => Ok(None),
        }
    }

    /// Select the preceding step, wrapping to the last.
    pub fn select_previous(&mut self) -> Result<Option<usize>, B::Error> {
        let target = self
            .session
            .as_ref()
            .and_then(|s| s.index.previous_index(s.camera.active()));
        match target {
            Some(index) => self.select_index(index),
            None => Ok(None),
        }
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Route one host event.
    pub fn handle_event(&mut self, event: &Event) -> Result<EventOutcome, B::Error> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Activate(activate) => self.handle_activate(activate),
            Event::FragmentChange(fragment) => self.handle_fragment(fragment),
        }
    }

    fn handle_key(&mut self, key: &KeyEvent) -> Result<EventOutcome, B::Error> {
        if !key.is_actionable() {
            return Ok(EventOutcome::IGNORED);
        }
        let Some(action) = action_for_key(key.code) else {
            return Ok(EventOutcome::IGNORED);
        };
        tracing::trace!(target: "sdeck.input", code = ?key.code, action = ?action, "key");
        match action {
            KeyAction::ToggleMode => {
                self.toggle_mode()?;
                Ok(EventOutcome::HANDLED)
            }
            _ if self.session.is_none() => Ok(EventOutcome::IGNORED),
            KeyAction::Next => {
                self.select_next()?;
                Ok(EventOutcome::HANDLED)
            }
            KeyAction::Previous => {
                self.select_previous()?;
                Ok(EventOutcome::HANDLED)
            }
        }
    }

    fn handle_activate(&mut self, event: &ActivateEvent) -> Result<EventOutcome, B::Error> {
        if event.button != PointerButton::Primary {
            return Ok(EventOutcome::IGNORED);
        }
        let Some(session) = self.session.as_ref() else {
            return Ok(EventOutcome::IGNORED);
        };
        let target = resolve_activation_target(&self.doc, event.target, |n| {
            session.index.is_step(n)
        })
        .and_then(|t| selection_target(&self.doc, t));
        let Some(node) = target else {
            return Ok(EventOutcome::IGNORED);
        };
        tracing::trace!(target: "sdeck.input", from = %event.target, to = %node, "activation");
        Ok(match self.select(node)? {
            Some(_) => EventOutcome::CONSUMED,
            None => EventOutcome::IGNORED,
        })
    }

    fn handle_fragment(&mut self, fragment: &str) -> Result<EventOutcome, B::Error> {
        if self.session.is_none() {
            return Ok(EventOutcome::IGNORED);
        }
        tracing::trace!(target: "sdeck.fragment", fragment, "fragment changed");
        Ok(match self.select_id(step_id_from_fragment(fragment))? {
            Some(_) => EventOutcome::HANDLED,
            None => EventOutcome::IGNORED,
        })
    }

    // ── Time ────────────────────────────────────────────────────────────

    /// Run due deferred work: writes the debounced fragment once it is due.
    ///
    /// Returns the fragment written, if any.
    pub fn tick(&mut self) -> Result<Option<String>, B::Error> {
        let now = self.backend.clock().now_mono();
        let Some(fragment) = self
            .session
            .as_mut()
            .and_then(|s| s.fragment_write.poll(now))
        else {
            return Ok(None);
        };
        self.backend
            .location()
            .set_fragment(&fragment)
            .map_err(Error::Backend)?;
        tracing::debug!(target: "sdeck.fragment", fragment = %fragment, "fragment written");
        Ok(Some(fragment))
    }

    /// Consume the presentation, returning the document and backend.
    #[must_use]
    pub fn into_parts(self) -> (Document, B) {
        (self.doc, self.backend)
    }

    fn flush(&mut self) -> Result<(), B::Error> {
        let changes = self.doc.take_changes();
        if changes.is_empty() {
            return Ok(());
        }
        self.backend
            .presenter()
            .present(&self.doc, &changes)
            .map_err(Error::Backend)
    }
}
