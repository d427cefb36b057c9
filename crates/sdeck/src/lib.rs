#![forbid(unsafe_code)]

//! sdeck public facade crate.
//!
//! Re-exports the types an embedder needs to turn a document of nested
//! `section` elements into a zoomable presentation, plus a prelude.
//!
//! ```
//! use sdeck::prelude::*;
//!
//! let deck = NodeSpec::element("div").children([
//!     NodeSpec::element("section").attr("id", "title"),
//!     NodeSpec::element("section"),
//! ]);
//! let mut deck = sdeck::open_web(&deck, WebBackend::new()).unwrap();
//! deck.activate().unwrap();
//! assert_eq!(deck.active_step().map(|s| s.id.as_str()), Some("title"));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use sdeck_core::capabilities::SurfaceCapabilities;
pub use sdeck_core::event::{
    ActivateEvent, Event, KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton,
};
pub use sdeck_core::geometry::Transform3d;
pub use sdeck_core::node::NodeId;

// --- Document re-exports ---------------------------------------------------

pub use sdeck_dom::{Document, DomError, NodeSpec};

// --- Backend re-exports ----------------------------------------------------

pub use sdeck_backend::{Backend, BackendClock, BackendLocation, BackendPresenter};

// --- Runtime re-exports ----------------------------------------------------

pub use sdeck_runtime::{
    ActivationOutcome, DeckConfig, Error, EventOutcome, Mode, Presentation, Step,
};

#[cfg(feature = "web")]
pub use sdeck_web::{WebBackend, WebPatch};

/// Standard result type for sdeck APIs.
pub type Result<T, E> = sdeck_runtime::error::Result<T, E>;

/// Load `deck` into a fresh document and wrap it in a presentation.
///
/// The deck element becomes the container; its children are moved into the
/// canvas.
pub fn open<B: Backend>(
    deck: &NodeSpec,
    backend: B,
    config: DeckConfig,
) -> Result<Presentation<B>, B::Error> {
    let mut doc = Document::new();
    let root = doc.root();
    let container = doc.append_spec(root, deck)?;
    Presentation::with_config(backend, doc, container, config)
}

/// [`open`] with the default configuration on a web backend.
#[cfg(feature = "web")]
pub fn open_web(
    deck: &NodeSpec,
    backend: WebBackend,
) -> Result<Presentation<WebBackend>, sdeck_web::WebBackendError> {
    open(deck, backend, DeckConfig::default())
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        ActivationOutcome, Backend, DeckConfig, Document, Event, EventOutcome, KeyCode, KeyEvent,
        Mode, NodeId, NodeSpec, Presentation,
    };

    #[cfg(feature = "web")]
    pub use crate::WebBackend;

    pub use crate::{backend, core, dom, runtime};
}

pub use sdeck_backend as backend;
pub use sdeck_core as core;
pub use sdeck_dom as dom;
pub use sdeck_runtime as runtime;
#[cfg(feature = "web")]
pub use sdeck_web as web;

#[cfg(all(test, feature = "web"))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn open_rejects_text_container() {
        let err = open_web(&NodeSpec::text("just words"), WebBackend::new()).err();
        assert!(matches!(err, Some(Error::Dom(DomError::NotAnElement(_)))));
    }

    #[test]
    fn open_with_config_is_validated() {
        let config = DeckConfig {
            fragment_prefix: "/".to_owned(),
            ..DeckConfig::default()
        };
        let deck = NodeSpec::element("div").child(NodeSpec::element("section"));
        let err = open(&deck, WebBackend::new(), config).err();
        assert!(matches!(err, Some(Error::InvalidConfig(problems)) if problems.len() == 1));
    }

    #[test]
    fn prelude_drives_a_deck() {
        use crate::prelude::*;

        let spec = NodeSpec::element("div").children([
            NodeSpec::element("section"),
            NodeSpec::element("section").child(NodeSpec::element("section")),
        ]);
        let mut deck = crate::open_web(&spec, WebBackend::new()).expect("deck opens");
        deck.activate().expect("activates");
        deck.handle_event(&Event::Key(KeyEvent::new(KeyCode::Right)))
            .expect("routes");
        assert_eq!(deck.mode(), Mode::Presentation);
        assert_eq!(deck.steps().len(), 3);
        assert_eq!(deck.active_index(), Some(1));
    }
}
