#![forbid(unsafe_code)]

//! sdeck Runtime
//!
//! Turns a document of nested `section` elements into a zoomable 3-D
//! presentation and drives it from host input.
//!
//! # Key Components
//!
//! - [`Presentation`] - Owns the document and backend; mode, selection, input
//! - [`depth`] - Section outline and depth resolution
//! - [`plan`] / [`builder`] - Step layout (read pass) and step wrappers (mutation pass)
//! - [`NavigationIndex`] - Ordered steps with cyclic next/previous
//! - [`camera`] - Camera state and two-phase transition planning
//! - [`input`] - Key bindings, activation targets, fragment parsing
//! - [`DeferredAction`] - Debounced single-slot action for fragment writes
//! - [`DeckConfig`] - Tunable grid, perspective, and timing parameters
//!
//! # How it fits in the system
//! `sdeck-core` supplies events and geometry, `sdeck-dom` the document
//! model, and `sdeck-backend` the host traits. This crate sits between them:
//! hosts such as `sdeck-web` feed it [`sdeck_core::event::Event`]s and
//! receive document changes to mirror.

pub mod builder;
pub mod camera;
pub mod config;
pub mod deferred;
pub mod depth;
pub mod error;
pub mod input;
pub mod navigation;
pub mod plan;
pub mod presentation;

pub use builder::{STEP_CLASS, Step, build_steps, teardown_steps};
pub use camera::{CameraState, TransitionPlan, plan_transition};
#[cfg(feature = "config")]
pub use config::ConfigError;
pub use config::DeckConfig;
pub use deferred::DeferredAction;
pub use depth::{SectionInfo, SectionOutline};
pub use error::Error;
pub use input::{KeyAction, action_for_key, step_id_from_fragment};
pub use navigation::NavigationIndex;
pub use plan::{GridPosition, StepPlan, TransformHints, grid_positions};
pub use presentation::{
    ACTIVE_CLASS, ActivationOutcome, CANVAS_CLASS, EventOutcome, Mode, PRESENTATION_CLASS,
    Presentation, UNSUPPORTED_CLASS,
};
