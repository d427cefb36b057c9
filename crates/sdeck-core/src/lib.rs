#![forbid(unsafe_code)]

//! Core: node handles, canonical input events, transform geometry, and
//! surface capability detection.
//!
//! # Role in sdeck
//! `sdeck-core` is the leaf of the workspace. It owns the vocabulary shared by
//! every other crate: [`node::NodeId`] handles into the document arena, the
//! [`event::Event`] values a host pushes into the engine, the
//! [`geometry::Transform3d`] triple and its transform-expression formatter, and
//! the [`capabilities::SurfaceCapabilities`] gate.
//!
//! # How it fits in the system
//! The document model (`sdeck-dom`) indexes nodes with [`node::NodeId`]; the
//! runtime (`sdeck-runtime`) consumes events and produces transforms; hosts
//! (`sdeck-web`) translate platform input into [`event::Event`].

pub mod capabilities;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod node;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, info, info_span, trace, warn};
