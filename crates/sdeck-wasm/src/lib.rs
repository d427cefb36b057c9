#![forbid(unsafe_code)]

//! WASM runner for sdeck presentations.
//!
//! This crate provides `DeckRunner`, a `wasm-bindgen`-exported struct that
//! wraps `sdeck_runtime::Presentation<sdeck_web::WebBackend>` and exposes it
//! to JavaScript for host-driven execution: the page pushes encoded input,
//! advances time, applies the returned patches, and pushes history entries
//! for written fragments.

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::DeckRunner;

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;
