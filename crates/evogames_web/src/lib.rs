//! Browser front end for the dilemma demo.
//!
//! This crate is a stub by default so the workspace builds on native targets
//! without a wasm toolchain. The layout math and control model in
//! [`ui_model`] and [`layout`] are plain Rust and tested on the host.
//!
//! Enable the real app with: `--features web` (and a wasm32 target).

pub mod layout;
pub mod ui_model;

/// Placeholder function for non-web (or non-wasm) builds.
#[cfg(not(all(feature = "web", target_arch = "wasm32")))]
pub fn placeholder() {
    // No-op.
}

#[cfg(all(feature = "web", target_arch = "wasm32"))]
mod web;

#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub use web::start;
