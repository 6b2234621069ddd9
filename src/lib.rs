// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![warn(unused_qualifications)]
// Cast hygiene
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]

//! Orbit viewer for a single glTF model, built on wgpu.
//!
//! A model is loaded in the background (a worker thread natively, a fetch
//! task in the browser), fitted into view, and drawn with one directional
//! light plus ambient over a transparent background. The camera orbits the
//! model; the user drags to rotate, scrolls to zoom, and toggles idle
//! auto-rotation ("panning") with a key or a page button.
//!
//! # Key entry points
//!
//! - `Viewer` - the windowed application (behind the `viewer` feature)
//! - [`controller::InteractionController`] - panning and drag state that
//!   drives any [`camera::CameraControl`]
//! - [`frame_loop::FrameLoop`] - the self-scheduling per-frame loop
//! - [`options::Options`] - camera, lighting and display configuration
//! - [`loader`] - glTF loading with progress reporting
//!
//! # Architecture
//!
//! Window events are normalized into [`input::InputEvent`]s, translated to
//! [`command::ViewerCommand`]s and applied to the interaction controller.
//! Every frame the controller ticks, the camera uniform is uploaded and the
//! [`renderer::ModelRenderer`] draws the model. The controller only talks to
//! the camera through [`camera::CameraControl`], so it is tested without a
//! GPU or a window.

pub mod camera;
/// Commands applied to the interaction controller.
pub mod command;
/// Panning toggle and drag-rotation state.
pub mod controller;
/// Crate-level error type.
pub mod error;
/// Self-scheduling per-frame loop.
pub mod frame_loop;
pub mod gpu;
pub mod input;
pub mod loader;
/// CPU-side model geometry.
pub mod model;
pub mod options;
pub mod renderer;
/// Drawable-area size tracking.
pub mod viewport;

/// Windowed viewer application.
#[cfg(all(
    feature = "viewer",
    any(feature = "web", not(target_arch = "wasm32"))
))]
pub mod viewer;

/// Browser entry point.
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use command::ViewerCommand;
pub use controller::InteractionController;
pub use error::ViewerError;
pub use frame_loop::{FrameLoop, FrameScheduler};
pub use options::{ModelPreset, Options};
#[cfg(all(
    feature = "viewer",
    any(feature = "web", not(target_arch = "wasm32"))
))]
pub use viewer::{Viewer, ViewerBuilder};
