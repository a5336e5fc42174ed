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
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! GPU molecule renderer built on wgpu.
//!
//! Molvis draws a small molecule as ray-cast sphere and cylinder impostors
//! with per-fragment depth, blends translucent geometry with weighted
//! blended order-independent transparency, and resolves the atom under any
//! pixel through an identity-color picking target.
//!
//! # Key entry points
//!
//! - [`MolvisEngine`] - owns the device, pipelines and the loaded molecule
//! - [`AtomicCoordinates`] - the input: parallel atomic number and x/y/z
//!   arrays, plus optional explicit bonds
//! - [`Options`] - lighting, camera, display and geometry settings with
//!   TOML presets
//! - [`InputProcessor`] - turns raw window events into [`MolvisCommand`]s
//!
//! # Frame structure
//!
//! Each frame draws opaque impostors (and labels) into the color and depth
//! targets, accumulates translucent geometry into the WBOIT targets,
//! composites them over the opaque image, and re-renders the picking
//! target only when a readback needs it.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod scene;
/// Standalone winit viewer.
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::command::MolvisCommand;
pub use engine::{MolvisEngine, PickEvent};
pub use error::{DataError, MolvisError};
pub use input::{InputEvent, InputProcessor, MouseButton};
pub use options::Options;
pub use scene::{AtomInfo, AtomicCoordinates, ElementTable, FontAtlas, GlyphInfo};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
