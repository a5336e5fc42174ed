//! Scene transform management.
//!
//! A fixed look-at camera, a projection sized to the loaded molecule, and
//! the accumulated user rotation/zoom, combined into the cached
//! `final_transform` every pass reads.

/// Cached transform set driven by rotate/scale/resize.
pub mod controller;
/// Camera and the per-frame GPU uniform.
pub mod core;
/// Perspective/orthographic projection with portrait handling.
pub mod projection;
/// Accumulated scene rotation and scale.
pub mod transform;
