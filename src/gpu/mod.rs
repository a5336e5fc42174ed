//! GPU resource management utilities.
//!
//! Device/surface initialization, growable instance buffers, render
//! targets, the glyph atlas texture and shader composition.

/// Growable typed GPU buffers.
pub mod dynamic_buffer;
/// Glyph atlas texture and bind group.
pub mod font_atlas;
/// Shared wgpu boilerplate helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// WGSL shader composition with `#import` support via naga-oil.
pub mod shader_composer;
/// Size-dependent render targets.
pub mod texture;
