//! wgpu implementation of the scheduler's render backend.
//!
//! - `context` owns instance/device/surface wiring and reconfigures the
//!   swapchain on resize.
//! - `pipeline` compiles the GLSL passes into render pipelines.
//! - `composer` owns the offscreen targets and post passes.
//! - `uniforms` mirrors the std140 blocks the shaders read.
//! - `state` glues everything together behind `WgpuBackend`.

mod composer;
mod context;
mod pipeline;
mod state;
mod uniforms;

pub use state::{WgpuBackend, WgpuSurface};
