//! Frame scheduling for a single PixelBlast surface.
//!
//! [`Lifecycle`] owns the current configuration, the uniform mirror, the click
//! ring and the touch trail, and drives a [`RenderBackend`] through
//! initialisation, patching, rebuilds and teardown.

pub mod backend;
pub mod lifecycle;
pub mod metrics;
pub mod uniforms;

pub use backend::{BackendError, Frame, FrameError, RenderBackend, RenderSurface};
pub use lifecycle::{ConfigOutcome, InitError, Lifecycle, Phase, TickOutcome, MAX_INIT_ATTEMPTS};
pub use metrics::{ContainerSize, SurfaceMetrics, MAX_DEVICE_PIXEL_RATIO};
pub use uniforms::UniformState;
