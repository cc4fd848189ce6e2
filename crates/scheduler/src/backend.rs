use pattern::{ClickRing, TrailRaster};
use pixelconfig::PixelBlastConfig;

use crate::metrics::SurfaceMetrics;
use crate::uniforms::UniformState;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("no usable graphics adapter: {0}")]
    Adapter(String),
    #[error("failed to create render surface: {0}")]
    Surface(String),
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The device or swapchain is gone; the surface must be rebuilt.
    #[error("render context lost")]
    Lost,
    #[error("frame skipped: {0}")]
    Skipped(String),
}

/// Everything a surface reads to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub uniforms: &'a UniformState,
    pub clicks: &'a ClickRing,
    /// Present only while the liquid pass is live.
    pub trail: Option<&'a TrailRaster>,
}

/// GPU objects for one structural configuration.
pub trait RenderSurface {
    /// Resizes every render target at once.
    fn resize(&mut self, metrics: &SurfaceMetrics);

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), FrameError>;

    /// Releases passes, pipelines and the swapchain.
    fn release(self)
    where
        Self: Sized;
}

pub trait RenderBackend {
    type Surface: RenderSurface;

    /// Builds a surface whose pass chain and sample count follow the structural
    /// keys of `config`.
    fn create_surface(
        &mut self,
        config: &PixelBlastConfig,
        metrics: &SurfaceMetrics,
    ) -> Result<Self::Surface, BackendError>;

    /// Stops delivering input and resize notifications. Called once, after the
    /// last surface has been released.
    fn detach(&mut self) {}
}
