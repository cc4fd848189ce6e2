/// Device pixel ratios above this are clamped to bound fill cost.
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

/// Logical (device-independent) size of the hosting container.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Render-target size and pixel size in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub width: u32,
    pub height: u32,
    pub ratio: f64,
    /// Configured pixel size scaled by `ratio`.
    pub pixel_size: f32,
}

pub fn effective_ratio(device_pixel_ratio: f64) -> f64 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(MAX_DEVICE_PIXEL_RATIO)
    } else {
        1.0
    }
}

impl SurfaceMetrics {
    /// `None` while the container has no area.
    pub fn compute(container: ContainerSize, device_pixel_ratio: f64, pixel_size: f32) -> Option<Self> {
        if container.is_empty() {
            return None;
        }
        let ratio = effective_ratio(device_pixel_ratio);
        let width = (container.width * ratio).floor() as u32;
        let height = (container.height * ratio).floor() as u32;
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self {
            width,
            height,
            ratio,
            pixel_size: pixel_size * ratio as f32,
        })
    }

    pub fn resolution(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }

    /// Converts a container position (logical, top-left origin) into device
    /// pixels with a bottom-left origin.
    pub fn to_device(&self, container: ContainerSize, x: f64, y: f64) -> [f32; 2] {
        let scale_x = self.width as f64 / container.width;
        let scale_y = self.height as f64 / container.height;
        [(x * scale_x) as f32, ((container.height - y) * scale_y) as f32]
    }
}
