use pattern::{FieldParams, RippleParams};
use pixelconfig::{PixelBlastConfig, Variant};

use crate::metrics::SurfaceMetrics;

/// CPU-side mirror of everything the shaders read each frame.
///
/// Written only by [`Lifecycle`](crate::Lifecycle); surfaces read it through a
/// [`Frame`](crate::Frame).
#[derive(Debug, Clone, PartialEq)]
pub struct UniformState {
    pub resolution: [f32; 2],
    pub pixel_ratio: f32,
    /// Device pixels.
    pub pixel_size: f32,
    pub time: f32,
    pub color: [f32; 3],
    pub variant: Variant,
    pub pattern_scale: f32,
    pub pattern_density: f32,
    pub pixel_jitter: f32,
    pub ripple: RippleParams,
    pub edge_fade: f32,
    pub liquid_strength: f32,
    pub liquid_wobble_speed: f32,
    pub noise_amount: f32,
    pub transparent: bool,
}

impl UniformState {
    /// Uniforms for `config` before any surface metrics are known.
    pub fn from_config(config: &PixelBlastConfig, time: f32) -> Self {
        let mut state = Self {
            resolution: [0.0, 0.0],
            pixel_ratio: 1.0,
            pixel_size: config.pixel_size,
            time,
            color: config.color.to_array(),
            variant: config.variant,
            pattern_scale: config.pattern_scale,
            pattern_density: config.pattern_density,
            pixel_jitter: config.pixel_size_jitter,
            ripple: RippleParams::from_config(config),
            edge_fade: config.edge_fade,
            liquid_strength: config.liquid_strength,
            liquid_wobble_speed: config.liquid_wobble_speed,
            noise_amount: config.noise_amount,
            transparent: config.transparent,
        };
        state.apply_dynamic(config);
        state
    }

    /// Resolution and device pixel size, updated together.
    pub fn apply_metrics(&mut self, metrics: &SurfaceMetrics) {
        self.resolution = metrics.resolution();
        self.pixel_ratio = metrics.ratio as f32;
        self.pixel_size = metrics.pixel_size;
    }

    /// Copies every dynamic key from `config`; structural keys are ignored.
    pub fn apply_dynamic(&mut self, config: &PixelBlastConfig) {
        self.pixel_size = config.pixel_size * self.pixel_ratio;
        self.color = config.color.to_array();
        self.variant = config.variant;
        self.pattern_scale = config.pattern_scale;
        self.pattern_density = config.pattern_density;
        self.pixel_jitter = config.pixel_size_jitter;
        self.ripple = RippleParams::from_config(config);
        self.edge_fade = config.edge_fade;
        self.liquid_strength = config.liquid_strength;
        self.liquid_wobble_speed = config.liquid_wobble_speed;
        self.noise_amount = config.noise_amount;
        self.transparent = config.transparent;
    }

    pub fn field_params(&self) -> FieldParams {
        FieldParams {
            resolution: self.resolution,
            pixel_size: self.pixel_size,
            time: self.time,
            scale: self.pattern_scale,
            density: self.pattern_density,
            jitter: self.pixel_jitter,
            variant: self.variant,
            edge_fade: self.edge_fade,
            ripple: self.ripple,
        }
    }
}
