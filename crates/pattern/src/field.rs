//! Whole-fragment evaluation: noise feed, ripples, dither, jitter, mask, fade.

use pixelconfig::Variant;

use crate::dither::threshold;
use crate::math::fract;
use crate::noise::{cell_uv, feed, jitter_scale};
use crate::ripple::{ClickRing, RippleParams};
use crate::shape::{edge_fade, mask};

/// Inputs shared by every fragment of one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldParams {
    /// Device pixels.
    pub resolution: [f32; 2],
    /// Cell size in device pixels.
    pub pixel_size: f32,
    pub time: f32,
    pub scale: f32,
    pub density: f32,
    pub jitter: f32,
    pub variant: Variant,
    pub edge_fade: f32,
    pub ripple: RippleParams,
}

impl FieldParams {
    /// Alpha of the base pass at `frag` (window coordinates, bottom-left
    /// origin, pixel centres on half-integers).
    pub fn alpha(&self, clicks: &ClickRing, frag: [f32; 2]) -> f32 {
        let centred = [
            frag[0] - self.resolution[0] * 0.5,
            frag[1] - self.resolution[1] * 0.5,
        ];
        let ps = self.pixel_size;
        let scaled = [centred[0] / ps, centred[1] / ps];
        let pixel_id = [scaled[0].floor(), scaled[1].floor()];
        let pixel_uv = [fract(scaled[0]), fract(scaled[1])];

        let uv = cell_uv(centred, self.resolution, ps);
        let mut value = feed(uv, self.time, self.scale, self.density);
        value = self
            .ripple
            .apply(value, uv, clicks, self.time, self.resolution, ps);

        let coverage = threshold(value, scaled) * jitter_scale(pixel_id, self.jitter);
        let mut alpha = mask(self.variant, pixel_uv, pixel_id, coverage, ps);
        if self.edge_fade > 0.0 {
            let norm = [frag[0] / self.resolution[0], frag[1] / self.resolution[1]];
            alpha *= edge_fade(norm, self.edge_fade);
        }
        alpha
    }
}
