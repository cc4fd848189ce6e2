//! Per-variant masks that turn cell coverage into alpha.
//!
//! Masks that anti-alias take the screen-space derivative width of their
//! distance function explicitly; [`mask`] derives it from the device pixel size
//! the same way the fragment shader's `fwidth` would.

use pixelconfig::Variant;

use crate::math::{smoothstep, step};

pub fn mask_square(coverage: f32) -> f32 {
    coverage
}

pub fn mask_circle(pixel_uv: [f32; 2], coverage: f32, fwidth: f32) -> f32 {
    let r = coverage.max(0.0).sqrt() * 0.25;
    let dx = pixel_uv[0] - 0.5;
    let dy = pixel_uv[1] - 0.5;
    let d = (dx * dx + dy * dy).sqrt() - r;
    let aa = (0.5 * fwidth).max(f32::EPSILON);
    coverage * (1.0 - smoothstep(-aa, aa, d * 2.0))
}

pub fn mask_triangle(pixel_uv: [f32; 2], pixel_id: [f32; 2], coverage: f32, fwidth: f32) -> f32 {
    let mut p = pixel_uv;
    if (pixel_id[0] + pixel_id[1]).rem_euclid(2.0) > 0.5 {
        p[0] = 1.0 - p[0];
    }
    let r = coverage.max(0.0).sqrt();
    let d = p[1] - r * (1.0 - p[0]);
    let aa = fwidth.max(f32::EPSILON);
    coverage * (0.5 - d / aa).clamp(0.0, 1.0)
}

/// Hard-edged L1 mask. Returns a bare 0/1 rather than scaling coverage.
pub fn mask_diamond(pixel_uv: [f32; 2], coverage: f32) -> f32 {
    let r = coverage.max(0.0).sqrt() * 0.564;
    step((pixel_uv[0] - 0.49).abs() + (pixel_uv[1] - 0.49).abs(), r)
}

/// Applies the mask for `variant` to one fine pixel.
///
/// `pixel_uv` is the position inside the pixel cell in `[0, 1)`, `pixel_id`
/// the integer cell index and `pixel_size` the cell size in device pixels.
pub fn mask(
    variant: Variant,
    pixel_uv: [f32; 2],
    pixel_id: [f32; 2],
    coverage: f32,
    pixel_size: f32,
) -> f32 {
    let inv = if pixel_size > 0.0 { 1.0 / pixel_size } else { 0.0 };
    match variant {
        Variant::Square => mask_square(coverage),
        Variant::Circle => {
            let dx = pixel_uv[0] - 0.5;
            let dy = pixel_uv[1] - 0.5;
            let len = (dx * dx + dy * dy).sqrt();
            let fwidth = if len > 0.0 {
                (dx.abs() + dy.abs()) / len * inv
            } else {
                inv
            };
            mask_circle(pixel_uv, coverage, fwidth)
        }
        Variant::Triangle => {
            let r = coverage.max(0.0).sqrt();
            mask_triangle(pixel_uv, pixel_id, coverage, (r + 1.0) * inv)
        }
        Variant::Diamond => mask_diamond(pixel_uv, coverage),
    }
}

/// Vignette factor for a position normalised to the surface.
pub fn edge_fade(norm: [f32; 2], edge_fade: f32) -> f32 {
    if edge_fade <= 0.0 {
        return 1.0;
    }
    let edge = norm[0].min(norm[1]).min(1.0 - norm[0]).min(1.0 - norm[1]);
    smoothstep(0.0, edge_fade, edge)
}
