use bytemuck::{Pod, Zeroable};
use pattern::MAX_CLICKS;
use scheduler::{Frame, UniformState};

/// std140 mirror of the `PixelParams` block in the pattern shader.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct PixelUniforms {
    /// rgb colour, uniform time.
    pub color_time: [f32; 4],
    /// Resolution, pixel size, pattern scale.
    pub resolution_pixel: [f32; 4],
    /// Density, jitter, edge fade, shape index.
    pub pattern: [f32; 4],
    /// Speed, thickness, intensity, enabled flag.
    pub ripple: [f32; 4],
    pub clicks: [[f32; 4]; MAX_CLICKS],
}

unsafe impl Zeroable for PixelUniforms {}
unsafe impl Pod for PixelUniforms {}

impl PixelUniforms {
    pub fn from_frame(frame: &Frame<'_>) -> Self {
        let u = frame.uniforms;
        Self {
            color_time: [u.color[0], u.color[1], u.color[2], u.time],
            resolution_pixel: [u.resolution[0], u.resolution[1], u.pixel_size, u.pattern_scale],
            pattern: [
                u.pattern_density,
                u.pixel_jitter,
                u.edge_fade,
                u.variant.shader_index() as f32,
            ],
            ripple: [
                u.ripple.speed,
                u.ripple.thickness,
                u.ripple.intensity,
                if u.ripple.enabled { 1.0 } else { 0.0 },
            ],
            clicks: frame.clicks.packed(),
        }
    }
}

/// std140 mirror of the `PostParams` block shared by the post passes.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct PostUniforms {
    /// Time, liquid strength, wobble frequency, grain amount.
    pub params: [f32; 4],
}

unsafe impl Zeroable for PostUniforms {}
unsafe impl Pod for PostUniforms {}

impl PostUniforms {
    pub fn from_state(u: &UniformState) -> Self {
        Self {
            params: [u.time, u.liquid_strength, u.liquid_wobble_speed, u.noise_amount],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pattern::{Click, ClickRing};
    use pixelconfig::{PixelBlastConfig, Variant};

    #[test]
    fn layouts_match_std140_blocks() {
        assert_eq!(std::mem::size_of::<PixelUniforms>(), 16 * (4 + MAX_CLICKS));
        assert_eq!(std::mem::size_of::<PostUniforms>(), 16);
    }

    #[test]
    fn frame_is_packed_into_vec4_slots() {
        let config = PixelBlastConfig {
            variant: Variant::Triangle,
            enable_ripples: false,
            ..PixelBlastConfig::default()
        };
        let mut state = UniformState::from_config(&config, 3.5);
        state.resolution = [640.0, 480.0];
        let mut clicks = ClickRing::new();
        clicks.push(Click {
            position: [10.0, 20.0],
            time: 3.0,
        });
        let frame = Frame {
            uniforms: &state,
            clicks: &clicks,
            trail: None,
        };
        let packed = PixelUniforms::from_frame(&frame);
        assert_eq!(packed.color_time[3], 3.5);
        assert_eq!(packed.resolution_pixel[..2], [640.0, 480.0]);
        assert_eq!(packed.pattern[3], Variant::Triangle.shader_index() as f32);
        assert_eq!(packed.ripple[3], 0.0);
        assert_eq!(packed.clicks[0], [10.0, 20.0, 3.0, 1.0]);
        assert_eq!(packed.clicks[1][3], 0.0);

        let bytes = bytemuck::bytes_of(&packed);
        assert_eq!(bytes.len(), std::mem::size_of::<PixelUniforms>());
    }
}
