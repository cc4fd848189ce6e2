//! CPU rendition of the pass chain.
//!
//! Runs the same field, liquid and grain math as the shaders so frames can be
//! rendered headless: still exports and tests use it in place of the GPU.

use image::{Rgba, RgbaImage};
use pattern::math::{fract, mix};
use pattern::noise::pixel_hash;
use pattern::trail::liquid_offset;
use pattern::TrailRaster;
use pixelconfig::PixelBlastConfig;
use scheduler::{
    BackendError, Frame, FrameError, RenderBackend, RenderSurface, SurfaceMetrics, UniformState,
};
use tracing::debug;

use crate::compose::{PassChain, PassKind};

/// Grid the grain hash is quantised to, independent of the surface size.
const GRAIN_GRID: [f32; 2] = [1920.0, 1080.0];
const GRAIN_RATE: f32 = 60.0;

/// Linear RGBA framebuffer, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 4]; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> [f32; 4] {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Bottom-left uv of the centre of pixel `(x, y)`.
    fn uv(&self, x: u32, y: u32) -> [f32; 2] {
        [
            (x as f32 + 0.5) / self.width as f32,
            (self.height as f32 - y as f32 - 0.5) / self.height as f32,
        ]
    }

    /// Bilinear, clamp-to-edge lookup at a bottom-left uv.
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let w = self.width as f32;
        let h = self.height as f32;
        let fx = (uv[0] * w - 0.5).clamp(0.0, w - 1.0);
        let fy = ((1.0 - uv[1]) * h - 0.5).clamp(0.0, h - 1.0);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = fract(fx);
        let ty = fract(fy);
        let mut out = [0.0; 4];
        for (channel, value) in out.iter_mut().enumerate() {
            let top = mix(self.pixel(x0, y0)[channel], self.pixel(x1, y0)[channel], tx);
            let bottom = mix(self.pixel(x0, y1)[channel], self.pixel(x1, y1)[channel], tx);
            *value = mix(top, bottom, ty);
        }
        out
    }

    fn map(&self, mut f: impl FnMut(u32, u32) -> [f32; 4]) -> Self {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for y in 0..self.height {
            for x in 0..self.width {
                pixels.push(f(x, y));
            }
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Straight-alpha RGBA8 image. The blend leaves colour premultiplied on a
    /// transparent clear, so it is divided back out here.
    pub fn to_image(&self) -> RgbaImage {
        let byte = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let [r, g, b, a] = self.pixel(x, y);
            let unpremultiply = |c: f32| if a > 0.0 && a < 1.0 { c / a } else { c };
            Rgba([
                byte(unpremultiply(r)),
                byte(unpremultiply(g)),
                byte(unpremultiply(b)),
                byte(a),
            ])
        })
    }
}

/// Base pass: the pattern colour blended source-over onto the clear colour.
pub fn render_base(frame: &Frame<'_>, width: u32, height: u32) -> Framebuffer {
    let uniforms = frame.uniforms;
    let params = uniforms.field_params();
    let clear_alpha = if uniforms.transparent { 0.0 } else { 1.0 };
    let color = uniforms.color;
    Framebuffer::new(width, height).map(|x, y| {
        let frag = [x as f32 + 0.5, height as f32 - y as f32 - 0.5];
        let m = params.alpha(frame.clicks, frag).clamp(0.0, 1.0);
        [
            color[0] * m,
            color[1] * m,
            color[2] * m,
            m + clear_alpha * (1.0 - m),
        ]
    })
}

/// Displaces lookups into `source` by the trail's encoded velocity.
pub fn apply_liquid(source: &Framebuffer, trail: &TrailRaster, uniforms: &UniformState) -> Framebuffer {
    source.map(|x, y| {
        let uv = source.uv(x, y);
        let offset = liquid_offset(
            trail.sample(uv),
            uniforms.time,
            uniforms.liquid_strength,
            uniforms.liquid_wobble_speed,
        );
        source.sample([uv[0] + offset[0], uv[1] + offset[1]])
    })
}

/// Adds signed film grain to the colour channels, leaving alpha alone.
pub fn apply_grain(source: &Framebuffer, time: f32, amount: f32) -> Framebuffer {
    let frame_seed = (time * GRAIN_RATE).floor();
    source.map(|x, y| {
        let uv = source.uv(x, y);
        let cell = [
            (uv[0] * GRAIN_GRID[0]).floor() + frame_seed,
            (uv[1] * GRAIN_GRID[1]).floor() + frame_seed,
        ];
        let g = (pixel_hash(cell) - 0.5) * amount;
        let [r, gr, b, a] = source.pixel(x, y);
        [r + g, gr + g, b + g, a]
    })
}

/// Headless surface holding the most recent frame.
#[derive(Debug)]
pub struct SoftwareSurface {
    chain: PassChain,
    width: u32,
    height: u32,
    frame: Option<Framebuffer>,
    frames_rendered: u64,
}

impl SoftwareSurface {
    pub fn chain(&self) -> &PassChain {
        &self.chain
    }

    pub fn frame(&self) -> Option<&Framebuffer> {
        self.frame.as_ref()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl RenderSurface for SoftwareSurface {
    fn resize(&mut self, metrics: &SurfaceMetrics) {
        self.width = metrics.width;
        self.height = metrics.height;
        self.frame = None;
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), FrameError> {
        let uniforms = frame.uniforms;
        let mut buffer = render_base(frame, self.width, self.height);
        for pass in self.chain.post_passes() {
            buffer = match pass.kind {
                PassKind::Liquid => match frame.trail {
                    Some(trail) => apply_liquid(&buffer, trail, uniforms),
                    None => buffer,
                },
                PassKind::Noise => apply_grain(&buffer, uniforms.time, uniforms.noise_amount),
                PassKind::Base => buffer,
            };
        }
        self.frame = Some(buffer);
        self.frames_rendered += 1;
        Ok(())
    }

    fn release(self) {
        debug!(frames = self.frames_rendered, "releasing software surface");
    }
}

/// Backend producing [`SoftwareSurface`]s.
#[derive(Debug, Default)]
pub struct SoftwareBackend {
    surfaces_created: u32,
    detached: bool,
}

impl SoftwareBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn surfaces_created(&self) -> u32 {
        self.surfaces_created
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

impl RenderBackend for SoftwareBackend {
    type Surface = SoftwareSurface;

    fn create_surface(
        &mut self,
        config: &PixelBlastConfig,
        metrics: &SurfaceMetrics,
    ) -> Result<SoftwareSurface, BackendError> {
        self.surfaces_created += 1;
        Ok(SoftwareSurface {
            chain: PassChain::for_key(&config.structural_key()),
            width: metrics.width,
            height: metrics.height,
            frame: None,
            frames_rendered: 0,
        })
    }

    fn detach(&mut self) {
        self.detached = true;
    }
}
