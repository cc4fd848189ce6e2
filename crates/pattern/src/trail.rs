//! Pointer-motion trail painted into the small raster the liquid pass samples.

use std::f32::consts::FRAC_PI_2;

use crate::math::{fract, mix};

pub const TRAIL_TEXTURE_SIZE: u32 = 64;
/// Particles are dropped once their age passes this many ticks.
pub const TRAIL_MAX_AGE: u32 = 64;

const ATTACK_FRACTION: f32 = 0.3;
const BASE_RADIUS: f32 = 0.1;
const BLOB_ALPHA: f32 = 0.22;
const FORCE_SCALE: f32 = 10_000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Normalised, bottom-left origin.
    pub position: [f32; 2],
    /// Unit direction of travel, or zero for the first sample.
    pub velocity: [f32; 2],
    pub force: f32,
    pub age: u32,
}

impl Particle {
    pub fn intensity(&self) -> f32 {
        envelope(self.age as f32) * self.force
    }
}

/// Attack/release curve over a particle's life: ease-out-sine up to the peak
/// at 30% of [`TRAIL_MAX_AGE`], ease-out-quad back down afterwards.
pub fn envelope(age: f32) -> f32 {
    let max_age = TRAIL_MAX_AGE as f32;
    let attack = max_age * ATTACK_FRACTION;
    if age < attack {
        (age / attack * FRAC_PI_2).sin()
    } else {
        let t = 1.0 - (age - attack) / (max_age - attack);
        let value = t * (2.0 - t);
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

/// Square RGBA raster, stored as linear floats until upload.
#[derive(Debug, Clone)]
pub struct TrailRaster {
    size: u32,
    pixels: Vec<[f32; 3]>,
}

impl TrailRaster {
    pub fn new(size: u32) -> Self {
        Self {
            size,
            pixels: vec![[0.0; 3]; (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn clear(&mut self) {
        self.pixels.iter_mut().for_each(|px| *px = [0.0; 3]);
    }

    /// Texel at column `x`, row `y` (row 0 is the top).
    pub fn texel(&self, x: u32, y: u32) -> [f32; 3] {
        self.pixels[(y * self.size + x) as usize]
    }

    /// Composites a soft disc source-over. `centre` and `radius` are in texels.
    pub fn paint_blob(&mut self, centre: [f32; 2], radius: f32, color: [f32; 3], alpha: f32) {
        if alpha <= 0.0 || radius <= 0.0 {
            return;
        }
        let sigma = radius * 0.5;
        let reach = radius + sigma * 3.0;
        let x0 = (centre[0] - reach).floor().max(0.0) as u32;
        let y0 = (centre[1] - reach).floor().max(0.0) as u32;
        let x1 = ((centre[0] + reach).ceil().max(0.0) as u32).min(self.size);
        let y1 = ((centre[1] + reach).ceil().max(0.0) as u32).min(self.size);
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - centre[0];
                let dy = y as f32 + 0.5 - centre[1];
                let dist = (dx * dx + dy * dy).sqrt();
                let weight = if dist <= radius {
                    1.0
                } else {
                    let skirt = (dist - radius) / sigma;
                    (-0.5 * skirt * skirt).exp()
                };
                let a = (alpha * weight).clamp(0.0, 1.0);
                let px = &mut self.pixels[(y * self.size + x) as usize];
                for channel in 0..3 {
                    px[channel] = mix(px[channel], color[channel], a);
                }
            }
        }
    }

    /// Bilinear, clamp-to-edge sample at `uv` (bottom-left origin), matching the
    /// GPU sampler bound to the liquid pass.
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 3] {
        let size = self.size as f32;
        let fx = (uv[0] * size - 0.5).clamp(0.0, size - 1.0);
        let fy = ((1.0 - uv[1]) * size - 0.5).clamp(0.0, size - 1.0);
        let x0 = fx.floor() as u32;
        let y0 = fy.floor() as u32;
        let x1 = (x0 + 1).min(self.size - 1);
        let y1 = (y0 + 1).min(self.size - 1);
        let tx = fract(fx);
        let ty = fract(fy);
        let mut out = [0.0; 3];
        for (channel, value) in out.iter_mut().enumerate() {
            let top = mix(self.texel(x0, y0)[channel], self.texel(x1, y0)[channel], tx);
            let bottom = mix(self.texel(x0, y1)[channel], self.texel(x1, y1)[channel], tx);
            *value = mix(top, bottom, ty);
        }
        out
    }

    /// Opaque RGBA8 texels, row 0 first, ready for a texture upload.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let byte = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.pixels
            .iter()
            .flat_map(|px| [byte(px[0]), byte(px[1]), byte(px[2]), 255])
            .collect()
    }
}

/// Ageing list of pointer samples and the raster they are painted into.
#[derive(Debug, Clone)]
pub struct TouchTrail {
    particles: Vec<Particle>,
    last: Option<[f32; 2]>,
    radius_scale: f32,
    raster: TrailRaster,
}

impl TouchTrail {
    pub fn new(radius_scale: f32) -> Self {
        Self {
            particles: Vec::new(),
            last: None,
            radius_scale,
            raster: TrailRaster::new(TRAIL_TEXTURE_SIZE),
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn raster(&self) -> &TrailRaster {
        &self.raster
    }

    pub fn radius_scale(&self) -> f32 {
        self.radius_scale
    }

    pub fn set_radius_scale(&mut self, scale: f32) {
        self.radius_scale = scale;
    }

    /// Blob radius in texels.
    pub fn radius(&self) -> f32 {
        BASE_RADIUS * TRAIL_TEXTURE_SIZE as f32 * self.radius_scale
    }

    /// Records a pointer sample at a normalised, bottom-left-origin position.
    pub fn add_sample(&mut self, norm: [f32; 2]) {
        let (velocity, force) = match self.last {
            None => ([0.0, 0.0], 0.0),
            Some(last) => {
                let dx = norm[0] - last[0];
                let dy = norm[1] - last[1];
                if dx == 0.0 && dy == 0.0 {
                    return;
                }
                let dd = dx * dx + dy * dy;
                let d = dd.sqrt();
                ([dx / d, dy / d], (dd * FORCE_SCALE).min(1.0))
            }
        };
        self.last = Some(norm);
        self.particles.push(Particle {
            position: norm,
            velocity,
            force,
            age: 0,
        });
    }

    /// Advances every particle one tick and repaints the raster.
    pub fn update(&mut self) {
        self.raster.clear();
        let max_age = TRAIL_MAX_AGE as f32;
        for particle in &mut self.particles {
            let f = particle.force * (1.0 / max_age) * (1.0 - particle.age as f32 / max_age);
            particle.position[0] += particle.velocity[0] * f;
            particle.position[1] += particle.velocity[1] * f;
            particle.age += 1;
        }
        self.particles.retain(|particle| particle.age <= TRAIL_MAX_AGE);

        let size = TRAIL_TEXTURE_SIZE as f32;
        let radius = self.radius();
        for particle in &self.particles {
            let intensity = particle.intensity();
            let centre = [particle.position[0] * size, (1.0 - particle.position[1]) * size];
            let color = [
                (particle.velocity[0] + 1.0) * 0.5,
                (particle.velocity[1] + 1.0) * 0.5,
                intensity,
            ];
            self.raster.paint_blob(centre, radius, color, BLOB_ALPHA * intensity);
        }
    }
}

/// UV displacement applied by the liquid pass for one texel of the trail.
pub fn liquid_offset(texel: [f32; 3], time: f32, strength: f32, freq: f32) -> [f32; 2] {
    let vx = texel[0] * 2.0 - 1.0;
    let vy = texel[1] * 2.0 - 1.0;
    let intensity = texel[2];
    let wave = 0.5 + 0.5 * (time * freq + intensity * std::f32::consts::TAU).sin();
    let amount = strength * intensity * wave;
    [vx * amount, vy * amount]
}
