use crate::math::{dot2, fract, mix};

pub const FBM_OCTAVES: usize = 5;
pub const FBM_LACUNARITY: f32 = 1.25;
/// Octaves are summed at full amplitude, which saturates the field.
pub const FBM_GAIN: f32 = 1.0;
/// Noise is sampled once per `CELL_SCALE x CELL_SCALE` block of pixels.
pub const CELL_SCALE: f32 = 8.0;
/// Pattern time advances at this fraction of uniform time.
pub const TIME_SCALE: f32 = 0.05;

const LATTICE_STRIDE: [f32; 3] = [1.0, 57.0, 113.0];

pub fn hash11(n: f32) -> f32 {
    fract(n.sin() * 43758.5453)
}

fn lattice(ip: [f32; 3], dx: f32, dy: f32, dz: f32) -> f32 {
    hash11(
        (ip[0] + dx) * LATTICE_STRIDE[0]
            + (ip[1] + dy) * LATTICE_STRIDE[1]
            + (ip[2] + dz) * LATTICE_STRIDE[2],
    )
}

fn quintic(f: f32) -> f32 {
    f * f * f * (f * (f * 6.0 - 15.0) + 10.0)
}

/// 3-D value noise in `[-1, 1]`.
pub fn value_noise(p: [f32; 3]) -> f32 {
    let ip = [p[0].floor(), p[1].floor(), p[2].floor()];
    let fp = [p[0] - ip[0], p[1] - ip[1], p[2] - ip[2]];
    let w = [quintic(fp[0]), quintic(fp[1]), quintic(fp[2])];

    let x00 = mix(lattice(ip, 0.0, 0.0, 0.0), lattice(ip, 1.0, 0.0, 0.0), w[0]);
    let x10 = mix(lattice(ip, 0.0, 1.0, 0.0), lattice(ip, 1.0, 1.0, 0.0), w[0]);
    let x01 = mix(lattice(ip, 0.0, 0.0, 1.0), lattice(ip, 1.0, 0.0, 1.0), w[0]);
    let x11 = mix(lattice(ip, 0.0, 1.0, 1.0), lattice(ip, 1.0, 1.0, 1.0), w[0]);
    let y0 = mix(x00, x10, w[1]);
    let y1 = mix(x01, x11, w[1]);
    mix(y0, y1, w[2]) * 2.0 - 1.0
}

pub fn fbm(uv: [f32; 2], t: f32, scale: f32) -> f32 {
    let p = [uv[0] * scale, uv[1] * scale, t];
    let mut amp = 1.0;
    let mut freq = 1.0;
    let mut sum = 1.0;
    for _ in 0..FBM_OCTAVES {
        sum += amp * value_noise([p[0] * freq, p[1] * freq, p[2] * freq]);
        freq *= FBM_LACUNARITY;
        amp *= FBM_GAIN;
    }
    sum * 0.5 + 0.5
}

/// Aspect-corrected pattern coordinate of the cell containing `frag`.
///
/// `frag` is centred on the surface (origin in the middle, y up).
pub fn cell_uv(frag: [f32; 2], resolution: [f32; 2], pixel_size: f32) -> [f32; 2] {
    let cell = CELL_SCALE * pixel_size;
    let aspect = resolution[0] / resolution[1];
    let coord = [(frag[0] / cell).floor() * cell, (frag[1] / cell).floor() * cell];
    [
        coord[0] / resolution[0] * aspect,
        coord[1] / resolution[1],
    ]
}

/// Density-biased coverage before ripples and dithering.
pub fn feed(uv: [f32; 2], time: f32, scale: f32, density: f32) -> f32 {
    let base = fbm(uv, time * TIME_SCALE, scale) * 0.5 - 0.65;
    base + (density - 0.5) * 0.3
}

/// Per-pixel brightness hash used for jitter.
pub fn pixel_hash(pixel_id: [f32; 2]) -> f32 {
    fract(dot2(pixel_id, [127.1, 311.7]).sin() * 43758.5453)
}

pub fn jitter_scale(pixel_id: [f32; 2], jitter: f32) -> f32 {
    1.0 + (pixel_hash(pixel_id) - 0.5) * jitter
}
