//! CPU mirror of the PixelBlast fragment pipeline plus the input state that
//! feeds it.
//!
//! The fragment shader in `renderer` and the functions here implement the same
//! math; the CPU side backs the software surface, still exports, and tests.
//! - `noise` builds the fractal value-noise `feed` for a pattern cell.
//! - `dither` holds the recursive Bayer threshold.
//! - `shape` turns coverage into per-pixel alpha for each [`Variant`].
//! - `ripple` owns the click ring buffer and the travelling-ring profile.
//! - `trail` ages pointer-motion particles and paints the liquid source raster.
//! - `field` chains all of the above into the alpha of one fragment.
//!
//! [`Variant`]: pixelconfig::Variant

pub mod dither;
pub mod field;
pub mod math;
pub mod noise;
pub mod ripple;
pub mod shape;
pub mod trail;

pub use field::FieldParams;
pub use ripple::{Click, ClickRing, RippleParams, MAX_CLICKS};
pub use trail::{Particle, TouchTrail, TrailRaster, TRAIL_MAX_AGE, TRAIL_TEXTURE_SIZE};
