//! Ordered dithering with a recursively built Bayer matrix.

use crate::math::{fract, step};

pub fn bayer2(a: [f32; 2]) -> f32 {
    let x = a[0].floor();
    let y = a[1].floor();
    fract(x / 2.0 + y * y * 0.75)
}

pub fn bayer4(a: [f32; 2]) -> f32 {
    bayer2([a[0] * 0.5, a[1] * 0.5]) * 0.25 + bayer2(a)
}

/// Threshold in `[0, 1)`; an aligned 8x8 block holds every multiple of 1/64 once.
pub fn bayer8(a: [f32; 2]) -> f32 {
    bayer4([a[0] * 0.5, a[1] * 0.5]) * 0.25 + bayer2(a)
}

/// Binary coverage for one fine pixel. `pixel_coord` is in pixel units
/// (fragment position divided by the device pixel size).
pub fn threshold(feed: f32, pixel_coord: [f32; 2]) -> f32 {
    step(0.5, feed + bayer8(pixel_coord) - 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_levels(origin: [f32; 2]) -> Vec<u32> {
        let mut levels = Vec::with_capacity(64);
        for y in 0..8 {
            for x in 0..8 {
                let value = bayer8([origin[0] + x as f32, origin[1] + y as f32]);
                levels.push((value * 64.0).round() as u32);
            }
        }
        levels.sort_unstable();
        levels
    }

    #[test]
    fn bayer8_is_a_permutation_of_64_levels() {
        let expected: Vec<u32> = (0..64).collect();
        assert_eq!(block_levels([0.0, 0.0]), expected);
        // centred fragment coordinates reach negative cells
        assert_eq!(block_levels([-16.0, -8.0]), expected);
    }

    #[test]
    fn bayer_ignores_subpixel_offsets() {
        assert_eq!(bayer8([3.0, 5.0]), bayer8([3.9, 5.4]));
    }

    #[test]
    fn threshold_tracks_feed() {
        let coord = [2.0, 7.0];
        assert_eq!(threshold(-1.0, coord), 0.0);
        assert_eq!(threshold(1.0, coord), 1.0);
    }
}
