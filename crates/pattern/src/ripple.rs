//! Click ripples: a fixed ring of click events and the travelling-ring math.

use pixelconfig::PixelBlastConfig;

use crate::math::distance2;
use crate::noise::CELL_SCALE;

pub const MAX_CLICKS: usize = 10;
/// Uploaded in place of a click position for slots that were never written.
pub const INACTIVE_POSITION: [f32; 2] = [-1.0, -1.0];

const DAMP_TIME: f32 = 1.0;
const DAMP_RADIUS: f32 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Click {
    /// Device pixels, bottom-left origin.
    pub position: [f32; 2],
    /// Uniform time at which the click landed.
    pub time: f32,
}

/// Fixed-capacity click history. Each push overwrites the oldest slot once full.
#[derive(Debug, Clone, Default)]
pub struct ClickRing {
    slots: [Option<Click>; MAX_CLICKS],
    cursor: usize,
}

impl ClickRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, click: Click) {
        self.slots[self.cursor] = Some(click);
        self.cursor = (self.cursor + 1) % MAX_CLICKS;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub const fn capacity(&self) -> usize {
        MAX_CLICKS
    }

    /// Raw slots in storage order.
    pub fn slots(&self) -> &[Option<Click>; MAX_CLICKS] {
        &self.slots
    }

    /// Written clicks, oldest first.
    pub fn events(&self) -> impl Iterator<Item = &Click> + '_ {
        (0..MAX_CLICKS).filter_map(move |offset| self.slots[(self.cursor + offset) % MAX_CLICKS].as_ref())
    }

    /// `(x, y, time, active)` per slot as laid out in the uniform block.
    pub fn packed(&self) -> [[f32; 4]; MAX_CLICKS] {
        let mut out = [[INACTIVE_POSITION[0], INACTIVE_POSITION[1], 0.0, 0.0]; MAX_CLICKS];
        for (dst, slot) in out.iter_mut().zip(self.slots.iter()) {
            if let Some(click) = slot {
                *dst = [click.position[0], click.position[1], click.time, 1.0];
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleParams {
    pub enabled: bool,
    pub speed: f32,
    pub thickness: f32,
    pub intensity: f32,
}

impl RippleParams {
    pub fn from_config(config: &PixelBlastConfig) -> Self {
        Self {
            enabled: config.enable_ripples,
            speed: config.ripple_speed,
            thickness: config.ripple_thickness,
            intensity: config.ripple_intensity_scale,
        }
    }

    /// Contribution of a single click at pattern distance `r` after `elapsed`.
    pub fn contribution(&self, r: f32, elapsed: f32) -> f32 {
        ring_profile(r, elapsed, self.speed, self.thickness) * attenuation(r, elapsed) * self.intensity
    }

    /// Brightens `feed` with every active click; rings never darken the field.
    pub fn apply(
        &self,
        feed: f32,
        uv: [f32; 2],
        clicks: &ClickRing,
        time: f32,
        resolution: [f32; 2],
        pixel_size: f32,
    ) -> f32 {
        if !self.enabled {
            return feed;
        }
        clicks.events().fold(feed, |acc, click| {
            let origin = click_uv(click.position, resolution, pixel_size);
            let elapsed = (time - click.time).max(0.0);
            acc.max(self.contribution(distance2(uv, origin), elapsed))
        })
    }
}

/// Maps a click in device pixels into the pattern space sampled by the noise field.
pub fn click_uv(position: [f32; 2], resolution: [f32; 2], pixel_size: f32) -> [f32; 2] {
    let half_cell = CELL_SCALE * pixel_size * 0.5;
    let aspect = resolution[0] / resolution[1];
    [
        (position[0] - resolution[0] * 0.5 - half_cell) / resolution[0] * aspect,
        (position[1] - resolution[1] * 0.5 - half_cell) / resolution[1],
    ]
}

/// Gaussian ring centred on the wavefront `speed * elapsed`.
pub fn ring_profile(r: f32, elapsed: f32, speed: f32, thickness: f32) -> f32 {
    let offset = (r - speed * elapsed) / thickness;
    (-offset * offset).exp()
}

pub fn attenuation(r: f32, elapsed: f32) -> f32 {
    (-DAMP_TIME * elapsed).exp() * (-DAMP_RADIUS * r).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelconfig::Variant;

    fn click(time: f32) -> Click {
        Click {
            position: [time * 10.0, 5.0],
            time,
        }
    }

    #[test]
    fn eleventh_click_overwrites_the_first() {
        let mut ring = ClickRing::new();
        for n in 1..=11 {
            ring.push(click(n as f32));
            assert!(ring.len() <= ring.capacity());
        }
        let times: Vec<f32> = ring.events().map(|c| c.time).collect();
        let expected: Vec<f32> = (2..=11).map(|n| n as f32).collect();
        assert_eq!(times, expected);
        assert_eq!(ring.len(), MAX_CLICKS);
    }

    #[test]
    fn unwritten_slots_pack_as_sentinels() {
        let mut ring = ClickRing::new();
        ring.push(click(0.5));
        let packed = ring.packed();
        assert_eq!(packed[0], [5.0, 5.0, 0.5, 1.0]);
        for slot in &packed[1..] {
            assert_eq!(slot[..2], INACTIVE_POSITION);
            assert_eq!(slot[3], 0.0);
        }
        ring.clear();
        assert!(ring.is_empty());
    }

    #[test]
    fn ring_peaks_at_speed_times_elapsed() {
        let config = PixelBlastConfig {
            variant: Variant::Circle,
            pixel_size: 4.0,
            pattern_density: 1.3,
            enable_ripples: true,
            ripple_speed: 0.4,
            ..PixelBlastConfig::default()
        };
        let params = RippleParams::from_config(&config);

        let resolution = [800.0, 600.0];
        let origin = click_uv([400.0, 300.0], resolution, config.pixel_size);
        assert!(origin[0].abs() < 0.05 && origin[1].abs() < 0.05);

        let elapsed = 0.1;
        let (peak_r, _) = (0..=200)
            .map(|step| step as f32 * 0.001)
            .map(|r| (r, ring_profile(r, elapsed, params.speed, params.thickness)))
            .fold((0.0, f32::MIN), |best, cur| if cur.1 > best.1 { cur } else { best });
        assert!((peak_r - 0.04).abs() < 1e-3, "peak at {peak_r}");
    }

    #[test]
    fn ripples_only_brighten() {
        let params = RippleParams::from_config(&PixelBlastConfig::default());
        let mut ring = ClickRing::new();
        ring.push(Click {
            position: [200.0, 100.0],
            time: 1.0,
        });
        let resolution = [400.0, 200.0];
        let origin = click_uv([200.0, 100.0], resolution, 3.0);
        let lit = params.apply(-0.5, origin, &ring, 1.0, resolution, 3.0);
        assert!(lit > 0.5);
        assert_eq!(params.apply(2.0, origin, &ring, 1.0, resolution, 3.0), 2.0);

        let disabled = RippleParams {
            enabled: false,
            ..params
        };
        assert_eq!(disabled.apply(-0.5, origin, &ring, 1.0, resolution, 3.0), -0.5);
    }

    #[test]
    fn clicks_fade_with_time_and_distance() {
        assert!(attenuation(0.0, 2.0) < attenuation(0.0, 1.0));
        assert!(attenuation(0.2, 0.0) < attenuation(0.1, 0.0));
    }
}
