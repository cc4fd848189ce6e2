use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{anyhow, bail, Context, Result};
use image::{ImageFormat, RgbaImage};
use pixelconfig::PixelBlastConfig;
use scheduler::{ContainerSize, Lifecycle, Phase, SurfaceMetrics, TickOutcome};
use tracing::info;

use crate::software::{SoftwareBackend, SoftwareSurface};
use crate::types::StillRequest;

/// Simulated frame interval while advancing towards the capture time.
const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Largest still edge in device pixels.
pub const MAX_STILL_DIMENSION: u32 = 16_384;

/// Renders one frame headless through the software backend.
///
/// Clicks land on the first frame; drag samples are fed one per frame after
/// that. The remaining time is covered in a single step so long captures stay
/// cheap.
pub fn render_still(config: &PixelBlastConfig, request: &StillRequest) -> Result<RgbaImage> {
    let container = ContainerSize::new(request.size.0 as f64, request.size.1 as f64);
    if let Some(metrics) = SurfaceMetrics::compute(container, request.scale_factor, config.pixel_size) {
        if metrics.width > MAX_STILL_DIMENSION || metrics.height > MAX_STILL_DIMENSION {
            bail!(
                "still {}x{} exceeds the {MAX_STILL_DIMENSION}px limit",
                metrics.width,
                metrics.height
            );
        }
    }
    let mut lifecycle = Lifecycle::with_seed(SoftwareBackend::new(), config.clone(), request.seed);
    lifecycle.resize(container, request.scale_factor);
    if lifecycle.poll_initialize() != Phase::Live {
        let reason = lifecycle
            .last_error()
            .map(|err| err.to_string())
            .unwrap_or_else(|| "container has no dimensions".to_string());
        bail!("cannot render still: {reason}");
    }

    let start = Instant::now();
    let mut now = start;
    lifecycle.tick(now);
    for &(x, y) in &request.clicks {
        lifecycle.pointer_down(x, y);
    }
    for &(x, y) in &request.drag {
        lifecycle.pointer_move(x, y);
        now += FRAME_INTERVAL;
        lifecycle.tick(now);
    }
    let target = Duration::try_from_secs_f32(request.time.max(0.0))
        .ok()
        .and_then(|elapsed| start.checked_add(elapsed))
        .ok_or_else(|| anyhow!("capture time {}s is out of range", request.time))?;
    if target > now {
        now = target;
    }
    if lifecycle.tick(now) != TickOutcome::Rendered {
        bail!("still frame was not rendered");
    }

    let image = lifecycle
        .surface()
        .and_then(SoftwareSurface::frame)
        .map(|frame| frame.to_image())
        .ok_or_else(|| anyhow!("software surface holds no frame"))?;
    lifecycle.teardown();
    info!(
        width = image.width(),
        height = image.height(),
        time = lifecycle.uniforms().time,
        "rendered still frame"
    );
    Ok(image)
}

pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixelconfig::Variant;

    fn request() -> StillRequest {
        StillRequest {
            size: (120, 80),
            scale_factor: 1.0,
            time: 0.5,
            clicks: Vec::new(),
            drag: Vec::new(),
            seed: 42,
        }
    }

    #[test]
    fn still_matches_the_device_size() {
        let request = StillRequest {
            scale_factor: 3.0,
            ..request()
        };
        let image = render_still(&PixelBlastConfig::default(), &request).expect("render");
        // ratio is capped at 2
        assert_eq!(image.dimensions(), (240, 160));
    }

    #[test]
    fn same_seed_gives_the_same_frame() {
        let config = PixelBlastConfig {
            variant: Variant::Circle,
            ..PixelBlastConfig::default()
        };
        let a = render_still(&config, &request()).expect("render");
        let b = render_still(&config, &request()).expect("render");
        assert_eq!(a, b);
    }

    /// Pixels with non-zero alpha inside the cell whose corner sits at the
    /// surface centre of a 120×80 frame (24 device px cells).
    fn lit_in_centre_cell(image: &RgbaImage) -> usize {
        (16..40)
            .flat_map(|y| (60..84).map(move |x| (x, y)))
            .filter(|&(x, y)| image.get_pixel(x, y)[3] > 0)
            .count()
    }

    #[test]
    fn clicks_light_up_the_cell_under_them() {
        let config = PixelBlastConfig {
            enable_ripples: true,
            ripple_intensity_scale: 2.0,
            pattern_density: 0.0,
            ..PixelBlastConfig::default()
        };
        let plain = render_still(&config, &StillRequest { time: 0.1, ..request() }).expect("render");
        // half a cell right of and above the centre: the ripple origin lands
        // on the corner of the centre cell
        let clicked = render_still(
            &config,
            &StillRequest {
                time: 0.1,
                clicks: vec![(72.0, 28.0)],
                ..request()
            },
        )
        .expect("render");
        assert_ne!(plain, clicked);
        assert_eq!(lit_in_centre_cell(&clicked), 24 * 24);
        assert!(lit_in_centre_cell(&plain) < 24 * 24);
    }

    #[test]
    fn unrepresentable_capture_times_are_rejected() {
        for time in [f32::INFINITY, 1e30] {
            let request = StillRequest { time, ..request() };
            let err = render_still(&PixelBlastConfig::default(), &request).unwrap_err();
            assert!(err.to_string().contains("out of range"), "{err}");
        }
        let negative = StillRequest { time: -5.0, ..request() };
        assert!(render_still(&PixelBlastConfig::default(), &negative).is_ok());
    }

    #[test]
    fn oversized_stills_fail_before_allocating() {
        let request = StillRequest {
            size: (70_000, 70_000),
            ..request()
        };
        let err = render_still(&PixelBlastConfig::default(), &request).unwrap_err();
        assert!(err.to_string().contains("limit"), "{err}");

        // the framebuffer index math stays in usize
        let wide = crate::software::Framebuffer::new(70_000, 1);
        assert_eq!(wide.pixel(69_999, 0), [0.0; 4]);
    }

    #[test]
    fn empty_container_is_an_error() {
        let request = StillRequest {
            size: (0, 80),
            ..request()
        };
        assert!(render_still(&PixelBlastConfig::default(), &request).is_err());
    }

    #[test]
    fn png_is_written_to_nested_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("stills").join("frame.png");
        let image = RgbaImage::from_pixel(4, 2, image::Rgba([220, 20, 60, 255]));
        save_png(&image, &path).expect("save");
        let loaded = image::open(&path).expect("reopen").to_rgba8();
        assert_eq!(loaded, image);
    }
}
