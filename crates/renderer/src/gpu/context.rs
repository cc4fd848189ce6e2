use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use wgpu::{CompositeAlphaMode, PresentMode, TextureFormat, TextureFormatFeatureFlags};
use winit::dpi::PhysicalSize;
use winit::window::Window;

/// Highest MSAA sample count requested when antialiasing is on.
const MAX_SAMPLES: u32 = 4;

/// Device, queue and configured swapchain for one window.
pub(crate) struct GpuContext {
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub sample_count: u32,
    pub surface_format: TextureFormat,
}

impl GpuContext {
    pub(crate) fn new(window: Arc<Window>, size: PhysicalSize<u32>, antialias: bool) -> Result<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window)
            .context("failed to create rendering surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no GPU adapter can present to this window")?;
        let info = adapter.get_info();
        let limits = adapter.limits();
        tracing::debug!(
            name = %info.name,
            backend = ?info.backend,
            device_type = ?info.device_type,
            "selected GPU adapter"
        );

        let (width, height) = (size.width.max(1), size.height.max(1));
        let max = limits.max_texture_dimension_2d;
        if width > max || height > max {
            bail!("surface {width}x{height} exceeds the adapter limit of {max}");
        }

        let caps = surface.get_capabilities(&adapter);
        let surface_format = pick_format(&caps.formats)?;
        let sample_count = if !antialias {
            1
        } else if info.device_type == wgpu::DeviceType::Cpu {
            tracing::warn!("software adapter; rendering without MSAA");
            1
        } else {
            let count = pick_sample_count(adapter.get_texture_format_features(surface_format).flags);
            if count == 1 {
                tracing::warn!(?surface_format, "MSAA unsupported for this surface format");
            }
            count
        };

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("pixelblast device"),
            required_features: wgpu::Features::empty(),
            required_limits: limits,
            memory_hints: wgpu::MemoryHints::MemoryUsage,
            trace: wgpu::Trace::default(),
        }))
        .context("failed to create GPU device")?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width,
            height,
            present_mode: prefer(&caps.present_modes, PresentMode::Fifo),
            alpha_mode: prefer(&caps.alpha_modes, CompositeAlphaMode::PreMultiplied),
            view_formats: Vec::new(),
            desired_maximum_frame_latency: 2,
        };
        tracing::debug!(
            format = ?config.format,
            present_mode = ?config.present_mode,
            alpha_mode = ?config.alpha_mode,
            sample_count,
            "configuring surface"
        );
        surface.configure(&device, &config);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            sample_count,
            surface_format,
        })
    }

    pub(crate) fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.config.width = size.width;
        self.config.height = size.height;
        self.surface.configure(&self.device, &self.config);
    }

    /// Re-applies the current configuration after the swapchain went stale.
    pub(crate) fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }
}

/// The shaders write display-ready values, so a linear (non-sRGB) format is
/// preferred.
fn pick_format(formats: &[TextureFormat]) -> Result<TextureFormat> {
    let format = formats
        .iter()
        .copied()
        .find(|format| !format.is_srgb())
        .or_else(|| formats.first().copied())
        .ok_or_else(|| anyhow!("surface reports no supported formats"))?;
    if format.is_srgb() {
        tracing::warn!(?format, "only sRGB surface formats available; colours will shift");
    }
    Ok(format)
}

/// Largest supported count up to [`MAX_SAMPLES`]; 1 without resolve support.
fn pick_sample_count(flags: TextureFormatFeatureFlags) -> u32 {
    if !flags.contains(TextureFormatFeatureFlags::MULTISAMPLE_RESOLVE) {
        return 1;
    }
    flags
        .supported_sample_counts()
        .into_iter()
        .filter(|&count| count <= MAX_SAMPLES)
        .max()
        .unwrap_or(1)
}

fn prefer<T: Copy + PartialEq>(available: &[T], wanted: T) -> T {
    if available.contains(&wanted) {
        wanted
    } else {
        available.first().copied().unwrap_or(wanted)
    }
}
