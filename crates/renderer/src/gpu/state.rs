use std::sync::Arc;

use pixelconfig::PixelBlastConfig;
use scheduler::{BackendError, Frame, FrameError, RenderBackend, RenderSurface, SurfaceMetrics};
use tracing::{debug, warn};
use winit::dpi::PhysicalSize;
use winit::window::Window;

use crate::compose::PassChain;

use super::composer::Composer;
use super::context::GpuContext;
use super::pipeline::{BasePipeline, PipelineLayouts};
use super::uniforms::{PixelUniforms, PostUniforms};

struct MultisampleTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl MultisampleTarget {
    fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
        sample_count: u32,
    ) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa color target"),
            size: extent,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Swapchain, pipelines and targets for one structural configuration.
pub struct WgpuSurface {
    context: GpuContext,
    base: BasePipeline,
    composer: Option<Composer>,
    multisample_target: Option<MultisampleTarget>,
    chain: PassChain,
}

impl WgpuSurface {
    fn new(window: Arc<Window>, config: &PixelBlastConfig, metrics: &SurfaceMetrics) -> anyhow::Result<Self> {
        let size = PhysicalSize::new(metrics.width, metrics.height);
        let context = GpuContext::new(window, size, config.antialias)?;
        let chain = PassChain::for_key(&config.structural_key());
        let layouts = PipelineLayouts::new(&context.device);
        let base = BasePipeline::new(
            &context.device,
            &layouts,
            context.surface_format,
            context.sample_count,
        );
        let composer = chain.needs_compositor().then(|| {
            Composer::new(&context.device, &layouts, &chain, context.surface_format, size)
        });
        let multisample_target = (context.sample_count > 1).then(|| {
            MultisampleTarget::new(
                &context.device,
                context.surface_format,
                size,
                context.sample_count,
            )
        });
        debug!(
            passes = chain.passes().len(),
            sample_count = context.sample_count,
            width = size.width,
            height = size.height,
            "render surface ready"
        );
        Ok(Self {
            context,
            base,
            composer,
            multisample_target,
            chain,
        })
    }

    pub fn chain(&self) -> &PassChain {
        &self.chain
    }

    pub fn sample_count(&self) -> u32 {
        self.context.sample_count
    }

    fn encode_base(&self, encoder: &mut wgpu::CommandEncoder, view: &wgpu::TextureView, clear: wgpu::Color) {
        let (attachment_view, resolve_target) = match self.multisample_target.as_ref() {
            Some(msaa) => (&msaa.view, Some(view)),
            None => (view, None),
        };
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pattern pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: attachment_view,
                depth_slice: None,
                resolve_target,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.base.pipeline);
        render_pass.set_bind_group(0, &self.base.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

impl RenderSurface for WgpuSurface {
    fn resize(&mut self, metrics: &SurfaceMetrics) {
        let size = PhysicalSize::new(metrics.width, metrics.height);
        self.context.resize(size);
        if self.multisample_target.is_some() {
            self.multisample_target = Some(MultisampleTarget::new(
                &self.context.device,
                self.context.surface_format,
                size,
                self.context.sample_count,
            ));
        }
        if let Some(composer) = self.composer.as_mut() {
            composer.resize(&self.context.device, size);
        }
    }

    fn render(&mut self, frame: &Frame<'_>) -> Result<(), FrameError> {
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) => return Err(FrameError::Lost),
            Err(wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(FrameError::Skipped("swapchain outdated".into()));
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                warn!("GPU out of memory while acquiring a frame");
                return Err(FrameError::Lost);
            }
            Err(err) => return Err(FrameError::Skipped(err.to_string())),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let queue = &self.context.queue;
        queue.write_buffer(
            &self.base.uniform_buffer,
            0,
            bytemuck::bytes_of(&PixelUniforms::from_frame(frame)),
        );

        let clear = if frame.uniforms.transparent {
            wgpu::Color::TRANSPARENT
        } else {
            wgpu::Color::BLACK
        };
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("pixelblast encoder"),
            });
        match self.composer.as_ref() {
            Some(composer) => {
                composer.prepare(queue, &PostUniforms::from_state(frame.uniforms), frame.trail);
                self.encode_base(&mut encoder, composer.base_target(), clear);
                composer.encode(&mut encoder, &view);
            }
            None => self.encode_base(&mut encoder, &view, clear),
        }

        queue.submit(Some(encoder.finish()));
        output.present();
        Ok(())
    }

    fn release(self) {
        debug!(passes = self.chain.passes().len(), "releasing render surface");
        drop(self);
    }
}

/// Creates GPU surfaces on a winit window.
pub struct WgpuBackend {
    window: Arc<Window>,
    attached: bool,
}

impl WgpuBackend {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            attached: true,
        }
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// False once the lifecycle has torn down; the event loop stops forwarding
    /// input after that.
    pub fn is_attached(&self) -> bool {
        self.attached
    }
}

impl RenderBackend for WgpuBackend {
    type Surface = WgpuSurface;

    fn create_surface(
        &mut self,
        config: &PixelBlastConfig,
        metrics: &SurfaceMetrics,
    ) -> Result<WgpuSurface, BackendError> {
        WgpuSurface::new(Arc::clone(&self.window), config, metrics)
            .map_err(|err| BackendError::Surface(format!("{err:#}")))
    }

    fn detach(&mut self) {
        self.attached = false;
        debug!("window input detached");
    }
}
