use pattern::{TrailRaster, TRAIL_TEXTURE_SIZE};
use winit::dpi::PhysicalSize;

use crate::compose::{PassChain, PassKind};

use super::pipeline::{post_uniform_size, PipelineLayouts, PostPipeline};
use super::uniforms::PostUniforms;

/// Single-sample colour texture the base pass and intermediate post passes
/// render into.
pub(crate) struct OffscreenTarget {
    _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
}

impl OffscreenTarget {
    fn new(device: &wgpu::Device, format: wgpu::TextureFormat, size: PhysicalSize<u32>) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen color target"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

struct TrailTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl TrailTexture {
    fn new(device: &wgpu::Device) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("touch trail"),
            size: trail_extent(),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    fn upload(&self, queue: &wgpu::Queue, raster: &TrailRaster) {
        let size = raster.size();
        if size != TRAIL_TEXTURE_SIZE {
            tracing::warn!(size, "touch trail raster has an unexpected size; skipping upload");
            return;
        }
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &raster.to_rgba8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size),
                rows_per_image: Some(size),
            },
            trail_extent(),
        );
    }
}

fn trail_extent() -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: TRAIL_TEXTURE_SIZE,
        height: TRAIL_TEXTURE_SIZE,
        depth_or_array_layers: 1,
    }
}

struct PostStage {
    pipeline: PostPipeline,
    bind_group: wgpu::BindGroup,
    /// Index of the offscreen target read by this stage.
    source: usize,
    render_to_screen: bool,
}

/// Offscreen chain used when any post pass is active.
///
/// The base pass renders into target 0; each post stage reads one target and
/// writes the other, except the terminal stage which writes the swapchain.
pub(crate) struct Composer {
    targets: [OffscreenTarget; 2],
    stages: Vec<PostStage>,
    sampler: wgpu::Sampler,
    post_buffer: wgpu::Buffer,
    trail: Option<TrailTexture>,
    format: wgpu::TextureFormat,
}

impl Composer {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        chain: &PassChain,
        format: wgpu::TextureFormat,
        size: PhysicalSize<u32>,
    ) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("post sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let post_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("post uniforms"),
            size: post_uniform_size(),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let trail = chain
            .post_passes()
            .iter()
            .any(|pass| pass.kind == PassKind::Liquid)
            .then(|| TrailTexture::new(device));
        let targets = [
            OffscreenTarget::new(device, format, size),
            OffscreenTarget::new(device, format, size),
        ];

        let mut composer = Self {
            targets,
            stages: Vec::new(),
            sampler,
            post_buffer,
            trail,
            format,
        };
        let stages = chain
            .post_passes()
            .iter()
            .enumerate()
            .map(|(index, pass)| {
                let pipeline = PostPipeline::new(device, layouts, pass.kind, format);
                let source = index % 2;
                let bind_group = composer.bind_group(device, &pipeline, source);
                PostStage {
                    pipeline,
                    bind_group,
                    source,
                    render_to_screen: pass.render_to_screen,
                }
            })
            .collect();
        composer.stages = stages;
        composer
    }

    /// View the base pass renders into.
    pub fn base_target(&self) -> &wgpu::TextureView {
        &self.targets[0].view
    }

    /// Reallocates both targets and rebinds every stage.
    pub fn resize(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.targets = [
            OffscreenTarget::new(device, self.format, size),
            OffscreenTarget::new(device, self.format, size),
        ];
        let rebound: Vec<wgpu::BindGroup> = self
            .stages
            .iter()
            .map(|stage| self.bind_group(device, &stage.pipeline, stage.source))
            .collect();
        for (stage, bind_group) in self.stages.iter_mut().zip(rebound) {
            stage.bind_group = bind_group;
        }
    }

    pub fn prepare(&self, queue: &wgpu::Queue, uniforms: &PostUniforms, trail: Option<&TrailRaster>) {
        queue.write_buffer(&self.post_buffer, 0, bytemuck::bytes_of(uniforms));
        if let (Some(texture), Some(raster)) = (self.trail.as_ref(), trail) {
            texture.upload(queue, raster);
        }
    }

    /// Encodes every post stage after the base pass has been recorded.
    pub fn encode(&self, encoder: &mut wgpu::CommandEncoder, screen: &wgpu::TextureView) {
        for stage in &self.stages {
            let target = if stage.render_to_screen {
                screen
            } else {
                &self.targets[1 - stage.source].view
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("post pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&stage.pipeline.pipeline);
            render_pass.set_bind_group(0, &stage.bind_group, &[]);
            render_pass.draw(0..3, 0..1);
        }
    }

    fn bind_group(&self, device: &wgpu::Device, pipeline: &PostPipeline, source: usize) -> wgpu::BindGroup {
        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: self.post_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&self.targets[source].view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            },
        ];
        if pipeline.kind == PassKind::Liquid {
            if let Some(trail) = self.trail.as_ref() {
                entries.push(wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::TextureView(&trail.view),
                });
                entries.push(wgpu::BindGroupEntry {
                    binding: 4,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                });
            }
        }
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("post bind group"),
            layout: &pipeline.layout,
            entries: &entries,
        })
    }
}
