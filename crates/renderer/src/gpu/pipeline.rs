use crate::compile::{
    base_fragment_source, compile_fragment_shader, compile_vertex_shader, liquid_fragment_source,
    noise_fragment_source,
};
use crate::compose::PassKind;

use super::uniforms::{PixelUniforms, PostUniforms};

/// Shared pieces every pipeline is built from.
pub(crate) struct PipelineLayouts {
    pub vertex_module: wgpu::ShaderModule,
    pub uniform_layout: wgpu::BindGroupLayout,
}

impl PipelineLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pattern uniform layout"),
            entries: &[uniform_entry(0)],
        });
        Self {
            vertex_module: compile_vertex_shader(device),
            uniform_layout,
        }
    }
}

/// The pattern pass: pipeline plus its uniform buffer.
pub(crate) struct BasePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl BasePipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let fragment_module =
            compile_fragment_shader(device, "pattern fragment", base_fragment_source());
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pattern uniforms"),
            size: std::mem::size_of::<PixelUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pattern bind group"),
            layout: &layouts.uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pattern pipeline layout"),
            bind_group_layouts: &[&layouts.uniform_layout],
            push_constant_ranges: &[],
        });
        let pipeline = fullscreen_pipeline(
            device,
            "pattern pipeline",
            &pipeline_layout,
            &layouts.vertex_module,
            &fragment_module,
            format,
            sample_count,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        Self {
            pipeline,
            uniform_buffer,
            bind_group,
        }
    }
}

/// Pipeline for one post pass. Bind groups are built per frame target by the
/// compositor since they reference its offscreen views.
pub(crate) struct PostPipeline {
    pub kind: PassKind,
    pub pipeline: wgpu::RenderPipeline,
    pub layout: wgpu::BindGroupLayout,
}

impl PostPipeline {
    pub fn new(
        device: &wgpu::Device,
        layouts: &PipelineLayouts,
        kind: PassKind,
        format: wgpu::TextureFormat,
    ) -> Self {
        let (label, source) = match kind {
            PassKind::Liquid => ("liquid fragment", liquid_fragment_source()),
            // the compositor only builds post passes
            PassKind::Noise | PassKind::Base => ("noise fragment", noise_fragment_source()),
        };
        let fragment_module = compile_fragment_shader(device, label, source);
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post layout"),
            entries: &post_layout_entries(kind == PassKind::Liquid),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("post pipeline layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });
        let pipeline = fullscreen_pipeline(
            device,
            label,
            &pipeline_layout,
            &layouts.vertex_module,
            &fragment_module,
            format,
            1,
            None,
        );
        Self {
            kind,
            pipeline,
            layout,
        }
    }
}

pub(crate) fn post_uniform_size() -> u64 {
    std::mem::size_of::<PostUniforms>() as u64
}

fn uniform_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn post_layout_entries(with_trail: bool) -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = vec![uniform_entry(0)];
    let textures = if with_trail { 2 } else { 1 };
    for index in 0..textures {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 1 + index * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: 2 + index * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    entries
}

#[allow(clippy::too_many_arguments)]
fn fullscreen_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    sample_count: u32,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some("main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState {
            count: sample_count,
            ..Default::default()
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some("main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}
