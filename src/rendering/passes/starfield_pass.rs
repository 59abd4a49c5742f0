use std::{mem::offset_of, sync::Arc};

use wgpu::{util::DeviceExt, Device, MultisampleState, PipelineCompilationOptions, ShaderSource};

use crate::{
    rendering::{
        render_common::RenderCommon,
        shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
    },
    scene_host::starfield::{Star, Starfield},
};

const STARFIELD_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Starfield",
    path: "starfield.wgsl",
};

/// Colour behind the stars, and behind the page.
pub const BACKGROUND: wgpu::Color = wgpu::Color::BLACK;

const STAR_VBL: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Star>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Star, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Star, size) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Star, color) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Star, phase) as wgpu::BufferAddress,
            shader_location: 3,
            format: wgpu::VertexFormat::Float32,
        },
    ],
};

const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::SrcAlpha,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

/// Clears the frame and draws every star as a camera-facing quad.
pub struct StarfieldPass {
    pipeline_id: PipelineId,
    common: Arc<RenderCommon>,
    instances: wgpu::Buffer,
    instance_count: u32,
}

impl StarfieldPass {
    pub fn create(
        device: &Device,
        common: Arc<RenderCommon>,
        cache_builder: &mut PipelineCacheBuilder,
        starfield: &Starfield,
    ) -> anyhow::Result<Self> {
        let instances = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Star instance buffer"),
            contents: bytemuck::cast_slice(&starfield.stars),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Starfield pipeline layout"),
            bind_group_layouts: &[&common.global_uniform.bind_group_layout],
            push_constant_ranges: &[],
        });

        let output_format = common.output_format;
        let pipeline_id = cache_builder.add_shader(
            STARFIELD_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Starfield pipeline"),
                        layout: Some(&pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[STAR_VBL],
                            compilation_options: PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: output_format,
                                blend: Some(ADDITIVE),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::TriangleList,
                            cull_mode: None,
                            ..Default::default()
                        },
                        depth_stencil: None,
                        multisample: MultisampleState::default(),
                        multiview: None,
                        cache: None,
                    });

                    Ok(pipeline)
                },
            ),
        );

        Ok(Self {
            pipeline_id,
            common,
            instances,
            instance_count: starfield.stars.len() as u32,
        })
    }

    pub fn render(
        &self,
        color: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Starfield Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(pipeline) = pipeline_cache.get(self.pipeline_id) else {
            return;
        };
        if self.instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.common.global_uniform.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.instances.slice(..));
        render_pass.draw(0..6, 0..self.instance_count);
    }
}
