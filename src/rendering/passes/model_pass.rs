use std::{collections::HashMap, sync::Arc};

use wgpu::{
    DepthBiasState, Device, MultisampleState, PipelineCompilationOptions, ShaderSource,
    StencilState,
};

use crate::{
    model::MODEL_VERTEX_LAYOUT,
    rendering::{
        render_common::RenderCommon,
        render_model::{ModelBindings, ObjectUniform, RenderModel, RenderObject},
        shader_loader::{PipelineCache, PipelineCacheBuilder, PipelineId, ShaderDefinition},
        texture::{DepthTexture, Texture},
    },
    scene_graph::{scene_model::SceneModelId, ObjectId},
    scene_host::SceneHost,
};

const MODEL_SHADER: ShaderDefinition = ShaderDefinition {
    name: "Model",
    path: "model.wgsl",
};

pub struct ModelTextureViews<'a> {
    pub color: &'a wgpu::TextureView,
    pub depth: &'a wgpu::TextureView,
}

struct Draw {
    object: ObjectId,
    model: SceneModelId,
}

/// Lit, optionally skinned meshes of the scene.
pub struct ModelPass {
    pipeline_id: PipelineId,
    common: Arc<RenderCommon>,
    bindings: ModelBindings,
    textures: Vec<Option<Texture>>,
    render_models: HashMap<SceneModelId, RenderModel>,
    render_objects: HashMap<ObjectId, RenderObject>,
    draws: Vec<Draw>,
}

impl ModelPass {
    pub fn create(
        device: &Device,
        queue: &wgpu::Queue,
        common: Arc<RenderCommon>,
        cache_builder: &mut PipelineCacheBuilder,
    ) -> anyhow::Result<Self> {
        let bindings = ModelBindings::new(device, queue);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Model pipeline layout"),
            bind_group_layouts: &[
                &common.global_uniform.bind_group_layout,
                &bindings.object_layout,
                &bindings.material_layout,
            ],
            push_constant_ranges: &[],
        });

        let output_format = common.output_format;
        let pipeline_id = cache_builder.add_shader(
            MODEL_SHADER,
            Box::new(
                move |device: &Device, shader_def: &ShaderDefinition, source: &str| {
                    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                        label: Some(shader_def.name),
                        source: ShaderSource::Wgsl(source.into()),
                    });

                    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                        label: Some("Model pipeline"),
                        layout: Some(&pipeline_layout),
                        vertex: wgpu::VertexState {
                            module: &shader,
                            entry_point: Some("vs_main"),
                            buffers: &[MODEL_VERTEX_LAYOUT],
                            compilation_options: PipelineCompilationOptions::default(),
                        },
                        fragment: Some(wgpu::FragmentState {
                            module: &shader,
                            entry_point: Some("fs_main"),
                            targets: &[Some(wgpu::ColorTargetState {
                                format: output_format,
                                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                                write_mask: wgpu::ColorWrites::ALL,
                            })],
                            compilation_options: PipelineCompilationOptions::default(),
                        }),
                        primitive: wgpu::PrimitiveState {
                            topology: wgpu::PrimitiveTopology::TriangleList,
                            front_face: wgpu::FrontFace::Ccw,
                            cull_mode: None,
                            ..Default::default()
                        },
                        depth_stencil: Some(wgpu::DepthStencilState {
                            format: DepthTexture::DEPTH_FORMAT,
                            depth_write_enabled: true,
                            depth_compare: wgpu::CompareFunction::Less,
                            stencil: StencilState::default(),
                            bias: DepthBiasState::default(),
                        }),
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
            bindings,
            textures: Vec::new(),
            render_models: HashMap::new(),
            render_objects: HashMap::new(),
            draws: Vec::new(),
        })
    }

    /// Uploads models the host spawned since the last frame and writes this
    /// frame's object matrices and joint palettes.
    pub fn prepare(&mut self, device: &Device, queue: &wgpu::Queue, host: &mut SceneHost) {
        self.upload_new_models(device, queue, host);

        self.draws.clear();
        let scene = &host.scene;
        for (object_id, object, model_id) in scene.drawables() {
            let Some(render_model) = self.render_models.get(&model_id) else {
                continue;
            };

            let joints = match object.skin_id {
                Some(skin_id) if render_model.skinned => scene.joint_matrices(skin_id),
                _ => Vec::new(),
            };
            let uniform = ObjectUniform::new(
                *object.transform.world_matrix(),
                *object.transform.normal_matrix(),
                !joints.is_empty(),
            );

            let bindings = &self.bindings;
            self.render_objects
                .entry(object_id)
                .or_insert_with(|| RenderObject::new(device, bindings))
                .update(queue, uniform, &joints);

            self.draws.push(Draw {
                object: object_id,
                model: model_id,
            });
        }
    }

    fn upload_new_models(&mut self, device: &Device, queue: &wgpu::Queue, host: &mut SceneHost) {
        let pending: Vec<SceneModelId> = host
            .scene
            .models
            .iter()
            .filter(|(_, scene_model)| !scene_model.uploaded)
            .map(|(id, _)| id)
            .collect();

        if pending.is_empty() {
            return;
        }

        // Images arrive together with the models that reference them.
        if self.textures.len() < host.images.len() {
            let start = self.textures.len();
            for (index, image) in host.images.iter().enumerate().skip(start) {
                let label = format!("Model image {}", index);
                let texture = match Texture::from_gltf_image(device, queue, image, &label) {
                    Ok(texture) => Some(texture),
                    Err(e) => {
                        log::warn!("{:#}", e);
                        None
                    }
                };
                self.textures.push(texture);
            }
        }

        for model_id in pending {
            let Some(scene_model) = host.scene.models.get_mut(model_id) else {
                continue;
            };

            let render_model =
                RenderModel::from_model(device, &self.bindings, &self.textures, &scene_model.model);
            log::info!(
                "Uploaded model {} with {} primitives",
                scene_model.model.name,
                render_model.primitives.len()
            );

            self.render_models.insert(model_id, render_model);
            scene_model.uploaded = true;
        }
    }

    pub fn render(
        &self,
        texture_views: &ModelTextureViews,
        encoder: &mut wgpu::CommandEncoder,
        pipeline_cache: &PipelineCache,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Model Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: texture_views.color,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: texture_views.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        let Some(pipeline) = pipeline_cache.get(self.pipeline_id) else {
            return;
        };

        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.common.global_uniform.bind_group, &[]);

        for draw in &self.draws {
            let (Some(render_object), Some(render_model)) = (
                self.render_objects.get(&draw.object),
                self.render_models.get(&draw.model),
            ) else {
                continue;
            };

            render_pass.set_bind_group(1, &render_object.bind_group, &[]);
            for primitive in &render_model.primitives {
                render_pass.set_bind_group(2, &primitive.material_bind_group, &[]);
                render_pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..primitive.num_indices, 0, 0..1);
            }
        }
    }
}
