use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec4};
use wgpu::util::DeviceExt;

use crate::{
    model::{Model, ModelPrimitive},
    rendering::texture::Texture,
};

/// Joints beyond this are ignored by the skinning shader.
pub const MAX_JOINTS: usize = 128;

/// Mirrors `Object` in `model.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ObjectUniform {
    pub model: Mat4,
    pub normal: Mat4,
    pub skinned: u32,
    _padding: [u32; 3],
}

impl ObjectUniform {
    pub fn new(model: Mat4, normal: Mat4, skinned: bool) -> Self {
        Self {
            model,
            normal,
            skinned: skinned as u32,
            _padding: [0; 3],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct MaterialUniform {
    base_color: Vec4,
}

/// Bind group layouts and shared resources for model materials and objects.
pub struct ModelBindings {
    pub object_layout: wgpu::BindGroupLayout,
    pub material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    white: Texture,
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl ModelBindings {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object bind group layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, wgpu::ShaderStages::VERTEX),
            ],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material bind group layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::FRAGMENT),
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Model sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let white = Texture::solid(device, queue, [255; 4], "White texture");

        Self {
            object_layout,
            material_layout,
            sampler,
            white,
        }
    }
}

/// Per-object uniforms: model matrices and joint palette.
pub struct RenderObject {
    uniform_buffer: wgpu::Buffer,
    joint_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl RenderObject {
    pub fn new(device: &wgpu::Device, bindings: &ModelBindings) -> Self {
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object uniform buffer"),
            size: std::mem::size_of::<ObjectUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let joint_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Joint matrix buffer"),
            size: (std::mem::size_of::<Mat4>() * MAX_JOINTS) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object bind group"),
            layout: &bindings.object_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: joint_buffer.as_entire_binding(),
                },
            ],
        });

        Self {
            uniform_buffer,
            joint_buffer,
            bind_group,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, uniform: ObjectUniform, joints: &[Mat4]) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));

        if !joints.is_empty() {
            let joints = &joints[..joints.len().min(MAX_JOINTS)];
            queue.write_buffer(&self.joint_buffer, 0, bytemuck::cast_slice(joints));
        }
    }
}

pub struct RenderPrimitive {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub material_bind_group: wgpu::BindGroup,
    _material_buffer: wgpu::Buffer,
}

impl RenderPrimitive {
    fn from_primitive(
        device: &wgpu::Device,
        bindings: &ModelBindings,
        textures: &[Option<Texture>],
        model: &Model,
        primitive: &ModelPrimitive,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!(
                "Vertex buffer ({}, primitive {})",
                model.name, primitive.index
            )),
            contents: bytemuck::cast_slice(&primitive.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!(
                "Index buffer ({}, primitive {})",
                model.name, primitive.index
            )),
            contents: bytemuck::cast_slice(&primitive.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let material_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material uniform buffer"),
            contents: bytemuck::bytes_of(&MaterialUniform {
                base_color: primitive.material.base_color,
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let texture = primitive
            .material
            .base_color_image
            .and_then(|index| textures.get(index))
            .and_then(Option::as_ref)
            .unwrap_or(&bindings.white);

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Material bind group"),
            layout: &bindings.material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: material_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&bindings.sampler),
                },
            ],
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: primitive.indices.len() as u32,
            material_bind_group,
            _material_buffer: material_buffer,
        }
    }
}

pub struct RenderModel {
    pub primitives: Vec<RenderPrimitive>,
    pub skinned: bool,
}

impl RenderModel {
    /// `textures` holds the asset's images in glTF order; images that failed
    /// to upload are `None` and fall back to white.
    pub fn from_model(
        device: &wgpu::Device,
        bindings: &ModelBindings,
        textures: &[Option<Texture>],
        model: &Model,
    ) -> Self {
        let primitives = model
            .primitives
            .iter()
            .map(|primitive| {
                RenderPrimitive::from_primitive(device, bindings, textures, model, primitive)
            })
            .collect();

        RenderModel {
            primitives,
            skinned: model.skinned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_uniform_matches_wgsl_size() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 144);
        assert_eq!(std::mem::size_of::<Mat4>() * MAX_JOINTS, 8192);
    }
}
