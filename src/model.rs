use std::mem::offset_of;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use gltf::buffer;
use itertools::izip;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    position: Vec3,
    normal: Vec3,
    tex_coords: Vec2,
    joints: [u32; 4],
    weights: Vec4,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub base_color: Vec4,
    /// Index into the asset's image list.
    pub base_color_image: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec4::ONE,
            base_color_image: None,
        }
    }
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material: Material,
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
    pub skinned: bool,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Model> {
        let mut model = Model {
            name: name.into(),
            primitives: Vec::new(),
            skinned: false,
        };

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Skipping primitive {} of {}: unsupported mode {:?}",
                    primitive.index(),
                    model.name,
                    primitive.mode()
                );
                continue;
            }

            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| &data[..]));

            let positions: Vec<Vec3> = reader
                .read_positions()
                .ok_or_else(|| anyhow::anyhow!("Primitive without positions in {}", model.name))?
                .map(Vec3::from)
                .collect();
            let vertex_count = positions.len();

            let normals: Vec<Vec3> = match reader.read_normals() {
                Some(normals) => normals.map(Vec3::from).collect(),
                None => vec![Vec3::Y; vertex_count],
            };
            let tex_coords: Vec<Vec2> = match reader.read_tex_coords(0) {
                Some(tex_coords) => tex_coords.into_f32().map(Vec2::from).collect(),
                None => vec![Vec2::ZERO; vertex_count],
            };

            let joints: Option<Vec<[u32; 4]>> = reader.read_joints(0).map(|joints| {
                joints
                    .into_u16()
                    .map(|j| j.map(u32::from))
                    .collect()
            });
            let weights: Option<Vec<Vec4>> = reader
                .read_weights(0)
                .map(|weights| weights.into_f32().map(Vec4::from).collect());

            let (joints, weights) = match (joints, weights) {
                (Some(joints), Some(weights)) => {
                    model.skinned = true;
                    (joints, weights)
                }
                _ => (vec![[0; 4]; vertex_count], vec![Vec4::ZERO; vertex_count]),
            };

            let vertices = izip!(positions, normals, tex_coords, joints, weights)
                .map(|(position, normal, tex_coords, joints, weights)| Vertex {
                    position,
                    normal,
                    tex_coords,
                    joints,
                    weights,
                })
                .collect::<Vec<Vertex>>();

            let indices = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect::<Vec<u32>>(),
                None => (0..vertices.len() as u32).collect(),
            };

            let pbr = primitive.material().pbr_metallic_roughness();
            let material = Material {
                base_color: Vec4::from(pbr.base_color_factor()),
                base_color_image: pbr
                    .base_color_texture()
                    .map(|info| info.texture().source().index()),
            };

            model.primitives.push(ModelPrimitive {
                index: primitive.index(),
                vertices,
                indices,
                material,
            });
        }

        if model.primitives.is_empty() {
            return Err(anyhow::anyhow!("Mesh without primitives: {}", model.name));
        }

        Ok(model)
    }
}

pub const MODEL_VERTEX_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Vertex,
    attributes: &[
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, position) as wgpu::BufferAddress,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, normal) as wgpu::BufferAddress,
            shader_location: 1,
            format: wgpu::VertexFormat::Float32x3,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, tex_coords) as wgpu::BufferAddress,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, joints) as wgpu::BufferAddress,
            shader_location: 3,
            format: wgpu::VertexFormat::Uint32x4,
        },
        wgpu::VertexAttribute {
            offset: offset_of!(Vertex, weights) as wgpu::BufferAddress,
            shader_location: 4,
            format: wgpu::VertexFormat::Float32x4,
        },
    ],
};
