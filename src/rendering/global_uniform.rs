use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec4};
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;

use crate::scene_host::SceneHost;

/// Mirrors `Globals` in `assets/shaders/shared/globals.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct GlobalUniformState {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec4,
    pub ambient: Vec4,
    /// xyz: direction toward the light.
    pub light_direction: Vec4,
    pub light_color: Vec4,
    pub resolution: Vec2,
    pub time: f32,
    /// 1.0 when stars fade toward their edges.
    pub star_fade: f32,
}

impl GlobalUniformState {
    pub fn new(resolution: PhysicalSize<u32>, host: &SceneHost, time: f32) -> Self {
        let resolution = Vec2::new(resolution.width as f32, resolution.height as f32);
        let camera = &host.camera;
        let lighting = &host.lighting;

        Self {
            view: camera.view_matrix(),
            projection: camera.projection_matrix(resolution),
            camera_position: camera.eye.extend(1.0),
            ambient: lighting.ambient.extend(1.0),
            light_direction: lighting.direction.extend(0.0),
            light_color: lighting.directional.extend(1.0),
            resolution,
            time,
            star_fade: if host.starfield.fade { 1.0 } else { 0.0 },
        }
    }
}

pub struct GlobalUniform {
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl GlobalUniform {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Global uniform buffer"),
            contents: bytemuck::bytes_of(&GlobalUniformState::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Global uniform bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Global uniform bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn update(&self, queue: &wgpu::Queue, state: GlobalUniformState) {
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&state));
    }
}
