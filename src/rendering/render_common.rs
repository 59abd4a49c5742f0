use std::sync::RwLock;

use wgpu::SurfaceConfiguration;
use winit::dpi::PhysicalSize;

use crate::rendering::global_uniform::GlobalUniform;

/// State shared by every pass.
pub struct RenderCommon {
    pub output_surface_config: RwLock<SurfaceConfiguration>,
    pub output_format: wgpu::TextureFormat,
    pub global_uniform: GlobalUniform,
}

impl RenderCommon {
    pub fn new(
        device: &wgpu::Device,
        adapter: &wgpu::Adapter,
        surface: &wgpu::Surface,
        size: PhysicalSize<u32>,
    ) -> anyhow::Result<Self> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Surface reports no supported formats"))?;

        let output_surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(device, &output_surface_config);

        Ok(Self {
            output_surface_config: RwLock::new(output_surface_config),
            output_format: surface_format,
            global_uniform: GlobalUniform::new(device),
        })
    }
}
