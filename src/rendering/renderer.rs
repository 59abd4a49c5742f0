use std::sync::Arc;

use anyhow::Context;
use wgpu::CommandEncoderDescriptor;
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    rendering::{
        global_uniform::GlobalUniformState,
        imgui_renderer::ImguiRendererState,
        passes::{
            model_pass::{ModelPass, ModelTextureViews},
            starfield_pass::StarfieldPass,
        },
        render_common::RenderCommon,
        shader_loader::{PipelineCacheBuilder, ShaderLoader},
        texture::DepthTexture,
    },
    scene_host::SceneHost,
};

pub struct Renderer {
    pub window: Arc<Window>,
    pub size: PhysicalSize<u32>,

    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,

    common: Arc<RenderCommon>,
    depth_texture: DepthTexture,
    shader_loader: ShaderLoader,

    starfield_pass: StarfieldPass,
    model_pass: ModelPass,
    imgui_renderer: ImguiRendererState,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        host: &SceneHost,
        imgui_context: &mut imgui::Context,
    ) -> anyhow::Result<Renderer> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("No suitable GPU adapter")?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: None,
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to create device")?;

        let common = Arc::new(RenderCommon::new(&device, &adapter, &surface, size)?);
        let depth_texture = DepthTexture::new(&device, size, "Depth Texture");

        let mut cache_builder = PipelineCacheBuilder::new();
        let starfield_pass =
            StarfieldPass::create(&device, common.clone(), &mut cache_builder, &host.starfield)?;
        let model_pass = ModelPass::create(&device, &queue, common.clone(), &mut cache_builder)?;
        let shader_loader = ShaderLoader::new(device.clone(), cache_builder)?;

        let imgui_renderer =
            ImguiRendererState::new(&device, &queue, common.output_format, imgui_context);

        Ok(Self {
            window,
            size,
            surface,
            device,
            queue,
            common,
            depth_texture,
            shader_loader,
            starfield_pass,
            model_pass,
            imgui_renderer,
        })
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }

        let Ok(mut config) = self.common.output_surface_config.write() else {
            log::error!("Surface config lock poisoned");
            return;
        };

        self.size = new_size;
        config.width = new_size.width;
        config.height = new_size.height;
        self.depth_texture.resize(&self.device, new_size);
        self.surface.configure(&self.device, &config);
    }

    pub fn render(
        &mut self,
        host: &mut SceneHost,
        time: f32,
        imgui_context: &mut imgui::Context,
    ) -> Result<(), wgpu::SurfaceError> {
        self.shader_loader.load_pending_shaders();

        self.common.global_uniform.update(
            &self.queue,
            GlobalUniformState::new(self.size, host, time),
        );
        self.model_pass.prepare(&self.device, &self.queue, host);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let pipeline_cache = &self.shader_loader.cache;

        self.starfield_pass
            .render(&view, &mut encoder, pipeline_cache);

        self.model_pass.render(
            &ModelTextureViews {
                color: &view,
                depth: self.depth_texture.view(),
            },
            &mut encoder,
            pipeline_cache,
        );

        if let Err(e) = self.imgui_renderer.render(
            &view,
            imgui_context,
            &self.device,
            &self.queue,
            &mut encoder,
        ) {
            log::error!("{:#}", e);
        }

        self.queue.submit([encoder.finish()]);
        output.present();

        Ok(())
    }
}
