use std::{sync::Arc, time::Instant};

use anyhow::Context;
use imgui_winit_support::WinitPlatform;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{Event, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::SceneConfig,
    engine,
    page::{theme::PageFonts, Page},
    portfolio::Portfolio,
    rendering::renderer::Renderer,
};

const WINDOW_TITLE: &str = "Deony Diras | 3D Portfolio";

struct ImguiState {
    context: imgui::Context,
    platform: WinitPlatform,
    page: Page,
}

struct App {
    renderer: Option<Renderer>,
    portfolio: Portfolio,
    imgui: Option<ImguiState>,
    last_frame: Instant,
}

impl App {
    fn new(portfolio: Portfolio) -> Self {
        Self {
            renderer: None,
            portfolio,
            imgui: None,
            last_frame: Instant::now(),
        }
    }

    fn setup_imgui(window: &Window) -> ImguiState {
        let mut context = imgui::Context::create();
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(
            context.io_mut(),
            window,
            imgui_winit_support::HiDpiMode::Default,
        );

        let page = Page::new(PageFonts::load(&mut context));

        // The published imgui-rs writes a broken ini file.
        context.set_ini_filename(None);

        ImguiState {
            context,
            platform,
            page,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(1280.0, 800.0));
        let window = event_loop
            .create_window(window_attributes)
            .context("Failed to create window")?;

        let mut imgui = Self::setup_imgui(&window);
        let renderer = pollster::block_on(Renderer::new(
            Arc::new(window),
            &self.portfolio.host,
            &mut imgui.context,
        ))
        .context("Failed to create renderer")?;

        self.imgui = Some(imgui);
        self.renderer = Some(renderer);
        self.portfolio.mount();
        self.last_frame = Instant::now();

        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(imgui), Some(renderer)) = (self.imgui.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        let now = Instant::now();
        let delta_time = now - self.last_frame;
        self.last_frame = now;
        imgui.context.io_mut().update_delta_time(delta_time);

        renderer.window.request_redraw();

        if let Err(e) = imgui
            .platform
            .prepare_frame(imgui.context.io_mut(), &renderer.window)
        {
            log::error!("Failed to prepare imgui frame: {}", e);
            return;
        }

        let ui = imgui.context.new_frame();
        engine::update(&mut self.portfolio, &imgui.page, ui, delta_time.as_secs_f32());
        imgui.platform.prepare_render(ui, &renderer.window);

        let time = self.portfolio.elapsed();
        match renderer.render(&mut self.portfolio.host, time, &mut imgui.context) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                renderer.resize(renderer.size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of memory");
                event_loop.exit();
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timeout");
            }
            Err(other) => {
                log::error!("Unexpected error: {:?}", other);
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        if let Err(e) = self.init(event_loop) {
            log::error!("{:#}", e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(*new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => (),
        }

        if let (Some(imgui), Some(renderer)) = (self.imgui.as_mut(), self.renderer.as_ref()) {
            imgui.platform.handle_event::<()>(
                imgui.context.io_mut(),
                &renderer.window,
                &Event::WindowEvent { window_id, event },
            );
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let portfolio = Portfolio::new(SceneConfig::default()).context("Failed to create portfolio")?;
    let mut app = App::new(portfolio);
    event_loop.run_app(&mut app)?;

    // Scroll triggers go before the scene they animate.
    app.portfolio.controller.dispose();

    Ok(())
}
