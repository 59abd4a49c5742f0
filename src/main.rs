use anyhow::Result;

mod animation;
mod camera;
mod config;
mod engine;
mod model;
mod page;
mod portfolio;
mod readiness;
mod rendering;
mod scene_graph;
mod scene_host;
mod scroll;
mod window;

fn main() -> Result<()> {
    pretty_env_logger::init();

    pollster::block_on(window::run())?;

    Ok(())
}
