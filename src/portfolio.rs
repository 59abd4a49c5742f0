use std::time::Instant;

use anyhow::Context;

use crate::{
    config::SceneConfig,
    readiness,
    scene_host::{loader::PendingAsset, SceneHost},
    scroll::{BoundarySpec, PageMetrics, ScrollTriggerController},
};

/// Everything that outlives a single frame: the scene, the scroll
/// controller and the worker runtime loading the model.
pub struct Portfolio {
    pub host: SceneHost,
    pub controller: ScrollTriggerController,
    pub start_time: Instant,
    // Keeps the loader's blocking pool alive.
    _runtime: tokio::runtime::Runtime,
}

impl Portfolio {
    pub fn new(config: SceneConfig) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("portfolio-worker")
            .build()
            .context("Failed to start worker runtime")?;

        let asset = PendingAsset::spawn(runtime.handle(), &config.model.path);
        let (notifier, readiness) = readiness::channel();
        let host = SceneHost::new(&config, asset, notifier, &mut rand::thread_rng());
        let controller = ScrollTriggerController::new(readiness, BoundarySpec::portfolio());

        Ok(Self {
            host,
            controller,
            start_time: Instant::now(),
            _runtime: runtime,
        })
    }

    pub fn elapsed(&self) -> f32 {
        self.start_time.elapsed().as_secs_f32()
    }

    /// Mounts the floating group, which hands the controller its handle.
    pub fn mount(&mut self) {
        self.host.mount();
    }

    /// Applies one frame: boundary checks, running tweens, then the scene.
    pub fn update(&mut self, metrics: &PageMetrics, dt: f32) {
        self.controller.update(metrics);

        if let Some(pose) = self
            .controller
            .handle()
            .and_then(|handle| self.host.pose_mut(handle))
        {
            self.controller.advance(dt, pose);
        }

        self.host.update(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ModelConfig, StarfieldConfig};
    use crate::scroll::tests::metrics_at;

    fn portfolio() -> Portfolio {
        Portfolio::new(SceneConfig {
            starfield: StarfieldConfig {
                count: 32,
                ..Default::default()
            },
            model: ModelConfig {
                path: "does/not/exist.glb".to_string(),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap()
    }

    fn run_frames(portfolio: &mut Portfolio, scroll_y: f32, frames: usize) {
        let metrics = metrics_at(scroll_y);
        for _ in 0..frames {
            portfolio.update(&metrics, 1.0 / 60.0);
        }
    }

    #[test]
    fn nothing_moves_before_mount() {
        let mut portfolio = portfolio();
        run_frames(&mut portfolio, 2000.0, 120);

        assert_eq!(portfolio.host.pose().position.x, 0.0);
        assert_eq!(portfolio.controller.registered_count(), 0);
    }

    #[test]
    fn scrolling_moves_the_astronaut_group() {
        let mut portfolio = portfolio();
        portfolio.mount();
        run_frames(&mut portfolio, 0.0, 2);

        run_frames(&mut portfolio, 500.0, 120);
        assert_eq!(portfolio.host.pose().position.x, -7.0);
        assert_eq!(portfolio.host.pose().rotation.y, 1.5);

        run_frames(&mut portfolio, 1400.0, 120);
        assert_eq!(portfolio.host.pose().position.x, 7.0);

        run_frames(&mut portfolio, 0.0, 120);
        assert_eq!(portfolio.host.pose().position.x, 0.0);
        assert_eq!(portfolio.host.pose().rotation.y, 0.0);
    }

    #[test]
    fn missing_model_keeps_placeholder() {
        let mut portfolio = portfolio();
        portfolio.mount();

        for _ in 0..200 {
            run_frames(&mut portfolio, 0.0, 1);
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        assert!(portfolio.host.placeholder_visible());
        assert!(!portfolio.host.is_model_loaded());
    }
}
