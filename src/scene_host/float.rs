use glam::Vec3;
use rand::Rng;

use crate::config::FloatConfig;

/// Gentle idle wobble: a slow rotation sway plus a small vertical bob.
pub struct Float {
    config: FloatConfig,
    offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatPose {
    pub rotation: Vec3,
    pub height: f32,
}

impl Float {
    pub fn new(config: FloatConfig, rng: &mut impl Rng) -> Self {
        Self {
            config,
            offset: rng.gen::<f32>() * 10_000.0,
        }
    }

    pub fn pose_at(&self, elapsed: f32) -> FloatPose {
        let t = (self.offset + elapsed) / 4.0 * self.config.speed;
        let intensity = self.config.rotation_intensity;

        let rotation = Vec3::new(
            t.cos() / 8.0 * intensity,
            t.sin() / 8.0 * intensity,
            t.sin() / 20.0 * intensity,
        );

        let [low, high] = self.config.floating_range;
        let bob = t.sin() / 10.0;
        let height = map_linear(bob, -0.1, 0.1, low, high) * self.config.float_intensity;

        FloatPose { rotation, height }
    }
}

fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn bob_stays_within_floating_range() {
        let float = Float::new(FloatConfig::default(), &mut StdRng::seed_from_u64(3));

        for step in 0..600 {
            let pose = float.pose_at(step as f32 * 0.1);
            assert!(pose.height >= -0.1 - 1e-6 && pose.height <= 0.1 + 1e-6);
            assert!(pose.rotation.x.abs() <= 0.25 + 1e-6);
            assert!(pose.rotation.z.abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn custom_range_is_respected() {
        let config = FloatConfig {
            floating_range: [0.0, 1.0],
            float_intensity: 2.0,
            ..Default::default()
        };
        let float = Float::new(config, &mut StdRng::seed_from_u64(3));

        for step in 0..200 {
            let height = float.pose_at(step as f32 * 0.37).height;
            assert!((-1e-5..=2.0 + 1e-5).contains(&height));
        }
    }
}
