use glam::Vec3;

use crate::config::LightingConfig;

/// Ambient term plus one directional light aimed at the origin.
#[derive(Debug, Clone, Copy)]
pub struct Lighting {
    pub ambient: Vec3,
    /// Unit vector pointing from the scene toward the light.
    pub direction: Vec3,
    pub directional: Vec3,
}

impl Lighting {
    pub fn from_config(config: &LightingConfig) -> Self {
        Self {
            ambient: config.color * config.ambient_intensity,
            direction: config.directional_position.normalize_or(Vec3::Y),
            directional: config.color * config.directional_intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_light_shines_from_upper_right_front() {
        let lighting = Lighting::from_config(&LightingConfig::default());

        assert!((lighting.direction.length() - 1.0).abs() < 1e-6);
        assert!(lighting.direction.x > 0.0 && lighting.direction.y > 0.0);
        assert_eq!(lighting.ambient, Vec3::splat(0.6));
        assert_eq!(lighting.directional, Vec3::splat(1.2));
    }
}
