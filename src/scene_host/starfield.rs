use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::config::StarfieldConfig;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub size: f32,
    pub color: Vec3,
    /// Per-star phase for the twinkle.
    pub phase: f32,
}

pub struct Starfield {
    pub stars: Vec<Star>,
    pub fade: bool,
}

impl Starfield {
    /// Scatters stars over shells shrinking from `radius + depth` toward `radius`.
    pub fn generate(config: &StarfieldConfig, rng: &mut impl Rng) -> Self {
        let mut radius = config.radius + config.depth;
        let increment = if config.count > 0 {
            config.depth / config.count as f32
        } else {
            0.0
        };

        let stars = (0..config.count)
            .map(|i| {
                radius -= increment * rng.gen::<f32>();
                let phi = (1.0 - rng.gen::<f32>() * 2.0).acos();
                let theta = rng.gen::<f32>() * TAU;
                let hue = i as f32 / config.count as f32;

                Star {
                    position: spherical_to_cartesian(radius, phi, theta),
                    size: (0.5 + 0.5 * rng.gen::<f32>()) * config.factor,
                    color: hsl_to_rgb(hue, config.saturation, 0.9),
                    phase: rng.gen::<f32>() * TAU,
                }
            })
            .collect();

        Self {
            stars,
            fade: config.fade,
        }
    }
}

fn spherical_to_cartesian(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Vec3 {
    if saturation <= 0.0 {
        return Vec3::splat(lightness);
    }

    let q = if lightness <= 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    let channel = |t: f32| {
        let t = t.rem_euclid(1.0);
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * 6.0 * (2.0 / 3.0 - t)
        } else {
            p
        }
    };

    Vec3::new(
        channel(hue + 1.0 / 3.0),
        channel(hue),
        channel(hue - 1.0 / 3.0),
    )
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn stars_lie_within_the_shell() {
        let config = StarfieldConfig::default();
        let field = Starfield::generate(&config, &mut StdRng::seed_from_u64(7));

        assert_eq!(field.stars.len(), config.count);
        for star in &field.stars {
            let distance = star.position.length();
            assert!(distance <= config.radius + config.depth + 1e-2);
            assert!(distance >= config.radius - 1e-2);
            assert!(star.size >= 0.5 * config.factor && star.size <= config.factor);
        }
    }

    #[test]
    fn zero_saturation_gives_grey_stars() {
        let field = Starfield::generate(&StarfieldConfig::default(), &mut StdRng::seed_from_u64(1));
        assert!(field.stars.iter().all(|star| star.color == Vec3::splat(0.9)));
    }

    #[test]
    fn same_seed_same_sky() {
        let config = StarfieldConfig {
            count: 64,
            ..Default::default()
        };
        let a = Starfield::generate(&config, &mut StdRng::seed_from_u64(42));
        let b = Starfield::generate(&config, &mut StdRng::seed_from_u64(42));
        assert_eq!(a.stars, b.stars);
    }

    #[test]
    fn saturated_hues_cycle_through_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
        assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);
    }
}
