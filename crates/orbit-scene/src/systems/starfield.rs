use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::Color;
use crate::input::pointer::PointerState;
use crate::systems::rng::Rng;

/// Where star points are sampled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StarDistribution {
    /// `(rand - 0.5) * extent` on every axis.
    Cube { extent: f32 },
    /// Uniform direction at a radius drawn from `[inner, outer)`.
    Shell { inner: f32, outer: f32 },
}

impl Default for StarDistribution {
    fn default() -> Self {
        StarDistribution::Cube { extent: 2000.0 }
    }
}

/// Slow drift of the whole field plus its pointer parallax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarRotation {
    pub rate_x: f32,
    pub rate_y: f32,
    pub pointer_x: f32,
    pub pointer_y: f32,
}

impl Default for StarRotation {
    fn default() -> Self {
        Self { rate_x: 0.005, rate_y: 0.01, pointer_x: 0.02, pointer_y: 0.02 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarFieldConfig {
    pub count: usize,
    pub seed: u64,
    pub distribution: StarDistribution,
    /// Grey level range; each star gets one value in `[min, max)`.
    pub brightness: [f32; 2],
    /// Multiplied into every star's grey level.
    pub tint: String,
    /// Extra random amount added per channel, for faintly colored fields.
    pub color_jitter: [f32; 3],
    pub point_size: f32,
    pub opacity: f32,
    pub rotation: StarRotation,
}

impl Default for StarFieldConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            seed: 0x5EED,
            distribution: StarDistribution::default(),
            brightness: [0.6, 1.0],
            tint: "#ffffff".to_string(),
            color_jitter: [0.0; 3],
            point_size: 1.5,
            opacity: 0.8,
            rotation: StarRotation::default(),
        }
    }
}

/// One background point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub position: Vec3,
    pub color: Color,
}

/// The composed star field. Point positions are fixed at mount; only the field
/// rotation changes per frame.
#[derive(Debug, Clone)]
pub struct StarField {
    pub stars: Vec<Star>,
    pub point_size: f32,
    pub opacity: f32,
    pub motion: StarRotation,
    /// Field rotation for this frame: (x, y) radians.
    pub rotation: Vec2,
}

impl StarField {
    /// Sample `config.count` points, capped at `max_stars`.
    pub fn generate(config: &StarFieldConfig, max_stars: usize) -> Self {
        let count = config.count.min(max_stars);
        if count < config.count {
            log::warn!("star count {} exceeds capacity, clamped to {count}", config.count);
        }
        let mut rng = Rng::new(config.seed);
        let tint = Color::from_hex_or_neutral(&config.tint);
        let [lo, hi] = config.brightness;
        let (lo, hi) = (lo.clamp(0.0, 1.0), hi.clamp(0.0, 1.0));
        let jitter = config.color_jitter.map(|j| j.max(0.0));

        let stars = (0..count)
            .map(|_| {
                let position = sample(&mut rng, config.distribution);
                let g = if hi > lo { rng.range(lo, hi) } else { lo };
                let mut channel = |base: f32, spread: f32| {
                    let extra = if spread > 0.0 { rng.range(0.0, spread) } else { 0.0 };
                    (g * base + extra).min(1.0)
                };
                let color = Color::new(channel(tint.r, jitter[0]), channel(tint.g, jitter[1]), channel(tint.b, jitter[2]));
                Star { position, color }
            })
            .collect();

        Self {
            stars,
            point_size: config.point_size.max(0.0),
            opacity: config.opacity.clamp(0.0, 1.0),
            motion: config.rotation,
            rotation: Vec2::ZERO,
        }
    }

    pub fn animate(&mut self, t: f32, pointer: &PointerState) {
        let m = &self.motion;
        self.rotation = Vec2::new(
            t * m.rate_x + pointer.y() * m.pointer_y,
            t * m.rate_y + pointer.x() * m.pointer_x,
        );
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

fn sample(rng: &mut Rng, distribution: StarDistribution) -> Vec3 {
    match distribution {
        StarDistribution::Cube { extent } => {
            Vec3::new(rng.centered(), rng.centered(), rng.centered()) * extent
        }
        StarDistribution::Shell { inner, outer } => {
            let (inner, outer) = if inner <= outer { (inner, outer) } else { (outer, inner) };
            let radius = if outer > inner { rng.range(inner, outer) } else { inner };
            let theta = TAU * rng.next_f32();
            let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
            Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.sin() * theta.sin(),
                radius * phi.cos(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_points_stay_inside_extent() {
        let config = StarFieldConfig { count: 2000, ..StarFieldConfig::default() };
        let field = StarField::generate(&config, 10_000);
        assert_eq!(field.len(), 2000);
        for star in &field.stars {
            assert!(star.position.abs().max_element() <= 1000.0);
        }
    }

    #[test]
    fn shell_points_stay_between_radii() {
        let config = StarFieldConfig {
            count: 1500,
            distribution: StarDistribution::Shell { inner: 50.0, outer: 150.0 },
            ..StarFieldConfig::default()
        };
        let field = StarField::generate(&config, 10_000);
        for star in &field.stars {
            let r = star.position.length();
            assert!(r >= 50.0 - 1e-2 && r <= 150.0 + 1e-2, "radius {r}");
        }
    }

    #[test]
    fn same_seed_same_field() {
        let config = StarFieldConfig { count: 64, ..StarFieldConfig::default() };
        let a = StarField::generate(&config, 100);
        let b = StarField::generate(&config, 100);
        assert_eq!(a.stars, b.stars);
    }

    #[test]
    fn jitter_tints_channels() {
        let config = StarFieldConfig {
            count: 200,
            brightness: [0.4, 0.7],
            color_jitter: [0.2, 0.1, 0.3],
            ..StarFieldConfig::default()
        };
        let field = StarField::generate(&config, 1000);
        assert!(field.stars.iter().all(|s| s.color.b <= 1.0 && s.color.r >= 0.4));
        assert!(field.stars.iter().any(|s| s.color.r != s.color.g));
    }

    #[test]
    fn count_is_capped() {
        let config = StarFieldConfig { count: 500, ..StarFieldConfig::default() };
        assert_eq!(StarField::generate(&config, 100).len(), 100);
    }

    #[test]
    fn rotation_drifts_and_follows_pointer() {
        let mut field = StarField::generate(&StarFieldConfig { count: 1, ..StarFieldConfig::default() }, 10);
        let mut pointer = PointerState::default();
        field.animate(10.0, &pointer);
        assert!((field.rotation.x - 0.05).abs() < 1e-6);
        assert!((field.rotation.y - 0.1).abs() < 1e-6);
        pointer.on_pointer_move(100.0, 0.0, 100.0, 100.0);
        field.animate(10.0, &pointer);
        assert!((field.rotation.x - 0.07).abs() < 1e-6);
        assert!((field.rotation.y - 0.12).abs() < 1e-6);
    }
}
