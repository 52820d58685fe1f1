//! Orbit layout: even angular distribution of labeled nodes around a circle.
//!
//! Pure math. Angles start on +X and advance toward +Z.

use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::api::types::{Color, NodeId};
use crate::input::pointer::PointerState;

/// Vertical wave applied around the ring: `height + amplitude·sin(angle·frequency)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Undulation {
    pub amplitude: f32,
    pub frequency: f32,
}

/// Geometry of one ring layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RingLayout {
    pub radius: f32,
    pub height: f32,
    /// Radians added to every slot angle.
    pub phase: f32,
    pub undulation: Option<Undulation>,
}

/// One laid-out member.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitSlot {
    pub index: usize,
    pub label: String,
    pub angle: f32,
    pub position: Vec3,
}

/// Angle of slot `index` out of `count`.
#[inline]
pub fn slot_angle(index: usize, count: usize, phase: f32) -> f32 {
    TAU * index as f32 / count as f32 + phase
}

/// Lay `labels` out evenly around the ring. Empty input gives an empty layout.
pub fn layout_ring<S: AsRef<str>>(labels: &[S], layout: &RingLayout) -> Vec<OrbitSlot> {
    let n = labels.len();
    labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let angle = slot_angle(i, n, layout.phase);
            let lift = layout
                .undulation
                .map(|u| u.amplitude * (angle * u.frequency).sin())
                .unwrap_or(0.0);
            OrbitSlot {
                index: i,
                label: label.as_ref().to_string(),
                angle,
                position: Vec3::new(angle.cos() * layout.radius, layout.height + lift, angle.sin() * layout.radius),
            }
        })
        .collect()
}

/// Pointer and time response of a ring outline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingMotion {
    /// Radians of yaw per unit of pointer x.
    pub yaw_per_pointer_x: f32,
    /// Radians of yaw per unit of pointer y.
    pub yaw_per_pointer_y: f32,
    /// Radians of pitch per unit of pointer y.
    pub pitch_per_pointer_y: f32,
    pub tilt: f32,
    pub tilt_rate: f32,
}

impl Default for RingMotion {
    fn default() -> Self {
        Self {
            yaw_per_pointer_x: 0.5,
            yaw_per_pointer_y: 0.3,
            pitch_per_pointer_y: 0.2,
            tilt: 0.1,
            tilt_rate: 0.3,
        }
    }
}

/// A composed ring: outline parameters plus its members in angle order.
#[derive(Debug, Clone)]
pub struct OrbitRing {
    pub radius: f32,
    pub height_offset: f32,
    /// Radians per second of outline yaw.
    pub angular_speed: f32,
    pub color: Color,
    pub opacity: f32,
    /// Half-width of the outline band.
    pub band: f32,
    pub segments: u32,
    /// When set, member base positions revolve with the ring.
    pub carry_members: bool,
    pub motion: RingMotion,
    pub members: Vec<NodeId>,
    /// Outline rotation for this frame: (pitch, yaw).
    pub rotation: Vec2,
}

impl OrbitRing {
    /// Update the outline rotation for time `t`.
    pub fn animate(&mut self, t: f32, pointer: &PointerState) {
        let m = &self.motion;
        let yaw = t * self.angular_speed + pointer.x() * m.yaw_per_pointer_x + pointer.y() * m.yaw_per_pointer_y;
        let pitch = (t * m.tilt_rate).sin() * m.tilt + pointer.y() * m.pitch_per_pointer_y;
        self.rotation = Vec2::new(pitch, yaw);
    }

    /// Revolution applied to member base positions at time `t`.
    pub fn carry(&self, t: f32) -> Quat {
        if self.carry_members {
            Quat::from_rotation_y(-t * self.angular_speed)
        } else {
            Quat::IDENTITY
        }
    }

    pub fn inner_radius(&self) -> f32 {
        (self.radius - self.band).max(0.0)
    }

    pub fn outer_radius(&self) -> f32 {
        self.radius + self.band
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("node-{i}")).collect()
    }

    #[test]
    fn empty_ring_is_empty() {
        let slots = layout_ring::<String>(&[], &RingLayout { radius: 5.0, ..RingLayout::default() });
        assert!(slots.is_empty());
    }

    #[test]
    fn members_sit_on_the_radius() {
        for n in 1..=12 {
            for radius in [0.5, 5.0, 7.5, 10.0] {
                let layout = RingLayout {
                    radius,
                    height: 1.0,
                    phase: 0.3,
                    undulation: Some(Undulation { amplitude: 1.5, frequency: 0.5 }),
                };
                let slots = layout_ring(&labels(n), &layout);
                assert_eq!(slots.len(), n);
                for s in &slots {
                    let axis_distance = Vec2::new(s.position.x, s.position.z).length();
                    assert!((axis_distance - radius).abs() < 1e-4, "n={n} r={radius} got {axis_distance}");
                }
            }
        }
    }

    #[test]
    fn angles_increase_and_span_one_turn() {
        for n in 1..=9 {
            let phase = 0.6 * std::f32::consts::PI;
            let slots = layout_ring(&labels(n), &RingLayout { radius: 3.0, phase, ..RingLayout::default() });
            for pair in slots.windows(2) {
                assert!(pair[1].angle > pair[0].angle);
            }
            let step = TAU / n as f32;
            let first = slots[0].angle;
            let last = slots[n - 1].angle;
            assert!((first - phase).abs() < 1e-6);
            assert!((last + step - (first + TAU)).abs() < 1e-4, "n={n}");
        }
    }

    #[test]
    fn undulation_lifts_members() {
        let layout = RingLayout {
            radius: 5.0,
            height: 0.0,
            phase: 0.0,
            undulation: Some(Undulation { amplitude: 1.5, frequency: 0.5 }),
        };
        let slots = layout_ring(&labels(5), &layout);
        let expected = 1.5 * (slots[2].angle * 0.5).sin();
        assert!((slots[2].position.y - expected).abs() < 1e-6);
        assert_eq!(slots[0].position.y, 0.0);
    }

    #[test]
    fn labels_keep_insertion_order() {
        let slots = layout_ring(&["Legal Review", "Compliance", "Research"], &RingLayout { radius: 7.5, ..RingLayout::default() });
        let order: Vec<_> = slots.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(order, vec!["Legal Review", "Compliance", "Research"]);
    }

    #[test]
    fn ring_yaw_follows_pointer() {
        let mut ring = OrbitRing {
            radius: 5.0,
            height_offset: 0.0,
            angular_speed: 0.1,
            color: Color::WHITE,
            opacity: 0.4,
            band: 0.05,
            segments: 128,
            carry_members: false,
            motion: RingMotion::default(),
            members: Vec::new(),
            rotation: Vec2::ZERO,
        };
        let mut pointer = PointerState::default();
        ring.animate(2.0, &pointer);
        assert!((ring.rotation.y - 0.2).abs() < 1e-6);
        pointer.on_pointer_move(100.0, 50.0, 100.0, 100.0);
        ring.animate(2.0, &pointer);
        assert!((ring.rotation.y - 0.7).abs() < 1e-6);
        assert_eq!(ring.carry(3.0), Quat::IDENTITY);
        assert!((ring.inner_radius() - 4.95).abs() < 1e-6);
    }
}
