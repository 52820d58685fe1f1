//! Per-frame animators.
//!
//! Every animator except the spring is a memoryless function of elapsed time and
//! the node's base position. Rotation drift accumulates per fixed clock sub-step,
//! which matches "per frame" at the 60 Hz the constants were tuned at.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::api::config::{finite_array, finite_or};
use crate::core::time::AnimationClock;
use crate::input::pointer::PointerState;

/// Derived transform of a node for the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Vec3,
    /// Euler angles in radians (XYZ order).
    pub rotation: Vec3,
    /// Uniform scale.
    pub scale: f32,
}

impl NodeTransform {
    pub fn at(position: Vec3) -> Self {
        Self { position, rotation: Vec3::ZERO, scale: 1.0 }
    }
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

/// Which animator a node gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatorKind {
    Static,
    /// Closed-form bob on x/y with drifting rotation.
    #[default]
    Drift,
    /// Closed-form wander on all three axes.
    Wander,
    /// Damped spring chasing base + pointer offset.
    Spring,
}

/// Constants for the closed-form drift:
/// `x = p.x + cos(t·s·k1)·a1`, `y = p.y + sin(t·s·k2)·a2`,
/// `rot.x += spin·s`, `rot.y = t·s·turn`, `rot.z = sin(t·s·k3)·wobble`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftParams {
    pub k1: f32,
    pub a1: f32,
    pub k2: f32,
    pub a2: f32,
    pub spin: f32,
    pub turn: f32,
    pub k3: f32,
    pub wobble: f32,
}

impl DriftParams {
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            k1: finite_or(self.k1, d.k1, "drift k1"),
            a1: finite_or(self.a1, d.a1, "drift a1"),
            k2: finite_or(self.k2, d.k2, "drift k2"),
            a2: finite_or(self.a2, d.a2, "drift a2"),
            spin: finite_or(self.spin, d.spin, "drift spin"),
            turn: finite_or(self.turn, d.turn, "drift turn"),
            k3: finite_or(self.k3, d.k3, "drift k3"),
            wobble: finite_or(self.wobble, d.wobble, "drift wobble"),
        }
    }
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            k1: 0.3,
            a1: 0.3,
            k2: 0.5,
            a2: 0.5,
            spin: 0.01,
            turn: 0.2,
            k3: 0.5,
            wobble: 0.1,
        }
    }
}

/// Constants for the three-axis wander used by the floating geometry backdrop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WanderParams {
    /// Angular rate multipliers per axis.
    pub rates: [f32; 3],
    /// Offset amplitudes per axis.
    pub amplitudes: [f32; 3],
    /// Rotation drift per sub-step per axis, scaled by speed.
    pub spin: [f32; 3],
}

impl WanderParams {
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            rates: finite_array(self.rates, d.rates, "wander rate"),
            amplitudes: finite_array(self.amplitudes, d.amplitudes, "wander amplitude"),
            spin: finite_array(self.spin, d.spin, "wander spin"),
        }
    }
}

impl Default for WanderParams {
    fn default() -> Self {
        Self {
            rates: [1.0, 0.7, 0.5],
            amplitudes: [2.0, 1.5, 1.0],
            spin: [0.01, 0.02, 0.005],
        }
    }
}

/// Constants for the damped-spring pursuit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    /// Fraction of the x/y error added to velocity per step.
    pub spring_rate: f32,
    /// Fraction of the z error added to velocity per step.
    pub depth_rate: f32,
    /// Velocity retained per step, in (0, 1).
    pub damping: f32,
    /// World units of offset per unit of normalized pointer.
    pub pointer_influence: f32,
    /// Amplitude of the z target wave.
    pub depth_wave: f32,
    pub depth_wave_rate: f32,
    /// Base rotation drift per step on x and y.
    pub spin: [f32; 2],
    /// Extra rotation per unit of velocity.
    pub velocity_spin: f32,
    pub wobble: f32,
    pub wobble_rate: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            spring_rate: 0.02,
            depth_rate: 0.01,
            damping: 0.95,
            pointer_influence: 2.0,
            depth_wave: 0.3,
            depth_wave_rate: 0.5,
            spin: [0.01, 0.015],
            velocity_spin: 0.1,
            wobble: 0.1,
            wobble_rate: 0.5,
        }
    }
}

impl SpringParams {
    /// Pull out-of-range constants back into the stable region.
    pub fn sanitized(mut self) -> Self {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            log::warn!("spring damping {} outside (0, 1), using 0.95", self.damping);
            self.damping = 0.95;
        }
        if !(self.spring_rate > 0.0 && self.spring_rate <= 1.0) {
            log::warn!("spring rate {} outside (0, 1], using 0.02", self.spring_rate);
            self.spring_rate = 0.02;
        }
        if !(self.depth_rate > 0.0 && self.depth_rate <= 1.0) {
            log::warn!("spring depth rate {} outside (0, 1], using 0.01", self.depth_rate);
            self.depth_rate = 0.01;
        }
        let d = Self::default();
        self.pointer_influence = finite_or(self.pointer_influence, d.pointer_influence, "spring pointer influence");
        self.depth_wave = finite_or(self.depth_wave, d.depth_wave, "spring depth wave");
        self.depth_wave_rate = finite_or(self.depth_wave_rate, d.depth_wave_rate, "spring depth wave rate");
        self.spin = finite_array(self.spin, d.spin, "spring spin");
        self.velocity_spin = finite_or(self.velocity_spin, d.velocity_spin, "spring velocity spin");
        self.wobble = finite_or(self.wobble, d.wobble, "spring wobble");
        self.wobble_rate = finite_or(self.wobble_rate, d.wobble_rate, "spring wobble rate");
        self
    }
}

/// The one stateful animator: position chases a target with per-step velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DampedSpring {
    pub position: Vec3,
    pub velocity: Vec3,
    pub params: SpringParams,
}

impl DampedSpring {
    /// A spring at rest on `start`.
    pub fn new(start: Vec3, params: SpringParams) -> Self {
        Self {
            position: start,
            velocity: Vec3::ZERO,
            params: params.sanitized(),
        }
    }

    /// Where the spring is heading at time `t` for the given pointer.
    pub fn target(&self, base: Vec3, t: f32, pointer: &PointerState) -> Vec3 {
        let p = &self.params;
        Vec3::new(
            base.x + pointer.x() * p.pointer_influence,
            base.y + pointer.y() * p.pointer_influence,
            base.z + (t * p.depth_wave_rate).sin() * p.depth_wave,
        )
    }

    /// One fixed step toward `target`.
    pub fn step(&mut self, target: Vec3) {
        let p = &self.params;
        let error = target - self.position;
        self.velocity += Vec3::new(error.x * p.spring_rate, error.y * p.spring_rate, error.z * p.depth_rate);
        self.velocity *= p.damping;
        self.position += self.velocity;
    }

    pub fn distance_to(&self, target: Vec3) -> f32 {
        self.position.distance(target)
    }
}

/// Animator attached to one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Animator {
    Static,
    Drift { params: DriftParams, speed: f32 },
    Wander { params: WanderParams, speed: f32 },
    Spring(DampedSpring),
}

impl Animator {
    pub fn build(
        kind: AnimatorKind,
        base: Vec3,
        speed: f32,
        drift: DriftParams,
        wander: WanderParams,
        spring: SpringParams,
    ) -> Self {
        match kind {
            AnimatorKind::Static => Animator::Static,
            AnimatorKind::Drift => Animator::Drift { params: drift, speed },
            AnimatorKind::Wander => Animator::Wander { params: wander, speed },
            AnimatorKind::Spring => Animator::Spring(DampedSpring::new(base, spring)),
        }
    }

    pub fn kind(&self) -> AnimatorKind {
        match self {
            Animator::Static => AnimatorKind::Static,
            Animator::Drift { .. } => AnimatorKind::Drift,
            Animator::Wander { .. } => AnimatorKind::Wander,
            Animator::Spring(_) => AnimatorKind::Spring,
        }
    }

    /// Write this frame's transform for a node based at `base`.
    ///
    /// A closed-form animator with speed 0 pins the node to `base`; its trig
    /// offsets would otherwise freeze at their t = 0 values.
    pub fn animate(&mut self, base: Vec3, transform: &mut NodeTransform, clock: &AnimationClock, pointer: &PointerState) {
        let t = clock.elapsed();
        let steps = clock.steps() as f32;
        match self {
            Animator::Static => {
                transform.position = base;
            }
            Animator::Drift { params: k, speed } => {
                let s = *speed;
                if s == 0.0 {
                    transform.position = base;
                    return;
                }
                transform.position = Vec3::new(
                    base.x + (t * s * k.k1).cos() * k.a1,
                    base.y + (t * s * k.k2).sin() * k.a2,
                    base.z,
                );
                transform.rotation.x += k.spin * s * steps;
                transform.rotation.y = t * s * k.turn;
                transform.rotation.z = (t * s * k.k3).sin() * k.wobble;
            }
            Animator::Wander { params: k, speed } => {
                let s = *speed;
                if s == 0.0 {
                    transform.position = base;
                    return;
                }
                transform.position = Vec3::new(
                    base.x + (t * s * k.rates[0]).sin() * k.amplitudes[0],
                    base.y + (t * s * k.rates[1]).cos() * k.amplitudes[1],
                    base.z + (t * s * k.rates[2]).sin() * k.amplitudes[2],
                );
                transform.rotation += Vec3::from_array(k.spin) * s * steps;
            }
            Animator::Spring(spring) => {
                for _ in 0..clock.steps() {
                    let target = spring.target(base, t, pointer);
                    spring.step(target);
                    let p = spring.params;
                    transform.rotation.x += p.spin[0] + spring.velocity.x * p.velocity_spin;
                    transform.rotation.y += p.spin[1] + spring.velocity.y * p.velocity_spin;
                }
                transform.position = spring.position;
                transform.rotation.z = (t * spring.params.wobble_rate).sin() * spring.params.wobble;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::pointer::PointerMapping;

    fn clock_at(t: f32) -> AnimationClock {
        AnimationClock::at(t)
    }

    #[test]
    fn zero_speed_drift_stays_on_base() {
        let base = Vec3::new(1.0, -2.0, 3.0);
        let pointer = PointerState::default();
        let mut anim = Animator::Drift { params: DriftParams::default(), speed: 0.0 };
        let mut clock = AnimationClock::default();
        let mut xf = NodeTransform::at(base);
        for _ in 0..200 {
            clock.advance(0.37);
            anim.animate(base, &mut xf, &clock, &pointer);
            assert_eq!(xf.position, base);
            assert_eq!(xf.rotation, Vec3::ZERO);
        }
    }

    #[test]
    fn zero_speed_wander_stays_on_base() {
        let base = Vec3::new(-10.0, 5.0, -5.0);
        let pointer = PointerState::default();
        let mut anim = Animator::Wander { params: WanderParams::default(), speed: 0.0 };
        let mut xf = NodeTransform::at(base);
        for t in [0.0, 1.0, 17.5, 1000.0] {
            anim.animate(base, &mut xf, &clock_at(t), &pointer);
            assert_eq!(xf.position, base);
        }
    }

    #[test]
    fn drift_follows_closed_form() {
        let base = Vec3::new(0.0, 1.0, 2.0);
        let k = DriftParams::default();
        let mut anim = Animator::Drift { params: k, speed: 2.0 };
        let mut xf = NodeTransform::at(base);
        let t = 1.25;
        anim.animate(base, &mut xf, &clock_at(t), &PointerState::default());
        assert!((xf.position.x - (t * 2.0 * k.k1).cos() * k.a1).abs() < 1e-6);
        assert!((xf.position.y - (1.0 + (t * 2.0 * k.k2).sin() * k.a2)).abs() < 1e-6);
        assert_eq!(xf.position.z, 2.0);
        assert!((xf.rotation.z - (t * 2.0 * k.k3).sin() * k.wobble).abs() < 1e-6);
    }

    #[test]
    fn drift_rotation_accumulates() {
        let base = Vec3::ZERO;
        let mut anim = Animator::Drift { params: DriftParams::default(), speed: 1.0 };
        let mut clock = AnimationClock::default();
        let mut xf = NodeTransform::default();
        let mut last = 0.0;
        for _ in 0..30 {
            clock.advance(1.0 / 60.0);
            anim.animate(base, &mut xf, &clock, &PointerState::default());
            assert!(xf.rotation.x > last);
            last = xf.rotation.x;
        }
    }

    #[test]
    fn spring_converges_without_overshoot_when_overdamped() {
        let base = Vec3::ZERO;
        let params = SpringParams { damping: 0.5, depth_wave: 0.0, ..SpringParams::default() };
        let mut spring = DampedSpring::new(base, params);
        let mut pointer = PointerState::new(PointerMapping::default());
        pointer.on_pointer_move(1000.0, 0.0, 1000.0, 1000.0);
        let target = spring.target(base, 0.0, &pointer);
        assert_eq!(target, Vec3::new(2.0, 2.0, 0.0));

        let mut last = spring.distance_to(target);
        for _ in 0..500 {
            spring.step(target);
            let d = spring.distance_to(target);
            assert!(d < last, "distance went from {last} to {d}");
            last = d;
        }
        assert!(last < 1e-3);
    }

    #[test]
    fn spring_with_default_damping_never_diverges() {
        let base = Vec3::new(1.0, 1.0, 0.0);
        let params = SpringParams { depth_wave: 0.0, ..SpringParams::default() };
        let mut spring = DampedSpring::new(base, params);
        let target = base + Vec3::new(-2.0, 1.5, 0.0);
        let initial = spring.distance_to(target);

        // Underdamped at 0.95: the distance oscillates, but each swing peak is
        // lower than the last and the whole trajectory stays bounded.
        let mut peaks = Vec::new();
        let mut prev = initial;
        let mut rising = false;
        for _ in 0..4000 {
            spring.step(target);
            let d = spring.distance_to(target);
            assert!(d.is_finite());
            assert!(d <= initial * 2.0, "diverged: {d}");
            // Ignore f32 rounding jitter once the spring has settled.
            if d < prev && rising && prev > 1e-4 {
                peaks.push(prev);
            }
            rising = d > prev;
            prev = d;
        }
        assert!(prev < 1e-3, "did not settle: {prev}");
        for pair in peaks.windows(2) {
            assert!(pair[1] < pair[0], "peaks not shrinking: {peaks:?}");
        }
    }

    #[test]
    fn sanitize_rejects_unstable_damping() {
        let spring = DampedSpring::new(Vec3::ZERO, SpringParams { damping: 1.2, ..SpringParams::default() });
        assert_eq!(spring.params.damping, 0.95);
        let spring = DampedSpring::new(Vec3::ZERO, SpringParams { damping: 0.96, ..SpringParams::default() });
        assert_eq!(spring.params.damping, 0.96);
    }

    #[test]
    fn spring_animator_steps_with_clock() {
        let base = Vec3::new(0.0, 0.0, 0.0);
        let mut anim = Animator::Spring(DampedSpring::new(base, SpringParams::default()));
        let mut pointer = PointerState::default();
        pointer.on_pointer_move(100.0, 50.0, 100.0, 100.0);
        let mut xf = NodeTransform::at(base);
        let mut clock = AnimationClock::default();

        clock.advance(0.001);
        anim.animate(base, &mut xf, &clock, &pointer);
        assert_eq!(xf.position, base, "no sub-step due yet");

        clock.advance(1.0 / 30.0);
        anim.animate(base, &mut xf, &clock, &pointer);
        assert!(xf.position.x > 0.0);
    }

    #[test]
    fn static_ignores_time() {
        let base = Vec3::new(4.0, 4.0, 4.0);
        let mut anim = Animator::Static;
        let mut xf = NodeTransform::default();
        anim.animate(base, &mut xf, &clock_at(99.0), &PointerState::default());
        assert_eq!(xf.position, base);
    }
}
