// extensions/tween.rs
//
// Scalar tween with retargeting. Hover glow, emissive and scale plus reveal
// opacity/offset all run through this.
//
// Usage:
//   let mut glow = Tween::settled(0.08);
//   glow.retarget(0.2, 0.35, Easing::BackOut);
//   glow.advance(dt);
//   let opacity = glow.value();

use super::easing::{ease, Easing};

/// A single animated value moving from `from` to `to` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f32,
    to: f32,
    /// Duration in seconds.
    duration: f32,
    /// Elapsed time, excluding the start delay.
    elapsed: f32,
    /// Seconds left before the tween starts moving.
    delay: f32,
    easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
            delay: 0.0,
            easing,
        }
    }

    /// A tween already at rest on `value`.
    pub fn settled(value: f32) -> Self {
        Self::new(value, value, 0.0, Easing::Linear)
    }

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Start a new transition from the current interpolated value, so a
    /// reversal mid-flight continues smoothly instead of jumping.
    pub fn retarget(&mut self, to: f32, duration: f32, easing: Easing) {
        self.from = self.value();
        self.to = to;
        self.duration = duration.max(0.0);
        self.elapsed = 0.0;
        self.delay = 0.0;
        self.easing = easing;
    }

    /// Like `retarget`, but waits `delay` seconds before moving.
    pub fn retarget_delayed(&mut self, to: f32, duration: f32, easing: Easing, delay: f32) {
        self.retarget(to, duration, easing);
        self.delay = delay.max(0.0);
    }

    /// Advance by `dt` seconds. Returns true while the value is still changing.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.is_complete() {
            return false;
        }
        let mut dt = dt.max(0.0);
        if self.delay > 0.0 {
            let consumed = dt.min(self.delay);
            self.delay -= consumed;
            dt -= consumed;
        }
        self.elapsed = (self.elapsed + dt).min(self.duration);
        true
    }

    /// Normalized progress [0, 1].
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn value(&self) -> f32 {
        ease(self.from, self.to, self.progress(), self.easing)
    }

    pub fn target(&self) -> f32 {
        self.to
    }

    pub fn is_complete(&self) -> bool {
        self.delay <= 0.0 && self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_tween_reaches_target() {
        let mut t = Tween::new(0.0, 10.0, 1.0, Easing::Linear);
        t.advance(0.5);
        assert!((t.value() - 5.0).abs() < 1e-4);
        t.advance(0.5);
        assert!((t.value() - 10.0).abs() < 1e-4);
        assert!(t.is_complete());
        assert!(!t.advance(0.1));
    }

    #[test]
    fn retarget_continues_from_current_value() {
        let mut t = Tween::new(0.0, 1.0, 1.0, Easing::Linear);
        t.advance(0.25);
        t.retarget(0.0, 1.0, Easing::Linear);
        assert!((t.value() - 0.25).abs() < 1e-4);
        t.advance(1.0);
        assert!(t.value().abs() < 1e-4);
    }

    #[test]
    fn delay_holds_start_value() {
        let mut t = Tween::new(0.0, 1.0, 0.5, Easing::Linear).with_delay(0.2);
        t.advance(0.1);
        assert_eq!(t.value(), 0.0);
        assert!(!t.is_complete());
        t.advance(0.35);
        assert!((t.value() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn zero_duration_snaps() {
        let t = Tween::new(2.0, 3.0, 0.0, Easing::Linear);
        assert_eq!(t.value(), 3.0);
        assert!(t.is_complete());
    }

    #[test]
    fn settled_tween_is_idle() {
        let mut t = Tween::settled(0.4);
        assert!(!t.advance(1.0));
        assert_eq!(t.value(), 0.4);
    }
}
