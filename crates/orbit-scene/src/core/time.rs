/// Monotonic animation clock, advanced once per display frame by the scene runner.
/// Animators only read it.
///
/// Also accumulates fixed sub-steps for the stateful spring animator, so spring
/// motion does not depend on the display refresh rate.
#[derive(Debug, Clone)]
pub struct AnimationClock {
    elapsed: f32,
    frame_dt: f32,
    frames: u64,
    step_dt: f32,
    accumulator: f32,
    steps: u32,
}

impl AnimationClock {
    /// Sub-step rate the spring constants were tuned at.
    pub const DEFAULT_STEP: f32 = 1.0 / 60.0;
    /// Cap on sub-steps per frame (keeps a long stall from replaying seconds of motion).
    pub const MAX_STEPS_PER_FRAME: u32 = 10;

    pub fn new(step_dt: f32) -> Self {
        let step_dt = if step_dt > 0.0 && step_dt.is_finite() { step_dt } else { Self::DEFAULT_STEP };
        Self {
            elapsed: 0.0,
            frame_dt: 0.0,
            frames: 0,
            step_dt,
            accumulator: 0.0,
            steps: 0,
        }
    }

    /// A clock parked at `elapsed` seconds with no pending sub-steps.
    pub fn at(elapsed: f32) -> Self {
        let mut clock = Self::default();
        clock.elapsed = elapsed.max(0.0);
        clock
    }

    /// Advance by one frame of `frame_dt` seconds. Returns the sub-steps due this frame.
    /// Negative or non-finite deltas count as zero; time never runs backwards.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.elapsed += dt;
        self.frame_dt = dt;
        self.frames += 1;

        self.accumulator = (self.accumulator + dt).min(self.step_dt * Self::MAX_STEPS_PER_FRAME as f32);
        let steps = (self.accumulator / self.step_dt) as u32;
        self.accumulator -= steps as f32 * self.step_dt;
        self.steps = steps;
        steps
    }

    /// Seconds since mount.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Duration of the most recent frame.
    pub fn frame_dt(&self) -> f32 {
        self.frame_dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fixed sub-steps due in the current frame.
    pub fn steps(&self) -> u32 {
        self.steps
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(Self::DEFAULT_STEP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_accumulates() {
        let mut clock = AnimationClock::default();
        clock.advance(0.5);
        clock.advance(0.25);
        assert!((clock.elapsed() - 0.75).abs() < 1e-6);
        assert_eq!(clock.frames(), 2);
    }

    #[test]
    fn one_step_per_sixtieth() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.advance(1.0 / 60.0), 1);
    }

    #[test]
    fn partial_frames_carry_over() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.advance(0.008), 0);
        assert_eq!(clock.advance(0.010), 1);
    }

    #[test]
    fn stall_is_capped() {
        let mut clock = AnimationClock::default();
        assert_eq!(clock.advance(2.0), AnimationClock::MAX_STEPS_PER_FRAME);
        assert!((clock.elapsed() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn negative_and_nan_deltas_do_not_rewind() {
        let mut clock = AnimationClock::at(3.0);
        clock.advance(-1.0);
        clock.advance(f32::NAN);
        assert_eq!(clock.elapsed(), 3.0);
        assert_eq!(clock.steps(), 0);
    }
}
