use serde::{Deserialize, Serialize};

use crate::api::config::finite_or;
use crate::extensions::{Easing, Tween};

/// Emissive, glow and scale levels for a node at rest and under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    pub idle_emissive: f32,
    pub hover_emissive: f32,
    pub idle_glow: f32,
    pub hover_glow: f32,
    pub idle_scale: f32,
    pub hover_scale: f32,
    /// Seconds for a transition to settle.
    pub duration: f32,
    pub easing: Easing,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            idle_emissive: 0.3,
            hover_emissive: 0.6,
            idle_glow: 0.08,
            hover_glow: 0.2,
            idle_scale: 1.0,
            hover_scale: 1.2,
            duration: 0.35,
            easing: Easing::BackOut,
        }
    }
}

impl HoverConfig {
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let positive = |v: f32, fallback: f32, what: &str| {
            let v = finite_or(v, fallback, what);
            if v > 0.0 { v } else { fallback }
        };
        Self {
            idle_emissive: finite_or(self.idle_emissive, d.idle_emissive, "hover idle emissive"),
            hover_emissive: finite_or(self.hover_emissive, d.hover_emissive, "hover emissive"),
            idle_glow: finite_or(self.idle_glow, d.idle_glow, "hover idle glow"),
            hover_glow: finite_or(self.hover_glow, d.hover_glow, "hover glow"),
            idle_scale: positive(self.idle_scale, d.idle_scale, "hover idle scale"),
            hover_scale: positive(self.hover_scale, d.hover_scale, "hover scale"),
            duration: finite_or(self.duration, d.duration, "hover duration"),
            easing: self.easing,
        }
    }
}

/// Pointer-over state of a node plus the three values it drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoverState {
    hovered: bool,
    emissive: Tween,
    glow: Tween,
    scale: Tween,
    config: HoverConfig,
}

impl HoverState {
    pub fn new(config: HoverConfig) -> Self {
        Self {
            hovered: false,
            emissive: Tween::settled(config.idle_emissive),
            glow: Tween::settled(config.idle_glow),
            scale: Tween::settled(config.idle_scale),
            config,
        }
    }

    /// Flip the hover flag. Repeating the current state does not restart the tween.
    pub fn set_hovered(&mut self, hovered: bool) {
        if hovered == self.hovered {
            return;
        }
        self.hovered = hovered;
        let c = &self.config;
        let (emissive, glow, scale) = if hovered {
            (c.hover_emissive, c.hover_glow, c.hover_scale)
        } else {
            (c.idle_emissive, c.idle_glow, c.idle_scale)
        };
        self.emissive.retarget(emissive, c.duration, c.easing);
        self.glow.retarget(glow, c.duration, c.easing);
        self.scale.retarget(scale, c.duration, c.easing);
    }

    pub fn advance(&mut self, dt: f32) {
        self.emissive.advance(dt);
        self.glow.advance(dt);
        self.scale.advance(dt);
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Current emissive intensity. Can briefly exceed the target while overshooting.
    pub fn emissive(&self) -> f32 {
        self.emissive.value().max(0.0)
    }

    /// Current glow overlay opacity.
    pub fn glow_opacity(&self) -> f32 {
        self.glow.value().clamp(0.0, 1.0)
    }

    /// Scale factor multiplied into the node's transform.
    pub fn scale(&self) -> f32 {
        self.scale.value().max(0.0)
    }

    pub fn is_settled(&self) -> bool {
        self.emissive.is_complete() && self.glow.is_complete() && self.scale.is_complete()
    }
}

impl Default for HoverState {
    fn default() -> Self {
        Self::new(HoverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_does_not_snap() {
        let mut hover = HoverState::default();
        hover.set_hovered(true);
        assert!((hover.emissive() - 0.3).abs() < 1e-6, "starts from idle");
        hover.advance(0.05);
        let partway = hover.emissive();
        assert!(partway > 0.3 && partway < 0.6 + 0.2);
        hover.advance(1.0);
        assert!((hover.emissive() - 0.6).abs() < 1e-5);
        assert!((hover.glow_opacity() - 0.2).abs() < 1e-5);
        assert!(hover.is_settled());
    }

    #[test]
    fn overshoots_on_the_way_in() {
        let mut hover = HoverState::default();
        hover.set_hovered(true);
        let mut peak = 0.0_f32;
        for _ in 0..35 {
            hover.advance(0.01);
            peak = peak.max(hover.emissive());
        }
        assert!(peak > 0.6, "expected overshoot past 0.6, peak {peak}");
    }

    #[test]
    fn leave_returns_to_idle() {
        let mut hover = HoverState::default();
        hover.set_hovered(true);
        hover.advance(0.1);
        hover.set_hovered(false);
        hover.advance(1.0);
        assert!((hover.emissive() - 0.3).abs() < 1e-5);
        assert!((hover.glow_opacity() - 0.08).abs() < 1e-5);
        assert!(!hover.is_hovered());
    }

    #[test]
    fn scale_overshoots_then_settles() {
        let mut hover = HoverState::default();
        assert_eq!(hover.scale(), 1.0);
        hover.set_hovered(true);
        let mut peak = 0.0_f32;
        for _ in 0..30 {
            hover.advance(1.0 / 60.0);
            peak = peak.max(hover.scale());
        }
        assert!(peak > 1.2, "expected overshoot past 1.2, peak {peak}");
        assert!((hover.scale() - 1.2).abs() < 1e-5);

        hover.set_hovered(false);
        hover.advance(1.0);
        assert!((hover.scale() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sanitize_rejects_non_positive_scale() {
        let config = HoverConfig { hover_scale: 0.0, idle_scale: f32::NAN, ..HoverConfig::default() }.sanitized();
        assert_eq!(config.hover_scale, 1.2);
        assert_eq!(config.idle_scale, 1.0);
    }

    #[test]
    fn repeated_enter_keeps_progress() {
        let mut hover = HoverState::default();
        hover.set_hovered(true);
        hover.advance(0.2);
        let before = hover.emissive();
        hover.set_hovered(true);
        assert_eq!(hover.emissive(), before);
    }
}
