use serde::{Deserialize, Serialize};

use crate::api::types::{Color, NodeId};

/// A connection between two labeled nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub from: String,
    pub to: String,
    pub color: String,
    pub opacity: f32,
    pub pulse_amplitude: f32,
    /// Radians per second.
    pub pulse_rate: f32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            from: String::new(),
            to: String::new(),
            color: "#4ecdc4".to_string(),
            opacity: 0.3,
            pulse_amplitude: 0.1,
            pulse_rate: 2.0,
        }
    }
}

/// A resolved line segment between two nodes. Endpoints follow the nodes'
/// animated positions; only opacity is computed here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionLine {
    pub from: NodeId,
    pub to: NodeId,
    pub color: Color,
    pub base_opacity: f32,
    pub pulse_amplitude: f32,
    pub pulse_rate: f32,
    /// Opacity for this frame.
    pub opacity: f32,
}

impl ConnectionLine {
    pub fn new(from: NodeId, to: NodeId, config: &ConnectionConfig) -> Self {
        let base_opacity = config.opacity.clamp(0.0, 1.0);
        Self {
            from,
            to,
            color: Color::from_hex_or_neutral(&config.color),
            base_opacity,
            pulse_amplitude: config.pulse_amplitude.abs(),
            pulse_rate: config.pulse_rate,
            opacity: base_opacity,
        }
    }

    /// `base + sin(t·rate)·amplitude`, clamped to [0, 1].
    pub fn animate(&mut self, t: f32) {
        self.opacity = (self.base_opacity + (t * self.pulse_rate).sin() * self.pulse_amplitude).clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_pulses_around_base() {
        let mut line = ConnectionLine::new(NodeId(1), NodeId(2), &ConnectionConfig::default());
        line.animate(0.0);
        assert!((line.opacity - 0.3).abs() < 1e-6);
        line.animate(std::f32::consts::FRAC_PI_4);
        assert!((line.opacity - 0.4).abs() < 1e-5);
    }

    #[test]
    fn opacity_is_clamped() {
        let config = ConnectionConfig { opacity: 0.95, pulse_amplitude: 0.5, ..ConnectionConfig::default() };
        let mut line = ConnectionLine::new(NodeId(1), NodeId(2), &config);
        for i in 0..100 {
            line.animate(i as f32 * 0.1);
            assert!((0.0..=1.0).contains(&line.opacity));
        }
    }
}
