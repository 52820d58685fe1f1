use serde::{Deserialize, Serialize};

use crate::api::mount::MountError;
use crate::assets::texture::BackdropConfig;
use crate::components::animator::{AnimatorKind, DriftParams, SpringParams, WanderParams};
use crate::components::hover::HoverConfig;
use crate::components::shape::ShapeKind;
use crate::input::pointer::PointerMapping;
use crate::renderer::camera::CameraConfig;
use crate::systems::lines::ConnectionConfig;
use crate::systems::orbit::{RingMotion, Undulation};
use crate::systems::starfield::StarFieldConfig;

/// Surface parameters shared by every node unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub roughness: f32,
    pub metalness: f32,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self { roughness: 0.2, metalness: 0.9, emissive_intensity: 0.3, opacity: 0.9 }
    }
}

/// Which animator nodes get, plus the constants of every variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    pub kind: AnimatorKind,
    /// Speed for nodes that do not set their own.
    pub speed: f32,
    pub drift: DriftParams,
    pub wander: WanderParams,
    pub spring: SpringParams,
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        Self {
            kind: AnimatorKind::default(),
            speed: 1.0,
            drift: DriftParams::default(),
            wander: WanderParams::default(),
            spring: SpringParams::default(),
        }
    }
}

/// Breathing and turning of the focal object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocalPulse {
    pub scale_amplitude: f32,
    pub scale_rate: f32,
    pub glow_base: f32,
    pub glow_amplitude: f32,
    pub glow_rate: f32,
    /// Radians per second of yaw.
    pub spin: f32,
    pub yaw_per_pointer_x: f32,
    pub tilt: f32,
    pub tilt_rate: f32,
    pub pitch_per_pointer_y: f32,
}

impl FocalPulse {
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        Self {
            scale_amplitude: finite_or(self.scale_amplitude, d.scale_amplitude, "focal scale amplitude"),
            scale_rate: finite_or(self.scale_rate, d.scale_rate, "focal scale rate"),
            glow_base: finite_or(self.glow_base, d.glow_base, "focal glow base"),
            glow_amplitude: finite_or(self.glow_amplitude, d.glow_amplitude, "focal glow amplitude"),
            glow_rate: finite_or(self.glow_rate, d.glow_rate, "focal glow rate"),
            spin: finite_or(self.spin, d.spin, "focal spin"),
            yaw_per_pointer_x: finite_or(self.yaw_per_pointer_x, d.yaw_per_pointer_x, "focal yaw per pointer"),
            tilt: finite_or(self.tilt, d.tilt, "focal tilt"),
            tilt_rate: finite_or(self.tilt_rate, d.tilt_rate, "focal tilt rate"),
            pitch_per_pointer_y: finite_or(self.pitch_per_pointer_y, d.pitch_per_pointer_y, "focal pitch per pointer"),
        }
    }
}

impl Default for FocalPulse {
    fn default() -> Self {
        Self {
            scale_amplitude: 0.05,
            scale_rate: 2.0,
            glow_base: 1.2,
            glow_amplitude: 0.1,
            glow_rate: 1.5,
            spin: 0.15,
            yaw_per_pointer_x: 0.3,
            tilt: 0.1,
            tilt_rate: 0.2,
            pitch_per_pointer_y: 0.2,
        }
    }
}

/// The large centred object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FocalConfig {
    pub label: String,
    pub shape: ShapeKind,
    pub size: f32,
    pub color: String,
    pub material: MaterialConfig,
    pub glow_opacity: f32,
    pub pulse: FocalPulse,
}

impl Default for FocalConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            shape: ShapeKind::Icosahedron,
            size: 1.2,
            color: "#ffd93d".to_string(),
            material: MaterialConfig { roughness: 0.1, metalness: 0.9, emissive_intensity: 0.4, opacity: 0.95 },
            glow_opacity: 0.15,
            pulse: FocalPulse::default(),
        }
    }
}

/// One orbit ring and its labeled members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub radius: f32,
    pub height: f32,
    pub phase: f32,
    pub undulation: Option<Undulation>,
    pub color: String,
    pub labels: Vec<String>,
    pub node_size: f32,
    /// Members take shapes from `ShapeKind::CYCLE`, starting at this offset.
    pub shape_offset: usize,
    /// Radians per second of outline yaw.
    pub angular_speed: f32,
    pub opacity: f32,
    pub band: f32,
    pub segments: u32,
    pub carry_members: bool,
    pub motion: RingMotion,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            radius: 5.0,
            height: 0.0,
            phase: 0.0,
            undulation: None,
            color: "#9b87f5".to_string(),
            labels: Vec::new(),
            node_size: 0.6,
            shape_offset: 0,
            angular_speed: 0.1,
            opacity: 0.4,
            band: 0.05,
            segments: 128,
            carry_members: false,
            motion: RingMotion::default(),
        }
    }
}

/// A background node outside any ring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatingNodeConfig {
    pub position: [f32; 3],
    pub color: String,
    pub shape: ShapeKind,
    pub size: f32,
    /// Overrides `AnimatorConfig::speed`.
    pub speed: Option<f32>,
    pub label: String,
    /// Overrides the scene material.
    pub material: Option<MaterialConfig>,
}

impl Default for FloatingNodeConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            color: "#9b87f5".to_string(),
            shape: ShapeKind::Sphere,
            size: 0.4,
            speed: None,
            label: String::new(),
            material: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    #[default]
    Ambient,
    Point,
    Directional,
    Spot,
}

/// Light descriptor handed to the host renderer as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub kind: LightKind,
    pub position: [f32; 3],
    pub intensity: f32,
    pub color: String,
    /// Spot cone half-angle in radians.
    pub angle: f32,
    pub penumbra: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            kind: LightKind::Ambient,
            position: [0.0; 3],
            intensity: 0.4,
            color: "#ffffff".to_string(),
            angle: 0.25,
            penumbra: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogConfig {
    pub color: String,
    pub near: f32,
    pub far: f32,
}

impl Default for FogConfig {
    fn default() -> Self {
        Self { color: "#0a0a1a".to_string(), near: 15.0, far: 60.0 }
    }
}

/// Buffer capacities for the render protocol.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_nodes: usize,
    pub max_rings: usize,
    pub max_stars: usize,
    pub max_line_vertices: usize,
    pub max_lights: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_nodes: 256,
            max_rings: 16,
            max_stars: 16_384,
            max_line_vertices: 512,
            max_lights: 8,
        }
    }
}

/// Everything needed to compose one backdrop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub camera: CameraConfig,
    pub pointer: PointerMapping,
    /// Radians of whole-scene rotation per unit of pointer.
    pub group_parallax: f32,
    pub stars: Option<StarFieldConfig>,
    pub focal: Option<FocalConfig>,
    pub rings: Vec<RingConfig>,
    pub nodes: Vec<FloatingNodeConfig>,
    pub connections: Vec<ConnectionConfig>,
    pub animator: AnimatorConfig,
    pub material: MaterialConfig,
    pub hover: HoverConfig,
    pub lights: Vec<LightConfig>,
    pub fog: Option<FogConfig>,
    pub backdrop: Option<BackdropConfig>,
    pub limits: Limits,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            pointer: PointerMapping::default(),
            group_parallax: 0.1,
            stars: Some(StarFieldConfig::default()),
            focal: Some(FocalConfig::default()),
            rings: Vec::new(),
            nodes: Vec::new(),
            connections: Vec::new(),
            animator: AnimatorConfig::default(),
            material: MaterialConfig::default(),
            hover: HoverConfig::default(),
            lights: vec![LightConfig::default()],
            fog: None,
            backdrop: None,
            limits: Limits::default(),
        }
    }
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON config and sanitize it.
    pub fn from_json(json: &str) -> Result<Self, MountError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    pub fn to_json(&self) -> Result<String, MountError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Replace out-of-range numbers with usable values, warning for each.
    pub fn sanitized(mut self) -> Self {
        self.animator.spring = self.animator.spring.sanitized();
        self.animator.drift = self.animator.drift.sanitized();
        self.animator.wander = self.animator.wander.sanitized();
        self.hover = self.hover.sanitized();
        if !self.animator.speed.is_finite() {
            log::warn!("animator speed {} is not finite, using 0", self.animator.speed);
            self.animator.speed = 0.0;
        }
        if !self.group_parallax.is_finite() {
            log::warn!("group parallax {} is not finite, using 0", self.group_parallax);
            self.group_parallax = 0.0;
        }
        if !(self.pointer.scale.is_finite() && self.pointer.scale >= 0.0) {
            log::warn!("pointer scale {} out of range, using 1", self.pointer.scale);
            self.pointer.scale = 1.0;
        }
        for (i, ring) in self.rings.iter_mut().enumerate() {
            if !(ring.radius.is_finite() && ring.radius > 0.0) {
                log::warn!("ring {i} radius {} is not positive, using 1", ring.radius);
                ring.radius = 1.0;
            }
            if !(ring.node_size.is_finite() && ring.node_size > 0.0) {
                log::warn!("ring {i} node size {} is not positive, using 0.5", ring.node_size);
                ring.node_size = 0.5;
            }
            if !ring.phase.is_finite() {
                ring.phase = 0.0;
            }
            if !ring.height.is_finite() {
                ring.height = 0.0;
            }
            if ring.segments < 3 {
                ring.segments = 3;
            }
            let d = RingConfig::default();
            ring.angular_speed = finite_or(ring.angular_speed, d.angular_speed, "ring angular speed");
            ring.opacity = finite_or(ring.opacity, d.opacity, "ring opacity");
            ring.band = finite_or(ring.band, d.band, "ring band");
            if let Some(u) = &mut ring.undulation {
                u.amplitude = finite_or(u.amplitude, 0.0, "ring undulation amplitude");
                u.frequency = finite_or(u.frequency, 0.0, "ring undulation frequency");
            }
            let m = RingMotion::default();
            let motion = &mut ring.motion;
            motion.yaw_per_pointer_x = finite_or(motion.yaw_per_pointer_x, m.yaw_per_pointer_x, "ring yaw per pointer x");
            motion.yaw_per_pointer_y = finite_or(motion.yaw_per_pointer_y, m.yaw_per_pointer_y, "ring yaw per pointer y");
            motion.pitch_per_pointer_y =
                finite_or(motion.pitch_per_pointer_y, m.pitch_per_pointer_y, "ring pitch per pointer y");
            motion.tilt = finite_or(motion.tilt, m.tilt, "ring tilt");
            motion.tilt_rate = finite_or(motion.tilt_rate, m.tilt_rate, "ring tilt rate");
        }
        for (i, node) in self.nodes.iter_mut().enumerate() {
            if !(node.size.is_finite() && node.size > 0.0) {
                log::warn!("node {i} size {} is not positive, using 0.4", node.size);
                node.size = 0.4;
            }
            if node.position.iter().any(|v| !v.is_finite()) {
                log::warn!("node {i} position is not finite, using origin");
                node.position = [0.0; 3];
            }
            if let Some(speed) = node.speed.filter(|v| !v.is_finite()) {
                log::warn!("node {i} speed {speed} is not finite, using the animator speed");
                node.speed = None;
            }
        }
        if let Some(focal) = &mut self.focal {
            if !(focal.size.is_finite() && focal.size > 0.0) {
                log::warn!("focal size {} is not positive, using 1.2", focal.size);
                focal.size = 1.2;
            }
            focal.glow_opacity = finite_or(focal.glow_opacity, 0.15, "focal glow opacity");
            focal.pulse = focal.pulse.sanitized();
        }
        if let Some(stars) = &mut self.stars {
            let r = &mut stars.rotation;
            r.rate_x = finite_or(r.rate_x, 0.0, "star rotation rate x");
            r.rate_y = finite_or(r.rate_y, 0.0, "star rotation rate y");
            r.pointer_x = finite_or(r.pointer_x, 0.0, "star pointer parallax x");
            r.pointer_y = finite_or(r.pointer_y, 0.0, "star pointer parallax y");
        }
        if let Some(fog) = &mut self.fog {
            if !(fog.near >= 0.0 && fog.far > fog.near) {
                log::warn!("fog range {}..{} is empty, using 15..60", fog.near, fog.far);
                fog.near = 15.0;
                fog.far = 60.0;
            }
        }
        let node_count = self.nodes.len()
            + self.rings.iter().map(|r| r.labels.len()).sum::<usize>()
            + usize::from(self.focal.is_some());
        if node_count > self.limits.max_nodes {
            log::warn!("{node_count} nodes exceed capacity {}, raising it", self.limits.max_nodes);
            self.limits.max_nodes = node_count;
        }
        if self.rings.len() > self.limits.max_rings {
            self.limits.max_rings = self.rings.len();
        }
        let line_vertices = self.connections.len() * 2;
        if line_vertices > self.limits.max_line_vertices {
            self.limits.max_line_vertices = line_vertices;
        }
        if self.lights.len() > self.limits.max_lights {
            log::warn!("{} lights exceed capacity {}, dropping the rest", self.lights.len(), self.limits.max_lights);
            self.lights.truncate(self.limits.max_lights);
        }
        self
    }
}

/// `value` when finite, otherwise `fallback` with a warning naming the field.
pub(crate) fn finite_or(value: f32, fallback: f32, what: &str) -> f32 {
    if value.is_finite() {
        value
    } else {
        log::warn!("{what} {value} is not finite, using {fallback}");
        fallback
    }
}

pub(crate) fn finite_array<const N: usize>(values: [f32; N], fallback: [f32; N], what: &str) -> [f32; N] {
    std::array::from_fn(|i| finite_or(values[i], fallback[i], what))
}
