//! Scene composer: turns a `SceneConfig` into a complete scene graph with a
//! star field, focal object, orbit rings, floating nodes and connection lines,
//! then animates all of it once per frame.

use glam::{Vec2, Vec3};

use crate::api::config::{FocalPulse, LightKind, MaterialConfig, SceneConfig};
use crate::api::types::{Color, NodeId};
use crate::assets::texture::{BackdropConfig, TextureSlot};
use crate::components::animator::Animator;
use crate::components::hover::{HoverConfig, HoverState};
use crate::components::node::{NodeRole, SceneNode};
use crate::components::shape::{MaterialStyle, ShapeKind};
use crate::core::scene::SceneGraph;
use crate::core::time::AnimationClock;
use crate::input::pointer::PointerState;
use crate::systems::lines::ConnectionLine;
use crate::systems::orbit::{layout_ring, OrbitRing, RingLayout};
use crate::systems::starfield::StarField;

/// Texture slot id of the backdrop image in `InputEvent::TextureLoaded`.
pub const BACKDROP_SLOT: u32 = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub position: Vec3,
    pub intensity: f32,
    pub color: Color,
    pub angle: f32,
    pub penumbra: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Color,
    pub near: f32,
    pub far: f32,
}

/// Optional textured plane behind everything else.
#[derive(Debug, Clone)]
pub struct Backdrop {
    pub config: BackdropConfig,
    pub slot: TextureSlot,
    /// In-plane rotation for this frame.
    pub spin_angle: f32,
}

/// Pulse state of the focal node.
#[derive(Debug, Clone, Copy)]
pub struct FocalState {
    pub node: NodeId,
    pub pulse: FocalPulse,
    pub glow_opacity: f32,
}

pub struct ComposedScene {
    pub graph: SceneGraph,
    pub rings: Vec<OrbitRing>,
    pub stars: Option<StarField>,
    pub lines: Vec<ConnectionLine>,
    pub focal: Option<FocalState>,
    pub lights: Vec<Light>,
    pub fog: Option<Fog>,
    pub backdrop: Option<Backdrop>,
    pub group_parallax: f32,
    /// Whole-scene rotation for this frame: (x, y) radians.
    pub group_rotation: Vec2,
    /// Label table; `SceneNode::label` strings in insertion order.
    labels: Vec<String>,
    label_of: Vec<(NodeId, usize)>,
}

fn material(color: Color, m: &MaterialConfig) -> MaterialStyle {
    MaterialStyle::new(color, m.roughness, m.metalness, m.emissive_intensity, m.opacity)
}

/// Hover levels for a node whose resting emissive is `emissive`: the hover
/// step is kept from the scene config, the base follows the node's material.
fn hover_for(emissive: f32, hover: &HoverConfig) -> HoverState {
    HoverState::new(HoverConfig {
        idle_emissive: emissive,
        hover_emissive: emissive + (hover.hover_emissive - hover.idle_emissive),
        ..*hover
    })
}

impl ComposedScene {
    pub fn compose(config: &SceneConfig) -> Self {
        let mut graph = SceneGraph::with_capacity(config.limits.max_nodes);
        let anim = &config.animator;
        let build_animator = |base: Vec3, speed: f32| {
            Animator::build(anim.kind, base, speed, anim.drift, anim.wander, anim.spring)
        };

        let focal = config.focal.as_ref().map(|f| {
            let id = graph.next_id();
            let color = Color::from_hex_or_neutral(&f.color);
            let node = SceneNode::new(id, NodeRole::Focal, Vec3::ZERO, f.shape, f.size, material(color, &f.material))
                .with_label(f.label.clone())
                .with_hover(HoverState::new(HoverConfig {
                    idle_emissive: f.material.emissive_intensity,
                    hover_emissive: f.material.emissive_intensity,
                    idle_glow: f.glow_opacity,
                    hover_glow: f.glow_opacity,
                    ..config.hover
                }))
                .with_glow_scale(f.pulse.glow_base);
            graph.insert(node);
            FocalState { node: id, pulse: f.pulse, glow_opacity: f.glow_opacity }
        });

        let mut rings = Vec::with_capacity(config.rings.len());
        for (ring_index, rc) in config.rings.iter().enumerate() {
            let color = Color::from_hex_or_neutral(&rc.color);
            let layout = RingLayout {
                radius: rc.radius,
                height: rc.height,
                phase: rc.phase,
                undulation: rc.undulation,
            };
            let mut members = Vec::with_capacity(rc.labels.len());
            for slot in layout_ring(&rc.labels, &layout) {
                let id = graph.next_id();
                let shape = ShapeKind::cycled(slot.index, rc.shape_offset);
                let node = SceneNode::new(
                    id,
                    NodeRole::OrbitMember { ring: ring_index },
                    slot.position,
                    shape,
                    rc.node_size,
                    material(color, &config.material),
                )
                .with_label(slot.label)
                .with_animator(build_animator(slot.position, anim.speed))
                .with_hover(hover_for(config.material.emissive_intensity, &config.hover));
                graph.insert(node);
                members.push(id);
            }
            rings.push(OrbitRing {
                radius: rc.radius,
                height_offset: rc.height,
                angular_speed: rc.angular_speed,
                color,
                opacity: rc.opacity.clamp(0.0, 1.0),
                band: rc.band.max(0.0),
                segments: rc.segments,
                carry_members: rc.carry_members,
                motion: rc.motion,
                members,
                rotation: Vec2::ZERO,
            });
        }

        for nc in &config.nodes {
            let id = graph.next_id();
            let base = Vec3::from_array(nc.position);
            let m = nc.material.unwrap_or(config.material);
            let node = SceneNode::new(id, NodeRole::Floating, base, nc.shape, nc.size, material(Color::from_hex_or_neutral(&nc.color), &m))
                .with_label(nc.label.clone())
                .with_animator(build_animator(base, nc.speed.unwrap_or(anim.speed)))
                .with_hover(hover_for(m.emissive_intensity, &config.hover));
            graph.insert(node);
        }

        let mut lines = Vec::with_capacity(config.connections.len());
        for cc in &config.connections {
            match (graph.find_by_label(&cc.from), graph.find_by_label(&cc.to)) {
                (Some(a), Some(b)) => lines.push(ConnectionLine::new(a.id, b.id, cc)),
                _ => log::warn!("connection {:?} -> {:?} names an unknown node, skipped", cc.from, cc.to),
            }
        }

        let stars = config.stars.as_ref().map(|s| StarField::generate(s, config.limits.max_stars));

        let lights = config
            .lights
            .iter()
            .map(|l| Light {
                kind: l.kind,
                position: Vec3::from_array(l.position),
                intensity: l.intensity.max(0.0),
                color: Color::from_hex_or_neutral(&l.color),
                angle: l.angle,
                penumbra: l.penumbra.clamp(0.0, 1.0),
            })
            .collect();

        let fog = config.fog.as_ref().map(|f| Fog {
            color: Color::from_hex_or_neutral(&f.color),
            near: f.near,
            far: f.far,
        });

        let backdrop = config.backdrop.as_ref().and_then(|b| {
            let slot = TextureSlot::for_path(&b.path);
            (slot != TextureSlot::None).then(|| Backdrop { config: b.clone(), slot, spin_angle: 0.0 })
        });

        let mut labels = Vec::new();
        let mut label_of = Vec::new();
        for node in graph.iter() {
            if let Some(label) = &node.label {
                label_of.push((node.id, labels.len()));
                labels.push(label.clone());
            }
        }

        log::debug!(
            "composed scene: {} nodes, {} rings, {} stars, {} lines",
            graph.len(),
            rings.len(),
            stars.as_ref().map_or(0, |s: &StarField| s.len()),
            lines.len()
        );

        Self {
            graph,
            rings,
            stars,
            lines,
            focal,
            lights,
            fog,
            backdrop,
            group_parallax: config.group_parallax,
            group_rotation: Vec2::ZERO,
            labels,
            label_of,
        }
    }

    /// Advance every animated part to the clock's current time.
    pub fn animate(&mut self, clock: &AnimationClock, pointer: &PointerState) {
        let t = clock.elapsed();

        self.group_rotation = Vec2::new(pointer.y(), pointer.x()) * self.group_parallax;

        if let Some(stars) = &mut self.stars {
            stars.animate(t, pointer);
        }
        for ring in &mut self.rings {
            ring.animate(t, pointer);
        }

        for node in self.graph.iter_mut() {
            match node.role {
                NodeRole::OrbitMember { ring } => {
                    let carry = self.rings.get(ring).map(|r| r.carry(t)).unwrap_or_default();
                    let base = carry * node.base_position;
                    node.animate_around(base, clock, pointer);
                }
                _ => node.animate(clock, pointer),
            }
        }

        if let Some(focal) = self.focal {
            if let Some(node) = self.graph.get_mut(focal.node) {
                let p = &focal.pulse;
                let pulse = 1.0 + (t * p.scale_rate).sin() * p.scale_amplitude;
                node.transform.scale = pulse * node.hover.scale();
                node.transform.rotation = Vec3::new(
                    (t * p.tilt_rate).sin() * p.tilt + pointer.y() * p.pitch_per_pointer_y,
                    t * p.spin + pointer.x() * p.yaw_per_pointer_x,
                    0.0,
                );
                node.glow_scale = p.glow_base + (t * p.glow_rate).sin() * p.glow_amplitude;
            }
        }

        for line in &mut self.lines {
            line.animate(t);
        }

        if let Some(backdrop) = &mut self.backdrop {
            backdrop.spin_angle = t * backdrop.config.spin;
        }
    }

    /// Pointer entered or left a node. Returns false for unknown ids.
    pub fn set_hover(&mut self, id: NodeId, hovered: bool) -> bool {
        match self.graph.get_mut(id) {
            Some(node) => {
                node.hover.set_hovered(hovered);
                true
            }
            None => false,
        }
    }

    pub fn texture_loaded(&mut self, slot: u32) {
        if let (BACKDROP_SLOT, Some(backdrop)) = (slot, &mut self.backdrop) {
            backdrop.slot.resolve_loaded();
        }
    }

    pub fn texture_failed(&mut self, slot: u32) {
        if let (BACKDROP_SLOT, Some(backdrop)) = (slot, &mut self.backdrop) {
            backdrop.slot.resolve_failed();
        }
    }

    /// The texture the host should start loading, if any.
    pub fn pending_texture(&self) -> Option<(u32, &str)> {
        match &self.backdrop {
            Some(Backdrop { slot: TextureSlot::Pending { path }, .. }) => Some((BACKDROP_SLOT, path.as_str())),
            _ => None,
        }
    }

    pub fn texture_slot(&self) -> &TextureSlot {
        const NONE: &TextureSlot = &TextureSlot::None;
        self.backdrop.as_ref().map_or(NONE, |b| &b.slot)
    }

    /// Animated position of a node this frame.
    pub fn node_position(&self, id: NodeId) -> Option<Vec3> {
        self.graph.get(id).map(|n| n.transform.position)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_index(&self, id: NodeId) -> Option<usize> {
        self.label_of.iter().find(|(n, _)| *n == id).map(|(_, i)| *i)
    }

    pub fn focal_node(&self) -> Option<&SceneNode> {
        self.focal.and_then(|f| self.graph.get(f.node))
    }
}
