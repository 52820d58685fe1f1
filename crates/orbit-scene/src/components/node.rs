use glam::Vec3;

use crate::api::types::{Color, NodeId};
use crate::components::animator::{Animator, NodeTransform};
use crate::components::hover::HoverState;
use crate::components::shape::{build_primitive, MaterialStyle, Primitive, ShapeKind};
use crate::core::time::AnimationClock;
use crate::input::pointer::PointerState;

/// What part of the composition a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// The large centred object.
    Focal,
    /// Member of orbit ring `ring` (index into the composed rings).
    OrbitMember { ring: usize },
    /// Free-floating background object.
    Floating,
}

/// A drawable object in the scene.
/// Everything except `transform`, `hover` and the animator's own state is fixed at mount.
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub id: NodeId,
    pub role: NodeRole,
    pub base_position: Vec3,
    pub color: Color,
    pub shape: ShapeKind,
    pub size: f32,
    pub label: Option<String>,
    pub primitive: Primitive,
    pub animator: Animator,
    pub hover: HoverState,
    pub transform: NodeTransform,
    /// Glow overlay scale relative to the node size.
    pub glow_scale: f32,
}

impl SceneNode {
    pub fn new(id: NodeId, role: NodeRole, base_position: Vec3, shape: ShapeKind, size: f32, material: MaterialStyle) -> Self {
        Self {
            id,
            role,
            base_position,
            color: material.color,
            shape,
            size,
            label: None,
            primitive: build_primitive(shape, size, material),
            animator: Animator::Static,
            hover: HoverState::default(),
            transform: NodeTransform::at(base_position),
            glow_scale: 1.8,
        }
    }

    // -- Builder pattern --

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        self.label = if label.is_empty() { None } else { Some(label) };
        self
    }

    pub fn with_animator(mut self, animator: Animator) -> Self {
        self.animator = animator;
        self
    }

    pub fn with_hover(mut self, hover: HoverState) -> Self {
        self.hover = hover;
        self
    }

    pub fn with_glow_scale(mut self, glow_scale: f32) -> Self {
        self.glow_scale = glow_scale;
        self
    }

    /// Run the animator and hover transition for this frame.
    pub fn animate(&mut self, clock: &AnimationClock, pointer: &PointerState) {
        self.animate_around(self.base_position, clock, pointer);
    }

    /// Like `animate`, but anchored at `base` instead of the mount-time position
    /// (ring members carried around by their ring).
    pub fn animate_around(&mut self, base: Vec3, clock: &AnimationClock, pointer: &PointerState) {
        self.animator.animate(base, &mut self.transform, clock, pointer);
        self.hover.advance(clock.frame_dt());
        self.transform.scale = self.hover.scale();
    }

    /// Emissive intensity for this frame, hover transition included.
    pub fn emissive(&self) -> f32 {
        self.hover.emissive()
    }
}
