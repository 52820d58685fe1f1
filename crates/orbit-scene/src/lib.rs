pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::config::{
    AnimatorConfig, FloatingNodeConfig, FocalConfig, FocalPulse, FogConfig, LightConfig, LightKind, Limits,
    MaterialConfig, RingConfig, SceneConfig,
};
pub use api::host::{HostListener, ListenerHandle, SceneHost, Subscriptions};
pub use api::mount::{FallbackView, MountController, MountError, MountState, MountedScene};
pub use api::types::{Color, NodeId, RevealId};
pub use assets::texture::{BackdropConfig, TextureSlot};
pub use bridge::protocol::{FrameBuffer, ProtocolLayout, HEADER_FLOATS, PROTOCOL_VERSION};
pub use components::animator::{Animator, AnimatorKind, DampedSpring, DriftParams, NodeTransform, SpringParams, WanderParams};
pub use components::hover::{HoverConfig, HoverState};
pub use components::node::{NodeRole, SceneNode};
pub use components::shape::{build_primitive, Geometry, MaterialStyle, Primitive, ShapeKind};
pub use core::scene::SceneGraph;
pub use core::time::AnimationClock;
pub use input::pointer::{normalize_pointer, PointerMapping, PointerState};
pub use input::queue::{InputEvent, InputQueue};
pub use renderer::camera::{Camera3D, CameraConfig, CameraUniform};
pub use renderer::instance::SceneBuffers;
pub use systems::compose::ComposedScene;
pub use systems::lines::{ConnectionConfig, ConnectionLine};
pub use systems::orbit::{layout_ring, slot_angle, OrbitRing, OrbitSlot, RingLayout, RingMotion, Undulation};
pub use systems::reveal::{ReplayPolicy, RevealController, RevealState, RevealStyle, RevealTrigger, RevealUpdate};
pub use systems::starfield::{StarDistribution, StarField, StarFieldConfig, StarRotation};

pub use extensions::{ease, lerp, Easing, Tween};
