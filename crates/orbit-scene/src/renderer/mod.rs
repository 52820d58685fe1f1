pub mod camera;
pub mod instance;

pub use camera::{Camera3D, CameraConfig, CameraUniform};
pub use instance::{LightInstance, LineVertex, PrimitiveInstance, RingInstance, SceneBuffers, StarVertex};
