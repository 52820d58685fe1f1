// extensions/mod.rs
//
// Interpolation helpers shared by hover, reveal and camera code.
// Decoupled from SceneNode/SceneGraph; callers own their tweens.

pub mod easing;
pub mod tween;

pub use easing::{Easing, lerp, ease};
pub use tween::Tween;
