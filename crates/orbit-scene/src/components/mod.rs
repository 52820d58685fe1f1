pub mod animator;
pub mod hover;
pub mod node;
pub mod shape;
