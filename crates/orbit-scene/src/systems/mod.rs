pub mod compose;
pub mod lines;
pub mod orbit;
pub mod render;
pub mod reveal;
pub mod rng;
pub mod starfield;
