use bytemuck::{Pod, Zeroable};

/// Per-node render data read by the TypeScript renderer.
/// Must match the TypeScript protocol: 20 floats = 80 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct PrimitiveInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Euler rotation in radians, XYZ order.
    pub rot_x: f32,
    pub rot_y: f32,
    pub rot_z: f32,
    /// Uniform scale on top of `size`.
    pub scale: f32,
    /// Canonical shape size (radius / edge / major radius).
    pub size: f32,
    /// `ShapeKind::wire_code`.
    pub shape: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: f32,
    pub opacity: f32,
    /// Glow overlay opacity (0 = no halo).
    pub glow_opacity: f32,
    /// Glow overlay scale relative to `size`.
    pub glow_scale: f32,
    /// Index into the label table, or -1 for unlabeled nodes.
    pub label_index: f32,
    pub _pad: f32,
}

impl PrimitiveInstance {
    pub const FLOATS: usize = 20;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// One ring outline: a flat annulus rotated by (pitch, yaw).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct RingInstance {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub height: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    pub segments: f32,
    pub _pad: [f32; 2],
}

impl RingInstance {
    pub const FLOATS: usize = 12;
}

/// Star point in field-local space; the field rotation lives in the header.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct StarVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl StarVertex {
    pub const FLOATS: usize = 6;
}

/// Connection line endpoint. Two consecutive vertices form one segment.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
    pub _pad: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 8;
}

/// Light descriptor: kind, position, color, intensity, spot cone.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct LightInstance {
    /// 0 ambient, 1 point, 2 directional, 3 spot.
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    pub angle: f32,
    pub penumbra: f32,
    pub _pad: [f32; 2],
}

impl LightInstance {
    pub const FLOATS: usize = 12;
}

/// Per-frame output buffers the host reads by pointer.
pub struct SceneBuffers {
    pub primitives: Vec<PrimitiveInstance>,
    pub rings: Vec<RingInstance>,
    /// Written once per mount; stars never move relative to their field.
    pub stars: Vec<StarVertex>,
    pub lines: Vec<LineVertex>,
    pub lights: Vec<LightInstance>,
}

impl SceneBuffers {
    pub fn new() -> Self {
        Self {
            primitives: Vec::with_capacity(64),
            rings: Vec::with_capacity(8),
            stars: Vec::new(),
            lines: Vec::with_capacity(64),
            lights: Vec::with_capacity(8),
        }
    }

    /// Clear per-frame data. Stars are kept.
    pub fn clear_frame(&mut self) {
        self.primitives.clear();
        self.rings.clear();
        self.lines.clear();
        self.lights.clear();
    }

    pub fn clear(&mut self) {
        self.clear_frame();
        self.stars.clear();
    }

    pub fn primitive_count(&self) -> u32 {
        self.primitives.len() as u32
    }

    pub fn ring_count(&self) -> u32 {
        self.rings.len() as u32
    }

    pub fn star_count(&self) -> u32 {
        self.stars.len() as u32
    }

    /// Vertex count; segments are half of this.
    pub fn line_vertex_count(&self) -> u32 {
        self.lines.len() as u32
    }

    pub fn primitives_ptr(&self) -> *const f32 {
        self.primitives.as_ptr() as *const f32
    }

    pub fn rings_ptr(&self) -> *const f32 {
        self.rings.as_ptr() as *const f32
    }

    pub fn stars_ptr(&self) -> *const f32 {
        self.stars.as_ptr() as *const f32
    }

    pub fn lines_ptr(&self) -> *const f32 {
        self.lines.as_ptr() as *const f32
    }
}

impl Default for SceneBuffers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_sizes() {
        assert_eq!(std::mem::size_of::<PrimitiveInstance>(), PrimitiveInstance::FLOATS * 4);
        assert_eq!(std::mem::size_of::<RingInstance>(), RingInstance::FLOATS * 4);
        assert_eq!(std::mem::size_of::<StarVertex>(), StarVertex::FLOATS * 4);
        assert_eq!(std::mem::size_of::<LineVertex>(), LineVertex::FLOATS * 4);
        assert_eq!(std::mem::size_of::<LightInstance>(), LightInstance::FLOATS * 4);
    }

    #[test]
    fn clear_frame_keeps_stars() {
        let mut buf = SceneBuffers::new();
        buf.stars.push(StarVertex::default());
        buf.primitives.push(PrimitiveInstance::default());
        buf.clear_frame();
        assert_eq!(buf.star_count(), 1);
        assert_eq!(buf.primitive_count(), 0);
    }

    #[test]
    fn instance_casts_to_floats() {
        let inst = PrimitiveInstance { x: 1.0, shape: 4.0, ..Default::default() };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&inst));
        assert_eq!(floats.len(), PrimitiveInstance::FLOATS);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[8], 4.0);
    }
}
