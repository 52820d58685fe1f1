//! Frame buffer layout.
//! Must stay in sync with TypeScript `protocol.ts`.
//!
//! Layout (all values in f32 / 4 bytes):
//! ```text
//! [Header: 32 floats]
//! [Camera: 20 floats]
//! [Primitives: max_primitives × 20 floats]
//! [Rings: max_rings × 12 floats]
//! [Lights: max_lights × 12 floats]
//! [Lines: max_line_vertices × 8 floats]
//! [Stars: max_stars × 6 floats]
//! ```
//!
//! Capacities are written into the header on every frame.
//! TypeScript reads them from the header to compute offsets dynamically.
//! Labels are not in the buffer; the host fetches the label table once per
//! mount and draws each label `size + 1` above its node.

use bytemuck::cast_slice;

use crate::api::config::Limits;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{LightInstance, LineVertex, PrimitiveInstance, RingInstance, SceneBuffers, StarVertex};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 32;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_MAX_PRIMITIVES: usize = 2;
pub const HEADER_PRIMITIVE_COUNT: usize = 3;
pub const HEADER_MAX_RINGS: usize = 4;
pub const HEADER_RING_COUNT: usize = 5;
pub const HEADER_MAX_LIGHTS: usize = 6;
pub const HEADER_LIGHT_COUNT: usize = 7;
pub const HEADER_MAX_LINE_VERTICES: usize = 8;
pub const HEADER_LINE_VERTEX_COUNT: usize = 9;
pub const HEADER_MAX_STARS: usize = 10;
pub const HEADER_STAR_COUNT: usize = 11;
pub const HEADER_STAR_ROT_X: usize = 12;
pub const HEADER_STAR_ROT_Y: usize = 13;
pub const HEADER_STAR_POINT_SIZE: usize = 14;
pub const HEADER_STAR_OPACITY: usize = 15;
pub const HEADER_GROUP_ROT_X: usize = 16;
pub const HEADER_GROUP_ROT_Y: usize = 17;
/// 1.0 when fog is configured.
pub const HEADER_FOG_ENABLED: usize = 18;
pub const HEADER_FOG_R: usize = 19;
pub const HEADER_FOG_G: usize = 20;
pub const HEADER_FOG_B: usize = 21;
pub const HEADER_FOG_NEAR: usize = 22;
pub const HEADER_FOG_FAR: usize = 23;
/// `TextureSlot::wire_code` of the backdrop.
pub const HEADER_BACKDROP_STATE: usize = 24;
pub const HEADER_BACKDROP_SPIN: usize = 25;
pub const HEADER_BACKDROP_SCALE: usize = 26;
pub const HEADER_BACKDROP_DEPTH: usize = 27;
pub const HEADER_BACKDROP_OPACITY: usize = 28;
/// 0 unmounted, 1 mounted, 2 fallback view.
pub const HEADER_MOUNT_STATE: usize = 29;
pub const HEADER_ELAPSED: usize = 30;
/// 1.0 when the star section changed this frame and must be re-uploaded.
pub const HEADER_STARS_DIRTY: usize = 31;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats in the camera section (view-projection matrix + eye).
pub const CAMERA_FLOATS: usize = CameraUniform::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_primitives: usize,
    pub max_rings: usize,
    pub max_lights: usize,
    pub max_line_vertices: usize,
    pub max_stars: usize,

    pub primitive_data_floats: usize,
    pub ring_data_floats: usize,
    pub light_data_floats: usize,
    pub line_data_floats: usize,
    pub star_data_floats: usize,

    /// Offset (in floats) where the camera uniform begins.
    pub camera_offset: usize,
    pub primitive_data_offset: usize,
    pub ring_data_offset: usize,
    pub light_data_offset: usize,
    pub line_data_offset: usize,
    pub star_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_primitives: usize, max_rings: usize, max_lights: usize, max_line_vertices: usize, max_stars: usize) -> Self {
        let primitive_data_floats = max_primitives * PrimitiveInstance::FLOATS;
        let ring_data_floats = max_rings * RingInstance::FLOATS;
        let light_data_floats = max_lights * LightInstance::FLOATS;
        let line_data_floats = max_line_vertices * LineVertex::FLOATS;
        let star_data_floats = max_stars * StarVertex::FLOATS;

        let camera_offset = HEADER_FLOATS;
        let primitive_data_offset = camera_offset + CAMERA_FLOATS;
        let ring_data_offset = primitive_data_offset + primitive_data_floats;
        let light_data_offset = ring_data_offset + ring_data_floats;
        let line_data_offset = light_data_offset + light_data_floats;
        let star_data_offset = line_data_offset + line_data_floats;

        let buffer_total_floats = star_data_offset + star_data_floats;
        let buffer_total_bytes = buffer_total_floats * 4;

        Self {
            max_primitives,
            max_rings,
            max_lights,
            max_line_vertices,
            max_stars,
            primitive_data_floats,
            ring_data_floats,
            light_data_floats,
            line_data_floats,
            star_data_floats,
            camera_offset,
            primitive_data_offset,
            ring_data_offset,
            light_data_offset,
            line_data_offset,
            star_data_offset,
            buffer_total_floats,
            buffer_total_bytes,
        }
    }

    /// Compute layout from configured limits.
    pub fn from_limits(limits: &Limits) -> Self {
        Self::new(
            limits.max_nodes,
            limits.max_rings,
            limits.max_lights,
            limits.max_line_vertices,
            limits.max_stars,
        )
    }
}

/// The flat per-frame buffer the host reads through one pointer.
pub struct FrameBuffer {
    layout: ProtocolLayout,
    data: Vec<f32>,
}

impl FrameBuffer {
    pub fn new(layout: ProtocolLayout) -> Self {
        let data = vec![0.0; layout.buffer_total_floats];
        Self { layout, data }
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    pub fn header(&self, field: usize) -> f32 {
        self.data[field]
    }

    pub fn set_header(&mut self, field: usize, value: f32) {
        if field < HEADER_FLOATS {
            self.data[field] = value;
        }
    }

    /// Zero the header except the frame counter, which keeps counting.
    pub fn reset_header(&mut self) {
        let frame = self.data[HEADER_FRAME_COUNTER];
        self.data[..HEADER_FLOATS].fill(0.0);
        self.data[HEADER_FRAME_COUNTER] = frame;
        self.data[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        self.data[HEADER_MAX_PRIMITIVES] = self.layout.max_primitives as f32;
        self.data[HEADER_MAX_RINGS] = self.layout.max_rings as f32;
        self.data[HEADER_MAX_LIGHTS] = self.layout.max_lights as f32;
        self.data[HEADER_MAX_LINE_VERTICES] = self.layout.max_line_vertices as f32;
        self.data[HEADER_MAX_STARS] = self.layout.max_stars as f32;
    }

    /// Copy typed buffers into their sections, truncating at capacity, and
    /// record the counts in the header. Stars are copied only when `stars_dirty`.
    pub fn pack(&mut self, camera: &CameraUniform, buffers: &SceneBuffers, stars_dirty: bool) {
        let l = self.layout.clone();
        copy_section(&mut self.data, l.camera_offset, CAMERA_FLOATS, cast_slice(std::slice::from_ref(camera)));
        let n = copy_section(&mut self.data, l.primitive_data_offset, l.primitive_data_floats, cast_slice(&buffers.primitives));
        self.data[HEADER_PRIMITIVE_COUNT] = (n / PrimitiveInstance::FLOATS) as f32;
        let n = copy_section(&mut self.data, l.ring_data_offset, l.ring_data_floats, cast_slice(&buffers.rings));
        self.data[HEADER_RING_COUNT] = (n / RingInstance::FLOATS) as f32;
        let n = copy_section(&mut self.data, l.light_data_offset, l.light_data_floats, cast_slice(&buffers.lights));
        self.data[HEADER_LIGHT_COUNT] = (n / LightInstance::FLOATS) as f32;
        let n = copy_section(&mut self.data, l.line_data_offset, l.line_data_floats, cast_slice(&buffers.lines));
        self.data[HEADER_LINE_VERTEX_COUNT] = (n / LineVertex::FLOATS) as f32;
        if stars_dirty {
            copy_section(&mut self.data, l.star_data_offset, l.star_data_floats, cast_slice(&buffers.stars));
        }
        let stars = buffers.stars.len().min(l.max_stars);
        self.data[HEADER_STAR_COUNT] = stars as f32;
        self.data[HEADER_STARS_DIRTY] = if stars_dirty { 1.0 } else { 0.0 };
    }

    pub fn bump_frame(&mut self) {
        self.data[HEADER_FRAME_COUNTER] += 1.0;
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Raw pointer for host reads.
    pub fn as_ptr(&self) -> *const f32 {
        self.data.as_ptr()
    }
}

/// Copy `src` into `dst[offset..offset + capacity]`. Returns floats copied.
fn copy_section(dst: &mut [f32], offset: usize, capacity: usize, src: &[f32]) -> usize {
    let n = src.len().min(capacity);
    dst[offset..offset + n].copy_from_slice(&src[..n]);
    n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_layout() {
        let layout = ProtocolLayout::from_limits(&Limits::default());
        assert_eq!(layout.camera_offset, HEADER_FLOATS);
        assert_eq!(layout.primitive_data_offset, HEADER_FLOATS + CAMERA_FLOATS);
        assert_eq!(layout.primitive_data_floats, 256 * 20);
        assert_eq!(layout.star_data_floats, 16_384 * 6);
        assert_eq!(layout.buffer_total_bytes, layout.buffer_total_floats * 4);
    }

    #[test]
    fn custom_capacities_compute_correctly() {
        let layout = ProtocolLayout::new(10, 3, 4, 20, 100);
        let expected_total = HEADER_FLOATS + CAMERA_FLOATS + 10 * 20 + 3 * 12 + 4 * 12 + 20 * 8 + 100 * 6;
        assert_eq!(layout.buffer_total_floats, expected_total);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(100, 8, 6, 64, 5000);
        assert_eq!(layout.ring_data_offset, layout.primitive_data_offset + layout.primitive_data_floats);
        assert_eq!(layout.light_data_offset, layout.ring_data_offset + layout.ring_data_floats);
        assert_eq!(layout.line_data_offset, layout.light_data_offset + layout.light_data_floats);
        assert_eq!(layout.star_data_offset, layout.line_data_offset + layout.line_data_floats);
        assert_eq!(layout.buffer_total_floats, layout.star_data_offset + layout.star_data_floats);
    }

    #[test]
    fn pack_truncates_at_capacity() {
        let layout = ProtocolLayout::new(2, 1, 1, 2, 4);
        let mut frame = FrameBuffer::new(layout);
        frame.reset_header();
        let mut buffers = SceneBuffers::new();
        for i in 0..5 {
            buffers.primitives.push(PrimitiveInstance { x: i as f32, ..Default::default() });
        }
        buffers.stars.push(StarVertex { x: 7.0, ..Default::default() });
        let camera = CameraUniform { view_projection: [[0.0; 4]; 4], eye: [0.0; 4] };
        frame.pack(&camera, &buffers, true);
        assert_eq!(frame.header(HEADER_PRIMITIVE_COUNT), 2.0);
        assert_eq!(frame.header(HEADER_STAR_COUNT), 1.0);
        assert_eq!(frame.header(HEADER_MAX_PRIMITIVES), 2.0);
        let star_x = frame.as_slice()[frame.layout().star_data_offset];
        assert_eq!(star_x, 7.0);
        let second_x = frame.as_slice()[frame.layout().primitive_data_offset + PrimitiveInstance::FLOATS];
        assert_eq!(second_x, 1.0);
    }

    #[test]
    fn frame_counter_survives_header_reset() {
        let mut frame = FrameBuffer::new(ProtocolLayout::new(1, 1, 1, 1, 1));
        frame.bump_frame();
        frame.bump_frame();
        frame.reset_header();
        assert_eq!(frame.header(HEADER_FRAME_COUNTER), 2.0);
        assert_eq!(frame.header(HEADER_PROTOCOL_VERSION), PROTOCOL_VERSION);
    }
}
