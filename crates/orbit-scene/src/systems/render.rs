use crate::api::config::LightKind;
use crate::bridge::protocol::*;
use crate::renderer::instance::{LightInstance, LineVertex, PrimitiveInstance, RingInstance, SceneBuffers, StarVertex};
use crate::systems::compose::ComposedScene;

/// Rebuild the per-frame instance buffers from an animated scene.
/// Node order in the graph is draw order; stars are left untouched.
pub fn build_scene_buffers(scene: &ComposedScene, buffers: &mut SceneBuffers) {
    buffers.clear_frame();

    for node in scene.graph.iter() {
        let t = &node.transform;
        let m = &node.primitive.material;
        buffers.primitives.push(PrimitiveInstance {
            x: t.position.x,
            y: t.position.y,
            z: t.position.z,
            rot_x: t.rotation.x,
            rot_y: t.rotation.y,
            rot_z: t.rotation.z,
            scale: t.scale,
            size: node.size,
            shape: node.shape.wire_code(),
            r: m.color.r,
            g: m.color.g,
            b: m.color.b,
            roughness: m.roughness,
            metalness: m.metalness,
            emissive: node.emissive(),
            opacity: m.opacity,
            glow_opacity: node.hover.glow_opacity(),
            glow_scale: node.glow_scale,
            label_index: scene.label_index(node.id).map_or(-1.0, |i| i as f32),
            _pad: 0.0,
        });
    }

    for ring in &scene.rings {
        buffers.rings.push(RingInstance {
            inner_radius: ring.inner_radius(),
            outer_radius: ring.outer_radius(),
            height: ring.height_offset,
            pitch: ring.rotation.x,
            yaw: ring.rotation.y,
            r: ring.color.r,
            g: ring.color.g,
            b: ring.color.b,
            opacity: ring.opacity,
            segments: ring.segments as f32,
            _pad: [0.0; 2],
        });
    }

    for line in &scene.lines {
        let (Some(a), Some(b)) = (scene.node_position(line.from), scene.node_position(line.to)) else {
            continue;
        };
        for p in [a, b] {
            buffers.lines.push(LineVertex {
                x: p.x,
                y: p.y,
                z: p.z,
                r: line.color.r,
                g: line.color.g,
                b: line.color.b,
                opacity: line.opacity,
                _pad: 0.0,
            });
        }
    }

    for light in &scene.lights {
        buffers.lights.push(LightInstance {
            kind: match light.kind {
                LightKind::Ambient => 0.0,
                LightKind::Point => 1.0,
                LightKind::Directional => 2.0,
                LightKind::Spot => 3.0,
            },
            x: light.position.x,
            y: light.position.y,
            z: light.position.z,
            r: light.color.r,
            g: light.color.g,
            b: light.color.b,
            intensity: light.intensity,
            angle: light.angle,
            penumbra: light.penumbra,
            _pad: [0.0; 2],
        });
    }
}

/// Write star vertices. Called once per mount.
pub fn build_star_buffer(scene: &ComposedScene, buffers: &mut SceneBuffers) {
    buffers.stars.clear();
    if let Some(field) = &scene.stars {
        buffers.stars.extend(field.stars.iter().map(|s| StarVertex {
            x: s.position.x,
            y: s.position.y,
            z: s.position.z,
            r: s.color.r,
            g: s.color.g,
            b: s.color.b,
        }));
    }
}

/// Scene-wide values that live in the header rather than a section.
pub fn write_scene_header(scene: &ComposedScene, elapsed: f32, frame: &mut FrameBuffer) {
    frame.set_header(HEADER_ELAPSED, elapsed);
    frame.set_header(HEADER_GROUP_ROT_X, scene.group_rotation.x);
    frame.set_header(HEADER_GROUP_ROT_Y, scene.group_rotation.y);
    if let Some(stars) = &scene.stars {
        frame.set_header(HEADER_STAR_ROT_X, stars.rotation.x);
        frame.set_header(HEADER_STAR_ROT_Y, stars.rotation.y);
        frame.set_header(HEADER_STAR_POINT_SIZE, stars.point_size);
        frame.set_header(HEADER_STAR_OPACITY, stars.opacity);
    }
    if let Some(fog) = &scene.fog {
        frame.set_header(HEADER_FOG_ENABLED, 1.0);
        frame.set_header(HEADER_FOG_R, fog.color.r);
        frame.set_header(HEADER_FOG_G, fog.color.g);
        frame.set_header(HEADER_FOG_B, fog.color.b);
        frame.set_header(HEADER_FOG_NEAR, fog.near);
        frame.set_header(HEADER_FOG_FAR, fog.far);
    }
    frame.set_header(HEADER_BACKDROP_STATE, scene.texture_slot().wire_code());
    if let Some(backdrop) = &scene.backdrop {
        frame.set_header(HEADER_BACKDROP_SPIN, backdrop.spin_angle);
        frame.set_header(HEADER_BACKDROP_SCALE, backdrop.config.scale);
        frame.set_header(HEADER_BACKDROP_DEPTH, backdrop.config.depth);
        frame.set_header(HEADER_BACKDROP_OPACITY, backdrop.config.opacity);
    }
}
