use std::f32::consts::PI;

use orbit_scene::{
    AnimatorConfig, AnimatorKind, BackdropConfig, CameraConfig, FloatingNodeConfig, FocalConfig, FogConfig, LightConfig,
    LightKind, MaterialConfig, PointerMapping, ReplayPolicy, RevealTrigger, RingConfig, SceneConfig, ShapeKind,
    StarDistribution, StarFieldConfig, StarRotation, Undulation,
};

pub const BPM_SERVICES: [&str; 5] = ["Customer Support", "Data Entry", "Back Office", "Recruitment", "Finance"];
pub const LPO_SERVICES: [&str; 5] = ["Legal Review", "Contract Analysis", "Compliance", "Research", "Documentation"];
pub const IT_SERVICES: [&str; 5] = ["Development", "Cloud Services", "Cybersecurity", "Data Analytics", "AI Solutions"];

fn light(kind: LightKind, position: [f32; 3], intensity: f32, color: &str) -> LightConfig {
    LightConfig { kind, position, intensity, color: color.to_string(), ..LightConfig::default() }
}

fn service_ring(
    radius: f32,
    color: &str,
    labels: &[&str],
    phase: f32,
    undulation: Undulation,
    node_size: f32,
    shape_offset: usize,
) -> RingConfig {
    RingConfig {
        radius,
        phase,
        undulation: Some(undulation),
        color: color.to_string(),
        labels: labels.iter().map(|s| s.to_string()).collect(),
        node_size,
        shape_offset,
        ..RingConfig::default()
    }
}

/// Landing-page hero: the company core circled by three service rings.
pub fn hero_universe() -> SceneConfig {
    SceneConfig {
        camera: CameraConfig { position: [0.0, 5.0, 15.0], fov: 75.0, ..CameraConfig::default() },
        pointer: PointerMapping { invert_y: true, scale: 0.5 },
        stars: Some(StarFieldConfig {
            count: 8000,
            distribution: StarDistribution::Cube { extent: 2000.0 },
            ..StarFieldConfig::default()
        }),
        focal: Some(FocalConfig { label: "NEXVORA".to_string(), ..FocalConfig::default() }),
        rings: vec![
            service_ring(5.0, "#ff6b6b", &BPM_SERVICES, 0.0, Undulation { amplitude: 1.5, frequency: 0.5 }, 0.7, 0),
            service_ring(7.5, "#4ecdc4", &LPO_SERVICES, PI * 0.3, Undulation { amplitude: 2.0, frequency: 0.7 }, 0.6, 2),
            service_ring(10.0, "#45b7d1", &IT_SERVICES, PI * 0.6, Undulation { amplitude: 2.5, frequency: 0.3 }, 0.8, 4),
        ],
        animator: AnimatorConfig { kind: AnimatorKind::Spring, ..AnimatorConfig::default() },
        lights: vec![
            light(LightKind::Ambient, [0.0; 3], 0.4, "#ffffff"),
            light(LightKind::Point, [15.0, 15.0, 15.0], 2.5, "#6c5ce7"),
            light(LightKind::Point, [-15.0, -15.0, -15.0], 1.8, "#a29bfe"),
            LightConfig { angle: 0.25, penumbra: 1.0, ..light(LightKind::Spot, [0.0, 25.0, 0.0], 2.5, "#ffd93d") },
        ],
        fog: Some(FogConfig { color: "#0a0a1a".to_string(), near: 15.0, far: 60.0 }),
        ..SceneConfig::default()
    }
}

fn floating(position: [f32; 3], color: &str, shape: ShapeKind, size: f32, speed: f32) -> FloatingNodeConfig {
    FloatingNodeConfig { position, color: color.to_string(), shape, size, speed: Some(speed), ..FloatingNodeConfig::default() }
}

/// Section background: loose shapes wandering through a faint particle cloud.
pub fn floating_geometry() -> SceneConfig {
    SceneConfig {
        camera: CameraConfig { position: [0.0, 0.0, 20.0], fov: 60.0, ..CameraConfig::default() },
        stars: Some(StarFieldConfig {
            count: 2000,
            distribution: StarDistribution::Cube { extent: 100.0 },
            brightness: [0.4, 0.7],
            color_jitter: [0.2, 0.1, 0.3],
            point_size: 1.0,
            opacity: 0.6,
            rotation: StarRotation { rate_x: 0.02, rate_y: 0.03, pointer_x: 0.0, pointer_y: 0.0 },
            ..StarFieldConfig::default()
        }),
        focal: None,
        nodes: vec![
            floating([-10.0, 5.0, -5.0], "#9b87f5", ShapeKind::Sphere, 0.3, 0.8),
            floating([8.0, -3.0, -8.0], "#6e59a5", ShapeKind::Box, 0.5, 1.2),
            floating([-5.0, -8.0, 5.0], "#4ecdc4", ShapeKind::Torus, 0.3, 0.6),
            floating([12.0, 8.0, 3.0], "#ff6b6b", ShapeKind::Octahedron, 0.4, 1.0),
            floating([-12.0, 2.0, 8.0], "#45b7d1", ShapeKind::Sphere, 0.3, 0.9),
            floating([5.0, -5.0, -10.0], "#ffd93d", ShapeKind::Box, 0.5, 0.7),
        ],
        animator: AnimatorConfig { kind: AnimatorKind::Wander, ..AnimatorConfig::default() },
        material: MaterialConfig { roughness: 0.2, metalness: 0.8, emissive_intensity: 0.2, opacity: 0.6 },
        lights: vec![
            light(LightKind::Ambient, [0.0; 3], 0.3, "#ffffff"),
            light(LightKind::Point, [10.0, 10.0, 10.0], 1.0, "#9b87f5"),
            light(LightKind::Point, [-10.0, -10.0, -10.0], 0.8, "#6e59a5"),
            light(LightKind::Directional, [0.0, 20.0, 0.0], 0.5, "#ffffff"),
        ],
        fog: Some(FogConfig { color: "#1a1a2e".to_string(), near: 20.0, far: 100.0 }),
        ..SceneConfig::default()
    }
}

/// Page-wide parallax: a particle shell in front of a slowly turning nebula.
pub fn parallax_field() -> SceneConfig {
    SceneConfig {
        group_parallax: 0.1,
        stars: Some(StarFieldConfig {
            count: 3000,
            distribution: StarDistribution::Shell { inner: 5.0, outer: 15.0 },
            brightness: [1.0, 1.0],
            point_size: 0.015,
            opacity: 0.8,
            rotation: StarRotation { rate_x: 0.0, rate_y: 0.05, pointer_x: 0.0, pointer_y: 0.0 },
            ..StarFieldConfig::default()
        }),
        focal: None,
        lights: Vec::new(),
        backdrop: Some(BackdropConfig {
            path: "/images/nebula.png".to_string(),
            scale: 30.0,
            depth: -20.0,
            opacity: 0.4,
            spin: 0.01,
        }),
        ..SceneConfig::default()
    }
}

/// Look a preset up by the name the page uses.
pub fn by_name(name: &str) -> Option<SceneConfig> {
    match name {
        "hero" | "hero_universe" => Some(hero_universe()),
        "floating" | "floating_geometry" => Some(floating_geometry()),
        "parallax" | "parallax_field" => Some(parallax_field()),
        _ => None,
    }
}

fn reveal(element: &str, start_offset_px: f32, offset_y: f32) -> RevealTrigger {
    RevealTrigger { element: element.to_string(), start_offset_px, offset_y, ..RevealTrigger::default() }
}

/// Section headings and the service card grid.
pub fn service_reveals() -> Vec<RevealTrigger> {
    vec![
        reveal("services-heading", 100.0, 50.0),
        RevealTrigger {
            targets: vec!["service-card-bpm".into(), "service-card-lpo".into(), "service-card-it".into()],
            stagger: 0.2,
            ..reveal("service-cards", 50.0, 100.0)
        },
        reveal("benefits-heading", 100.0, 50.0),
        RevealTrigger { policy: ReplayPolicy::Once, ..reveal("call-to-action", 100.0, 50.0) },
    ]
}

#[cfg(test)]
mod tests {
    use orbit_scene::{ComposedScene, NodeRole, TextureSlot};

    use super::*;

    #[test]
    fn hero_has_core_and_fifteen_services() {
        let scene = ComposedScene::compose(&hero_universe().sanitized());
        assert_eq!(scene.rings.len(), 3);
        assert_eq!(scene.graph.len(), 16);
        assert_eq!(scene.focal_node().and_then(|n| n.label.as_deref()), Some("NEXVORA"));
        assert!(scene.graph.find_by_label("AI Solutions").is_some());
        assert_eq!(scene.lights.len(), 4);
        assert_eq!(scene.stars.as_ref().map(|s| s.len()), Some(8000));
    }

    #[test]
    fn hero_rings_keep_their_radii() {
        let scene = ComposedScene::compose(&hero_universe());
        let radii: Vec<f32> = scene.rings.iter().map(|r| r.radius).collect();
        assert_eq!(radii, vec![5.0, 7.5, 10.0]);
        let member = scene.graph.find_by_label("Legal Review").unwrap();
        let p = member.base_position;
        assert!(((p.x * p.x + p.z * p.z).sqrt() - 7.5).abs() < 1e-4);
    }

    #[test]
    fn floating_geometry_has_no_focal() {
        let scene = ComposedScene::compose(&floating_geometry());
        assert!(scene.focal_node().is_none());
        assert_eq!(scene.graph.len(), 6);
        assert!(scene.graph.iter().all(|n| n.role == NodeRole::Floating));
    }

    #[test]
    fn parallax_requests_the_nebula() {
        let scene = ComposedScene::compose(&parallax_field());
        assert_eq!(scene.pending_texture().map(|(_, p)| p), Some("/images/nebula.png"));
        assert!(matches!(scene.texture_slot(), TextureSlot::Pending { .. }));
    }

    #[test]
    fn presets_survive_json() {
        for name in ["hero", "floating", "parallax"] {
            let config = by_name(name).unwrap();
            let json = config.to_json().unwrap();
            assert_eq!(SceneConfig::from_json(&json).unwrap(), config.sanitized());
        }
        assert!(by_name("nope").is_none());
    }

    #[test]
    fn card_grid_staggers() {
        let reveals = service_reveals();
        assert_eq!(reveals[1].root_margin(), "0px 0px -50px 0px");
        assert_eq!(reveals[1].targets.len(), 3);
        assert_eq!(reveals[3].policy, ReplayPolicy::Once);
    }
}
