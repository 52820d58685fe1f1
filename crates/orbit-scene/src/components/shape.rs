use serde::{Deserialize, Serialize};

use crate::api::types::Color;

/// Shape primitive a node is drawn with.
/// Deserializes from any string; names that are not recognized become `Sphere`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShapeKind {
    #[default]
    Sphere,
    Box,
    Torus,
    Octahedron,
    Tetrahedron,
    Dodecahedron,
    /// Only used for the focal core.
    Icosahedron,
}

impl ShapeKind {
    /// Order orbit members cycle through.
    pub const CYCLE: [ShapeKind; 6] = [
        ShapeKind::Sphere,
        ShapeKind::Box,
        ShapeKind::Torus,
        ShapeKind::Octahedron,
        ShapeKind::Tetrahedron,
        ShapeKind::Dodecahedron,
    ];

    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "box" | "cube" => ShapeKind::Box,
            "torus" => ShapeKind::Torus,
            "octahedron" => ShapeKind::Octahedron,
            "tetrahedron" => ShapeKind::Tetrahedron,
            "dodecahedron" => ShapeKind::Dodecahedron,
            "icosahedron" => ShapeKind::Icosahedron,
            _ => ShapeKind::Sphere,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Sphere => "sphere",
            ShapeKind::Box => "box",
            ShapeKind::Torus => "torus",
            ShapeKind::Octahedron => "octahedron",
            ShapeKind::Tetrahedron => "tetrahedron",
            ShapeKind::Dodecahedron => "dodecahedron",
            ShapeKind::Icosahedron => "icosahedron",
        }
    }

    /// Shape for slot `index` of a ring whose cycle starts at `offset`.
    pub fn cycled(index: usize, offset: usize) -> Self {
        Self::CYCLE[(index + offset) % Self::CYCLE.len()]
    }

    /// Numeric code written into the instance buffer.
    pub fn wire_code(self) -> f32 {
        match self {
            ShapeKind::Sphere => 0.0,
            ShapeKind::Box => 1.0,
            ShapeKind::Torus => 2.0,
            ShapeKind::Octahedron => 3.0,
            ShapeKind::Tetrahedron => 4.0,
            ShapeKind::Dodecahedron => 5.0,
            ShapeKind::Icosahedron => 6.0,
        }
    }
}

impl From<String> for ShapeKind {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<ShapeKind> for String {
    fn from(kind: ShapeKind) -> Self {
        kind.name().to_string()
    }
}

/// Canonical geometry for a shape kind at a given size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere { radius: f32, width_segments: u32, height_segments: u32 },
    Box { edge: f32 },
    Torus { major_radius: f32, minor_radius: f32, radial_segments: u32, tubular_segments: u32 },
    Octahedron { radius: f32 },
    Tetrahedron { radius: f32 },
    Dodecahedron { radius: f32 },
    Icosahedron { radius: f32, detail: u32 },
}

impl Geometry {
    pub fn for_kind(kind: ShapeKind, size: f32) -> Self {
        let size = size.max(0.0);
        match kind {
            ShapeKind::Sphere => Geometry::Sphere { radius: size, width_segments: 32, height_segments: 32 },
            ShapeKind::Box => Geometry::Box { edge: size },
            ShapeKind::Torus => Geometry::Torus {
                major_radius: size,
                minor_radius: size * 0.4,
                radial_segments: 16,
                tubular_segments: 100,
            },
            ShapeKind::Octahedron => Geometry::Octahedron { radius: size },
            ShapeKind::Tetrahedron => Geometry::Tetrahedron { radius: size },
            ShapeKind::Dodecahedron => Geometry::Dodecahedron { radius: size },
            ShapeKind::Icosahedron => Geometry::Icosahedron { radius: size, detail: 2 },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Geometry::Sphere { .. } => ShapeKind::Sphere,
            Geometry::Box { .. } => ShapeKind::Box,
            Geometry::Torus { .. } => ShapeKind::Torus,
            Geometry::Octahedron { .. } => ShapeKind::Octahedron,
            Geometry::Tetrahedron { .. } => ShapeKind::Tetrahedron,
            Geometry::Dodecahedron { .. } => ShapeKind::Dodecahedron,
            Geometry::Icosahedron { .. } => ShapeKind::Icosahedron,
        }
    }
}

/// Surface parameters for a physically based material.
/// The emissive color is always the base color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialStyle {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive_intensity: f32,
    pub opacity: f32,
}

impl MaterialStyle {
    /// Builds a style with every parameter clamped into its valid range.
    pub fn new(color: Color, roughness: f32, metalness: f32, emissive_intensity: f32, opacity: f32) -> Self {
        Self {
            color,
            roughness: clamp_unit(roughness),
            metalness: clamp_unit(metalness),
            emissive_intensity: if emissive_intensity.is_finite() { emissive_intensity.max(0.0) } else { 0.0 },
            opacity: clamp_unit(opacity),
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

impl Default for MaterialStyle {
    fn default() -> Self {
        Self::new(Color::NEUTRAL, 0.2, 0.9, 0.3, 0.9)
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Geometry + material pair handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Primitive {
    pub geometry: Geometry,
    pub material: MaterialStyle,
}

/// Build the drawable for a shape kind, size and style.
pub fn build_primitive(kind: ShapeKind, size: f32, material: MaterialStyle) -> Primitive {
    Primitive {
        geometry: Geometry::for_kind(kind, size),
        material,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_shape_is_sphere() {
        assert_eq!(ShapeKind::parse("hexagonal prism"), ShapeKind::Sphere);
        assert_eq!(ShapeKind::parse(""), ShapeKind::Sphere);
        assert_eq!(ShapeKind::parse(" Torus "), ShapeKind::Torus);
    }

    #[test]
    fn unknown_shape_deserializes_to_sphere() {
        let kinds: Vec<ShapeKind> = serde_json::from_str(r#"["box", "blob", "dodecahedron"]"#).unwrap();
        assert_eq!(kinds, vec![ShapeKind::Box, ShapeKind::Sphere, ShapeKind::Dodecahedron]);
    }

    #[test]
    fn canonical_proportions() {
        assert_eq!(Geometry::for_kind(ShapeKind::Box, 0.7), Geometry::Box { edge: 0.7 });
        match Geometry::for_kind(ShapeKind::Torus, 2.0) {
            Geometry::Torus { major_radius, minor_radius, .. } => {
                assert_eq!(major_radius, 2.0);
                assert!((minor_radius - 0.8).abs() < 1e-6);
            }
            other => panic!("expected torus, got {other:?}"),
        }
        match Geometry::for_kind(ShapeKind::Sphere, 1.5) {
            Geometry::Sphere { radius, .. } => assert_eq!(radius, 1.5),
            other => panic!("expected sphere, got {other:?}"),
        }
    }

    #[test]
    fn material_clamps_out_of_range() {
        let m = MaterialStyle::new(Color::WHITE, 1.4, -0.2, -1.0, 2.0);
        assert_eq!(m.roughness, 1.0);
        assert_eq!(m.metalness, 0.0);
        assert_eq!(m.emissive_intensity, 0.0);
        assert_eq!(m.opacity, 1.0);
        assert!(!m.is_transparent());
    }

    #[test]
    fn cycle_wraps() {
        assert_eq!(ShapeKind::cycled(0, 0), ShapeKind::Sphere);
        assert_eq!(ShapeKind::cycled(4, 4), ShapeKind::Torus);
        assert_eq!(ShapeKind::cycled(5, 2), ShapeKind::Box);
    }
}
