use serde::{Deserialize, Serialize};

/// A textured backdrop plane (the nebula behind the parallax field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Image path the host loads; relative to the site root.
    pub path: String,
    /// Plane edge length in world units.
    pub scale: f32,
    /// Z position of the plane.
    pub depth: f32,
    pub opacity: f32,
    /// Radians per second of in-plane rotation.
    pub spin: f32,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            scale: 30.0,
            depth: -20.0,
            opacity: 0.4,
            spin: 0.01,
        }
    }
}

/// Load state of an optional texture. The scene never waits on it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TextureSlot {
    /// Nothing configured.
    #[default]
    None,
    /// Requested from the host, answer not back yet.
    Pending { path: String },
    Loaded { path: String },
    /// Load failed; the scene renders without it.
    Failed { path: String },
}

impl TextureSlot {
    /// Slot for a configured path; empty means no texture.
    pub fn for_path(path: &str) -> Self {
        if path.trim().is_empty() {
            TextureSlot::None
        } else {
            TextureSlot::Pending { path: path.to_string() }
        }
    }

    pub fn path(&self) -> Option<&str> {
        match self {
            TextureSlot::None => None,
            TextureSlot::Pending { path } | TextureSlot::Loaded { path } | TextureSlot::Failed { path } => Some(path),
        }
    }

    /// Host reported success. Only a pending slot changes.
    pub fn resolve_loaded(&mut self) {
        if let TextureSlot::Pending { path } = self {
            log::debug!("texture {path:?} loaded");
            *self = TextureSlot::Loaded { path: std::mem::take(path) };
        }
    }

    /// Host reported failure. Only a pending slot changes.
    pub fn resolve_failed(&mut self) {
        if let TextureSlot::Pending { path } = self {
            log::warn!("texture {path:?} failed to load, rendering without it");
            *self = TextureSlot::Failed { path: std::mem::take(path) };
        }
    }

    pub fn is_drawable(&self) -> bool {
        matches!(self, TextureSlot::Loaded { .. })
    }

    /// Wire code for the protocol header: 0 none, 1 pending, 2 loaded, 3 failed.
    pub fn wire_code(&self) -> f32 {
        match self {
            TextureSlot::None => 0.0,
            TextureSlot::Pending { .. } => 1.0,
            TextureSlot::Loaded { .. } => 2.0,
            TextureSlot::Failed { .. } => 3.0,
        }
    }
}
