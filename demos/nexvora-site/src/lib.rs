use wasm_bindgen::prelude::*;

pub mod presets;

orbit_web::export_scene!(presets::hero_universe, presets::service_reveals, "nexvora-site");

/// JSON for a named backdrop preset, for `scene_mount`. Empty if unknown.
#[wasm_bindgen]
pub fn preset_json(name: &str) -> String {
    match presets::by_name(name).map(|config| config.to_json()) {
        Some(Ok(json)) => json,
        Some(Err(err)) => {
            log::warn!("preset {name} did not serialize: {err}");
            String::new()
        }
        None => {
            log::warn!("no preset named {name}");
            String::new()
        }
    }
}
