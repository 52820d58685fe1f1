pub mod host;
pub mod runner;

pub use host::BrowserHost;
pub use orbit_scene;
pub use runner::SceneRunner;

/// Generate all `#[wasm_bindgen]` exports for one page backdrop.
///
/// This macro generates:
/// - `thread_local!` storage for the SceneRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (scene_init, scene_tick, input handlers, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
///
/// mod presets;
///
/// orbit_web::export_scene!(presets::hero_universe, presets::service_reveals, "hero");
/// ```
///
/// # Arguments
///
/// - `$scene`: a `fn() -> SceneConfig` mounted by `scene_init`
/// - `$reveals`: a `fn() -> Vec<RevealTrigger>` registered by `scene_init`
/// - `$name`: A string literal used in log messages
#[macro_export]
macro_rules! export_scene {
    ($scene:path, $reveals:path, $name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::SceneRunner<$crate::BrowserHost>>> = RefCell::new(None);
        }

        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::SceneRunner<$crate::BrowserHost>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::warn!("{}: scene_init() has not been called", $name);
                    R::default()
                }
            })
        }

        #[wasm_bindgen]
        pub fn scene_init(canvas_id: &str) {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let host = match $crate::BrowserHost::new(canvas_id) {
                Ok(host) => host,
                Err(err) => {
                    log::error!("{}: {}", $name, err);
                    return;
                }
            };
            RUNNER.with(|cell| {
                *cell.borrow_mut() = Some($crate::SceneRunner::new(host));
            });

            with_runner(|r| {
                // A failed mount leaves the fallback view up; reveals still register.
                let _ = r.mount($scene());
                for trigger in $reveals() {
                    let _ = r.register_reveal(trigger);
                }
            });
            log::info!("{}: initialized", $name);
        }

        /// Replace the mounted scene with one described by JSON.
        #[wasm_bindgen]
        pub fn scene_mount(json: &str) -> bool {
            with_runner(|r| r.mount_json(json).is_ok())
        }

        #[wasm_bindgen]
        pub fn scene_tick(dt: f32) {
            with_runner(|r| r.tick(dt));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_move(x: f32, y: f32, viewport_width: f32, viewport_height: f32) {
            with_runner(|r| {
                r.push_input($crate::orbit_scene::InputEvent::PointerMove { x, y, viewport_width, viewport_height })
            });
        }

        #[wasm_bindgen]
        pub fn scene_pointer_enter(node: u32) {
            with_runner(|r| r.push_input($crate::orbit_scene::InputEvent::PointerEnter { node: $crate::orbit_scene::NodeId(node) }));
        }

        #[wasm_bindgen]
        pub fn scene_pointer_leave(node: u32) {
            with_runner(|r| r.push_input($crate::orbit_scene::InputEvent::PointerLeave { node: $crate::orbit_scene::NodeId(node) }));
        }

        #[wasm_bindgen]
        pub fn scene_context_lost() {
            with_runner(|r| r.context_lost());
        }

        /// Re-run the last mount from the fallback view's Retry action.
        #[wasm_bindgen]
        pub fn scene_retry() -> bool {
            with_runner(|r| r.retry().is_ok() && r.is_mounted())
        }

        #[wasm_bindgen]
        pub fn scene_unmount() {
            with_runner(|r| r.unmount());
        }

        /// Drop the runner, releasing every page listener.
        #[wasm_bindgen]
        pub fn scene_shutdown() {
            let runner = RUNNER.with(|cell| cell.borrow_mut().take());
            if let Some(mut runner) = runner {
                runner.shutdown();
            }
        }

        /// Register a reveal trigger from JSON. Returns its id, or -1.
        #[wasm_bindgen]
        pub fn scene_register_reveal(json: &str) -> i32 {
            with_runner(|r| r.register_reveal_json(json).map_or(-1, |id| id.0 as i32))
        }

        #[wasm_bindgen]
        pub fn scene_unregister_reveal(id: u32) -> bool {
            with_runner(|r| r.unregister_reveal($crate::orbit_scene::RevealId(id)))
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_frame_ptr() -> *const f32 {
            RUNNER.with(|cell| cell.borrow().as_ref().map_or(std::ptr::null(), |r| r.frame_ptr()))
        }

        #[wasm_bindgen]
        pub fn get_buffer_total_floats() -> u32 {
            with_runner(|r| r.buffer_total_floats())
        }

        #[wasm_bindgen]
        pub fn get_mount_state() -> f32 {
            with_runner(|r| r.mount_state())
        }

        #[wasm_bindgen]
        pub fn get_label_count() -> u32 {
            with_runner(|r| r.label_count())
        }

        #[wasm_bindgen]
        pub fn get_label(index: u32) -> String {
            with_runner(|r| r.label(index))
        }

        // ---- Capacity accessors ----

        #[wasm_bindgen]
        pub fn get_max_primitives() -> u32 {
            with_runner(|r| r.max_primitives())
        }

        #[wasm_bindgen]
        pub fn get_max_rings() -> u32 {
            with_runner(|r| r.max_rings())
        }

        #[wasm_bindgen]
        pub fn get_max_lights() -> u32 {
            with_runner(|r| r.max_lights())
        }

        #[wasm_bindgen]
        pub fn get_max_line_vertices() -> u32 {
            with_runner(|r| r.max_line_vertices())
        }

        #[wasm_bindgen]
        pub fn get_max_stars() -> u32 {
            with_runner(|r| r.max_stars())
        }

        // ---- Fallback view ----

        #[wasm_bindgen]
        pub fn get_fallback_title() -> String {
            with_runner(|r| r.fallback_title())
        }

        #[wasm_bindgen]
        pub fn get_fallback_detail() -> String {
            with_runner(|r| r.fallback_detail())
        }

        #[wasm_bindgen]
        pub fn get_fallback_action() -> String {
            with_runner(|r| r.fallback_action())
        }

        #[wasm_bindgen]
        pub fn get_fallback_reason() -> String {
            with_runner(|r| r.fallback_reason())
        }
    };
}
