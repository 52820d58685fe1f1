use std::collections::HashMap;

use orbit_scene::{
    HostListener, InputEvent, ListenerHandle, MountController, MountError, MountState, RevealController, RevealId,
    RevealTrigger, SceneConfig, SceneHost, Subscriptions,
};

/// Generic runner that wires one backdrop and the page's scroll reveals to a host.
///
/// Each concrete site creates a `thread_local!` SceneRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export generic
/// structs directly. Reveals live beside the mount, so they keep working while
/// the backdrop shows its fallback view.
pub struct SceneRunner<H: SceneHost> {
    controller: MountController<H>,
    reveals: RevealController,
    reveal_subscriptions: Subscriptions,
    reveal_handles: HashMap<RevealId, ListenerHandle>,
}

impl<H: SceneHost> SceneRunner<H> {
    pub fn new(host: H) -> Self {
        Self {
            controller: MountController::new(host),
            reveals: RevealController::new(),
            reveal_subscriptions: Subscriptions::new(),
            reveal_handles: HashMap::new(),
        }
    }

    pub fn mount(&mut self, config: SceneConfig) -> Result<(), MountError> {
        self.controller.mount(config)
    }

    pub fn mount_json(&mut self, json: &str) -> Result<(), MountError> {
        self.controller.mount_json(json)
    }

    pub fn retry(&mut self) -> Result<(), MountError> {
        self.controller.retry()
    }

    pub fn context_lost(&mut self) {
        self.controller.context_lost();
    }

    /// Unmount the backdrop. Reveals stay registered.
    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    /// Unmount the backdrop and stop observing every reveal.
    pub fn shutdown(&mut self) {
        self.controller.unmount();
        self.reveal_subscriptions.release_all(self.controller.host_mut());
        self.reveal_handles.clear();
        self.reveals.clear();
    }

    /// Track a reveal trigger and subscribe to its element's visibility.
    pub fn register_reveal(&mut self, trigger: RevealTrigger) -> Result<RevealId, MountError> {
        let element = trigger.element.clone();
        let root_margin = trigger.root_margin();
        let id = self.reveals.register(trigger);
        let listener = HostListener::Visibility { reveal: id, element, root_margin };
        match self.reveal_subscriptions.subscribe(self.controller.host_mut(), listener) {
            Ok(handle) => {
                self.reveal_handles.insert(id, handle);
                Ok(id)
            }
            Err(err) => {
                log::warn!("reveal {:?} not observed: {err}", id);
                self.reveals.remove(id);
                Err(err)
            }
        }
    }

    /// Like `register_reveal`, parsing the trigger from JSON.
    pub fn register_reveal_json(&mut self, json: &str) -> Result<RevealId, MountError> {
        let trigger: RevealTrigger = serde_json::from_str(json)?;
        self.register_reveal(trigger)
    }

    pub fn unregister_reveal(&mut self, id: RevealId) -> bool {
        let Some(handle) = self.reveal_handles.remove(&id) else {
            return false;
        };
        self.reveal_subscriptions.release(self.controller.host_mut(), handle);
        self.reveals.remove(id)
    }

    /// Queue an event raised by the page rather than the host inbox.
    pub fn push_input(&mut self, event: InputEvent) {
        self.controller.push_input(event);
    }

    /// Run one frame: advance the backdrop, then feed visibility signals to
    /// the reveals and write their styles back to the page.
    pub fn tick(&mut self, dt: f32) {
        for event in self.controller.tick(dt) {
            if let InputEvent::Visibility { reveal, visible } = event {
                self.reveals.observe(reveal, visible);
            }
        }
        let updates = self.reveals.tick(dt);
        let host = self.controller.host_mut();
        for update in updates {
            host.apply_reveal_style(&update.target, update.style);
        }
    }

    pub fn controller(&self) -> &MountController<H> {
        &self.controller
    }

    pub fn reveals(&self) -> &RevealController {
        &self.reveals
    }

    // ---- Pointer accessors for host reads ----

    pub fn frame_ptr(&self) -> *const f32 {
        self.controller.frame().as_ptr()
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.controller.frame().layout().buffer_total_floats as u32
    }

    pub fn mount_state(&self) -> f32 {
        self.controller.state().wire_code()
    }

    pub fn is_mounted(&self) -> bool {
        self.controller.state() == MountState::Mounted
    }

    // ---- Capacity accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn max_primitives(&self) -> u32 {
        self.controller.frame().layout().max_primitives as u32
    }

    pub fn max_rings(&self) -> u32 {
        self.controller.frame().layout().max_rings as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.controller.frame().layout().max_lights as u32
    }

    pub fn max_line_vertices(&self) -> u32 {
        self.controller.frame().layout().max_line_vertices as u32
    }

    pub fn max_stars(&self) -> u32 {
        self.controller.frame().layout().max_stars as u32
    }

    // ---- Labels and fallback text ----

    pub fn label_count(&self) -> u32 {
        self.controller.mounted().map_or(0, |m| m.scene.labels().len() as u32)
    }

    /// Label text by index, as referenced from primitive instances.
    pub fn label(&self, index: u32) -> String {
        self.controller
            .mounted()
            .and_then(|m| m.scene.labels().get(index as usize).cloned())
            .unwrap_or_default()
    }

    pub fn fallback_title(&self) -> String {
        self.controller.fallback().map(|f| f.title.to_string()).unwrap_or_default()
    }

    pub fn fallback_detail(&self) -> String {
        self.controller.fallback().map(|f| f.detail.to_string()).unwrap_or_default()
    }

    pub fn fallback_action(&self) -> String {
        self.controller.fallback().map(|f| f.action.to_string()).unwrap_or_default()
    }

    pub fn fallback_reason(&self) -> String {
        self.controller.fallback().map(|f| f.reason.clone()).unwrap_or_default()
    }
}

impl<H: SceneHost> Drop for SceneRunner<H> {
    fn drop(&mut self) {
        self.reveal_subscriptions.release_all(self.controller.host_mut());
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use orbit_scene::{InputQueue, ReplayPolicy, RevealStyle};

    use super::*;

    #[derive(Default)]
    struct FakeHost {
        next: u32,
        active: HashSet<ListenerHandle>,
        fail_surface: bool,
        missing_elements: Vec<String>,
        styles: Vec<(String, RevealStyle)>,
        inbox: Vec<InputEvent>,
    }

    impl SceneHost for FakeHost {
        fn create_surface(&mut self) -> Result<(), MountError> {
            if self.fail_surface {
                return Err(MountError::SurfaceUnavailable("no webgl2".into()));
            }
            Ok(())
        }

        fn subscribe(&mut self, listener: HostListener) -> Result<ListenerHandle, MountError> {
            if let HostListener::Visibility { element, .. } = &listener {
                if self.missing_elements.contains(element) {
                    return Err(MountError::Listener { what: listener.name(), reason: format!("#{element} not found") });
                }
            }
            self.next += 1;
            let handle = ListenerHandle(self.next);
            self.active.insert(handle);
            Ok(handle)
        }

        fn unsubscribe(&mut self, handle: ListenerHandle) {
            self.active.remove(&handle);
        }

        fn request_texture(&mut self, _slot: u32, _path: &str) {}

        fn apply_reveal_style(&mut self, target: &str, style: RevealStyle) {
            self.styles.push((target.to_string(), style));
        }

        fn viewport(&self) -> (f32, f32) {
            (1280.0, 720.0)
        }

        fn poll_events(&mut self, queue: &mut InputQueue) {
            for event in self.inbox.drain(..) {
                queue.push(event);
            }
        }
    }

    fn heading() -> RevealTrigger {
        RevealTrigger { element: "services-heading".into(), ..RevealTrigger::default() }
    }

    #[test]
    fn reveals_run_while_backdrop_is_in_fallback() {
        let mut runner = SceneRunner::new(FakeHost { fail_surface: true, ..FakeHost::default() });
        assert!(runner.mount(SceneConfig::default()).is_err());
        assert_eq!(runner.mount_state(), 2.0);
        assert_eq!(runner.fallback_title(), "3D Universe Loading...");

        let id = runner.register_reveal(heading()).unwrap();
        runner.tick(0.016);
        let (target, style) = runner.controller().host().styles.last().unwrap().clone();
        assert_eq!(target, "services-heading");
        assert_eq!(style.opacity, 0.0);

        runner.controller.host_mut().inbox.push(InputEvent::Visibility { reveal: id, visible: true });
        for _ in 0..60 {
            runner.tick(1.0 / 60.0);
        }
        let (_, style) = runner.controller().host().styles.last().unwrap().clone();
        assert!((style.opacity - 1.0).abs() < 1e-4);
        assert!(style.offset_y.abs() < 1e-3);
    }

    #[test]
    fn reveal_from_json_uses_defaults() {
        let mut runner = SceneRunner::new(FakeHost::default());
        let id = runner.register_reveal_json(r#"{ "element": "cta", "policy": "once" }"#).unwrap();
        let trigger = runner.reveals().trigger(id).unwrap();
        assert_eq!(trigger.policy, ReplayPolicy::Once);
        assert_eq!(trigger.duration, 0.8);
        assert!(matches!(runner.register_reveal_json("{"), Err(MountError::Config(_))));
    }

    #[test]
    fn missing_element_does_not_register() {
        let mut runner = SceneRunner::new(FakeHost { missing_elements: vec!["services-heading".into()], ..FakeHost::default() });
        assert!(matches!(runner.register_reveal(heading()), Err(MountError::Listener { .. })));
        assert!(runner.reveals().is_empty());
    }

    #[test]
    fn once_reveal_ignores_exit() {
        let mut runner = SceneRunner::new(FakeHost::default());
        let id = runner.register_reveal(RevealTrigger { policy: ReplayPolicy::Once, ..heading() }).unwrap();
        runner.controller.host_mut().inbox.push(InputEvent::Visibility { reveal: id, visible: true });
        runner.tick(0.016);
        runner.controller.host_mut().inbox.push(InputEvent::Visibility { reveal: id, visible: false });
        runner.tick(0.016);
        assert_eq!(runner.reveals().state(id), Some(orbit_scene::RevealState::Visible));
    }

    #[test]
    fn shutdown_releases_every_listener() {
        let mut runner = SceneRunner::new(FakeHost::default());
        runner.mount(SceneConfig::default()).unwrap();
        let id = runner.register_reveal(heading()).unwrap();
        runner.register_reveal(RevealTrigger { element: "cta".into(), ..RevealTrigger::default() }).unwrap();
        assert_eq!(runner.controller().host().active.len(), 3);

        assert!(runner.unregister_reveal(id));
        assert_eq!(runner.controller().host().active.len(), 2);

        runner.shutdown();
        assert!(runner.controller().host().active.is_empty());
        assert!(runner.reveals().is_empty());
    }

    #[test]
    fn unmount_keeps_reveals() {
        let mut runner = SceneRunner::new(FakeHost::default());
        runner.mount(SceneConfig::default()).unwrap();
        runner.register_reveal(heading()).unwrap();
        runner.unmount();
        assert_eq!(runner.controller().host().active.len(), 1);
        assert_eq!(runner.label_count(), 0);
    }
}
