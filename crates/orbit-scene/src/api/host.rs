use crate::api::mount::MountError;
use crate::api::types::RevealId;
use crate::input::queue::InputQueue;
use crate::systems::reveal::RevealStyle;

/// Opaque handle for one registered host listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(pub u32);

/// Listeners a scene can ask the host to register.
#[derive(Debug, Clone, PartialEq)]
pub enum HostListener {
    /// Window-scoped pointer-move.
    PointerMove,
    /// Viewport intersection for one reveal trigger's element.
    Visibility { reveal: RevealId, element: String, root_margin: String },
}

impl HostListener {
    pub fn name(&self) -> &'static str {
        match self {
            HostListener::PointerMove => "pointermove",
            HostListener::Visibility { .. } => "intersection",
        }
    }
}

/// Everything the core needs from the page it runs in.
///
/// Implemented by the browser bridge for real pages and by recording fakes in
/// tests. Events go into an inbox the core drains once per frame, so listener
/// callbacks never re-enter the scene.
pub trait SceneHost {
    /// Acquire the drawing surface. An error means the renderer cannot start.
    fn create_surface(&mut self) -> Result<(), MountError>;

    fn release_surface(&mut self) {}

    fn subscribe(&mut self, listener: HostListener) -> Result<ListenerHandle, MountError>;

    /// Deregister a listener. Unknown handles are ignored.
    fn unsubscribe(&mut self, handle: ListenerHandle);

    /// Start loading a texture. The answer arrives later as
    /// `InputEvent::TextureLoaded` or `InputEvent::TextureFailed`.
    fn request_texture(&mut self, slot: u32, path: &str);

    /// Write opacity and translation onto a page element.
    fn apply_reveal_style(&mut self, target: &str, style: RevealStyle);

    /// Current viewport size in CSS pixels.
    fn viewport(&self) -> (f32, f32);

    /// Move every event received since the last call into `queue`.
    fn poll_events(&mut self, queue: &mut InputQueue);
}

/// Handles registered for one owner, released together.
#[derive(Debug, Default)]
pub struct Subscriptions {
    handles: Vec<ListenerHandle>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register through `host` and remember the handle.
    pub fn subscribe<H: SceneHost + ?Sized>(&mut self, host: &mut H, listener: HostListener) -> Result<ListenerHandle, MountError> {
        let handle = host.subscribe(listener)?;
        self.handles.push(handle);
        Ok(handle)
    }

    /// Deregister one handle early. Returns false if it was not held.
    pub fn release<H: SceneHost + ?Sized>(&mut self, host: &mut H, handle: ListenerHandle) -> bool {
        let before = self.handles.len();
        self.handles.retain(|h| *h != handle);
        if self.handles.len() == before {
            return false;
        }
        host.unsubscribe(handle);
        true
    }

    /// Deregister everything. Safe to call repeatedly.
    pub fn release_all<H: SceneHost + ?Sized>(&mut self, host: &mut H) {
        for handle in self.handles.drain(..) {
            host.unsubscribe(handle);
        }
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            log::warn!("{} host listeners dropped without release", self.handles.len());
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashSet;

    use super::*;
    use crate::input::queue::InputEvent;

    /// Host fake: records listeners, texture requests and style writes.
    #[derive(Default)]
    pub struct RecordingHost {
        pub next_handle: u32,
        pub active: HashSet<ListenerHandle>,
        pub listeners: Vec<(ListenerHandle, HostListener)>,
        pub removed: Vec<ListenerHandle>,
        pub surfaces_created: u32,
        pub surfaces_released: u32,
        /// Surface creations left to fail.
        pub failing_surfaces: u32,
        pub texture_requests: Vec<(u32, String)>,
        pub styles: Vec<(String, RevealStyle)>,
        pub inbox: Vec<InputEvent>,
        pub size: (f32, f32),
    }

    impl RecordingHost {
        pub fn new() -> Self {
            Self { size: (1280.0, 720.0), ..Self::default() }
        }

        pub fn failing(times: u32) -> Self {
            Self { failing_surfaces: times, ..Self::new() }
        }

        pub fn send(&mut self, event: InputEvent) {
            self.inbox.push(event);
        }
    }

    impl SceneHost for RecordingHost {
        fn create_surface(&mut self) -> Result<(), MountError> {
            if self.failing_surfaces > 0 {
                self.failing_surfaces -= 1;
                return Err(MountError::SurfaceUnavailable("webgl2 unsupported".into()));
            }
            self.surfaces_created += 1;
            Ok(())
        }

        fn release_surface(&mut self) {
            self.surfaces_released += 1;
        }

        fn subscribe(&mut self, listener: HostListener) -> Result<ListenerHandle, MountError> {
            self.next_handle += 1;
            let handle = ListenerHandle(self.next_handle);
            self.active.insert(handle);
            self.listeners.push((handle, listener));
            Ok(handle)
        }

        fn unsubscribe(&mut self, handle: ListenerHandle) {
            self.active.remove(&handle);
            self.removed.push(handle);
        }

        fn request_texture(&mut self, slot: u32, path: &str) {
            self.texture_requests.push((slot, path.to_string()));
        }

        fn apply_reveal_style(&mut self, target: &str, style: RevealStyle) {
            self.styles.push((target.to_string(), style));
        }

        fn viewport(&self) -> (f32, f32) {
            self.size
        }

        fn poll_events(&mut self, queue: &mut InputQueue) {
            for event in self.inbox.drain(..) {
                queue.push(event);
            }
        }
    }
}
