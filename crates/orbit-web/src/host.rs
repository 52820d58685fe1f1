use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use orbit_scene::{HostListener, InputEvent, InputQueue, ListenerHandle, MountError, RevealStyle, SceneHost};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, PointerEvent, Window,
};

type Inbox = Rc<RefCell<Vec<InputEvent>>>;

enum Registration {
    Pointer(Closure<dyn FnMut(PointerEvent)>),
    Visibility {
        observer: IntersectionObserver,
        _callback: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    },
}

struct PendingImage {
    image: HtmlImageElement,
    _onload: Closure<dyn FnMut()>,
    _onerror: Closure<dyn FnMut()>,
}

/// `SceneHost` backed by the page: a canvas for the renderer, window pointer
/// events, one intersection observer per reveal and `<img>` texture loads.
/// Every callback only pushes into the shared inbox.
pub struct BrowserHost {
    window: Window,
    document: Document,
    canvas_id: String,
    inbox: Inbox,
    next_handle: u32,
    listeners: HashMap<ListenerHandle, Registration>,
    context_lost: Option<(HtmlCanvasElement, Closure<dyn FnMut()>)>,
    images: Vec<PendingImage>,
}

impl BrowserHost {
    pub fn new(canvas_id: &str) -> Result<Self, MountError> {
        let window = web_sys::window().ok_or_else(|| MountError::SurfaceUnavailable("no window".into()))?;
        let document = window.document().ok_or_else(|| MountError::SurfaceUnavailable("no document".into()))?;
        Ok(Self {
            window,
            document,
            canvas_id: canvas_id.to_string(),
            inbox: Rc::new(RefCell::new(Vec::new())),
            next_handle: 0,
            listeners: HashMap::new(),
            context_lost: None,
            images: Vec::new(),
        })
    }

    fn element(&self, id: &str) -> Result<web_sys::Element, MountError> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| MountError::SurfaceUnavailable(format!("#{id} not found")))
    }

    fn viewport_of(window: &Window) -> (f32, f32) {
        let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;
        (read(window.inner_width()), read(window.inner_height()))
    }

    fn listen_pointer(&self) -> Result<Registration, MountError> {
        let inbox = Rc::clone(&self.inbox);
        let window = self.window.clone();
        let callback = Closure::<dyn FnMut(PointerEvent)>::new(move |event: PointerEvent| {
            let (viewport_width, viewport_height) = BrowserHost::viewport_of(&window);
            inbox.borrow_mut().push(InputEvent::PointerMove {
                x: event.client_x() as f32,
                y: event.client_y() as f32,
                viewport_width,
                viewport_height,
            });
        });
        self.window
            .add_event_listener_with_callback("pointermove", callback.as_ref().unchecked_ref())
            .map_err(|e| listener_error("pointermove", e))?;
        Ok(Registration::Pointer(callback))
    }

    fn observe_visibility(&self, reveal: orbit_scene::RevealId, element: &str, root_margin: &str) -> Result<Registration, MountError> {
        let target = self.document.get_element_by_id(element).ok_or_else(|| MountError::Listener {
            what: "intersection",
            reason: format!("#{element} not found"),
        })?;

        let inbox = Rc::clone(&self.inbox);
        let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
            move |entries: js_sys::Array, _observer: IntersectionObserver| {
                let mut inbox = inbox.borrow_mut();
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() {
                        inbox.push(InputEvent::Visibility { reveal, visible: entry.is_intersecting() });
                    }
                }
            },
        );

        let options = IntersectionObserverInit::new();
        options.set_root_margin(root_margin);
        options.set_threshold(&JsValue::from(0.0));
        let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)
            .map_err(|e| listener_error("intersection", e))?;
        observer.observe(&target);
        Ok(Registration::Visibility { observer, _callback: callback })
    }

    fn drop_registration(&self, registration: Registration) {
        match registration {
            Registration::Pointer(callback) => {
                if let Err(e) = self
                    .window
                    .remove_event_listener_with_callback("pointermove", callback.as_ref().unchecked_ref())
                {
                    log::warn!("pointermove listener not removed: {:?}", e);
                }
            }
            Registration::Visibility { observer, .. } => observer.disconnect(),
        }
    }
}

impl SceneHost for BrowserHost {
    fn create_surface(&mut self) -> Result<(), MountError> {
        let canvas = self
            .element(&self.canvas_id)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| MountError::SurfaceUnavailable(format!("#{} is not a canvas", self.canvas_id)))?;
        match canvas.get_context("webgl2") {
            Ok(Some(_)) => {}
            Ok(None) => return Err(MountError::SurfaceUnavailable("webgl2 not supported".into())),
            Err(e) => return Err(MountError::SurfaceUnavailable(format!("{:?}", e))),
        }

        let inbox = Rc::clone(&self.inbox);
        let on_lost = Closure::<dyn FnMut()>::new(move || inbox.borrow_mut().push(InputEvent::ContextLost));
        canvas
            .add_event_listener_with_callback("webglcontextlost", on_lost.as_ref().unchecked_ref())
            .map_err(|e| listener_error("webglcontextlost", e))?;
        self.context_lost = Some((canvas, on_lost));
        Ok(())
    }

    fn release_surface(&mut self) {
        if let Some((canvas, on_lost)) = self.context_lost.take() {
            if let Err(e) = canvas.remove_event_listener_with_callback("webglcontextlost", on_lost.as_ref().unchecked_ref()) {
                log::warn!("webglcontextlost listener not removed: {:?}", e);
            }
        }
        for pending in self.images.drain(..) {
            pending.image.set_onload(None);
            pending.image.set_onerror(None);
        }
    }

    fn subscribe(&mut self, listener: HostListener) -> Result<ListenerHandle, MountError> {
        let registration = match &listener {
            HostListener::PointerMove => self.listen_pointer()?,
            HostListener::Visibility { reveal, element, root_margin } => {
                self.observe_visibility(*reveal, element, root_margin)?
            }
        };
        self.next_handle += 1;
        let handle = ListenerHandle(self.next_handle);
        self.listeners.insert(handle, registration);
        log::debug!("{} listener registered as {:?}", listener.name(), handle);
        Ok(handle)
    }

    fn unsubscribe(&mut self, handle: ListenerHandle) {
        if let Some(registration) = self.listeners.remove(&handle) {
            self.drop_registration(registration);
        }
    }

    fn request_texture(&mut self, slot: u32, path: &str) {
        let image = match HtmlImageElement::new() {
            Ok(image) => image,
            Err(e) => {
                log::warn!("could not create image for {path}: {:?}", e);
                self.inbox.borrow_mut().push(InputEvent::TextureFailed { slot });
                return;
            }
        };
        let loaded = Rc::clone(&self.inbox);
        let failed = Rc::clone(&self.inbox);
        let onload = Closure::<dyn FnMut()>::new(move || loaded.borrow_mut().push(InputEvent::TextureLoaded { slot }));
        let onerror = Closure::<dyn FnMut()>::new(move || failed.borrow_mut().push(InputEvent::TextureFailed { slot }));
        image.set_onload(Some(onload.as_ref().unchecked_ref()));
        image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        image.set_src(path);
        self.images.push(PendingImage { image, _onload: onload, _onerror: onerror });
    }

    fn apply_reveal_style(&mut self, target: &str, style: RevealStyle) {
        let Some(element) = self.document.get_element_by_id(target) else {
            log::warn!("reveal target #{target} not found");
            return;
        };
        let Ok(element) = element.dyn_into::<HtmlElement>() else {
            return;
        };
        let css = element.style();
        let opacity = css.set_property("opacity", &style.opacity.to_string());
        let transform = css.set_property("transform", &format!("translateY({}px)", style.offset_y));
        if opacity.is_err() || transform.is_err() {
            log::warn!("could not style reveal target #{target}");
        }
    }

    fn viewport(&self) -> (f32, f32) {
        Self::viewport_of(&self.window)
    }

    fn poll_events(&mut self, queue: &mut InputQueue) {
        for event in self.inbox.borrow_mut().drain(..) {
            queue.push(event);
        }
    }
}

impl Drop for BrowserHost {
    fn drop(&mut self) {
        let registrations: Vec<Registration> = self.listeners.drain().map(|(_, r)| r).collect();
        for registration in registrations {
            self.drop_registration(registration);
        }
        self.release_surface();
    }
}

fn listener_error(what: &'static str, error: JsValue) -> MountError {
    MountError::Listener { what, reason: format!("{:?}", error) }
}
