//! Mount lifecycle of one backdrop: compose, run, tear down, and fall back to a
//! static view when the renderer cannot start. Retry is always manual.

use glam::Vec2;
use thiserror::Error;

use crate::api::config::SceneConfig;
use crate::api::host::{HostListener, SceneHost, Subscriptions};
use crate::bridge::protocol::{FrameBuffer, ProtocolLayout, HEADER_MOUNT_STATE};
use crate::core::time::AnimationClock;
use crate::input::pointer::PointerState;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::Camera3D;
use crate::renderer::instance::SceneBuffers;
use crate::systems::compose::ComposedScene;
use crate::systems::render::{build_scene_buffers, build_star_buffer, write_scene_header};

#[derive(Debug, Error)]
pub enum MountError {
    #[error("drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),
    #[error("rendering context lost")]
    ContextLost,
    #[error("could not register {what} listener: {reason}")]
    Listener { what: &'static str, reason: String },
    #[error("invalid scene config: {0}")]
    Config(#[from] serde_json::Error),
    #[error("no scene config to mount")]
    NoConfig,
}

/// Static placeholder shown instead of the 3D scene.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackView {
    pub title: &'static str,
    pub detail: &'static str,
    pub action: &'static str,
    /// Display form of the error that caused the fallback.
    pub reason: String,
}

impl FallbackView {
    pub fn new(error: &MountError) -> Self {
        Self {
            title: "3D Universe Loading...",
            detail: "Physics engine initializing...",
            action: "Retry",
            reason: error.to_string(),
        }
    }
}

/// A running scene and everything scoped to its lifetime.
pub struct MountedScene {
    pub scene: ComposedScene,
    pub pointer: PointerState,
    pub clock: AnimationClock,
    pub camera: Camera3D,
    subscriptions: Subscriptions,
    stars_dirty: bool,
}

enum Phase {
    Unmounted,
    Mounted(Box<MountedScene>),
    Fallback(FallbackView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountState {
    Unmounted,
    Mounted,
    Fallback,
}

impl MountState {
    pub fn wire_code(self) -> f32 {
        match self {
            MountState::Unmounted => 0.0,
            MountState::Mounted => 1.0,
            MountState::Fallback => 2.0,
        }
    }
}

enum ConfigSource {
    Parsed(SceneConfig),
    Json(String),
}

impl ConfigSource {
    fn resolve(&self) -> Result<SceneConfig, MountError> {
        match self {
            ConfigSource::Parsed(config) => Ok(config.clone().sanitized()),
            ConfigSource::Json(json) => SceneConfig::from_json(json),
        }
    }
}

/// Owns the host and the mount state machine:
/// Unmounted → Mounted | Fallback, Fallback → (retry) Mounted | Fallback,
/// any → Unmounted. Dropping the controller unmounts.
pub struct MountController<H: SceneHost> {
    host: H,
    phase: Phase,
    source: Option<ConfigSource>,
    input: InputQueue,
    buffers: SceneBuffers,
    frame: FrameBuffer,
    attempts: u32,
}

impl<H: SceneHost> MountController<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: Phase::Unmounted,
            source: None,
            input: InputQueue::new(),
            buffers: SceneBuffers::new(),
            frame: FrameBuffer::new(ProtocolLayout::new(0, 0, 0, 0, 0)),
            attempts: 0,
        }
    }

    /// Mount a scene. On failure the controller shows the fallback view and
    /// returns the error; `retry` re-runs this same attempt.
    pub fn mount(&mut self, config: SceneConfig) -> Result<(), MountError> {
        self.source = Some(ConfigSource::Parsed(config));
        self.run_attempt()
    }

    /// Like `mount`, parsing the config from JSON as part of the attempt.
    pub fn mount_json(&mut self, json: &str) -> Result<(), MountError> {
        self.source = Some(ConfigSource::Json(json.to_string()));
        self.run_attempt()
    }

    /// Re-invoke the last mount attempt. Only acts from the fallback view.
    pub fn retry(&mut self) -> Result<(), MountError> {
        if !matches!(self.phase, Phase::Fallback(_)) {
            return Ok(());
        }
        log::info!("retrying scene mount (attempt {})", self.attempts + 1);
        self.run_attempt()
    }

    /// The renderer lost its context: tear down and show the fallback.
    pub fn context_lost(&mut self) {
        if matches!(self.phase, Phase::Mounted(_)) {
            self.teardown();
            self.fail(&MountError::ContextLost);
        }
    }

    /// Deregister everything and drop the scene. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        let was_mounted = matches!(self.phase, Phase::Mounted(_));
        self.teardown();
        self.phase = Phase::Unmounted;
        self.write_mount_state();
        if was_mounted {
            log::info!("scene unmounted");
        }
    }

    /// Queue an event raised outside the host inbox (hover picks from the
    /// renderer). Applied on the next tick.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame. Events the scene does not consume (visibility signals)
    /// are returned to the caller. After unmount this only forwards events.
    pub fn tick(&mut self, dt: f32) -> Vec<InputEvent> {
        self.host.poll_events(&mut self.input);
        let events = self.input.drain();
        let mut passthrough = Vec::new();
        let mut lost = false;

        match &mut self.phase {
            Phase::Mounted(mounted) => {
                for event in events {
                    match event {
                        InputEvent::PointerMove { x, y, viewport_width, viewport_height } => {
                            mounted.pointer.on_pointer_move(x, y, viewport_width, viewport_height);
                        }
                        InputEvent::PointerEnter { node } => {
                            mounted.scene.set_hover(node, true);
                        }
                        InputEvent::PointerLeave { node } => {
                            mounted.scene.set_hover(node, false);
                        }
                        InputEvent::TextureLoaded { slot } => mounted.scene.texture_loaded(slot),
                        InputEvent::TextureFailed { slot } => mounted.scene.texture_failed(slot),
                        InputEvent::ContextLost => lost = true,
                        InputEvent::Visibility { .. } => passthrough.push(event),
                    }
                }
            }
            _ => {
                passthrough.extend(events.into_iter().filter(|e| matches!(e, InputEvent::Visibility { .. })));
            }
        }

        if lost {
            self.context_lost();
            return passthrough;
        }

        let (width, height) = self.host.viewport();
        if let Phase::Mounted(mounted) = &mut self.phase {
            mounted.clock.advance(dt);
            mounted.camera.resize(width, height);
            mounted.camera.follow(Vec2::new(mounted.pointer.x(), mounted.pointer.y()), mounted.clock.frame_dt());
            mounted.scene.animate(&mounted.clock, &mounted.pointer);

            build_scene_buffers(&mounted.scene, &mut self.buffers);
            self.frame.reset_header();
            write_scene_header(&mounted.scene, mounted.clock.elapsed(), &mut self.frame);
            self.frame.pack(&mounted.camera.uniform(), &self.buffers, mounted.stars_dirty);
            mounted.stars_dirty = false;
            self.frame.bump_frame();
        }
        self.write_mount_state();
        passthrough
    }

    pub fn state(&self) -> MountState {
        match self.phase {
            Phase::Unmounted => MountState::Unmounted,
            Phase::Mounted(_) => MountState::Mounted,
            Phase::Fallback(_) => MountState::Fallback,
        }
    }

    pub fn mounted(&self) -> Option<&MountedScene> {
        match &self.phase {
            Phase::Mounted(m) => Some(m),
            _ => None,
        }
    }

    pub fn mounted_mut(&mut self) -> Option<&mut MountedScene> {
        match &mut self.phase {
            Phase::Mounted(m) => Some(m),
            _ => None,
        }
    }

    pub fn fallback(&self) -> Option<&FallbackView> {
        match &self.phase {
            Phase::Fallback(view) => Some(view),
            _ => None,
        }
    }

    /// Mount attempts made so far, retries included.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn buffers(&self) -> &SceneBuffers {
        &self.buffers
    }

    fn run_attempt(&mut self) -> Result<(), MountError> {
        self.teardown();
        self.attempts += 1;
        match self.attempt() {
            Ok(mounted) => {
                let scene = &mounted.scene;
                log::info!(
                    "scene mounted: {} nodes, {} rings, {} stars",
                    scene.graph.len(),
                    scene.rings.len(),
                    scene.stars.as_ref().map_or(0, |s| s.len())
                );
                self.phase = Phase::Mounted(mounted);
                self.write_mount_state();
                Ok(())
            }
            Err(err) => {
                self.fail(&err);
                Err(err)
            }
        }
    }

    fn attempt(&mut self) -> Result<Box<MountedScene>, MountError> {
        let config = self.source.as_ref().ok_or(MountError::NoConfig)?.resolve()?;
        self.host.create_surface()?;

        let mut subscriptions = Subscriptions::new();
        if let Err(err) = subscriptions.subscribe(&mut self.host, HostListener::PointerMove) {
            subscriptions.release_all(&mut self.host);
            self.host.release_surface();
            return Err(err);
        }

        let scene = ComposedScene::compose(&config);
        if let Some((slot, path)) = scene.pending_texture() {
            self.host.request_texture(slot, path);
        }

        self.frame = FrameBuffer::new(ProtocolLayout::from_limits(&config.limits));
        self.buffers.clear();
        build_star_buffer(&scene, &mut self.buffers);

        let mut camera = Camera3D::new(&config.camera);
        let (width, height) = self.host.viewport();
        camera.resize(width, height);

        Ok(Box::new(MountedScene {
            scene,
            pointer: PointerState::new(config.pointer),
            clock: AnimationClock::default(),
            camera,
            subscriptions,
            stars_dirty: true,
        }))
    }

    fn fail(&mut self, err: &MountError) {
        log::warn!("scene mount failed: {err}");
        self.phase = Phase::Fallback(FallbackView::new(err));
        self.write_mount_state();
    }

    /// Release everything a mounted scene holds and leave the phase
    /// `Unmounted`. Other phases only change phase.
    fn teardown(&mut self) {
        if let Phase::Mounted(mut mounted) = std::mem::replace(&mut self.phase, Phase::Unmounted) {
            mounted.subscriptions.release_all(&mut self.host);
            self.host.release_surface();
            self.buffers.clear();
            self.frame.reset_header();
        }
    }

    fn write_mount_state(&mut self) {
        let code = self.state().wire_code();
        self.frame.set_header(HEADER_MOUNT_STATE, code);
    }
}

impl<H: SceneHost> Drop for MountController<H> {
    fn drop(&mut self) {
        self.unmount();
    }
}
