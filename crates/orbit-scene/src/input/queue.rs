use crate::api::types::{NodeId, RevealId};

/// Events the host delivers between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to pixel (x, y) inside a viewport of the given size.
    PointerMove { x: f32, y: f32, viewport_width: f32, viewport_height: f32 },
    /// The host's picking reports the pointer entered a node.
    PointerEnter { node: NodeId },
    /// The pointer left a node.
    PointerLeave { node: NodeId },
    /// A tracked element crossed its viewport threshold.
    Visibility { reveal: RevealId, visible: bool },
    /// The optional background texture finished loading.
    TextureLoaded { slot: u32 },
    /// The optional background texture could not be loaded.
    TextureFailed { slot: u32 },
    /// The rendering context was lost.
    ContextLost,
}

/// Events are queued by the host and drained once per frame.
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(32),
        }
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Drain all pending events, leaving the queue empty.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_drain_preserves_order() {
        let mut q = InputQueue::new();
        q.push(InputEvent::PointerEnter { node: NodeId(3) });
        q.push(InputEvent::Visibility { reveal: RevealId(1), visible: true });
        assert_eq!(q.len(), 2);
        let events = q.drain();
        assert_eq!(events[0], InputEvent::PointerEnter { node: NodeId(3) });
        assert_eq!(events[1], InputEvent::Visibility { reveal: RevealId(1), visible: true });
        assert!(q.is_empty());
    }
}
