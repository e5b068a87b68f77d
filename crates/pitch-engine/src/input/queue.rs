use crate::api::types::EntityId;

/// Key code that aborts a drag.
pub const KEY_ESCAPE: u32 = 27;

/// Pointer and key input the board understands.
/// Coordinates are pixels relative to the surface's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer went down on the surface; the closest marker is picked.
    PointerDown { x: f32, y: f32 },
    /// Pointer went down directly on a marker.
    Grab { entity: EntityId, x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp { x: f32, y: f32 },
    /// The platform took the pointer away (touch interrupted, focus lost).
    PointerCancel,
    KeyDown { key_code: u32 },
}

impl InputEvent {
    /// Whether this event ends a drag without committing it.
    pub fn is_cancel(&self) -> bool {
        matches!(
            self,
            InputEvent::PointerCancel | InputEvent::KeyDown { key_code: KEY_ESCAPE }
        )
    }
}

/// Pending input, drained by the board once per tick.
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

    /// Take every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::new()
    }
}
