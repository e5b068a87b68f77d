use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::layer::MarkerLayer;

/// Role tag carried by the set-piece delivery player.
pub const CORNER_TAKER: &str = "corner-taker";

/// Interaction state of a marker.
///
/// `Dragging` and `Transitioning` are mutually exclusive: a marker being
/// animated to a preset slot cannot be grabbed, and a preset switch waits
/// until no marker is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging,
    Transitioning,
}

impl DragState {
    pub fn as_u8(self) -> u8 {
        match self {
            DragState::Idle => 0,
            DragState::Dragging => 1,
            DragState::Transitioning => 2,
        }
    }
}

/// A draggable player marker.
///
/// `pos` is the source of truth for where the marker is; anything on screen
/// is a projection of it.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// Role tag (e.g. "GK", "near-post", "corner-taker").
    pub role: String,
    /// Position in normalized surface coordinates (0–100 on each axis).
    pub pos: Vec2,
    /// Per-tick velocity of the drag integrator.
    pub vel: Vec2,
    pub state: DragState,
    /// Visual scale; raised while held.
    pub scale: f32,
    /// Draw order; raised while held.
    pub layer: MarkerLayer,
}

impl Entity {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            role: String::new(),
            pos: Vec2::splat(50.0),
            vel: Vec2::ZERO,
            state: DragState::Idle,
            scale: 1.0,
            layer: MarkerLayer::Markers,
        }
    }

    // -- Builder pattern --

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    pub fn is_idle(&self) -> bool {
        self.state == DragState::Idle
    }
}
