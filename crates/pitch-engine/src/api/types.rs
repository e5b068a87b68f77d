use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Unique identifier for a marker on a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Which tactical diagram a board renders.
/// Selects the zone catalog, the metric family and the tuning constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagramKind {
    /// Full-team shape on a whole pitch.
    Formation,
    /// Attacking set-piece routine around the penalty box.
    SetPiece,
}

impl DiagramKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagramKind::Formation => "formation",
            DiagramKind::SetPiece => "set_piece",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "formation" => Some(DiagramKind::Formation),
            "set_piece" | "set-piece" | "setpiece" => Some(DiagramKind::SetPiece),
            _ => None,
        }
    }
}

/// A board event forwarded to the UI shell.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BoardEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl BoardEvent {
    pub const FLOATS: usize = 4;

    /// Metrics were recomputed. Formation: a=width, b=compactness, c=balance.
    /// Set piece: a=shot probability, b=goal probability.
    pub const METRICS_UPDATED: f32 = 1.0;
    /// A preset transition finished. a=number of markers moved.
    pub const TRANSITION_FINISHED: f32 = 2.0;
    /// a=entity id.
    pub const DRAG_STARTED: f32 = 3.0;
    /// a=entity id, b/c=final position.
    pub const DRAG_ENDED: f32 = 4.0;
    /// a=entity id, b=zone index in the active catalog.
    pub const ZONE_SNAPPED: f32 = 5.0;
    /// a=entity id. The marker was mid-transition.
    pub const DRAG_REJECTED: f32 = 6.0;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_event_is_four_floats() {
        assert_eq!(std::mem::size_of::<BoardEvent>(), BoardEvent::FLOATS * 4);
    }

    #[test]
    fn diagram_kind_parses_both_spellings() {
        assert_eq!(DiagramKind::parse("set-piece"), Some(DiagramKind::SetPiece));
        assert_eq!(DiagramKind::parse("set_piece"), Some(DiagramKind::SetPiece));
        assert_eq!(DiagramKind::parse("formation"), Some(DiagramKind::Formation));
        assert_eq!(DiagramKind::parse("pitch"), None);
    }
}
