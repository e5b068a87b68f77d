use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::DiagramKind;
use crate::components::entity::CORNER_TAKER;
use crate::error::BoardError;

/// One role in a preset, with its target spot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresetSlot {
    pub role: String,
    pub pos: Vec2,
}

/// A named layout: formation shape or set-piece routine.
///
/// Slots are ordered. Transitions hand slot `i` to the `i`-th marker on the
/// board; roles are not matched by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub kind: DiagramKind,
    pub slots: Vec<PresetSlot>,
}

impl Preset {
    pub fn new(name: impl Into<String>, kind: DiagramKind, slots: &[(&str, f32, f32)]) -> Self {
        Self {
            name: name.into(),
            kind,
            slots: slots
                .iter()
                .map(|&(role, x, y)| PresetSlot {
                    role: role.to_string(),
                    pos: Vec2::new(x, y),
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn validate(&self) -> Result<(), BoardError> {
        for slot in &self.slots {
            let p = slot.pos;
            if !(p.is_finite() && (0.0..=100.0).contains(&p.x) && (0.0..=100.0).contains(&p.y)) {
                return Err(BoardError::InvalidConfig(format!(
                    "preset `{}` places `{}` off the surface at ({}, {})",
                    self.name, slot.role, p.x, p.y
                )));
            }
        }
        Ok(())
    }
}

/// All presets a board can switch between.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresetLibrary {
    presets: Vec<Preset>,
}

impl PresetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a library from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let library: Self = serde_json::from_str(json)?;
        for preset in &library.presets {
            preset.validate()?;
        }
        Ok(library)
    }

    /// Every built-in formation and set piece.
    pub fn builtin() -> Self {
        let mut library = Self::new();
        for preset in builtin_formations().into_iter().chain(builtin_set_pieces()) {
            library.presets.push(preset);
        }
        library
    }

    /// Add or replace a preset by name.
    pub fn insert(&mut self, preset: Preset) -> Result<(), BoardError> {
        preset.validate()?;
        match self.presets.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.presets.push(preset),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.iter().find(|p| p.name == name)
    }

    /// Look up a preset for a board of the given kind.
    pub fn lookup(&self, name: &str, kind: DiagramKind) -> Result<&Preset, BoardError> {
        let preset = self
            .get(name)
            .ok_or_else(|| BoardError::UnknownPreset(name.to_string()))?;
        if preset.kind != kind {
            return Err(BoardError::KindMismatch {
                preset: name.to_string(),
                expected: kind,
                found: preset.kind,
            });
        }
        Ok(preset)
    }

    /// Preset names available for a diagram type, in library order.
    pub fn names(&self, kind: DiagramKind) -> Vec<&str> {
        self.presets
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }
}

// ── Built-in layouts ─────────────────────────────────────────────────────
// Attacking direction is towards y = 0; the keeper sits near y = 90.

fn builtin_formations() -> Vec<Preset> {
    use DiagramKind::Formation as F;
    vec![
        Preset::new("4-4-2", F, &[
            ("GK", 50.0, 90.0),
            ("LB", 15.0, 70.0), ("LCB", 38.0, 75.0), ("RCB", 62.0, 75.0), ("RB", 85.0, 70.0),
            ("LM", 15.0, 45.0), ("LCM", 38.0, 50.0), ("RCM", 62.0, 50.0), ("RM", 85.0, 45.0),
            ("LS", 40.0, 20.0), ("RS", 60.0, 20.0),
        ]),
        Preset::new("4-3-3", F, &[
            ("GK", 50.0, 90.0),
            ("LB", 15.0, 70.0), ("LCB", 38.0, 75.0), ("RCB", 62.0, 75.0), ("RB", 85.0, 70.0),
            ("LCM", 30.0, 50.0), ("CM", 50.0, 55.0), ("RCM", 70.0, 50.0),
            ("LW", 15.0, 25.0), ("ST", 50.0, 15.0), ("RW", 85.0, 25.0),
        ]),
        Preset::new("3-5-2", F, &[
            ("GK", 50.0, 90.0),
            ("LCB", 30.0, 75.0), ("CB", 50.0, 77.0), ("RCB", 70.0, 75.0),
            ("LWB", 10.0, 50.0), ("LCM", 35.0, 52.0), ("CDM", 50.0, 60.0), ("RCM", 65.0, 52.0), ("RWB", 90.0, 50.0),
            ("LS", 40.0, 20.0), ("RS", 60.0, 20.0),
        ]),
        Preset::new("4-2-3-1", F, &[
            ("GK", 50.0, 90.0),
            ("LB", 15.0, 70.0), ("LCB", 38.0, 75.0), ("RCB", 62.0, 75.0), ("RB", 85.0, 70.0),
            ("LDM", 40.0, 60.0), ("RDM", 60.0, 60.0),
            ("LAM", 20.0, 35.0), ("CAM", 50.0, 38.0), ("RAM", 80.0, 35.0),
            ("ST", 50.0, 15.0),
        ]),
    ]
}

fn builtin_set_pieces() -> Vec<Preset> {
    use DiagramKind::SetPiece as S;
    vec![
        Preset::new("near-post-corner", S, &[
            (CORNER_TAKER, 90.0, 70.0),
            ("near-post", 40.0, 22.0), ("far-post", 60.0, 22.0),
            ("central", 50.0, 35.0), ("edge", 50.0, 55.0), ("back-post-runner", 66.0, 30.0),
        ]),
        Preset::new("far-post-corner", S, &[
            (CORNER_TAKER, 90.0, 70.0),
            ("near-post", 42.0, 30.0), ("far-post", 60.0, 20.0),
            ("far-post-runner", 57.0, 26.0), ("central", 48.0, 38.0), ("edge", 50.0, 58.0),
        ]),
        Preset::new("short-corner", S, &[
            (CORNER_TAKER, 90.0, 70.0),
            ("short-option", 80.0, 60.0), ("near-post", 40.0, 25.0),
            ("central", 50.0, 38.0), ("edge", 45.0, 55.0), ("edge-runner", 60.0, 56.0),
        ]),
        Preset::new("wide-free-kick", S, &[
            ("free-kick-taker", 85.0, 45.0),
            ("near-post", 42.0, 24.0), ("far-post", 60.0, 22.0),
            ("central", 50.0, 33.0), ("edge", 50.0, 55.0), ("blindside-runner", 70.0, 40.0),
        ]),
    ]
}
