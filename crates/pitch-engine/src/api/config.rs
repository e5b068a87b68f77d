use serde::{Deserialize, Serialize};

use crate::api::types::DiagramKind;
use crate::core::surface::Bounds;
use crate::error::BoardError;
use crate::systems::animator::TransitionTiming;
use crate::systems::physics::SpringParams;
use crate::systems::snap::SnapConfig;

/// When the drag integrator runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhysicsDrive {
    /// Once per pointer-move event. Feel depends on the event rate.
    PerEvent,
    /// On the board's fixed timestep, chasing the latest pointer target.
    #[default]
    FixedStep,
}

/// Tuning for a board. Loadable from JSON; missing fields take the
/// formation defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    pub drive: PhysicsDrive,
    pub spring: SpringParams,
    /// Inset boundary every marker write is clamped to.
    pub bounds: Bounds,
    pub snap: SnapConfig,
    pub transition: TransitionTiming,
    /// Delay before the post-release metrics refresh, in seconds.
    pub settle_delay: f32,
    /// Visual scale of a held marker.
    pub drag_scale: f32,
    /// Pointer-down pick radius, in normalized units.
    pub hit_radius: f32,
}

impl BoardConfig {
    pub fn formation() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            drive: PhysicsDrive::FixedStep,
            spring: SpringParams::FORMATION,
            bounds: Bounds::inset(5.0),
            snap: SnapConfig::default(),
            transition: TransitionTiming::FORMATION,
            settle_delay: 0.1,
            drag_scale: 1.2,
            hit_radius: 4.0,
        }
    }

    pub fn set_piece() -> Self {
        Self {
            spring: SpringParams::SET_PIECE,
            bounds: Bounds::inset(8.0),
            transition: TransitionTiming::SET_PIECE,
            ..Self::formation()
        }
    }

    pub fn for_kind(kind: DiagramKind) -> Self {
        match kind {
            DiagramKind::Formation => Self::formation(),
            DiagramKind::SetPiece => Self::set_piece(),
        }
    }

    pub fn with_drive(mut self, drive: PhysicsDrive) -> Self {
        self.drive = drive;
        self
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        self.spring.validate()?;
        self.bounds.validate()?;
        let positive = |name: &str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(BoardError::InvalidConfig(format!("{name} must be positive, got {v}")))
            }
        };
        positive("fixed_dt", self.fixed_dt)?;
        positive("drag_scale", self.drag_scale)?;
        positive("hit_radius", self.hit_radius)?;
        positive("transition.base", self.transition.base)?;
        if !(self.settle_delay >= 0.0 && self.transition.per_entity >= 0.0) {
            return Err(BoardError::InvalidConfig(
                "settle_delay and transition.per_entity must not be negative".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.snap.soft_dampening) {
            return Err(BoardError::InvalidConfig(format!(
                "snap.soft_dampening must lie in [0, 1], got {}",
                self.snap.soft_dampening
            )));
        }
        Ok(())
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::formation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(BoardConfig::formation().validate().is_ok());
        assert!(BoardConfig::set_piece().validate().is_ok());
    }

    #[test]
    fn set_piece_tightens_the_inset() {
        let cfg = BoardConfig::for_kind(DiagramKind::SetPiece);
        assert_eq!(cfg.bounds, Bounds::inset(8.0));
        assert_eq!(cfg.spring, SpringParams::SET_PIECE);
        assert_eq!(cfg.settle_delay, 0.1);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = BoardConfig::from_json(r#"{ "drive": "per_event", "spring": { "spring": 0.18, "friction": 0.82 } }"#)
            .unwrap();
        assert_eq!(cfg.drive, PhysicsDrive::PerEvent);
        assert_eq!(cfg.spring.spring, 0.18);
        assert_eq!(cfg.bounds, Bounds::inset(5.0));
    }

    #[test]
    fn json_is_validated() {
        let err = BoardConfig::from_json(r#"{ "spring": { "spring": 1.5, "friction": 0.8 } }"#).unwrap_err();
        assert!(matches!(err, BoardError::InvalidConfig(_)));
        assert!(BoardConfig::from_json("not json").is_err());
    }
}
