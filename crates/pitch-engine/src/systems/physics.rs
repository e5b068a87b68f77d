//! Drag integrator: spring toward the pointer target, friction to settle.
//!
//! A perceptual model, not a physics engine: unit mass, no energy
//! conservation. Each axis is integrated independently.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::entity::Entity;
use crate::core::surface::Bounds;
use crate::error::BoardError;

/// Spring/friction pair for the drag integrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpringParams {
    /// Fraction of the remaining distance turned into acceleration per step.
    pub spring: f32,
    /// Fraction of velocity kept per step.
    pub friction: f32,
}

impl SpringParams {
    /// Formation board: softer spring, longer glide.
    pub const FORMATION: Self = Self {
        spring: 0.15,
        friction: 0.85,
    };

    /// Set-piece board: snappier.
    pub const SET_PIECE: Self = Self {
        spring: 0.2,
        friction: 0.8,
    };

    pub fn validate(&self) -> Result<(), BoardError> {
        let open_unit = |v: f32| v > 0.0 && v < 1.0;
        if open_unit(self.spring) && open_unit(self.friction) {
            Ok(())
        } else {
            Err(BoardError::InvalidConfig(format!(
                "spring and friction must lie in (0, 1), got {} / {}",
                self.spring, self.friction
            )))
        }
    }
}

impl Default for SpringParams {
    fn default() -> Self {
        Self::FORMATION
    }
}

/// One integration step, unclamped.
///
/// ```text
/// acceleration = (target - pos) * spring
/// velocity     = (velocity + acceleration) * friction
/// pos          = pos + velocity
/// ```
#[inline]
pub fn integrate(pos: Vec2, vel: Vec2, target: Vec2, params: SpringParams) -> (Vec2, Vec2) {
    let accel = (target - pos) * params.spring;
    let vel = (vel + accel) * params.friction;
    (pos + vel, vel)
}

/// Step a marker toward `target` and clamp it to the inset boundary.
///
/// Velocity on an axis that hit the boundary is zeroed so the marker cannot
/// wind up against the wall.
pub fn step(entity: &mut Entity, target: Vec2, params: SpringParams, bounds: &Bounds) {
    let (pos, mut vel) = integrate(entity.pos, entity.vel, target, params);
    let clamped = bounds.clamp(pos);
    if clamped.x != pos.x {
        vel.x = 0.0;
    }
    if clamped.y != pos.y {
        vel.y = 0.0;
    }
    entity.pos = clamped;
    entity.vel = vel;
}

/// Coarse vertical band used for the positioning hint shown while dragging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PositionBand {
    Attacking,
    Midfield,
    Central,
    Defensive,
}

impl PositionBand {
    pub fn from_y(y: f32) -> Self {
        if y < 20.0 {
            PositionBand::Attacking
        } else if y < 40.0 {
            PositionBand::Midfield
        } else if y < 70.0 {
            PositionBand::Central
        } else {
            PositionBand::Defensive
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PositionBand::Attacking => "Attacking zone",
            PositionBand::Midfield => "Midfield zone",
            PositionBand::Central => "Central zone",
            PositionBand::Defensive => "Defensive zone",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;

    #[test]
    fn first_step_matches_formula() {
        let (pos, vel) = integrate(Vec2::new(50.0, 50.0), Vec2::ZERO, Vec2::new(60.0, 40.0), SpringParams::FORMATION);
        // a = 10 * 0.15 = 1.5; v = 1.5 * 0.85 = 1.275
        assert!((vel.x - 1.275).abs() < 1e-5);
        assert!((vel.y + 1.275).abs() < 1e-5);
        assert!((pos.x - 51.275).abs() < 1e-4);
    }

    #[test]
    fn settles_on_target() {
        let mut pos = Vec2::new(20.0, 80.0);
        let mut vel = Vec2::ZERO;
        let target = Vec2::new(60.0, 30.0);
        for _ in 0..200 {
            (pos, vel) = integrate(pos, vel, target, SpringParams::SET_PIECE);
        }
        assert!((pos - target).length() < 0.01);
        assert!(vel.length() < 0.01);
    }

    #[test]
    fn step_clamps_and_kills_wall_velocity() {
        let bounds = Bounds::inset(5.0);
        let mut e = Entity::new(EntityId(1)).with_pos(Vec2::new(94.0, 50.0));
        e.vel = Vec2::new(8.0, 0.0);
        step(&mut e, Vec2::new(100.0, 50.0), SpringParams::FORMATION, &bounds);
        assert_eq!(e.pos.x, 95.0);
        assert_eq!(e.vel.x, 0.0);
    }

    #[test]
    fn validate_rejects_closed_interval() {
        assert!(SpringParams { spring: 1.0, friction: 0.8 }.validate().is_err());
        assert!(SpringParams { spring: 0.2, friction: 0.0 }.validate().is_err());
        assert!(SpringParams::SET_PIECE.validate().is_ok());
    }

    #[test]
    fn bands_follow_thresholds() {
        assert_eq!(PositionBand::from_y(10.0), PositionBand::Attacking);
        assert_eq!(PositionBand::from_y(20.0), PositionBand::Midfield);
        assert_eq!(PositionBand::from_y(55.0), PositionBand::Central);
        assert_eq!(PositionBand::from_y(70.0), PositionBand::Defensive);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Whatever the pull, a stepped marker stays inside the inset.
            #[test]
            fn step_never_leaves_bounds(
                px in 5.0f32..95.0, py in 5.0f32..95.0,
                vx in -50.0f32..50.0, vy in -50.0f32..50.0,
                tx in -500.0f32..500.0, ty in -500.0f32..500.0,
                inset in 5.0f32..8.0,
            ) {
                let bounds = Bounds::inset(inset);
                let mut e = Entity::new(EntityId(1)).with_pos(bounds.clamp(Vec2::new(px, py)));
                e.vel = Vec2::new(vx, vy);
                for _ in 0..5 {
                    step(&mut e, Vec2::new(tx, ty), SpringParams::FORMATION, &bounds);
                    prop_assert!(bounds.contains(e.pos));
                }
            }
        }
    }
}
