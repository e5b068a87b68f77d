//! Interaction controller. Turns pointer down, move and up into marker motion.

use glam::Vec2;
use serde::Serialize;

use crate::api::config::BoardConfig;
use crate::api::types::EntityId;
use crate::components::entity::DragState;
use crate::components::layer::MarkerLayer;
use crate::components::zone::Zone;
use crate::core::scene::Scene;
use crate::core::surface::Surface;
use crate::systems::physics::{self, PositionBand};
use crate::systems::snap::{self, SnapMode};

/// Smallest per-step displacement that counts as movement.
const MOVE_EPSILON: f32 = 1e-4;

/// Transient on-screen hints while a marker is held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Feedback {
    /// Vertical band under the held marker.
    pub band: Option<PositionBand>,
    /// Catalog index of the zone currently pulling the marker.
    pub zone: Option<usize>,
}

impl Feedback {
    pub fn label(&self) -> Option<&'static str> {
        self.band.map(PositionBand::label)
    }

    pub fn is_empty(&self) -> bool {
        self.band.is_none() && self.zone.is_none()
    }
}

/// Result of trying to pick up a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    Started(EntityId),
    /// The marker is mid-transition.
    Rejected(EntityId),
    /// Another marker is already held.
    Busy,
    /// Nothing under the pointer, or the marker no longer exists.
    Missed,
}

/// A finished drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnd {
    pub entity: EntityId,
    pub pos: Vec2,
    /// Zone the release snap pulled into, if any.
    pub zone: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct DragSession {
    entity: EntityId,
    start_pos: Vec2,
    pointer_start: Vec2,
    /// Clamped position the pointer asks for.
    target: Vec2,
}

/// One drag at a time; pointer coordinates are pixels relative to the surface.
#[derive(Debug, Default)]
pub struct Controller {
    session: Option<DragSession>,
    feedback: Feedback,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer went down somewhere on the surface: pick the closest marker.
    pub fn pointer_down(
        &mut self,
        pointer: Vec2,
        scene: &mut Scene,
        surface: &Surface,
        config: &BoardConfig,
    ) -> DragStart {
        let at = surface.to_normalized(pointer);
        match scene.pick(at, config.hit_radius).map(|e| e.id) {
            Some(id) => self.grab(id, pointer, scene, config),
            None => DragStart::Missed,
        }
    }

    /// Pointer went down on a specific marker.
    pub fn grab(
        &mut self,
        id: EntityId,
        pointer: Vec2,
        scene: &mut Scene,
        config: &BoardConfig,
    ) -> DragStart {
        if self.session.is_some() {
            return DragStart::Busy;
        }
        let Some(entity) = scene.get_mut(id) else {
            return DragStart::Missed;
        };
        if entity.state == DragState::Transitioning {
            log::warn!("marker {} is mid-transition, drag rejected", id.0);
            return DragStart::Rejected(id);
        }

        entity.state = DragState::Dragging;
        entity.vel = Vec2::ZERO;
        entity.scale = config.drag_scale;
        entity.layer = MarkerLayer::Dragged;
        self.session = Some(DragSession {
            entity: id,
            start_pos: entity.pos,
            pointer_start: pointer,
            target: entity.pos,
        });
        self.feedback = Feedback {
            band: Some(PositionBand::from_y(entity.pos.y)),
            zone: None,
        };
        log::debug!("drag start: marker {} ({}) at {:?}", id.0, entity.role, entity.pos);
        DragStart::Started(id)
    }

    /// Pointer moved: update the drag target. Returns false when no drag is live.
    pub fn pointer_move(
        &mut self,
        pointer: Vec2,
        scene: &Scene,
        surface: &Surface,
        config: &BoardConfig,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if scene.get(session.entity).is_none() {
            log::warn!("marker {} vanished mid-drag", session.entity.0);
            self.session = None;
            self.feedback = Feedback::default();
            return false;
        }
        let delta = surface.delta_to_normalized(pointer - session.pointer_start);
        session.target = config.bounds.clamp(session.start_pos + delta);
        true
    }

    /// Run one integrator step on the held marker, then the soft snap.
    /// Returns the held marker only if its position changed.
    pub fn step(&mut self, scene: &mut Scene, zones: &[Zone], config: &BoardConfig) -> Option<EntityId> {
        let session = self.session?;
        let Some(entity) = scene.get_mut(session.entity) else {
            self.session = None;
            self.feedback = Feedback::default();
            return None;
        };
        let before = entity.pos;

        physics::step(entity, session.target, config.spring, &config.bounds);
        let snapped = snap::resolve(entity.pos, zones, SnapMode::Soft, &config.snap);
        entity.pos = config.bounds.clamp(snapped.pos);

        self.feedback = Feedback {
            band: Some(PositionBand::from_y(entity.pos.y)),
            zone: snapped.zone,
        };
        (entity.pos.distance(before) > MOVE_EPSILON).then_some(session.entity)
    }

    /// Pointer released: hard snap and put the marker down.
    pub fn release(&mut self, scene: &mut Scene, zones: &[Zone], config: &BoardConfig) -> Option<DragEnd> {
        let session = self.session.take()?;
        self.feedback = Feedback::default();
        let entity = scene.get_mut(session.entity)?;

        let snapped = snap::resolve(entity.pos, zones, SnapMode::Hard, &config.snap);
        entity.pos = config.bounds.clamp(snapped.pos);
        entity.vel = Vec2::ZERO;
        entity.state = DragState::Idle;
        entity.scale = 1.0;
        entity.layer = MarkerLayer::Markers;

        log::debug!("drag end: marker {} at {:?}", session.entity.0, entity.pos);
        Some(DragEnd {
            entity: session.entity,
            pos: entity.pos,
            zone: snapped.zone,
        })
    }

    /// Abort the drag and put the marker back where it was picked up.
    pub fn cancel(&mut self, scene: &mut Scene) -> Option<EntityId> {
        let session = self.session.take()?;
        self.feedback = Feedback::default();
        let entity = scene.get_mut(session.entity)?;
        entity.pos = session.start_pos;
        entity.vel = Vec2::ZERO;
        entity.state = DragState::Idle;
        entity.scale = 1.0;
        entity.layer = MarkerLayer::Markers;
        log::debug!("drag cancelled: marker {}", session.entity.0);
        Some(session.entity)
    }

    /// Drop the session if it refers to a marker that was removed.
    pub fn forget(&mut self, id: EntityId) {
        if self.dragging() == Some(id) {
            self.session = None;
            self.feedback = Feedback::default();
        }
    }

    pub fn dragging(&self) -> Option<EntityId> {
        self.session.map(|s| s.entity)
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::zones::ZoneCatalog;
    use crate::components::entity::Entity;

    struct Rig {
        scene: Scene,
        surface: Surface,
        config: BoardConfig,
        zones: ZoneCatalog,
        ctl: Controller,
    }

    fn rig() -> Rig {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_role("CM").with_pos(Vec2::new(50.0, 50.0)));
        scene.spawn(Entity::new(EntityId(2)).with_role("ST").with_pos(Vec2::new(50.0, 20.0)));
        Rig {
            scene,
            surface: Surface::new(1000.0, 500.0).unwrap(),
            config: BoardConfig::formation(),
            zones: ZoneCatalog::formation(),
            ctl: Controller::new(),
        }
    }

    #[test]
    fn pointer_down_picks_marker_and_lifts_it() {
        let mut r = rig();
        // (500, 250) px → (50, 50)
        let start = r.ctl.pointer_down(Vec2::new(505.0, 250.0), &mut r.scene, &r.surface, &r.config);
        assert_eq!(start, DragStart::Started(EntityId(1)));
        let e = r.scene.get(EntityId(1)).unwrap();
        assert_eq!(e.state, DragState::Dragging);
        assert_eq!(e.layer, MarkerLayer::Dragged);
        assert_eq!(e.scale, 1.2);
        assert_eq!(r.ctl.feedback().label(), Some("Central zone"));
    }

    #[test]
    fn pointer_down_on_empty_grass_misses() {
        let mut r = rig();
        let start = r.ctl.pointer_down(Vec2::new(900.0, 450.0), &mut r.scene, &r.surface, &r.config);
        assert_eq!(start, DragStart::Missed);
        assert!(!r.ctl.is_dragging());
    }

    #[test]
    fn second_grab_is_busy() {
        let mut r = rig();
        r.ctl.grab(EntityId(1), Vec2::ZERO, &mut r.scene, &r.config);
        assert_eq!(r.ctl.grab(EntityId(2), Vec2::ZERO, &mut r.scene, &r.config), DragStart::Busy);
    }

    #[test]
    fn transitioning_marker_cannot_be_grabbed() {
        let mut r = rig();
        r.scene.get_mut(EntityId(2)).unwrap().state = DragState::Transitioning;
        let start = r.ctl.grab(EntityId(2), Vec2::ZERO, &mut r.scene, &r.config);
        assert_eq!(start, DragStart::Rejected(EntityId(2)));
        assert!(!r.ctl.is_dragging());
    }

    #[test]
    fn move_converts_pixels_and_clamps_target() {
        let mut r = rig();
        r.ctl.grab(EntityId(1), Vec2::new(500.0, 250.0), &mut r.scene, &r.config);
        // +900 px on a 1000 px surface = +90 → clamped to 95
        assert!(r.ctl.pointer_move(Vec2::new(1400.0, 250.0), &r.scene, &r.surface, &r.config));
        for _ in 0..300 {
            r.ctl.step(&mut r.scene, r.zones.zones(), &r.config);
        }
        let e = r.scene.get(EntityId(1)).unwrap();
        assert!((e.pos.x - 95.0).abs() < 0.05, "x = {}", e.pos.x);
    }

    #[test]
    fn step_springs_toward_target_without_overshooting_bounds() {
        let mut r = rig();
        r.ctl.grab(EntityId(1), Vec2::new(500.0, 250.0), &mut r.scene, &r.config);
        r.ctl.pointer_move(Vec2::new(500.0, 0.0), &r.scene, &r.surface, &r.config);
        let before = r.scene.get(EntityId(1)).unwrap().pos.y;
        r.ctl.step(&mut r.scene, r.zones.zones(), &r.config);
        let after = r.scene.get(EntityId(1)).unwrap().pos.y;
        assert!(after < before);
        assert!(r.config.bounds.contains(r.scene.get(EntityId(1)).unwrap().pos));
    }

    #[test]
    fn still_marker_reports_no_movement() {
        let mut r = rig();
        let striker = r.zones.find("striker").unwrap().center;
        r.scene.get_mut(EntityId(2)).unwrap().pos = striker;
        r.ctl.grab(EntityId(2), Vec2::ZERO, &mut r.scene, &r.config);
        assert!(r.ctl.step(&mut r.scene, r.zones.zones(), &r.config).is_none());
        assert!(r.ctl.feedback().band.is_some());

        r.ctl.pointer_move(Vec2::new(300.0, 200.0), &r.scene, &r.surface, &r.config);
        assert_eq!(r.ctl.step(&mut r.scene, r.zones.zones(), &r.config), Some(EntityId(2)));
    }

    #[test]
    fn release_hard_snaps_into_zone() {
        let mut r = rig();
        let striker = r.zones.find("striker").unwrap().center;
        r.scene.get_mut(EntityId(2)).unwrap().pos = striker;
        r.ctl.grab(EntityId(2), Vec2::ZERO, &mut r.scene, &r.config);
        let end = r.ctl.release(&mut r.scene, r.zones.zones(), &r.config).unwrap();
        assert_eq!(end.pos, striker);
        assert_eq!(end.zone, Some(0));
        let e = r.scene.get(EntityId(2)).unwrap();
        assert!(e.is_idle());
        assert_eq!(e.scale, 1.0);
        assert_eq!(e.layer, MarkerLayer::Markers);
        assert!(r.ctl.feedback().is_empty());
    }

    #[test]
    fn cancel_restores_pickup_position() {
        let mut r = rig();
        r.ctl.grab(EntityId(1), Vec2::new(500.0, 250.0), &mut r.scene, &r.config);
        r.ctl.pointer_move(Vec2::new(800.0, 100.0), &r.scene, &r.surface, &r.config);
        for _ in 0..10 {
            r.ctl.step(&mut r.scene, r.zones.zones(), &r.config);
        }
        assert_eq!(r.ctl.cancel(&mut r.scene), Some(EntityId(1)));
        assert_eq!(r.scene.get(EntityId(1)).unwrap().pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn vanished_marker_is_a_no_op() {
        let mut r = rig();
        r.ctl.grab(EntityId(1), Vec2::ZERO, &mut r.scene, &r.config);
        r.scene.despawn(EntityId(1));
        assert!(!r.ctl.pointer_move(Vec2::new(10.0, 10.0), &r.scene, &r.surface, &r.config));
        assert!(r.ctl.release(&mut r.scene, r.zones.zones(), &r.config).is_none());
        assert!(r.ctl.step(&mut r.scene, r.zones.zones(), &r.config).is_none());
    }
}
