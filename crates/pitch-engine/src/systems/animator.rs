//! Preset transitions: staggered glides from the current layout to a preset.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::EntityId;
use crate::catalog::presets::Preset;
use crate::components::entity::DragState;
use crate::core::scene::Scene;
use crate::core::surface::Bounds;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenState};

/// Timing of a transition: marker `i` glides for `base + i * per_entity` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTiming {
    pub base: f32,
    pub per_entity: f32,
    #[serde(default)]
    pub easing: Easing,
}

impl TransitionTiming {
    pub const FORMATION: Self = Self {
        base: 0.4,
        per_entity: 0.05,
        easing: Easing::QuadInOut,
    };

    pub const SET_PIECE: Self = Self {
        base: 0.3,
        per_entity: 0.1,
        easing: Easing::QuadInOut,
    };

    pub fn duration_for(&self, index: usize) -> f32 {
        self.base + index as f32 * self.per_entity
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self::FORMATION
    }
}

/// What happened to a preset switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    /// Markers are gliding to the preset.
    Started { markers: usize },
    /// Another transition or a drag is in flight; this one runs afterwards.
    Queued,
    /// Nothing to move (empty preset or board); applied immediately.
    Completed,
}

#[derive(Debug)]
struct Running {
    preset: String,
    markers: usize,
}

/// Drives preset transitions and remembers the next one while busy.
#[derive(Debug, Default)]
pub struct Animator {
    tweens: TweenState,
    running: Option<Running>,
    queued: Option<String>,
}

/// A transition that just finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finished {
    pub preset: String,
    pub markers: usize,
}

impl Animator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start gliding markers to `preset`.
    ///
    /// Slot `i` goes to the `i`-th marker in spawn order; extra slots or extra
    /// markers are left alone. Each matched marker takes the slot's role and
    /// enters `Transitioning`. Returns how many markers were set moving.
    pub fn start(
        &mut self,
        preset: &Preset,
        scene: &mut Scene,
        bounds: &Bounds,
        timing: &TransitionTiming,
    ) -> usize {
        let mut markers = 0;
        for (index, (entity, slot)) in scene.iter_mut().zip(&preset.slots).enumerate() {
            let target = bounds.clamp(slot.pos);
            entity.role.clone_from(&slot.role);
            entity.vel = Vec2::ZERO;
            entity.state = DragState::Transitioning;
            self.tweens.add(
                entity.id,
                Tween::new(entity.pos, target, timing.duration_for(index), timing.easing),
            );
            markers += 1;
        }

        if markers > 0 {
            log::debug!("transition to `{}` started for {} markers", preset.name, markers);
            self.running = Some(Running {
                preset: preset.name.clone(),
                markers,
            });
        }
        markers
    }

    /// Advance the running transition.
    /// Returns the transition once its last marker has landed.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene, bounds: &Bounds) -> Option<Finished> {
        self.running.as_ref()?;
        self.tweens.tick(dt, scene, bounds);
        if !self.tweens.is_empty() {
            return None;
        }
        let Running { preset, markers } = self.running.take()?;
        log::debug!("transition to `{preset}` finished");
        Some(Finished { preset, markers })
    }

    /// Forget a marker that left the board mid-transition.
    pub fn forget(&mut self, entity: EntityId) {
        self.tweens.remove_entity(entity);
    }

    /// Drop the running transition and any queued one. Markers stay where
    /// they are and go back to `Idle`.
    pub fn abort(&mut self, scene: &mut Scene) -> bool {
        let was_running = self.running.take().is_some();
        self.queued = None;
        self.tweens.clear();
        for entity in scene.iter_mut() {
            if entity.state == DragState::Transitioning {
                entity.state = DragState::Idle;
            }
        }
        was_running
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Remember `preset` to run after the current work. The latest request wins.
    pub fn enqueue(&mut self, preset: &str) {
        if let Some(prev) = self.queued.replace(preset.to_string()) {
            log::debug!("queued transition `{prev}` superseded by `{preset}`");
        }
    }

    pub fn take_queued(&mut self) -> Option<String> {
        self.queued.take()
    }

    pub fn queued(&self) -> Option<&str> {
        self.queued.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::DiagramKind;
    use crate::components::entity::Entity;

    fn scene_of(n: u32) -> Scene {
        let mut scene = Scene::new();
        for i in 0..n {
            scene.spawn(Entity::new(EntityId(i + 1)).with_pos(Vec2::new(50.0, 50.0)));
        }
        scene
    }

    fn line(n: usize) -> Preset {
        let slots: Vec<(&str, f32, f32)> =
            (0..n).map(|i| ("P", 10.0 + i as f32 * 10.0, 20.0)).collect();
        Preset::new("line", DiagramKind::Formation, &slots)
    }

    #[test]
    fn stagger_grows_with_index() {
        let t = TransitionTiming::FORMATION;
        assert!((t.duration_for(0) - 0.4).abs() < 1e-6);
        assert!((t.duration_for(4) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn markers_land_on_slots_and_finish_once() {
        let mut scene = scene_of(5);
        let bounds = Bounds::inset(5.0);
        let mut animator = Animator::new();
        let timing = TransitionTiming::SET_PIECE; // 0.3 + 0.1 * i, last = 0.7
        let moved = animator.start(&line(5), &mut scene, &bounds, &timing);
        assert_eq!(moved, 5);
        assert!(scene.iter().all(|e| e.state == DragState::Transitioning));

        assert!(animator.tick(0.5, &mut scene, &bounds).is_none());
        // first three have landed, last two still gliding
        assert_eq!(scene.get(EntityId(1)).unwrap().state, DragState::Idle);
        assert_eq!(scene.get(EntityId(5)).unwrap().state, DragState::Transitioning);

        let done = animator.tick(0.3, &mut scene, &bounds).unwrap();
        assert_eq!(done.markers, 5);
        assert!(animator.tick(0.1, &mut scene, &bounds).is_none());

        for (i, e) in scene.iter().enumerate() {
            assert_eq!(e.pos, Vec2::new(10.0 + i as f32 * 10.0, 20.0));
            assert!(e.is_idle());
        }
    }

    #[test]
    fn excess_slots_are_ignored() {
        let mut scene = scene_of(3);
        let bounds = Bounds::inset(5.0);
        let mut animator = Animator::new();
        let moved = animator.start(&line(8), &mut scene, &bounds, &TransitionTiming::FORMATION);
        assert_eq!(moved, 3);
    }

    #[test]
    fn extra_markers_stay_put() {
        let mut scene = scene_of(4);
        let bounds = Bounds::inset(5.0);
        let mut animator = Animator::new();
        animator.start(&line(2), &mut scene, &bounds, &TransitionTiming::FORMATION);
        animator.tick(2.0, &mut scene, &bounds);
        assert_eq!(scene.get(EntityId(4)).unwrap().pos, Vec2::new(50.0, 50.0));
    }

    #[test]
    fn targets_are_clamped_to_inset() {
        let mut scene = scene_of(1);
        let bounds = Bounds::inset(8.0);
        let mut animator = Animator::new();
        let edge = Preset::new("edge", DiagramKind::SetPiece, &[("corner-taker", 99.0, 99.0)]);
        animator.start(&edge, &mut scene, &bounds, &TransitionTiming::SET_PIECE);
        animator.tick(1.0, &mut scene, &bounds);
        assert_eq!(scene.get(EntityId(1)).unwrap().pos, Vec2::new(92.0, 92.0));
        assert_eq!(scene.get(EntityId(1)).unwrap().role, "corner-taker");
    }

    #[test]
    fn back_out_transition_stays_inside_bounds() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(10.0, 50.0)));
        let bounds = Bounds::inset(5.0);
        let timing = TransitionTiming { easing: Easing::BackOut, ..TransitionTiming::FORMATION };
        let wide = Preset::new("wide", DiagramKind::Formation, &[("RW", 95.0, 50.0)]);
        let mut animator = Animator::new();
        animator.start(&wide, &mut scene, &bounds, &timing);

        let mut finished = None;
        for _ in 0..45 {
            finished = finished.or(animator.tick(0.01, &mut scene, &bounds));
            assert!(bounds.contains(scene.get(EntityId(1)).unwrap().pos));
        }
        assert!(finished.is_some());
        assert_eq!(scene.get(EntityId(1)).unwrap().pos, Vec2::new(95.0, 50.0));
    }

    #[test]
    fn empty_preset_never_runs() {
        let mut scene = scene_of(3);
        let bounds = Bounds::inset(5.0);
        let mut animator = Animator::new();
        let moved = animator.start(&line(0), &mut scene, &bounds, &TransitionTiming::FORMATION);
        assert_eq!(moved, 0);
        assert!(!animator.is_running());
    }

    #[test]
    fn forgetting_the_last_marker_finishes_the_transition() {
        let mut scene = scene_of(2);
        let bounds = Bounds::inset(5.0);
        let mut animator = Animator::new();
        animator.start(&line(2), &mut scene, &bounds, &TransitionTiming::FORMATION);
        for id in [EntityId(1), EntityId(2)] {
            scene.despawn(id);
            animator.forget(id);
        }
        assert!(animator.tick(0.01, &mut scene, &bounds).is_some());
    }

    #[test]
    fn abort_releases_markers() {
        let mut scene = scene_of(3);
        let bounds = Bounds::inset(5.0);
        let mut animator = Animator::new();
        animator.start(&line(3), &mut scene, &bounds, &TransitionTiming::FORMATION);
        animator.enqueue("next");
        assert!(animator.abort(&mut scene));
        assert!(scene.iter().all(|e| e.is_idle()));
        assert!(animator.queued().is_none());
        assert!(animator.tick(1.0, &mut scene, &bounds).is_none());
    }

    #[test]
    fn latest_queued_request_wins() {
        let mut animator = Animator::new();
        animator.enqueue("4-4-2");
        animator.enqueue("4-3-3");
        assert_eq!(animator.take_queued().as_deref(), Some("4-3-3"));
        assert!(animator.queued().is_none());
    }
}
