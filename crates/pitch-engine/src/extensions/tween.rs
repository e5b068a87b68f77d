// extensions/tween.rs
//
// Position tweens keyed by EntityId. The transition animator builds on this;
// tweens write `Entity.pos` directly and bypass the drag integrator.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(entity_id, Tween::new(from, to, 0.45, Easing::QuadInOut));
//   let finished = tweens.tick(dt, &mut scene, &bounds);

use std::collections::BTreeMap;
use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::entity::DragState;
use crate::core::scene::Scene;
use crate::core::surface::Bounds;
use super::easing::{Easing, ease_vec2};

/// A single marker glide from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Tween {
    pub from: Vec2,
    pub to: Vec2,
    /// Seconds from start to landing.
    pub duration: f32,
    /// Elapsed time in seconds.
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Fraction of the duration elapsed, clamped to 0..=1.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Position at the current progress. Exactly `to` once complete.
    pub fn sample(&self) -> Vec2 {
        if self.is_complete() {
            self.to
        } else {
            ease_vec2(self.from, self.to, self.progress(), self.easing)
        }
    }
}

/// Handle returned by `TweenState::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// Running marker tweens.
/// Ordered by handle so ticks are deterministic.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: BTreeMap<TweenId, (EntityId, Tween)>,
    next_id: u32,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for an entity, replacing any tween it already had.
    pub fn add(&mut self, entity: EntityId, tween: Tween) -> TweenId {
        self.remove_entity(entity);
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (entity, tween));
        id
    }

    /// Remove all tweens for an entity. Returns whether any existed.
    pub fn remove_entity(&mut self, entity: EntityId) -> bool {
        let before = self.tweens.len();
        self.tweens.retain(|_, (e, _)| *e != entity);
        self.tweens.len() != before
    }

    pub fn has_entity(&self, entity: EntityId) -> bool {
        self.tweens.values().any(|(e, _)| *e == entity)
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id).map(|(_, t)| t)
    }

    /// Advance all tweens and write positions into the scene, clamped to
    /// `bounds` so overshooting curves never carry a marker off the pitch.
    ///
    /// Returns the entities whose tween completed this tick; those are put
    /// back to `Idle`. Tweens whose entity has left the scene are dropped
    /// silently and not reported.
    pub fn tick(&mut self, dt: f32, scene: &mut Scene, bounds: &Bounds) -> Vec<EntityId> {
        let mut finished = Vec::new();
        let mut dropped = Vec::new();

        for (&id, (entity_id, tween)) in self.tweens.iter_mut() {
            tween.elapsed += dt;

            let Some(entity) = scene.get_mut(*entity_id) else {
                dropped.push(id);
                continue;
            };
            entity.pos = bounds.clamp(tween.sample());

            if tween.is_complete() {
                entity.state = DragState::Idle;
                entity.vel = Vec2::ZERO;
                finished.push((id, *entity_id));
            }
        }

        for id in dropped {
            self.tweens.remove(&id);
        }
        finished
            .into_iter()
            .map(|(id, entity)| {
                self.tweens.remove(&id);
                entity
            })
            .collect()
    }

    /// Tweens still running.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}
