//! The board: one mounted tactical diagram and everything that moves on it.

use glam::Vec2;

use crate::api::config::{BoardConfig, PhysicsDrive};
use crate::api::types::{BoardEvent, DiagramKind, EntityId};
use crate::catalog::presets::{Preset, PresetLibrary};
use crate::catalog::zones::ZoneCatalog;
use crate::components::entity::{DragState, Entity};
use crate::components::zone::Zone;
use crate::core::scene::Scene;
use crate::core::surface::Surface;
use crate::core::time::{FixedTimestep, Scheduler};
use crate::error::BoardError;
use crate::input::queue::{InputEvent, InputQueue};
use crate::systems::animator::{Animator, TransitionStatus};
use crate::systems::controller::{Controller, DragStart, Feedback};
use crate::systems::metrics::{self, MetricsSnapshot};
use crate::systems::projection::{build_marker_buffer, MarkerBuffer};

/// Receives every fresh metrics snapshot.
pub trait MetricsObserver {
    fn on_metrics_updated(&mut self, snapshot: &MetricsSnapshot);
}

impl<F: FnMut(&MetricsSnapshot)> MetricsObserver for F {
    fn on_metrics_updated(&mut self, snapshot: &MetricsSnapshot) {
        self(snapshot)
    }
}

/// Work deferred on the board clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Recompute once the release snap has settled.
    RefreshMetrics,
}

pub struct Board {
    config: BoardConfig,
    kind: DiagramKind,
    surface: Surface,
    scene: Scene,
    catalog: ZoneCatalog,
    presets: PresetLibrary,
    active_preset: String,
    controller: Controller,
    animator: Animator,
    timestep: FixedTimestep,
    scheduler: Scheduler<Deferred>,
    input: InputQueue,
    metrics: MetricsSnapshot,
    observers: Vec<Box<dyn MetricsObserver>>,
    events: Vec<BoardEvent>,
    markers: MarkerBuffer,
}

impl Board {
    /// Mount a board: one marker per slot of `preset`, placed without animation.
    pub fn mount(
        kind: DiagramKind,
        surface: Surface,
        config: BoardConfig,
        catalog: ZoneCatalog,
        presets: PresetLibrary,
        preset: &str,
    ) -> Result<Self, BoardError> {
        config.validate()?;
        catalog.validate()?;
        if catalog.kind != kind {
            return Err(BoardError::InvalidConfig(format!(
                "zone catalog is for {}, board is {}",
                catalog.kind.as_str(),
                kind.as_str()
            )));
        }
        let initial = presets.lookup(preset, kind)?.clone();

        let mut scene = Scene::new();
        for (index, slot) in initial.slots.iter().enumerate() {
            scene.spawn(
                Entity::new(EntityId(index as u32 + 1))
                    .with_role(slot.role.clone())
                    .with_pos(config.bounds.clamp(slot.pos)),
            );
        }
        let metrics = metrics::compute(kind, &scene, &catalog);

        log::info!(
            "board mounted: {} with `{}` ({} markers, {} zones)",
            kind.as_str(),
            initial.name,
            scene.len(),
            catalog.len()
        );

        Ok(Self {
            timestep: FixedTimestep::new(config.fixed_dt),
            config,
            kind,
            surface,
            scene,
            catalog,
            presets,
            active_preset: initial.name,
            controller: Controller::new(),
            animator: Animator::new(),
            scheduler: Scheduler::new(),
            input: InputQueue::new(),
            metrics,
            observers: Vec::new(),
            events: Vec::with_capacity(16),
            markers: MarkerBuffer::new(),
        })
    }

    /// Mount with the built-in catalog, presets and tuning for `kind`.
    pub fn mount_default(kind: DiagramKind, width: f32, height: f32, preset: &str) -> Result<Self, BoardError> {
        Self::mount(
            kind,
            Surface::new(width, height)?,
            BoardConfig::for_kind(kind),
            ZoneCatalog::builtin(kind),
            PresetLibrary::builtin(),
            preset,
        )
    }

    // ── Presets ─────────────────────────────────────────────────────────

    /// Animate the markers to `name`.
    ///
    /// While a transition or a drag is in flight the request is queued and
    /// runs once the board is idle; a later request replaces it.
    pub fn switch_preset(&mut self, name: &str) -> Result<TransitionStatus, BoardError> {
        let preset = self.presets.lookup(name, self.kind)?.clone();
        if self.animator.is_running() || self.controller.is_dragging() {
            log::warn!("board busy, `{name}` queued");
            self.animator.enqueue(name);
            return Ok(TransitionStatus::Queued);
        }
        log::info!("switching to `{name}`");
        Ok(self.start_transition(&preset))
    }

    /// Put the markers on `name` at once, abandoning any drag or transition.
    pub fn apply_preset_instant(&mut self, name: &str) -> Result<(), BoardError> {
        let preset = self.presets.lookup(name, self.kind)?.clone();
        self.controller.cancel(&mut self.scene);
        self.animator.abort(&mut self.scene);
        self.scheduler.cancel_where(|_| true);

        for (entity, slot) in self.scene.iter_mut().zip(&preset.slots) {
            entity.role.clone_from(&slot.role);
            entity.pos = self.config.bounds.clamp(slot.pos);
            entity.vel = Vec2::ZERO;
            entity.state = DragState::Idle;
        }
        log::info!("applied `{name}` instantly");
        self.active_preset = preset.name;
        self.refresh_metrics();
        Ok(())
    }

    fn start_transition(&mut self, preset: &Preset) -> TransitionStatus {
        // The landing refresh supersedes a pending settle refresh.
        self.scheduler.cancel_where(|task| *task == Deferred::RefreshMetrics);
        self.active_preset.clone_from(&preset.name);
        let markers = self
            .animator
            .start(preset, &mut self.scene, &self.config.bounds, &self.config.transition);
        if markers == 0 {
            self.refresh_metrics();
            return TransitionStatus::Completed;
        }
        TransitionStatus::Started { markers }
    }

    // ── Metrics ─────────────────────────────────────────────────────────

    pub fn subscribe<O: MetricsObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// The snapshot from the most recent refresh.
    pub fn metrics(&self) -> &MetricsSnapshot {
        &self.metrics
    }

    fn refresh_metrics(&mut self) {
        self.metrics = metrics::compute(self.kind, &self.scene, &self.catalog);
        for observer in self.observers.iter_mut() {
            observer.on_metrics_updated(&self.metrics);
        }
        let event = match &self.metrics {
            MetricsSnapshot::Formation(m) => {
                BoardEvent::new(BoardEvent::METRICS_UPDATED, m.width, m.compactness, m.balance)
            }
            MetricsSnapshot::SetPiece(m) => BoardEvent::new(
                BoardEvent::METRICS_UPDATED,
                m.shot_probability,
                m.goal_probability,
                0.0,
            ),
        };
        self.events.push(event);
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Pointer down anywhere on the surface; picks the closest marker.
    pub fn pointer_down(&mut self, x: f32, y: f32) -> DragStart {
        let start = self
            .controller
            .pointer_down(Vec2::new(x, y), &mut self.scene, &self.surface, &self.config);
        self.on_drag_start(start);
        start
    }

    /// Pointer down on a known marker.
    pub fn grab(&mut self, id: EntityId, x: f32, y: f32) -> DragStart {
        let start = self.controller.grab(id, Vec2::new(x, y), &mut self.scene, &self.config);
        self.on_drag_start(start);
        start
    }

    fn on_drag_start(&mut self, start: DragStart) {
        match start {
            DragStart::Started(id) => {
                self.timestep.reset();
                self.events
                    .push(BoardEvent::new(BoardEvent::DRAG_STARTED, id.0 as f32, 0.0, 0.0));
            }
            DragStart::Rejected(id) => self
                .events
                .push(BoardEvent::new(BoardEvent::DRAG_REJECTED, id.0 as f32, 0.0, 0.0)),
            DragStart::Busy | DragStart::Missed => {}
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        if !self
            .controller
            .pointer_move(Vec2::new(x, y), &self.scene, &self.surface, &self.config)
        {
            return;
        }
        if self.config.drive == PhysicsDrive::PerEvent
            && self
                .controller
                .step(&mut self.scene, self.catalog.zones(), &self.config)
                .is_some()
        {
            self.refresh_metrics();
        }
    }

    /// Release: hard snap, then refresh metrics after the settle delay.
    pub fn pointer_up(&mut self, _x: f32, _y: f32) {
        let Some(end) = self
            .controller
            .release(&mut self.scene, self.catalog.zones(), &self.config)
        else {
            return;
        };
        let id = end.entity.0 as f32;
        self.events
            .push(BoardEvent::new(BoardEvent::DRAG_ENDED, id, end.pos.x, end.pos.y));
        if let Some(zone) = end.zone {
            self.events
                .push(BoardEvent::new(BoardEvent::ZONE_SNAPPED, id, zone as f32, 0.0));
        }
        self.scheduler
            .schedule(self.config.settle_delay, Deferred::RefreshMetrics);
    }

    /// Abort the drag, putting the marker back where it was picked up.
    pub fn pointer_cancel(&mut self) {
        if self.controller.cancel(&mut self.scene).is_some() {
            self.refresh_metrics();
        }
    }

    /// Apply one input event now.
    pub fn handle_input(&mut self, event: InputEvent) {
        if event.is_cancel() {
            self.pointer_cancel();
            return;
        }
        match event {
            InputEvent::PointerDown { x, y } => {
                self.pointer_down(x, y);
            }
            InputEvent::Grab { entity, x, y } => {
                self.grab(entity, x, y);
            }
            InputEvent::PointerMove { x, y } => self.pointer_move(x, y),
            InputEvent::PointerUp { x, y } => self.pointer_up(x, y),
            InputEvent::PointerCancel | InputEvent::KeyDown { .. } => {}
        }
    }

    /// Queue an input event for the next `tick`.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    // ── Frame ───────────────────────────────────────────────────────────

    /// Advance the board by `dt` seconds of frame time.
    pub fn tick(&mut self, dt: f32) {
        for event in self.input.drain() {
            self.handle_input(event);
        }

        let steps = self.timestep.accumulate(dt);
        if self.config.drive == PhysicsDrive::FixedStep && self.controller.is_dragging() {
            let mut moved = false;
            for _ in 0..steps {
                moved |= self
                    .controller
                    .step(&mut self.scene, self.catalog.zones(), &self.config)
                    .is_some();
            }
            if moved {
                self.refresh_metrics();
            }
        }

        if let Some(done) = self.animator.tick(dt, &mut self.scene, &self.config.bounds) {
            self.events.push(BoardEvent::new(
                BoardEvent::TRANSITION_FINISHED,
                done.markers as f32,
                0.0,
                0.0,
            ));
            self.refresh_metrics();
        }

        if !self.animator.is_running() && !self.controller.is_dragging() {
            if let Some(name) = self.animator.take_queued() {
                match self.presets.lookup(&name, self.kind) {
                    Ok(preset) => {
                        let preset = preset.clone();
                        log::info!("running queued `{name}`");
                        self.start_transition(&preset);
                    }
                    Err(e) => log::warn!("dropping queued preset: {e}"),
                }
            }
        }

        let due = self.scheduler.advance(dt);
        if due.contains(&Deferred::RefreshMetrics) {
            self.refresh_metrics();
        }
    }

    // ── Markers ─────────────────────────────────────────────────────────

    /// Tear down one marker. Any drag or glide it was part of is dropped.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        if self.scene.despawn(id).is_none() {
            log::warn!("remove_entity: no marker {}", id.0);
            return false;
        }
        self.controller.forget(id);
        self.animator.forget(id);
        self.refresh_metrics();
        true
    }

    /// Rebuild and return the marker projection.
    pub fn markers(&mut self) -> &MarkerBuffer {
        build_marker_buffer(self.scene.iter(), &mut self.markers);
        &self.markers
    }

    pub fn resize_surface(&mut self, width: f32, height: f32) -> Result<(), BoardError> {
        self.surface.resize(width, height)
    }

    /// Drain events emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop every marker, observer and pending task.
    pub fn teardown(&mut self) {
        self.controller.cancel(&mut self.scene);
        self.animator.abort(&mut self.scene);
        self.scheduler.cancel_where(|_| true);
        self.input.clear();
        self.observers.clear();
        self.events.clear();
        self.scene.clear();
        self.timestep.reset();
        log::info!("board torn down ({})", self.kind.as_str());
    }

    // ── Accessors ───────────────────────────────────────────────────────

    pub fn kind(&self) -> DiagramKind {
        self.kind
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn zones(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn presets(&self) -> &PresetLibrary {
        &self.presets
    }

    pub fn active_preset(&self) -> &str {
        &self.active_preset
    }

    pub fn feedback(&self) -> &Feedback {
        self.controller.feedback()
    }

    /// Zone to highlight under the held marker.
    pub fn highlighted_zone(&self) -> Option<&Zone> {
        self.controller.feedback().zone.and_then(|i| self.catalog.get(i))
    }

    pub fn dragging(&self) -> Option<EntityId> {
        self.controller.dragging()
    }

    pub fn is_transitioning(&self) -> bool {
        self.animator.is_running()
    }

    pub fn queued_preset(&self) -> Option<&str> {
        self.animator.queued()
    }
}
