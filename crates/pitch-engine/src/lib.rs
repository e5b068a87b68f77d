pub mod api;
pub mod catalog;
pub mod components;
pub mod core;
pub mod error;
pub mod extensions;
pub mod input;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::board::{Board, MetricsObserver};
pub use api::config::{BoardConfig, PhysicsDrive};
pub use api::types::{BoardEvent, DiagramKind, EntityId};
pub use catalog::presets::{Preset, PresetLibrary, PresetSlot};
pub use catalog::zones::ZoneCatalog;
pub use components::entity::{DragState, Entity, CORNER_TAKER};
pub use components::layer::MarkerLayer;
pub use components::zone::{Zone, ZoneClass};
pub use core::scene::Scene;
pub use core::surface::{Bounds, Surface, SURFACE_SPAN};
pub use core::time::{FixedTimestep, Scheduler};
pub use error::BoardError;
pub use input::queue::{InputEvent, InputQueue};
pub use systems::animator::{TransitionStatus, TransitionTiming};
pub use systems::controller::{DragStart, Feedback};
pub use systems::metrics::{FormationMetrics, MetricsSnapshot, SetPieceMetrics, ThreatTier, ZoneThreat};
pub use systems::physics::{PositionBand, SpringParams};
pub use systems::projection::{MarkerBuffer, MarkerInstance};
pub use systems::snap::{SnapConfig, SnapMode};

pub use extensions::{Easing, Tween, TweenState};
