// extensions/mod.rs
//
// Time-based helpers decoupled from the board: easing curves and
// position tweens. The animator opts in to them; nothing else depends on them.

pub mod easing;
pub mod tween;

pub use easing::{ease_vec2, lerp_vec2, Easing};
pub use tween::{Tween, TweenId, TweenState};
