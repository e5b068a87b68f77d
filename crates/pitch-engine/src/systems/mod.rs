pub mod animator;
pub mod controller;
pub mod metrics;
pub mod physics;
pub mod projection;
pub mod snap;
