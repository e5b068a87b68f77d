pub mod scene;
pub mod surface;
pub mod time;
