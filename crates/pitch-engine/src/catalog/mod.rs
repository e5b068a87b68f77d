pub mod presets;
pub mod zones;
