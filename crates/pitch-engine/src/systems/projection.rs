use bytemuck::{Pod, Zeroable};

use crate::components::entity::Entity;

/// Per-marker view data read by the web shell straight out of wasm memory.
/// 6 floats = 24 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct MarkerInstance {
    /// Normalized x (0–100), i.e. `left: x%`.
    pub x: f32,
    /// Normalized y (0–100), i.e. `top: y%`.
    pub y: f32,
    pub scale: f32,
    /// `MarkerLayer` discriminant.
    pub layer: f32,
    /// `DragState` discriminant.
    pub state: f32,
    pub id: f32,
}

impl MarkerInstance {
    pub const FLOATS: usize = 6;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            x: entity.pos.x,
            y: entity.pos.y,
            scale: entity.scale,
            layer: entity.layer.as_u8() as f32,
            state: entity.state.as_u8() as f32,
            id: entity.id.0 as f32,
        }
    }
}

/// Projection of every marker, ordered back-to-front.
pub struct MarkerBuffer {
    pub instances: Vec<MarkerInstance>,
}

impl MarkerBuffer {
    pub fn new() -> Self {
        Self {
            instances: Vec::with_capacity(32),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    pub fn count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.instances)
    }

    /// Raw pointer for zero-copy reads from JS.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}

impl Default for MarkerBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild `buffer` from `entities`, sorted by layer so a held marker is last.
/// Markers on the same layer keep their spawn order.
pub fn build_marker_buffer<'a>(entities: impl Iterator<Item = &'a Entity>, buffer: &mut MarkerBuffer) {
    buffer.clear();
    let mut ordered: Vec<&Entity> = entities.collect();
    ordered.sort_by_key(|e| e.layer);
    buffer
        .instances
        .extend(ordered.into_iter().map(MarkerInstance::from_entity));
}
