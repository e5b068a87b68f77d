use glam::Vec2;
use crate::api::types::EntityId;
use crate::components::entity::Entity;

/// Marker storage using a flat Vec.
///
/// Spawn order is preserved, including across removals: preset transitions
/// address markers by index, so a marker's slot must not change when a
/// teammate is removed.
pub struct Scene {
    entities: Vec<Entity>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: Vec::with_capacity(16),
        }
    }

    /// Add a marker at the end of the spawn order.
    pub fn spawn(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove a marker by ID. Returns the removed marker if found.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let idx = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Iterate over all markers in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    /// Positions of all markers, in spawn order.
    pub fn positions(&self) -> Vec<Vec2> {
        self.entities.iter().map(|e| e.pos).collect()
    }

    /// Find the first marker with the given role.
    pub fn find_by_role(&self, role: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.role == role)
    }

    /// Closest marker to `point` within `radius`.
    pub fn pick(&self, point: Vec2, radius: f32) -> Option<&Entity> {
        self.entities
            .iter()
            .map(|e| (e, e.pos.distance(point)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(e, _)| e)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_and_get() {
        let mut scene = Scene::new();
        let id = EntityId(1);
        scene.spawn(Entity::new(id).with_pos(Vec2::new(10.0, 20.0)));
        assert_eq!(scene.get(id).unwrap().pos, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn despawn_keeps_spawn_order() {
        let mut scene = Scene::new();
        for i in 1..=4 {
            scene.spawn(Entity::new(EntityId(i)));
        }
        scene.despawn(EntityId(2));
        let ids: Vec<u32> = scene.iter().map(|e| e.id.0).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn find_by_role() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_role("GK"));
        scene.spawn(Entity::new(EntityId(2)).with_role("ST"));
        assert_eq!(scene.find_by_role("ST").unwrap().id, EntityId(2));
    }

    #[test]
    fn pick_prefers_closest_in_radius() {
        let mut scene = Scene::new();
        scene.spawn(Entity::new(EntityId(1)).with_pos(Vec2::new(50.0, 50.0)));
        scene.spawn(Entity::new(EntityId(2)).with_pos(Vec2::new(53.0, 50.0)));
        assert_eq!(scene.pick(Vec2::new(52.0, 50.0), 4.0).unwrap().id, EntityId(2));
        assert!(scene.pick(Vec2::new(80.0, 80.0), 4.0).is_none());
    }
}
