//! Magnetic zone attraction.
//!
//! A proposed point is pulled toward the nearest zone it lies inside, with a
//! pull that falls off linearly from 1 at the center to 0 at the rim.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::components::zone::Zone;

/// Tuning for the two snap modes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapConfig {
    /// Fraction of the pull applied while the pointer is still down.
    pub soft_dampening: f32,
    /// On release the snap only fires closer than this to the zone center.
    pub hard_threshold: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            soft_dampening: 0.3,
            hard_threshold: 15.0,
        }
    }
}

/// Partial pull during a drag, or the full pull on release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapMode {
    Soft,
    Hard,
}

/// The zone a point is attracted to.
#[derive(Debug, Clone, Copy)]
pub struct ZoneHit<'a> {
    /// Index in the catalog.
    pub index: usize,
    pub zone: &'a Zone,
    pub distance: f32,
}

impl ZoneHit<'_> {
    /// `1 - distance / radius`: 1 at the center, 0 at the rim.
    pub fn pull(&self) -> f32 {
        1.0 - self.distance / self.zone.radius
    }
}

/// Outcome of a snap resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapped {
    pub pos: Vec2,
    /// Catalog index of the zone that moved the point, if any.
    pub zone: Option<usize>,
}

/// Nearest zone whose radius strictly contains `point`.
///
/// Ties go to the zone listed first.
pub fn nearest_zone(point: Vec2, zones: &[Zone]) -> Option<ZoneHit<'_>> {
    let mut best: Option<ZoneHit<'_>> = None;
    for (index, zone) in zones.iter().enumerate() {
        let distance = zone.distance_to(point);
        if distance >= zone.radius {
            continue;
        }
        if best.map_or(true, |b| distance < b.distance) {
            best = Some(ZoneHit { index, zone, distance });
        }
    }
    best
}

/// Blend `point` toward the hit zone's center by `pull * dampening`.
#[inline]
pub fn blend(point: Vec2, hit: &ZoneHit<'_>, dampening: f32) -> Vec2 {
    point + (hit.zone.center - point) * hit.pull() * dampening
}

/// Resolve a proposed position against the active zones.
pub fn resolve(point: Vec2, zones: &[Zone], mode: SnapMode, config: &SnapConfig) -> Snapped {
    let unchanged = Snapped { pos: point, zone: None };
    let Some(hit) = nearest_zone(point, zones) else {
        return unchanged;
    };

    match mode {
        SnapMode::Soft => Snapped {
            pos: blend(point, &hit, config.soft_dampening),
            zone: Some(hit.index),
        },
        SnapMode::Hard if hit.distance < config.hard_threshold => Snapped {
            pos: blend(point, &hit, 1.0),
            zone: Some(hit.index),
        },
        SnapMode::Hard => unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::zones::ZoneCatalog;

    fn zone(x: f32, y: f32, r: f32) -> Zone {
        Zone::new("z", Vec2::new(x, y), r, "Z")
    }

    #[test]
    fn hard_snap_at_center_is_exact() {
        let catalog = ZoneCatalog::set_piece();
        for z in catalog.iter() {
            let s = resolve(z.center, catalog.zones(), SnapMode::Hard, &SnapConfig::default());
            assert_eq!(s.pos, z.center);
            assert!(s.zone.is_some());
        }
    }

    #[test]
    fn soft_snap_near_rim_barely_moves() {
        let zones = [zone(50.0, 50.0, 10.0)];
        let p = Vec2::new(59.9999, 50.0);
        let s = resolve(p, &zones, SnapMode::Soft, &SnapConfig::default());
        assert!((s.pos - p).length() < 1e-3);
    }

    #[test]
    fn point_on_rim_is_untouched() {
        let zones = [zone(50.0, 50.0, 10.0)];
        let p = Vec2::new(60.0, 50.0);
        let s = resolve(p, &zones, SnapMode::Soft, &SnapConfig::default());
        assert_eq!(s, Snapped { pos: p, zone: None });
    }

    #[test]
    fn soft_pull_is_dampened() {
        let zones = [zone(50.0, 50.0, 10.0)];
        // distance 5 → pull 0.5 → moved 5 * 0.5 * 0.3 = 0.75
        let s = resolve(Vec2::new(55.0, 50.0), &zones, SnapMode::Soft, &SnapConfig::default());
        assert!((s.pos.x - 54.25).abs() < 1e-4);
        // hard: moved 5 * 0.5 = 2.5
        let h = resolve(Vec2::new(55.0, 50.0), &zones, SnapMode::Hard, &SnapConfig::default());
        assert!((h.pos.x - 52.5).abs() < 1e-4);
    }

    #[test]
    fn nearest_zone_wins() {
        let zones = [zone(40.0, 50.0, 10.0), zone(52.0, 50.0, 10.0)];
        let hit = nearest_zone(Vec2::new(48.0, 50.0), &zones).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn tie_goes_to_catalog_order() {
        let zones = [zone(40.0, 50.0, 12.0), zone(60.0, 50.0, 12.0)];
        let hit = nearest_zone(Vec2::new(50.0, 50.0), &zones).unwrap();
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn outside_every_zone_is_unchanged() {
        let catalog = ZoneCatalog::set_piece();
        let p = Vec2::new(90.0, 90.0);
        let s = resolve(p, catalog.zones(), SnapMode::Hard, &SnapConfig::default());
        assert_eq!(s.pos, p);
        assert_eq!(s.zone, None);
    }

    #[test]
    fn hard_threshold_gates_release_snap() {
        let zones = [zone(50.0, 50.0, 30.0)];
        let cfg = SnapConfig { hard_threshold: 15.0, ..SnapConfig::default() };
        let p = Vec2::new(70.0, 50.0);
        let s = resolve(p, &zones, SnapMode::Hard, &cfg);
        assert_eq!(s.pos, p);
        assert_eq!(s.zone, None);
    }
}
