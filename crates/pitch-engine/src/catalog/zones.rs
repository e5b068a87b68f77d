use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::api::types::DiagramKind;
use crate::components::zone::{Zone, ZoneClass};
use crate::error::BoardError;

/// The magnetic zones of one diagram type.
///
/// Order matters: when a point is equally close to two zones, the one listed
/// first wins the snap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCatalog {
    pub kind: DiagramKind,
    zones: Vec<Zone>,
}

impl ZoneCatalog {
    /// Build a catalog, rejecting zones that leave the surface.
    pub fn new(kind: DiagramKind, zones: Vec<Zone>) -> Result<Self, BoardError> {
        let catalog = Self { kind, zones };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, BoardError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Built-in catalog for a diagram type.
    pub fn builtin(kind: DiagramKind) -> Self {
        match kind {
            DiagramKind::Formation => Self::formation(),
            DiagramKind::SetPiece => Self::set_piece(),
        }
    }

    /// Positional zones on a full pitch, attacking towards y = 0.
    pub fn formation() -> Self {
        let z = |name: &str, x: f32, y: f32, r: f32, label: &str| {
            Zone::new(name, Vec2::new(x, y), r, label)
        };
        Self {
            kind: DiagramKind::Formation,
            zones: vec![
                z("striker", 50.0, 15.0, 10.0, "Striker"),
                z("left-wing", 15.0, 30.0, 10.0, "Left wing"),
                z("right-wing", 85.0, 30.0, 10.0, "Right wing"),
                z("attacking-mid", 50.0, 40.0, 10.0, "Attacking midfield"),
                z("defensive-mid", 50.0, 58.0, 10.0, "Defensive midfield"),
                z("left-back", 15.0, 72.0, 10.0, "Left back"),
                z("centre-back", 50.0, 75.0, 12.0, "Centre back"),
                z("right-back", 85.0, 72.0, 10.0, "Right back"),
                z("goalkeeper", 50.0, 90.0, 8.0, "Goalkeeper"),
            ],
        }
    }

    /// Target areas for an attacking set piece, goal at the top.
    pub fn set_piece() -> Self {
        let z = |name: &str, x: f32, y: f32, r: f32, label: &str, class| {
            Zone::new(name, Vec2::new(x, y), r, label).with_class(class)
        };
        Self {
            kind: DiagramKind::SetPiece,
            zones: vec![
                z("near-post", 40.0, 22.0, 8.0, "Near post", ZoneClass::NearPost),
                z("far-post", 60.0, 22.0, 8.0, "Far post", ZoneClass::FarPost),
                z("central", 50.0, 35.0, 10.0, "Penalty spot", ZoneClass::Central),
                z("edge", 50.0, 55.0, 10.0, "Edge of the box", ZoneClass::Edge),
            ],
        }
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        for zone in &self.zones {
            if !zone.fits_surface() {
                return Err(BoardError::ZoneOutOfBounds {
                    name: zone.name.clone(),
                    x: zone.center.x,
                    y: zone.center.y,
                    radius: zone.radius,
                });
            }
        }
        Ok(())
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn get(&self, index: usize) -> Option<&Zone> {
        self.zones.get(index)
    }

    pub fn find(&self, name: &str) -> Option<&Zone> {
        self.zones.iter().find(|z| z.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Zone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_fit_the_surface() {
        assert!(ZoneCatalog::formation().validate().is_ok());
        assert!(ZoneCatalog::set_piece().validate().is_ok());
    }

    #[test]
    fn set_piece_zones_are_classified() {
        let catalog = ZoneCatalog::set_piece();
        assert!(catalog.iter().all(|z| z.class.is_some()));
        assert_eq!(catalog.find("central").unwrap().class, Some(ZoneClass::Central));
    }

    #[test]
    fn builtin_matches_kind() {
        assert_eq!(ZoneCatalog::builtin(DiagramKind::SetPiece).kind, DiagramKind::SetPiece);
        assert_eq!(ZoneCatalog::builtin(DiagramKind::Formation).len(), 9);
    }

    #[test]
    fn new_rejects_zone_off_the_pitch() {
        let err = ZoneCatalog::new(
            DiagramKind::Formation,
            vec![Zone::new("touchline", Vec2::new(96.0, 50.0), 6.0, "Touchline")],
        )
        .unwrap_err();
        assert!(matches!(err, BoardError::ZoneOutOfBounds { .. }));
    }

    #[test]
    fn parse_catalog_json() {
        let json = r#"{
            "kind": "set_piece",
            "zones": [
                { "name": "near-post", "center": [40, 22], "radius": 8, "label": "Near post", "class": "near_post" },
                { "name": "edge", "center": [50, 55], "radius": 10, "label": "Edge" }
            ]
        }"#;
        let catalog = ZoneCatalog::from_json(json).unwrap();
        assert_eq!(catalog.kind, DiagramKind::SetPiece);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().class, None);
    }

    #[test]
    fn parse_catalog_json_validates() {
        let json = r#"{ "kind": "formation", "zones": [
            { "name": "x", "center": [2, 50], "radius": 5, "label": "X" }
        ] }"#;
        assert!(ZoneCatalog::from_json(json).is_err());
    }
}
