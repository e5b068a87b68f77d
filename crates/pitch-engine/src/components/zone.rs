use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Threat classifier carried by set-piece zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneClass {
    NearPost,
    FarPost,
    Central,
    Edge,
}

impl ZoneClass {
    /// Shot-probability bonus for each marker standing in a zone of this class.
    pub fn shot_bonus(self) -> f32 {
        match self {
            ZoneClass::NearPost => 5.0,
            ZoneClass::FarPost => 4.0,
            ZoneClass::Central => 3.0,
            ZoneClass::Edge => 2.0,
        }
    }

    /// Goal-probability bonus for each marker standing in a zone of this class.
    pub fn goal_bonus(self) -> f32 {
        match self {
            ZoneClass::NearPost => 5.0,
            ZoneClass::FarPost => 4.0,
            ZoneClass::Central => 3.0,
            ZoneClass::Edge => 2.0,
        }
    }
}

/// A named circular target region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Stable key ("near-post", "left-back").
    pub name: String,
    /// Center in normalized surface coordinates.
    pub center: Vec2,
    pub radius: f32,
    /// Human-readable label for overlays.
    pub label: String,
    /// Set-piece threat class; formation zones have none.
    #[serde(default)]
    pub class: Option<ZoneClass>,
}

impl Zone {
    pub fn new(name: impl Into<String>, center: Vec2, radius: f32, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center,
            radius,
            label: label.into(),
            class: None,
        }
    }

    pub fn with_class(mut self, class: ZoneClass) -> Self {
        self.class = Some(class);
        self
    }

    #[inline]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.center.distance(point)
    }

    /// Strictly inside the radius. A point on the rim is outside.
    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.distance_to(point) < self.radius
    }

    /// Whether the whole circle fits on the 0–100 surface.
    pub fn fits_surface(&self) -> bool {
        let r = self.radius;
        r > 0.0
            && self.center.x - r >= 0.0
            && self.center.x + r <= 100.0
            && self.center.y - r >= 0.0
            && self.center.y + r <= 100.0
    }
}
