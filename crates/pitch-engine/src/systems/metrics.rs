//! Tactical metrics: pure functions of the current marker positions.
//!
//! Thresholds are empirically tuned constants, not derived values.

use glam::Vec2;
use serde::Serialize;

use crate::api::types::DiagramKind;
use crate::catalog::zones::ZoneCatalog;
use crate::components::entity::CORNER_TAKER;
use crate::components::zone::{Zone, ZoneClass};
use crate::core::scene::Scene;

// ── Formation constants ─────────────────────────────────────────────────

/// Markers above this line (smaller y) form the attacking unit.
pub const ATTACKING_LINE_Y: f32 = 60.0;
const UNIT_WIDTH_SCALE: f32 = 1.2;
const UNIT_WIDTH_MIN: f32 = 30.0;
const OVERALL_WIDTH_MIN: f32 = 40.0;
const COMPACTNESS_DIVISOR: f32 = 3.0;
/// Compactness reported when fewer than two markers exist.
pub const NEUTRAL_COMPACTNESS: f32 = 100.0;
const SYMMETRY_PENALTY: f32 = 15.0;
const CENTROID_PENALTY: f32 = 2.0;
pub const PITCH_CENTER_X: f32 = 50.0;

// ── Set-piece constants ─────────────────────────────────────────────────

const SHOT_BASE: f32 = 45.0;
const GOAL_BASE: f32 = 12.0;
const BOX_SHOT_BONUS: f32 = 3.0;
const BOX_GOAL_BONUS: f32 = 1.0;
const CORNER_TAKER_BONUS: f32 = 5.0;
/// Penalty box rectangle (inclusive).
const BOX_X: (f32, f32) = (30.0, 70.0);
const BOX_Y: (f32, f32) = (20.0, 60.0);
/// A corner taker beyond both of these is at a wide, deep delivery spot.
const CORNER_SPOT_X: f32 = 80.0;
const CORNER_SPOT_Y: f32 = 65.0;

const PERCENT: (f32, f32) = (0.0, 100.0);

/// Summary of a team shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormationMetrics {
    /// Mean of the two unit widths, in [40, 100].
    pub width: f32,
    /// Width of the attacking unit (y < 60), in [30, 100].
    pub attacking_width: f32,
    /// Width of the defensive unit (y ≥ 60), in [30, 100].
    pub defensive_width: f32,
    /// 100 for a tight block, falling as the mean pairwise distance grows.
    pub compactness: f32,
    pub balance: f32,
    /// Left/right head-count component of balance.
    pub symmetry_balance: f32,
    /// Centroid-offset component of balance.
    pub centroid_balance: f32,
}

impl FormationMetrics {
    /// One-line coaching hint for the insight panel.
    pub fn insight(&self) -> &'static str {
        if self.compactness < 50.0 {
            "Lines are stretched: close the gaps between units."
        } else if self.width < 55.0 {
            "Narrow shape: the flanks are exposed."
        } else if self.balance < 60.0 {
            "Shape is lopsided: rebalance left and right."
        } else {
            "Shape is compact and balanced."
        }
    }
}

/// Threat level of a single set-piece zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ThreatTier {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ThreatTier {
    pub fn classify(occupants: usize, class: Option<ZoneClass>) -> Self {
        match occupants {
            0 if class == Some(ZoneClass::Central) => ThreatTier::Medium,
            0 => ThreatTier::Low,
            1 => ThreatTier::High,
            _ => ThreatTier::VeryHigh,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ThreatTier::Low => "Low",
            ThreatTier::Medium => "Medium",
            ThreatTier::High => "High",
            ThreatTier::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneThreat {
    pub zone: String,
    pub occupants: usize,
    pub tier: ThreatTier,
}

/// Summary of a set-piece routine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetPieceMetrics {
    pub shot_probability: f32,
    pub goal_probability: f32,
    /// One entry per catalog zone, in catalog order.
    pub zone_threats: Vec<ZoneThreat>,
}

impl SetPieceMetrics {
    pub fn threat(&self, zone: &str) -> Option<ThreatTier> {
        self.zone_threats.iter().find(|t| t.zone == zone).map(|t| t.tier)
    }

    pub fn insight(&self) -> &'static str {
        if self.shot_probability >= 70.0 {
            "High-threat delivery: the box is well attacked."
        } else if self.shot_probability >= 55.0 {
            "Moderate threat: add a runner to the near post."
        } else {
            "Low threat: crowd the six-yard box."
        }
    }
}

/// The derived metrics of a board. Never stored beyond the current frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricsSnapshot {
    Formation(FormationMetrics),
    SetPiece(SetPieceMetrics),
}

impl MetricsSnapshot {
    pub fn insight(&self) -> &'static str {
        match self {
            MetricsSnapshot::Formation(m) => m.insight(),
            MetricsSnapshot::SetPiece(m) => m.insight(),
        }
    }

    pub fn as_formation(&self) -> Option<&FormationMetrics> {
        match self {
            MetricsSnapshot::Formation(m) => Some(m),
            MetricsSnapshot::SetPiece(_) => None,
        }
    }

    pub fn as_set_piece(&self) -> Option<&SetPieceMetrics> {
        match self {
            MetricsSnapshot::SetPiece(m) => Some(m),
            MetricsSnapshot::Formation(_) => None,
        }
    }
}

/// A marker as seen by the set-piece calculator.
#[derive(Debug, Clone, Copy)]
pub struct MarkerSample<'a> {
    pub pos: Vec2,
    pub role: &'a str,
}

/// Compute the snapshot for every marker on a board.
pub fn compute(kind: DiagramKind, scene: &Scene, catalog: &ZoneCatalog) -> MetricsSnapshot {
    match kind {
        DiagramKind::Formation => MetricsSnapshot::Formation(formation_metrics(&scene.positions())),
        DiagramKind::SetPiece => {
            let samples: Vec<MarkerSample<'_>> = scene
                .iter()
                .map(|e| MarkerSample { pos: e.pos, role: &e.role })
                .collect();
            MetricsSnapshot::SetPiece(set_piece_metrics(&samples, catalog.zones()))
        }
    }
}

// ── Formation ───────────────────────────────────────────────────────────

pub fn formation_metrics(positions: &[Vec2]) -> FormationMetrics {
    let attacking_width = unit_width(positions.iter().filter(|p| p.y < ATTACKING_LINE_Y));
    let defensive_width = unit_width(positions.iter().filter(|p| p.y >= ATTACKING_LINE_Y));
    let width = clamp((attacking_width + defensive_width) / 2.0, (OVERALL_WIDTH_MIN, 100.0));

    let (symmetry, centroid) = balance_components(positions);

    FormationMetrics {
        width,
        attacking_width,
        defensive_width,
        compactness: compactness(positions),
        balance: clamp((symmetry + centroid) / 2.0, PERCENT),
        symmetry_balance: clamp(symmetry, PERCENT),
        centroid_balance: clamp(centroid, PERCENT),
    }
}

/// `(max x - min x) * 1.2`, clamped. An empty unit reports the minimum.
fn unit_width<'a>(unit: impl Iterator<Item = &'a Vec2>) -> f32 {
    let span = unit
        .map(|p| p.x)
        .fold(None, |acc: Option<(f32, f32)>, x| match acc {
            None => Some((x, x)),
            Some((lo, hi)) => Some((lo.min(x), hi.max(x))),
        })
        .map_or(0.0, |(lo, hi)| hi - lo);
    clamp(span * UNIT_WIDTH_SCALE, (UNIT_WIDTH_MIN, 100.0))
}

fn compactness(positions: &[Vec2]) -> f32 {
    if positions.len() < 2 {
        return NEUTRAL_COMPACTNESS;
    }
    let mut total = 0.0;
    let mut pairs = 0u32;
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            total += a.distance(*b);
            pairs += 1;
        }
    }
    clamp(100.0 - (total / pairs as f32) / COMPACTNESS_DIVISOR, PERCENT)
}

/// Raw (unclamped) symmetry and centroid components.
fn balance_components(positions: &[Vec2]) -> (f32, f32) {
    let left = positions.iter().filter(|p| p.x < PITCH_CENTER_X).count() as f32;
    let right = positions.iter().filter(|p| p.x > PITCH_CENTER_X).count() as f32;
    let symmetry = 100.0 - (left - right).abs() * SYMMETRY_PENALTY;

    let centroid_x = if positions.is_empty() {
        PITCH_CENTER_X
    } else {
        positions.iter().map(|p| p.x).sum::<f32>() / positions.len() as f32
    };
    let centroid = 100.0 - (centroid_x - PITCH_CENTER_X).abs() * CENTROID_PENALTY;

    (symmetry, centroid)
}

// ── Set piece ───────────────────────────────────────────────────────────

pub fn set_piece_metrics(markers: &[MarkerSample<'_>], zones: &[Zone]) -> SetPieceMetrics {
    let mut shot = SHOT_BASE;
    let mut goal = GOAL_BASE;

    for marker in markers {
        // Overlapping zones each score, matching the occupant counts below.
        for class in zones
            .iter()
            .filter(|zone| zone.contains(marker.pos))
            .filter_map(|zone| zone.class)
        {
            shot += class.shot_bonus();
            goal += class.goal_bonus();
        }
        if in_box(marker.pos) {
            shot += BOX_SHOT_BONUS;
            goal += BOX_GOAL_BONUS;
        }
    }

    let delivery_in_place = markers.iter().any(|m| {
        m.role == CORNER_TAKER && m.pos.x > CORNER_SPOT_X && m.pos.y > CORNER_SPOT_Y
    });
    if delivery_in_place {
        shot += CORNER_TAKER_BONUS;
    }

    let zone_threats = zones
        .iter()
        .map(|zone| {
            let occupants = markers.iter().filter(|m| zone.contains(m.pos)).count();
            ZoneThreat {
                zone: zone.name.clone(),
                occupants,
                tier: ThreatTier::classify(occupants, zone.class),
            }
        })
        .collect();

    SetPieceMetrics {
        shot_probability: clamp(shot, PERCENT),
        goal_probability: clamp(goal, PERCENT),
        zone_threats,
    }
}

fn in_box(p: Vec2) -> bool {
    (BOX_X.0..=BOX_X.1).contains(&p.x) && (BOX_Y.0..=BOX_Y.1).contains(&p.y)
}

#[inline]
fn clamp(v: f32, (lo, hi): (f32, f32)) -> f32 {
    v.clamp(lo, hi)
}
