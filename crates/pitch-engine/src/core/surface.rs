use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::BoardError;

/// Normalized coordinate span of a surface on each axis.
pub const SURFACE_SPAN: f32 = 100.0;

/// The rendered rectangle markers live on.
///
/// Only its pixel size matters: pointer deltas arrive in pixels and are
/// projected into the 0–100 normalized space every model position uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    width: f32,
    height: f32,
}

impl Surface {
    pub fn new(width: f32, height: f32) -> Result<Self, BoardError> {
        check_extent(width, height)?;
        Ok(Self { width, height })
    }

    /// Update the pixel size (e.g. after a container resize).
    pub fn resize(&mut self, width: f32, height: f32) -> Result<(), BoardError> {
        check_extent(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Pixel offset within the surface → normalized position.
    pub fn to_normalized(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            px.x / self.width * SURFACE_SPAN,
            px.y / self.height * SURFACE_SPAN,
        )
    }

    /// Pixel delta → normalized delta.
    pub fn delta_to_normalized(&self, delta: Vec2) -> Vec2 {
        self.to_normalized(delta)
    }

    /// Normalized position → pixel offset within the surface.
    pub fn to_pixels(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            pos.x / SURFACE_SPAN * self.width,
            pos.y / SURFACE_SPAN * self.height,
        )
    }
}

fn check_extent(width: f32, height: f32) -> Result<(), BoardError> {
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return Err(BoardError::InvalidConfig(format!(
            "surface must have a positive size, got {width}x{height}"
        )));
    }
    Ok(())
}

/// Inset boundary markers are clamped to on both axes.
/// Keeps markers visibly inside the pitch (never exactly 0 or 100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    /// Symmetric inset: `inset(5.0)` keeps markers in [5, 95].
    pub fn inset(inset: f32) -> Self {
        Self {
            min: inset,
            max: SURFACE_SPAN - inset,
        }
    }

    #[inline]
    pub fn clamp(&self, pos: Vec2) -> Vec2 {
        Vec2::new(pos.x.clamp(self.min, self.max), pos.y.clamp(self.min, self.max))
    }

    #[inline]
    pub fn contains(&self, pos: Vec2) -> bool {
        (self.min..=self.max).contains(&pos.x) && (self.min..=self.max).contains(&pos.y)
    }

    pub fn validate(&self) -> Result<(), BoardError> {
        let ok = self.min.is_finite()
            && self.max.is_finite()
            && self.min > 0.0
            && self.max < SURFACE_SPAN
            && self.min < self.max;
        if ok {
            Ok(())
        } else {
            Err(BoardError::InvalidConfig(format!(
                "inset bounds must satisfy 0 < min < max < 100, got [{}, {}]",
                self.min, self.max
            )))
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::inset(5.0)
    }
}
