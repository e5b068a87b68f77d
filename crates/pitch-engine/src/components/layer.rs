/// Marker draw order on the pitch.
///
/// Drawn back-to-front: the pitch first, transient overlays last.
/// A held marker is lifted to `Dragged` so it passes over its teammates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum MarkerLayer {
    Pitch = 0,
    Zones = 1,
    #[default]
    Markers = 2,
    Dragged = 3,
    Overlay = 4,
}

impl MarkerLayer {
    pub const COUNT: usize = 5;

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Pitch),
            1 => Some(Self::Zones),
            2 => Some(Self::Markers),
            3 => Some(Self::Dragged),
            4 => Some(Self::Overlay),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// CSS z-index the web shell uses for this layer.
    pub fn z_index(self) -> i32 {
        (self.as_u8() as i32 + 1) * 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_markers() {
        assert_eq!(MarkerLayer::default(), MarkerLayer::Markers);
    }

    #[test]
    fn dragged_draws_over_markers() {
        assert!(MarkerLayer::Dragged > MarkerLayer::Markers);
        assert!(MarkerLayer::Dragged.z_index() > MarkerLayer::Markers.z_index());
    }

    #[test]
    fn round_trip_u8() {
        for val in 0..MarkerLayer::COUNT as u8 {
            assert_eq!(MarkerLayer::from_u8(val).unwrap().as_u8(), val);
        }
        assert!(MarkerLayer::from_u8(5).is_none());
    }
}
