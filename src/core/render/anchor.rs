//=========================================================================
// Anchors
//=========================================================================
//
// Screen-relative draw offsets.
//
// An anchor picks one of three positions on each axis:
//
// ```text
//   (-1,-1) ─── (0,-1) ─── (1,-1)
//      │                     │
//   (-1, 0)     (0, 0)     (1, 0)
//      │                     │
//   (-1, 1) ─── (0, 1) ─── (1, 1)
// ```
//
// Resolved against a viewport of size W x H, -1/0/+1 become 0, W/2, W on
// X and 0, H/2, H on Y. Several active anchors add their offsets.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::math::{Vector2, Vector4};

//=== Align ===============================================================

/// Position along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Align {
    /// Left or top edge (-1).
    Start,

    /// Middle (0).
    Center,

    /// Right or bottom edge (+1).
    End,
}

impl Align {
    /// Parses an axis selector in {-1, 0, 1}.
    pub fn from_axis(value: i32) -> Option<Self> {
        match value {
            -1 => Some(Self::Start),
            0 => Some(Self::Center),
            1 => Some(Self::End),
            _ => None,
        }
    }

    /// The axis selector for this alignment.
    pub fn axis(self) -> i32 {
        match self {
            Self::Start => -1,
            Self::Center => 0,
            Self::End => 1,
        }
    }

    /// Offset along an axis of length `extent`.
    pub fn resolve(self, extent: i32) -> i32 {
        match self {
            Self::Start => 0,
            Self::Center => extent / 2,
            Self::End => extent,
        }
    }
}

//=== Anchor ==============================================================

/// One of the nine standard screen alignments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Anchor {
    pub horizontal: Align,
    pub vertical: Align,
}

impl Anchor {
    pub const TOP_LEFT: Self = Self::new(Align::Start, Align::Start);
    pub const TOP: Self = Self::new(Align::Center, Align::Start);
    pub const TOP_RIGHT: Self = Self::new(Align::End, Align::Start);
    pub const LEFT: Self = Self::new(Align::Start, Align::Center);
    pub const CENTER: Self = Self::new(Align::Center, Align::Center);
    pub const RIGHT: Self = Self::new(Align::End, Align::Center);
    pub const BOTTOM_LEFT: Self = Self::new(Align::Start, Align::End);
    pub const BOTTOM: Self = Self::new(Align::Center, Align::End);
    pub const BOTTOM_RIGHT: Self = Self::new(Align::End, Align::End);

    pub const fn new(horizontal: Align, vertical: Align) -> Self {
        Self { horizontal, vertical }
    }

    /// Builds an anchor from two axis selectors in {-1, 0, 1}.
    pub fn from_axes(x: i32, y: i32) -> Option<Self> {
        Some(Self::new(Align::from_axis(x)?, Align::from_axis(y)?))
    }

    /// Draw offset of this anchor inside `viewport` (width `z`, height `w`).
    pub fn offset(self, viewport: Vector4) -> Vector2 {
        Vector2::new(
            self.horizontal.resolve(viewport.width()),
            self.vertical.resolve(viewport.height()),
        )
    }
}

/// Sum of the offsets of every anchor. Zero when `anchors` is empty.
pub fn combined_offset(anchors: &[Anchor], viewport: Vector4) -> Vector2 {
    anchors
        .iter()
        .fold(Vector2::ZERO, |acc, anchor| acc + anchor.offset(viewport))
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vector4 = Vector4::from_size(1280, 720);

    #[test]
    fn axis_selectors_resolve_to_edges_and_center() {
        let xs: Vec<i32> = [-1, 0, 1]
            .iter()
            .map(|&x| Anchor::from_axes(x, 0).unwrap().offset(VIEWPORT).x)
            .collect();
        let ys: Vec<i32> = [-1, 0, 1]
            .iter()
            .map(|&y| Anchor::from_axes(0, y).unwrap().offset(VIEWPORT).y)
            .collect();

        assert_eq!(xs, vec![0, 640, 1280]);
        assert_eq!(ys, vec![0, 360, 720]);
    }

    #[test]
    fn named_anchors_match_axes() {
        assert_eq!(Anchor::from_axes(-1, -1), Some(Anchor::TOP_LEFT));
        assert_eq!(Anchor::from_axes(1, 1), Some(Anchor::BOTTOM_RIGHT));
        assert_eq!(Anchor::from_axes(0, 0), Some(Anchor::CENTER));
        assert_eq!(Anchor::BOTTOM.offset(VIEWPORT), Vector2::new(640, 720));
        assert_eq!(Anchor::RIGHT.offset(VIEWPORT), Vector2::new(1280, 360));
    }

    #[test]
    fn out_of_range_selector_is_rejected() {
        assert_eq!(Anchor::from_axes(2, 0), None);
        assert_eq!(Align::from_axis(-3), None);
    }

    #[test]
    fn multiple_anchors_sum_offsets() {
        let offset = combined_offset(&[Anchor::CENTER, Anchor::BOTTOM_RIGHT], VIEWPORT);
        assert_eq!(offset, Vector2::new(640 + 1280, 360 + 720));
    }

    #[test]
    fn no_anchor_means_no_offset() {
        assert_eq!(combined_offset(&[], VIEWPORT), Vector2::ZERO);
    }
}
