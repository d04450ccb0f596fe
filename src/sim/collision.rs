//! Axis-aligned collision detection
//!
//! Every moving thing in the arena is a box. Two boxes collide when their
//! horizontal spans touch and their vertical spans touch; edges count as
//! touching, so boxes that share a border collide.

use serde::{Deserialize, Serialize};

/// Edges of an axis-aligned box in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            right: left + width,
            top,
            bottom: top + height,
        }
    }
}

/// Anything that can be hit
pub trait Hitbox {
    fn bounds(&self) -> Bounds;
}

impl Hitbox for Bounds {
    fn bounds(&self) -> Bounds {
        *self
    }
}

#[inline]
fn in_range(value: f32, min: f32, max: f32) -> bool {
    value >= min && value <= max
}

/// True if either edge of one span lies within the other span, checked both ways
#[inline]
fn spans_overlap(a_min: f32, a_max: f32, b_min: f32, b_max: f32) -> bool {
    in_range(a_min, b_min, b_max)
        || in_range(a_max, b_min, b_max)
        || in_range(b_min, a_min, a_max)
        || in_range(b_max, a_min, a_max)
}

/// Check whether two boxes overlap
///
/// Symmetric in its arguments. Zero-sized boxes are valid and collide with
/// any box whose span contains their point.
pub fn overlaps(a: &impl Hitbox, b: &impl Hitbox) -> bool {
    let a = a.bounds();
    let b = b.bounds();
    spans_overlap(a.left, a.right, b.left, b.right) && spans_overlap(a.top, a.bottom, b.top, b.bottom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_partial() {
        let a = Bounds::new(0.0, 0.0, 90.0, 80.0);
        let b = Bounds::new(50.0, 40.0, 90.0, 80.0);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn test_overlap_containment() {
        // Wide box fully contains a narrow one; neither edge of the wide box
        // falls inside the narrow one, but the reverse check catches it.
        let centipede = Bounds::new(0.0, 83.0, 270.0, 80.0);
        let bullet = Bounds::new(100.0, 83.0, 20.0, 80.0);
        assert!(overlaps(&centipede, &bullet));
        assert!(overlaps(&bullet, &centipede));
    }

    #[test]
    fn test_touching_edges_collide() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(10.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &b));
    }

    #[test]
    fn test_adjacent_rows_do_not_collide() {
        // Enemy on row 1, player on row 2
        let enemy = Bounds::new(101.0, 83.0, 90.0, 80.0);
        let player = Bounds::new(121.0, 166.0, 40.0, 80.0);
        assert!(!overlaps(&enemy, &player));
    }

    #[test]
    fn test_horizontal_miss() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &b));
    }

    #[test]
    fn test_degenerate_boxes() {
        let point = Bounds::new(5.0, 5.0, 0.0, 0.0);
        let square = Bounds::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&point, &square));
        assert!(overlaps(&point, &point));

        let far_point = Bounds::new(50.0, 50.0, 0.0, 0.0);
        assert!(!overlaps(&far_point, &square));
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(
            ax in -500.0f32..800.0, ay in -100.0f32..600.0,
            aw in 0.0f32..300.0, ah in 0.0f32..100.0,
            bx in -500.0f32..800.0, by in -100.0f32..600.0,
            bw in 0.0f32..300.0, bh in 0.0f32..100.0,
        ) {
            let a = Bounds::new(ax, ay, aw, ah);
            let b = Bounds::new(bx, by, bw, bh);
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn box_overlaps_itself(
            x in -500.0f32..800.0, y in -100.0f32..600.0,
            w in 0.0f32..300.0, h in 0.0f32..100.0,
        ) {
            let a = Bounds::new(x, y, w, h);
            prop_assert!(overlaps(&a, &a));
        }
    }
}
