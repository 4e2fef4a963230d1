//! Target geometry and injection-point arithmetic.

use crate::error::{DropError, Result};

/// Bounding rectangle of the drop target, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Viewport point shared by every event of the synthetic burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPoint {
    pub x: f64,
    pub y: f64,
}

/// Compute the injection point for a target rect.
///
/// Offsets are relative to the rect's top-left corner; a `None` or zero
/// offset falls back to the centre of its axis, rounded down. A zero-sized
/// rect means the target is not rendered and is rejected before anything is
/// dispatched.
pub fn drop_point(rect: TargetRect, offset_x: Option<f64>, offset_y: Option<f64>) -> Result<DropPoint> {
    if !(rect.width > 0.0 && rect.height > 0.0) {
        return Err(DropError::DegenerateGeometry {
            width: rect.width,
            height: rect.height,
        });
    }
    Ok(DropPoint {
        x: rect.left + axis_offset(offset_x, rect.width),
        y: rect.top + axis_offset(offset_y, rect.height),
    })
}

fn axis_offset(offset: Option<f64>, extent: f64) -> f64 {
    match offset {
        Some(value) if value != 0.0 => value,
        _ => (extent / 2.0).floor(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: TargetRect = TargetRect {
        left: 100.0,
        top: 50.0,
        width: 40.0,
        height: 20.0,
    };

    #[test]
    fn no_offsets_hit_the_centre() {
        let point = drop_point(RECT, None, None).unwrap();
        assert_eq!(point, DropPoint { x: 120.0, y: 60.0 });
    }

    #[test]
    fn explicit_offsets_override_the_centre() {
        let point = drop_point(RECT, Some(5.0), Some(5.0)).unwrap();
        assert_eq!(point, DropPoint { x: 105.0, y: 55.0 });
    }

    #[test]
    fn zero_offsets_fall_back_to_the_centre() {
        let point = drop_point(RECT, Some(0.0), Some(0.0)).unwrap();
        assert_eq!(point, DropPoint { x: 120.0, y: 60.0 });
    }

    #[test]
    fn odd_extents_round_the_centre_down() {
        let rect = TargetRect {
            left: 0.0,
            top: 0.0,
            width: 41.0,
            height: 21.0,
        };
        let point = drop_point(rect, None, None).unwrap();
        assert_eq!(point, DropPoint { x: 20.0, y: 10.0 });
    }

    #[test]
    fn one_axis_may_use_an_offset_while_the_other_centres() {
        let point = drop_point(RECT, Some(5.0), None).unwrap();
        assert_eq!(point, DropPoint { x: 105.0, y: 60.0 });
    }

    #[test]
    fn zero_sized_rect_is_degenerate() {
        let rect = TargetRect {
            left: 0.0,
            top: 0.0,
            width: 0.0,
            height: 0.0,
        };
        match drop_point(rect, None, None) {
            Err(DropError::DegenerateGeometry { width, height }) => {
                assert_eq!((width, height), (0.0, 0.0));
            }
            other => panic!("expected DegenerateGeometry, got {:?}", other),
        }
    }

    #[test]
    fn a_single_zero_extent_is_degenerate_too() {
        let rect = TargetRect {
            left: 10.0,
            top: 10.0,
            width: 40.0,
            height: 0.0,
        };
        assert!(matches!(
            drop_point(rect, None, None),
            Err(DropError::DegenerateGeometry { .. })
        ));
    }
}
