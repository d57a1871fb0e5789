//! Position clamping against the board rectangle.
//!
//! # Invariants
//! - `clamp` is pure, total and idempotent.
//! - An axis whose valid interval is empty (board smaller than the
//!   footprint, missing or non-finite board) pins to `0`.

use crate::model::geometry::{BoardBounds, Point, Size};

/// Clamps a candidate top-left position so the footprint stays on the board.
pub fn clamp(raw: Point, bounds: BoardBounds, footprint: Size) -> Point {
    Point::new(
        clamp_axis(raw.x, bounds.width, footprint.width),
        clamp_axis(raw.y, bounds.height, footprint.height),
    )
}

/// Returns whether `position` already satisfies the board invariant.
pub fn is_within(position: Point, bounds: BoardBounds, footprint: Size) -> bool {
    clamp(position, bounds, footprint) == position
}

fn clamp_axis(raw: f64, board: f64, footprint: f64) -> f64 {
    let max = board - footprint;
    if !max.is_finite() || max <= 0.0 || raw.is_nan() {
        return 0.0;
    }
    raw.clamp(0.0, max)
}

#[cfg(test)]
mod tests {
    use super::{clamp, is_within};
    use crate::model::geometry::{BoardBounds, Point, Size};
    use proptest::prelude::*;

    const FOOTPRINT: Size = Size::new(180.0, 180.0);

    #[test]
    fn clamps_past_far_edge() {
        let board = BoardBounds::new(400.0, 400.0);
        assert_eq!(
            clamp(Point::new(500.0, 500.0), board, FOOTPRINT),
            Point::new(220.0, 220.0)
        );
    }

    #[test]
    fn clamps_axes_independently() {
        let board = BoardBounds::new(400.0, 300.0);
        assert_eq!(
            clamp(Point::new(-20.0, 100.0), board, FOOTPRINT),
            Point::new(0.0, 100.0)
        );
        assert_eq!(
            clamp(Point::new(100.0, 1e9), board, FOOTPRINT),
            Point::new(100.0, 120.0)
        );
    }

    #[test]
    fn small_or_missing_board_pins_to_origin() {
        let narrow = BoardBounds::new(100.0, 400.0);
        assert_eq!(
            clamp(Point::new(50.0, 50.0), narrow, FOOTPRINT),
            Point::new(0.0, 50.0)
        );
        assert_eq!(
            clamp(Point::new(50.0, 50.0), BoardBounds::default(), FOOTPRINT),
            Point::ORIGIN
        );
        let broken = BoardBounds::new(f64::NAN, -1.0);
        assert_eq!(clamp(Point::new(9.0, 9.0), broken, FOOTPRINT), Point::ORIGIN);
    }

    #[test]
    fn nan_and_infinite_coordinates_stay_on_board() {
        let board = BoardBounds::new(400.0, 400.0);
        assert_eq!(
            clamp(Point::new(f64::NAN, f64::INFINITY), board, FOOTPRINT),
            Point::new(0.0, 220.0)
        );
    }

    #[test]
    fn clamp_is_idempotent_and_bounded_over_a_grid() {
        let boards = [
            BoardBounds::new(400.0, 400.0),
            BoardBounds::new(180.0, 1000.0),
            BoardBounds::new(90.0, 90.0),
            BoardBounds::new(1280.5, 777.25),
        ];
        for board in boards {
            for raw_x in [-500.0, -0.5, 0.0, 37.5, 219.9, 220.0, 1100.0, 5000.0] {
                for raw_y in [-10.0, 0.0, 64.0, 600.0, 9999.0] {
                    let once = clamp(Point::new(raw_x, raw_y), board, FOOTPRINT);
                    assert_eq!(clamp(once, board, FOOTPRINT), once);
                    assert!(is_within(once, board, FOOTPRINT));
                    assert!(once.x >= 0.0 && once.y >= 0.0);
                    if board.width >= FOOTPRINT.width {
                        assert!(once.x <= board.width - FOOTPRINT.width);
                    }
                    if board.height >= FOOTPRINT.height {
                        assert!(once.y <= board.height - FOOTPRINT.height);
                    }
                }
            }
        }
    }

    fn coordinate() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => -1.0e6f64..1.0e6,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
            1 => Just(f64::NEG_INFINITY),
        ]
    }

    fn board_edge() -> impl Strategy<Value = f64> {
        prop_oneof![
            8 => 0.0f64..2000.0,
            1 => Just(f64::NAN),
            1 => Just(-1.0),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]
        #[test]
        fn clamp_is_idempotent_and_bounded(
            x in coordinate(),
            y in coordinate(),
            width in board_edge(),
            height in board_edge(),
        ) {
            let board = BoardBounds::new(width, height);
            let once = clamp(Point::new(x, y), board, FOOTPRINT);
            prop_assert_eq!(clamp(once, board, FOOTPRINT), once);
            prop_assert!(is_within(once, board, FOOTPRINT));
            prop_assert!(once.x.is_finite() && once.y.is_finite());
            prop_assert!(once.x >= 0.0 && once.y >= 0.0);
            prop_assert!(once.x <= (width - FOOTPRINT.width).max(0.0));
            prop_assert!(once.y <= (height - FOOTPRINT.height).max(0.0));
        }
    }
}
