//! Occlusion math between notes.
//!
//! # Responsibility
//! - Compute how much of a note's footprint is covered by its siblings.
//! - Format the obstruction message shown when a raise is refused.
//!
//! # Invariants
//! - `covered_ratio` is always in `[0, 1]`; summed coverage is capped at the
//!   target's own area before dividing.
//! - `overlapping_count` counts siblings with strictly positive intersection
//!   and is never capped.
//! - A note never overlaps itself (same id is skipped).

use crate::model::geometry::{Rect, Size};
use crate::model::note::Note;
use serde::Serialize;

/// Coverage of one note by its siblings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OverlapInfo {
    pub covered_ratio: f64,
    pub overlapping_count: usize,
}

impl OverlapInfo {
    /// Returns whether coverage meets the "mostly covered" threshold.
    pub fn is_mostly_covered(&self, threshold: f64) -> bool {
        self.overlapping_count > 0 && self.covered_ratio >= threshold
    }
}

/// Computes coverage of `target` by `others` at their current positions.
pub fn overlap_info<'a>(
    target: &Note,
    others: impl IntoIterator<Item = &'a Note>,
    footprint: Size,
) -> OverlapInfo {
    let target_box = Rect::new(target.position, footprint);
    let target_area = footprint.area();

    let mut covered_area = 0.0;
    let mut overlapping_count = 0;
    for other in others {
        if other.id == target.id {
            continue;
        }
        let area = target_box.intersection_area(&Rect::new(other.position, footprint));
        if area > 0.0 {
            covered_area += area;
            overlapping_count += 1;
        }
    }

    let covered_ratio = if target_area > 0.0 {
        covered_area.min(target_area) / target_area
    } else {
        0.0
    };

    OverlapInfo {
        covered_ratio,
        overlapping_count,
    }
}

/// Obstruction message with singular/plural agreement.
pub fn overlapping_message(count: usize) -> String {
    if count == 1 {
        "1 note is overlapping this note".to_string()
    } else {
        format!("{count} notes are overlapping this note")
    }
}

#[cfg(test)]
mod tests {
    use super::{overlap_info, overlapping_message};
    use crate::model::geometry::{Point, Size};
    use crate::model::note::{Note, StyleType};
    use proptest::prelude::*;
    use uuid::Uuid;

    const FOOTPRINT: Size = Size::new(180.0, 180.0);

    fn note_at(x: f64, y: f64) -> Note {
        Note {
            id: Uuid::new_v4(),
            position: Point::new(x, y),
            rotation: 0.0,
            shadow_depth: 2,
            z_index: 0,
            color: "#fff59d".to_string(),
            style_type: StyleType::Plain,
            title: "t".to_string(),
            photo: None,
            caption: String::new(),
            rich_content: None,
            rich_text_enabled: true,
        }
    }

    #[test]
    fn quarter_overlap() {
        let a = note_at(0.0, 0.0);
        let b = note_at(90.0, 90.0);
        let info = overlap_info(&a, [&b], FOOTPRINT);
        assert_eq!(info.overlapping_count, 1);
        assert!((info.covered_ratio - 0.25).abs() < 1e-12);
        assert!(!info.is_mostly_covered(0.6));
    }

    #[test]
    fn coverage_is_capped_for_stacked_neighbors() {
        let target = note_at(10.0, 10.0);
        let others = [note_at(10.0, 10.0), note_at(10.0, 10.0), note_at(20.0, 10.0)];
        let info = overlap_info(&target, &others, FOOTPRINT);
        assert_eq!(info.covered_ratio, 1.0);
        assert_eq!(info.overlapping_count, 3);
        assert!(info.is_mostly_covered(0.6));
    }

    #[test]
    fn self_and_disjoint_notes_are_ignored() {
        let target = note_at(0.0, 0.0);
        let far = note_at(500.0, 0.0);
        let edge = note_at(180.0, 0.0);
        let info = overlap_info(&target, [&target, &far, &edge], FOOTPRINT);
        assert_eq!(info.overlapping_count, 0);
        assert_eq!(info.covered_ratio, 0.0);
        assert!(!info.is_mostly_covered(0.6));
    }

    #[test]
    fn overlap_count_is_symmetric() {
        let positions = [(0.0, 0.0), (90.0, 90.0), (179.0, 0.0), (0.0, 179.5), (30.0, 150.0)];
        for (ax, ay) in positions {
            for (bx, by) in positions {
                let a = note_at(ax, ay);
                let b = note_at(bx, by);
                let ab = overlap_info(&a, [&b], FOOTPRINT);
                let ba = overlap_info(&b, [&a], FOOTPRINT);
                assert_eq!(ab.overlapping_count, ba.overlapping_count);
                assert!((ab.covered_ratio - ba.covered_ratio).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn message_agrees_in_number() {
        assert_eq!(overlapping_message(1), "1 note is overlapping this note");
        assert_eq!(overlapping_message(2), "2 notes are overlapping this note");
    }

    fn position() -> impl Strategy<Value = (f64, f64)> {
        (-400.0f64..400.0, -400.0f64..400.0)
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
        #[test]
        fn overlap_is_symmetric_for_any_pair(a in position(), b in position()) {
            let a = note_at(a.0, a.1);
            let b = note_at(b.0, b.1);
            let ab = overlap_info(&a, [&b], FOOTPRINT);
            let ba = overlap_info(&b, [&a], FOOTPRINT);
            prop_assert_eq!(ab.overlapping_count, ba.overlapping_count);
            prop_assert!((ab.covered_ratio - ba.covered_ratio).abs() < 1e-9);
        }

        #[test]
        fn coverage_stays_within_unit_interval(
            target in position(),
            neighbors in prop::collection::vec(position(), 0..12),
        ) {
            let target = note_at(target.0, target.1);
            let others: Vec<Note> = neighbors.iter().map(|(x, y)| note_at(*x, *y)).collect();
            let info = overlap_info(&target, &others, FOOTPRINT);
            prop_assert!(info.covered_ratio >= 0.0 && info.covered_ratio <= 1.0);
            prop_assert!(info.overlapping_count <= others.len());
            if info.overlapping_count == 0 {
                prop_assert_eq!(info.covered_ratio, 0.0);
            }
        }
    }
}
