//! # Interval Scheduler
//!
//! Weighted interval scheduling over matched occurrences: pick the subset of
//! pairwise non-overlapping intervals with the largest total gain, where an
//! interval `[s, e)` is worth `e - s - 1` saved dispatches.
//!
//! ## Algorithm
//!
//! 1. Prepend a zero-weight sentinel `[0, 0)` and sort by end, then start.
//! 2. `p[i]`: latest interval before `i` ending at or before `start(i)`,
//!    found by binary search over the sorted ends.
//! 3. `m[i] = max(m[i-1], gain(i) + m[p[i]])`, `m[0] = 0`.
//! 4. Trace back from the last index: equal to `m[i-1]` means skipped.
//!
//! O(n log n) for n occurrences.

use crate::domain::entities::{Occurrence, Schedule};
use crate::domain::invariants::{check_gain_invariant, check_no_overlap_invariant};
use crate::errors::ConversionError;

/// Select a maximum-gain set of non-overlapping occurrences.
///
/// The returned selection is sorted by position. Post-conditions (gain
/// consistency, no overlap) are verified before returning.
///
/// # Errors
///
/// [`ConversionError::GainMismatch`] or [`ConversionError::OverlappingSchedule`]
/// if the traced selection breaks a post-condition.
pub fn schedule(candidates: &[Occurrence]) -> Result<Schedule, ConversionError> {
    let mut intervals = Vec::with_capacity(candidates.len() + 1);
    intervals.push(Occurrence::new(0, 0, 0));
    intervals.extend_from_slice(candidates);
    intervals.sort_by_key(|occ| (occ.end, occ.start));

    let ends: Vec<usize> = intervals.iter().map(|occ| occ.end).collect();

    // p[i]: the sentinel's end is 0, so the partition point is always >= 1.
    let mut p = vec![0usize; intervals.len()];
    for i in 1..intervals.len() {
        let start = intervals[i].start;
        p[i] = ends[..i].partition_point(|&end| end <= start).saturating_sub(1);
    }

    let mut m = vec![0usize; intervals.len()];
    for i in 1..intervals.len() {
        let take = intervals[i].gain() + m[p[i]];
        m[i] = take.max(m[i - 1]);
    }
    let optimal = m.last().copied().unwrap_or(0);

    let mut selected = Vec::new();
    let mut i = intervals.len() - 1;
    while i > 0 {
        if m[i] == m[i - 1] {
            i -= 1;
        } else {
            selected.push(intervals[i]);
            i = p[i];
        }
    }
    selected.reverse();

    check_gain_invariant(&selected, optimal)?;
    check_no_overlap_invariant(&selected)?;

    Ok(Schedule {
        selected,
        total_gain: optimal,
    })
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_candidates() {
        let result = schedule(&[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_gain, 0);
    }

    #[test]
    fn test_single_interval() {
        let result = schedule(&[Occurrence::new(300, 2, 6)]).unwrap();
        assert_eq!(result.selected, vec![Occurrence::new(300, 2, 6)]);
        assert_eq!(result.total_gain, 3);
    }

    #[test]
    fn test_prefers_pair_over_overlapping_single() {
        let candidates = [
            Occurrence::new(300, 0, 3),
            Occurrence::new(301, 3, 5),
            Occurrence::new(302, 1, 4),
        ];
        let result = schedule(&candidates).unwrap();
        assert_eq!(
            result.selected,
            vec![Occurrence::new(300, 0, 3), Occurrence::new(301, 3, 5)]
        );
        assert_eq!(result.total_gain, 3);
    }

    #[test]
    fn test_prefers_long_interval_over_short_pair() {
        let candidates = [
            Occurrence::new(300, 0, 2),
            Occurrence::new(301, 2, 4),
            Occurrence::new(302, 0, 5),
        ];
        let result = schedule(&candidates).unwrap();
        assert_eq!(result.selected, vec![Occurrence::new(302, 0, 5)]);
        assert_eq!(result.total_gain, 4);
    }

    #[test]
    fn test_single_opcode_patterns_never_selected() {
        let candidates = [Occurrence::new(300, 0, 1), Occurrence::new(301, 1, 2)];
        let result = schedule(&candidates).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.total_gain, 0);
    }

    #[test]
    fn test_unsorted_input_with_duplicates() {
        let candidates = [
            Occurrence::new(301, 4, 7),
            Occurrence::new(300, 0, 3),
            Occurrence::new(301, 4, 7),
            Occurrence::new(302, 1, 5),
        ];
        let result = schedule(&candidates).unwrap();
        assert_eq!(
            result.selected,
            vec![Occurrence::new(300, 0, 3), Occurrence::new(301, 4, 7)]
        );
        assert_eq!(result.total_gain, 4);
    }

    #[test]
    fn test_chain_of_adjacent_intervals() {
        let candidates: Vec<_> = (0..10)
            .map(|k| Occurrence::new(256, k * 2, k * 2 + 2))
            .collect();
        let result = schedule(&candidates).unwrap();
        assert_eq!(result.len(), 10);
        assert_eq!(result.total_gain, 10);
    }
}
