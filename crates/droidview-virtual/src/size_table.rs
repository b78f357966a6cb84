#![forbid(unsafe_code)]

//! Per-row size storage for the virtualizer.
//!
//! Sizes are seeded from a caller-supplied estimator and individually
//! overwritten when the host reports a measurement for a rendered row. All
//! cumulative queries go through a Fenwick tree, so offset math stays
//! O(log n) regardless of row count.
//!
//! Row sizes are whole `u32` pixels; cumulative offsets are `u64`. The
//! estimator returns `f32` and is coerced once at the boundary: non-finite,
//! negative, and sub-pixel results all become the 1px minimum.

use crate::fenwick::FenwickTree;

/// Smallest admissible row size in pixels.
pub const MIN_ROW_PX: u32 = 1;

/// Coerce an estimator result to a valid whole-pixel row size.
fn coerce_px(px: f32) -> u32 {
    if px.is_finite() && px >= 1.0 {
        px.round() as u32
    } else {
        MIN_ROW_PX
    }
}

/// Estimated-then-measured row sizes with exact cumulative sums.
pub struct SizeTable {
    tree: FenwickTree,
    estimate: Box<dyn Fn(usize) -> f32>,
}

impl std::fmt::Debug for SizeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SizeTable")
            .field("len", &self.tree.len())
            .field("total", &self.tree.total())
            .finish_non_exhaustive()
    }
}

impl SizeTable {
    /// Create a table of `count` rows seeded from `estimate`.
    #[must_use]
    pub fn new(count: usize, estimate: impl Fn(usize) -> f32 + 'static) -> Self {
        let seeded: Vec<u32> = (0..count).map(|i| coerce_px(estimate(i))).collect();
        Self {
            tree: FenwickTree::from_values(&seeded),
            estimate: Box::new(estimate),
        }
    }

    /// Number of rows tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Whether the table tracks no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Size of one row in pixels.
    #[must_use]
    pub fn size_of(&self, index: usize) -> u32 {
        self.tree.get(index)
    }

    /// Exact sum of every entry. O(log n).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.tree.total()
    }

    /// Cumulative offset of the top edge of `index` (sum of all rows before
    /// it). O(log n).
    #[must_use]
    pub fn offset_of(&self, index: usize) -> u64 {
        if index == 0 || self.tree.is_empty() {
            0
        } else {
            self.tree.prefix(index.min(self.tree.len()) - 1)
        }
    }

    /// Index of the row whose span contains `offset`, clamped to the last
    /// row for offsets at or past the end. O(log n).
    #[must_use]
    pub fn index_at(&self, offset: u64) -> usize {
        let len = self.tree.len();
        if len == 0 {
            return 0;
        }
        match self.tree.find_prefix(offset) {
            // prefix(i) <= offset means offset sits at or past the end of
            // row i, so it falls inside row i + 1.
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        }
    }

    /// Overwrite an estimated size with a measured one.
    ///
    /// Returns `true` only when the stored size actually changed, so a host
    /// that re-renders on `true` performs exactly one settle pass per real
    /// content change. Out-of-range indices are ignored.
    pub fn set_measured(&mut self, index: usize, px: u32) -> bool {
        if index >= self.tree.len() {
            return false;
        }
        let px = px.max(MIN_ROW_PX);
        if self.tree.get(index) == px {
            return false;
        }
        self.tree.set(index, px);
        true
    }

    /// Grow or shrink to `count` rows. New rows are seeded from the
    /// estimator; shrinking discards trailing entries (and their
    /// measurements).
    pub fn resize(&mut self, count: usize) {
        let old = self.tree.len();
        if count == old {
            return;
        }
        self.tree.resize(count);
        for i in old..count {
            self.tree.set(i, coerce_px((self.estimate)(i)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seeds_from_estimator() {
        let table = SizeTable::new(4, |i| (10 * (i + 1)) as f32);
        assert_eq!(table.size_of(0), 10);
        assert_eq!(table.size_of(3), 40);
        assert_eq!(table.total(), 100);
    }

    #[test]
    fn coerces_invalid_estimates_to_min() {
        let table = SizeTable::new(5, |i| match i {
            0 => f32::NAN,
            1 => -12.0,
            2 => 0.0,
            3 => f32::INFINITY,
            _ => 0.4,
        });
        for i in 0..5 {
            assert_eq!(table.size_of(i), MIN_ROW_PX);
        }
        assert_eq!(table.total(), 5);
    }

    #[test]
    fn rounds_fractional_estimates() {
        let table = SizeTable::new(2, |i| if i == 0 { 23.6 } else { 23.4 });
        assert_eq!(table.size_of(0), 24);
        assert_eq!(table.size_of(1), 23);
    }

    #[test]
    fn offset_and_index_round_trip() {
        let table = SizeTable::new(10, |_| 36.0);
        assert_eq!(table.offset_of(0), 0);
        assert_eq!(table.offset_of(3), 108);
        assert_eq!(table.index_at(0), 0);
        assert_eq!(table.index_at(35), 0);
        assert_eq!(table.index_at(36), 1);
        assert_eq!(table.index_at(107), 2);
        assert_eq!(table.index_at(108), 3);
        // Past the end clamps to the last row.
        assert_eq!(table.index_at(100_000), 9);
    }

    #[test]
    fn measurement_updates_total_exactly() {
        let mut table = SizeTable::new(3, |_| 20.0);
        assert!(table.set_measured(1, 50));
        assert_eq!(table.total(), 90);
        assert_eq!(table.offset_of(2), 70);
    }

    #[test]
    fn unchanged_measurement_reports_no_change() {
        let mut table = SizeTable::new(3, |_| 20.0);
        assert!(table.set_measured(2, 44));
        assert!(!table.set_measured(2, 44));
        assert!(!table.set_measured(99, 10));
    }

    #[test]
    fn measurement_below_min_is_clamped() {
        let mut table = SizeTable::new(2, |_| 20.0);
        assert!(table.set_measured(0, 0));
        assert_eq!(table.size_of(0), MIN_ROW_PX);
    }

    #[test]
    fn resize_seeds_new_rows_and_drops_old_measurements() {
        let mut table = SizeTable::new(2, |_| 10.0);
        table.set_measured(1, 99);
        table.resize(4);
        assert_eq!(table.size_of(1), 99);
        assert_eq!(table.size_of(3), 10);
        assert_eq!(table.total(), 99 + 10 + 10 + 10);
        table.resize(1);
        assert_eq!(table.total(), 10);
        // Regrowing re-seeds from the estimator, not the old measurement.
        table.resize(2);
        assert_eq!(table.size_of(1), 10);
    }

    #[test]
    fn empty_table() {
        let table = SizeTable::new(0, |_| 36.0);
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.index_at(10), 0);
        assert_eq!(table.offset_of(5), 0);
    }

    proptest! {
        #[test]
        fn prop_total_is_exact_sum_after_measurements(
            count in 1usize..40,
            measurements in prop::collection::vec((0usize..40, 1u32..2_000), 0..24),
        ) {
            let mut table = SizeTable::new(count, |_| 24.0);
            let mut naive = vec![24u64; count];
            for (idx, px) in measurements {
                let idx = idx % count;
                table.set_measured(idx, px);
                naive[idx] = u64::from(px);
            }
            prop_assert_eq!(table.total(), naive.iter().sum::<u64>());
        }

        #[test]
        fn prop_index_at_is_inverse_of_offset_of(
            sizes in prop::collection::vec(1u32..80, 1..40),
        ) {
            let sizes_clone = sizes.clone();
            let mut table = SizeTable::new(sizes.len(), move |i| sizes_clone[i] as f32);
            // Exercise the measured path too.
            for (i, &s) in sizes.iter().enumerate().step_by(3) {
                table.set_measured(i, s.saturating_add(1));
            }
            for i in 0..table.len() {
                let start = table.offset_of(i);
                prop_assert_eq!(table.index_at(start), i);
                let last_px = start + u64::from(table.size_of(i)) - 1;
                prop_assert_eq!(table.index_at(last_px), i);
            }
        }
    }
}
