#![forbid(unsafe_code)]

//! Keyboard-driven selection.
//!
//! [`Selection`] tracks the single selected row by key, so selection
//! survives re-sorting and data refreshes without index bookkeeping.
//! [`Selection::handle_key`] maps navigation keys to a target index, updates
//! the selection, and asks the virtualizer to bring the row into view with
//! the minimal scroll.

use std::time::Instant;

use crate::dataset::Dataset;
use crate::scroll::{ScrollCoordinator, ScrollViewport};
use crate::virtualizer::{Align, ScrollToOptions, Virtualizer};

/// Navigation keys the engine understands. Everything else is the host's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Select the previous row.
    Up,
    /// Select the next row.
    Down,
    /// Select the first row.
    Home,
    /// Select the last row.
    End,
    /// Move the selection up by one viewport of rows.
    PageUp,
    /// Move the selection down by one viewport of rows.
    PageDown,
    /// Confirm gesture; selection is not changed.
    Enter,
    /// Confirm gesture; selection is not changed, and the host must
    /// suppress the browser/toolkit default page-scroll.
    Space,
}

/// What a key press did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The selection moved. The row has already been scrolled into view.
    Selected {
        /// New selected index in the current view.
        index: usize,
        /// New selected key.
        key: String,
    },
    /// Enter/Space on the current selection; confirm semantics belong to
    /// the caller. `suppress_default` is `true` for Space.
    Confirmed {
        /// Index of the current selection, when it resolves to a row.
        index: Option<usize>,
        /// Whether the host must cancel the toolkit's default handling.
        suppress_default: bool,
    },
    /// Nothing to do (empty dataset, or the selection did not move).
    Ignored,
}

/// Single tracked selection, keyed by row identity.
///
/// Multi-selection is a caller concern layered on top of this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    key: Option<String>,
}

impl Selection {
    /// No selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected key, if any.
    #[must_use]
    pub fn selected_key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Whether `key` is the selected row.
    #[must_use]
    pub fn is_selected(&self, key: &str) -> bool {
        self.key.as_deref() == Some(key)
    }

    /// Replace the selection.
    pub fn select(&mut self, key: Option<String>) {
        self.key = key;
    }

    /// Clear the selection.
    pub fn clear(&mut self) {
        self.key = None;
    }

    /// Apply one navigation key.
    ///
    /// With no current selection, `Down` selects the first row and `Up` the
    /// last (a convenience default, mirrored from list widgets rather than
    /// inferred). Arrow and page moves clamp at the ends. The selected row
    /// is scrolled into view with `Align::Auto` (no-op when already fully
    /// visible).
    pub fn handle_key<V: ScrollViewport, D: Dataset>(
        &mut self,
        key: NavKey,
        virtualizer: &Virtualizer,
        dataset: &D,
        mut viewport: Option<&mut V>,
        coordinator: &mut ScrollCoordinator,
        now: Instant,
    ) -> NavOutcome {
        let count = virtualizer.count().min(dataset.len());
        if count == 0 {
            return NavOutcome::Ignored;
        }
        let current = self
            .key
            .as_deref()
            .and_then(|k| virtualizer.index_of_key(dataset, k));

        if matches!(key, NavKey::Enter | NavKey::Space) {
            return NavOutcome::Confirmed {
                index: current,
                suppress_default: key == NavKey::Space,
            };
        }

        let last = count - 1;
        let page = virtualizer
            .visible_range(viewport.as_deref())
            .len()
            .max(1);
        let target = match key {
            NavKey::Down => current.map_or(0, |i| (i + 1).min(last)),
            NavKey::Up => current.map_or(last, |i| i.saturating_sub(1)),
            NavKey::Home => 0,
            NavKey::End => last,
            NavKey::PageDown => current.map_or(0, |i| (i + page).min(last)),
            NavKey::PageUp => current.map_or(last, |i| i.saturating_sub(page)),
            NavKey::Enter | NavKey::Space => unreachable!(),
        };

        virtualizer.scroll_to_index(
            viewport.as_deref_mut(),
            coordinator,
            target,
            ScrollToOptions {
                align: Align::Auto,
                ..Default::default()
            },
            now,
        );

        if current == Some(target) {
            return NavOutcome::Ignored;
        }
        let target_key = dataset.key(target);
        self.key = Some(target_key.clone());
        NavOutcome::Selected {
            index: target,
            key: target_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::KeyedSlice;
    use crate::test_util::FixedViewport;

    fn fixture(n: usize) -> (Virtualizer, Vec<String>) {
        let virt = Virtualizer::new(n, |_| 36.0);
        let rows = (0..n).map(|i| format!("row-{i}")).collect();
        (virt, rows)
    }

    fn press(
        sel: &mut Selection,
        key: NavKey,
        virt: &Virtualizer,
        rows: &[String],
        vp: &mut FixedViewport,
        coord: &mut ScrollCoordinator,
    ) -> NavOutcome {
        let data = KeyedSlice::new(rows, |r: &String| r.clone());
        sel.handle_key(key, virt, &data, Some(vp), coord, Instant::now())
    }

    #[test]
    fn down_with_no_selection_selects_first() {
        let (virt, rows) = fixture(20);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        let outcome = press(&mut sel, NavKey::Down, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(
            outcome,
            NavOutcome::Selected { index: 0, key: "row-0".into() }
        );
        assert_eq!(sel.selected_key(), Some("row-0"));
    }

    #[test]
    fn up_with_no_selection_selects_last_and_scrolls() {
        let (virt, rows) = fixture(100);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        let outcome = press(&mut sel, NavKey::Up, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(
            outcome,
            NavOutcome::Selected { index: 99, key: "row-99".into() }
        );
        assert!(virt.visible_range(Some(&vp)).contains(&99));
    }

    #[test]
    fn arrows_clamp_at_ends() {
        let (virt, rows) = fixture(3);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        sel.select(Some("row-2".into()));
        let outcome = press(&mut sel, NavKey::Down, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(outcome, NavOutcome::Ignored);
        assert_eq!(sel.selected_key(), Some("row-2"));
        sel.select(Some("row-0".into()));
        let outcome = press(&mut sel, NavKey::Up, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(outcome, NavOutcome::Ignored);
    }

    #[test]
    fn home_and_end_jump() {
        let (virt, rows) = fixture(1000);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        sel.select(Some("row-500".into()));
        press(&mut sel, NavKey::End, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(sel.selected_key(), Some("row-999"));
        assert!(virt.visible_range(Some(&vp)).contains(&999));
        press(&mut sel, NavKey::Home, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(sel.selected_key(), Some("row-0"));
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn page_moves_by_visible_rows() {
        let (virt, rows) = fixture(1000);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(360); // exactly 10 rows of 36px
        let mut coord = ScrollCoordinator::new();
        sel.select(Some("row-100".into()));
        let outcome = press(&mut sel, NavKey::PageDown, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(
            outcome,
            NavOutcome::Selected { index: 110, key: "row-110".into() }
        );
        press(&mut sel, NavKey::PageUp, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(sel.selected_key(), Some("row-100"));
    }

    #[test]
    fn confirm_keys_do_not_move_selection() {
        let (virt, rows) = fixture(10);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        sel.select(Some("row-4".into()));
        let outcome = press(&mut sel, NavKey::Enter, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(
            outcome,
            NavOutcome::Confirmed { index: Some(4), suppress_default: false }
        );
        let outcome = press(&mut sel, NavKey::Space, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(
            outcome,
            NavOutcome::Confirmed { index: Some(4), suppress_default: true }
        );
        assert_eq!(sel.selected_key(), Some("row-4"));
    }

    #[test]
    fn empty_dataset_ignores_all_keys() {
        let (virt, rows) = fixture(0);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        for key in [NavKey::Up, NavKey::Down, NavKey::Home, NavKey::End, NavKey::Enter] {
            let outcome = press(&mut sel, key, &virt, &rows, &mut vp, &mut coord);
            assert_eq!(outcome, NavOutcome::Ignored);
        }
    }

    #[test]
    fn stale_selection_key_behaves_like_no_selection() {
        let (virt, rows) = fixture(10);
        let mut sel = Selection::new();
        let mut vp = FixedViewport::new(500);
        let mut coord = ScrollCoordinator::new();
        sel.select(Some("removed-row".into()));
        let outcome = press(&mut sel, NavKey::Down, &virt, &rows, &mut vp, &mut coord);
        assert_eq!(
            outcome,
            NavOutcome::Selected { index: 0, key: "row-0".into() }
        );
    }
}
