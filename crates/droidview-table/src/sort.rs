#![forbid(unsafe_code)]

//! Tri-state column sorting with per-instance state.
//!
//! Sort state lives in an explicit [`SortStore`]; every mounted table gets a
//! [`SortHandle`] keyed by its own identifier, and the handle removes its
//! entry when dropped. State therefore survives data refreshes for the same
//! identifier and never outlives the table instance — there is no hidden
//! global map to leak.
//!
//! Descending order is produced by reversing the stable ascending result,
//! not by inverting the comparator. Rows with equal sort keys consequently
//! appear in reverse insertion order in the descending view; this is the
//! pinned behavior, see `descending_reverses_ties`.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};

/// Sort direction of the active column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub enum SortOrder {
    /// Ascending by the column comparator.
    Ascending,
    /// The ascending result, reversed.
    Descending,
}

/// The active column sort; `None` at the call sites means unsorted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ColumnSort {
    /// Key of the sorted column.
    pub column: String,
    /// Direction.
    pub order: SortOrder,
}

/// Advance the tri-state cycle for a header click.
///
/// Same column: none → ascending → descending → none. A different column
/// always restarts at ascending (single-column sort).
#[must_use]
pub fn cycle_sort(current: Option<&ColumnSort>, clicked: &str) -> Option<ColumnSort> {
    match current {
        Some(sort) if sort.column == clicked => match sort.order {
            SortOrder::Ascending => Some(ColumnSort {
                column: sort.column.clone(),
                order: SortOrder::Descending,
            }),
            SortOrder::Descending => None,
        },
        _ => Some(ColumnSort {
            column: clicked.to_string(),
            order: SortOrder::Ascending,
        }),
    }
}

/// Build a sorted index view over `items`.
///
/// The dataset itself is never reordered; the result maps view rows to
/// dataset indices. The sort is stable; `Descending` reverses the ascending
/// result afterwards. A panicking comparator is caught and reported as
/// `None` so a render pass can fall back to the unsorted view.
#[must_use]
pub fn sorted_view<T>(
    items: &[T],
    compare: impl Fn(&T, &T) -> Ordering,
    order: SortOrder,
) -> Option<Vec<usize>> {
    let sorted = catch_unwind(AssertUnwindSafe(|| {
        let mut view: Vec<usize> = (0..items.len()).collect();
        view.sort_by(|&a, &b| compare(&items[a], &items[b]));
        view
    }));
    match sorted {
        Ok(mut view) => {
            if order == SortOrder::Descending {
                view.reverse();
            }
            Some(view)
        }
        Err(_) => None,
    }
}

#[derive(Debug, Default)]
struct SortEntry {
    sort: Option<ColumnSort>,
    poisoned: FxHashSet<String>,
}

type SharedEntries = Rc<RefCell<FxHashMap<String, SortEntry>>>;

/// Process-wide storage of per-table sort state, explicitly scoped:
/// entries exist only while a [`SortHandle`] for their identifier is alive.
///
/// Single-threaded by design — the engine runs entirely on the UI thread.
#[derive(Debug, Clone, Default)]
pub struct SortStore {
    entries: SharedEntries,
}

impl SortStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or re-attach to) the entry for `table_id`.
    ///
    /// One live handle per identifier: the handle prunes the entry on drop.
    #[must_use]
    pub fn handle(&self, table_id: impl Into<String>) -> SortHandle {
        let id = table_id.into();
        self.entries.borrow_mut().entry(id.clone()).or_default();
        SortHandle {
            entries: Rc::clone(&self.entries),
            id,
        }
    }

    /// Number of live entries (one per mounted table).
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether the store has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Whether an entry exists for `table_id`.
    #[must_use]
    pub fn contains(&self, table_id: &str) -> bool {
        self.entries.borrow().contains_key(table_id)
    }
}

/// One table instance's view of the [`SortStore`].
#[derive(Debug)]
pub struct SortHandle {
    entries: SharedEntries,
    id: String,
}

impl SortHandle {
    /// The owning table's identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current sort state.
    #[must_use]
    pub fn current(&self) -> Option<ColumnSort> {
        self.entries
            .borrow()
            .get(&self.id)
            .and_then(|e| e.sort.clone())
    }

    /// Replace the sort state.
    pub fn set(&self, sort: Option<ColumnSort>) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&self.id) {
            entry.sort = sort;
        }
    }

    /// Cycle the state for a click on `column` and return the new state.
    pub fn click(&self, column: &str) -> Option<ColumnSort> {
        let next = cycle_sort(self.current().as_ref(), column);
        self.set(next.clone());
        next
    }

    /// Disable `column` for the rest of this instance's life after its
    /// comparator panicked.
    pub fn poison(&self, column: &str) {
        if let Some(entry) = self.entries.borrow_mut().get_mut(&self.id) {
            entry.poisoned.insert(column.to_string());
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(table = %self.id, column, "sort comparator panicked; column disabled");
    }

    /// Whether `column`'s comparator has been disabled.
    #[must_use]
    pub fn is_poisoned(&self, column: &str) -> bool {
        self.entries
            .borrow()
            .get(&self.id)
            .is_some_and(|e| e.poisoned.contains(column))
    }
}

impl Drop for SortHandle {
    fn drop(&mut self) {
        self.entries.borrow_mut().remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_same_column() {
        let asc = cycle_sort(None, "name");
        assert_eq!(
            asc,
            Some(ColumnSort { column: "name".into(), order: SortOrder::Ascending })
        );
        let desc = cycle_sort(asc.as_ref(), "name");
        assert_eq!(
            desc,
            Some(ColumnSort { column: "name".into(), order: SortOrder::Descending })
        );
        assert_eq!(cycle_sort(desc.as_ref(), "name"), None);
    }

    #[test]
    fn clicking_other_column_restarts_ascending() {
        let desc = Some(ColumnSort { column: "size".into(), order: SortOrder::Descending });
        assert_eq!(
            cycle_sort(desc.as_ref(), "name"),
            Some(ColumnSort { column: "name".into(), order: SortOrder::Ascending })
        );
    }

    #[test]
    fn sorted_view_is_stable_ascending() {
        let items = [("b", 0), ("a", 1), ("b", 2), ("a", 3)];
        let view = sorted_view(&items, |x, y| x.0.cmp(y.0), SortOrder::Ascending).unwrap();
        // Ties keep insertion order under a stable sort.
        assert_eq!(view, vec![1, 3, 0, 2]);
    }

    #[test]
    fn descending_reverses_ties() {
        let items = [("b", 0), ("a", 1), ("b", 2), ("a", 3)];
        let asc = sorted_view(&items, |x, y| x.0.cmp(y.0), SortOrder::Ascending).unwrap();
        let desc = sorted_view(&items, |x, y| x.0.cmp(y.0), SortOrder::Descending).unwrap();
        let mut reversed = asc.clone();
        reversed.reverse();
        // The descending view is exactly the reversed ascending view, so
        // tied rows flip to reverse insertion order.
        assert_eq!(desc, reversed);
        assert_eq!(desc, vec![2, 0, 3, 1]);
    }

    #[test]
    fn panicking_comparator_is_caught() {
        let items = [1, 2, 3];
        let view = sorted_view(
            &items,
            |_: &i32, _: &i32| panic!("bad comparator"),
            SortOrder::Ascending,
        );
        assert_eq!(view, None);
    }

    #[test]
    fn store_prunes_on_handle_drop() {
        let store = SortStore::new();
        {
            let handle = store.handle("packages");
            handle.click("name");
            assert_eq!(store.len(), 1);
            assert!(store.contains("packages"));
        }
        assert!(store.is_empty());
    }

    #[test]
    fn state_persists_while_handle_lives() {
        let store = SortStore::new();
        let handle = store.handle("files");
        handle.click("size");
        handle.click("size");
        assert_eq!(
            handle.current(),
            Some(ColumnSort { column: "size".into(), order: SortOrder::Descending })
        );
        // A fresh handle for a *different* identifier starts clean.
        let other = store.handle("processes");
        assert_eq!(other.current(), None);
    }

    #[test]
    fn poisoning_is_per_column() {
        let store = SortStore::new();
        let handle = store.handle("log");
        handle.poison("payload");
        assert!(handle.is_poisoned("payload"));
        assert!(!handle.is_poisoned("timestamp"));
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn sort_state_serde_round_trip() {
        let sort = ColumnSort { column: "name".into(), order: SortOrder::Descending };
        let json = serde_json::to_string(&sort).unwrap();
        let back: ColumnSort = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sort);
    }
}
