#![forbid(unsafe_code)]

//! The virtualized table: column layout + sort view + the list engine.
//!
//! A [`VirtualTable`] owns the per-instance pieces (columns, sort handle,
//! selection) and exposes the current sorted view as a [`Dataset`] lens, so
//! the windowing engine in `droidview-virtual` never knows whether it is
//! looking at sorted or insertion order. Keys are extracted from the items
//! themselves, which is what lets the selection follow its row across
//! re-sorts.

use std::cmp::Ordering;
use std::time::Instant;

use droidview_virtual::{
    Dataset, NavKey, NavOutcome, ScrollCoordinator, ScrollViewport, Selection, Virtualizer,
};

use crate::columns::{ColumnBand, ColumnSpec, solve_columns};
use crate::sort::{ColumnSort, SortHandle, SortStore, sorted_view};

/// One table column: identity, header label, width behavior, and an
/// optional comparator that makes it sortable.
pub struct Column<T> {
    key: String,
    title: String,
    width: ColumnSpec,
    compare: Option<Box<dyn Fn(&T, &T) -> Ordering>>,
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("width", &self.width)
            .field("sortable", &self.compare.is_some())
            .finish()
    }
}

impl<T> Column<T> {
    /// A fixed-width column.
    #[must_use]
    pub fn fixed(key: impl Into<String>, width: u32) -> Self {
        Self {
            key: key.into(),
            title: String::new(),
            width: ColumnSpec::Fixed(width),
            compare: None,
        }
    }

    /// A flexible column sharing the remaining space.
    #[must_use]
    pub fn flex(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: String::new(),
            width: ColumnSpec::Flex,
            compare: None,
        }
    }

    /// Set the header label.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Make the column sortable with `compare` as its ascending order.
    #[must_use]
    pub fn sortable(mut self, compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        self.compare = Some(Box::new(compare));
        self
    }

    /// Column identity used by sort state and header clicks.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Header label.
    #[must_use]
    pub fn header_title(&self) -> &str {
        &self.title
    }

    /// Width behavior.
    #[must_use]
    pub fn width_spec(&self) -> ColumnSpec {
        self.width
    }

    /// Whether a comparator is attached.
    #[must_use]
    pub fn is_sortable(&self) -> bool {
        self.compare.is_some()
    }
}

/// What a header click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortOutcome {
    /// The sort state advanced; `None` means back to insertion order.
    Applied(Option<ColumnSort>),
    /// The column's comparator panicked; the column is disabled for this
    /// instance's life and the view fell back to insertion order. The
    /// caller decides whether to surface a message.
    ComparatorFailed {
        /// Key of the failing column.
        column: String,
    },
    /// Unknown, unsortable, or disabled column — nothing changed.
    Ignored,
}

/// Per-instance table state: columns, sort, selection.
pub struct VirtualTable<T> {
    columns: Vec<Column<T>>,
    sort: SortHandle,
    key_of: Box<dyn Fn(&T) -> String>,
    view: Option<Vec<usize>>,
    /// The single tracked selection; layered multi-select is the caller's.
    pub selection: Selection,
}

impl<T> std::fmt::Debug for VirtualTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualTable")
            .field("id", &self.sort.id())
            .field("columns", &self.columns)
            .field("sorted", &self.view.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> VirtualTable<T> {
    /// Mount a table instance.
    ///
    /// `table_id` keys the sort state in `store`; it must be unique among
    /// mounted tables and is pruned automatically when this value drops.
    /// `key_of` extracts the stable row identity from an item.
    #[must_use]
    pub fn new(
        store: &SortStore,
        table_id: impl Into<String>,
        columns: Vec<Column<T>>,
        key_of: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            columns,
            sort: store.handle(table_id),
            key_of: Box::new(key_of),
            view: None,
            selection: Selection::new(),
        }
    }

    /// The columns, in display order.
    #[must_use]
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Current sort state.
    #[must_use]
    pub fn sort_state(&self) -> Option<ColumnSort> {
        self.sort.current()
    }

    /// Solve the column bands for this render pass.
    ///
    /// Call once per pass; the sticky header and the body rows must both
    /// consume this exact result.
    #[must_use]
    pub fn layout(&self, available: u32, spacing: u32) -> Vec<ColumnBand> {
        let specs: Vec<ColumnSpec> = self.columns.iter().map(|c| c.width).collect();
        solve_columns(&specs, available, spacing)
    }

    /// Handle a click on the header of `column`.
    ///
    /// Cycles none → ascending → descending → none on the same column;
    /// a different column restarts at ascending. Clicks on unsortable or
    /// disabled columns are ignored.
    pub fn click_header(&mut self, column: &str, items: &[T]) -> SortOutcome {
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == column && c.compare.is_some());
        if !sortable || self.sort.is_poisoned(column) {
            return SortOutcome::Ignored;
        }
        self.sort.click(column);
        self.rebuild(items)
    }

    /// Re-derive the view after a dataset refresh. Sort state is kept; the
    /// view is rebuilt against the new items.
    pub fn refresh(&mut self, items: &[T]) -> SortOutcome {
        self.rebuild(items)
    }

    /// Map a view row to its dataset index.
    #[must_use]
    pub fn view_index(&self, row: usize) -> usize {
        match &self.view {
            Some(view) => view.get(row).copied().unwrap_or(row),
            None => row,
        }
    }

    /// The current view as a [`Dataset`] lens over `items`, ready to hand
    /// to the windowing engine.
    #[must_use]
    pub fn dataset<'a>(&'a self, items: &'a [T]) -> TableDataset<'a, T> {
        TableDataset {
            items,
            view: self.view.as_deref(),
            key_of: self.key_of.as_ref(),
        }
    }

    /// Route a navigation key to the selection against the current view.
    ///
    /// Selection is tracked by row key, so it stays on the same item when
    /// the view re-sorts under it.
    pub fn handle_key<V: ScrollViewport>(
        &mut self,
        key: NavKey,
        items: &[T],
        virtualizer: &Virtualizer,
        viewport: Option<&mut V>,
        coordinator: &mut ScrollCoordinator,
        now: Instant,
    ) -> NavOutcome {
        let data = TableDataset {
            items,
            view: self.view.as_deref(),
            key_of: self.key_of.as_ref(),
        };
        self.selection
            .handle_key(key, virtualizer, &data, viewport, coordinator, now)
    }

    fn rebuild(&mut self, items: &[T]) -> SortOutcome {
        let Some(state) = self.sort.current() else {
            // Unsorted: the identity view IS the insertion order, never a
            // re-derived ordering.
            self.view = None;
            return SortOutcome::Applied(None);
        };
        let compare = self
            .columns
            .iter()
            .find(|c| c.key == state.column)
            .and_then(|c| c.compare.as_ref());
        let Some(compare) = compare else {
            self.view = None;
            return SortOutcome::Applied(None);
        };
        match sorted_view(items, compare, state.order) {
            Some(view) => {
                self.view = Some(view);
                SortOutcome::Applied(Some(state))
            }
            None => {
                self.sort.poison(&state.column);
                self.sort.set(None);
                self.view = None;
                SortOutcome::ComparatorFailed {
                    column: state.column,
                }
            }
        }
    }
}

/// The sorted (or insertion-order) view of a table's items as a dataset.
pub struct TableDataset<'a, T> {
    items: &'a [T],
    view: Option<&'a [usize]>,
    key_of: &'a dyn Fn(&T) -> String,
}

impl<T> Dataset for TableDataset<'_, T> {
    type Item = T;

    fn len(&self) -> usize {
        match self.view {
            Some(view) => view.len().min(self.items.len()),
            None => self.items.len(),
        }
    }

    fn item(&self, index: usize) -> &T {
        let mapped = self.view.map_or(index, |v| v[index]);
        &self.items[mapped]
    }

    fn key(&self, index: usize) -> String {
        (self.key_of)(self.item(index))
    }
}
