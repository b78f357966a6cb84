#![forbid(unsafe_code)]

//! Virtualized table layer for DroidView.
//!
//! Builds the table variant on top of the `droidview-virtual` windowing
//! engine:
//!
//! - [`ColumnSpec`]/[`solve_columns`] — fixed/flex column widths, solved
//!   once per pass and shared by sticky header and body
//! - [`SortStore`]/[`SortHandle`] — per-instance tri-state column sort,
//!   pruned when the instance unmounts
//! - [`VirtualTable`] — columns + sort + selection, exposing the current
//!   view as a dataset lens for the windowing engine
//!
//! # Example
//!
//! ```
//! use droidview_table::{Column, SortStore, VirtualTable};
//! use droidview_virtual::{Dataset, Virtualizer, render_window, test_util::FixedViewport};
//!
//! struct App { name: &'static str, size_kb: u64 }
//! let apps = vec![
//!     App { name: "browser", size_kb: 4_200 },
//!     App { name: "camera", size_kb: 900 },
//! ];
//!
//! let store = SortStore::new();
//! let mut table = VirtualTable::new(
//!     &store,
//!     "app-list",
//!     vec![
//!         Column::flex("name").title("Name").sortable(|a: &App, b: &App| a.name.cmp(b.name)),
//!         Column::fixed("size", 90).title("Size").sortable(|a: &App, b: &App| a.size_kb.cmp(&b.size_kb)),
//!     ],
//!     |a: &App| a.name.to_string(),
//! );
//! table.click_header("size", &apps);
//!
//! let data = table.dataset(&apps);
//! assert_eq!(data.key(0), "camera"); // smallest first
//!
//! let virt = Virtualizer::new(data.len(), |_| 28.0);
//! let vp = FixedViewport::new(300);
//! let window = render_window(&virt, Some(&vp), &data, &table.selection,
//!     &mut |a: &App, _i: usize, _sel: bool| a.size_kb);
//! assert_eq!(window.rows[0].node, 900);
//! ```

/// Column width solving.
pub mod columns;
/// Tri-state sorting and the per-instance sort store.
pub mod sort;
/// Table composition over the windowing engine.
pub mod table;

pub use columns::{ColumnBand, ColumnSpec, solve_columns};
pub use sort::{ColumnSort, SortHandle, SortOrder, SortStore, cycle_sort, sorted_view};
pub use table::{Column, SortOutcome, TableDataset, VirtualTable};
