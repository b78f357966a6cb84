#![forbid(unsafe_code)]

//! Windowed (virtualized) list engine for DroidView.
//!
//! Large, frequently-changing collections — device properties, package
//! lists, file listings, log lines, timeline events — are rendered through
//! this engine instead of materializing every row. It provides:
//!
//! - [`Virtualizer`] — visible-range math over a measured/estimated
//!   [`SizeTable`], O(log n + visible) per pass
//! - [`render_window`] — drives the caller's row renderer over the window
//! - [`ScrollCoordinator`] — programmatic-scroll attribution and the
//!   auto-follow (stick-to-bottom) state machine
//! - [`Selection`] with keyboard navigation ([`NavKey`])
//! - [`thumb_metrics`] — scrollbar geometry for the host to draw
//!
//! The engine owns no items and draws nothing itself: the caller supplies a
//! [`Dataset`] and a [`RenderRow`] implementation, and wires its scroll
//! container in through [`ScrollViewport`].
//!
//! # Example
//!
//! ```
//! use droidview_virtual::{
//!     KeyedSlice, ScrollCoordinator, Selection, Virtualizer, render_window,
//!     test_util::FixedViewport,
//! };
//!
//! let lines: Vec<String> = (0..100_000).map(|i| format!("log line {i}")).collect();
//! let data = KeyedSlice::new(&lines, |l: &String| l.clone());
//! let virt = Virtualizer::new(lines.len(), |_| 18.0).with_overscan(6);
//! let vp = FixedViewport::new(540);
//! let selection = Selection::new();
//! let window = render_window(&virt, Some(&vp), &data, &selection, &mut |line: &String,
//!                                                                       _idx: usize,
//!                                                                       _sel: bool| {
//!     line.clone()
//! });
//! assert!(window.rows.len() <= 30 + 12);
//! assert_eq!(window.total_size, 100_000 * 18);
//! # let _ = ScrollCoordinator::new();
//! ```

/// The caller-owned data source seam.
pub mod dataset;
/// Fenwick tree for O(log n) prefix sums.
pub mod fenwick;
/// Keyboard navigation and single selection.
pub mod keyboard;
/// Session snapshots of user-facing state.
pub mod persist;
/// Scroll attribution and auto-follow.
pub mod scroll;
/// Scrollbar thumb geometry.
pub mod scrollbar;
/// Per-row size storage.
pub mod size_table;
/// Viewport doubles for tests and examples.
pub mod test_util;
/// Visible-range computation.
pub mod virtualizer;
/// Window rendering over the caller's node type.
pub mod window;

pub use dataset::{Dataset, KeyedSlice};
pub use fenwick::FenwickTree;
pub use keyboard::{NavKey, NavOutcome, Selection};
pub use persist::ListPersistState;
pub use scroll::{
    DEFAULT_FOLLOW_THRESHOLD, FollowState, ScrollBehavior, ScrollCoordinator, ScrollOutcome,
    ScrollSource, ScrollViewport,
};
pub use scrollbar::{ScrollbarMetrics, thumb_metrics};
pub use size_table::{MIN_ROW_PX, SizeTable};
pub use virtualizer::{
    Align, DEFAULT_OVERSCAN, ScrollToOptions, VirtualItem, VirtualItems, Virtualizer,
};
pub use window::{RenderRow, RenderedWindow, WindowRow, render_window};
