#![forbid(unsafe_code)]

//! Visible-range computation over the size table.
//!
//! The virtualizer owns no items and no scroll position. Each query takes
//! the current viewport (`None` while unmounted) and derives everything from
//! scratch: binary-search the first row at the scroll offset, walk forward
//! until past the viewport, widen by overscan. O(log n + visible + overscan)
//! per pass, so a 1,000,000-row list recomputes as fast as a 10-row one.
//!
//! # Example
//!
//! ```
//! use droidview_virtual::{KeyedSlice, Virtualizer};
//!
//! let rows: Vec<String> = (0..100_000).map(|i| format!("row {i}")).collect();
//! let data = KeyedSlice::new(&rows, |r: &String| r.clone());
//! let virt = Virtualizer::new(rows.len(), |_| 36.0).with_overscan(10);
//! assert_eq!(virt.total_size(), 100_000 * 36);
//! // With no viewport mounted yet there is nothing to render.
//! assert_eq!(virt.virtual_items(None::<&droidview_virtual::test_util::FixedViewport>, &data).count(), 0);
//! ```

use std::ops::Range;
use std::time::Instant;

use crate::dataset::Dataset;
use crate::scroll::{ScrollBehavior, ScrollCoordinator, ScrollViewport};
use crate::size_table::SizeTable;

/// Default overscan in rows on each side of the viewport.
pub const DEFAULT_OVERSCAN: usize = 2;

/// Vertical alignment for [`Virtualizer::scroll_to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Put the row's top edge at the top of the viewport.
    Start,
    /// Center the row in the viewport.
    Center,
    /// Put the row's bottom edge at the bottom of the viewport.
    End,
    /// No-op when the row is already fully visible, otherwise the minimal
    /// scroll that brings it fully into view.
    #[default]
    Auto,
}

/// Options for [`Virtualizer::scroll_to_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollToOptions {
    /// Where the target row lands in the viewport.
    pub align: Align,
    /// Instant jump or animated scroll.
    pub behavior: ScrollBehavior,
}

/// One windowed row: everything the host needs to position it absolutely.
///
/// Ephemeral — recomputed on every pass, never stored by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualItem {
    /// Index into the (possibly sorted) dataset view.
    pub index: usize,
    /// Stable identity from the dataset's key extractor.
    pub key: String,
    /// Top edge offset from the start of the content, in pixels.
    pub start: u64,
    /// Row size in pixels.
    pub size: u32,
}

/// The windowing engine.
pub struct Virtualizer {
    sizes: SizeTable,
    overscan: usize,
}

impl std::fmt::Debug for Virtualizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Virtualizer")
            .field("count", &self.sizes.len())
            .field("overscan", &self.overscan)
            .field("total_size", &self.sizes.total())
            .finish()
    }
}

impl Virtualizer {
    /// Create a virtualizer for `count` rows with a per-row size estimator.
    ///
    /// The estimator is consulted once per row (and again for rows added by
    /// [`Self::set_count`]); measurements reported through [`Self::measure`]
    /// override it. Invalid estimates are coerced to a 1px minimum.
    #[must_use]
    pub fn new(count: usize, estimate_size: impl Fn(usize) -> f32 + 'static) -> Self {
        Self {
            sizes: SizeTable::new(count, estimate_size),
            overscan: DEFAULT_OVERSCAN,
        }
    }

    /// Set the overscan row count applied on each side of the viewport.
    #[must_use]
    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    /// Number of rows.
    #[must_use]
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    /// Overscan row count.
    #[must_use]
    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Exact total scrollable extent in pixels.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.sizes.total()
    }

    /// Size of one row in pixels.
    #[must_use]
    pub fn size_of(&self, index: usize) -> u32 {
        self.sizes.size_of(index)
    }

    /// Top-edge offset of one row in pixels.
    #[must_use]
    pub fn offset_of(&self, index: usize) -> u64 {
        self.sizes.offset_of(index)
    }

    /// Report a measured size for a rendered row.
    ///
    /// Returns `true` only when the stored size changed; hosts re-render on
    /// `true`, which bounds the measure/re-render cycle to one settle pass
    /// per actual content change.
    pub fn measure(&mut self, index: usize, px: u32) -> bool {
        let changed = self.sizes.set_measured(index, px);
        #[cfg(feature = "tracing")]
        if changed {
            tracing::trace!(index, px, "row measured");
        }
        changed
    }

    /// Sync the row count after a dataset change, without viewport access.
    /// Prefer [`Self::sync_count`] in hosts that have one mounted.
    pub fn set_count(&mut self, count: usize) {
        self.sizes.resize(count);
    }

    /// Sync the row count and reconcile the viewport:
    /// a shrink clamps an out-of-range offset to `total - extent`;
    /// growth while auto-follow is engaged sticks the view to the newest row.
    pub fn sync_count<V: ScrollViewport>(
        &mut self,
        count: usize,
        viewport: Option<&mut V>,
        coordinator: &mut ScrollCoordinator,
        now: Instant,
    ) {
        let old = self.sizes.len();
        self.sizes.resize(count);
        let Some(vp) = viewport else { return };
        if count < old {
            let max_offset = self.sizes.total().saturating_sub(u64::from(vp.extent()));
            if vp.offset() > max_offset {
                coordinator.begin_programmatic(max_offset, ScrollBehavior::Instant, now);
                vp.request_scroll(max_offset, ScrollBehavior::Instant);
            }
        } else if count > old && coordinator.is_following() {
            self.scroll_to_index(
                Some(vp),
                coordinator,
                count - 1,
                ScrollToOptions {
                    align: Align::End,
                    behavior: ScrollBehavior::Instant,
                },
                now,
            );
        }
    }

    /// Rows intersecting the viewport, without overscan.
    #[must_use]
    pub fn visible_range<V: ScrollViewport>(&self, viewport: Option<&V>) -> Range<usize> {
        let Some(vp) = viewport else { return 0..0 };
        let count = self.sizes.len();
        let extent = vp.extent();
        if count == 0 || extent == 0 {
            return 0..0;
        }
        let max_offset = self.sizes.total().saturating_sub(u64::from(extent));
        let offset = vp.offset().min(max_offset);
        let first = self.sizes.index_at(offset);
        let last = self.sizes.index_at(offset + u64::from(extent) - 1);
        first..(last + 1).min(count)
    }

    /// Rows to actually render: the visible range widened by overscan on
    /// both sides and clamped to the dataset bounds.
    #[must_use]
    pub fn render_range<V: ScrollViewport>(&self, viewport: Option<&V>) -> Range<usize> {
        let visible = self.visible_range(viewport);
        if visible.is_empty() {
            return visible;
        }
        let start = visible.start.saturating_sub(self.overscan);
        let end = visible.end.saturating_add(self.overscan).min(self.sizes.len());
        start..end
    }

    /// Lazy sequence of [`VirtualItem`] for the current render range.
    ///
    /// Restartable: every call re-derives the range from current scroll,
    /// viewport, and size state. One O(log n) seek, then O(1) per row.
    pub fn virtual_items<'a, V: ScrollViewport, D: Dataset>(
        &'a self,
        viewport: Option<&V>,
        dataset: &'a D,
    ) -> VirtualItems<'a, D> {
        #[cfg(feature = "tracing")]
        let _span = tracing::trace_span!(
            "virtual_items",
            count = self.sizes.len(),
            overscan = self.overscan
        )
        .entered();
        let mut range = self.render_range(viewport);
        // A dataset that raced shorter than the size table renders only what
        // actually exists; the next sync_count reconciles the rest.
        range.end = range.end.min(dataset.len());
        range.start = range.start.min(range.end);
        let start_offset = self.sizes.offset_of(range.start);
        VirtualItems {
            sizes: &self.sizes,
            dataset,
            cursor: range.start,
            end: range.end,
            next_start: start_offset,
        }
    }

    /// Resolve a selection key back to its current index. O(n) scan — key
    /// presses, not the scroll path, pay for this.
    #[must_use]
    pub fn index_of_key<D: Dataset>(&self, dataset: &D, key: &str) -> Option<usize> {
        let count = self.sizes.len().min(dataset.len());
        (0..count).find(|&i| dataset.key(i) == key)
    }

    /// Scroll so that `index` lands in the viewport per `opts`.
    ///
    /// Out-of-range indices clamp to the last row; an empty dataset or an
    /// unmounted viewport is a no-op. With `Align::Auto`, a fully visible
    /// row produces no scroll at all. Issuing a new call before a prior
    /// smooth scroll settles supersedes it.
    pub fn scroll_to_index<V: ScrollViewport>(
        &self,
        viewport: Option<&mut V>,
        coordinator: &mut ScrollCoordinator,
        index: usize,
        opts: ScrollToOptions,
        now: Instant,
    ) {
        let Some(vp) = viewport else { return };
        let count = self.sizes.len();
        if count == 0 {
            return;
        }
        let index = index.min(count - 1);
        let extent = u64::from(vp.extent());
        let item_start = self.sizes.offset_of(index);
        let item_size = u64::from(self.sizes.size_of(index));
        let item_end = item_start + item_size;
        let raw = match opts.align {
            Align::Start => item_start,
            Align::End => item_end.saturating_sub(extent),
            Align::Center => {
                (item_start + item_size / 2).saturating_sub(extent / 2)
            }
            Align::Auto => {
                let current = vp.offset();
                if item_start >= current && item_end <= current.saturating_add(extent) {
                    return;
                }
                if item_start < current {
                    item_start
                } else {
                    item_end.saturating_sub(extent)
                }
            }
        };
        let max_offset = self.sizes.total().saturating_sub(extent);
        let target = raw.min(max_offset);
        coordinator.begin_programmatic(target, opts.behavior, now);
        vp.request_scroll(target, opts.behavior);
    }
}

/// Iterator over the windowed rows. See [`Virtualizer::virtual_items`].
pub struct VirtualItems<'a, D: Dataset> {
    sizes: &'a SizeTable,
    dataset: &'a D,
    cursor: usize,
    end: usize,
    next_start: u64,
}

impl<D: Dataset> Iterator for VirtualItems<'_, D> {
    type Item = VirtualItem;

    fn next(&mut self) -> Option<VirtualItem> {
        if self.cursor >= self.end {
            return None;
        }
        let index = self.cursor;
        let size = self.sizes.size_of(index);
        let item = VirtualItem {
            index,
            key: self.dataset.key(index),
            start: self.next_start,
            size,
        };
        self.cursor += 1;
        self.next_start += u64::from(size);
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.cursor;
        (remaining, Some(remaining))
    }
}

impl<D: Dataset> ExactSizeIterator for VirtualItems<'_, D> {}
