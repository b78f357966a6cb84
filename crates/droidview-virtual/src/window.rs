#![forbid(unsafe_code)]

//! Drives the caller's row renderer over the windowed range.
//!
//! The engine positions rows; the caller draws them. [`render_window`] walks
//! the current [`crate::VirtualItem`] sequence, invokes the renderer for each
//! row with its selection flag, and returns absolutely-positionable nodes.
//! Per-row side effects (thumbnails, icon fetches) belong to the renderer and
//! must not block — the window computation itself never awaits anything.
//!
//! For variable-height content the host measures the produced node and feeds
//! the result back through [`crate::Virtualizer::measure`] with the row's
//! `index`; a `true` return is the signal to run one more render pass.

use crate::dataset::Dataset;
use crate::keyboard::Selection;
use crate::scroll::ScrollViewport;
use crate::virtualizer::Virtualizer;

/// Renders one row into the host's visual node type.
///
/// Implemented for closures `FnMut(&Item, usize, bool) -> Node`.
pub trait RenderRow<T: ?Sized> {
    /// The host's visual node type.
    type Node;

    /// Produce the node for `item` at `index`; `selected` reflects the
    /// engine's single tracked selection.
    fn render_row(&mut self, item: &T, index: usize, selected: bool) -> Self::Node;
}

impl<T: ?Sized, N, F> RenderRow<T> for F
where
    F: FnMut(&T, usize, bool) -> N,
{
    type Node = N;

    fn render_row(&mut self, item: &T, index: usize, selected: bool) -> N {
        self(item, index, selected)
    }
}

/// One positioned row of the rendered window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowRow<N> {
    /// Index into the current dataset view.
    pub index: usize,
    /// Stable row identity.
    pub key: String,
    /// Absolute top offset in pixels from the start of the content.
    pub top: u64,
    /// Row height in pixels.
    pub height: u32,
    /// The caller-rendered node.
    pub node: N,
}

/// The rendered window: positioned rows plus the total scrollable extent
/// the host should give its content element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWindow<N> {
    /// Rows in the render range, in index order.
    pub rows: Vec<WindowRow<N>>,
    /// Exact total content extent in pixels.
    pub total_size: u64,
}

/// Render the windowed rows.
///
/// Row count is bounded by visible rows plus two overscans regardless of
/// dataset size; an unmounted viewport (`None`) renders nothing.
pub fn render_window<V, D, R>(
    virtualizer: &Virtualizer,
    viewport: Option<&V>,
    dataset: &D,
    selection: &Selection,
    renderer: &mut R,
) -> RenderedWindow<R::Node>
where
    V: ScrollViewport,
    D: Dataset,
    R: RenderRow<D::Item>,
{
    #[cfg(feature = "tracing")]
    let _span = tracing::debug_span!("render_window", count = virtualizer.count()).entered();

    let rows = virtualizer
        .virtual_items(viewport, dataset)
        .map(|item| {
            let selected = selection.is_selected(&item.key);
            let node = renderer.render_row(dataset.item(item.index), item.index, selected);
            WindowRow {
                index: item.index,
                key: item.key,
                top: item.start,
                height: item.size,
                node,
            }
        })
        .collect();
    RenderedWindow {
        rows,
        total_size: virtualizer.total_size(),
    }
}
