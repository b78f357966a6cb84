#![forbid(unsafe_code)]

//! Scrollbar thumb geometry.
//!
//! The engine computes where the thumb sits and how long it is; the host
//! draws it. Returns `None` when the content fits the viewport and no
//! scrollbar is needed.

/// Thumb geometry along a scrollbar track, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarMetrics {
    /// Offset of the thumb's leading edge from the track start.
    pub thumb_offset: u32,
    /// Thumb length.
    pub thumb_extent: u32,
}

/// Compute thumb geometry for a vertical scrollbar.
///
/// `offset`/`extent` describe the viewport, `total` the content, and
/// `track_extent` the drawable track length. The thumb never shrinks below
/// `min_thumb` so it stays grabbable on very long lists.
#[must_use]
pub fn thumb_metrics(
    offset: u64,
    extent: u32,
    total: u64,
    track_extent: u32,
    min_thumb: u32,
) -> Option<ScrollbarMetrics> {
    if total <= u64::from(extent) || extent == 0 || track_extent == 0 {
        return None;
    }
    let track = u64::from(track_extent);
    let proportional = track * u64::from(extent) / total;
    let thumb_extent = proportional.max(u64::from(min_thumb.max(1))).min(track) as u32;
    let max_offset = total - u64::from(extent);
    let available = u64::from(track_extent - thumb_extent);
    let thumb_offset = (offset.min(max_offset) * available / max_offset) as u32;
    Some(ScrollbarMetrics {
        thumb_offset,
        thumb_extent,
    })
}
