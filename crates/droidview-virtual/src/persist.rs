#![forbid(unsafe_code)]

//! Session snapshots of user-facing list state.
//!
//! Captures what should survive a view being torn down and re-created:
//! scroll offset, selection key, and the follow flag. Transient state
//! (settle windows, in-flight scrolls) is deliberately not part of the
//! snapshot. Serialization derives are behind the `state-persistence`
//! feature.

use std::time::Instant;

use crate::keyboard::Selection;
use crate::scroll::{ScrollBehavior, ScrollCoordinator, ScrollViewport};

/// Persistable list state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "state-persistence",
    derive(serde::Serialize, serde::Deserialize)
)]
pub struct ListPersistState {
    /// Scroll offset in pixels.
    pub scroll_offset: u64,
    /// Selected row key.
    pub selected_key: Option<String>,
    /// Whether auto-follow was engaged.
    pub follow: bool,
}

impl ListPersistState {
    /// Snapshot the current state.
    #[must_use]
    pub fn capture<V: ScrollViewport>(
        viewport: Option<&V>,
        coordinator: &ScrollCoordinator,
        selection: &Selection,
    ) -> Self {
        Self {
            scroll_offset: viewport.map_or(0, |v| v.offset()),
            selected_key: selection.selected_key().map(str::to_string),
            follow: coordinator.is_following(),
        }
    }

    /// Restore a snapshot into a fresh engine instance.
    ///
    /// The scroll restore is issued as a programmatic instant scroll so it
    /// cannot be mistaken for user input and flip the follow state.
    pub fn apply<V: ScrollViewport>(
        &self,
        viewport: Option<&mut V>,
        coordinator: &mut ScrollCoordinator,
        selection: &mut Selection,
        now: Instant,
    ) {
        selection.select(self.selected_key.clone());
        coordinator.set_follow(self.follow);
        if let Some(vp) = viewport {
            coordinator.begin_programmatic(self.scroll_offset, ScrollBehavior::Instant, now);
            vp.request_scroll(self.scroll_offset, ScrollBehavior::Instant);
        }
    }
}
