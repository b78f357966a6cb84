#![forbid(unsafe_code)]

//! Scroll coordination: the viewport seam, programmatic-scroll settle
//! tracking, and the auto-follow (stick-to-bottom) state machine.
//!
//! The engine never reads the host's scroll position behind its back; the
//! host feeds every scroll event through [`ScrollCoordinator::on_scroll`],
//! which attributes it to either the engine (a programmatic scroll still
//! settling) or the user. Only user-originated events drive auto-follow.
//!
//! Settling is an explicit state with a generation counter and a deadline,
//! not a shared flag: a new programmatic scroll supersedes any in-flight
//! settle window deterministically (last-call-wins, no queue).

use std::time::{Duration, Instant};

/// Default distance-from-bottom threshold for auto-follow, in pixels.
pub const DEFAULT_FOLLOW_THRESHOLD: u32 = 50;

/// Settle window for an instant scroll. Instant scrolls normally settle on
/// the first event that lands on the target offset; the deadline only covers
/// hosts that quantize offsets and never report the exact target.
const INSTANT_SETTLE_WINDOW: Duration = Duration::from_millis(100);

/// Settle window for a smooth (animated) scroll.
const SMOOTH_SETTLE_WINDOW: Duration = Duration::from_millis(500);

/// How a programmatic scroll should move the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    /// Jump directly to the target offset.
    #[default]
    Instant,
    /// Animate to the target offset; intermediate scroll events arrive
    /// until the animation lands.
    Smooth,
}

/// The host's scroll container, as seen by the engine.
///
/// Offsets and extents are pixels. `None` in the engine APIs that take an
/// `Option<&impl ScrollViewport>` represents a container that has not
/// mounted yet; the engine then computes an empty window and retries on the
/// next pass.
pub trait ScrollViewport {
    /// Current scroll offset from the top of the content, in pixels.
    fn offset(&self) -> u64;

    /// Visible extent of the viewport, in pixels.
    fn extent(&self) -> u32;

    /// Ask the host to scroll to `offset`. The engine marks the scroll as
    /// programmatic before calling this, so the resulting events are not
    /// mistaken for user input.
    fn request_scroll(&mut self, offset: u64, behavior: ScrollBehavior);
}

/// Auto-follow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FollowState {
    /// Pinned to the newest content; dataset growth keeps the view at the
    /// bottom.
    Following,
    /// User has scrolled away; the view stays where the user put it.
    #[default]
    Detached,
}

/// Attribution of one scroll event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSource {
    /// Event caused by the user (wheel, drag, touch).
    User,
    /// Event caused by an engine-issued scroll still inside its settle
    /// window.
    Programmatic,
}

/// Result of feeding one scroll event through the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollOutcome {
    /// Who the event was attributed to.
    pub source: ScrollSource,
    /// `Some(enabled)` when the auto-follow state changed on this event.
    pub follow_change: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettlePhase {
    Idle,
    Settling {
        generation: u64,
        target: u64,
        deadline: Instant,
    },
}

/// Distinguishes engine-initiated from user-initiated scrolling and runs the
/// auto-follow state machine.
#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    phase: SettlePhase,
    generation: u64,
    follow: FollowState,
    threshold: u32,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollCoordinator {
    /// Create a coordinator in the `Detached` state with the default
    /// follow threshold.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: SettlePhase::Idle,
            generation: 0,
            follow: FollowState::Detached,
            threshold: DEFAULT_FOLLOW_THRESHOLD,
        }
    }

    /// Start following immediately (log-viewer style lists).
    #[must_use]
    pub fn with_follow(mut self, follow: bool) -> Self {
        self.follow = if follow {
            FollowState::Following
        } else {
            FollowState::Detached
        };
        self
    }

    /// Override the distance-from-bottom threshold in pixels.
    #[must_use]
    pub fn with_threshold(mut self, px: u32) -> Self {
        self.threshold = px;
        self
    }

    /// Current auto-follow state.
    #[must_use]
    pub fn follow_state(&self) -> FollowState {
        self.follow
    }

    /// Whether auto-follow is engaged.
    #[must_use]
    pub fn is_following(&self) -> bool {
        self.follow == FollowState::Following
    }

    /// Whether a programmatic scroll is still inside its settle window.
    #[must_use]
    pub fn is_settling(&self) -> bool {
        !matches!(self.phase, SettlePhase::Idle)
    }

    /// Force the follow state (used by persistence restore and by hosts
    /// with an explicit "follow" toggle).
    pub fn set_follow(&mut self, follow: bool) {
        self.follow = if follow {
            FollowState::Following
        } else {
            FollowState::Detached
        };
    }

    /// Mark the start of a programmatic scroll toward `target`.
    ///
    /// Supersedes any settle window still in flight; the returned generation
    /// identifies this scroll. Events arriving before the target is reached
    /// (or the window expires) are attributed to the engine.
    pub fn begin_programmatic(
        &mut self,
        target: u64,
        behavior: ScrollBehavior,
        now: Instant,
    ) -> u64 {
        self.generation += 1;
        let window = match behavior {
            ScrollBehavior::Instant => INSTANT_SETTLE_WINDOW,
            ScrollBehavior::Smooth => SMOOTH_SETTLE_WINDOW,
        };
        self.phase = SettlePhase::Settling {
            generation: self.generation,
            target,
            deadline: now + window,
        };
        #[cfg(feature = "tracing")]
        tracing::trace!(offset = target, generation = self.generation, "programmatic scroll");
        self.generation
    }

    /// Feed one scroll event from the host's passive scroll listener.
    ///
    /// `offset` and `extent` describe the viewport at event time, `total`
    /// the full scrollable extent ([`crate::Virtualizer::total_size`]).
    pub fn on_scroll(&mut self, offset: u64, extent: u32, total: u64, now: Instant) -> ScrollOutcome {
        if let SettlePhase::Settling { target, deadline, .. } = self.phase {
            if now < deadline {
                if offset == target {
                    self.phase = SettlePhase::Idle;
                }
                return ScrollOutcome {
                    source: ScrollSource::Programmatic,
                    follow_change: None,
                };
            }
            // Window expired without landing; everything from here on is
            // user input again.
            self.phase = SettlePhase::Idle;
        }

        let distance = total.saturating_sub(offset.saturating_add(u64::from(extent)));
        let within = distance < u64::from(self.threshold);
        let follow_change = match (self.follow, within) {
            (FollowState::Detached, true) => {
                self.follow = FollowState::Following;
                Some(true)
            }
            (FollowState::Following, false) => {
                self.follow = FollowState::Detached;
                Some(false)
            }
            _ => None,
        };
        #[cfg(feature = "tracing")]
        if let Some(enabled) = follow_change {
            tracing::debug!(enabled, distance, "auto-follow change");
        }
        ScrollOutcome {
            source: ScrollSource::User,
            follow_change,
        }
    }
}
