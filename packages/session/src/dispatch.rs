//! Single-outstanding-call suppression for analysis requests.
//!
//! At most one analysis call may be in flight at a time. A second trigger
//! while one is pending is a no-op, not a queued retry.

/// Tracks whether an analysis call is currently outstanding.
#[derive(Debug, Default)]
pub struct AnalysisRequestController {
    in_flight: bool,
}

impl AnalysisRequestController {
    /// Creates a controller with no call outstanding.
    #[must_use]
    pub const fn new() -> Self {
        Self { in_flight: false }
    }

    /// Attempts to claim the single in-flight slot.
    ///
    /// Returns `false` when a call is already outstanding, in which case
    /// the trigger must be dropped.
    pub fn try_begin(&mut self) -> bool {
        if self.in_flight {
            log::debug!("analysis trigger ignored: a request is already in flight");
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Releases the slot once the call has completed, successfully or not.
    pub fn finish(&mut self) {
        self.in_flight = false;
    }

    /// Whether a call is currently outstanding.
    #[must_use]
    pub const fn in_flight(&self) -> bool {
        self.in_flight
    }
}
