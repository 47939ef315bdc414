//! Coordinate-confirmation state machine.
//!
//! One sync state exists at a time, tied to the current shape. Every new
//! draw pre-empts whatever was in flight: [`CoordinateSyncController::begin`]
//! bumps a monotonic generation counter and hands out a ticket, and
//! [`CoordinateSyncController::resolve`] applies a response only when its
//! ticket still matches. Stale confirmations never win.

/// Rejection reason used when the backend cannot be reached at all.
pub const UNREACHABLE: &str = "unreachable";

/// Where the current shape stands with the backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SyncState {
    /// No confirmation attempted yet.
    #[default]
    Idle,
    /// A confirmation request is in flight for the current shape.
    Pending,
    /// The backend accepted the geometry.
    Confirmed {
        /// Server-computed area in km².
        area_km2: f64,
    },
    /// The backend declined the geometry, or it could not be reached.
    Rejected {
        /// The service-reported reason, or [`UNREACHABLE`].
        reason: String,
    },
}

impl SyncState {
    /// Whether the geometry has been accepted by the backend.
    #[must_use]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed { .. })
    }
}

/// Proof of which confirmation attempt a response belongs to.
///
/// Issued by [`CoordinateSyncController::begin`] and compared at
/// resolution time; a ticket from a superseded draw no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncTicket {
    generation: u64,
}

/// Drives `Idle -> Pending -> {Confirmed | Rejected}`, with any state
/// returning to `Pending` on a new draw.
#[derive(Debug, Default)]
pub struct CoordinateSyncController {
    generation: u64,
    state: SyncState,
}

impl CoordinateSyncController {
    /// Creates a controller in the `Idle` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            state: SyncState::Idle,
        }
    }

    /// Registers a new confirmation attempt for a freshly drawn shape.
    ///
    /// Moves to `Pending` and returns the ticket the eventual response
    /// must present. Any earlier ticket is invalidated immediately.
    pub fn begin(&mut self) -> SyncTicket {
        self.generation += 1;
        self.state = SyncState::Pending;
        SyncTicket {
            generation: self.generation,
        }
    }

    /// Applies a confirmation response.
    ///
    /// Returns `false` (and leaves the state untouched) when the ticket
    /// belongs to a superseded draw.
    pub fn resolve(&mut self, ticket: SyncTicket, outcome: Result<f64, String>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "discarding stale sync response (ticket generation {}, current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }

        self.state = match outcome {
            Ok(area_km2) => SyncState::Confirmed { area_km2 },
            Err(reason) => {
                log::warn!("geometry confirmation rejected: {reason}");
                SyncState::Rejected { reason }
            }
        };
        true
    }

    /// The current sync state.
    #[must_use]
    pub const fn state(&self) -> &SyncState {
        &self.state
    }
}
