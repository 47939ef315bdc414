//! Narrative-insights request lifecycle.
//!
//! Insights fire at most once per distinct qualifying analysis result:
//! re-evaluating the report view for an unchanged result must not dispatch
//! again. A new result invalidates any request still in progress; its late
//! response is discarded by the same generation-ticket pattern the
//! coordinate sync uses.

use satwatch_analysis_models::{AnalysisResult, Insights};

/// Where the insights flow stands for the current report.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InsightsState {
    /// Nothing requested for the current result.
    #[default]
    Idle,
    /// A generation request is in flight.
    Loading,
    /// Insights arrived for the current result.
    Loaded(Insights),
    /// The request failed; the reason is surfaced to the user.
    Failed(String),
}

/// Proof of which insights dispatch a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightsTicket {
    generation: u64,
}

/// Drives `Idle -> Loading -> {Loaded | Failed}`, once per result.
#[derive(Debug, Default)]
pub struct InsightsRequestController {
    generation: u64,
    state: InsightsState,
    dispatched_for: Option<AnalysisResult>,
}

impl InsightsRequestController {
    /// Creates a controller in the `Idle` state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            state: InsightsState::Idle,
            dispatched_for: None,
        }
    }

    /// Registers a dispatch for `result`, unless one already happened for
    /// this exact result.
    ///
    /// Completeness is the caller's concern (the request payload must be
    /// assembled first); this controller only enforces idempotence per
    /// result and response/request matching.
    pub fn begin(&mut self, result: &AnalysisResult) -> Option<InsightsTicket> {
        if self.dispatched_for.as_ref() == Some(result) {
            return None;
        }

        self.generation += 1;
        self.dispatched_for = Some(result.clone());
        self.state = InsightsState::Loading;
        Some(InsightsTicket {
            generation: self.generation,
        })
    }

    /// Applies a response.
    ///
    /// Returns `false` (discarding the response) when the ticket belongs
    /// to a dispatch that a newer result has invalidated.
    pub fn resolve(&mut self, ticket: InsightsTicket, outcome: Result<Insights, String>) -> bool {
        if ticket.generation != self.generation {
            log::debug!("discarding insights response for a superseded result");
            return false;
        }

        self.state = match outcome {
            Ok(insights) => InsightsState::Loaded(insights),
            Err(reason) => {
                log::warn!("insights generation failed: {reason}");
                InsightsState::Failed(reason)
            }
        };
        true
    }

    /// Discards everything tied to the previous result.
    ///
    /// Called when a new analysis result is installed; any in-flight
    /// response becomes stale and the next [`begin`](Self::begin) for the
    /// new result dispatches fresh.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.dispatched_for = None;
        self.state = InsightsState::Idle;
    }

    /// Clears a failure so the user can explicitly retry the same result.
    ///
    /// No-op unless the current state is `Failed`.
    pub fn reset_failure(&mut self) {
        if matches!(self.state, InsightsState::Failed(_)) {
            self.dispatched_for = None;
            self.state = InsightsState::Idle;
        }
    }

    /// The current insights state.
    #[must_use]
    pub const fn state(&self) -> &InsightsState {
        &self.state
    }
}
