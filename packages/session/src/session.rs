//! Orchestrates the full pipeline over an [`AnalysisBackend`].
//!
//! Owns the shape store, the sync and request controllers, and the
//! parameter selection, and drives them in the order the pipeline
//! demands: draw -> validate -> store -> sync -> gate -> analyze ->
//! assemble -> insights. All mutation goes through this type.

use satwatch_analysis::{Report, assemble, insights_request};
use satwatch_analysis_models::{AnalysisParams, AnalysisResult, PeriodPreview};
use satwatch_client::{AnalysisBackend, ClientError};
use satwatch_geometry::{DrawEvent, Shape, ValidationError, validate};
use thiserror::Error;

use crate::dispatch::AnalysisRequestController;
use crate::gate::{BlockReason, can_analyze};
use crate::insights::{InsightsRequestController, InsightsState};
use crate::store::ShapeStore;
use crate::sync::{CoordinateSyncController, SyncState, UNREACHABLE};

/// Why an analysis trigger produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// The gate is closed; nothing was dispatched.
    #[error(transparent)]
    Blocked(#[from] BlockReason),

    /// A request is already outstanding; this trigger was dropped.
    #[error("an analysis request is already in flight")]
    AlreadyRunning,

    /// The dispatched request failed; state is unchanged.
    #[error("analysis failed: {reason}")]
    Failed {
        /// Service-reported reason, or [`UNREACHABLE`].
        reason: String,
    },
}

/// Collapses a client error to the reason string the state machines
/// carry: the service's own message when it answered, the decode error's
/// message when it answered garbage, and [`UNREACHABLE`] only for
/// transport failures.
fn failure_reason(err: &ClientError) -> String {
    match err {
        ClientError::Api { message } => message.clone(),
        ClientError::Json(err) => err.to_string(),
        ClientError::Unreachable(_) => UNREACHABLE.to_string(),
    }
}

/// One user's drawing-and-analysis session.
pub struct Session<B: AnalysisBackend> {
    backend: B,
    store: ShapeStore,
    sync: CoordinateSyncController,
    params: AnalysisParams,
    dispatch: AnalysisRequestController,
    insights: InsightsRequestController,
    result: Option<AnalysisResult>,
}

impl<B: AnalysisBackend> Session<B> {
    /// Creates an empty session against `backend`.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            store: ShapeStore::new(),
            sync: CoordinateSyncController::new(),
            params: AnalysisParams::default(),
            dispatch: AnalysisRequestController::new(),
            insights: InsightsRequestController::new(),
            result: None,
        }
    }

    /// Handles one completed-polygon event from the drawing collaborator.
    ///
    /// Validation happens first and rejects without touching any state.
    /// On acceptance the shape is stored, the sync state is reset to
    /// `Pending` in the same step, and the coordinates go out for
    /// confirmation; the response is applied through the ticket issued
    /// here, so a draw that supersedes this one wins automatically.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] when the polygon violates a local
    /// drawing constraint.
    pub async fn handle_draw(&mut self, event: &DrawEvent) -> Result<&SyncState, ValidationError> {
        let shape = validate(&event.points, event.current_zoom)?;
        log::info!(
            "accepted polygon with {} points, {} km²",
            shape.points().len(),
            shape.area_sq_km()
        );

        let coordinates = shape.coordinate_pairs();
        self.store.append(shape);
        let ticket = self.sync.begin();

        let outcome = self
            .backend
            .set_coordinates(&coordinates)
            .await
            .map_err(|err| failure_reason(&err));
        self.sync.resolve(ticket, outcome);

        Ok(self.sync.state())
    }

    /// The current parameter selection.
    #[must_use]
    pub const fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Replaces the parameter selection.
    pub fn set_params(&mut self, params: AnalysisParams) {
        self.params = params;
    }

    /// Whether an analysis request may be dispatched right now.
    ///
    /// # Errors
    ///
    /// Returns the applicable [`BlockReason`].
    pub fn can_analyze(&self) -> Result<(), BlockReason> {
        can_analyze(&self.store, self.sync.state(), &self.params)
    }

    /// Dispatches the analysis request, if the gate allows it.
    ///
    /// Re-checks the gate defensively, suppresses concurrent triggers,
    /// and on success installs the immutable result (invalidating any
    /// insights tied to a previous one). On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when blocked, already running, or when
    /// the request itself fails.
    pub async fn run_analysis(&mut self) -> Result<&AnalysisResult, AnalysisError> {
        self.can_analyze()?;

        if !self.dispatch.try_begin() {
            return Err(AnalysisError::AlreadyRunning);
        }

        let outcome = self.backend.run_analysis().await;
        self.dispatch.finish();

        match outcome {
            Ok(result) => {
                log::info!("analysis completed: {result:?}");
                self.insights.invalidate();
                Ok(&*self.result.insert(result))
            }
            Err(err) => Err(AnalysisError::Failed {
                reason: failure_reason(&err),
            }),
        }
    }

    /// The latest analysis result, if any.
    #[must_use]
    pub const fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    /// The chart-ready report for the latest result, if any.
    #[must_use]
    pub fn report(&self) -> Option<Report> {
        self.result.as_ref().map(|r| assemble(r, &self.params))
    }

    /// Requests narrative insights for the latest result.
    ///
    /// Silently does nothing when the result lacks a required field or
    /// when insights were already dispatched for this exact result; both
    /// leave the current state visible to the caller.
    pub async fn request_insights(&mut self) -> &InsightsState {
        let Some(result) = self.result.clone() else {
            return self.insights.state();
        };

        // Incomplete results are never sent; not an error surface.
        let Some(request) = insights_request(&result) else {
            log::debug!("insights not requested: result is missing required fields");
            return self.insights.state();
        };

        let Some(ticket) = self.insights.begin(&result) else {
            return self.insights.state();
        };

        let outcome = self
            .backend
            .generate_insights(&request)
            .await
            .map_err(|err| failure_reason(&err));
        self.insights.resolve(ticket, outcome);

        self.insights.state()
    }

    /// The current insights state.
    #[must_use]
    pub const fn insights(&self) -> &InsightsState {
        self.insights.state()
    }

    /// Clears an insights failure so the next
    /// [`request_insights`](Self::request_insights) retries.
    pub fn clear_insights_failure(&mut self) {
        self.insights.reset_failure();
    }

    /// The shapes drawn this session.
    #[must_use]
    pub const fn store(&self) -> &ShapeStore {
        &self.store
    }

    /// The active shape selection.
    #[must_use]
    pub fn current_shape(&self) -> Option<&Shape> {
        self.store.current()
    }

    /// The sync state of the active shape.
    #[must_use]
    pub const fn sync_state(&self) -> &SyncState {
        self.sync.state()
    }

    /// Fetches multi-temporal preview thumbnails for the confirmed
    /// geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if no geometry is stored server-side or
    /// the service cannot be reached.
    pub async fn fetch_previews(&self) -> Result<Vec<PeriodPreview>, ClientError> {
        self.backend.fetch_previews().await
    }
}
