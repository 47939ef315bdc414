//! The single authority deciding whether an analysis request may fire.

use satwatch_analysis_models::AnalysisParams;
use thiserror::Error;

use crate::store::ShapeStore;
use crate::sync::SyncState;

/// Why the analysis trigger is currently blocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlockReason {
    /// No shape has been drawn.
    #[error("no area selected on the map")]
    NoShape,

    /// The current shape has not been confirmed by the backend.
    #[error("selected area is not confirmed by the backend")]
    GeometryNotConfirmed,

    /// No analysis parameter flag is set.
    #[error("no analysis parameters selected")]
    NoParameters,
}

/// Pure decision: may an analysis request be dispatched right now?
///
/// Checked on every relevant state change; the trigger path must consult
/// this and nothing else.
///
/// # Errors
///
/// Returns the first applicable [`BlockReason`], in the order: missing
/// shape, unconfirmed geometry, empty parameter selection.
pub fn can_analyze(
    store: &ShapeStore,
    sync_state: &SyncState,
    params: &AnalysisParams,
) -> Result<(), BlockReason> {
    if store.is_empty() {
        return Err(BlockReason::NoShape);
    }

    if !sync_state.is_confirmed() {
        return Err(BlockReason::GeometryNotConfirmed);
    }

    if !params.any_selected() {
        return Err(BlockReason::NoParameters);
    }

    Ok(())
}
