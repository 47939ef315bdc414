#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Drawing-session state and analysis orchestration.
//!
//! Everything downstream of the map happens here: confirmed shapes are
//! stored, their coordinates synchronized with the backend (with stale
//! responses discarded by generation ticket), the analysis trigger is
//! gated, and narrative insights are requested at most once per result.
//! The whole module tree is single-threaded and event-driven; only the
//! draw handler and the async response handlers mutate state.

pub mod dispatch;
pub mod gate;
pub mod hub;
pub mod insights;
pub mod session;
pub mod store;
pub mod sync;

pub use dispatch::AnalysisRequestController;
pub use gate::{BlockReason, can_analyze};
pub use hub::{DrawHub, Subscription};
pub use insights::{InsightsRequestController, InsightsState, InsightsTicket};
pub use session::{AnalysisError, Session};
pub use store::ShapeStore;
pub use sync::{CoordinateSyncController, SyncState, SyncTicket, UNREACHABLE};
