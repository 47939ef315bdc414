#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! HTTP client for the remote change-analysis service.
//!
//! Three JSON endpoints drive the pipeline: `set-coordinates` confirms a
//! drawn polygon, `run-analysis` produces percentage-change results for
//! the stored geometry, and `generate-insights` turns a complete result
//! into narrative text. `get-multi-image` additionally serves per-period
//! preview thumbnails. The [`AnalysisBackend`] trait is the seam the
//! session layer (and its tests) consume; [`BackendClient`] is the real
//! implementation.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use satwatch_analysis_models::{AnalysisResult, Insights, InsightsRequest, PeriodPreview};

/// Per-request timeout. There is no retry; a timed-out call surfaces as
/// [`ClientError::Unreachable`] and the user re-triggers manually.
const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Errors from talking to the analysis service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The service answered with an error body (e.g. area rejected
    /// server-side).
    #[error("backend error: {message}")]
    Api {
        /// The service-reported reason.
        message: String,
    },

    /// Transport failure: connection refused, DNS, timeout.
    #[error("backend unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    /// A success response carried a body we could not decode.
    #[error("invalid backend response: {0}")]
    Json(#[from] serde_json::Error),
}

/// The remote analysis service as consumed by the session layer.
///
/// Exists so orchestration and its tests never depend on a live server.
#[async_trait::async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Submits a polygon's `[lat, lng]` ring for confirmation, returning
    /// the server-computed area in km² on acceptance.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the service declines the geometry or
    /// cannot be reached.
    async fn set_coordinates(&self, coordinates: &[[f64; 2]]) -> Result<f64, ClientError>;

    /// Runs the analysis over the previously confirmed geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if no geometry is stored server-side or
    /// the service cannot be reached.
    async fn run_analysis(&self) -> Result<AnalysisResult, ClientError>;

    /// Requests narrative insights for a complete analysis result.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if generation fails or the service cannot
    /// be reached.
    async fn generate_insights(&self, request: &InsightsRequest) -> Result<Insights, ClientError>;

    /// Fetches multi-temporal preview thumbnails for the confirmed
    /// geometry.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if no geometry is stored server-side or
    /// the service cannot be reached.
    async fn fetch_previews(&self) -> Result<Vec<PeriodPreview>, ClientError>;
}

/// `set-coordinates` request body.
#[derive(Serialize)]
struct SetCoordinatesRequest<'a> {
    coordinates: &'a [[f64; 2]],
}

/// `set-coordinates` success body.
#[derive(Debug, Deserialize)]
struct SetCoordinatesResponse {
    area_km2: f64,
}

/// `generate-insights` success body.
#[derive(Deserialize)]
struct InsightsResponse {
    insights: Insights,
}

/// `get-multi-image` success body.
#[derive(Deserialize)]
struct PreviewsResponse {
    images: Vec<PeriodPreview>,
}

/// Error body shared by all endpoints.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Reqwest-backed implementation of [`AnalysisBackend`].
pub struct BackendClient {
    base_url: String,
    client: reqwest::Client,
}

impl BackendClient {
    /// Creates a client for the service at `base_url` (no trailing slash
    /// required).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

/// Decodes a response body, mapping non-success statuses to
/// [`ClientError::Api`] with the service-reported reason when the error
/// body parses, or a synthesized `HTTP <status>` message when it does not.
fn decode<T: DeserializeOwned>(
    status: reqwest::StatusCode,
    body: &str,
) -> Result<T, ClientError> {
    if !status.is_success() {
        let err: ErrorBody = serde_json::from_str(body).unwrap_or_else(|_| ErrorBody {
            error: format!("HTTP {status}: {body}"),
        });
        return Err(ClientError::Api { message: err.error });
    }

    Ok(serde_json::from_str(body)?)
}

#[async_trait::async_trait]
impl AnalysisBackend for BackendClient {
    async fn set_coordinates(&self, coordinates: &[[f64; 2]]) -> Result<f64, ClientError> {
        log::debug!("submitting {} coordinate pairs", coordinates.len());

        let resp = self
            .client
            .post(self.url("set-coordinates"))
            .json(&SetCoordinatesRequest { coordinates })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed: SetCoordinatesResponse = decode(status, &body)?;

        log::info!("geometry confirmed at {} km²", parsed.area_km2);
        Ok(parsed.area_km2)
    }

    async fn run_analysis(&self) -> Result<AnalysisResult, ClientError> {
        let resp = self.client.get(self.url("run-analysis")).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        decode(status, &body)
    }

    async fn generate_insights(&self, request: &InsightsRequest) -> Result<Insights, ClientError> {
        let resp = self
            .client
            .post(self.url("generate-insights"))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed: InsightsResponse = decode(status, &body)?;
        Ok(parsed.insights)
    }

    async fn fetch_previews(&self) -> Result<Vec<PeriodPreview>, ClientError> {
        let resp = self.client.get(self.url("get-multi-image")).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        let parsed: PreviewsResponse = decode(status, &body)?;
        Ok(parsed.images)
    }
}
