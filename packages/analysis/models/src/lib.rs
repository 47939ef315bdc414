#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis parameter catalogue, result, and report types.
//!
//! Wire-facing structs mirror the backend's JSON field names exactly
//! (snake_case, optional change fields present only when computed).
//! Report types (`MetricRow`, `TrendBucket`) are derived, never stored.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// The fixed catalogue of analysis parameters a user can select.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum AnalysisParameter {
    /// Forest cover loss.
    Deforestation,
    /// Vegetation health (NDVI-based change).
    Vegetation,
    /// Built-up area growth (NDBI-based change).
    Urbanization,
    /// Surface water extent change.
    WaterBodies,
}

impl AnalysisParameter {
    /// All catalogue entries in display order.
    pub const ALL: &[Self] = &[
        Self::Deforestation,
        Self::Vegetation,
        Self::Urbanization,
        Self::WaterBodies,
    ];
}

/// The time span an analysis covers, as offered by the dashboard.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TimePeriod {
    /// The most recent imagery only.
    #[default]
    Current,
    /// The last 3 years.
    #[serde(rename = "3")]
    #[strum(serialize = "3")]
    LastThree,
    /// The last 5 years.
    #[serde(rename = "5")]
    #[strum(serialize = "5")]
    LastFive,
    /// The last 7 years.
    #[serde(rename = "7")]
    #[strum(serialize = "7")]
    LastSeven,
    /// The last 10 years.
    #[serde(rename = "10")]
    #[strum(serialize = "10")]
    LastTen,
}

impl TimePeriod {
    /// Number of years covered, or `None` for the current snapshot.
    #[must_use]
    pub const fn years(self) -> Option<u32> {
        match self {
            Self::Current => None,
            Self::LastThree => Some(3),
            Self::LastFive => Some(5),
            Self::LastSeven => Some(7),
            Self::LastTen => Some(10),
        }
    }

    /// Human-readable label for report headers.
    #[must_use]
    pub fn label(self) -> String {
        self.years()
            .map_or_else(|| "Current".to_string(), |y| format!("Last {y} Years"))
    }
}

/// The parameter flags and time period selected for an analysis run.
///
/// At least one flag must be set before an analysis request is allowed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisParams {
    /// Analyze forest cover loss.
    pub deforestation: bool,
    /// Analyze vegetation health change.
    pub vegetation: bool,
    /// Analyze built-up area change.
    pub urbanization: bool,
    /// Analyze surface water change.
    pub water_bodies: bool,
    /// Time span to analyze over.
    #[serde(default)]
    pub period: TimePeriod,
}

impl AnalysisParams {
    /// Whether the given catalogue entry is selected.
    #[must_use]
    pub const fn is_selected(&self, parameter: AnalysisParameter) -> bool {
        match parameter {
            AnalysisParameter::Deforestation => self.deforestation,
            AnalysisParameter::Vegetation => self.vegetation,
            AnalysisParameter::Urbanization => self.urbanization,
            AnalysisParameter::WaterBodies => self.water_bodies,
        }
    }

    /// Whether any parameter flag is set.
    #[must_use]
    pub const fn any_selected(&self) -> bool {
        self.deforestation || self.vegetation || self.urbanization || self.water_bodies
    }

    /// The selected catalogue entries in display order.
    #[must_use]
    pub fn selected(&self) -> Vec<AnalysisParameter> {
        AnalysisParameter::ALL
            .iter()
            .copied()
            .filter(|p| self.is_selected(*p))
            .collect()
    }
}

/// Raw output of a completed analysis run, immutable once received.
///
/// Optional fields are present only when the backend computed them for
/// this run; absent fields deserialize to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Confirmed selection area in km².
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_km2: Option<f64>,
    /// Years between the compared imagery windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_years: Option<u32>,
    /// Vegetation change in percent (signed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vegetation_change_percent: Option<f64>,
    /// Built-up area change in percent (signed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urban_change_percent: Option<f64>,
    /// Surface water change in percent (signed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_change_percent: Option<f64>,
    /// Backend status note (e.g. "completed"); informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Direction a metric moved over the analysis period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    /// Value above zero.
    Increasing,
    /// Value below zero.
    Decreasing,
    /// Value exactly zero.
    Stable,
}

impl Trend {
    /// Classifies a signed percentage change.
    #[must_use]
    pub fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Increasing
        } else if value < 0.0 {
            Self::Decreasing
        } else {
            Self::Stable
        }
    }
}

/// One chart-ready row: a metric name, its signed change, and its trend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricRow {
    /// Display name ("Vegetation", "Urban", "Water").
    pub name: String,
    /// Signed percentage change.
    pub value: f64,
    /// Trend classification of `value`.
    pub trend: Trend,
}

/// Count of metric rows sharing one trend direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendBucket {
    /// The shared direction.
    pub trend: Trend,
    /// Number of rows in this bucket (always > 0 in reportable output).
    pub count: usize,
}

/// Narrative insights generated for one analysis result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    /// One-paragraph summary of the observed changes.
    pub summary: String,
    /// Ordered key findings.
    #[serde(default)]
    pub key_findings: Vec<String>,
    /// Ordered recommendations.
    #[serde(default)]
    pub recommendations: Vec<String>,
}

/// Request body for the narrative-insights endpoint.
///
/// All five fields are required by the insights service; a partial result
/// must never be sent (assembled only via the completeness check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightsRequest {
    /// Confirmed selection area in km².
    pub area_km2: f64,
    /// Years between the compared imagery windows.
    pub period_years: u32,
    /// Vegetation change in percent.
    pub vegetation_change_percent: f64,
    /// Built-up area change in percent.
    pub urban_change_percent: f64,
    /// Surface water change in percent.
    pub water_change_percent: f64,
}

/// One multi-temporal preview thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPreview {
    /// How many years back the imagery window starts.
    pub years_ago: u32,
    /// Rendered thumbnail URL.
    pub preview: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_params_selected_by_default() {
        let params = AnalysisParams::default();
        assert!(!params.any_selected());
        assert!(params.selected().is_empty());
    }

    #[test]
    fn selected_preserves_catalogue_order() {
        let params = AnalysisParams {
            water_bodies: true,
            vegetation: true,
            ..AnalysisParams::default()
        };
        assert_eq!(
            params.selected(),
            vec![AnalysisParameter::Vegetation, AnalysisParameter::WaterBodies]
        );
    }

    #[test]
    fn classifies_trends() {
        assert_eq!(Trend::of(12.0), Trend::Increasing);
        assert_eq!(Trend::of(-5.0), Trend::Decreasing);
        assert_eq!(Trend::of(0.0), Trend::Stable);
    }

    #[test]
    fn result_deserializes_with_missing_fields() {
        let json = r#"{"vegetation_change_percent": -5.0, "status": "completed"}"#;
        let result: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.vegetation_change_percent, Some(-5.0));
        assert_eq!(result.water_change_percent, None);
        assert_eq!(result.area_km2, None);
    }

    #[test]
    fn insights_default_empty_lists() {
        let json = r#"{"summary": "Minimal change observed."}"#;
        let insights: Insights = serde_json::from_str(json).unwrap();
        assert!(insights.key_findings.is_empty());
        assert!(insights.recommendations.is_empty());
    }

    #[test]
    fn period_labels() {
        assert_eq!(TimePeriod::Current.label(), "Current");
        assert_eq!(TimePeriod::LastFive.label(), "Last 5 Years");
        assert_eq!(TimePeriod::LastTen.years(), Some(10));
    }
}
