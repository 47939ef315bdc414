#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Report assembly over a raw analysis result.
//!
//! Pure transformations only: a flat [`AnalysisResult`] plus the selected
//! [`AnalysisParams`] become chart-ready metric rows, a trend-composition
//! summary, and (when the result is complete) the narrative-insights
//! request payload. Nothing here performs I/O or mutates its inputs.

use serde::{Deserialize, Serialize};

use satwatch_analysis_models::{
    AnalysisParameter, AnalysisParams, AnalysisResult, InsightsRequest, MetricRow, Trend,
    TrendBucket,
};

/// Fixed display order for trend-composition buckets.
const BUCKET_ORDER: &[Trend] = &[Trend::Increasing, Trend::Decreasing, Trend::Stable];

/// The three result fields that can back a metric row, with the parameter
/// flag that must be set for the row to appear and its display name.
///
/// Deforestation has no dedicated result field; selecting it affects the
/// request only, never the derived rows.
fn row_sources(result: &AnalysisResult) -> [(AnalysisParameter, &'static str, Option<f64>); 3] {
    [
        (
            AnalysisParameter::Vegetation,
            "Vegetation",
            result.vegetation_change_percent,
        ),
        (
            AnalysisParameter::Urbanization,
            "Urban",
            result.urban_change_percent,
        ),
        (
            AnalysisParameter::WaterBodies,
            "Water",
            result.water_change_percent,
        ),
    ]
}

/// Derives one metric row per parameter that was both selected and
/// actually computed by the backend.
#[must_use]
pub fn metric_rows(result: &AnalysisResult, params: &AnalysisParams) -> Vec<MetricRow> {
    row_sources(result)
        .into_iter()
        .filter(|(parameter, _, _)| params.is_selected(*parameter))
        .filter_map(|(_, name, value)| {
            value.map(|value| MetricRow {
                name: name.to_string(),
                value,
                trend: Trend::of(value),
            })
        })
        .collect()
}

/// Counts rows per trend direction, in the fixed order Increasing,
/// Decreasing, Stable, omitting empty buckets.
#[must_use]
pub fn trend_composition(rows: &[MetricRow]) -> Vec<TrendBucket> {
    BUCKET_ORDER
        .iter()
        .map(|&trend| TrendBucket {
            trend,
            count: rows.iter().filter(|r| r.trend == trend).count(),
        })
        .filter(|bucket| bucket.count > 0)
        .collect()
}

/// Whether the result carries every field the insights service requires.
///
/// This is independent of which parameters the user selected: the insights
/// service has its own input contract, and a partial result must not be
/// silently sent.
#[must_use]
pub const fn can_request_insights(result: &AnalysisResult) -> bool {
    result.area_km2.is_some()
        && result.period_years.is_some()
        && result.vegetation_change_percent.is_some()
        && result.urban_change_percent.is_some()
        && result.water_change_percent.is_some()
}

/// Builds the exact insights request body, or `None` when the result is
/// incomplete (in which case no request may be made).
#[must_use]
pub fn insights_request(result: &AnalysisResult) -> Option<InsightsRequest> {
    Some(InsightsRequest {
        area_km2: result.area_km2?,
        period_years: result.period_years?,
        vegetation_change_percent: result.vegetation_change_percent?,
        urban_change_percent: result.urban_change_percent?,
        water_change_percent: result.water_change_percent?,
    })
}

/// Everything the report view renders, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Confirmed selection area in km², when the backend reported it.
    pub area_km2: Option<f64>,
    /// Years between the compared imagery windows, when reported.
    pub period_years: Option<u32>,
    /// Per-parameter rows for the bar chart.
    pub metric_rows: Vec<MetricRow>,
    /// Trend buckets for the composition chart; empty buckets omitted.
    pub trend_composition: Vec<TrendBucket>,
}

/// Assembles the full report for one result and parameter selection.
#[must_use]
pub fn assemble(result: &AnalysisResult, params: &AnalysisParams) -> Report {
    let rows = metric_rows(result, params);
    let composition = trend_composition(&rows);

    Report {
        area_km2: result.area_km2,
        period_years: result.period_years,
        metric_rows: rows,
        trend_composition: composition,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> AnalysisResult {
        AnalysisResult {
            area_km2: Some(10.0),
            period_years: Some(5),
            vegetation_change_percent: Some(-5.0),
            urban_change_percent: Some(12.0),
            water_change_percent: Some(0.0),
            status: Some("completed".to_string()),
        }
    }

    #[test]
    fn rows_follow_selection_and_presence() {
        let result = AnalysisResult {
            vegetation_change_percent: Some(-5.0),
            urban_change_percent: Some(12.0),
            ..full_result()
        };
        let params = AnalysisParams {
            vegetation: true,
            urbanization: true,
            water_bodies: false,
            ..AnalysisParams::default()
        };

        let rows = metric_rows(&result, &params);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Vegetation");
        assert!((rows[0].value - -5.0).abs() < f64::EPSILON);
        assert_eq!(rows[0].trend, Trend::Decreasing);
        assert_eq!(rows[1].name, "Urban");
        assert_eq!(rows[1].trend, Trend::Increasing);
    }

    #[test]
    fn selected_but_missing_field_emits_no_row() {
        let result = AnalysisResult {
            water_change_percent: None,
            ..full_result()
        };
        let params = AnalysisParams {
            water_bodies: true,
            ..AnalysisParams::default()
        };
        assert!(metric_rows(&result, &params).is_empty());
    }

    #[test]
    fn deforestation_selection_never_emits_a_row() {
        let params = AnalysisParams {
            deforestation: true,
            ..AnalysisParams::default()
        };
        assert!(metric_rows(&full_result(), &params).is_empty());
    }

    #[test]
    fn composition_orders_buckets_and_omits_empty() {
        let params = AnalysisParams {
            vegetation: true,
            urbanization: true,
            ..AnalysisParams::default()
        };
        let rows = metric_rows(&full_result(), &params);
        let buckets = trend_composition(&rows);

        assert_eq!(
            buckets,
            vec![
                TrendBucket {
                    trend: Trend::Increasing,
                    count: 1
                },
                TrendBucket {
                    trend: Trend::Decreasing,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn composition_includes_stable_when_present() {
        let params = AnalysisParams {
            vegetation: true,
            urbanization: true,
            water_bodies: true,
            ..AnalysisParams::default()
        };
        let rows = metric_rows(&full_result(), &params);
        let buckets = trend_composition(&rows);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[2].trend, Trend::Stable);
        assert_eq!(buckets[2].count, 1);
    }

    #[test]
    fn insights_require_every_field() {
        assert!(can_request_insights(&full_result()));

        let missing_water = AnalysisResult {
            water_change_percent: None,
            ..full_result()
        };
        // Missing field blocks insights even though waterBodies was not
        // selected for display.
        assert!(!can_request_insights(&missing_water));
        assert!(insights_request(&missing_water).is_none());
    }

    #[test]
    fn insights_request_copies_all_fields() {
        let request = insights_request(&full_result()).unwrap();
        assert!((request.area_km2 - 10.0).abs() < f64::EPSILON);
        assert_eq!(request.period_years, 5);
        assert!((request.urban_change_percent - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn assemble_builds_rows_and_composition_together() {
        let params = AnalysisParams {
            vegetation: true,
            urbanization: true,
            ..AnalysisParams::default()
        };
        let report = assemble(&full_result(), &params);
        assert_eq!(report.area_km2, Some(10.0));
        assert_eq!(report.period_years, Some(5));
        assert_eq!(report.metric_rows.len(), 2);
        assert_eq!(report.trend_composition.len(), 2);
    }
}
