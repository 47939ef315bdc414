#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal demo for the area-analysis pipeline.
//!
//! Plays the role of the map UI: feeds a polygon through validation and
//! coordinate confirmation, gates and runs the analysis, prints the
//! assembled report, then requests narrative insights and the per-period
//! preview thumbnails. Needs a running backend (`--backend-url`, or
//! `SATWATCH_BACKEND_URL`).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use satwatch_analysis_models::{AnalysisParams, TimePeriod};
use satwatch_client::BackendClient;
use satwatch_geometry::{DrawEvent, LatLng};
use satwatch_session::{DrawHub, InsightsState, Session, SyncState};

const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Run one drawing-and-analysis session from the terminal.
#[derive(Parser)]
#[command(name = "satwatch", about = "Area change-analysis demo client")]
struct Args {
    /// Backend base URL. Falls back to $SATWATCH_BACKEND_URL, then
    /// localhost:5000.
    #[arg(long)]
    backend_url: Option<String>,

    /// JSON file containing the polygon as `[[lat, lng], ...]`. A small
    /// built-in demo polygon is used when omitted.
    #[arg(long)]
    polygon: Option<PathBuf>,

    /// Map zoom level the polygon was "drawn" at.
    #[arg(long, default_value_t = 14)]
    zoom: u8,

    /// Analyze vegetation health change.
    #[arg(long)]
    vegetation: bool,

    /// Analyze built-up area change.
    #[arg(long)]
    urbanization: bool,

    /// Analyze surface water change.
    #[arg(long)]
    water_bodies: bool,

    /// Analyze forest cover loss.
    #[arg(long)]
    deforestation: bool,

    /// Time period to analyze over: current, 3, 5, 7, or 10.
    #[arg(long, default_value = "current")]
    period: String,

    /// Also fetch multi-temporal preview thumbnails.
    #[arg(long)]
    previews: bool,
}

/// ~1 km² block in central Bengaluru, comfortably inside the area limit.
fn demo_polygon() -> Vec<LatLng> {
    vec![
        LatLng::new(12.97, 77.59),
        LatLng::new(12.97, 77.6),
        LatLng::new(12.98, 77.6),
        LatLng::new(12.98, 77.59),
    ]
}

fn load_polygon(path: &Path) -> Result<Vec<LatLng>, Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(path)?;
    let pairs: Vec<[f64; 2]> = serde_json::from_str(&raw)?;
    Ok(pairs
        .into_iter()
        .map(|[lat, lng]| LatLng::new(lat, lng))
        .collect())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let args = Args::parse();

    let backend_url = args
        .backend_url
        .or_else(|| std::env::var("SATWATCH_BACKEND_URL").ok())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string());

    let points = match &args.polygon {
        Some(path) => load_polygon(path)?,
        None => demo_polygon(),
    };

    let period: TimePeriod = args.period.parse().map_err(|_| {
        format!(
            "invalid period {:?}: expected current, 3, 5, 7, or 10",
            args.period
        )
    })?;

    let mut session = Session::new(BackendClient::new(&backend_url)?);
    session.set_params(AnalysisParams {
        deforestation: args.deforestation,
        vegetation: args.vegetation,
        urbanization: args.urbanization,
        water_bodies: args.water_bodies,
        period,
    });

    log::info!("using backend at {backend_url}");

    // ── Draw + confirm ───────────────────────────────────────────────
    // The hub stands in for the map's drawing tool: the "drawn" polygon
    // is emitted as an event and reaches the session through a live
    // subscription, exactly as a UI-driven draw would.
    let hub = DrawHub::new();
    let queue: Rc<RefCell<VecDeque<DrawEvent>>> = Rc::default();
    let sink = Rc::clone(&queue);
    let subscription = hub.subscribe(move |event| {
        sink.borrow_mut().push_back(event.clone());
    });

    hub.emit(&DrawEvent {
        points,
        current_zoom: args.zoom,
    });
    drop(subscription);

    let event = queue
        .borrow_mut()
        .pop_front()
        .ok_or("draw event was not delivered")?;
    match session.handle_draw(&event).await {
        Ok(SyncState::Confirmed { area_km2 }) => {
            println!("Geometry confirmed: {area_km2} km²");
        }
        Ok(SyncState::Rejected { reason }) => {
            println!("Geometry rejected by backend: {reason}");
            return Ok(());
        }
        Ok(state) => {
            println!("Unexpected sync state: {state:?}");
            return Ok(());
        }
        Err(err) => {
            println!("Polygon rejected locally: {err}");
            return Ok(());
        }
    }

    // ── Gate + analyze ───────────────────────────────────────────────
    if let Err(reason) = session.can_analyze() {
        println!("Analysis blocked: {reason}");
        return Ok(());
    }

    if let Err(err) = session.run_analysis().await {
        println!("Analysis failed: {err}");
        return Ok(());
    }

    let report = session.report().ok_or("analysis produced no report")?;
    println!();
    println!("Analysis report ({})", session.params().period.label());
    if let Some(area) = report.area_km2 {
        println!("  Area: {area} km²");
    }
    if let Some(years) = report.period_years {
        println!("  Compared over: {years} years");
    }
    for row in &report.metric_rows {
        println!("  {:<12} {:+.2}% ({})", row.name, row.value, row.trend);
    }
    for bucket in &report.trend_composition {
        println!("  {}: {}", bucket.trend, bucket.count);
    }

    // ── Insights ─────────────────────────────────────────────────────
    match session.request_insights().await {
        InsightsState::Loaded(insights) => {
            println!();
            println!("Insights: {}", insights.summary);
            for finding in &insights.key_findings {
                println!("  - {finding}");
            }
            if !insights.recommendations.is_empty() {
                println!("  Recommendations:");
                for recommendation in &insights.recommendations {
                    println!("  - {recommendation}");
                }
            }
        }
        InsightsState::Failed(reason) => {
            println!("Insights unavailable: {reason}");
        }
        InsightsState::Idle => {
            println!("Insights skipped: result incomplete");
        }
        InsightsState::Loading => {}
    }

    // ── Previews ─────────────────────────────────────────────────────
    if args.previews {
        match session.fetch_previews().await {
            Ok(previews) => {
                println!();
                for preview in previews {
                    println!("  {:>2} years ago: {}", preview.years_ago, preview.preview);
                }
            }
            Err(err) => println!("Previews unavailable: {err}"),
        }
    }

    Ok(())
}
