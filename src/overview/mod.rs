//! Multi-size driver: one independent analysis per experiment size.

use crate::dataset::ExperimentDataset;
use crate::log::{LogEvent, Variant, parse_log_file};
use crate::model::RunModel;
use crate::stats::{RunSummary, summarize};
use anyhow::bail;
use serde::Serialize;

/// Per-size chart material plus the run's summary scalars.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub size: u32,
    pub central: u32,
    /// External node ids, 1..=size.
    pub nodes: Vec<u32>,
    pub latency_avg: Vec<f64>,
    pub latency_std: Vec<f64>,
    pub reliability: Vec<f64>,
    pub summary: RunSummary,
}

/// Summary sequences across all sizes that produced results, in the
/// configured size order.
#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub variant: String,
    pub sizes: Vec<u32>,
    pub avg_latency: Vec<f64>,
    pub std_latency: Vec<f64>,
    pub avg_reliability: Vec<f64>,
    pub std_reliability: Vec<f64>,
    #[serde(skip)]
    pub runs: Vec<RunReport>,
}

/// Resolve a log path from the `{n}` pattern for one size.
pub fn log_path(pattern: &str, size: u32) -> String {
    pattern.replace("{n}", &size.to_string())
}

/// Analyze one run from its already-parsed events.
pub fn analyze_run(variant: Variant, size: u32, events: &[LogEvent]) -> anyhow::Result<RunReport> {
    let dataset = ExperimentDataset::build(variant, events)?;
    let model = RunModel::compute(&dataset, size)?;
    let summary = summarize(&model)?;
    Ok(RunReport {
        size,
        central: model.central,
        nodes: (1..=size).collect(),
        latency_avg: model.node_latency_avg(),
        latency_std: model.node_latency_std(),
        reliability: model.reliability,
        summary,
    })
}

/// Run every configured size in order. Runs share no state; a size whose
/// log is missing or unanalyzable is skipped with a warning and the
/// summary sequences shrink accordingly. All sizes failing is an error.
pub fn run_overview(variant: Variant, sizes: &[u32], pattern: &str) -> anyhow::Result<Overview> {
    let mut overview = Overview {
        variant: variant.name().to_string(),
        sizes: Vec::new(),
        avg_latency: Vec::new(),
        std_latency: Vec::new(),
        avg_reliability: Vec::new(),
        std_reliability: Vec::new(),
        runs: Vec::new(),
    };

    for &size in sizes {
        let path = log_path(pattern, size);
        let report = parse_log_file(&path, variant)
            .and_then(|events| analyze_run(variant, size, &events));
        match report {
            Ok(report) => {
                overview.sizes.push(size);
                overview.avg_latency.push(report.summary.avg_latency);
                overview.std_latency.push(report.summary.std_latency);
                overview.avg_reliability.push(report.summary.avg_reliability);
                overview.std_reliability.push(report.summary.std_reliability);
                overview.runs.push(report);
            }
            Err(e) => {
                eprintln!("WARN: skipping size {} ({}): {:#}", size, path, e);
            }
        }
    }

    if overview.runs.is_empty() {
        bail!("no experiment size produced results");
    }
    Ok(overview)
}
