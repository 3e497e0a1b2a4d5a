//! Weighted aggregation of one run's model into summary scalars.

use crate::model::RunModel;
use anyhow::bail;
use serde::Serialize;

/// The four scalars one experiment run reduces to.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RunSummary {
    pub avg_latency: f64,
    pub std_latency: f64,
    pub avg_reliability: f64,
    pub std_reliability: f64,
}

/// Population-weighted mean and standard deviation (divide by total
/// weight, not total weight minus one).
pub fn weighted_mean_std(values: &[f64], weights: &[f64]) -> anyhow::Result<(f64, f64)> {
    debug_assert_eq!(values.len(), weights.len());
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        bail!("total weight is zero; nothing to aggregate");
    }
    let mean = values
        .iter()
        .zip(weights)
        .map(|(v, w)| v * w)
        .sum::<f64>()
        / total;
    let var = values
        .iter()
        .zip(weights)
        .map(|(v, w)| w * (v - mean) * (v - mean))
        .sum::<f64>()
        / total;
    Ok((mean, var.sqrt()))
}

/// Reduce a run model to its four summary scalars. The central node is
/// excluded by the model's weight vectors, never by filtering here.
pub fn summarize(model: &RunModel) -> anyhow::Result<RunSummary> {
    // Flatten the matrix with its per-row weight repeated per cell.
    let n_cells = model.latency.len() * model.seq_cols.len();
    let mut cells = Vec::with_capacity(n_cells);
    let mut cell_weights = Vec::with_capacity(n_cells);
    for (row, values) in model.latency.iter().enumerate() {
        for &v in values {
            cells.push(v);
            cell_weights.push(model.weights[row]);
        }
    }

    let (avg_latency, std_latency) = weighted_mean_std(&cells, &cell_weights)?;
    let (avg_reliability, std_reliability) =
        weighted_mean_std(&model.reliability, &model.weights)?;

    Ok(RunSummary {
        avg_latency,
        std_latency,
        avg_reliability,
        std_reliability,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ExperimentDataset;
    use crate::log::{LogEvent, Variant};
    use pretty_assertions::assert_eq;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn uniform_weights_match_unweighted() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let weights = [1.0; 4];
        let (mean, std) = weighted_mean_std(&values, &weights).unwrap();
        assert_eq!(mean, 2.5);
        // Population std of 1..4.
        let var = values.iter().map(|v| (v - 2.5) * (v - 2.5)).sum::<f64>() / 4.0;
        assert!(close(std, var.sqrt()));
    }

    #[test]
    fn zero_total_weight_is_an_error() {
        assert!(weighted_mean_std(&[1.0, 2.0], &[0.0, 0.0]).is_err());
    }

    #[test]
    fn excluded_entry_does_not_contribute() {
        let (mean, std) = weighted_mean_std(&[100.0, 2.0, 4.0], &[0.0, 1.0, 1.0]).unwrap();
        assert_eq!(mean, 3.0);
        assert_eq!(std, 1.0);
    }

    #[test]
    fn end_to_end_scenario_summary() {
        // 3 nodes, central = 1, sequences {1, 2}; node 2 gets seq 1 only,
        // node 3 gets both.
        let events = vec![
            LogEvent::Send {
                at: 1.0,
                sender: 1,
                seq: 1,
            },
            LogEvent::Send {
                at: 2.0,
                sender: 1,
                seq: 2,
            },
            LogEvent::Receive {
                at: 1.5,
                receiver: 2,
                seq: 1,
                source: None,
            },
            LogEvent::Receive {
                at: 1.2,
                receiver: 3,
                seq: 1,
                source: None,
            },
            LogEvent::Receive {
                at: 2.2,
                receiver: 3,
                seq: 2,
                source: None,
            },
        ];
        let ds = ExperimentDataset::build(Variant::Unicast, &events).unwrap();
        let model = crate::model::RunModel::compute(&ds, 3).unwrap();
        let summary = summarize(&model).unwrap();

        // Cells over nodes {2, 3}: 0.5, 0, 0.2, 0.2.
        assert!(close(summary.avg_latency, 0.225));
        let var = [0.5f64, 0.0, 0.2, 0.2]
            .iter()
            .map(|v| (v - 0.225) * (v - 0.225))
            .sum::<f64>()
            / 4.0;
        assert!(close(summary.std_latency, var.sqrt()));

        assert_eq!(summary.avg_reliability, 75.0);
        assert_eq!(summary.std_reliability, 25.0);
    }
}
