//! Dense latency/reliability model for one experiment run.

use crate::dataset::ExperimentDataset;
use anyhow::bail;

/// Map an external 1-based node id to its storage row. All id arithmetic
/// goes through here; ids outside `1..=num_nodes` are rejected.
pub fn slot(id: u32, num_nodes: u32) -> anyhow::Result<usize> {
    if id < 1 || id > num_nodes {
        bail!("node id {} outside 1..={}", id, num_nodes);
    }
    Ok((id - 1) as usize)
}

/// Latency matrix, reliability vector and node weights for one run.
///
/// `latency[node-1][col]` is in seconds, with columns ordered by sequence
/// id. A cell where the sequence was never received (or its send was
/// never logged) holds an explicit 0.0; see DESIGN.md for why this
/// distortion is kept. The central node's row, reliability entry and
/// weight are zero by construction.
pub struct RunModel {
    pub num_nodes: u32,
    pub central: u32,
    /// Sequence ids in column order.
    pub seq_cols: Vec<u32>,
    pub latency: Vec<Vec<f64>>,
    pub reliability: Vec<f64>,
    pub weights: Vec<f64>,
}

impl RunModel {
    pub fn compute(dataset: &ExperimentDataset, num_nodes: u32) -> anyhow::Result<RunModel> {
        if dataset.seqs().is_empty() {
            bail!("no sequences observed");
        }
        let max_id = dataset.max_node_id();
        if max_id > num_nodes {
            bail!("node id {} exceeds experiment size {}", max_id, num_nodes);
        }

        let central = dataset.central();
        let central_row = slot(central, num_nodes)?;
        let seq_cols: Vec<u32> = dataset.seqs().iter().copied().collect();
        let num_seqs = seq_cols.len();

        let mut latency = vec![vec![0.0f64; num_seqs]; num_nodes as usize];
        let mut reliability = vec![0.0f64; num_nodes as usize];

        for node in 1..=num_nodes {
            let row = slot(node, num_nodes)?;
            if row == central_row {
                continue;
            }
            for (col, &seq) in seq_cols.iter().enumerate() {
                let receipts = dataset.receipts(node, seq);
                let earliest = receipts.iter().copied().fold(f64::INFINITY, f64::min);
                latency[row][col] = match dataset.send_time(seq, node) {
                    Some(sent) if earliest.is_finite() => earliest - sent,
                    // Never received, or send never logged: explicit zero.
                    _ => 0.0,
                };
            }
            reliability[row] =
                dataset.received_count(node) as f64 * 100.0 / num_seqs as f64;
        }

        let mut weights = vec![1.0f64; num_nodes as usize];
        weights[central_row] = 0.0;

        Ok(RunModel {
            num_nodes,
            central,
            seq_cols,
            latency,
            reliability,
            weights,
        })
    }

    /// Per-node mean latency across sequences (unweighted, zeros included).
    pub fn node_latency_avg(&self) -> Vec<f64> {
        self.latency.iter().map(|row| mean(row)).collect()
    }

    /// Per-node population std of latency across sequences.
    pub fn node_latency_std(&self) -> Vec<f64> {
        self.latency
            .iter()
            .map(|row| {
                let m = mean(row);
                let var = row.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / row.len() as f64;
                var.sqrt()
            })
            .collect()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{LogEvent, Variant};
    use pretty_assertions::assert_eq;

    fn send(at: f64, sender: u32, seq: u32) -> LogEvent {
        LogEvent::Send { at, sender, seq }
    }

    fn recv(at: f64, receiver: u32, seq: u32) -> LogEvent {
        LogEvent::Receive {
            at,
            receiver,
            seq,
            source: None,
        }
    }

    fn scenario() -> RunModel {
        // 3 nodes, central = 1, sequences {1, 2}.
        let events = vec![
            send(1.0, 1, 1),
            send(2.0, 1, 2),
            recv(1.5, 2, 1),
            recv(1.2, 3, 1),
            recv(2.2, 3, 2),
        ];
        let ds = ExperimentDataset::build(Variant::Unicast, &events).unwrap();
        RunModel::compute(&ds, 3).unwrap()
    }

    #[test]
    fn slot_boundaries() {
        assert_eq!(slot(1, 9).unwrap(), 0);
        assert_eq!(slot(9, 9).unwrap(), 8);
        assert!(slot(0, 9).is_err());
        assert!(slot(10, 9).is_err());
    }

    #[test]
    fn latency_round_trip() {
        let m = scenario();
        assert_eq!(m.latency[1][0], 0.5);
    }

    #[test]
    fn never_received_is_zero_filled() {
        let m = scenario();
        assert_eq!(m.latency[1][1], 0.0);
    }

    #[test]
    fn central_row_is_zero() {
        let m = scenario();
        assert_eq!(m.latency[0], vec![0.0, 0.0]);
        assert_eq!(m.reliability[0], 0.0);
        assert_eq!(m.weights[0], 0.0);
    }

    #[test]
    fn scenario_matrix_and_reliability() {
        let m = scenario();
        assert_eq!(m.central, 1);
        assert_eq!(m.seq_cols, vec![1, 2]);
        assert_eq!(m.latency[1], vec![0.5, 0.0]);
        assert!((m.latency[2][0] - 0.2).abs() < 1e-12);
        assert!((m.latency[2][1] - 0.2).abs() < 1e-12);
        assert_eq!(m.reliability[1], 50.0);
        assert_eq!(m.reliability[2], 100.0);
    }

    #[test]
    fn reliability_extremes() {
        // Node 2 receives all of {1, 2}, node 3 none.
        let events = vec![
            send(1.0, 1, 1),
            send(2.0, 1, 2),
            recv(1.1, 2, 1),
            recv(2.1, 2, 2),
        ];
        let ds = ExperimentDataset::build(Variant::Unicast, &events).unwrap();
        let m = RunModel::compute(&ds, 3).unwrap();
        assert_eq!(m.reliability[1], 100.0);
        assert_eq!(m.reliability[2], 0.0);
        for &r in &m.reliability {
            assert!((0.0..=100.0).contains(&r));
        }
    }

    #[test]
    fn earliest_receipt_is_authoritative() {
        let events = vec![send(1.0, 1, 1), recv(1.9, 2, 1), recv(1.5, 2, 1)];
        let ds = ExperimentDataset::build(Variant::Unicast, &events).unwrap();
        let m = RunModel::compute(&ds, 2).unwrap();
        assert_eq!(m.latency[1][0], 0.5);
    }

    #[test]
    fn weights_exclude_central_exactly_once() {
        let m = scenario();
        assert_eq!(m.weights.iter().sum::<f64>(), (m.num_nodes - 1) as f64);
    }

    #[test]
    fn node_id_beyond_size_is_an_error() {
        let events = vec![send(1.0, 1, 1), recv(1.5, 4, 1)];
        let ds = ExperimentDataset::build(Variant::Unicast, &events).unwrap();
        assert!(RunModel::compute(&ds, 3).is_err());
    }

    #[test]
    fn per_node_curves() {
        let m = scenario();
        let avg = m.node_latency_avg();
        assert_eq!(avg[0], 0.0);
        assert_eq!(avg[1], 0.25);
        let std = m.node_latency_std();
        assert_eq!(std[1], 0.25);
        assert!(std[2].abs() < 1e-12);
    }
}
