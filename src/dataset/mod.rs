//! Per-run accumulation of parsed events into send/receive records.

use crate::log::{LogEvent, Variant};
use anyhow::bail;
use std::collections::{BTreeMap, BTreeSet};

/// Key for one send record: the sequence id plus, in the broadcast
/// variant, the node that originated the round. Unicast sends all come
/// from the central node, so the sequence id alone identifies them. This
/// is the only place the two variants differ in how sends are keyed.
type SendKey = (u32, Option<u32>);

/// Everything one experiment run recorded, keyed by external 1-based ids.
///
/// `recv_times` keeps every observed receipt timestamp per (node, seq)
/// pair; duplicates are possible and the earliest is authoritative. The
/// central node is derived from the log, not configured: in unicast it is
/// the sender of all `Send` events, in broadcast the receiver of all
/// `Receive` events.
pub struct ExperimentDataset {
    variant: Variant,
    send_times: BTreeMap<SendKey, f64>,
    recv_times: BTreeMap<u32, BTreeMap<u32, Vec<f64>>>,
    received: BTreeMap<u32, BTreeSet<u32>>,
    seqs: BTreeSet<u32>,
    central: u32,
}

impl ExperimentDataset {
    /// Accumulate a finite event stream, in file order.
    ///
    /// Send and receive events for the same sequence may arrive in either
    /// order; the nodes' log streams are interleaved by capture order.
    pub fn build(variant: Variant, events: &[LogEvent]) -> anyhow::Result<ExperimentDataset> {
        let mut send_times: BTreeMap<SendKey, f64> = BTreeMap::new();
        let mut recv_times: BTreeMap<u32, BTreeMap<u32, Vec<f64>>> = BTreeMap::new();
        let mut received: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
        let mut seqs: BTreeSet<u32> = BTreeSet::new();
        let mut central: Option<u32> = None;

        for event in events {
            match *event {
                LogEvent::Send { at, sender, seq } => {
                    check_node_id(sender)?;
                    if variant == Variant::Unicast {
                        note_central(&mut central, sender)?;
                    }
                    // First send per key wins.
                    send_times.entry(send_key(variant, seq, sender)).or_insert(at);
                    seqs.insert(seq);
                }
                LogEvent::Receive {
                    at,
                    receiver,
                    seq,
                    source,
                } => {
                    check_node_id(receiver)?;
                    let measured = match variant {
                        Variant::Unicast => receiver,
                        Variant::Broadcast => {
                            note_central(&mut central, receiver)?;
                            match source {
                                Some(s) => s,
                                None => bail!("broadcast receive event without source node"),
                            }
                        }
                    };
                    check_node_id(measured)?;
                    recv_times
                        .entry(measured)
                        .or_default()
                        .entry(seq)
                        .or_default()
                        .push(at);
                    received.entry(measured).or_default().insert(seq);
                    seqs.insert(seq);
                }
            }
        }

        let central = match central {
            Some(c) => c,
            None => bail!("no events matched; cannot identify the central node"),
        };

        Ok(ExperimentDataset {
            variant,
            send_times,
            recv_times,
            received,
            seqs,
            central,
        })
    }

    /// The run's sink node (unicast: message source; broadcast: collector).
    pub fn central(&self) -> u32 {
        self.central
    }

    /// Every sequence id observed via either event kind.
    pub fn seqs(&self) -> &BTreeSet<u32> {
        &self.seqs
    }

    /// All receipt timestamps recorded for a (node, sequence) pair.
    pub fn receipts(&self, node: u32, seq: u32) -> &[f64] {
        self.recv_times
            .get(&node)
            .and_then(|per_seq| per_seq.get(&seq))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of distinct sequence ids a node received.
    pub fn received_count(&self, node: u32) -> usize {
        self.received.get(&node).map_or(0, BTreeSet::len)
    }

    /// Send time for a sequence as measured at `node`, if one was logged.
    pub fn send_time(&self, seq: u32, node: u32) -> Option<f64> {
        self.send_times
            .get(&send_key(self.variant, seq, node))
            .copied()
    }

    /// Largest node id seen in any record; used to sanity-check the
    /// configured experiment size.
    pub fn max_node_id(&self) -> u32 {
        let recv_max = self.recv_times.keys().next_back().copied().unwrap_or(0);
        let send_max = self
            .send_times
            .keys()
            .filter_map(|&(_, node)| node)
            .max()
            .unwrap_or(0);
        recv_max.max(send_max).max(self.central)
    }
}

fn send_key(variant: Variant, seq: u32, sender: u32) -> SendKey {
    match variant {
        Variant::Unicast => (seq, None),
        Variant::Broadcast => (seq, Some(sender)),
    }
}

// Node ids are 1-based externally; 0 would silently fall outside every row.
fn check_node_id(id: u32) -> anyhow::Result<()> {
    if id == 0 {
        bail!("node id 0 in log; node ids are 1-based");
    }
    Ok(())
}

fn note_central(central: &mut Option<u32>, node: u32) -> anyhow::Result<()> {
    match *central {
        None => {
            *central = Some(node);
            Ok(())
        }
        Some(c) if c == node => Ok(()),
        Some(c) => bail!("conflicting central node candidates: {} and {}", c, node),
    }
}
