use crate::log::event::{LogEvent, Variant, to_seconds};
use anyhow::Context;
use regex::Regex;
use std::fs;

/// Line classifier for one experiment variant.
///
/// Each line is tested against both shapes independently; the checks are
/// not mutually exclusive, so a garbled line that happens to satisfy both
/// yields two events. Lines matching neither shape produce nothing.
pub struct EventParser {
    variant: Variant,
    send_re: Regex,
    recv_re: Regex,
}

impl EventParser {
    pub fn new(variant: Variant) -> anyhow::Result<EventParser> {
        // Capture:
        // 1-3) timestamp: MM:SS.mmm
        // 4) node id after "ID:"
        // 5) sequence/round id
        // 6) broadcast receive only: originating node
        let (send_re, recv_re) = match variant {
            Variant::Unicast => (
                Regex::new(r"^(\d{2}):(\d{2})\.(\d{3}).*?ID:(\d+).*?Sending seq (\S+) ")?,
                Regex::new(r"^(\d{2}):(\d{2})\.(\d{3}).*?ID:(\d+).*?Received seq (\S+) ")?,
            ),
            Variant::Broadcast => (
                Regex::new(r"^(\d{2}):(\d{2})\.(\d{3}).*?ID:(\d+).*?Sending round (\S+) ")?,
                Regex::new(
                    r"^(\d{2}):(\d{2})\.(\d{3}).*?ID:(\d+).*?Received round (\S+) with measurement \d+ from node (\d+)",
                )?,
            ),
        };
        Ok(EventParser {
            variant,
            send_re,
            recv_re,
        })
    }

    /// Extract every event a line carries. Empty vec means the line
    /// matched neither shape; an error means a shape matched but one of
    /// its numeric fields did not parse.
    pub fn parse_line(&self, line: &str) -> anyhow::Result<Vec<LogEvent>> {
        let line = line.trim();
        let mut events = Vec::new();

        if let Some(caps) = self.send_re.captures(line) {
            let at = capture_time(&caps)?;
            let sender = capture_num(&caps, 4, "node id")?;
            let seq = capture_num(&caps, 5, "sequence id")?;
            events.push(LogEvent::Send { at, sender, seq });
        }

        if let Some(caps) = self.recv_re.captures(line) {
            let at = capture_time(&caps)?;
            let receiver = capture_num(&caps, 4, "node id")?;
            let seq = capture_num(&caps, 5, "sequence id")?;
            let source = match self.variant {
                Variant::Unicast => None,
                Variant::Broadcast => Some(capture_num(&caps, 6, "source node id")?),
            };
            events.push(LogEvent::Receive {
                at,
                receiver,
                seq,
                source,
            });
        }

        Ok(events)
    }
}

fn capture_time(caps: &regex::Captures) -> anyhow::Result<f64> {
    let minutes = capture_num(caps, 1, "minutes")?;
    let seconds = capture_num(caps, 2, "seconds")?;
    let millis = capture_num(caps, 3, "milliseconds")?;
    Ok(to_seconds(minutes, seconds, millis))
}

fn capture_num(caps: &regex::Captures, group: usize, what: &str) -> anyhow::Result<u32> {
    let s = caps.get(group).map(|m| m.as_str()).unwrap_or_default();
    s.parse::<u32>()
        .with_context(|| format!("bad {} field: {:?}", what, s))
}

/// Parse a whole log file into events, in file order.
///
/// Unrecognized lines are skipped silently. A line that matches a shape
/// but carries an unparsable numeric field is reported on stderr with its
/// position and skipped; a single corrupt line never aborts the run.
pub fn parse_log_file(path: &str, variant: Variant) -> anyhow::Result<Vec<LogEvent>> {
    let text = fs::read_to_string(path).with_context(|| format!("read log file {}", path))?;
    let parser = EventParser::new(variant)?;

    let mut events = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        match parser.parse_line(line) {
            Ok(line_events) => events.extend(line_events),
            Err(e) => {
                eprintln!("WARN: {}:{}: {:#}", path, lineno + 1, e);
            }
        }
    }
    Ok(events)
}
