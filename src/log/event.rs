/// Which experiment produced the log being analyzed.
///
/// The two variants share the pipeline but differ in event shapes and in
/// which role identifies the central node: unicast logs have one sender
/// (the sink sends, everyone receives), broadcast logs have one receiver
/// (everyone sends rounds, the sink collects).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Unicast,
    Broadcast,
}

impl Variant {
    pub fn name(self) -> &'static str {
        match self {
            Variant::Unicast => "unicast",
            Variant::Broadcast => "broadcast",
        }
    }
}

/// One typed event extracted from a log line.
#[derive(Debug, Clone, PartialEq)]
pub enum LogEvent {
    Send {
        at: f64,
        sender: u32,
        seq: u32,
    },
    Receive {
        at: f64,
        receiver: u32,
        seq: u32,
        /// Node that originated the message; only present in broadcast
        /// logs, where the receiver is the collector.
        source: Option<u32>,
    },
}

/// Convert the `MM:SS.mmm` timestamp fields to seconds.
pub fn to_seconds(minutes: u32, seconds: u32, millis: u32) -> f64 {
    f64::from(minutes) * 60.0 + f64::from(seconds) + f64::from(millis) * 0.001
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn seconds_conversion() {
        assert_eq!(to_seconds(0, 0, 0), 0.0);
        assert_eq!(to_seconds(4, 8, 462), 248.462);
        assert_eq!(to_seconds(1, 0, 500), 60.5);
    }
}
