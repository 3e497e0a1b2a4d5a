//! Log parsing for the NullNet experiment serial logs.

pub mod event;
pub mod parse;

pub use event::{LogEvent, Variant};
pub use parse::{EventParser, parse_log_file};
