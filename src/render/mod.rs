//! Self-contained HTML chart reports.

pub mod html;

pub use html::{render_overview_chart, render_run_chart};
