//! Error normalization and rendering.
//!
//! The formatter maps heterogeneous violation sources (structural,
//! semantic, rule-based) to stable catalog codes and builds an
//! [`ErrorReport`] whose validity and summary counts are derived on read.
//! Four pure renderings produce byte-identical output for the same report.

pub mod mapping;
pub mod render;
pub mod report;

pub use mapping::ErrorFormatter;
pub use render::{TextOptions, render_html, render_json, render_markdown, render_text};
pub use report::{ErrorReport, FormattedError, ReportSummary};
