//! Contact report conversion: CSV export in, single-sheet Excel workbook out
//!
//! The questionnaire column of the export is split into five columns on the
//! way through. See [`pipeline::convert`] for the entry point.

pub mod config;
pub mod decompose;
pub mod error;
pub mod excel;
pub mod pipeline;
pub mod reader;
pub mod table;

pub use config::ReportConfig;
pub use error::ReportError;
pub use pipeline::{ConversionSummary, convert};
