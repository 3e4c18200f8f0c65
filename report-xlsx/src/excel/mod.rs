//! Excel export of converted reports

mod writer;

pub use writer::{DEFAULT_SHEET_NAME, write_table_excel};
