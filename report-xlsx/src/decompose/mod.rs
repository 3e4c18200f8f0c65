//! Split the questionnaire column into one column per sub-field

mod extract;

pub use extract::{SubField, extract};

use crate::table::Table;

/// Column holding the questionnaire in contact report exports
pub const DEFAULT_SOURCE_COLUMN: &str = "Cuestionario respondido";

/// Append the five [`SubField`] columns computed from `source_column`.
///
/// A table without `source_column` is returned untouched. Existing columns
/// and the row count never change; cells without a match get `""`.
pub fn decompose(mut table: Table, source_column: &str) -> Table {
    let Some(source_idx) = table.column_index(source_column) else {
        log::warn!(
            "Column '{}' not found, skipping questionnaire split",
            source_column
        );
        return table;
    };

    for field in SubField::ALL {
        let values: Vec<_> = table
            .column_values(source_idx)
            .map(|cell| Some(field.extract(cell)))
            .collect();

        let stored_as = table.push_column(field.name(), values);
        if stored_as != field.name() {
            log::warn!(
                "Column '{}' already exists, extracted values stored as '{}'",
                field.name(),
                stored_as
            );
        }
    }

    log::debug!(
        "Split '{}' into {} columns over {} rows",
        source_column,
        SubField::ALL.len(),
        table.row_count()
    );

    table
}
