//! Conversion pipeline: read CSV, split questionnaire, write workbook

use std::path::PathBuf;

use crate::config::ReportConfig;
use crate::decompose::decompose;
use crate::error::ReportError;
use crate::excel::write_table_excel;
use crate::reader::{self, Candidate, LoadedTable};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct ConversionSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    pub encoding: Candidate,
    /// Columns as read from the CSV
    pub source_columns: Vec<String>,
    pub row_count: usize,
    /// Columns in the written sheet
    pub column_count: usize,
    /// Names of the appended sub-field columns, empty when the questionnaire
    /// column was missing
    pub added_columns: Vec<String>,
}

impl ConversionSummary {
    pub fn decomposed(&self) -> bool {
        !self.added_columns.is_empty()
    }
}

/// Run one conversion.
///
/// The output file is only created once the table has been fully read and
/// decomposed; any error before that leaves the filesystem untouched.
pub fn convert(config: &ReportConfig) -> Result<ConversionSummary, ReportError> {
    let candidates = config.candidates()?;
    let output = config.output_path();

    log::info!(
        "Converting {} -> {}",
        config.input.display(),
        output.display()
    );

    let LoadedTable { table, encoding } = reader::load(&config.input, &candidates)?;
    let source_columns = table.columns().to_vec();

    let table = decompose(table, &config.source_column);
    let added_columns = table.columns()[source_columns.len()..].to_vec();

    write_table_excel(&table, &output, &config.sheet_name)?;

    Ok(ConversionSummary {
        input: config.input.clone(),
        output,
        encoding,
        source_columns,
        row_count: table.row_count(),
        column_count: table.column_count(),
        added_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use std::fs;
    use std::path::Path;

    const HEADER: &str = "id,Cuestionario respondido\n";
    const FULL_ROW: &str = "1,\"1 - Id_plataforma_contacto - A1 | 2 - Id_paciente - P9 | \
                            3 - Nombre_profesional - Dr Lee | 4 - Id_profesional - PR3 | \
                            5 - Link_chat - http://chat\"\n";

    fn config_for(dir: &Path, csv: &[u8]) -> ReportConfig {
        let input = dir.join("Reporte.csv");
        fs::write(&input, csv).unwrap();
        ReportConfig::builder()
            .input(&input)
            .output(dir.join("Reporte.xlsx"))
            .build()
    }

    fn sheet_rows(path: &Path) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
        let range = workbook.worksheet_range("Sheet1").unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    fn strings(row: &[Data]) -> Vec<String> {
        row.iter()
            .map(|c| match c {
                Data::String(s) => s.clone(),
                Data::Empty => String::new(),
                other => panic!("unexpected cell {:?}", other),
            })
            .collect()
    }

    #[test]
    fn test_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), format!("{}{}", HEADER, FULL_ROW).as_bytes());

        let summary = convert(&config).unwrap();

        assert_eq!(summary.encoding, Candidate::Utf8);
        assert_eq!(summary.row_count, 1);
        assert_eq!(summary.column_count, 7);
        assert!(summary.decomposed());
        assert_eq!(summary.source_columns, vec!["id", "Cuestionario respondido"]);

        let rows = sheet_rows(&summary.output);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            strings(&rows[0]),
            vec![
                "id",
                "Cuestionario respondido",
                "Id_plataforma_contacto",
                "Id_paciente",
                "Nombre_profesional",
                "Id_profesional",
                "Link_chat",
            ]
        );
        assert_eq!(
            strings(&rows[1][2..]),
            vec!["A1", "P9", "Dr Lee", "PR3", "http://chat"]
        );
    }

    #[test]
    fn test_four_of_five_segments() {
        let dir = tempfile::tempdir().unwrap();
        let row = "7,\"1 - Id_plataforma_contacto - A1 | 2 - Id_paciente - P9 | \
                   3 - Nombre_profesional - Dr Lee | 5 - Link_chat - http://chat\"\n";
        let config = config_for(dir.path(), format!("{}{}", HEADER, row).as_bytes());

        let summary = convert(&config).unwrap();

        let rows = sheet_rows(&summary.output);
        assert_eq!(
            strings(&rows[1][2..]),
            vec!["A1", "P9", "Dr Lee", "", "http://chat"]
        );
    }

    #[test]
    fn test_short_row_is_decomposed() {
        let dir = tempfile::tempdir().unwrap();
        let csv = b"id,nombre,Cuestionario respondido\n1,Ana\n2,Luis,\"2 - Id_paciente - 9\"\n";
        let config = config_for(dir.path(), csv);

        let summary = convert(&config).unwrap();

        assert_eq!(summary.row_count, 2);
        assert_eq!(summary.column_count, 8);
        let rows = sheet_rows(&summary.output);
        assert_eq!(strings(&rows[1][3..]), vec!["", "", "", "", ""]);
        assert_eq!(strings(&rows[2][3..]), vec!["", "9", "", "", ""]);
    }

    #[test]
    fn test_latin1_input() {
        let dir = tempfile::tempdir().unwrap();
        let csv = b"id,Cuestionario respondido\n1,\"3 - Nombre_profesional - Dra. Nu\xf1ez\"\n";
        let config = config_for(dir.path(), csv);

        let summary = convert(&config).unwrap();

        assert_eq!(summary.encoding, Candidate::Latin1);
        let rows = sheet_rows(&summary.output);
        assert_eq!(rows[1][4], Data::String("Dra. Nu\u{f1}ez".to_string()));
    }

    #[test]
    fn test_missing_questionnaire_column() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), b"id,nombre\n1,Ana\n2,Luis\n");

        let summary = convert(&config).unwrap();

        assert!(!summary.decomposed());
        assert_eq!(summary.column_count, 2);
        assert_eq!(summary.row_count, 2);
        let rows = sheet_rows(&summary.output);
        assert_eq!(strings(&rows[0]), vec!["id", "nombre"]);
    }

    #[test]
    fn test_unreadable_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), &[0x00, 0xFF, 0xFE, 0x01, 0x81, 0x0A, 0x90]);

        let err = convert(&config).unwrap_err();

        assert!(matches!(err, ReportError::UnreadableFile { .. }));
        assert!(!config.output_path().exists());
    }

    #[test]
    fn test_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_for(dir.path(), HEADER.as_bytes());

        let err = convert(&config).unwrap_err();

        assert!(matches!(err, ReportError::EmptyInput { .. }));
        assert!(!config.output_path().exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let config = ReportConfig::builder()
            .input(dir.path().join("nope.csv"))
            .output(dir.path().join("nope.xlsx"))
            .build();

        let err = convert(&config).unwrap_err();

        assert!(matches!(err, ReportError::NotFound { .. }));
        assert!(!dir.path().join("nope.xlsx").exists());
    }

    #[test]
    fn test_bad_encoding_label_is_processing_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config_for(dir.path(), FULL_ROW.as_bytes());
        config.encodings = vec!["klingon".to_string()];

        let err = convert(&config).unwrap_err();

        assert!(matches!(err, ReportError::Processing(_)));
    }
}
