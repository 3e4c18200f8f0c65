//! Pull single values out of a questionnaire cell
//!
//! A questionnaire cell looks like
//! `1 - Id_paciente - 42 | 2 - Link_chat - https://...`: `|`-separated
//! segments of `<number> - <field> - <value>`.

use once_cell::sync::Lazy;
use regex::Regex;

/// The five values stored in a questionnaire cell, in output column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubField {
    PlatformContactId,
    PatientId,
    ProfessionalName,
    ProfessionalId,
    ChatLink,
}

impl SubField {
    pub const ALL: [SubField; 5] = [
        SubField::PlatformContactId,
        SubField::PatientId,
        SubField::ProfessionalName,
        SubField::ProfessionalId,
        SubField::ChatLink,
    ];

    /// Field label as written in the export, also used as the column name
    pub fn name(&self) -> &'static str {
        match self {
            SubField::PlatformContactId => "Id_plataforma_contacto",
            SubField::PatientId => "Id_paciente",
            SubField::ProfessionalName => "Nombre_profesional",
            SubField::ProfessionalId => "Id_profesional",
            SubField::ChatLink => "Link_chat",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Extract this field's value from a cell
    pub fn extract(&self, cell: Option<&str>) -> String {
        let pattern = &PATTERNS[*self as usize];
        cell.map(|text| capture(pattern, text)).unwrap_or_default()
    }
}

static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SubField::ALL
        .iter()
        .map(|field| field_pattern(field.name()).expect("sub-field pattern is valid"))
        .collect()
});

/// `<digits> - <field_name> - <value up to the next pipe>`
fn field_pattern(field_name: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!(
        r"\d+\s*-\s*{}\s*-\s*([^|]*)",
        regex::escape(field_name)
    ))
}

fn capture(pattern: &Regex, text: &str) -> String {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Extract the value of `field_name` from a questionnaire cell.
///
/// Returns an empty string for an absent cell or when no segment carries the
/// field. Only the first matching segment counts, and the name is matched
/// case-sensitively anywhere in the text.
pub fn extract(cell: Option<&str>, field_name: &str) -> String {
    if let Some(field) = SubField::from_name(field_name) {
        return field.extract(cell);
    }

    let Some(text) = cell else {
        return String::new();
    };

    match field_pattern(field_name) {
        Ok(pattern) => capture(&pattern, text),
        Err(e) => {
            log::warn!("Cannot build pattern for field '{}': {}", field_name, e);
            String::new()
        }
    }
}
