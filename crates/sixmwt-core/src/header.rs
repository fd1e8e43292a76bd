use serde::Serialize;
use sixmwt_parser::Table;

use crate::boundaries::MarkerScheme;
use crate::error::ExtractionError;

const SURNAME_LABEL: &str = "COGNOME";
const NAME_LABEL: &str = "NOME";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubjectIdentity {
    pub surname: String,
    pub name: String,
}

/// Column holding the boundary markers and the scheme its header selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerColumn {
    pub scheme: MarkerScheme,
    pub index: usize,
}

/// Reads the subject's surname and given name from `COGNOME`/`NOME` label cells.
///
/// The value is the trimmed text of the cell right of the label. Later labels
/// overwrite earlier ones unless their value cell is blank.
pub fn scan_subject(table: &Table) -> SubjectIdentity {
    let mut identity = SubjectIdentity::default();

    for row in table.rows() {
        for (position, cell) in row.cells().iter().enumerate() {
            let Some(label) = cell.trimmed() else {
                continue;
            };
            let target = if label.eq_ignore_ascii_case(SURNAME_LABEL) {
                &mut identity.surname
            } else if label.eq_ignore_ascii_case(NAME_LABEL) {
                &mut identity.name
            } else {
                continue;
            };
            if let Some(value) = row.text_at(position + 1) {
                *target = value.to_string();
            }
        }
    }

    identity
}

/// Finds the first `START` or `MARKER` cell in row-major order.
pub fn locate_marker_column(table: &Table) -> Result<MarkerColumn, ExtractionError> {
    for row in table.rows() {
        for cell in row.cells() {
            let Some(scheme) = cell.trimmed().and_then(MarkerScheme::from_header_token) else {
                continue;
            };
            return Ok(MarkerColumn {
                scheme,
                index: cell.column(),
            });
        }
    }

    Err(ExtractionError::Configuration {
        message: format!(
            "no '{}' or '{}' cell in {} rows",
            MarkerScheme::Start.header_token(),
            MarkerScheme::Marker.header_token(),
            table.len()
        ),
    })
}
