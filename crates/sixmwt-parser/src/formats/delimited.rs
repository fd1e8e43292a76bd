use csv::ReaderBuilder;

use crate::errors::ParserError;
use crate::model::Table;
use crate::registry::TableParser;

use super::{looks_like_markup, strip_bom};

const SNIFF_LINES: usize = 20;

/// Delimited text exports (`;`, tab or `,` separated), ragged rows allowed.
pub struct DelimitedParser;

impl Default for DelimitedParser {
    fn default() -> Self {
        Self
    }
}

impl DelimitedParser {
    const NAME: &'static str = "DELIMITED";

    /// Semicolons win over tabs and commas: comma-decimal exports use `;`
    /// as the field separator and are full of commas.
    fn sniff_delimiter(content: &str) -> u8 {
        let sample: Vec<&str> = content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(SNIFF_LINES)
            .collect();

        if sample.iter().any(|line| line.contains(';')) {
            b';'
        } else if sample.iter().any(|line| line.contains('\t')) {
            b'\t'
        } else {
            b','
        }
    }
}

impl TableParser for DelimitedParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<Table, ParserError> {
        let content = strip_bom(content);
        if looks_like_markup(content) {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "content looks like markup".to_string(),
            });
        }
        if content.trim().is_empty() {
            return Err(ParserError::EmptyTable { parser: Self::NAME });
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(Self::sniff_delimiter(content))
            .from_reader(content.as_bytes());

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| ParserError::Csv {
                parser: Self::NAME,
                source,
            })?;
            let cells: Vec<Option<String>> = record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        None
                    } else {
                        Some(field.to_string())
                    }
                })
                .collect();
            rows.push(cells);
        }

        if rows.is_empty() {
            return Err(ParserError::EmptyTable { parser: Self::NAME });
        }

        Ok(Table::from_rows(rows))
    }
}
