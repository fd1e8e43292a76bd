use crate::decode::decode_content;
use crate::errors::{ParserAttempt, ParserError};
use crate::formats::{DelimitedParser, SpreadsheetXmlParser};
use crate::model::Table;

/// A walk-test export format. Parsers receive already decoded text.
pub trait TableParser {
    fn name(&self) -> &'static str;
    fn parse(&self, content: &str) -> Result<Table, ParserError>;
}

/// Decodes raw bytes, then loads them like [`parse_table_file`].
pub fn parse_table_bytes(bytes: &[u8]) -> Result<Table, ParserError> {
    let content = decode_content(bytes)?;
    parse_table_file(&content)
}

/// Loads a walk-test export with every built-in parser, most specific first.
pub fn parse_table_file(content: &str) -> Result<Table, ParserError> {
    let spreadsheet_xml = SpreadsheetXmlParser;
    let delimited = DelimitedParser;
    let parsers: [&dyn TableParser; 2] = [&spreadsheet_xml, &delimited];
    parse_with_parsers(content, &parsers)
}

/// Tries `parsers` in order until one yields rows.
///
/// A parser that recognises its format but finds no rows does not end the
/// search. If nothing else matches, the first such verdict is reported as
/// [`ParserError::EmptyTable`] instead of a bare mismatch list.
pub fn parse_with_parsers(
    content: &str,
    parsers: &[&dyn TableParser],
) -> Result<Table, ParserError> {
    let mut attempts = Vec::with_capacity(parsers.len());

    for parser in parsers {
        let attempt = match parser.parse(content) {
            Ok(table) => return Ok(table),
            Err(ParserError::FormatMismatch { reason, .. }) => {
                ParserAttempt::mismatch(parser.name(), reason)
            }
            Err(ParserError::EmptyTable { .. }) => ParserAttempt::empty(parser.name()),
            Err(err) => return Err(err),
        };
        attempts.push(attempt);
    }

    match attempts.iter().find(|attempt| attempt.is_empty_table()) {
        Some(attempt) => Err(ParserError::EmptyTable {
            parser: attempt.parser,
        }),
        None => Err(ParserError::NoMatchingParser { attempts }),
    }
}
