mod common;
mod delimited;
mod spreadsheet_xml;

pub use delimited::DelimitedParser;
pub use spreadsheet_xml::SpreadsheetXmlParser;

pub(crate) use common::{looks_like_markup, strip_bom};
