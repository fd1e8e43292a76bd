use quick_xml::events::Event;
use quick_xml::Reader;

use crate::errors::ParserError;
use crate::model::Table;
use crate::registry::TableParser;

use super::{looks_like_markup, strip_bom};

const SPREADSHEET_NAMESPACE: &str = "urn:schemas-microsoft-com:office:spreadsheet";

/// Excel 2003 XML ("SpreadsheetML") workbooks as written by metabolic carts.
///
/// Rows from every worksheet are concatenated in document order. Cells are
/// numbered by their position inside the row; `ss:Index` gaps are ignored.
pub struct SpreadsheetXmlParser;

impl Default for SpreadsheetXmlParser {
    fn default() -> Self {
        Self
    }
}

impl SpreadsheetXmlParser {
    const NAME: &'static str = "SPREADSHEET_XML";
}

#[derive(Default)]
struct RowCollector {
    rows: Vec<Vec<Option<String>>>,
    depth: usize,
    row: Option<Vec<Option<String>>>,
    cell_depth: Option<usize>,
    cell_text: Option<String>,
    data_depth: Option<usize>,
}

impl RowCollector {
    fn open(&mut self, name: &[u8]) {
        self.depth += 1;
        match name {
            b"Row" if self.row.is_none() => self.row = Some(Vec::new()),
            b"Cell" if self.row.is_some() && self.cell_depth.is_none() => {
                self.cell_depth = Some(self.depth);
                self.cell_text = None;
            }
            b"Data" if self.data_depth.is_none() && self.cell_depth == Some(self.depth - 1) => {
                self.data_depth = Some(self.depth);
                self.cell_text.get_or_insert_with(String::new);
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"Data" if self.data_depth == Some(self.depth) => self.data_depth = None,
            b"Cell" if self.cell_depth == Some(self.depth) => {
                self.cell_depth = None;
                let text = self.cell_text.take();
                if let Some(row) = self.row.as_mut() {
                    row.push(text);
                }
            }
            b"Row" => {
                if let Some(row) = self.row.take() {
                    self.rows.push(row);
                }
            }
            _ => {}
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn empty(&mut self, name: &[u8]) {
        self.open(name);
        self.close(name);
    }

    fn text(&mut self, text: &str) {
        if self.data_depth.is_some() {
            if let Some(buffer) = self.cell_text.as_mut() {
                buffer.push_str(text);
            }
        }
    }
}

impl TableParser for SpreadsheetXmlParser {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parse(&self, content: &str) -> Result<Table, ParserError> {
        let content = strip_bom(content);
        if !looks_like_markup(content) {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "content is not XML".to_string(),
            });
        }
        if !content.contains(SPREADSHEET_NAMESPACE) {
            return Err(ParserError::FormatMismatch {
                parser: Self::NAME,
                reason: "missing SpreadsheetML namespace".to_string(),
            });
        }

        let mut reader = Reader::from_str(content);
        let mut collector = RowCollector::default();

        loop {
            let position = reader.buffer_position();
            let event = reader.read_event().map_err(|source| ParserError::Xml {
                parser: Self::NAME,
                position,
                source,
            })?;
            match event {
                Event::Start(e) => collector.open(e.local_name().as_ref()),
                Event::End(e) => collector.close(e.local_name().as_ref()),
                Event::Empty(e) => collector.empty(e.local_name().as_ref()),
                Event::Text(t) => {
                    let text = t.unescape().map_err(|source| ParserError::Xml {
                        parser: Self::NAME,
                        position,
                        source,
                    })?;
                    collector.text(&text);
                }
                Event::CData(t) => {
                    let bytes = t.into_inner();
                    collector.text(&String::from_utf8_lossy(&bytes));
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if collector.rows.is_empty() {
            return Err(ParserError::EmptyTable { parser: Self::NAME });
        }

        Ok(Table::from_rows(collector.rows))
    }
}
