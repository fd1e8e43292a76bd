use serde::{Deserialize, Serialize};

/// One spreadsheet cell: its ordinal position in the row and its text, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    column: usize,
    text: Option<String>,
}

impl Cell {
    pub fn new(column: usize, text: Option<String>) -> Self {
        Self { column, text }
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Trimmed text, `None` when the cell is absent or blank.
    pub fn trimmed(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    index: usize,
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(index: usize, cells: Vec<Cell>) -> Self {
        Self { index, cells }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, column: usize) -> Option<&Cell> {
        self.cells.get(column)
    }

    /// Trimmed, non-blank text of the cell at `column`.
    pub fn text_at(&self, column: usize) -> Option<&str> {
        self.cell(column).and_then(Cell::trimmed)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Ordered, read-only rows of a loaded export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    rows: Vec<Row>,
}

impl Table {
    /// Builds a table from raw cell texts, numbering rows and columns by position.
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = Option<String>>,
    {
        let rows = rows
            .into_iter()
            .enumerate()
            .map(|(index, cells)| {
                let cells = cells
                    .into_iter()
                    .enumerate()
                    .map(|(column, text)| Cell::new(column, text))
                    .collect();
                Row::new(index, cells)
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
