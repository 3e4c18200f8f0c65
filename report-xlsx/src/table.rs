//! In-memory table of text cells
//!
//! Every stage of a conversion works on one [`Table`]: the reader builds it,
//! the decomposer appends columns to it and the Excel writer consumes it.

/// A single cell. `None` means the source field was empty.
pub type Cell = Option<String>;

/// Ordered columns and rows of text cells
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Create an empty table with the given header.
    ///
    /// Repeated names are made unique the same way [`Table::push_column`] does.
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for name in columns {
            let name: String = name.into();
            let name = table.unique_name(&name);
            table.columns.push(name);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact (case-sensitive) name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate over one column's cells, top to bottom
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).and_then(|c| c.as_deref()))
    }

    /// Append a data row. Short rows are padded with empty cells and long rows
    /// are cut to the header width so the column set stays uniform.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    /// Append a column after all existing ones, returning the name it was
    /// stored under.
    ///
    /// `values` must yield one cell per row; missing trailing cells are left
    /// empty. If `name` is already taken the column is stored as `name.1`,
    /// `name.2`, ... and no existing column is touched.
    pub fn push_column<I>(&mut self, name: &str, values: I) -> String
    where
        I: IntoIterator<Item = Cell>,
    {
        let name = self.unique_name(name);
        self.columns.push(name.clone());

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.push(values.next().flatten());
        }

        name
    }

    fn unique_name(&self, name: &str) -> String {
        if !self.has_column(name) {
            return name.to_string();
        }

        (1..)
            .map(|n| format!("{}.{}", name, n))
            .find(|candidate| !self.has_column(candidate))
            .unwrap_or_else(|| name.to_string())
    }
}
