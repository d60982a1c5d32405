use std::io;
use std::path::Path;

use crate::error::TableError;

/// An in-memory CSV table: a header plus rows of string cells.
///
/// Rows may be shorter or longer than the header; lookups past the end of a
/// row read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row<I, S>(&mut self, row: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`Table::column_index`] but fails when the column is missing.
    pub fn require_column(&self, name: &str) -> Result<usize, TableError> {
        self.column_index(name)
            .ok_or_else(|| TableError::MissingColumn(name.to_string()))
    }

    /// Cell `column` of row `row`, if both exist.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index).map(String::as_str)
    }

    /// Values of one column, empty for rows too short to have it.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let index = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(index).map_or("", String::as_str))
                .collect(),
        )
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), TableError> {
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(writer);
        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let path = path.as_ref();
        log::debug!("Reading {}", path.display());
        Self::from_reader(std::fs::File::open(path)?)
    }

    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<(), TableError> {
        let path = path.as_ref();
        log::debug!("Writing {} rows to {}", self.len(), path.display());
        self.write_to(std::fs::File::create(path)?)
    }
}
