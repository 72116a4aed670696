//! Tabular dataset model and the CSV boundary
//!
//! A [`Table`] keeps every cell as the raw string read from the CSV so that
//! original values are written back byte-for-byte. Column kinds are inferred on
//! load and decide which columns are selectable as text.

use crate::{Error, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::debug;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell values read as missing (NaN) rather than text
pub const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub(crate) const TRUE_VALUES: &[&str] = &["True", "TRUE", "true"];
const FALSE_VALUES: &[&str] = &["False", "FALSE", "false"];

#[inline]
pub fn is_missing(value: &str) -> bool {
    MISSING_MARKERS.contains(&value)
}

/// Render a boolean cell
pub fn format_bool(value: bool) -> &'static str {
    if value {
        TRUE_VALUES[0]
    } else {
        FALSE_VALUES[0]
    }
}

/// Render a float cell in shortest round-trip form, keeping `.0` on integral values.
///
/// Magnitudes below `1e-4` or from `1e16` up use exponent form with a signed,
/// two-digit exponent (`1e-05`, `2.5e-07`, `1e+16`).
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if value.is_finite() && value != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return format_exponent(value);
    }

    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn format_exponent(value: f64) -> String {
    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => formatted,
    }
}

/// Inferred type of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Every cell is missing
    Empty,
}

impl ColumnKind {
    /// Infer the kind from the column's raw values, ignoring missing cells.
    ///
    /// A boolean column with any missing cell is `Text`: it cannot hold a
    /// missing value as a boolean and stays a mixed-object column.
    pub fn infer<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let (mut integer, mut float, mut boolean) = (true, true, true);
        let (mut present, mut missing) = (false, false);

        for value in values {
            if is_missing(value) {
                missing = true;
                continue;
            }
            present = true;
            integer &= value.parse::<i64>().is_ok();
            float &= value.parse::<f64>().is_ok();
            boolean &= TRUE_VALUES.contains(&value) || FALSE_VALUES.contains(&value);
            if !(integer || float || boolean) {
                return ColumnKind::Text;
            }
        }

        if !present {
            ColumnKind::Empty
        } else if integer {
            ColumnKind::Integer
        } else if float {
            ColumnKind::Float
        } else if boolean && !missing {
            ColumnKind::Boolean
        } else {
            ColumnKind::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
}

/// Raw cell values of one record, in column order
pub type Row = Vec<String>;

/// An in-memory dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Table {
    /// Build a table from a header and rows.
    ///
    /// Short rows are padded with missing cells; rows longer than the header are rejected.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        if headers.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let names = dedupe_headers(headers);
        let width = names.len();
        let mut padded = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if row.len() > width {
                return Err(Error::Csv(format!(
                    "Expected {} fields in row {}, saw {}",
                    width,
                    index + 1,
                    row.len()
                )));
            }
            row.resize(width, String::new());
            padded.push(row);
        }

        Ok(Self::from_parts(names, padded))
    }

    fn from_parts(names: Vec<String>, rows: Vec<Row>) -> Self {
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Column {
                kind: ColumnKind::infer(rows.iter().map(|row| row[index].as_str())),
                name,
            })
            .collect();

        Self { columns, rows }
    }

    /// Read a CSV file with a header row
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_csv_reader(File::open(path)?)
    }

    /// Read an uploaded CSV stream fully, then parse it
    pub fn from_csv_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_csv_bytes(&bytes)
    }

    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = reader.headers()?.clone();
        if headers.is_empty() || (headers.len() == 1 && headers[0].trim().is_empty()) {
            return Err(Error::EmptyDataset);
        }
        let width = headers.len();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            if record.len() > width {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                return Err(Error::Csv(format!(
                    "Expected {} fields in line {}, saw {}",
                    width,
                    line,
                    record.len()
                )));
            }

            let mut row: Row = record.iter().map(str::to_string).collect();
            row.resize(width, String::new());
            rows.push(row);
        }

        let names = dedupe_headers(headers.iter().map(str::to_string).collect());
        let table = Self::from_parts(names, rows);
        debug!(rows = table.len(), columns = table.columns.len(), "Loaded CSV dataset");
        Ok(table)
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Names of the columns that can be analyzed as text
    pub fn text_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind == ColumnKind::Text)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Like [`Table::text_columns`], but an error when there are none
    pub fn require_text_columns(&self) -> Result<Vec<&str>> {
        let columns = self.text_columns();
        if columns.is_empty() {
            return Err(Error::NoTextColumns);
        }
        Ok(columns)
    }

    /// Raw value of a cell
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }

    /// The text of a cell as the analysis engines see it.
    ///
    /// Missing cells and cells of non-text columns are `None`, i.e. empty text.
    pub fn text_value(&self, row: usize, column: usize) -> Option<&str> {
        if self.columns.get(column)?.kind != ColumnKind::Text {
            return None;
        }
        let value = self.rows.get(row)?.get(column)?.as_str();
        if is_missing(value) {
            None
        } else {
            Some(value)
        }
    }

    /// Append a column, or overwrite the values of an existing one in place
    pub fn set_column(&mut self, name: &str, kind: ColumnKind, values: Vec<String>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(Error::LengthMismatch {
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        match self.column_index(name) {
            Some(index) => {
                self.columns[index].kind = kind;
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[index] = value;
                }
            }
            None => {
                self.columns.push(Column {
                    name: name.to_string(),
                    kind,
                });
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }

        Ok(())
    }

    /// Remove a column, returning whether it existed
    pub fn drop_column(&mut self, name: &str) -> bool {
        match self.column_index(name) {
            Some(index) => {
                self.columns.remove(index);
                for row in &mut self.rows {
                    row.remove(index);
                }
                true
            }
            None => false,
        }
    }

    /// A copy holding only the rows accepted by `keep`
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(&Row) -> bool,
    {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().filter(|row| keep(row)).cloned().collect(),
        }
    }

    /// The first `n` rows
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(writer);
        writer.write_record(self.columns.iter().map(|c| c.name.as_str()))?;
        for row in &self.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_csv(&mut buffer)?;
        String::from_utf8(buffer).map_err(|e| Error::Encoding(e.to_string()))
    }

    pub fn to_csv_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv(File::create(path)?)
    }
}

/// Name blank headers `Unnamed: i` and suffix repeated names with `.1`, `.2`, ...
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(headers.len());

    for (index, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}
