mod cleaner;
mod loader;

pub use cleaner::{clean, CleanStats};
pub use loader::{load_path, load_reader};

use polars::prelude::{Column, DataFrame, PolarsError, PolarsResult};
use serde::Serialize;
use std::cell::OnceCell;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read job listings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid job listings CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("job listings are missing required column '{column}'")]
    MissingColumn { column: &'static str },
    #[error("row {row} has {found} fields but the header declares {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("failed to process job listings frame: {0}")]
    Frame(#[from] PolarsError),
}

/// Columns every job listings export must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobColumn {
    Company,
    Title,
    Location,
    Skills,
}

impl JobColumn {
    pub const fn ordered() -> [JobColumn; 4] {
        [Self::Company, Self::Title, Self::Location, Self::Skills]
    }

    pub const fn header(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Title => "Title",
            Self::Location => "Location",
            Self::Skills => "Skills",
        }
    }

    const fn slot(self) -> usize {
        match self {
            Self::Company => 0,
            Self::Title => 1,
            Self::Location => 2,
            Self::Skills => 3,
        }
    }
}

/// A loaded listings export: the header row plus string-valued rows.
///
/// Extra columns beyond [`JobColumn`] are kept as-is so cleaning compares
/// whole rows. The polars frame over the same rows is built on first use.
#[derive(Debug, Clone)]
pub struct JobTable {
    headers: Vec<String>,
    required: [usize; 4],
    rows: Vec<Vec<String>>,
    frame: OnceCell<DataFrame>,
}

impl JobTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, LoadError> {
        let mut required = [0usize; 4];
        for column in JobColumn::ordered() {
            required[column.slot()] = headers
                .iter()
                .position(|header| header == column.header())
                .ok_or(LoadError::MissingColumn {
                    column: column.header(),
                })?;
        }

        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != headers.len())
            .map(|(index, row)| (index + 1, row.len()))
        {
            return Err(LoadError::RowWidth {
                row,
                expected: headers.len(),
                found,
            });
        }

        Ok(Self {
            headers,
            required,
            rows,
            frame: OnceCell::new(),
        })
    }

    /// Rebuilds a table from a frame holding the same string columns.
    pub(crate) fn from_frame(
        headers: Vec<String>,
        required: [usize; 4],
        frame: DataFrame,
    ) -> PolarsResult<Self> {
        let mut rows = vec![Vec::with_capacity(headers.len()); frame.height()];
        for header in &headers {
            let values = frame.column(header)?.as_materialized_series().str()?;
            for (row, value) in rows.iter_mut().zip(values.into_iter()) {
                row.push(value.unwrap_or_default().to_string());
            }
        }

        Ok(Self {
            headers,
            required,
            rows,
            frame: OnceCell::from(frame),
        })
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

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Values of one column in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index).map(String::as_str))
    }

    pub fn records(&self) -> impl Iterator<Item = JobRecord<'_>> + '_ {
        self.rows.iter().map(move |row| JobRecord {
            required: &self.required,
            row,
        })
    }

    pub fn preview(&self, limit: usize) -> &[Vec<String>] {
        &self.rows[..limit.min(self.rows.len())]
    }

    /// One string column per header, in header order.
    pub fn frame(&self) -> PolarsResult<&DataFrame> {
        if let Some(frame) = self.frame.get() {
            return Ok(frame);
        }
        let columns = self
            .headers
            .iter()
            .enumerate()
            .map(|(index, header)| {
                let values: Vec<&str> = self.column_values(index).collect();
                Column::new(header.as_str().into(), values)
            })
            .collect();
        let frame = DataFrame::new(columns)?;
        Ok(self.frame.get_or_init(|| frame))
    }

    pub fn schema(&self) -> DatasetSchema {
        DatasetSchema {
            columns: self
                .headers
                .iter()
                .map(|name| SchemaColumn {
                    name: name.clone(),
                    required: JobColumn::ordered()
                        .iter()
                        .any(|column| column.header() == name),
                })
                .collect(),
        }
    }
}

/// Borrowed view over one listing.
#[derive(Debug, Clone, Copy)]
pub struct JobRecord<'a> {
    required: &'a [usize; 4],
    row: &'a [String],
}

impl<'a> JobRecord<'a> {
    pub fn get(&self, column: JobColumn) -> &'a str {
        &self.row[self.required[column.slot()]]
    }

    pub fn company(&self) -> &'a str {
        self.get(JobColumn::Company)
    }

    pub fn title(&self) -> &'a str {
        self.get(JobColumn::Title)
    }

    pub fn location(&self) -> &'a str {
        self.get(JobColumn::Location)
    }

    pub fn skills(&self) -> &'a str {
        self.get(JobColumn::Skills)
    }

    pub fn fields(&self) -> &'a [String] {
        self.row
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSchema {
    pub columns: Vec<SchemaColumn>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SchemaColumn {
    pub name: String,
    pub required: bool,
}

#[cfg(test)]
pub(crate) fn table_for_tests(rows: &[[&str; 4]]) -> JobTable {
    let headers = JobColumn::ordered()
        .iter()
        .map(|column| column.header().to_string())
        .collect();
    let rows = rows
        .iter()
        .map(|row| row.iter().map(|value| value.to_string()).collect())
        .collect();
    JobTable::new(headers, rows).expect("test table is well formed")
}
