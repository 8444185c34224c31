//! Grouped counting over a [`JobTable`] with polars lazy plans.
//!
//! Queries are typed values rather than query-language strings; a
//! [`QueryEngine`] session turns each one into a `LazyFrame` plan over the
//! table's frame and is released when closed or dropped.

mod result;

pub use result::{AggregateEntry, AggregateResult};

use crate::dataset::JobTable;
use polars::prelude::*;
use std::cell::Cell;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("table has no column named '{column}'")]
    UnknownColumn { column: String },
    #[error("query engine session '{session}' is already closed")]
    SessionClosed { session: String },
    #[error("group count failed: {0}")]
    Frame(#[from] PolarsError),
}

/// Name of the count column in every grouped plan.
const COUNT: &str = "count";

/// What a grouped count is keyed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    /// The raw value of one column.
    Column(String),
    /// Each delimited token of one column, trimmed; empty tokens are skipped.
    Exploded { column: String, delimiter: char },
}

impl GroupKey {
    pub fn column(&self) -> &str {
        match self {
            Self::Column(column) | Self::Exploded { column, .. } => column,
        }
    }
}

/// `GROUP BY key, COUNT(*) ORDER BY count DESC, key ASC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCountQuery {
    pub key: GroupKey,
}

impl GroupCountQuery {
    pub fn group_by(column: impl Into<String>) -> Self {
        Self {
            key: GroupKey::Column(column.into()),
        }
    }

    pub fn exploded(column: impl Into<String>, delimiter: char) -> Self {
        Self {
            key: GroupKey::Exploded {
                column: column.into(),
                delimiter,
            },
        }
    }
}

/// A query session. Single-threaded; open for the length of one analysis.
#[derive(Debug)]
pub struct QueryEngine {
    session: String,
    open: bool,
    queries_run: Cell<usize>,
}

impl QueryEngine {
    pub fn open(session: impl Into<String>) -> Self {
        let session = session.into();
        debug!(%session, "query engine session opened");
        Self {
            session,
            open: true,
            queries_run: Cell::new(0),
        }
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn queries_run(&self) -> usize {
        self.queries_run.get()
    }

    pub fn execute(
        &self,
        table: &JobTable,
        query: &GroupCountQuery,
    ) -> Result<AggregateResult, QueryError> {
        if !self.open {
            return Err(QueryError::SessionClosed {
                session: self.session.clone(),
            });
        }

        let column = query.key.column();
        if table.column_index(column).is_none() {
            return Err(QueryError::UnknownColumn {
                column: column.to_string(),
            });
        }

        let counted = group_plan(table.frame()?.clone().lazy(), &query.key)
            .group_by([col(column)])
            .agg([len().cast(DataType::UInt64).alias(COUNT)])
            .sort_by_exprs(
                [col(COUNT), col(column)],
                SortMultipleOptions::default().with_order_descending_multi([true, false]),
            )
            .collect()?;

        self.queries_run.set(self.queries_run.get() + 1);
        let result = AggregateResult::from_frame(&counted, column, COUNT)?;
        debug!(
            session = %self.session,
            column,
            groups = result.len(),
            "group count executed"
        );
        Ok(result)
    }

    /// Releases the session. Later queries fail with
    /// [`QueryError::SessionClosed`].
    pub fn close(&mut self) {
        if self.open {
            self.open = false;
            info!(
                session = %self.session,
                queries = self.queries_run.get(),
                "query engine session closed"
            );
        }
    }
}

impl Drop for QueryEngine {
    fn drop(&mut self) {
        self.close();
    }
}

/// Projects the key column, one row per group member.
fn group_plan(frame: LazyFrame, key: &GroupKey) -> LazyFrame {
    match key {
        GroupKey::Column(column) => frame.select([col(column.as_str())]),
        GroupKey::Exploded { column, delimiter } => {
            let column = column.as_str();
            frame
                .select([col(column).str().split(lit(delimiter.to_string()))])
                .explode([col(column)])
                .select([col(column).str().strip_chars(lit(NULL))])
                .filter(col(column).neq(lit("")))
        }
    }
}
