use polars::prelude::{DataFrame, PolarsResult};
use serde::Serialize;

/// One group of a grouped count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateEntry {
    pub key: String,
    pub count: usize,
}

/// Group counts ordered by count descending, then key ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AggregateResult {
    entries: Vec<AggregateEntry>,
}

impl AggregateResult {
    /// Reads `(key, count)` rows from an already sorted grouped frame.
    pub(crate) fn from_frame(frame: &DataFrame, key: &str, count: &str) -> PolarsResult<Self> {
        let keys = frame.column(key)?.as_materialized_series().str()?;
        let counts = frame.column(count)?.as_materialized_series().u64()?;
        let entries = keys
            .into_iter()
            .zip(counts.into_iter())
            .filter_map(|(key, count)| {
                Some(AggregateEntry {
                    key: key?.to_string(),
                    count: usize::try_from(count?).ok()?,
                })
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[AggregateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all group counts.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// The leading `limit` groups, or every group when there are fewer.
    pub fn top(&self, limit: usize) -> &[AggregateEntry] {
        &self.entries[..limit.min(self.entries.len())]
    }

    pub fn count_for(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.count)
    }
}
