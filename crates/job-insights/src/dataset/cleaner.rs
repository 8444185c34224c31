use super::{JobTable, LoadError};
use polars::prelude::*;
use serde::Serialize;
use tracing::info;

/// Row accounting for one cleaning pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanStats {
    pub rows_in: usize,
    pub duplicates_dropped: usize,
    pub incomplete_dropped: usize,
    pub rows_out: usize,
}

/// Drops exact duplicate rows (first occurrence wins) and any row with an
/// empty field. Surviving rows keep their input order.
pub fn clean(table: JobTable) -> Result<(JobTable, CleanStats), LoadError> {
    let frame = table.frame()?.clone();
    let filled = all_filled(table.headers());
    let JobTable {
        headers, required, ..
    } = table;

    let rows_in = frame.height();
    let deduped = frame
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    let unique_rows = deduped.height();
    let complete = deduped.lazy().drop_nulls(None).filter(filled).collect()?;

    let stats = CleanStats {
        rows_in,
        duplicates_dropped: rows_in - unique_rows,
        incomplete_dropped: unique_rows - complete.height(),
        rows_out: complete.height(),
    };
    info!(
        rows_in = stats.rows_in,
        duplicates = stats.duplicates_dropped,
        incomplete = stats.incomplete_dropped,
        rows_out = stats.rows_out,
        "cleaned job listings"
    );

    let cleaned = JobTable::from_frame(headers, required, complete)?;
    Ok((cleaned, stats))
}

/// True when every column holds something other than whitespace.
fn all_filled(headers: &[String]) -> Expr {
    headers
        .iter()
        .map(|header| {
            col(header.as_str())
                .str()
                .strip_chars(lit(NULL))
                .neq(lit(""))
        })
        .reduce(|all, filled| all.and(filled))
        .unwrap_or_else(|| lit(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table_for_tests;
    use std::collections::HashSet;

    #[test]
    fn identical_rows_collapse_to_one() {
        let table = table_for_tests(&[
            ["Acme", "Developer", "Cairo", "Java"],
            ["Acme", "Developer", "Cairo", "Java"],
        ]);
        let (cleaned, stats) = clean(table).expect("table cleans");
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.duplicates_dropped, 1);
        assert_eq!(stats.incomplete_dropped, 0);
    }

    #[test]
    fn rows_with_empty_location_are_dropped() {
        let table = table_for_tests(&[
            ["Acme", "Developer", "", "Java"],
            ["Acme", "Tester", "Giza", "Selenium"],
        ]);
        let (cleaned, stats) = clean(table).expect("table cleans");
        assert_eq!(cleaned.len(), 1);
        assert_eq!(stats.incomplete_dropped, 1);
        assert!(cleaned.records().all(|record| record.location() == "Giza"));
    }

    #[test]
    fn output_has_no_duplicates_or_blank_fields() {
        let table = table_for_tests(&[
            ["Acme", "Developer", "Cairo", "Java"],
            ["Beta", "Analyst", "Giza", " "],
            ["Acme", "Developer", "Cairo", "Java"],
            ["Beta", "Analyst", "Giza", "SQL"],
            ["Beta", "Analyst", "Giza", " "],
        ]);
        let (cleaned, stats) = clean(table).expect("table cleans");

        let unique: HashSet<_> = cleaned.rows().iter().collect();
        assert_eq!(unique.len(), cleaned.len());
        assert!(cleaned
            .rows()
            .iter()
            .all(|row| row.iter().all(|value| !value.trim().is_empty())));
        assert_eq!(
            stats,
            CleanStats {
                rows_in: 5,
                duplicates_dropped: 2,
                incomplete_dropped: 1,
                rows_out: 2,
            }
        );
    }

    #[test]
    fn preserves_input_order() {
        let table = table_for_tests(&[
            ["Zeta", "Developer", "Cairo", "Java"],
            ["Alpha", "Developer", "Cairo", "Java"],
        ]);
        let (cleaned, _) = clean(table).expect("table cleans");
        let companies: Vec<_> = cleaned.records().map(|record| record.company()).collect();
        assert_eq!(companies, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn whitespace_only_extra_column_drops_the_row() {
        let table = JobTable::new(
            ["Company", "Title", "Location", "Skills", "Level"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            vec![
                ["Acme", "Developer", "Cairo", "Java", "\t "]
                    .iter()
                    .map(|value| value.to_string())
                    .collect(),
                ["Acme", "Developer", "Cairo", "Java", "Senior"]
                    .iter()
                    .map(|value| value.to_string())
                    .collect(),
            ],
        )
        .expect("table builds");
        let (cleaned, stats) = clean(table).expect("table cleans");
        assert_eq!(stats.incomplete_dropped, 1);
        assert_eq!(cleaned.rows()[0][4], "Senior");
        assert_eq!(cleaned.frame().expect("frame kept").height(), 1);
    }

    #[test]
    fn empty_table_cleans_to_empty() {
        let (cleaned, stats) = clean(table_for_tests(&[])).expect("table cleans");
        assert!(cleaned.is_empty());
        assert_eq!(stats, CleanStats::default());
    }
}
