use crate::dataset::{JobColumn, JobTable};
use crate::engine::{AggregateResult, GroupCountQuery, QueryEngine, QueryError};
use serde::Serialize;

/// Separator between skill tokens in the `Skills` column.
pub const SKILL_DELIMITER: char = ',';

/// The four demand statistics computed for a listings export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    Companies,
    Titles,
    Locations,
    Skills,
}

impl InsightKind {
    pub const fn ordered() -> [InsightKind; 4] {
        [Self::Companies, Self::Titles, Self::Locations, Self::Skills]
    }

    pub const fn column(self) -> JobColumn {
        match self {
            Self::Companies => JobColumn::Company,
            Self::Titles => JobColumn::Title,
            Self::Locations => JobColumn::Location,
            Self::Skills => JobColumn::Skills,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Companies => "Jobs per company",
            Self::Titles => "Demand per job title",
            Self::Locations => "Popularity per location",
            Self::Skills => "Demand per skill",
        }
    }

    pub const fn slug(self) -> &'static str {
        match self {
            Self::Companies => "companies",
            Self::Titles => "titles",
            Self::Locations => "locations",
            Self::Skills => "skills",
        }
    }

    pub fn query(self) -> GroupCountQuery {
        match self {
            Self::Skills => GroupCountQuery::exploded(self.column().header(), SKILL_DELIMITER),
            _ => GroupCountQuery::group_by(self.column().header()),
        }
    }
}

/// Runs the demand queries against one cleaned table through a borrowed
/// engine session.
#[derive(Debug, Clone, Copy)]
pub struct Aggregator<'a> {
    engine: &'a QueryEngine,
    table: &'a JobTable,
}

impl<'a> Aggregator<'a> {
    pub fn new(engine: &'a QueryEngine, table: &'a JobTable) -> Self {
        Self { engine, table }
    }

    pub fn count_by_company(&self) -> Result<AggregateResult, QueryError> {
        self.run(InsightKind::Companies)
    }

    pub fn count_by_title(&self) -> Result<AggregateResult, QueryError> {
        self.run(InsightKind::Titles)
    }

    pub fn count_by_location(&self) -> Result<AggregateResult, QueryError> {
        self.run(InsightKind::Locations)
    }

    pub fn count_by_skill(&self) -> Result<AggregateResult, QueryError> {
        self.run(InsightKind::Skills)
    }

    pub fn run(&self, kind: InsightKind) -> Result<AggregateResult, QueryError> {
        let result = self.engine.execute(self.table, &kind.query())?;
        tracing::info!(
            insight = kind.slug(),
            groups = result.len(),
            total = result.total(),
            "aggregate computed"
        );
        Ok(result)
    }
}
