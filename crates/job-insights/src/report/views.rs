use super::{DisplayMode, ReportPlan};
use crate::dataset::CleanStats;
use crate::engine::{AggregateEntry, AggregateResult};
use crate::insights::InsightKind;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AggregateView {
    pub insight: InsightKind,
    pub label: &'static str,
    pub mode: DisplayMode,
    pub groups: usize,
    pub total: usize,
    pub entries: Vec<AggregateEntry>,
}

impl AggregateView {
    pub fn new(result: &AggregateResult, plan: &ReportPlan) -> Self {
        let entries = match plan.top_n {
            Some(limit) => result.top(limit),
            None => result.entries(),
        };

        Self {
            insight: plan.kind,
            label: plan.kind.label(),
            mode: plan.mode,
            groups: result.len(),
            total: result.total(),
            entries: entries.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct JobMarketReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub clean: CleanStats,
    pub aggregates: Vec<AggregateView>,
}
