//! Load, clean, aggregate and report, in that order.

use crate::dataset::{self, CleanStats, JobTable};
use crate::engine::{AggregateResult, QueryEngine};
use crate::error::AppError;
use crate::insights::{Aggregator, InsightKind};
use crate::report::views::{AggregateView, JobMarketReport};
use crate::report::{RenderError, RenderOutcome, Renderer, ReportPlan, Reporter};
use chrono::Utc;
use std::path::Path;
use tracing::info;

const SESSION: &str = "job-insights";

/// A cleaned table and its four demand aggregates.
#[derive(Debug)]
pub struct JobMarketAnalysis {
    table: JobTable,
    clean: CleanStats,
    results: Vec<(InsightKind, AggregateResult)>,
}

impl JobMarketAnalysis {
    pub fn table(&self) -> &JobTable {
        &self.table
    }

    pub fn clean_stats(&self) -> CleanStats {
        self.clean
    }

    pub fn results(&self) -> &[(InsightKind, AggregateResult)] {
        &self.results
    }

    pub fn result(&self, kind: InsightKind) -> Option<&AggregateResult> {
        self.results
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, result)| result)
    }

    /// Renders every aggregate that has a plan, in plan order.
    pub fn render<R: Renderer>(
        &self,
        reporter: &mut Reporter<R>,
        plans: &[ReportPlan],
    ) -> Result<Vec<RenderOutcome>, RenderError> {
        let mut outcomes = Vec::with_capacity(plans.len());
        for plan in plans {
            if let Some(result) = self.result(plan.kind) {
                outcomes.push(reporter.report(result, plan)?);
            }
        }
        Ok(outcomes)
    }

    pub fn summary(&self, source: impl Into<String>, plans: &[ReportPlan]) -> JobMarketReport {
        let aggregates = plans
            .iter()
            .filter_map(|plan| {
                self.result(plan.kind)
                    .map(|result| AggregateView::new(result, plan))
            })
            .collect();

        JobMarketReport {
            generated_at: Utc::now(),
            source: source.into(),
            clean: self.clean,
            aggregates,
        }
    }
}

/// Cleans `raw` and runs the four demand queries inside one engine session.
pub fn analyze(raw: JobTable) -> Result<JobMarketAnalysis, AppError> {
    let (table, clean) = dataset::clean(raw)?;

    let mut engine = QueryEngine::open(SESSION);
    let results = {
        let aggregator = Aggregator::new(&engine, &table);
        InsightKind::ordered()
            .into_iter()
            .map(|kind| aggregator.run(kind).map(|result| (kind, result)))
            .collect::<Result<Vec<_>, _>>()?
    };
    engine.close();

    info!(
        rows = table.len(),
        aggregates = results.len(),
        "job market analysis complete"
    );

    Ok(JobMarketAnalysis {
        table,
        clean,
        results,
    })
}

pub fn analyze_path<P: AsRef<Path>>(path: P) -> Result<JobMarketAnalysis, AppError> {
    analyze(dataset::load_path(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table_for_tests;
    use crate::report::{ChartSpec, DisplayMode};

    #[derive(Default)]
    struct CollectingRenderer {
        modes: Vec<DisplayMode>,
    }

    impl Renderer for CollectingRenderer {
        fn render(&mut self, chart: &ChartSpec) -> Result<RenderOutcome, RenderError> {
            self.modes.push(chart.mode);
            Ok(RenderOutcome::Printed)
        }
    }

    fn analysis() -> JobMarketAnalysis {
        analyze(table_for_tests(&[
            ["CompanyA", "Developer", "Cairo", "Java,SQL"],
            ["CompanyA", "Analyst", "Giza", "Python"],
            ["CompanyA", "Analyst", "Giza", "Python"],
            ["CompanyB", "Developer", "", "Java"],
            ["CompanyB", "Developer", "Cairo", "Java"],
        ]))
        .expect("analysis runs")
    }

    #[test]
    fn analysis_cleans_before_aggregating() {
        let analysis = analysis();
        assert_eq!(analysis.table().len(), 3);
        assert_eq!(analysis.clean_stats().duplicates_dropped, 1);
        assert_eq!(analysis.clean_stats().incomplete_dropped, 1);

        let companies = analysis
            .result(InsightKind::Companies)
            .expect("company aggregate");
        assert_eq!(companies.count_for("CompanyA"), Some(2));
        assert_eq!(companies.count_for("CompanyB"), Some(1));
        assert_eq!(analysis.results().len(), 4);
    }

    #[test]
    fn render_follows_standard_plans() {
        let analysis = analysis();
        let mut reporter = Reporter::new(CollectingRenderer::default());
        let outcomes = analysis
            .render(&mut reporter, &ReportPlan::standard())
            .expect("renders");
        assert_eq!(outcomes.len(), 4);
        assert_eq!(
            reporter.into_inner().modes,
            vec![
                DisplayMode::Pie,
                DisplayMode::Bar,
                DisplayMode::Bar,
                DisplayMode::Table
            ]
        );
    }

    #[test]
    fn summary_serializes_each_aggregate() {
        let analysis = analysis();
        let report: JobMarketReport = analysis.summary("inline", &ReportPlan::standard());
        assert_eq!(report.aggregates.len(), 4);
        let json = serde_json::to_value(&report).expect("report serializes");

        assert_eq!(json["source"], "inline");
        assert_eq!(json["clean"]["rows_out"], 3);
        assert_eq!(json["aggregates"][0]["insight"], "companies");
        assert_eq!(json["aggregates"][0]["mode"], "pie");
        assert_eq!(json["aggregates"][3]["total"], 4);
    }
}
