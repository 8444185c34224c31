mod chart;
mod text;
pub mod views;

pub use chart::SvgChartRenderer;
pub use text::{write_table, TextRenderer};

use crate::engine::AggregateResult;
use crate::insights::InsightKind;
use plotters::style::RGBColor;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write report output: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to draw chart '{chart}': {message}")]
    Draw { chart: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    Pie,
    Bar,
    Table,
}

impl DisplayMode {
    /// Canvas size in pixels for charted modes.
    pub const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Pie => (800, 600),
            Self::Bar | Self::Table => (1024, 768),
        }
    }
}

/// Slice colours for pie charts, reused cyclically past the fifth slice.
pub const PIE_PALETTE: [RGBColor; 5] = [
    RGBColor(226, 198, 20),
    RGBColor(203, 16, 46),
    RGBColor(80, 143, 160),
    RGBColor(180, 68, 50),
    RGBColor(66, 198, 20),
];

/// How one aggregate is presented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPlan {
    pub kind: InsightKind,
    pub mode: DisplayMode,
    /// `None` shows every group.
    pub top_n: Option<usize>,
    pub title: &'static str,
    pub x_axis: &'static str,
    pub y_axis: &'static str,
    pub series: &'static str,
}

impl ReportPlan {
    pub fn for_kind(kind: InsightKind) -> Self {
        match kind {
            InsightKind::Companies => Self {
                kind,
                mode: DisplayMode::Pie,
                top_n: Some(5),
                title: "Most demanding companies",
                x_axis: "",
                y_axis: "",
                series: "Jobs",
            },
            InsightKind::Titles => Self {
                kind,
                mode: DisplayMode::Bar,
                top_n: Some(10),
                title: "Most popular job titles",
                x_axis: "Job title",
                y_axis: "Demand",
                series: "Job demands",
            },
            InsightKind::Locations => Self {
                kind,
                mode: DisplayMode::Bar,
                top_n: Some(10),
                title: "Most popular area for jobs",
                x_axis: "Location",
                y_axis: "popularity",
                series: "Areas Popularity",
            },
            InsightKind::Skills => Self {
                kind,
                mode: DisplayMode::Table,
                top_n: None,
                title: "Most demanded skills",
                x_axis: "Skill",
                y_axis: "no_repetitions",
                series: "Skills",
            },
        }
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn standard() -> Vec<ReportPlan> {
        InsightKind::ordered()
            .into_iter()
            .map(Self::for_kind)
            .collect()
    }
}

/// Renderer input: parallel label/value sequences plus presentation details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub slug: &'static str,
    pub mode: DisplayMode,
    pub title: String,
    pub x_axis: String,
    pub y_axis: String,
    pub series: String,
    pub labels: Vec<String>,
    pub values: Vec<usize>,
}

impl ChartSpec {
    pub fn from_result(result: &AggregateResult, plan: &ReportPlan) -> Self {
        let entries = match plan.top_n {
            Some(limit) => result.top(limit),
            None => result.entries(),
        };

        Self {
            slug: plan.kind.slug(),
            mode: plan.mode,
            title: plan.title.to_string(),
            x_axis: plan.x_axis.to_string(),
            y_axis: plan.y_axis.to_string(),
            series: plan.series.to_string(),
            labels: entries.iter().map(|entry| entry.key.clone()).collect(),
            values: entries.iter().map(|entry| entry.count).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    Written(PathBuf),
    Printed,
}

pub trait Renderer {
    fn render(&mut self, chart: &ChartSpec) -> Result<RenderOutcome, RenderError>;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn render(&mut self, chart: &ChartSpec) -> Result<RenderOutcome, RenderError> {
        (**self).render(chart)
    }
}

/// Slices aggregates per plan and hands them to a renderer.
pub struct Reporter<R> {
    renderer: R,
}

impl<R: Renderer> Reporter<R> {
    pub fn new(renderer: R) -> Self {
        Self { renderer }
    }

    pub fn report(
        &mut self,
        result: &AggregateResult,
        plan: &ReportPlan,
    ) -> Result<RenderOutcome, RenderError> {
        let chart = ChartSpec::from_result(result, plan);
        tracing::debug!(
            chart = chart.slug,
            mode = ?chart.mode,
            shown = chart.values.len(),
            available = result.len(),
            "rendering aggregate"
        );
        self.renderer.render(&chart)
    }

    pub fn into_inner(self) -> R {
        self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::table_for_tests;
    use crate::engine::QueryEngine;
    use crate::insights::Aggregator;

    #[derive(Default)]
    struct RecordingRenderer {
        charts: Vec<ChartSpec>,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, chart: &ChartSpec) -> Result<RenderOutcome, RenderError> {
            self.charts.push(chart.clone());
            Ok(RenderOutcome::Printed)
        }
    }

    fn company_result(companies: usize) -> AggregateResult {
        let names: Vec<String> = (0..companies).map(|i| format!("Company{i:02}")).collect();
        let rows: Vec<[&str; 4]> = names
            .iter()
            .enumerate()
            .flat_map(|(i, name)| {
                std::iter::repeat([name.as_str(), "Developer", "Cairo", "Java"]).take(i + 1)
            })
            .collect();
        let table = table_for_tests(&rows);
        let engine = QueryEngine::open("test");
        Aggregator::new(&engine, &table)
            .count_by_company()
            .expect("company query")
    }

    #[test]
    fn pie_plan_keeps_top_five() {
        let result = company_result(8);
        let chart = ChartSpec::from_result(&result, &ReportPlan::for_kind(InsightKind::Companies));
        assert_eq!(chart.mode, DisplayMode::Pie);
        assert_eq!(chart.values, vec![8, 7, 6, 5, 4]);
        assert_eq!(chart.labels[0], "Company07");
    }

    #[test]
    fn short_results_render_every_group() {
        let result = company_result(3);
        let mut reporter = Reporter::new(RecordingRenderer::default());
        reporter
            .report(&result, &ReportPlan::for_kind(InsightKind::Titles))
            .expect("renders");
        let charts = reporter.into_inner().charts;
        assert_eq!(charts[0].values.len(), 3);
        assert_eq!(charts[0].labels.len(), charts[0].values.len());
    }

    #[test]
    fn table_plan_keeps_every_group() {
        let result = company_result(12);
        let chart = ChartSpec::from_result(&result, &ReportPlan::for_kind(InsightKind::Skills));
        assert_eq!(chart.mode, DisplayMode::Table);
        assert_eq!(chart.values.len(), 12);
    }

    #[test]
    fn mode_can_be_swapped_without_touching_aggregation() {
        let plan = ReportPlan::for_kind(InsightKind::Locations).with_mode(DisplayMode::Table);
        assert_eq!(plan.mode, DisplayMode::Table);
        assert_eq!(plan.top_n, Some(10));
    }
}
