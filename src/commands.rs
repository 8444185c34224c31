use chrono::Local;
use clap::builder::RangedU64ValueParser;
use clap::Args;
use job_insights::config::AppConfig;
use job_insights::dataset::{self, CleanStats};
use job_insights::error::AppError;
use job_insights::pipeline::{self, JobMarketAnalysis};
use job_insights::report::{
    write_table, DisplayMode, RenderOutcome, ReportPlan, Reporter, SvgChartRenderer, TextRenderer,
};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ReportArgs {
    /// Listings CSV export (defaults to APP_DATA_PATH)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Directory for SVG charts (defaults to APP_CHART_DIR)
    #[arg(long)]
    pub(crate) chart_dir: Option<PathBuf>,
    /// Print every aggregate as a text table instead of drawing charts
    #[arg(long)]
    pub(crate) text_only: bool,
    /// Print the report summary as JSON
    #[arg(long, conflicts_with = "text_only")]
    pub(crate) json: bool,
    /// Rows shown per aggregate table (defaults to APP_PREVIEW_ROWS)
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub(crate) rows: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InspectArgs {
    /// Listings CSV export (defaults to APP_DATA_PATH)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Number of rows to preview (defaults to APP_PREVIEW_ROWS)
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub(crate) rows: Option<usize>,
}

pub(crate) fn run_report(args: ReportArgs, config: AppConfig) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_report(args, config, &mut out)?;
    out.flush()?;
    Ok(())
}

pub(crate) fn run_inspect(args: InspectArgs, config: AppConfig) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_inspect(args, config, &mut out)?;
    out.flush()?;
    Ok(())
}

fn write_report<W: Write>(
    args: ReportArgs,
    mut config: AppConfig,
    out: &mut W,
) -> Result<(), AppError> {
    let ReportArgs {
        input,
        chart_dir,
        text_only,
        json,
        rows,
    } = args;

    if let Some(input) = input {
        config.data.input_path = input;
    }
    if let Some(chart_dir) = chart_dir {
        config.report.chart_dir = chart_dir;
    }
    let rows = rows.unwrap_or(config.report.preview_rows);

    let source = config.data.input_path.display().to_string();
    let analysis = pipeline::analyze_path(&config.data.input_path)?;
    let plans = ReportPlan::standard();

    if json {
        let report = analysis.summary(source, &plans);
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    render_overview(out, &analysis, &source, &plans, rows, !text_only)?;

    let outcomes = if text_only {
        let mut reporter = Reporter::new(TextRenderer::new(&mut *out));
        analysis.render(&mut reporter, &plans)?
    } else {
        let renderer = SvgChartRenderer::with_tables(&config.report.chart_dir, &mut *out);
        let mut reporter = Reporter::new(renderer);
        analysis.render(&mut reporter, &plans)?
    };

    for outcome in outcomes {
        if let RenderOutcome::Written(path) = outcome {
            writeln!(out, "Chart written to {}", path.display())?;
        }
    }

    info!(source = %source, "report finished");
    Ok(())
}

fn write_inspect<W: Write>(
    args: InspectArgs,
    mut config: AppConfig,
    out: &mut W,
) -> Result<(), AppError> {
    let InspectArgs { input, rows } = args;
    if let Some(input) = input {
        config.data.input_path = input;
    }
    let rows = rows.unwrap_or(config.report.preview_rows);

    let table = dataset::load_path(&config.data.input_path)?;

    writeln!(out, "Job listings export: {}", config.data.input_path.display())?;
    writeln!(out, "\nSchema")?;
    for column in table.schema().columns {
        let marker = if column.required { " (required)" } else { "" };
        writeln!(out, "- {}: string{}", column.name, marker)?;
    }

    let preview = table.preview(rows);
    writeln!(out, "\nFirst {} of {} rows", preview.len(), table.len())?;
    let headers: Vec<&str> = table.headers().iter().map(String::as_str).collect();
    write_table(out, &headers, preview)?;

    let (_, stats) = dataset::clean(table)?;
    write_clean_stats(out, &stats)?;
    Ok(())
}

/// Header, clean statistics and, in chart mode, the top rows of every
/// aggregate that is drawn. Table-mode aggregates are left to the renderer.
fn render_overview<W: Write>(
    out: &mut W,
    analysis: &JobMarketAnalysis,
    source: &str,
    plans: &[ReportPlan],
    rows: usize,
    show_tables: bool,
) -> Result<(), AppError> {
    writeln!(out, "Job market report")?;
    writeln!(
        out,
        "Source: {} (evaluated {})",
        source,
        Local::now().format("%Y-%m-%d %H:%M")
    )?;
    write_clean_stats(out, &analysis.clean_stats())?;

    if !show_tables {
        return Ok(());
    }

    for plan in plans.iter().filter(|plan| plan.mode != DisplayMode::Table) {
        let Some(result) = analysis.result(plan.kind) else {
            continue;
        };
        let shown = result.top(rows);
        writeln!(
            out,
            "\n{} (top {} of {} groups)",
            plan.kind.label(),
            shown.len(),
            result.len()
        )?;
        let table_rows: Vec<Vec<String>> = shown
            .iter()
            .map(|entry| vec![entry.key.clone(), entry.count.to_string()])
            .collect();
        write_table(out, &[plan.kind.column().header(), "count"], &table_rows)?;
    }
    Ok(())
}

fn write_clean_stats<W: Write>(out: &mut W, stats: &CleanStats) -> io::Result<()> {
    writeln!(out, "\nCleaning")?;
    writeln!(out, "- rows loaded: {}", stats.rows_in)?;
    writeln!(out, "- duplicates dropped: {}", stats.duplicates_dropped)?;
    writeln!(out, "- incomplete rows dropped: {}", stats.incomplete_dropped)?;
    writeln!(out, "- rows analysed: {}", stats.rows_out)
}
