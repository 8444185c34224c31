use super::text::TextRenderer;
use super::{ChartSpec, DisplayMode, RenderError, RenderOutcome, Renderer, PIE_PALETTE};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::element::Pie;
use plotters::prelude::*;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const FONT: &str = "sans-serif";
const BAR_COLOR: RGBColor = RGBColor(80, 143, 160);

/// Draws pie and bar charts as SVG files under one directory. Table-mode
/// aggregates are printed to the table writer (stdout by default) instead.
pub struct SvgChartRenderer<W = io::Stdout> {
    dir: PathBuf,
    tables: TextRenderer<W>,
}

impl SvgChartRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_tables(dir, io::stdout())
    }
}

impl<W: Write> SvgChartRenderer<W> {
    pub fn with_tables(dir: impl Into<PathBuf>, tables: W) -> Self {
        Self {
            dir: dir.into(),
            tables: TextRenderer::new(tables),
        }
    }

    pub fn into_tables(self) -> W {
        self.tables.into_inner()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, chart: &ChartSpec) -> PathBuf {
        self.dir.join(format!("{}.svg", chart.slug))
    }
}

impl<W: Write> Renderer for SvgChartRenderer<W> {
    fn render(&mut self, chart: &ChartSpec) -> Result<RenderOutcome, RenderError> {
        if chart.mode == DisplayMode::Table {
            return self.tables.render(chart);
        }

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(chart);
        {
            let root = SVGBackend::new(&path, chart.mode.dimensions()).into_drawing_area();
            root.fill(&WHITE).map_err(draw_failed(chart.slug))?;
            match chart.mode {
                DisplayMode::Pie => draw_pie(&root, chart)?,
                _ => draw_bar(&root, chart)?,
            }
            root.present().map_err(draw_failed(chart.slug))?;
        }

        info!(chart = chart.slug, path = %path.display(), "chart written");
        Ok(RenderOutcome::Written(path))
    }
}

fn draw_pie(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &ChartSpec,
) -> Result<(), RenderError> {
    let area = root
        .titled(&chart.title, (FONT, 28).into_font())
        .map_err(draw_failed(chart.slug))?;

    let sizes: Vec<f64> = chart.values.iter().map(|value| *value as f64).collect();
    if sizes.iter().sum::<f64>() <= 0.0 {
        return Ok(());
    }

    let (width, height) = area.dim_in_pixel();
    let center = (width as i32 / 2, height as i32 / 2);
    let radius = f64::from(width.min(height)) * 0.35;
    let colors: Vec<RGBColor> = (0..sizes.len())
        .map(|index| PIE_PALETTE[index % PIE_PALETTE.len()])
        .collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &chart.labels);
    pie.start_angle(-90.0);
    pie.label_style((FONT, 16).into_font().color(&BLACK));
    pie.percentages((FONT, 14).into_font().color(&WHITE));
    area.draw(&pie).map_err(draw_failed(chart.slug))?;
    Ok(())
}

/// Single stacked series with value annotations and the legend in the
/// upper-left corner.
fn draw_bar(
    root: &DrawingArea<SVGBackend<'_>, Shift>,
    chart: &ChartSpec,
) -> Result<(), RenderError> {
    let categories = chart.labels.len().max(1) as u32;
    let values: Vec<u32> = chart
        .values
        .iter()
        .map(|value| u32::try_from(*value).unwrap_or(u32::MAX))
        .collect();
    let peak = values.iter().copied().max().unwrap_or(0);
    let ceiling = peak.saturating_add((peak / 8).max(1));

    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, (FONT, 28).into_font())
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d((0u32..categories).into_segmented(), 0u32..ceiling)
        .map_err(draw_failed(chart.slug))?;

    let label_for = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(index) => chart
            .labels
            .get(*index as usize)
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    };

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(chart.labels.len().max(1))
        .x_label_formatter(&label_for)
        .x_desc(chart.x_axis.as_str())
        .y_desc(chart.y_axis.as_str())
        .axis_desc_style((FONT, 16).into_font())
        .draw()
        .map_err(draw_failed(chart.slug))?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(BAR_COLOR.filled())
            .margin(12)
            .data(
                values
                    .iter()
                    .enumerate()
                    .map(|(index, value)| (index as u32, *value)),
            ),
    )
    .map_err(draw_failed(chart.slug))?
    .label(chart.series.as_str())
    .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BAR_COLOR.filled()));

    ctx.draw_series(values.iter().enumerate().map(|(index, value)| {
        EmptyElement::at((SegmentValue::CenterOf(index as u32), *value))
            + Text::new(value.to_string(), (-6, -18), (FONT, 14).into_font())
    }))
    .map_err(draw_failed(chart.slug))?;

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_failed(chart.slug))?;

    Ok(())
}

fn draw_failed(chart: &'static str) -> impl Fn(DrawingAreaErrorKind<io::Error>) -> RenderError {
    move |err| RenderError::Draw {
        chart: chart.to_string(),
        message: err.to_string(),
    }
}
