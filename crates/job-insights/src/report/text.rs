use super::{ChartSpec, RenderError, RenderOutcome, Renderer};
use std::io::{self, Write};

/// Prints any chart as a bordered two-column table.
pub struct TextRenderer<W> {
    writer: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, chart: &ChartSpec) -> Result<RenderOutcome, RenderError> {
        writeln!(self.writer, "\n{}", chart.title)?;
        let key_header = if chart.x_axis.is_empty() {
            chart.series.as_str()
        } else {
            chart.x_axis.as_str()
        };
        let count_header = if chart.y_axis.is_empty() {
            "count"
        } else {
            chart.y_axis.as_str()
        };

        let rows: Vec<Vec<String>> = chart
            .labels
            .iter()
            .zip(&chart.values)
            .map(|(label, value)| vec![label.clone(), value.to_string()])
            .collect();
        write_table(&mut self.writer, &[key_header, count_header], &rows)?;
        self.writer.flush()?;
        Ok(RenderOutcome::Printed)
    }
}

/// Writes `rows` under `headers` with column widths fitted to the content.
pub fn write_table<W: Write>(
    writer: &mut W,
    headers: &[&str],
    rows: &[Vec<String>],
) -> io::Result<()> {
    let mut widths: Vec<usize> = headers
        .iter()
        .map(|header| header.chars().count())
        .collect();
    for row in rows {
        for (index, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(index) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let border = widths
        .iter()
        .map(|width| "-".repeat(*width))
        .collect::<Vec<_>>()
        .join("+");

    writeln!(writer, "+{border}+")?;
    write_row(writer, headers.iter().copied(), &widths)?;
    writeln!(writer, "+{border}+")?;
    for row in rows {
        write_row(writer, row.iter().map(String::as_str), &widths)?;
    }
    writeln!(writer, "+{border}+")?;
    if rows.is_empty() {
        writeln!(writer, "(no rows)")?;
    }
    Ok(())
}

fn write_row<'a, W: Write>(
    writer: &mut W,
    cells: impl Iterator<Item = &'a str>,
    widths: &[usize],
) -> io::Result<()> {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}", width = *width))
        .collect::<Vec<_>>()
        .join("|");
    writeln!(writer, "|{line}|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::DisplayMode;

    fn chart(labels: &[&str], values: &[usize]) -> ChartSpec {
        ChartSpec {
            slug: "skills",
            mode: DisplayMode::Table,
            title: "Most demanded skills".to_string(),
            x_axis: "Skill".to_string(),
            y_axis: "no_repetitions".to_string(),
            series: "Skills".to_string(),
            labels: labels.iter().map(|label| label.to_string()).collect(),
            values: values.to_vec(),
        }
    }

    #[test]
    fn renders_aligned_rows() {
        let mut renderer = TextRenderer::new(Vec::new());
        let outcome = renderer
            .render(&chart(&["Java", "SQL"], &[12, 3]))
            .expect("renders");
        assert_eq!(outcome, RenderOutcome::Printed);

        let output = String::from_utf8(renderer.into_inner()).expect("utf8 output");
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[1], "Most demanded skills");
        assert_eq!(lines[2], "+-----+--------------+");
        assert_eq!(lines[3], "|Skill|no_repetitions|");
        assert_eq!(lines[5], "|Java |12            |");
        assert_eq!(lines[6], "|SQL  |3             |");
    }

    #[test]
    fn empty_chart_notes_missing_rows() {
        let mut renderer = TextRenderer::new(Vec::new());
        renderer.render(&chart(&[], &[])).expect("renders");
        let output = String::from_utf8(renderer.into_inner()).expect("utf8 output");
        assert!(output.ends_with("(no rows)\n"));
    }
}
