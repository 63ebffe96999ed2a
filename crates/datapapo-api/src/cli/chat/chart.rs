//! Glyph chart rendering for the terminal.
//!
//! Draws the agent's declarative [`ChartSpec`] with Unicode block glyphs:
//! horizontal bars for bar/histogram charts, sparklines for line/scatter
//! charts. No plotting backend -- just styled text, consistent with the
//! rest of the chat output.

use console::style;

use datapapo_types::chart::{ChartKind, ChartSpec};

/// Maximum width of a bar, in glyph cells.
const MAX_BAR_WIDTH: usize = 40;

/// Glyph ramp for sparklines, lowest to highest.
const SPARK_GLYPHS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a chart spec as styled terminal text.
///
/// Callers should verify `spec.is_renderable()` first; unrenderable specs
/// produce only the header.
pub fn render_chart(spec: &ChartSpec) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n  {}\n", style(&spec.title).cyan().bold()));
    if let (Some(x), Some(y)) = (&spec.x_label, &spec.y_label) {
        out.push_str(&format!("  {}\n", style(format!("{x} × {y}")).dim()));
    }

    match spec.kind {
        ChartKind::Bar | ChartKind::Histogram => render_bars(spec, &mut out),
        ChartKind::Line | ChartKind::Scatter => render_sparklines(spec, &mut out),
    }

    out
}

/// Horizontal bars, one row per category (per series when multiple).
fn render_bars(spec: &ChartSpec, out: &mut String) {
    let max_value = spec
        .series
        .iter()
        .flat_map(|s| s.values.iter().copied())
        .fold(0.0_f64, f64::max);

    let label_width = spec
        .categories
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);

    for series in &spec.series {
        if spec.series.len() > 1 {
            out.push_str(&format!("\n  {}\n", style(&series.name).bold()));
        } else {
            out.push('\n');
        }

        for (category, value) in spec.categories.iter().zip(&series.values) {
            let width = if max_value > 0.0 && *value > 0.0 {
                ((value / max_value) * MAX_BAR_WIDTH as f64).round().max(1.0) as usize
            } else {
                0
            };
            let bar: String = "█".repeat(width);
            out.push_str(&format!(
                "  {category:>label_width$} {} {}\n",
                style(bar).cyan(),
                style(format_value(*value)).dim(),
            ));
        }
    }
}

/// One sparkline row per series, scaled over the series' own range.
fn render_sparklines(spec: &ChartSpec, out: &mut String) {
    out.push('\n');
    for series in &spec.series {
        let min = series.values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = series
            .values
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;

        let spark: String = series
            .values
            .iter()
            .map(|v| {
                let idx = if range > 0.0 {
                    (((v - min) / range) * (SPARK_GLYPHS.len() - 1) as f64).round() as usize
                } else {
                    0
                };
                SPARK_GLYPHS[idx.min(SPARK_GLYPHS.len() - 1)]
            })
            .collect();

        out.push_str(&format!(
            "  {} {} {}\n",
            style(&series.name).bold(),
            style(spark).cyan(),
            style(format!("({} .. {})", format_value(min), format_value(max))).dim(),
        ));
    }

    if let (Some(first), Some(last)) = (spec.categories.first(), spec.categories.last()) {
        out.push_str(&format!("  {}\n", style(format!("{first} → {last}")).dim()));
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e12 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datapapo_types::chart::ChartSeries;

    fn bar_spec() -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Bar,
            title: "Contagem por cidade".to_string(),
            x_label: Some("cidade".to_string()),
            y_label: Some("contagem".to_string()),
            categories: vec!["Recife".to_string(), "Natal".to_string()],
            series: vec![ChartSeries {
                name: "contagem".to_string(),
                values: vec![40.0, 10.0],
            }],
        }
    }

    #[test]
    fn test_bar_chart_contains_title_and_labels() {
        let rendered = render_chart(&bar_spec());
        assert!(rendered.contains("Contagem por cidade"));
        assert!(rendered.contains("cidade × contagem"));
        assert!(rendered.contains("Recife"));
        assert!(rendered.contains("Natal"));
    }

    #[test]
    fn test_bar_chart_scales_to_max() {
        let rendered = render_chart(&bar_spec());
        // The max value fills MAX_BAR_WIDTH glyphs; the smaller one a quarter.
        let full: String = "█".repeat(MAX_BAR_WIDTH);
        let quarter: String = "█".repeat(MAX_BAR_WIDTH / 4);
        assert!(rendered.contains(&full));
        assert!(rendered.contains(&quarter));
    }

    #[test]
    fn test_zero_values_have_no_bar() {
        let mut spec = bar_spec();
        spec.series[0].values = vec![0.0, 5.0];
        let rendered = render_chart(&spec);
        // Zero row still shows the label and value
        assert!(rendered.contains("Recife"));
        assert!(rendered.contains('0'));
    }

    #[test]
    fn test_sparkline_for_line_chart() {
        let spec = ChartSpec {
            kind: ChartKind::Line,
            title: "Vendas mensais".to_string(),
            x_label: None,
            y_label: None,
            categories: vec!["jan".to_string(), "fev".to_string(), "mar".to_string()],
            series: vec![ChartSeries {
                name: "vendas".to_string(),
                values: vec![1.0, 2.0, 3.0],
            }],
        };
        let rendered = render_chart(&spec);
        assert!(rendered.contains('▁'));
        assert!(rendered.contains('█'));
        assert!(rendered.contains("jan → mar"));
        assert!(rendered.contains("(1 .. 3)"));
    }

    #[test]
    fn test_multi_series_bars_show_series_names() {
        let mut spec = bar_spec();
        spec.series.push(ChartSeries {
            name: "meta".to_string(),
            values: vec![20.0, 20.0],
        });
        let rendered = render_chart(&spec);
        assert!(rendered.contains("contagem"));
        assert!(rendered.contains("meta"));
    }

    #[test]
    fn test_flat_sparkline_uses_lowest_glyph() {
        let spec = ChartSpec {
            kind: ChartKind::Scatter,
            title: "Constante".to_string(),
            x_label: None,
            y_label: None,
            categories: vec!["a".to_string(), "b".to_string()],
            series: vec![ChartSeries {
                name: "s".to_string(),
                values: vec![5.0, 5.0],
            }],
        };
        let rendered = render_chart(&spec);
        assert!(rendered.contains("▁▁"));
    }
}
