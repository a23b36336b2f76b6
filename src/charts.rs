// Trend chart rendering, compiled in behind the `charts` feature.
//
// Everything here is best-effort: the caller logs any error as a warning
// and the workbook is still produced without a Charts sheet.
use crate::reports::{numeric_cells, year_groups, PRECIPITATION_COLUMN, WIND_COLUMN};
use crate::types::Dataset;
use crate::util::mean;
use plotters::prelude::*;
use std::error::Error;
use std::path::PathBuf;
use tempfile::TempDir;

const CHART_SIZE: (u32, u32) = (800, 400);
const LINE_COLOR: RGBColor = RGBColor(31, 119, 180);

/// Rendered chart images plus the temporary directory that owns them.
/// Dropping this removes the directory on every exit path; removal errors
/// are ignored.
pub struct RenderedCharts {
    _dir: TempDir,
    pub images: Vec<PathBuf>,
}

/// Render the trend images to a per-invocation temporary directory.
///
/// - A line chart of mean wind by year, when any such points exist.
/// - A bar chart of total precipitation by year, when that column exists.
///
/// Years that are not numeric are skipped; they cannot be placed on an
/// axis.
pub fn render_trend_charts(dataset: &Dataset) -> Result<RenderedCharts, Box<dyn Error>> {
    let dir = tempfile::Builder::new()
        .prefix("excel_report_tmp_")
        .tempdir()?;
    let mut images = Vec::new();

    let wind_points = yearly_metric(dataset, WIND_COLUMN, Aggregate::Mean);
    if !wind_points.is_empty() {
        let path = dir.path().join("wind_trend.png");
        draw_line_chart(
            &path,
            "Average Wind Speed by Year",
            "Year",
            "Wind",
            &wind_points,
        )?;
        images.push(path);
    }

    if dataset.has_column(PRECIPITATION_COLUMN) {
        let precip_points = yearly_metric(dataset, PRECIPITATION_COLUMN, Aggregate::Sum);
        if !precip_points.is_empty() {
            let path = dir.path().join("precip_total.png");
            draw_bar_chart(
                &path,
                "Total Precipitation by Year",
                "Year",
                "Precipitation (mm)",
                &precip_points,
            )?;
            images.push(path);
        }
    }

    Ok(RenderedCharts { _dir: dir, images })
}

enum Aggregate {
    Mean,
    Sum,
}

/// One (year, value) point per numeric year, ascending.
fn yearly_metric(dataset: &Dataset, metric: &str, how: Aggregate) -> Vec<(f64, f64)> {
    let Some(groups) = year_groups(dataset) else {
        return Vec::new();
    };
    let Some(col) = dataset.column_index(metric) else {
        return Vec::new();
    };
    let mut points = Vec::new();
    for (year, row_indices) in &groups {
        let Some(x) = year.as_number() else {
            continue;
        };
        let values = numeric_cells(dataset, col, row_indices);
        let y = match how {
            Aggregate::Mean => match mean(&values) {
                Some(m) => m,
                None => continue,
            },
            Aggregate::Sum => values.iter().sum(),
        };
        points.push((x, y));
    }
    points
}

fn draw_line_chart(
    path: &PathBuf,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64)],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let x_min = points.iter().map(|p| p.0).fold(f64::MAX, f64::min);
    let mut x_max = points.iter().map(|p| p.0).fold(f64::MIN, f64::max);
    if x_max <= x_min {
        // A single year still needs a non-degenerate axis.
        x_max = x_min + 1.0;
    }
    let y_max = points
        .iter()
        .map(|p| p.1)
        .fold(f64::MIN, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(title, ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max * 1.1)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_label_formatter(&|v| format!("{:.0}", v))
        .draw()?;

    chart.draw_series(LineSeries::new(points.iter().copied(), &LINE_COLOR))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, LINE_COLOR.filled())),
    )?;

    root.present()?;
    Ok(())
}

fn draw_bar_chart(
    path: &PathBuf,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    points: &[(f64, f64)],
) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let bars: Vec<(i32, f64)> = points.iter().map(|&(x, y)| (x.round() as i32, y)).collect();
    let x_min = bars.iter().map(|b| b.0).min().unwrap_or(0);
    let x_max = bars.iter().map(|b| b.0).max().unwrap_or(0);
    let y_max = bars.iter().map(|b| b.1).fold(f64::MIN, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .margin(25)
        .caption(title, ("sans-serif", 20))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d((x_min..x_max + 1).into_segmented(), 0.0..y_max * 1.1)?;

    chart.configure_mesh().x_desc(x_desc).y_desc(y_desc).draw()?;

    chart.draw_series(
        Histogram::vertical(&chart)
            .style(LINE_COLOR.filled())
            .margin(8)
            .data(bars.iter().copied()),
    )?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Value;

    fn dataset(columns: &[&str], rows: Vec<Vec<Value>>) -> Dataset {
        Dataset {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn yearly_mean_points_in_year_order() {
        let ds = dataset(
            &["Year", "Wind"],
            vec![
                vec![Value::Number(2021.0), Value::Number(10.0)],
                vec![Value::Number(2020.0), Value::Number(5.0)],
                vec![Value::Number(2020.0), Value::Number(7.0)],
            ],
        );
        let points = yearly_metric(&ds, WIND_COLUMN, Aggregate::Mean);
        assert_eq!(points, vec![(2020.0, 6.0), (2021.0, 10.0)]);
    }

    #[test]
    fn no_numeric_years_means_no_points() {
        let ds = dataset(
            &["Year", "Wind"],
            vec![vec![
                Value::Text("early".to_string()),
                Value::Number(5.0),
            ]],
        );
        assert!(yearly_metric(&ds, WIND_COLUMN, Aggregate::Mean).is_empty());
    }

    #[test]
    fn rendered_charts_cleans_up_its_directory() {
        let ds = dataset(
            &["Year", "Wind", "Precipitation_mm"],
            vec![
                vec![
                    Value::Number(2020.0),
                    Value::Number(5.0),
                    Value::Number(12.0),
                ],
                vec![
                    Value::Number(2021.0),
                    Value::Number(7.0),
                    Value::Number(8.0),
                ],
            ],
        );
        // Chart rendering may fail in environments without fonts; the
        // cleanup contract matters either way.
        if let Ok(rendered) = render_trend_charts(&ds) {
            let dir = rendered._dir.path().to_path_buf();
            for image in &rendered.images {
                assert!(image.exists());
            }
            drop(rendered);
            assert!(!dir.exists());
        }
    }
}
