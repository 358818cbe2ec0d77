use plotters::prelude::*;

use crate::error::{DashError, Result};
use crate::query::GenreSeries;

pub const LINE_CHART_SIZE: (u32, u32) = (650, 450);
pub const BAR_CHART_SIZE: (u32, u32) = (1140, 600);

pub const BAR_CHART_TITLE: &str = "Bar Chart Showing the Average Budget of Movies in Each Genre";

const PLOT_BACKGROUND: RGBColor = RGBColor(0x20, 0x23, 0x24);
const LINE_COLOR: RGBColor = RGBColor(0x63, 0x6e, 0xfa);
const MAROON: RGBColor = RGBColor(0x80, 0x00, 0x00);

fn chart_err<E: std::error::Error>(err: E) -> DashError {
    DashError::Chart(err.to_string())
}

fn genre_label(genres: &[String], slot: &SegmentValue<i32>) -> String {
    match slot {
        SegmentValue::CenterOf(i) => usize::try_from(*i)
            .ok()
            .and_then(|i| genres.get(i))
            .cloned()
            .unwrap_or_default(),
        _ => String::new(),
    }
}

/// Headroom above the tallest value so markers and bars are not clipped.
fn y_upper(series: &GenreSeries) -> f64 {
    series.max_value().unwrap_or(0.0).max(1.0) * 1.1
}

/// Line-and-marker chart of movie counts per genre, as an SVG document.
pub fn score_line_chart(counts: &GenreSeries) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, LINE_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let slots = counts.len().max(1) as i32;
        let mut chart = ChartBuilder::on(&root)
            .margin(10)
            .margin_top(50)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((0..slots).into_segmented(), 0.0..y_upper(counts))
            .map_err(chart_err)?;

        chart
            .plotting_area()
            .fill(&PLOT_BACKGROUND)
            .map_err(chart_err)?;
        chart
            .configure_mesh()
            .bold_line_style(WHITE)
            .light_line_style(WHITE.mix(0.2))
            .x_labels(counts.len())
            .x_label_formatter(&|slot| genre_label(&counts.genres, slot))
            .y_label_formatter(&|count| format!("{count:.0}"))
            .draw()
            .map_err(chart_err)?;

        let points: Vec<(SegmentValue<i32>, f64)> = counts
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, count)| Some((SegmentValue::CenterOf(i as i32), (*count)?)))
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.clone(),
                LINE_COLOR.stroke_width(2),
            ))
            .map_err(chart_err)?;
        chart
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 4, LINE_COLOR.filled())),
            )
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}

/// Bar chart of the rounded mean budget per genre, as an SVG document.
/// Genres without a mean get no bar.
pub fn budget_bar_chart(means: &GenreSeries) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, BAR_CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let slots = means.len().max(1) as i32;
        let mut chart = ChartBuilder::on(&root)
            .caption(BAR_CHART_TITLE, ("sans-serif", 24))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(100)
            .build_cartesian_2d((0..slots).into_segmented(), 0.0..y_upper(means))
            .map_err(chart_err)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(means.len())
            .x_label_formatter(&|slot| genre_label(&means.genres, slot))
            .y_label_formatter(&|budget| format!("{budget:.0}"))
            .x_desc("genre")
            .y_desc("budget")
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(means.values.iter().enumerate().filter_map(|(i, mean)| {
                let i = i as i32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), (*mean)?),
                    ],
                    MAROON.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                Some(bar)
            }))
            .map_err(chart_err)?;

        root.present().map_err(chart_err)?;
    }
    Ok(svg)
}
