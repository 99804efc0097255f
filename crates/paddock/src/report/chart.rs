//! SVG chart rendering.
//!
//! Charts are drawn with plotters onto an [`SVGBackend`]. Empty series still
//! produce a chart with axes and a title.

use std::path::Path;

use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::coord::Shift;
use plotters::data::Quartiles;
use plotters::element::Boxplot;
use plotters::prelude::*;

use super::{Distribution, Ranked, TrendPoint};
use crate::error::{Error, Result};

/// Size of every chart, in pixels.
const CHART_SIZE: (u32, u32) = (1024, 768);

/// Fill colour of bars, boxes and lines.
const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);

const FONT_FAMILY: &str = "sans-serif";

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Draw onto a fresh SVG canvas at `path` and flush it.
fn render_to<F>(path: &Path, draw: F) -> Result<()>
where
    F: FnOnce(&DrawingArea<SVGBackend<'_>, Shift>) -> DrawResult,
{
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    draw(&root)
        .and_then(|()| root.present().map_err(Into::into))
        .map_err(|e| Error::render(path, e))
}

/// Upper bound of a value axis: a little headroom above the largest value.
fn axis_max(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Label for a category slot; only slot centres are labelled.
fn slot_label(names: &[&str], slot: &SegmentValue<usize>) -> String {
    match slot {
        SegmentValue::CenterOf(i) => names.get(*i).map(ToString::to_string).unwrap_or_default(),
        _ => String::new(),
    }
}

/// Ranked values as horizontal bars, highest at the top.
pub(super) fn horizontal_bars<T>(
    path: &Path,
    title: &str,
    value_desc: &str,
    entries: &[Ranked<'_, T>],
) -> Result<()>
where
    T: Copy + Into<f64>,
{
    let slots = entries.len().max(1);
    // Slot 0 is the bottom of the y axis.
    let names: Vec<&str> = entries.iter().rev().map(|e| e.name).collect();
    let max = axis_max(entries.iter().map(|e| e.value.into()));

    render_to(path, |root| {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT_FAMILY, 24))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(180)
            .build_cartesian_2d(0f64..max, (0..slots).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(slots)
            .y_label_formatter(&|slot| slot_label(&names, slot))
            .x_desc(value_desc)
            .draw()?;

        let len = entries.len();
        chart.draw_series(entries.iter().enumerate().map(|(rank, entry)| {
            let slot = len - 1 - rank;
            let value: f64 = entry.value.into();
            let mut bar = Rectangle::new(
                [
                    (0.0, SegmentValue::Exact(slot)),
                    (value, SegmentValue::Exact(slot + 1)),
                ],
                SERIES_COLOR.filled(),
            );
            bar.set_margin(6, 6, 0, 0);
            bar
        }))?;

        Ok(())
    })
}

/// Ranked values as vertical bars, highest on the left.
pub(super) fn vertical_bars<T>(
    path: &Path,
    title: &str,
    value_desc: &str,
    entries: &[Ranked<'_, T>],
) -> Result<()>
where
    T: Copy + Into<f64>,
{
    let slots = entries.len().max(1);
    let names: Vec<&str> = entries.iter().map(|e| e.name).collect();
    let max = axis_max(entries.iter().map(|e| e.value.into()));

    render_to(path, |root| {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT_FAMILY, 24))
            .margin(16)
            .x_label_area_size(64)
            .y_label_area_size(64)
            .build_cartesian_2d((0..slots).into_segmented(), 0f64..max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&|slot| slot_label(&names, slot))
            .x_label_style((FONT_FAMILY, 12))
            .y_desc(value_desc)
            .draw()?;

        chart.draw_series(entries.iter().enumerate().map(|(slot, entry)| {
            let value: f64 = entry.value.into();
            let mut bar = Rectangle::new(
                [
                    (SegmentValue::Exact(slot), 0.0),
                    (SegmentValue::Exact(slot + 1), value),
                ],
                SERIES_COLOR.filled(),
            );
            bar.set_margin(0, 0, 8, 8);
            bar
        }))?;

        Ok(())
    })
}

/// One box-and-whisker per driver.
pub(super) fn box_plot(path: &Path, title: &str, groups: &[Distribution<'_>]) -> Result<()> {
    let slots = groups.len().max(1);
    let names: Vec<&str> = groups.iter().map(|g| g.driver).collect();
    #[allow(clippy::cast_possible_truncation)]
    let max = axis_max(groups.iter().flat_map(|g| g.points.iter().copied())) as f32;

    render_to(path, |root| {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT_FAMILY, 24))
            .margin(16)
            .x_label_area_size(64)
            .y_label_area_size(64)
            .build_cartesian_2d((0..slots).into_segmented(), 0f32..max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&|slot| slot_label(&names, slot))
            .x_desc("Driver")
            .y_desc("Points per Race")
            .draw()?;

        chart.draw_series(
            groups
                .iter()
                .enumerate()
                .filter(|(_, group)| !group.points.is_empty())
                .map(|(slot, group)| {
                    Boxplot::new_vertical(
                        SegmentValue::CenterOf(slot),
                        &Quartiles::new(group.points.as_slice()),
                    )
                    .width(40)
                    .whisker_width(0.5)
                    .style(SERIES_COLOR)
                }),
        )?;

        Ok(())
    })
}

/// Points per round as a line with a marker on every round.
pub(super) fn line_with_markers(path: &Path, title: &str, points: &[TrendPoint]) -> Result<()> {
    let first = points.iter().map(|p| p.round).min().unwrap_or(1);
    let last = points.iter().map(|p| p.round).max().unwrap_or(1).max(first + 1);
    let max = axis_max(points.iter().map(|p| p.points));

    render_to(path, |root| {
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT_FAMILY, 24))
            .margin(16)
            .x_label_area_size(48)
            .y_label_area_size(64)
            .build_cartesian_2d(first..last, 0f64..max)?;

        chart
            .configure_mesh()
            .x_desc("Round")
            .y_desc("Points")
            .draw()?;

        chart.draw_series(LineSeries::new(
            points.iter().map(|p| (p.round, p.points)),
            SERIES_COLOR.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|p| Circle::new((p.round, p.points), 4, SERIES_COLOR.filled())),
        )?;

        Ok(())
    })
}
