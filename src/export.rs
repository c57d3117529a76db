//! Serialises in-memory aggregates and records into downloadable files.
//!
//! Every exporter returns `None` when there is nothing to export.

use crate::aggregate::Aggregate;
use crate::chart::{ChartData, ChartKind, ChartTheme, Rgb};
use crate::config::Theme;
use crate::csv::write_rows;
use crate::record::{format_number, Record};
use image::{codecs::png::PngEncoder, ExtendedColorType, ImageEncoder};
use indexmap::IndexSet;
use plotters::coord::Shift;
use plotters::prelude::*;
use std::f64::consts::PI;
use thiserror::Error;

pub const CHART_SIZE: (u32, u32) = (800, 480);

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("chart rendering failed: {0}")]
    Render(String),
    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    fn csv(filename: &str, text: String) -> Self {
        Self {
            filename: filename.to_string(),
            content_type: "text/csv; charset=utf-8",
            bytes: text.into_bytes(),
        }
    }
}

pub fn aggregate_csv(filename: &str, label_header: &str, value_header: &str, aggregate: &Aggregate) -> Option<ExportFile> {
    if aggregate.is_empty() {
        return None;
    }
    let header = vec![label_header.to_string(), value_header.to_string()];
    let rows = std::iter::once(header).chain(
        aggregate
            .iter()
            .map(|(label, value)| vec![label.to_string(), format_number(value)]),
    );
    Some(ExportFile::csv(filename, write_rows(rows)))
}

pub fn chart_csv(filename: &str, chart: &ChartData) -> Option<ExportFile> {
    if chart.is_empty() {
        return None;
    }
    Some(ExportFile::csv(filename, write_rows(chart.rows())))
}

/// Raw records as CSV; the header is every field seen, in encounter order.
pub fn records_csv(filename: &str, records: &[Record]) -> Option<ExportFile> {
    if records.is_empty() {
        return None;
    }
    let header: IndexSet<&str> = records.iter().flat_map(Record::fields).collect();
    let header: Vec<&str> = header.into_iter().collect();
    let rows = std::iter::once(header.iter().map(|field| field.to_string()).collect::<Vec<_>>()).chain(
        records.iter().map(|record| {
            header
                .iter()
                .map(|field| record.get(field).map(ToString::to_string).unwrap_or_default())
                .collect()
        }),
    );
    Some(ExportFile::csv(filename, write_rows(rows)))
}

/// Raster snapshot of a chart as PNG.
pub fn chart_png(filename: &str, chart: &ChartData, kind: ChartKind, theme: Theme) -> Result<Option<ExportFile>, ExportError> {
    if chart.is_empty() {
        return Ok(None);
    }
    let (width, height) = CHART_SIZE;
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, CHART_SIZE).into_drawing_area();
        let palette = ChartTheme::for_theme(theme);
        root.fill(&color(palette.background)).map_err(render_err)?;
        match kind {
            ChartKind::Bar => draw_bars(&root, chart, &palette)?,
            ChartKind::Doughnut => draw_doughnut(&root, chart)?,
        }
        root.present().map_err(render_err)?;
    }

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes).write_image(&buffer, width, height, ExtendedColorType::Rgb8)?;
    Ok(Some(ExportFile {
        filename: filename.to_string(),
        content_type: "image/png",
        bytes,
    }))
}

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

fn render_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Render(err.to_string())
}

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn draw_bars(root: &Area<'_>, chart: &ChartData, palette: &ChartTheme) -> Result<(), ExportError> {
    const MARGIN: i32 = 32;
    const GRID_LINES: i32 = 4;
    let (width, height) = root.dim_in_pixel();
    let (width, height) = (width as i32, height as i32);
    let plot_height = height - 2 * MARGIN;
    let plot_width = width - 2 * MARGIN;

    let stack_max = (0..chart.labels.len())
        .map(|index| chart.series.iter().map(|series| series.values[index]).sum::<f64>())
        .fold(0.0_f64, f64::max);
    let scale = if stack_max > 0.0 { plot_height as f64 / stack_max } else { 0.0 };

    for step in 0..=GRID_LINES {
        let y = MARGIN + plot_height * step / GRID_LINES;
        root.draw(&PathElement::new(vec![(MARGIN, y), (width - MARGIN, y)], color(palette.grid)))
            .map_err(render_err)?;
    }

    let slot = plot_width as f64 / chart.labels.len() as f64;
    let bar_width = (slot * 0.7).max(1.0);
    for index in 0..chart.labels.len() {
        let left = MARGIN + (slot * index as f64 + (slot - bar_width) / 2.0) as i32;
        let right = left + bar_width as i32;
        let mut base = (height - MARGIN) as f64;
        for series in &chart.series {
            let top = base - series.values[index].max(0.0) * scale;
            root.draw(&Rectangle::new(
                [(left, top.round() as i32), (right, base.round() as i32)],
                color(series.color.0).filled(),
            ))
            .map_err(render_err)?;
            base = top;
        }
    }

    root.draw(&PathElement::new(
        vec![(MARGIN, height - MARGIN), (width - MARGIN, height - MARGIN)],
        color(palette.text).stroke_width(2),
    ))
    .map_err(render_err)?;
    Ok(())
}

fn draw_doughnut(root: &Area<'_>, chart: &ChartData) -> Result<(), ExportError> {
    const ARC_STEPS: usize = 48;
    let Some(series) = chart.series.first() else {
        return Ok(());
    };
    let total: f64 = series.values.iter().map(|value| value.max(0.0)).sum();
    if total <= 0.0 {
        return Ok(());
    }

    let (width, height) = root.dim_in_pixel();
    let center = (width as f64 / 2.0, height as f64 / 2.0);
    let outer = width.min(height) as f64 * 0.42;
    let inner = outer * 0.55;
    let point = |radius: f64, angle: f64| {
        (
            (center.0 + radius * angle.cos()).round() as i32,
            (center.1 + radius * angle.sin()).round() as i32,
        )
    };

    let mut start = -PI / 2.0;
    for (index, value) in series.values.iter().enumerate() {
        let sweep = value.max(0.0) / total * 2.0 * PI;
        if sweep <= 0.0 {
            continue;
        }
        let steps = ((ARC_STEPS as f64 * sweep / (2.0 * PI)).ceil() as usize).max(2);
        let angles: Vec<f64> = (0..=steps)
            .map(|step| start + sweep * step as f64 / steps as f64)
            .collect();
        let mut outline: Vec<(i32, i32)> = angles.iter().map(|angle| point(outer, *angle)).collect();
        outline.extend(angles.iter().rev().map(|angle| point(inner, *angle)));

        let fill = series
            .bucket_colors
            .as_ref()
            .and_then(|colors| colors.get(index))
            .map(|slice| slice.0)
            .unwrap_or(series.color.0);
        root.draw(&Polygon::new(outline, color(fill).filled()))
            .map_err(render_err)?;
        start += sweep;
    }
    Ok(())
}
