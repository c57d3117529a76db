//! Shapes aggregates into the label/series structure charts consume.

use crate::aggregate::Aggregate;
use crate::config::Theme;
use indexmap::IndexSet;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn background(self) -> String {
        format!("rgba({}, {}, {}, 0.8)", self.0, self.1, self.2)
    }

    pub fn border(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

pub const PALETTE: [Rgb; 15] = [
    Rgb(34, 197, 94),
    Rgb(16, 185, 129),
    Rgb(5, 150, 105),
    Rgb(59, 130, 246),
    Rgb(37, 99, 235),
    Rgb(168, 85, 247),
    Rgb(147, 51, 234),
    Rgb(249, 115, 22),
    Rgb(234, 88, 12),
    Rgb(236, 72, 153),
    Rgb(219, 39, 119),
    Rgb(6, 182, 212),
    Rgb(14, 165, 233),
    Rgb(132, 204, 22),
    Rgb(163, 230, 53),
];

pub fn palette_color(index: usize) -> Rgb {
    PALETTE[index % PALETTE.len()]
}

/// Background/border pair as serialised for the charting surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesColor(pub Rgb);

impl Serialize for SeriesColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("SeriesColor", 2)?;
        state.serialize_field("background", &self.0.background())?;
        state.serialize_field("border", &self.0.border())?;
        state.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub values: Vec<f64>,
    pub color: SeriesColor,
    /// Per-bucket colours, set for doughnut slices.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket_colors: Option<Vec<SeriesColor>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub series: Vec<Series>,
    pub total: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Bar,
    Doughnut,
}

impl ChartData {
    /// One series in a single colour.
    pub fn bar(name: &str, aggregate: &Aggregate) -> Self {
        Self::stacked(&[(name, aggregate)])
    }

    /// One series with a colour per bucket.
    pub fn doughnut(name: &str, aggregate: &Aggregate) -> Self {
        let mut chart = Self::bar(name, aggregate);
        if let Some(series) = chart.series.first_mut() {
            series.bucket_colors = Some(
                (0..series.values.len())
                    .map(|index| SeriesColor(palette_color(index)))
                    .collect(),
            );
        }
        chart
    }

    /// Several series over the union of their labels; absent combinations are 0.
    pub fn stacked(parts: &[(&str, &Aggregate)]) -> Self {
        let labels: IndexSet<&str> = parts
            .iter()
            .flat_map(|(_, aggregate)| aggregate.labels())
            .collect();

        let series: Vec<Series> = parts
            .iter()
            .enumerate()
            .map(|(index, (name, aggregate))| Series {
                name: name.to_string(),
                values: labels
                    .iter()
                    .map(|label| aggregate.get(label).unwrap_or(0.0))
                    .collect(),
                color: SeriesColor(palette_color(index)),
                bucket_colors: None,
            })
            .collect();

        let total: f64 = series.iter().flat_map(|series| series.values.iter()).sum();
        Self {
            labels: labels.into_iter().map(str::to_string).collect(),
            series,
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Share of each bucket in the first series, one decimal place.
    pub fn percentages(&self) -> Vec<f64> {
        let Some(series) = self.series.first() else {
            return Vec::new();
        };
        let total: f64 = series.values.iter().sum();
        series
            .values
            .iter()
            .map(|value| {
                if total == 0.0 {
                    0.0
                } else {
                    (value / total * 1000.0).round() / 10.0
                }
            })
            .collect()
    }

    /// Label and value columns of the first series, for export.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut header = vec!["Label".to_string()];
        header.extend(self.series.iter().map(|series| series.name.clone()));
        let mut rows = vec![header];
        for (index, label) in self.labels.iter().enumerate() {
            let mut row = vec![label.clone()];
            row.extend(
                self.series
                    .iter()
                    .map(|series| crate::record::format_number(series.values[index])),
            );
            rows.push(row);
        }
        rows
    }
}

/// Colours for a chart surface under a theme.
pub struct ChartTheme {
    pub background: Rgb,
    pub text: Rgb,
    pub grid: Rgb,
}

impl ChartTheme {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Rgb(17, 24, 39),
                text: Rgb(229, 231, 235),
                grid: Rgb(55, 65, 81),
            },
            Theme::Light => Self {
                background: Rgb(255, 255, 255),
                text: Rgb(55, 65, 81),
                grid: Rgb(229, 231, 235),
            },
        }
    }
}
