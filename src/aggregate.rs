//! Grouping of records into labelled counts or sums.

use crate::record::Record;
use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;

pub const NOT_SPECIFIED: &str = "Tidak Ditentukan";
pub const UNKNOWN: &str = "Tidak Diketahui";

/// Derives a bucket label from a record.
pub trait Bucketer {
    fn bucket(&self, record: &Record) -> Option<String>;
}

impl<F> Bucketer for F
where
    F: Fn(&Record) -> Option<String>,
{
    fn bucket(&self, record: &Record) -> Option<String> {
        self(record)
    }
}

/// Buckets on the trimmed text of a single field.
pub struct FieldKey<'a>(pub &'a str);

impl Bucketer for FieldKey<'_> {
    fn bucket(&self, record: &Record) -> Option<String> {
        record.text(self.0)
    }
}

/// Fixed-width integer ranges labelled `"{lower}-{upper}"`.
pub struct FixedWidth<'a> {
    pub field: &'a str,
    pub width: i64,
    /// Read missing or non-numeric values as zero instead of skipping them.
    pub missing_as_zero: bool,
}

impl Bucketer for FixedWidth<'_> {
    fn bucket(&self, record: &Record) -> Option<String> {
        let value = match record.leading_int(self.field) {
            Some(value) => value,
            None if self.missing_as_zero => 0,
            None => return None,
        };
        Some(fixed_width_label(value, self.width))
    }
}

pub fn fixed_width_label(value: i64, width: i64) -> String {
    let width = width.max(1);
    let lower = value.div_euclid(width).saturating_mul(width);
    format!("{}-{}", lower, lower.saturating_add(width - 1))
}

/// Ascending thresholds; a value takes the label of the first step whose
/// exclusive upper bound exceeds it, or the overflow label.
#[derive(Debug, Clone)]
pub struct ThresholdLadder {
    steps: Vec<(i64, &'static str)>,
    overflow: &'static str,
}

impl ThresholdLadder {
    pub fn new(steps: Vec<(i64, &'static str)>, overflow: &'static str) -> Self {
        Self { steps, overflow }
    }

    /// Six tenure bands used for the staff service-years chart.
    pub fn tenure() -> Self {
        Self::new(
            vec![(5, "0-4"), (10, "5-9"), (15, "10-14"), (20, "15-19"), (25, "20-24")],
            "25+",
        )
    }

    /// Founding-year bands for places of worship.
    pub fn founding_year() -> Self {
        Self::new(
            vec![
                (1945, "Sebelum 1945"),
                (1970, "1945-1969"),
                (1990, "1970-1989"),
                (2000, "1990-1999"),
                (2010, "2000-2009"),
            ],
            "2010+",
        )
    }

    pub fn label_for(&self, value: i64) -> &'static str {
        self.steps
            .iter()
            .find(|(upper, _)| value < *upper)
            .map(|(_, label)| *label)
            .unwrap_or(self.overflow)
    }

    /// Labels in display order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.steps
            .iter()
            .map(|(_, label)| *label)
            .chain(std::iter::once(self.overflow))
            .collect()
    }
}

pub struct Ladder<'a> {
    pub field: &'a str,
    pub ladder: &'a ThresholdLadder,
    pub missing_as_zero: bool,
}

impl Bucketer for Ladder<'_> {
    fn bucket(&self, record: &Record) -> Option<String> {
        let value = match record.leading_int(self.field) {
            Some(value) => value,
            None if self.missing_as_zero => 0,
            None => return None,
        };
        Some(self.ladder.label_for(value).to_string())
    }
}

/// Calendar month of a date field as `YYYY-MM`.
pub struct MonthKey<'a>(pub &'a str);

impl Bucketer for MonthKey<'_> {
    fn bucket(&self, record: &Record) -> Option<String> {
        let date = parse_date(&record.text(self.0)?)?;
        Some(format!("{:04}-{:02}", date.year(), date.month()))
    }
}

pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let head = text.split(['T', ' ']).next().unwrap_or(text);
    ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(head, format).ok())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measure<'a> {
    Count,
    Sum(&'a str),
}

/// What to do with a record whose bucket cannot be derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MissingKey {
    Drop,
    Sentinel(&'static str),
}

/// Bucket label to accumulated measure, in first-encounter order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Aggregate(IndexMap<String, f64>);

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, label: impl Into<String>, amount: f64) {
        *self.0.entry(label.into()).or_insert(0.0) += amount;
    }

    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, value)| (label.as_str(), *value))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// Descending by measure; equal measures keep encounter order.
    pub fn sorted_desc(&self) -> Aggregate {
        let mut entries: Vec<(String, f64)> = self.0.clone().into_iter().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        Aggregate(entries.into_iter().collect())
    }

    pub fn top_n(&self, n: usize) -> Aggregate {
        let mut sorted = self.sorted_desc();
        sorted.0.truncate(n);
        sorted
    }

    /// Ascending by label, for month keys and other sortable labels.
    pub fn sorted_by_label(&self) -> Aggregate {
        let mut entries: Vec<(String, f64)> = self.0.clone().into_iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Aggregate(entries.into_iter().collect())
    }

    /// Canonical labels first (only those present), then any others in
    /// encounter order.
    pub fn in_canonical_order(&self, canonical: &[&str]) -> Aggregate {
        let mut out = Aggregate::new();
        for label in canonical {
            if let Some(value) = self.get(label) {
                out.add(*label, value);
            }
        }
        for (label, value) in self.iter() {
            if !canonical.contains(&label) {
                out.add(label, value);
            }
        }
        out
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for Aggregate {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut out = Aggregate::new();
        for (label, value) in iter {
            out.add(label, value);
        }
        out
    }
}

/// Groups records under `bucketer`, accumulating `measure` per bucket.
pub fn aggregate<B>(records: &[Record], bucketer: &B, measure: Measure<'_>, missing: MissingKey) -> Aggregate
where
    B: Bucketer + ?Sized,
{
    let mut out = Aggregate::new();
    for record in records {
        let label = match (bucketer.bucket(record), missing) {
            (Some(label), _) if !label.is_empty() => label,
            (_, MissingKey::Sentinel(sentinel)) => sentinel.to_string(),
            (_, MissingKey::Drop) => continue,
        };
        let amount = match measure {
            Measure::Count => 1.0,
            Measure::Sum(field) => match record.number(field) {
                Some(amount) => amount,
                None => continue,
            },
        };
        out.add(label, amount);
    }
    out
}

/// Mean of a numeric field over records where it is present.
pub fn average(records: &[Record], field: &str) -> Option<f64> {
    let values: Vec<f64> = records.iter().filter_map(|record| record.number(field)).collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}
