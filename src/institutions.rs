//! Madrasah directory: public-column filtering, jenjang normalisation and
//! the per-level teacher/education-staff breakdown.

use crate::aggregate::{aggregate, Aggregate, FieldKey, Measure, MissingKey, NOT_SPECIFIED};
use crate::chart::ChartData;
use crate::filter::{options, FilterSelection};
use crate::models::{InstitutionOptions, InstitutionQuery, InstitutionSummary};
use crate::record::Record;
use std::collections::HashMap;
use tracing::debug;

pub const PUBLIC_COLUMNS: [&str; 10] = [
    "NSM",
    "NPSN",
    "Nama Madrasah",
    "Jenjang",
    "Status",
    "Provinsi",
    "Kabupaten",
    "Kecamatan",
    "Alamat",
    "Afiliasi Organisasi",
];

pub const LEVELS: [&str; 4] = ["RA", "MI", "MTs", "MA"];

const TEACHERS: &str = "Jumlah Guru";
const EDUCATION_STAFF: &str = "Jumlah Tendik";

pub fn normalize_jenjang(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return NOT_SPECIFIED.to_string();
    };
    match raw.to_lowercase().as_str() {
        "ra" => "RA".to_string(),
        "mi" => "MI".to_string(),
        "mts" | "mt s" | "mt.s" => "MTs".to_string(),
        "ma" => "MA".to_string(),
        _ => raw.to_string(),
    }
}

/// Keeps the publishable columns of each row and drops rows with no
/// identifier and no name.
pub fn public_rows(raw: &[Record]) -> Vec<Record> {
    raw.iter()
        .filter_map(|row| {
            let mut public = row.pick(&PUBLIC_COLUMNS);
            if public.first_text(&["NSM", "NPSN", "Nama Madrasah"]).is_none() {
                debug!("skipping institution row without identifier");
                return None;
            }
            let level = normalize_jenjang(public.text("Jenjang").as_deref());
            public.insert("Jenjang", level);
            Some(public)
        })
        .collect()
}

/// Sums teacher and staff headcounts per level, matching each institution to
/// the headcount dataset by NPSN first and NSM second.
pub fn staff_by_level(institutions: &[Record], headcounts: &[Record]) -> (Aggregate, Aggregate) {
    let mut by_npsn: HashMap<String, &Record> = HashMap::new();
    let mut by_nsm: HashMap<String, &Record> = HashMap::new();
    for row in headcounts {
        if let Some(npsn) = row.text("NPSN") {
            by_npsn.entry(npsn).or_insert(row);
        }
        if let Some(nsm) = row.text("NSM") {
            by_nsm.entry(nsm).or_insert(row);
        }
    }

    let mut teachers = Aggregate::new();
    let mut staff = Aggregate::new();
    for institution in institutions {
        let matched = institution
            .text("NPSN")
            .and_then(|npsn| by_npsn.get(&npsn))
            .or_else(|| institution.text("NSM").and_then(|nsm| by_nsm.get(&nsm)));
        let Some(row) = matched else {
            continue;
        };
        let level = institution.text("Jenjang").unwrap_or_else(|| NOT_SPECIFIED.to_string());
        teachers.add(level.clone(), row.number(TEACHERS).unwrap_or(0.0));
        staff.add(level, row.number(EDUCATION_STAFF).unwrap_or(0.0));
    }
    (teachers.in_canonical_order(&LEVELS), staff.in_canonical_order(&LEVELS))
}

pub fn build_summary(institutions: &[Record], headcounts: &[Record], query: &InstitutionQuery) -> InstitutionSummary {
    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let filtered: Vec<Record> = FilterSelection::new()
        .with("Jenjang", query.jenjang.as_deref())
        .with("Status", query.status.as_deref())
        .with("Kecamatan", query.kecamatan.as_deref())
        .apply(institutions)
        .into_iter()
        .filter(|record| match &needle {
            Some(needle) => record
                .text("Nama Madrasah")
                .is_some_and(|name| name.to_lowercase().contains(needle.as_str())),
            None => true,
        })
        .collect();

    let count = |field: &str, missing: MissingKey| aggregate(&filtered, &FieldKey(field), Measure::Count, missing);
    let (teachers, staff) = staff_by_level(&filtered, headcounts);

    InstitutionSummary {
        total: filtered.len(),
        options: InstitutionOptions {
            jenjang: options(institutions, "Jenjang"),
            status: options(institutions, "Status"),
            kecamatan: options(institutions, "Kecamatan"),
        },
        by_jenjang: ChartData::doughnut(
            "Jumlah Madrasah",
            &count("Jenjang", MissingKey::Sentinel(NOT_SPECIFIED)).in_canonical_order(&LEVELS),
        ),
        by_status: ChartData::doughnut(
            "Jumlah Madrasah",
            &count("Status", MissingKey::Sentinel(NOT_SPECIFIED)).sorted_desc(),
        ),
        top_kecamatan: ChartData::bar("Jumlah Madrasah", &count("Kecamatan", MissingKey::Drop).top_n(12)),
        top_afiliasi: ChartData::bar(
            "Jumlah Madrasah",
            &count("Afiliasi Organisasi", MissingKey::Drop).top_n(10),
        ),
        staff_by_jenjang: ChartData::stacked(&[("Guru", &teachers), ("Tendik", &staff)]),
        institutions: filtered,
    }
}
