use crate::aggregate::{
    aggregate, FieldKey, FixedWidth, Ladder, Measure, MissingKey, ThresholdLadder, NOT_SPECIFIED,
};
use crate::chart::{ChartData, ChartKind};
use crate::filter::{options, FilterSelection};
use crate::models::{StaffCharts, StaffDashboard, StaffOptions, StaffQuery, StaffStatistics};
use crate::record::Record;
use indexmap::IndexSet;

pub const GOLONGAN: &str = "Golongan";
pub const STATUS: &str = "STATUS PEGAWAI";
pub const TENURE: &str = "MK_TAHUN";
pub const GENERATION: &str = "Generasi";
pub const EDUCATION: &str = "JENJANG_PENDIDIKAN";
pub const WORK_UNIT: &str = "Satuan Kerja";

const PNS: &str = "PNS";
const STAFF_LABEL: &str = "Jumlah Pegawai";

/// Charts the staff dashboard can export individually.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffChart {
    Generation,
    Education,
    Tenure,
    TenureFiveYear,
}

impl StaffChart {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "generasi" => Some(Self::Generation),
            "jenjang-pendidikan" => Some(Self::Education),
            "masa-kerja" => Some(Self::Tenure),
            "masa-kerja-lima-tahunan" => Some(Self::TenureFiveYear),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Generation => "generasi",
            Self::Education => "jenjang-pendidikan",
            Self::Tenure => "masa-kerja",
            Self::TenureFiveYear => "masa-kerja-lima-tahunan",
        }
    }

    pub fn kind(self) -> ChartKind {
        match self {
            Self::Generation | Self::Education => ChartKind::Doughnut,
            Self::Tenure | Self::TenureFiveYear => ChartKind::Bar,
        }
    }

    pub fn build(self, records: &[Record]) -> ChartData {
        match self {
            Self::Generation => distribution(records, GENERATION),
            Self::Education => distribution(records, EDUCATION),
            Self::Tenure => {
                let ladder = ThresholdLadder::tenure();
                let counts = aggregate(
                    records,
                    &Ladder { field: TENURE, ladder: &ladder, missing_as_zero: true },
                    Measure::Count,
                    MissingKey::Drop,
                );
                ChartData::bar(STAFF_LABEL, &counts.in_canonical_order(&ladder.labels()))
            }
            Self::TenureFiveYear => {
                let counts = aggregate(
                    records,
                    &FixedWidth { field: TENURE, width: 5, missing_as_zero: true },
                    Measure::Count,
                    MissingKey::Drop,
                );
                ChartData::bar(STAFF_LABEL, &counts)
            }
        }
    }
}

/// Doughnut of one field, largest share first, blanks as "Tidak Ditentukan".
fn distribution(records: &[Record], field: &str) -> ChartData {
    let counts = aggregate(
        records,
        &FieldKey(field),
        Measure::Count,
        MissingKey::Sentinel(NOT_SPECIFIED),
    );
    ChartData::doughnut("Jumlah", &counts.sorted_desc())
}

pub fn selection(query: &StaffQuery) -> FilterSelection {
    FilterSelection::new()
        .with(GOLONGAN, query.golongan.as_deref())
        .with(STATUS, query.status.as_deref())
}

pub fn statistics(records: &[Record]) -> StaffStatistics {
    let total = records.len();
    let pns = records
        .iter()
        .filter(|record| record.text(STATUS).as_deref() == Some(PNS))
        .count();
    let units: IndexSet<String> = records.iter().filter_map(|record| record.text(WORK_UNIT)).collect();
    StaffStatistics {
        total,
        pns,
        non_pns: total - pns,
        satuan_kerja: units.len(),
    }
}

pub fn build_stats(records: &[Record], query: &StaffQuery) -> StaffDashboard {
    let filtered = selection(query).apply(records);
    StaffDashboard {
        options: StaffOptions {
            golongan: options(records, GOLONGAN),
            status: options(records, STATUS),
        },
        statistics: statistics(&filtered),
        charts: StaffCharts {
            generasi: StaffChart::Generation.build(&filtered),
            jenjang_pendidikan: StaffChart::Education.build(&filtered),
            masa_kerja: StaffChart::Tenure.build(&filtered),
            masa_kerja_lima_tahunan: StaffChart::TenureFiveYear.build(&filtered),
        },
    }
}
