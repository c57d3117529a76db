use crate::aggregate::{aggregate, average, FieldKey, Measure, MissingKey, ThresholdLadder, UNKNOWN};
use crate::chart::ChartData;
use crate::filter::{options, FilterSelection};
use crate::models::{WorshipQuery, WorshipSummary};
use crate::record::Record;

const MOSQUE_COLUMNS: [&str; 11] = [
    "Nama Masjid",
    "Tipologi",
    "Alamat",
    "Desa",
    "Kecamatan",
    "Tahun Berdiri",
    "Status",
    "Status Tanah",
    "Luas Tanah",
    "Luas Bangunan",
    "Daya Tampung",
];

const CHURCH_DROPPED: [&str; 6] = ["No", "NO", "Nomor HP", "No HP", "Email", "NIK"];

const NUMERIC_COLUMNS: [&str; 4] = ["Luas Tanah", "Luas Bangunan", "Daya Tampung", "Jumlah Jemaat"];
const STATUS_FIELDS: [&str; 3] = ["Status", "status_gedung_gereja", "Status Tanah"];
const FOUNDED_FIELDS: [&str; 2] = ["Tahun Berdiri", "tahun_berdiri"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorshipKind {
    Mosque,
    Church,
}

impl WorshipKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "masjid" => Some(Self::Mosque),
            "gereja" => Some(Self::Church),
            _ => None,
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Self::Mosque => "masjid",
            Self::Church => "gereja",
        }
    }

    pub fn asset(self) -> &'static str {
        match self {
            Self::Mosque => "masjid.csv",
            Self::Church => "gereja.csv",
        }
    }

    fn capacity_field(self) -> &'static str {
        match self {
            Self::Mosque => "Daya Tampung",
            Self::Church => "Jumlah Jemaat",
        }
    }

    /// Restricts columns (allow-list for mosques, drop-list for churches) and
    /// coerces the measure columns to numbers.
    pub fn shape(self, rows: Vec<Record>) -> Vec<Record> {
        rows.into_iter()
            .map(|row| {
                let mut row = match self {
                    Self::Mosque => row.pick(&MOSQUE_COLUMNS),
                    Self::Church => row.without(&CHURCH_DROPPED),
                };
                row.coerce_numeric(&NUMERIC_COLUMNS);
                row
            })
            .filter(|row| !row.is_blank())
            .collect()
    }
}

pub fn build_summary(kind: WorshipKind, places: &[Record], query: &WorshipQuery) -> WorshipSummary {
    let filtered = FilterSelection::new()
        .with("Kecamatan", query.kecamatan.as_deref())
        .apply(places);

    let ladder = ThresholdLadder::founding_year();
    let founded = |record: &Record| {
        FOUNDED_FIELDS
            .iter()
            .find_map(|field| record.leading_int(field))
            .map(|year| ladder.label_for(year).to_string())
    };
    let status = |record: &Record| record.first_text(&STATUS_FIELDS);

    let by_kecamatan = aggregate(&filtered, &FieldKey("Kecamatan"), Measure::Count, MissingKey::Drop);
    let by_status = aggregate(&filtered, &status, Measure::Count, MissingKey::Sentinel(UNKNOWN));
    let by_founding = aggregate(&filtered, &founded, Measure::Count, MissingKey::Sentinel(UNKNOWN));
    let capacity = aggregate(
        &filtered,
        &FieldKey("Kecamatan"),
        Measure::Sum(kind.capacity_field()),
        MissingKey::Drop,
    );

    WorshipSummary {
        kind: kind.slug(),
        total: filtered.len(),
        kecamatan: options(places, "Kecamatan"),
        top_kecamatan: ChartData::bar("Jumlah", &by_kecamatan.top_n(10)),
        by_status: ChartData::doughnut("Jumlah", &by_status.sorted_desc()),
        by_founding_year: ChartData::bar("Jumlah", &by_founding.in_canonical_order(&ladder.labels())),
        capacity_by_kecamatan: ChartData::bar(kind.capacity_field(), &capacity.top_n(10)),
        average_land_area: average(&filtered, "Luas Tanah"),
        places: filtered,
    }
}
