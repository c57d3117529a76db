use crate::aggregate::{aggregate, parse_date, FieldKey, Measure, MissingKey};
use crate::chart::ChartData;
use crate::models::MarriageSummary;
use crate::record::Record;
use serde::Deserialize;

const DATE_FIELDS: [&str; 3] = ["Tanggal Nikah", "Tanggal", "tanggal"];
const KUA: &str = "KUA";

/// `nikah.json` is either a bare list or wrapped in `{ "data": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MarriageFile {
    List(Vec<Record>),
    Wrapped {
        #[serde(default)]
        data: Vec<Record>,
    },
}

impl MarriageFile {
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Self::List(records) | Self::Wrapped { data: records } => records,
        }
    }
}

fn month_of(record: &Record) -> Option<String> {
    let date = DATE_FIELDS
        .iter()
        .find_map(|field| record.text(field).as_deref().and_then(parse_date))?;
    Some(date.format("%Y-%m").to_string())
}

pub fn build_summary(records: &[Record]) -> MarriageSummary {
    let monthly = aggregate(records, &month_of, Measure::Count, MissingKey::Drop).sorted_by_label();
    let by_kua = aggregate(records, &FieldKey(KUA), Measure::Count, MissingKey::Drop);
    MarriageSummary {
        total: records.len(),
        monthly: ChartData::bar("Jumlah Pernikahan", &monthly),
        top_kua: ChartData::bar("Jumlah Pernikahan", &by_kua.top_n(10)),
    }
}
