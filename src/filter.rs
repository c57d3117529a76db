use crate::record::Record;
use indexmap::IndexSet;

/// Selection value meaning "no constraint on this field".
pub const ALL: &str = "Semua";

/// Currently chosen discrete values, one per field.
#[derive(Debug, Clone, Default)]
pub struct FilterSelection {
    choices: Vec<(String, String)>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a constraint; `None`, blank or `"Semua"` leave the field open.
    pub fn with(mut self, field: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.map(str::trim) {
            if !value.is_empty() && value != ALL {
                self.choices.push((field.to_string(), value.to_string()));
            }
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.choices.is_empty()
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.choices
            .iter()
            .all(|(field, value)| record.text(field).as_deref() == Some(value.as_str()))
    }

    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// `"Semua"` followed by the distinct non-blank values of `field`.
pub fn options(records: &[Record], field: &str) -> Vec<String> {
    let distinct: IndexSet<String> = records.iter().filter_map(|record| record.text(field)).collect();
    std::iter::once(ALL.to_string()).chain(distinct).collect()
}
