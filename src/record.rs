use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// One cell of a loosely-typed row.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Empty => true,
            FieldValue::Number(_) => false,
            FieldValue::Text(text) => text.trim().is_empty(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Number(value) => f.write_str(&format_number(*value)),
            FieldValue::Text(text) => f.write_str(text),
        }
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Empty,
            serde_json::Value::Number(number) => match number.as_f64() {
                Some(value) => FieldValue::Number(value),
                None => FieldValue::Text(number.to_string()),
            },
            serde_json::Value::String(text) => FieldValue::Text(text),
            serde_json::Value::Bool(flag) => FieldValue::Text(flag.to_string()),
            other => FieldValue::Text(other.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(FieldValue::from)
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Empty => serializer.serialize_none(),
            FieldValue::Number(value) => serializer.serialize_f64(*value),
            FieldValue::Text(text) => serializer.serialize_str(text),
        }
    }
}

/// A schema-less row: field name to value, in source order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Trimmed text of a field; `None` when missing or blank.
    pub fn text(&self, field: &str) -> Option<String> {
        let value = self.get(field)?;
        if value.is_empty() {
            return None;
        }
        Some(value.to_string().trim().to_string())
    }

    /// First non-blank value among alternative field names.
    pub fn first_text(&self, fields: &[&str]) -> Option<String> {
        fields.iter().find_map(|field| self.text(field))
    }

    /// Best-effort numeric reading: keeps digits, sign and decimal point.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            FieldValue::Empty => None,
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(text) => coerce_number(text),
        }
    }

    /// Integer prefix of a field, the way `parseInt` reads it.
    pub fn leading_int(&self, field: &str) -> Option<i64> {
        match self.get(field)? {
            FieldValue::Empty => None,
            FieldValue::Number(value) if value.is_finite() => Some(value.trunc() as i64),
            FieldValue::Number(_) => None,
            FieldValue::Text(text) => leading_int(text),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.0.values().all(FieldValue::is_empty)
    }

    /// Keeps only the listed fields that are present, in allow-list order.
    pub fn pick(&self, allowed: &[&str]) -> Record {
        let mut out = Record::new();
        for field in allowed {
            if let Some(value) = self.get(field) {
                out.insert(*field, value.clone());
            }
        }
        out
    }

    pub fn without(&self, dropped: &[&str]) -> Record {
        Record(
            self.0
                .iter()
                .filter(|(field, _)| !dropped.contains(&field.as_str()))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        )
    }

    /// Rewrites the listed text columns as numbers; unparsable cells become empty.
    pub fn coerce_numeric(&mut self, fields: &[&str]) {
        for field in fields {
            if let Some(value) = self.0.get_mut(*field) {
                if let FieldValue::Text(text) = value {
                    *value = match coerce_number(text) {
                        Some(number) => FieldValue::Number(number),
                        None => FieldValue::Empty,
                    };
                }
            }
        }
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Record(
            iter.into_iter()
                .map(|(field, value)| (field.into(), value.into()))
                .collect(),
        )
    }
}

pub fn coerce_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '.'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn leading_int(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<i64>().ok().map(|value| sign * value)
}

/// Renders integral values without a fractional part.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn deserializes_mixed_values_in_order() {
        let record: Record = serde_json::from_str(
            r#"{"Nama":"Budi","MK_TAHUN":7,"Kosong":null,"Aktif":true}"#,
        )
        .unwrap();
        assert_eq!(record.fields().collect::<Vec<_>>(), vec!["Nama", "MK_TAHUN", "Kosong", "Aktif"]);
        assert_eq!(record.get("MK_TAHUN"), Some(&FieldValue::Number(7.0)));
        assert_eq!(record.get("Kosong"), Some(&FieldValue::Empty));
        assert_eq!(record.text("Aktif").as_deref(), Some("true"));
    }

    #[test]
    fn text_treats_blank_as_missing() {
        let record: Record = [("a", " "), ("b", " x ")].into_iter().collect();
        assert_eq!(record.text("a"), None);
        assert_eq!(record.text("b").as_deref(), Some("x"));
        assert_eq!(record.text("c"), None);
    }

    #[test]
    fn leading_int_follows_parse_int() {
        assert_eq!(leading_int("7 tahun"), Some(7));
        assert_eq!(leading_int("  -3"), Some(-3));
        assert_eq!(leading_int("abc"), None);
        assert_eq!(leading_int(""), None);

        let mut record = Record::new();
        record.insert("MK_TAHUN", 12.9);
        assert_eq!(record.leading_int("MK_TAHUN"), Some(12));
    }

    #[test]
    fn number_strips_non_numeric_characters() {
        assert_eq!(coerce_number("250 m"), Some(250.0));
        assert_eq!(coerce_number("Rp 500"), Some(500.0));
        assert_eq!(coerce_number("n/a"), None);
        assert_eq!(coerce_number("--"), None);
    }

    #[test]
    fn pick_and_without_select_columns() {
        let record: Record = [("NSM", "1"), ("Telepon", "08"), ("Jenjang", "MI")]
            .into_iter()
            .collect();
        let picked = record.pick(&["Jenjang", "NSM", "Tidak Ada"]);
        assert_eq!(picked.fields().collect::<Vec<_>>(), vec!["Jenjang", "NSM"]);

        let dropped = record.without(&["Telepon"]);
        assert_eq!(dropped.fields().collect::<Vec<_>>(), vec!["NSM", "Jenjang"]);
    }

    #[test]
    fn coerce_numeric_turns_garbage_into_empty() {
        let mut record: Record = [("Daya Tampung", "1,500 orang"), ("Luas", "-")]
            .into_iter()
            .collect();
        record.coerce_numeric(&["Daya Tampung", "Luas"]);
        assert_eq!(record.number("Daya Tampung"), Some(1500.0));
        assert_eq!(record.get("Luas"), Some(&FieldValue::Empty));
    }

    #[test]
    fn format_number_drops_integral_fraction() {
        assert_eq!(format_number(3.0), "3");
        assert_eq!(format_number(2.5), "2.5");
    }
}
