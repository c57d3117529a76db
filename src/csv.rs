//! Minimal quoted-field CSV reading and writing.
//!
//! Reading never fails: an unterminated quote keeps the rest of the document
//! inside the current cell.

use crate::record::{FieldValue, Record};
use tracing::debug;

/// Splits a document into rows of raw cells in one left-to-right pass.
pub fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut pending = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                chars.next();
                cell.push('"');
            }
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            ',' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
                pending = true;
            }
            '\r' if !in_quotes && chars.peek() == Some(&'\n') => {
                chars.next();
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
                pending = false;
            }
            '\n' if !in_quotes => {
                row.push(std::mem::take(&mut cell));
                rows.push(std::mem::take(&mut row));
                pending = false;
            }
            other => {
                cell.push(other);
                pending = true;
            }
        }
    }

    if pending || !cell.is_empty() || !row.is_empty() {
        row.push(cell);
        rows.push(row);
    }

    rows
}

/// Parses a document whose first row names the fields.
///
/// Rows whose cells are all empty are skipped. Short rows are padded with
/// empty values and cells beyond the header are ignored.
pub fn parse_records(text: &str) -> Vec<Record> {
    let mut rows = parse_rows(text).into_iter();
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let header: Vec<String> = header
        .into_iter()
        .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut records = Vec::new();
    for (line, row) in rows.enumerate() {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        if row.len() != header.len() {
            debug!(line = line + 2, cells = row.len(), expected = header.len(), "csv row width mismatch");
        }
        let mut record = Record::new();
        for (index, name) in header.iter().enumerate() {
            let value = match row.get(index) {
                Some(cell) if !cell.is_empty() => FieldValue::Text(cell.clone()),
                _ => FieldValue::Empty,
            };
            record.insert(name.clone(), value);
        }
        records.push(record);
    }
    records
}

pub fn escape_cell(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

/// Serialises rows, quoting only the cells that need it.
pub fn write_rows<R, C>(rows: R) -> String
where
    R: IntoIterator<Item = C>,
    C: IntoIterator,
    C::Item: AsRef<str>,
{
    let mut out = String::new();
    for row in rows {
        let line: Vec<String> = row
            .into_iter()
            .map(|cell| escape_cell(cell.as_ref()))
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn quoted_comma_stays_in_cell() {
        let records = parse_records("a,b\n1,\"x,y\"\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text("a").as_deref(), Some("1"));
        assert_eq!(records[0].text("b").as_deref(), Some("x,y"));
    }

    #[test]
    fn doubled_quote_round_trips() {
        let original = r#"He said "hi""#;
        let escaped = escape_cell(original);
        assert_eq!(escaped, r#""He said ""hi""""#);

        let records = parse_records(&format!("kutipan\n{escaped}\n"));
        assert_eq!(records[0].text("kutipan").as_deref(), Some(original));
    }

    #[test]
    fn crlf_and_blank_rows() {
        let rows = parse_rows("a,b\r\n1,2\r\n,\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["1", "2"], vec!["", ""]]);

        let records = parse_records("a,b\r\n1,2\r\n,\r\n\r\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn quoted_newline_is_kept() {
        let rows = parse_rows("nama,alamat\nA,\"Jl. Satu\nLima Puluh\"");
        assert_eq!(rows[1], vec!["A", "Jl. Satu\nLima Puluh"]);
    }

    #[test]
    fn unterminated_quote_runs_to_end() {
        let rows = parse_rows("a,b\n1,\"open,still\nopen");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["1", "open,still\nopen"]);
    }

    #[test]
    fn short_rows_are_padded() {
        let records = parse_records("a,b,c\n1\n");
        assert_eq!(records[0].len(), 3);
        assert_eq!(records[0].get("c"), Some(&FieldValue::Empty));
    }

    #[test]
    fn empty_document_yields_nothing() {
        assert!(parse_rows("").is_empty());
        assert!(parse_records("").is_empty());
        assert!(parse_records("a,b\n").is_empty());
    }

    #[test]
    fn writer_quotes_only_when_needed() {
        let text = write_rows(vec![vec!["label", "jumlah"], vec!["Kec. A, Utara", "3"]]);
        assert_eq!(text, "label,jumlah\n\"Kec. A, Utara\",3\n");
    }
}
