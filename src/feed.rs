use csv::{ReaderBuilder, StringRecord};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("unable to read feed: {0}")]
    Read(String),
}

/// One normalized feed row. `quantity` stays a raw string here; the applier
/// owns the numeric interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    pub identity: String,
    pub quantity: String,
}

/// A single extraction strategy: a declared header name or a positional
/// column. Rules are tried in order until one yields a non-empty value.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    Named(&'static str),
    Position(usize),
}

impl FieldRule {
    fn extract<'a>(&self, headers: &StringRecord, row: &'a StringRecord) -> Option<&'a str> {
        let value = match self {
            FieldRule::Named(name) => headers
                .iter()
                .position(|header| header == *name)
                .and_then(|index| row.get(index)),
            FieldRule::Position(index) => row.get(*index),
        };
        value.filter(|value| !value.trim().is_empty())
    }
}

const IDENTITY_RULES: &[FieldRule] = &[
    FieldRule::Named("EAN13"),
    FieldRule::Named("sku"),
    FieldRule::Position(4),
];

const QUANTITY_RULES: &[FieldRule] = &[
    FieldRule::Named("Giacenza"),
    FieldRule::Named("giacenza"),
    FieldRule::Position(3),
];

fn select(rules: &[FieldRule], headers: &StringRecord, row: &StringRecord) -> String {
    rules
        .iter()
        .find_map(|rule| rule.extract(headers, row))
        .unwrap_or_default()
        .to_string()
}

/// Realizes the whole semicolon-delimited feed into stock records, in file
/// order. Rows with a wrong column count are still mapped (missing cells read
/// as empty); a reader-level error aborts.
pub fn read_records(path: &Path) -> Result<Vec<StockRecord>, FeedError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .map_err(|err| FeedError::Read(err.to_string()))?;
    let headers = reader
        .headers()
        .map_err(|err| FeedError::Read(err.to_string()))?
        .clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|err| FeedError::Read(err.to_string()))?;
        records.push(StockRecord {
            identity: select(IDENTITY_RULES, &headers, &row),
            quantity: select(QUANTITY_RULES, &headers, &row),
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn feed_from(content: &str) -> Vec<StockRecord> {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write feed");
        read_records(file.path()).expect("read feed")
    }

    #[test]
    fn named_identity_beats_positional_column() {
        let records = feed_from(
            "col0;col1;col2;col3;col4;EAN13\n\
             a;b;c;d;Y;X\n",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].identity, "X");
    }

    #[test]
    fn named_quantity_beats_positional_column() {
        let records = feed_from(
            "col0;col1;col2;col3;Giacenza\n\
             a;b;c;9;5\n",
        );
        assert_eq!(records[0].quantity, "5");
    }

    #[test]
    fn lowercase_quantity_header_is_accepted() {
        let records = feed_from(
            "sku;giacenza\n\
             ABC;12\n",
        );
        assert_eq!(records[0].identity, "ABC");
        assert_eq!(records[0].quantity, "12");
    }

    #[test]
    fn positional_fallback_when_no_named_columns() {
        let records = feed_from(
            "c0;c1;c2;c3;c4\n\
             a;b;c;7;8001234567890\n",
        );
        assert_eq!(records[0].identity, "8001234567890");
        assert_eq!(records[0].quantity, "7");
    }

    #[test]
    fn empty_named_value_falls_through_to_next_rule() {
        let records = feed_from(
            "EAN13;sku;c2;c3;c4\n\
             ;FALLBACK;x;y;z\n",
        );
        assert_eq!(records[0].identity, "FALLBACK");
    }

    #[test]
    fn row_count_and_order_are_preserved() {
        let records = feed_from(
            "EAN13;Giacenza\n\
             111;1\n\
             222;2\n\
             333;3\n",
        );
        let identities: Vec<&str> = records.iter().map(|r| r.identity.as_str()).collect();
        assert_eq!(identities, vec!["111", "222", "333"]);
    }

    #[test]
    fn short_rows_do_not_abort_the_stream() {
        let records = feed_from(
            "EAN13;Giacenza\n\
             111\n\
             222;4\n",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].identity, "111");
        assert_eq!(records[0].quantity, "");
        assert_eq!(records[1].quantity, "4");
    }

    #[test]
    fn invalid_utf8_is_a_fatal_read_error() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"EAN13;Giacenza\n\xff\xfe;5\n")
            .expect("write feed");

        let err = read_records(file.path()).expect_err("should fail");
        assert!(matches!(err, FeedError::Read(_)));
    }

    #[test]
    fn missing_identity_passes_through_empty() {
        let records = feed_from(
            "EAN13;Giacenza\n\
             ;3\n",
        );
        assert_eq!(records[0].identity, "");
        assert_eq!(records[0].quantity, "3");
    }
}
