use std::collections::HashSet;

use csv::StringRecord;

use crate::errors::ParserError;

/// Header positions resolved by exact, case-sensitive column name.
pub(crate) struct HeaderIndex {
    header: StringRecord,
}

impl HeaderIndex {
    pub fn new(header: StringRecord) -> Self {
        Self { header }
    }

    pub fn optional(&self, column: &str) -> Option<usize> {
        self.header.iter().position(|name| name == column)
    }

    pub fn required(&self, parser: &'static str, column: &'static str) -> Result<usize, ParserError> {
        self.optional(column)
            .ok_or(ParserError::MissingColumn { parser, column })
    }
}

/// Minimum field count a row needs to be kept: one past the highest column the header resolved.
pub(crate) fn min_width(columns: &[Option<usize>]) -> usize {
    columns.iter().flatten().max().map_or(0, |idx| idx + 1)
}

/// Field at a resolved index, or empty when the header has no such column.
pub(crate) fn field(record: &StringRecord, idx: Option<usize>) -> &str {
    idx.and_then(|i| record.get(i)).unwrap_or_default()
}

/// First 13 characters of a timestamp (`YYYY-MM-DDTHH`), or the whole value if shorter.
pub(crate) fn hour_key(timestamp: &str) -> &str {
    match timestamp.char_indices().nth(13) {
        Some((end, _)) => &timestamp[..end],
        None => timestamp,
    }
}

/// Floors are sometimes exported as `"<floor>;<extra>"`; keep the first part.
pub(crate) fn first_floor(raw: &str) -> &str {
    raw.split(';').next().unwrap_or_default().trim()
}

pub(crate) fn decimal_point(raw: &str) -> String {
    raw.replace(',', ".")
}

/// Keys already emitted during one transform; later duplicates are dropped.
#[derive(Default)]
pub(crate) struct SeenKeys {
    keys: HashSet<String>,
}

impl SeenKeys {
    pub fn first_time(&mut self, parts: &[&str]) -> bool {
        self.keys.insert(parts.join("|"))
    }
}
