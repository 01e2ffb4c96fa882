//! Entity loader: tokenized rows -> validated, deduplicated names.

use std::collections::HashSet;

use crate::domain::{Gender, LoadError, NameEntity, ID_SEPARATOR};

use super::tokenizer::is_blank_row;

/// Result of a successful load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOutcome {
    /// Accepted names, in input row order.
    pub entities: Vec<NameEntity>,

    /// Rows skipped as malformed or duplicate.
    pub invalid_rows: usize,
}

/// Positions of the required columns in the header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    kk: usize,
    ru: usize,
    en: usize,
    gender: usize,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Result<Self, LoadError> {
        let names: Vec<String> = header.iter().map(|cell| normalize_header(cell)).collect();
        let find = |wanted: &str| {
            names
                .iter()
                .position(|name| name == wanted)
                .ok_or(LoadError::MissingColumns)
        };

        Ok(Self {
            kk: find("kk")?,
            ru: find("ru")?,
            en: find("en")?,
            gender: find("gender")?,
        })
    }
}

fn normalize_header(cell: &str) -> String {
    cell.trim()
        .trim_start_matches('\u{FEFF}')
        .trim()
        .to_lowercase()
}

fn field<'a>(row: &'a [String], index: usize) -> &'a str {
    row.get(index).map(|value| value.trim()).unwrap_or("")
}

/// Validate one data row. `None` means the row is malformed.
fn parse_row(row: &[String], columns: ColumnMap) -> Option<NameEntity> {
    let kk = field(row, columns.kk);
    let ru = field(row, columns.ru);
    let en = field(row, columns.en);
    let gender = Gender::from_code(&field(row, columns.gender).to_uppercase())?;

    let usable = |value: &str| !value.is_empty() && !value.contains(ID_SEPARATOR);
    if !(usable(kk) && usable(ru) && usable(en)) {
        return None;
    }

    Some(NameEntity::new(kk, ru, en, gender))
}

/// Map tokenized rows to names.
///
/// Row 0 is the header. Whitespace-only rows are skipped without counting;
/// malformed rows and repeats of an already accepted tuple are counted in
/// [`LoadOutcome::invalid_rows`]. The first occurrence of a tuple wins.
pub fn load(rows: &[Vec<String>]) -> Result<LoadOutcome, LoadError> {
    let (header, body) = rows.split_first().ok_or(LoadError::EmptySource)?;
    let columns = ColumnMap::from_header(header)?;

    let mut seen = HashSet::new();
    let mut entities = Vec::new();
    let mut invalid_rows = 0;

    for row in body {
        if is_blank_row(row) {
            continue;
        }

        match parse_row(row, columns) {
            Some(entity) if seen.insert(entity.id().clone()) => entities.push(entity),
            _ => invalid_rows += 1,
        }
    }

    if entities.is_empty() {
        return Err(LoadError::NoValidRows);
    }

    Ok(LoadOutcome {
        entities,
        invalid_rows,
    })
}
