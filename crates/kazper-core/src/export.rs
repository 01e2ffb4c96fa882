//! Export: CSV / JSON snapshots of the bucket assignment.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::domain::{Bucket, BucketAssignment, EntityCatalog, Locale, NameEntity};
use crate::ports::Collator;

pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const JSON_MIME: &str = "application/json;charset=utf-8";

const CSV_HEADER: [&str; 7] = ["bucket", "gender", "kk", "ru", "en", "display_locale", "display_name"];

/// Rendering an export failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV export: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("failed to write JSON export: {0}")]
    Json(#[from] serde_json::Error),
}

/// One exported pick.
#[derive(Debug, Clone)]
pub struct ExportRecord {
    pub bucket: Bucket,
    pub entity: Arc<NameEntity>,
}

/// A rendered export, ready to be written somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub mime_type: &'static str,
    pub contents: String,
}

/// `kazper-picks-YYYY-MM-DD.<extension>`
pub fn file_name(date: NaiveDate, extension: &str) -> String {
    format!("kazper-picks-{}.{extension}", date.format("%Y-%m-%d"))
}

/// Every assigned entity still in the catalog, sorted by bucket name and then
/// by its display name under `locale`.
pub fn collect_records(
    buckets: &BucketAssignment,
    catalog: &EntityCatalog,
    locale: Locale,
    collator: &dyn Collator,
) -> Vec<ExportRecord> {
    let mut records: Vec<ExportRecord> = [Bucket::Rejected, Bucket::Kept]
        .into_iter()
        .flat_map(|bucket| {
            buckets.ids(bucket).iter().filter_map(move |id| {
                catalog.get(id).map(|entity| ExportRecord {
                    bucket,
                    entity: Arc::clone(entity),
                })
            })
        })
        .collect();

    records.sort_by(|a, b| {
        a.bucket
            .as_str()
            .cmp(b.bucket.as_str())
            .then_with(|| collator.compare(a.entity.display(locale), b.entity.display(locale)))
    });
    records
}

/// Header plus one row per record, `\n`-separated, no trailing newline.
/// Fields are quoted only when they hold a quote, comma or line break.
pub fn to_csv(records: &[ExportRecord], locale: Locale) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;
    for record in records {
        let entity = &record.entity;
        writer.write_record([
            record.bucket.as_str(),
            entity.gender().code(),
            entity.kk(),
            entity.ru(),
            entity.en(),
            locale.as_str(),
            entity.display(locale),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| csv::Error::from(error.into_error()))?;
    let mut text = String::from_utf8(bytes)?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonExport<'a> {
    exported_at: &'a str,
    #[serde(rename = "display_locale")]
    display_locale: Locale,
    items: Vec<JsonItem<'a>>,
}

#[derive(Serialize)]
struct JsonItem<'a> {
    bucket: Bucket,
    #[serde(rename = "exportedAt")]
    exported_at: &'a str,
    id: &'a str,
    gender: &'static str,
    kk: &'a str,
    ru: &'a str,
    en: &'a str,
    display_locale: Locale,
    display_name: &'a str,
}

/// Pretty-printed JSON snapshot stamped with `exported_at`.
pub fn to_json(
    records: &[ExportRecord],
    locale: Locale,
    exported_at: DateTime<Utc>,
) -> Result<String, ExportError> {
    let stamp = exported_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let items = records
        .iter()
        .map(|record| {
            let entity = &record.entity;
            JsonItem {
                bucket: record.bucket,
                exported_at: &stamp,
                id: entity.id().as_str(),
                gender: entity.gender().code(),
                kk: entity.kk(),
                ru: entity.ru(),
                en: entity.en(),
                display_locale: locale,
                display_name: entity.display(locale),
            }
        })
        .collect();

    Ok(serde_json::to_string_pretty(&JsonExport {
        exported_at: &stamp,
        display_locale: locale,
        items,
    })?)
}
