use crate::classify::FeeEntry;
use crate::error::Result;
use crate::types::FeeRow;
use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;

/// Fields shared by every record of one scan
#[derive(Debug, Clone)]
pub struct RecordContext {
    pub bank: String,
    pub updated_at: String,
    pub source: String,
}

impl RecordContext {
    pub fn new(bank: &str, captured_at: DateTime<Utc>, source: &str) -> Self {
        Self {
            bank: bank.to_string(),
            updated_at: format_timestamp(captured_at),
            source: source.to_string(),
        }
    }

    pub fn with_source(&self, source: &str) -> Self {
        Self {
            source: source.to_string(),
            ..self.clone()
        }
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn to_row(entry: &FeeEntry, products: Vec<String>, ctx: &RecordContext) -> FeeRow {
    FeeRow {
        bank: ctx.bank.clone(),
        products,
        fee_type: entry.fee_type.clone(),
        description: entry.description.clone(),
        amount: entry.amount.clone(),
        notes: entry.notes.clone(),
        updated_at: ctx.updated_at.clone(),
        source: ctx.source.clone(),
    }
}

/// Tags every entry with one known product
pub fn tag_product(entries: &[FeeEntry], product: &str, ctx: &RecordContext) -> Vec<FeeRow> {
    entries
        .iter()
        .map(|e| to_row(e, vec![product.to_string()], ctx))
        .collect()
}

/// Copies each entry once per product, in product order, keeping entry order.
///
/// Used when a table lists fees without saying which product they belong to. Every
/// fee is assumed to apply to all listed products, which the source does not confirm.
pub fn expand_products(entries: &[FeeEntry], products: &[&str], ctx: &RecordContext) -> Vec<FeeRow> {
    entries
        .iter()
        .flat_map(|e| products.iter().map(move |p| to_row(e, vec![p.to_string()], ctx)))
        .collect()
}

/// Writes rows as a pretty-printed JSON array followed by a newline
pub fn write_json<W: Write>(rows: &[FeeRow], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, rows)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
