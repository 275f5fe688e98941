use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{info, warn};

use crate::record::DailyRecord;

/// Spreadsheet tools need the BOM to pick UTF-8 for the Chinese headers.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Number of records per `YYYY-MM`.
pub type MonthCounts = BTreeMap<String, usize>;

/// Sort `records` by date and write them to `path` as BOM-prefixed CSV.
///
/// An empty collection writes nothing and returns `Ok(None)`. On success the
/// per-month summary is printed and returned.
pub fn save_annual_data(records: &mut [DailyRecord], path: &Path) -> Result<Option<MonthCounts>> {
    if records.is_empty() {
        warn!("No data to save, {} not written", path.display());
        return Ok(None);
    }

    sort_by_date(records);
    write_csv(records, path)?;

    let counts = month_counts(records);

    println!("Saved {} records to {}", records.len(), path.display());
    println!("Records per month:");
    for (month, count) in &counts {
        println!("  {}: {} days", month, count);
    }

    Ok(Some(counts))
}

/// Well-formed dates in ascending order, then malformed ones, then dateless.
pub fn sort_by_date(records: &mut [DailyRecord]) {
    records.sort_by(|a, b| {
        let key_a = (!is_well_formed(&a.date), a.sort_date());
        let key_b = (!is_well_formed(&b.date), b.sort_date());
        key_a.cmp(&key_b)
    });
}

fn is_well_formed(date: &str) -> bool {
    date.len() == 10 && NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok()
}

fn write_csv(records: &[DailyRecord], path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::Writer::from_writer(out);
    for record in records {
        writer.serialize(record)?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

pub fn month_counts(records: &[DailyRecord]) -> MonthCounts {
    let mut counts = MonthCounts::new();
    for month in records.iter().filter_map(DailyRecord::month_key) {
        *counts.entry(month.to_string()).or_insert(0) += 1;
    }
    counts
}
