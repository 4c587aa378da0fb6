use crate::csv::parse_csv;
use crate::database::research::ResearchRepository;
use crate::error::app_error::AppError;
use crate::models::research::ResearchRecord;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// Column headers of the source spreadsheet export.
const COL_TITLE: &str = "Judul";
const COL_AUTHOR: &str = "Penulis";
const COL_METHOD: &str = "Metode";
const COL_COORDINATES: &str = "Koordinat (Lat,Lon)";
const COL_SUMMARY: &str = "Ringkasan";
const COL_IMAGE: &str = "Gambar hasil (petunjuk)";
const COL_LINK: &str = "Link";

#[derive(Debug)]
pub struct SeedSummary {
    pub rows_parsed: usize,
    pub rows_inserted: u64,
}

fn column<'a>(record: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    record.get(name).map(String::as_str).filter(|value| !value.is_empty())
}

fn to_research_record(record: &HashMap<String, String>) -> ResearchRecord {
    ResearchRecord::derive(
        // No placeholder for the title: a blank Judul stays blank, exactly as
        // the source sheet rows are stored.
        column(record, COL_TITLE).unwrap_or(""),
        column(record, COL_AUTHOR).unwrap_or("Unknown Author"),
        column(record, COL_METHOD).unwrap_or("Unknown"),
        column(record, COL_COORDINATES),
        column(record, COL_SUMMARY),
        column(record, COL_IMAGE),
        column(record, COL_LINK),
    )
}

/// Reads the CSV export and replaces the whole researches table with its
/// contents. Destructive by design; only the seed binary calls this.
pub async fn seed_researches<R: ResearchRepository>(repo: &R, csv_path: &Path) -> Result<SeedSummary, AppError> {
    let text = std::fs::read_to_string(csv_path).map_err(|e| AppError::io(format!("Failed to read {}", csv_path.display()), e))?;

    let records: Vec<ResearchRecord> = parse_csv(&text).iter().map(to_research_record).collect();
    let rows_parsed = records.len();

    let rows_inserted = repo.replace_all_researches(&records).await?;
    info!(rows_parsed, rows_inserted, "seed completed");

    Ok(SeedSummary { rows_parsed, rows_inserted })
}
