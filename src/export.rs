use std::path::Path;

use anyhow::{Context, Result};
use csv::{Reader, Writer};
use tracing::{debug, info};

use crate::pipeline::{pad_jobs, CompanyResult};

pub const COLUMNS: [&str; 18] = [
    "Company Name",
    "Website URL",
    "Linkedin URL",
    "Careers Page URL",
    "Job listings page URL",
    "Provider",
    "job post1 URL", "job post1 title", "job post1 location", "job post1 date",
    "job post2 URL", "job post2 title", "job post2 location", "job post2 date",
    "job post3 URL", "job post3 title", "job post3 location", "job post3 date",
];

/// Flattens a result into the fixed column order.
pub fn to_row(result: &CompanyResult) -> Vec<String> {
    let mut row = vec![
        result.company_name.clone(),
        result.website_url.clone(),
        result.linkedin_url.clone(),
        result.careers_url.clone(),
        result.jobs_listing_url.clone(),
        result.provider.clone(),
    ];
    for job in pad_jobs(result.jobs.clone()) {
        row.extend([job.url, job.title, job.location, job.posted_date]);
    }
    row
}

/// Writes `results` to `path`. With `append`, rows already in the file are
/// read back and the new rows concatenated after them before the whole file
/// is rewritten.
pub fn write_csv(path: &Path, results: &[CompanyResult], append: bool) -> Result<usize> {
    let mut rows = Vec::new();
    if append && path.exists() {
        rows = read_rows(path)?;
        debug!("Appending to {} existing rows in {:?}", rows.len(), path);
    }
    rows.extend(results.iter().map(to_row));

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)?;
    }
    let mut wtr = Writer::from_path(path).with_context(|| format!("Failed to create {:?}", path))?;
    wtr.write_record(COLUMNS)?;
    for row in &rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;

    info!("Wrote {} rows ({} new) to {:?}", rows.len(), results.len(), path);
    Ok(rows.len())
}

/// Existing data rows, normalized to the column count.
fn read_rows(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut rdr = Reader::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;
    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("Malformed row in {:?}", path))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(COLUMNS.len(), String::new());
        rows.push(row);
    }
    Ok(rows)
}
