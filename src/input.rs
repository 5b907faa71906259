use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

const NAME_COLUMN: &str = "company name";

/// Company names from a `.csv` file (the `Company Name` column, or the first
/// column when there is none) or from a plain text file, one per line.
/// Blank names are dropped.
pub fn load_names(path: &Path) -> Result<Vec<String>> {
    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));

    let names = if is_csv {
        load_csv(path)?
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {:?}", path))?
            .lines()
            .map(|l| l.trim().to_string())
            .collect()
    };

    let names: Vec<String> = names.into_iter().filter(|n| !n.is_empty()).collect();
    info!("Loaded {} company names from {:?}", names.len(), path);
    Ok(names)
}

/// Without a `Company Name` header the file is read as a headerless list
/// and the first column of every row, the first row included, is a name.
fn load_csv(path: &Path) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to open {:?}", path))?;

    let mut records = rdr.records();
    let first = match records.next() {
        Some(record) => record.with_context(|| format!("Malformed row in {:?}", path))?,
        None => return Ok(Vec::new()),
    };

    let mut names = Vec::new();
    let column = match first.iter().position(|h| h.eq_ignore_ascii_case(NAME_COLUMN)) {
        Some(i) => i,
        None => {
            warn!("No 'Company Name' header in {:?}, reading the first column", path);
            names.push(first.get(0).unwrap_or("").to_string());
            0
        }
    };

    for record in records {
        let record = record.with_context(|| format!("Malformed row in {:?}", path))?;
        names.push(record.get(column).unwrap_or("").to_string());
    }
    Ok(names)
}

/// Contiguous slice `[start, start + count)`, clamped to the list.
pub fn select_batch(names: &[String], start: usize, count: usize) -> &[String] {
    let begin = start.min(names.len());
    let end = start.saturating_add(count).min(names.len());
    &names[begin..end]
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn csv_uses_company_name_column() {
        let f = write_file(
            ".csv",
            "Id,Company Name,Country\n1,Acme,DE\n2,,FR\n3, Blue Bottle ,US\n",
        );
        let names = load_names(f.path()).unwrap();
        assert_eq!(names, ["Acme", "Blue Bottle"]);
    }

    #[test]
    fn headerless_csv_keeps_first_row() {
        let f = write_file(".csv", "Acme\nWidgets\n");
        assert_eq!(load_names(f.path()).unwrap(), ["Acme", "Widgets"]);
    }

    #[test]
    fn headerless_csv_reads_first_column() {
        let f = write_file(".csv", "Acme,DE\nBlue Bottle,US\n");
        assert_eq!(load_names(f.path()).unwrap(), ["Acme", "Blue Bottle"]);
    }

    #[test]
    fn empty_csv_has_no_names() {
        let f = write_file(".csv", "");
        assert!(load_names(f.path()).unwrap().is_empty());
    }

    #[test]
    fn text_file_one_per_line() {
        let f = write_file(".txt", "Acme\n\n   \nWidgets Inc\n");
        assert_eq!(load_names(f.path()).unwrap(), ["Acme", "Widgets Inc"]);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(load_names(Path::new("does/not/exist.csv")).is_err());
    }

    #[test]
    fn batch_is_clamped() {
        let names: Vec<String> = (0..5).map(|i| format!("c{}", i)).collect();
        assert_eq!(select_batch(&names, 1, 2), ["c1", "c2"]);
        assert_eq!(select_batch(&names, 3, 800).len(), 2);
        assert!(select_batch(&names, 9, 3).is_empty());
        assert_eq!(select_batch(&names, 0, usize::MAX).len(), 5);
    }
}
