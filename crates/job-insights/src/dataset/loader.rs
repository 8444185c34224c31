use super::{JobTable, LoadError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

pub fn load_path<P: AsRef<Path>>(path: P) -> Result<JobTable, LoadError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "opening job listings");
    let file = File::open(path)?;
    let table = load_reader(file)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.headers().len(),
        "loaded job listings"
    );
    Ok(table)
}

/// Reads a headered CSV export. Every value is kept as a trimmed string.
pub fn load_reader<R: Read>(reader: R) -> Result<JobTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    JobTable::new(headers, rows)
}

fn normalize_header(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}
