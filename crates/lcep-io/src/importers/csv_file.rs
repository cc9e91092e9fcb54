use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use lcep_core::Diagnostics;

use super::record::RawSettlement;
use super::ImportResult;

/// Read settlements from a CSV file with a header row.
pub fn read_settlements_csv(path: &Path) -> Result<ImportResult> {
    let reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening settlements CSV '{}'", path.display()))?;
    read_from(reader)
}

/// Read settlements from any CSV source, e.g. an in-memory buffer.
pub fn read_settlements_csv_from<R: Read>(source: R) -> Result<ImportResult> {
    read_from(csv::Reader::from_reader(source))
}

fn read_from<R: Read>(mut reader: csv::Reader<R>) -> Result<ImportResult> {
    reader.headers().context("reading settlements CSV header")?;

    let mut settlements = Vec::new();
    let mut diagnostics = Diagnostics::new();
    for (index, row) in reader.deserialize::<RawSettlement>().enumerate() {
        // header is line 1
        let line = index + 2;
        let label = format!("row-{}", index + 1);
        match row {
            Ok(raw) => {
                if let Some(s) = raw.resolve(&label, &mut diagnostics) {
                    settlements.push(s);
                }
            }
            Err(err) => diagnostics.unreadable(&label, Some(line), err.to_string()),
        }
    }
    Ok(ImportResult {
        settlements,
        diagnostics,
        ..Default::default()
    })
}
