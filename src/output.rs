//! CSV output for the year series and comparison rows
//!
//! Column names are the struct field names.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::comparison::ComparisonRow;
use crate::projection::YearProjection;

/// Write any serializable rows as CSV with a header line
pub fn write_rows<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_projection_csv<P: AsRef<Path>>(
    path: P,
    years: &[YearProjection],
) -> Result<(), csv::Error> {
    let path = path.as_ref();
    write_rows(File::create(path)?, years)?;
    info!("Wrote {} projection years to {}", years.len(), path.display());
    Ok(())
}

pub fn write_comparison_csv<P: AsRef<Path>>(
    path: P,
    rows: &[ComparisonRow],
) -> Result<(), csv::Error> {
    let path = path.as_ref();
    write_rows(File::create(path)?, rows)?;
    info!("Wrote {} comparison rows to {}", rows.len(), path.display());
    Ok(())
}
