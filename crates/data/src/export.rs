//! Conversion of pipeline output to `DataFrame`s and CSV.

use std::{fs::File, path::Path};

use famafrench_model::ValidationReport;
use famafrench_primitives::{BucketPair, FirmCounts, MonthlyFactorRecord};
use polars::prelude::*;
use tracing::debug;

use crate::DataError;

fn month_columns<T>(rows: &[T], month: impl Fn(&T) -> (i32, u32)) -> Vec<Column> {
    let (years, months): (Vec<i32>, Vec<u32>) = rows.iter().map(month).unzip();
    vec![Series::new("year".into(), years).into(), Series::new("month".into(), months).into()]
}

fn float_column<T>(rows: &[T], name: &str, value: impl Fn(&T) -> Option<f64>) -> Column {
    Series::new(name.into(), rows.iter().map(value).collect::<Vec<_>>()).into()
}

fn count_column<T>(rows: &[T], name: &str, value: impl Fn(&T) -> usize) -> Column {
    Series::new(name.into(), rows.iter().map(|r| value(r) as u64).collect::<Vec<_>>()).into()
}

/// Monthly factors with the six cell returns and the derived legs.
///
/// Columns: `year`, `month`, `date`, `SL`, `SM`, `SH`, `BL`, `BM`, `BH`,
/// `WH`, `WL`, `HML`, `WB`, `WS`, `SMB`.
///
/// # Errors
/// Returns `DataError::Polars` if the frame cannot be built.
pub fn factors_to_frame(factors: &[MonthlyFactorRecord]) -> Result<DataFrame, DataError> {
    let mut columns = month_columns(factors, |f| (f.month.year(), f.month.month()));
    let dates: Vec<String> = factors.iter().map(|f| f.date.to_string()).collect();
    columns.push(Series::new("date".into(), dates).into());
    for pair in BucketPair::ALL {
        columns.push(float_column(factors, &pair.to_string(), |f| f.returns[pair]));
    }
    columns.push(float_column(factors, "WH", |f| f.returns.wh()));
    columns.push(float_column(factors, "WL", |f| f.returns.wl()));
    columns.push(float_column(factors, "HML", |f| f.hml));
    columns.push(float_column(factors, "WB", |f| f.returns.wb()));
    columns.push(float_column(factors, "WS", |f| f.returns.ws()));
    columns.push(float_column(factors, "SMB", |f| f.smb));
    Ok(DataFrame::new(columns)?)
}

/// Monthly cell counts and their aggregates.
///
/// Columns: `year`, `month`, `SL`, `SM`, `SH`, `BL`, `BM`, `BH`, `H`, `L`,
/// `HML`, `B`, `S`, `SMB`, `TOTAL`.
///
/// # Errors
/// Returns `DataError::Polars` if the frame cannot be built.
pub fn counts_to_frame(counts: &[FirmCounts]) -> Result<DataFrame, DataError> {
    let mut columns = month_columns(counts, |c| (c.month.year(), c.month.month()));
    for pair in BucketPair::ALL {
        columns.push(count_column(counts, &pair.to_string(), |c| c.get(pair)));
    }
    columns.push(count_column(counts, "H", FirmCounts::high));
    columns.push(count_column(counts, "L", FirmCounts::low));
    columns.push(count_column(counts, "HML", FirmCounts::hml));
    columns.push(count_column(counts, "B", FirmCounts::big));
    columns.push(count_column(counts, "S", FirmCounts::small));
    columns.push(count_column(counts, "SMB", FirmCounts::smb));
    columns.push(count_column(counts, "TOTAL", FirmCounts::total));
    Ok(DataFrame::new(columns)?)
}

/// Replicated and rescaled reference factors side by side.
///
/// Columns: `year`, `month`, `smb`, `hml`, `reference_smb`, `reference_hml`.
///
/// # Errors
/// Returns `DataError::Polars` if the frame cannot be built.
pub fn comparison_to_frame(report: &ValidationReport) -> Result<DataFrame, DataError> {
    let rows = &report.rows;
    let mut columns = month_columns(rows, |r| (r.month.year(), r.month.month()));
    columns.push(float_column(rows, "smb", |r| r.smb));
    columns.push(float_column(rows, "hml", |r| r.hml));
    columns.push(float_column(rows, "reference_smb", |r| r.reference_smb));
    columns.push(float_column(rows, "reference_hml", |r| r.reference_hml));
    Ok(DataFrame::new(columns)?)
}

/// Write a frame to CSV with a header row.
///
/// # Errors
/// Returns `DataError` if the file cannot be created or written.
pub fn write_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<(), DataError> {
    let path = path.as_ref();
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    debug!(path = %path.display(), rows = df.height(), "csv written");
    Ok(())
}
