//! Readers turning CSV files into pipeline records.

use std::path::Path;

use famafrench_primitives::{
    CompanyKey, FirmId, RawAccountingRecord, RawSecurityRecord, ReferenceFactorRecord, SecurityId,
};
use polars::prelude::*;
use tracing::debug;

use crate::{DataError, parse::TextColumn};

/// Read a CSV file with a header row, keeping every column as text.
///
/// # Errors
/// Returns `DataError::Polars` if the file cannot be read or parsed as CSV.
pub fn read_csv(path: impl AsRef<Path>) -> Result<DataFrame, DataError> {
    let path = path.as_ref();
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "csv loaded");
    Ok(df)
}

/// Build accounting records from a frame with columns `LPERMNO`, `datadate`,
/// `seq`, `txditc`, `pstkrv`, `pstkl`, `pstk`, and optionally `GVKEY`.
///
/// # Errors
/// Returns `DataError` if a required column is missing or an identifier or
/// date cell cannot be parsed.
pub fn accounting_from_frame(df: &DataFrame) -> Result<Vec<RawAccountingRecord>, DataError> {
    let permno = TextColumn::required(df, "LPERMNO")?;
    let gvkey = TextColumn::optional(df, "GVKEY")?;
    let datadate = TextColumn::required(df, "datadate")?;
    let seq = TextColumn::required(df, "seq")?;
    let txditc = TextColumn::required(df, "txditc")?;
    let pstkrv = TextColumn::required(df, "pstkrv")?;
    let pstkl = TextColumn::required(df, "pstkl")?;
    let pstk = TextColumn::required(df, "pstk")?;

    (0..df.height())
        .map(|row| -> Result<RawAccountingRecord, DataError> {
            Ok(RawAccountingRecord {
                security_id: SecurityId::new(permno.identifier(row)?),
                company_key: gvkey.as_ref().and_then(|c| c.text(row)).map(CompanyKey::from),
                report_date: datadate.date(row)?,
                stockholders_equity: seq.number(row),
                deferred_tax_credit: txditc.number(row),
                preferred_redemption: pstkrv.number(row),
                preferred_liquidation: pstkl.number(row),
                preferred_par: pstk.number(row),
            })
        })
        .collect()
}

/// Build security-month records from a frame with columns `PERMNO`,
/// `PERMCO`, `date`, `EXCHCD`, `SHRCD`, `RET`, `PRC`, `SHROUT`, and
/// optionally `DLRET`.
///
/// # Errors
/// Returns `DataError` if a required column is missing or an identifier or
/// date cell cannot be parsed.
pub fn securities_from_frame(df: &DataFrame) -> Result<Vec<RawSecurityRecord>, DataError> {
    let permno = TextColumn::required(df, "PERMNO")?;
    let permco = TextColumn::required(df, "PERMCO")?;
    let date = TextColumn::required(df, "date")?;
    let exchcd = TextColumn::required(df, "EXCHCD")?;
    let shrcd = TextColumn::required(df, "SHRCD")?;
    let ret = TextColumn::required(df, "RET")?;
    let dlret = TextColumn::optional(df, "DLRET")?;
    let prc = TextColumn::required(df, "PRC")?;
    let shrout = TextColumn::required(df, "SHROUT")?;

    (0..df.height())
        .map(|row| -> Result<RawSecurityRecord, DataError> {
            Ok(RawSecurityRecord {
                security_id: SecurityId::new(permno.identifier(row)?),
                firm_id: FirmId::new(permco.identifier(row)?),
                date: date.date(row)?,
                exchange_code: exchcd.code(row),
                share_code: shrcd.code(row),
                ret: ret.number(row),
                delisting_return: dlret.as_ref().and_then(|c| c.number(row)),
                price: prc.number(row),
                shares_outstanding: shrout.number(row),
            })
        })
        .collect()
}

/// Build reference factor records from a frame with a `YYYYMM` `date`
/// column and `SMB`, `HML` columns.
///
/// # Errors
/// Returns `DataError` if a column is missing or a date cell cannot be
/// parsed.
pub fn reference_from_frame(df: &DataFrame) -> Result<Vec<ReferenceFactorRecord>, DataError> {
    let date = TextColumn::required(df, "date")?;
    let smb = TextColumn::required(df, "SMB")?;
    let hml = TextColumn::required(df, "HML")?;

    (0..df.height())
        .map(|row| -> Result<ReferenceFactorRecord, DataError> {
            Ok(ReferenceFactorRecord {
                month: date.year_month(row)?,
                smb: smb.number(row),
                hml: hml.number(row),
            })
        })
        .collect()
}

/// Read accounting records from a CSV file.
///
/// # Errors
/// See [`read_csv`] and [`accounting_from_frame`].
pub fn read_accounting(path: impl AsRef<Path>) -> Result<Vec<RawAccountingRecord>, DataError> {
    accounting_from_frame(&read_csv(path)?)
}

/// Read security-month records from a CSV file.
///
/// # Errors
/// See [`read_csv`] and [`securities_from_frame`].
pub fn read_securities(path: impl AsRef<Path>) -> Result<Vec<RawSecurityRecord>, DataError> {
    securities_from_frame(&read_csv(path)?)
}

/// Read a reference factor series from a CSV file.
///
/// # Errors
/// See [`read_csv`] and [`reference_from_frame`].
pub fn read_reference(path: impl AsRef<Path>) -> Result<Vec<ReferenceFactorRecord>, DataError> {
    reference_from_frame(&read_csv(path)?)
}
