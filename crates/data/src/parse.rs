//! Cell-level parsing of text columns.

use chrono::NaiveDate;
use famafrench_primitives::{Date, YearMonth};
use polars::prelude::*;

use crate::DataError;

const DATE_FORMATS: [&str; 3] = ["%Y%m%d", "%Y-%m-%d", "%Y/%m/%d"];

/// A column read as text, whatever its stored type.
pub(crate) struct TextColumn {
    name: String,
    values: StringChunked,
}

impl TextColumn {
    /// Look up a required column.
    pub(crate) fn required(df: &DataFrame, name: &str) -> Result<Self, DataError> {
        Self::optional(df, name)?.ok_or_else(|| DataError::MissingColumn(name.to_string()))
    }

    /// Look up a column that may be absent.
    pub(crate) fn optional(df: &DataFrame, name: &str) -> Result<Option<Self>, DataError> {
        if df.get_column_index(name).is_none() {
            return Ok(None);
        }
        let cast = df.column(name)?.cast(&DataType::String)?;
        Ok(Some(Self { name: name.to_string(), values: cast.str()?.clone() }))
    }

    fn cell(&self, row: usize) -> Option<&str> {
        self.values.get(row).map(str::trim).filter(|s| !s.is_empty())
    }

    /// Numeric cell; empty or non-numeric text is missing.
    pub(crate) fn number(&self, row: usize) -> Option<f64> {
        parse_number(self.cell(row)?)
    }

    /// Integer code cell such as an exchange or share code.
    pub(crate) fn code(&self, row: usize) -> Option<i32> {
        parse_code(self.cell(row)?)
    }

    /// Free text cell.
    pub(crate) fn text(&self, row: usize) -> Option<&str> {
        self.cell(row)
    }

    /// Required identifier cell.
    pub(crate) fn identifier(&self, row: usize) -> Result<u64, DataError> {
        self.cell(row).and_then(parse_identifier).ok_or_else(|| DataError::InvalidIdentifier {
            column: self.name.clone(),
            row: row + 1,
            value: self.values.get(row).unwrap_or_default().to_string(),
        })
    }

    /// Required calendar date cell.
    pub(crate) fn date(&self, row: usize) -> Result<Date, DataError> {
        self.cell(row).and_then(parse_date).ok_or_else(|| self.invalid_date(row))
    }

    /// Required `YYYYMM` month cell.
    pub(crate) fn year_month(&self, row: usize) -> Result<YearMonth, DataError> {
        self.cell(row).and_then(parse_year_month).ok_or_else(|| self.invalid_date(row))
    }

    fn invalid_date(&self, row: usize) -> DataError {
        DataError::InvalidDate {
            column: self.name.clone(),
            row: row + 1,
            value: self.values.get(row).unwrap_or_default().to_string(),
        }
    }
}

pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn parse_code(s: &str) -> Option<i32> {
    s.parse::<i32>().ok().or_else(|| {
        let v = parse_number(s)?;
        (v.fract() == 0.0 && v.abs() <= f64::from(i32::MAX)).then_some(v as i32)
    })
}

pub(crate) fn parse_identifier(s: &str) -> Option<u64> {
    s.parse::<u64>().ok().or_else(|| {
        let v = parse_number(s)?;
        (v.fract() == 0.0 && v >= 0.0 && v < u64::MAX as f64).then_some(v as u64)
    })
}

pub(crate) fn parse_date(s: &str) -> Option<Date> {
    // strip a trailing time component
    let day = s.split([' ', 'T']).next()?;
    DATE_FORMATS.iter().find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

pub(crate) fn parse_year_month(s: &str) -> Option<YearMonth> {
    YearMonth::from_yyyymm(parse_code(s)?.into())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("0.0125", Some(0.0125))]
    #[case("-3.5", Some(-3.5))]
    #[case("B", None)]
    #[case("C", None)]
    #[case("NaN", None)]
    #[case("inf", None)]
    fn numbers(#[case] input: &str, #[case] expected: Option<f64>) {
        assert_eq!(parse_number(input), expected);
    }

    #[rstest]
    #[case("10", Some(10))]
    #[case("11.0", Some(11))]
    #[case("10.5", None)]
    #[case("x", None)]
    fn codes(#[case] input: &str, #[case] expected: Option<i32>) {
        assert_eq!(parse_code(input), expected);
    }

    #[rstest]
    #[case("10001", Some(10001))]
    #[case("10001.0", Some(10001))]
    #[case("-4", None)]
    #[case("A1", None)]
    fn identifiers(#[case] input: &str, #[case] expected: Option<u64>) {
        assert_eq!(parse_identifier(input), expected);
    }

    #[rstest]
    #[case("19630731")]
    #[case("1963-07-31")]
    #[case("1963/07/31")]
    #[case("1963-07-31 00:00:00")]
    #[case("1963-07-31T00:00:00")]
    fn date_formats(#[case] input: &str) {
        assert_eq!(parse_date(input), NaiveDate::from_ymd_opt(1963, 7, 31));
    }

    #[test]
    fn year_months() {
        assert_eq!(parse_year_month("196307"), YearMonth::new(1963, 7));
        assert_eq!(parse_year_month("196300"), None);
        assert_eq!(parse_year_month("Annual"), None);
    }
}
