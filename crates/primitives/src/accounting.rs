//! Firm accounting record definitions.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::{CompanyKey, Date, SecurityId, YearMonth};

/// One annual accounting observation as supplied by the caller.
///
/// Monetary fields are `None` when the source cell was empty or non-numeric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAccountingRecord {
    /// Linked security.
    pub security_id: SecurityId,
    /// Accounting-side company key, if supplied.
    pub company_key: Option<CompanyKey>,
    /// Fiscal period end date.
    pub report_date: Date,
    /// Stockholders' equity.
    pub stockholders_equity: Option<f64>,
    /// Balance-sheet deferred taxes and investment tax credit.
    pub deferred_tax_credit: Option<f64>,
    /// Preferred stock redemption value.
    pub preferred_redemption: Option<f64>,
    /// Preferred stock liquidating value.
    pub preferred_liquidation: Option<f64>,
    /// Preferred stock par value.
    pub preferred_par: Option<f64>,
}

impl RawAccountingRecord {
    /// Book value of preferred stock.
    ///
    /// Redemption value, else liquidating value, else par value, else zero.
    #[must_use]
    pub fn preferred_stock_value(&self) -> f64 {
        self.preferred_redemption
            .or(self.preferred_liquidation)
            .or(self.preferred_par)
            .unwrap_or(0.0)
    }

    /// Book equity, or `None` when it is missing or not strictly positive.
    #[must_use]
    pub fn book_equity(&self) -> Option<f64> {
        let equity = self.stockholders_equity?;
        let be = equity + self.deferred_tax_credit.unwrap_or(0.0) - self.preferred_stock_value();
        (be > 0.0).then_some(be)
    }

    /// Calendar year of the report date.
    #[must_use]
    pub fn calendar_year(&self) -> i32 {
        self.report_date.year()
    }
}

/// A cleaned accounting record, one per security and calendar year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountingRecord {
    /// Linked security.
    pub security_id: SecurityId,
    /// Accounting-side company key, if supplied.
    pub company_key: Option<CompanyKey>,
    /// Fiscal period end date.
    pub report_date: Date,
    /// Calendar year of `report_date`.
    pub fiscal_year: i32,
    /// Strictly positive book equity, or `None`.
    pub book_equity: Option<f64>,
    /// Number of earlier accounting records for this security (zero-based).
    pub tenure_count: u32,
}

impl AccountingRecord {
    /// First rebalance month at which this record may be used.
    ///
    /// The report date is moved to its calendar year-end and then forward by
    /// `lag_months`; with the usual six months a fiscal year ending anywhere in
    /// 2018 becomes usable in June 2019.
    #[must_use]
    pub fn available_from(&self, lag_months: i32) -> YearMonth {
        YearMonth::from_date(self.report_date).year_end().shift(lag_months)
    }
}
