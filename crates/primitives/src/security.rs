//! Security-month record definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Date, FirmId, SecurityId, YearMonth};

/// Listing exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Exchange {
    /// New York Stock Exchange (code 1).
    Nyse,
    /// American Stock Exchange (code 2).
    Amex,
    /// Nasdaq (code 3).
    Nasdaq,
}

impl Exchange {
    /// Map a numeric exchange code to an exchange.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Nyse),
            2 => Some(Self::Amex),
            3 => Some(Self::Nasdaq),
            _ => None,
        }
    }

    /// Numeric exchange code.
    #[must_use]
    pub const fn code(&self) -> i32 {
        match self {
            Self::Nyse => 1,
            Self::Amex => 2,
            Self::Nasdaq => 3,
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nyse => write!(f, "NYSE"),
            Self::Amex => write!(f, "AMEX"),
            Self::Nasdaq => write!(f, "NASDAQ"),
        }
    }
}

/// One security-month as supplied by the caller.
///
/// Numeric fields are `None` when the source cell was empty or held a
/// non-numeric error code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSecurityRecord {
    /// Security identifier.
    pub security_id: SecurityId,
    /// Parent firm identifier.
    pub firm_id: FirmId,
    /// Trading date.
    pub date: Date,
    /// Exchange code.
    pub exchange_code: Option<i32>,
    /// Share code.
    pub share_code: Option<i32>,
    /// Holding period return.
    pub ret: Option<f64>,
    /// Delisting return.
    pub delisting_return: Option<f64>,
    /// Closing price; negative values are bid/ask averages.
    pub price: Option<f64>,
    /// Shares outstanding.
    pub shares_outstanding: Option<f64>,
}

/// A cleaned security-month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityRecord {
    /// Security identifier.
    pub security_id: SecurityId,
    /// Parent firm identifier.
    pub firm_id: FirmId,
    /// Calendar month of the observation.
    pub month: YearMonth,
    /// Last day of `month`.
    pub month_end: Date,
    /// Listing exchange.
    pub exchange: Exchange,
    /// Return including the delisting return.
    pub adjusted_return: f64,
    /// Market value, firm-level once share classes are aggregated.
    pub market_value: Option<f64>,
}

/// Market value of one firm in one month, summed across its share classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FirmMonthRecord {
    /// Parent firm.
    pub firm_id: FirmId,
    /// Calendar month.
    pub month: YearMonth,
    /// Share class with the largest individual market value.
    pub representative: SecurityId,
    /// Sum of the market values of all share classes.
    pub total_market_value: f64,
    /// Number of share classes with a market value.
    pub security_count: usize,
}

/// A surviving security-month with its lagged market value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyObservation {
    /// Security identifier.
    pub security_id: SecurityId,
    /// Calendar month.
    pub month: YearMonth,
    /// Last day of `month`.
    pub month_end: Date,
    /// Return including the delisting return.
    pub adjusted_return: f64,
    /// Firm-level market value.
    pub market_value: Option<f64>,
    /// Firm-level market value of the previous month.
    pub lagged_market_value: Option<f64>,
}
