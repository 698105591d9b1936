//! Annual rebalancing record definitions.

use serde::{Deserialize, Serialize};

use crate::{Assignment, Date, Exchange, FirmId, SecurityId, YearMonth};

/// Security state in a rebalance month, before accounting data is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceSnapshot {
    /// Security identifier.
    pub security_id: SecurityId,
    /// Parent firm identifier.
    pub firm_id: FirmId,
    /// Rebalance month.
    pub rebalance: YearMonth,
    /// Last day of the rebalance month.
    pub rebalance_date: Date,
    /// Listing exchange.
    pub exchange: Exchange,
    /// Firm-level market value in the rebalance month.
    pub market_value: Option<f64>,
    /// Firm-level market value of the previous month.
    pub lagged_market_value: Option<f64>,
    /// Firm-level market value of the prior December.
    pub prior_december_market_value: Option<f64>,
}

/// A rebalance snapshot joined with its accounting record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceRecord {
    /// Security identifier.
    pub security_id: SecurityId,
    /// Rebalance month.
    pub rebalance: YearMonth,
    /// Last day of the rebalance month.
    pub rebalance_date: Date,
    /// Listing exchange.
    pub exchange: Exchange,
    /// Firm-level market value in the rebalance month.
    pub market_value: Option<f64>,
    /// Firm-level market value of the previous month.
    pub lagged_market_value: Option<f64>,
    /// Firm-level market value of the prior December.
    pub prior_december_market_value: Option<f64>,
    /// Book equity from the matched accounting record.
    pub book_equity: Option<f64>,
    /// Book equity over prior December market value.
    pub book_to_market: Option<f64>,
    /// Accounting tenure of the matched record.
    pub tenure_count: u32,
}

impl RebalanceRecord {
    /// Whether book-to-market, market value, and tenure all clear the given
    /// minimum tenure.
    #[must_use]
    pub fn is_sortable(&self, min_tenure: u32) -> bool {
        matches!(self.book_to_market, Some(bm) if bm > 0.0)
            && matches!(self.market_value, Some(me) if me > 0.0)
            && self.tenure_count >= min_tenure
    }
}

/// Cross-sectional breakpoints for one rebalance month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointSet {
    /// Rebalance month.
    pub rebalance: YearMonth,
    /// Median market value of the reference universe.
    pub size_median: f64,
    /// Lower book-to-market breakpoint (30th percentile by default).
    pub bm_p30: f64,
    /// Upper book-to-market breakpoint (70th percentile by default).
    pub bm_p70: f64,
    /// Number of securities in the reference universe.
    pub universe_size: usize,
}

/// Annual bucket assignment of one security.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketAssignment {
    /// Security identifier.
    pub security_id: SecurityId,
    /// Rebalance month the assignment was made in.
    pub rebalance: YearMonth,
    /// Assigned cell or the unassigned marker.
    pub assignment: Assignment,
    /// Positive book-to-market and market value with sufficient tenure.
    pub has_positive_bm: bool,
}

impl BucketAssignment {
    /// Holding-period year the assignment applies to.
    #[must_use]
    pub const fn fiscal_year(&self) -> i32 {
        self.rebalance.year()
    }

    /// Whether a cell was assigned.
    #[must_use]
    pub const fn has_valid_bucket(&self) -> bool {
        self.assignment.is_assigned()
    }
}
