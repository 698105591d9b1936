//! Factor output type definitions.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{BucketPair, Date, SizeBucket, ValueBucket, YearMonth};

/// Value-weighted returns of the six cells for one month.
///
/// A cell is `None` when it had no member with a usable weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BucketReturns([Option<f64>; 6]);

impl BucketReturns {
    /// Create from cell returns ordered as [`BucketPair::ALL`].
    #[must_use]
    pub const fn new(returns: [Option<f64>; 6]) -> Self {
        Self(returns)
    }

    /// Return of one cell.
    #[must_use]
    pub const fn get(&self, pair: BucketPair) -> Option<f64> {
        self.0[pair.index()]
    }

    /// Set the return of one cell.
    pub fn set(&mut self, pair: BucketPair, value: Option<f64>) {
        self.0[pair.index()] = value;
    }

    fn cell(&self, size: SizeBucket, value: ValueBucket) -> Option<f64> {
        self.get(BucketPair::new(size, value))
    }

    /// Average of the two high book-to-market cells.
    #[must_use]
    pub fn wh(&self) -> Option<f64> {
        Some((self.cell(SizeBucket::Big, ValueBucket::High)?
            + self.cell(SizeBucket::Small, ValueBucket::High)?)
            / 2.0)
    }

    /// Average of the two low book-to-market cells.
    #[must_use]
    pub fn wl(&self) -> Option<f64> {
        Some((self.cell(SizeBucket::Big, ValueBucket::Low)?
            + self.cell(SizeBucket::Small, ValueBucket::Low)?)
            / 2.0)
    }

    /// Average of the three big cells.
    #[must_use]
    pub fn wb(&self) -> Option<f64> {
        self.size_leg(SizeBucket::Big)
    }

    /// Average of the three small cells.
    #[must_use]
    pub fn ws(&self) -> Option<f64> {
        self.size_leg(SizeBucket::Small)
    }

    fn size_leg(&self, size: SizeBucket) -> Option<f64> {
        Some(
            (self.cell(size, ValueBucket::Low)?
                + self.cell(size, ValueBucket::Medium)?
                + self.cell(size, ValueBucket::High)?)
                / 3.0,
        )
    }

    /// High minus low.
    #[must_use]
    pub fn hml(&self) -> Option<f64> {
        Some(self.wh()? - self.wl()?)
    }

    /// Small minus big.
    #[must_use]
    pub fn smb(&self) -> Option<f64> {
        Some(self.ws()? - self.wb()?)
    }
}

impl Index<BucketPair> for BucketReturns {
    type Output = Option<f64>;

    fn index(&self, pair: BucketPair) -> &Self::Output {
        &self.0[pair.index()]
    }
}

/// Replicated factor values for one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyFactorRecord {
    /// Calendar month.
    pub month: YearMonth,
    /// Last day of `month`.
    pub date: Date,
    /// Value-weighted cell returns.
    pub returns: BucketReturns,
    /// Size factor.
    pub smb: Option<f64>,
    /// Value factor.
    pub hml: Option<f64>,
}

impl MonthlyFactorRecord {
    /// Build a record, deriving both factors from the cell returns.
    #[must_use]
    pub fn new(month: YearMonth, date: Date, returns: BucketReturns) -> Self {
        Self { month, date, smb: returns.smb(), hml: returns.hml(), returns }
    }
}

/// Number of portfolio members per cell for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmCounts {
    /// Calendar month.
    pub month: YearMonth,
    counts: [usize; 6],
}

impl FirmCounts {
    /// Create from counts ordered as [`BucketPair::ALL`].
    #[must_use]
    pub const fn new(month: YearMonth, counts: [usize; 6]) -> Self {
        Self { month, counts }
    }

    /// Members of one cell.
    #[must_use]
    pub const fn get(&self, pair: BucketPair) -> usize {
        self.counts[pair.index()]
    }

    fn value_leg(&self, value: ValueBucket) -> usize {
        self.get(BucketPair::new(SizeBucket::Small, value))
            + self.get(BucketPair::new(SizeBucket::Big, value))
    }

    fn size_leg(&self, size: SizeBucket) -> usize {
        ValueBucket::ALL.iter().map(|&v| self.get(BucketPair::new(size, v))).sum()
    }

    /// Members of the two high cells.
    #[must_use]
    pub fn high(&self) -> usize {
        self.value_leg(ValueBucket::High)
    }

    /// Members of the two low cells.
    #[must_use]
    pub fn low(&self) -> usize {
        self.value_leg(ValueBucket::Low)
    }

    /// Members of both legs of the value factor.
    #[must_use]
    pub fn hml(&self) -> usize {
        self.high() + self.low()
    }

    /// Members of the three big cells.
    #[must_use]
    pub fn big(&self) -> usize {
        self.size_leg(SizeBucket::Big)
    }

    /// Members of the three small cells.
    #[must_use]
    pub fn small(&self) -> usize {
        self.size_leg(SizeBucket::Small)
    }

    /// Members of both legs of the size factor.
    #[must_use]
    pub fn smb(&self) -> usize {
        self.big() + self.small()
    }

    /// All members.
    #[must_use]
    pub fn total(&self) -> usize {
        self.smb()
    }
}

/// One month of an externally published factor series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFactorRecord {
    /// Calendar month.
    pub month: YearMonth,
    /// Size factor in the source's units.
    pub smb: Option<f64>,
    /// Value factor in the source's units.
    pub hml: Option<f64>,
}
