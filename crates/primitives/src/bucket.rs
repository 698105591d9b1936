//! Portfolio bucket definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size bucket from the median market value split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SizeBucket {
    /// At or below the median.
    Small,
    /// Above the median.
    Big,
}

impl SizeBucket {
    /// All size buckets.
    pub const ALL: [Self; 2] = [Self::Small, Self::Big];

    /// Single-letter label.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Small => "S",
            Self::Big => "B",
        }
    }
}

/// Value bucket from the 30th/70th percentile book-to-market split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ValueBucket {
    /// At or below the 30th percentile (growth).
    Low,
    /// Between the 30th and 70th percentiles.
    Medium,
    /// Above the 70th percentile (value).
    High,
}

impl ValueBucket {
    /// All value buckets.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Single-letter label.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Low => "L",
            Self::Medium => "M",
            Self::High => "H",
        }
    }
}

/// One of the six size/value portfolio cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BucketPair {
    /// Size bucket.
    pub size: SizeBucket,
    /// Value bucket.
    pub value: ValueBucket,
}

impl BucketPair {
    /// All six cells, small before big, low before high.
    pub const ALL: [Self; 6] = [
        Self::new(SizeBucket::Small, ValueBucket::Low),
        Self::new(SizeBucket::Small, ValueBucket::Medium),
        Self::new(SizeBucket::Small, ValueBucket::High),
        Self::new(SizeBucket::Big, ValueBucket::Low),
        Self::new(SizeBucket::Big, ValueBucket::Medium),
        Self::new(SizeBucket::Big, ValueBucket::High),
    ];

    /// Create a new cell.
    #[must_use]
    pub const fn new(size: SizeBucket, value: ValueBucket) -> Self {
        Self { size, value }
    }

    /// Position of this cell within [`Self::ALL`].
    #[must_use]
    pub const fn index(&self) -> usize {
        let row = match self.size {
            SizeBucket::Small => 0,
            SizeBucket::Big => 3,
        };
        let col = match self.value {
            ValueBucket::Low => 0,
            ValueBucket::Medium => 1,
            ValueBucket::High => 2,
        };
        row + col
    }
}

impl fmt::Display for BucketPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.size.code(), self.value.code())
    }
}

/// Outcome of the annual bucket assignment for one security.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Assignment {
    /// Failed eligibility; excluded from portfolios for the year.
    Unassigned,
    /// Member of the given cell for the year.
    Assigned(BucketPair),
}

impl Assignment {
    /// The assigned cell, if any.
    #[must_use]
    pub const fn pair(&self) -> Option<BucketPair> {
        match self {
            Self::Unassigned => None,
            Self::Assigned(pair) => Some(*pair),
        }
    }

    /// Whether a cell was assigned.
    #[must_use]
    pub const fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}
