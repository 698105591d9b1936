//! Reference-universe breakpoints and annual bucket assignment.

use std::collections::BTreeMap;

use famafrench_math::{quantile, quantiles};
use famafrench_primitives::{
    Assignment, BreakpointSet, BucketAssignment, BucketPair, Exchange, RebalanceRecord, YearMonth,
};
use famafrench_sorts::{SizeConfig, SizeSort, ValueConfig, ValueSort};
use famafrench_traits::{Sort, Stage, StageKind};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ModelError;

/// Configuration for breakpoint computation and assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakpointConfig {
    /// Exchange whose listings define the breakpoints.
    pub reference_exchange: Exchange,
    /// Minimum tenure to enter the reference universe.
    pub reference_min_tenure: u32,
    /// Minimum tenure to receive a bucket.
    pub assignment_min_tenure: u32,
    /// Size sort configuration.
    pub size: SizeConfig,
    /// Book-to-market sort configuration.
    pub value: ValueConfig,
}

impl Default for BreakpointConfig {
    fn default() -> Self {
        Self {
            reference_exchange: Exchange::Nyse,
            reference_min_tenure: 2,
            assignment_min_tenure: 1,
            size: SizeConfig::default(),
            value: ValueConfig::default(),
        }
    }
}

/// Breakpoints per rebalance month and the assignments made against them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketPanel {
    /// One set per rebalance month with a non-empty reference universe.
    pub breakpoints: Vec<BreakpointSet>,
    /// One assignment per merged rebalance record, ordered by date then
    /// security.
    pub assignments: Vec<BucketAssignment>,
}

/// Computes size and book-to-market breakpoints from the reference universe
/// and sorts every eligible security into one of six cells.
#[derive(Debug, Clone)]
pub struct BreakpointEngine {
    config: BreakpointConfig,
    size: SizeSort,
    value: ValueSort,
}

impl BreakpointEngine {
    /// Create a new engine with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BreakpointConfig::default())
    }

    fn breakpoints(
        &self,
        rebalance: YearMonth,
        records: &[&RebalanceRecord],
    ) -> Result<Option<BreakpointSet>, ModelError> {
        let (me, bm): (Vec<f64>, Vec<f64>) = records
            .iter()
            .filter(|r| r.exchange == self.config.reference_exchange)
            .filter(|r| r.is_sortable(self.config.reference_min_tenure))
            .filter_map(|r| Some((r.market_value?, r.book_to_market?)))
            .unzip();
        if me.is_empty() {
            return Ok(None);
        }

        let universe_size = me.len();
        let me = Array1::from_vec(me);
        let bm = Array1::from_vec(bm);
        let size_median = quantile(me.view(), self.size.config().breakpoint)?;
        let bm_points = quantiles(bm.view(), &self.value.quantiles())?;

        Ok(Some(BreakpointSet {
            rebalance,
            size_median,
            bm_p30: bm_points[0],
            bm_p70: bm_points[1],
            universe_size,
        }))
    }

    fn assign(
        &self,
        record: &RebalanceRecord,
        breakpoints: Option<&BreakpointSet>,
    ) -> BucketAssignment {
        let has_positive_bm = record.is_sortable(self.config.assignment_min_tenure);
        let assignment = match (breakpoints, record.market_value, record.book_to_market) {
            (Some(bp), Some(me), Some(bm)) if has_positive_bm => Assignment::Assigned(
                BucketPair::new(self.size.classify(me, bp), self.value.classify(bm, bp)),
            ),
            _ => Assignment::Unassigned,
        };
        BucketAssignment {
            security_id: record.security_id,
            rebalance: record.rebalance,
            assignment,
            has_positive_bm,
        }
    }
}

impl Default for BreakpointEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Stage for BreakpointEngine {
    type Config = BreakpointConfig;
    type Input<'a> = &'a [RebalanceRecord];
    type Output = BucketPanel;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        let size = SizeSort::with_config(config.size.clone());
        let value = ValueSort::with_config(config.value.clone());
        Self { config, size, value }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Breakpoints
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        self.size.validate()?;
        self.value.validate()?;

        let mut by_date: BTreeMap<YearMonth, Vec<&RebalanceRecord>> = BTreeMap::new();
        for record in input {
            by_date.entry(record.rebalance).or_default().push(record);
        }

        let mut panel = BucketPanel::default();
        for (rebalance, mut records) in by_date {
            records.sort_by_key(|r| r.security_id);

            let breakpoints = self.breakpoints(rebalance, &records)?;
            if breakpoints.is_none() {
                warn!(
                    %rebalance,
                    records = records.len(),
                    "empty reference universe, no securities assigned"
                );
            }

            panel
                .assignments
                .extend(records.iter().map(|r| self.assign(r, breakpoints.as_ref())));
            panel.breakpoints.extend(breakpoints);
        }

        debug!(
            stage = %self.kind(),
            records = input.len(),
            rebalance_dates = panel.breakpoints.len(),
            assigned = panel.assignments.iter().filter(|a| a.has_valid_bucket()).count(),
            "securities sorted into size and value buckets"
        );
        Ok(panel)
    }
}
