//! Monthly value-weighted portfolio returns and factor construction.

use std::collections::{BTreeMap, HashMap};

use famafrench_math::WeightedMean;
use famafrench_primitives::{
    Assignment, BucketAssignment, BucketPair, BucketReturns, Date, FirmCounts,
    MonthlyFactorRecord, MonthlyObservation, SecurityId, YearMonth,
};
use famafrench_traits::{ConfigError, Stage, StageKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ModelError;

/// Configuration for portfolio aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Calendar month of the annual rebalance; assignments made in it hold
    /// from the following month through the next rebalance month.
    pub rebalance_month: u32,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self { rebalance_month: 6 }
    }
}

impl PortfolioConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the rebalance month is not a calendar month.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=12).contains(&self.rebalance_month) {
            return Err(ConfigError::invalid("rebalance_month", "must be in 1..=12"));
        }
        Ok(())
    }

    const fn holding_year(&self, month: YearMonth) -> i32 {
        month.fiscal_year(self.rebalance_month as i32)
    }
}

/// Monthly factor series and cell membership counts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorPanel {
    /// One record per month, chronological.
    pub factors: Vec<MonthlyFactorRecord>,
    /// Cell counts aligned with `factors`.
    pub counts: Vec<FirmCounts>,
}

#[derive(Debug)]
struct MonthCell {
    date: Date,
    returns: [WeightedMean; 6],
    counts: [usize; 6],
}

impl MonthCell {
    const fn new(date: Date) -> Self {
        Self { date, returns: [WeightedMean::new(); 6], counts: [0; 6] }
    }
}

/// Holds each annual assignment fixed over its holding year and aggregates
/// monthly returns into the six cells, weighting by lagged market value.
#[derive(Debug, Clone, Default)]
pub struct PortfolioAggregator {
    config: PortfolioConfig,
}

impl PortfolioAggregator {
    /// Create a new aggregator with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(PortfolioConfig::default())
    }
}

impl Stage for PortfolioAggregator {
    type Config = PortfolioConfig;
    type Input<'a> = (&'a [MonthlyObservation], &'a [BucketAssignment]);
    type Output = FactorPanel;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Portfolio
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;
        let (observations, assignments) = input;

        let held: HashMap<(SecurityId, i32), Assignment> =
            assignments.iter().map(|a| ((a.security_id, a.fiscal_year()), a.assignment)).collect();

        let mut cells: BTreeMap<YearMonth, MonthCell> = BTreeMap::new();
        let mut matched = 0_usize;
        for obs in observations {
            let key = (obs.security_id, self.config.holding_year(obs.month));
            let Some(assignment) = held.get(&key) else {
                continue;
            };
            matched += 1;

            let cell = cells.entry(obs.month).or_insert_with(|| MonthCell::new(obs.month_end));
            if let Some(pair) = assignment.pair() {
                cell.counts[pair.index()] += 1;
                if let Some(weight) = obs.lagged_market_value {
                    cell.returns[pair.index()].push(obs.adjusted_return, weight);
                }
            }
        }

        let mut panel = FactorPanel::default();
        for (month, cell) in cells {
            let mut returns = BucketReturns::default();
            for pair in BucketPair::ALL {
                returns.set(pair, cell.returns[pair.index()].value());
            }
            panel.factors.push(MonthlyFactorRecord::new(month, cell.date, returns));
            panel.counts.push(FirmCounts::new(month, cell.counts));
        }

        debug!(
            stage = %self.kind(),
            observations = observations.len(),
            matched,
            months = panel.factors.len(),
            "portfolio returns aggregated"
        );
        Ok(panel)
    }
}
