//! Joins accounting records to rebalance snapshots.

use std::collections::HashMap;

use famafrench_primitives::{
    AccountingRecord, RebalanceRecord, RebalanceSnapshot, SecurityId, YearMonth,
};
use famafrench_traits::{ConfigError, Stage, StageKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ModelError;

/// Longest accepted reporting lag, in months.
pub const MAX_REPORTING_LAG_MONTHS: i32 = 120;

/// Configuration for the accounting/security merge.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Months after the report's calendar year-end before it may be used.
    pub reporting_lag_months: i32,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self { reporting_lag_months: 6 }
    }
}

impl MergeConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` if the lag is negative or longer than
    /// [`MAX_REPORTING_LAG_MONTHS`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_REPORTING_LAG_MONTHS).contains(&self.reporting_lag_months) {
            return Err(ConfigError::invalid(
                "reporting_lag_months",
                format!("must be in 0..={MAX_REPORTING_LAG_MONTHS}"),
            ));
        }
        Ok(())
    }
}

/// Attaches book equity to each rebalance snapshot and derives book-to-market.
///
/// This is an inner join on the record's availability month: a snapshot with
/// no accounting record becoming available exactly at its rebalance month is
/// dropped for that year.
#[derive(Debug, Clone, Default)]
pub struct AccountingSecurityMerger {
    config: MergeConfig,
}

impl AccountingSecurityMerger {
    /// Create a new merger with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(MergeConfig::default())
    }
}

impl Stage for AccountingSecurityMerger {
    type Config = MergeConfig;
    type Input<'a> = (&'a [AccountingRecord], &'a [RebalanceSnapshot]);
    type Output = Vec<RebalanceRecord>;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Merge
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;
        let (accounting, snapshots) = input;

        let available: HashMap<(SecurityId, YearMonth), &AccountingRecord> = accounting
            .iter()
            .map(|r| ((r.security_id, r.available_from(self.config.reporting_lag_months)), r))
            .collect();

        let mut merged: Vec<RebalanceRecord> = snapshots
            .iter()
            .filter_map(|snap| {
                let record = available.get(&(snap.security_id, snap.rebalance))?;
                Some(RebalanceRecord {
                    security_id: snap.security_id,
                    rebalance: snap.rebalance,
                    rebalance_date: snap.rebalance_date,
                    exchange: snap.exchange,
                    market_value: snap.market_value,
                    lagged_market_value: snap.lagged_market_value,
                    prior_december_market_value: snap.prior_december_market_value,
                    book_equity: record.book_equity,
                    book_to_market: book_to_market(
                        record.book_equity,
                        snap.prior_december_market_value,
                    ),
                    tenure_count: record.tenure_count,
                })
            })
            .collect();
        merged.sort_by_key(|r| (r.rebalance, r.security_id));

        debug!(
            stage = %self.kind(),
            accounting = accounting.len(),
            snapshots = snapshots.len(),
            merged = merged.len(),
            "accounting joined to rebalance snapshots"
        );
        Ok(merged)
    }
}

fn book_to_market(book_equity: Option<f64>, december_value: Option<f64>) -> Option<f64> {
    let dec = december_value.filter(|v| *v > 0.0)?;
    Some(book_equity? / dec)
}
