//! Lagged market values and annual rebalance snapshots.

use std::collections::{BTreeMap, HashMap};

use famafrench_primitives::{
    MonthlyObservation, RebalanceSnapshot, SecurityId, SecurityRecord, YearMonth,
};
use famafrench_traits::{ConfigError, Stage, StageKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ModelError;

/// How the previous month's market value is located.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LagPolicy {
    /// Only the observation for the immediately preceding calendar month
    /// counts; a gap leaves the lag missing.
    #[default]
    CalendarMonth,
    /// The previous surviving observation, however far back.
    PreviousObservation,
}

/// Configuration for temporal alignment.
///
/// Book-to-market always uses the December market value of the calendar year
/// before the rebalance, whatever `rebalance_month` is; only the snapshot
/// month moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    /// Calendar month of the annual rebalance (1-12).
    pub rebalance_month: u32,
    /// Lag lookup rule.
    pub lag_policy: LagPolicy,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self { rebalance_month: 6, lag_policy: LagPolicy::CalendarMonth }
    }
}

impl AlignConfig {
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
}

/// Monthly observations with lags, plus one snapshot per security per
/// rebalance month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignedPanel {
    /// Every surviving security-month, ordered by security then month.
    pub observations: Vec<MonthlyObservation>,
    /// Rebalance-month rows with prior December market value attached.
    pub snapshots: Vec<RebalanceSnapshot>,
}

/// Aligns security-months onto the annual rebalancing calendar.
#[derive(Debug, Clone, Default)]
pub struct TemporalAligner {
    config: AlignConfig,
}

impl TemporalAligner {
    /// Create a new aligner with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(AlignConfig::default())
    }

    fn lagged(&self, previous: Option<&SecurityRecord>, current: &SecurityRecord) -> Option<f64> {
        let previous = previous?;
        match self.config.lag_policy {
            LagPolicy::CalendarMonth if previous.month != current.month.prev() => None,
            _ => previous.market_value,
        }
    }
}

impl Stage for TemporalAligner {
    type Config = AlignConfig;
    type Input<'a> = &'a [SecurityRecord];
    type Output = AlignedPanel;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Alignment
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;

        let mut histories: BTreeMap<SecurityId, Vec<&SecurityRecord>> = BTreeMap::new();
        for record in input {
            histories.entry(record.security_id).or_default().push(record);
        }

        let december: HashMap<(SecurityId, YearMonth), Option<f64>> = input
            .iter()
            .filter(|r| r.month.month() == 12)
            .map(|r| ((r.security_id, r.month), r.market_value))
            .collect();

        let mut panel =
            AlignedPanel { observations: Vec::with_capacity(input.len()), snapshots: Vec::new() };
        for (security_id, mut history) in histories {
            history.sort_by_key(|r| r.month);

            let mut previous: Option<&SecurityRecord> = None;
            for record in history {
                let lagged_market_value = self.lagged(previous, record);
                previous = Some(record);

                panel.observations.push(MonthlyObservation {
                    security_id,
                    month: record.month,
                    month_end: record.month_end,
                    adjusted_return: record.adjusted_return,
                    market_value: record.market_value,
                    lagged_market_value,
                });

                if record.month.month() != self.config.rebalance_month {
                    continue;
                }
                let prior_december = YearMonth::new(record.month.year().saturating_sub(1), 12)
                    .and_then(|dec| december.get(&(security_id, dec)).copied().flatten());
                panel.snapshots.push(RebalanceSnapshot {
                    security_id,
                    firm_id: record.firm_id,
                    rebalance: record.month,
                    rebalance_date: record.month_end,
                    exchange: record.exchange,
                    market_value: record.market_value,
                    lagged_market_value,
                    prior_december_market_value: prior_december,
                });
            }
        }

        debug!(
            stage = %self.kind(),
            observations = panel.observations.len(),
            snapshots = panel.snapshots.len(),
            with_lag = panel.observations.iter().filter(|o| o.lagged_market_value.is_some()).count(),
            "security months aligned"
        );
        Ok(panel)
    }
}
