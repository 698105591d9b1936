//! Security filtering and firm-level market value aggregation.

use std::{cmp::Ordering, collections::BTreeMap};

use famafrench_primitives::{
    Exchange, FirmId, FirmMonthRecord, RawSecurityRecord, SecurityRecord, YearMonth, month_end,
};
use famafrench_traits::{ConfigError, Stage, StageKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ModelError;

/// Configuration for security preprocessing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Exchange codes to keep.
    pub exchange_codes: Vec<i32>,
    /// Share codes to keep (ordinary common shares).
    pub share_codes: Vec<i32>,
    /// Divisor applied to price times shares; shares are reported in
    /// thousands, so 1000 gives market value in millions.
    pub shares_scale: f64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self { exchange_codes: vec![1, 2, 3], share_codes: vec![10, 11], shares_scale: 1000.0 }
    }
}

impl SecurityConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` for empty code sets, unknown exchange codes, or a
    /// non-positive scale.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exchange_codes.is_empty() {
            return Err(ConfigError::invalid("exchange_codes", "must not be empty"));
        }
        if let Some(code) = self.exchange_codes.iter().find(|&&c| Exchange::from_code(c).is_none())
        {
            return Err(ConfigError::invalid("exchange_codes", format!("unknown code {code}")));
        }
        if self.share_codes.is_empty() {
            return Err(ConfigError::invalid("share_codes", "must not be empty"));
        }
        if !(self.shares_scale.is_finite() && self.shares_scale > 0.0) {
            return Err(ConfigError::invalid("shares_scale", "must be positive and finite"));
        }
        Ok(())
    }
}

/// Cleaned security-months, one surviving row per firm and month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecurityPanel {
    /// Surviving rows carrying firm-level market value, ordered by security
    /// then month.
    pub records: Vec<SecurityRecord>,
    /// Firm-month aggregates, ordered by firm then month.
    pub firm_months: Vec<FirmMonthRecord>,
}

/// Filters the security universe, derives adjusted returns and market value,
/// and folds share classes into one row per firm-month.
#[derive(Debug, Clone, Default)]
pub struct SecurityPreprocessor {
    config: SecurityConfig,
}

impl SecurityPreprocessor {
    /// Create a new security preprocessor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SecurityConfig::default())
    }

    fn clean(&self, raw: &RawSecurityRecord) -> Option<SecurityRecord> {
        let code = raw.exchange_code.filter(|c| self.config.exchange_codes.contains(c))?;
        let exchange = Exchange::from_code(code)?;
        raw.share_code.filter(|c| self.config.share_codes.contains(c))?;
        let ret = raw.ret.filter(|r| r.is_finite())?;
        let month_end = month_end(raw.date)?;

        let delisting = raw.delisting_return.filter(|r| r.is_finite()).unwrap_or(0.0);
        let market_value = match (raw.price, raw.shares_outstanding) {
            (Some(price), Some(shares)) => {
                Some(price.abs() * shares / self.config.shares_scale).filter(|v| v.is_finite())
            }
            _ => None,
        };

        Some(SecurityRecord {
            security_id: raw.security_id,
            firm_id: raw.firm_id,
            month: YearMonth::from_date(raw.date),
            month_end,
            exchange,
            adjusted_return: (1.0 + ret) * (1.0 + delisting) - 1.0,
            market_value,
        })
    }
}

impl Stage for SecurityPreprocessor {
    type Config = SecurityConfig;
    type Input<'a> = &'a [RawSecurityRecord];
    type Output = SecurityPanel;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Security
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;

        let cleaned: Vec<SecurityRecord> = input.iter().filter_map(|raw| self.clean(raw)).collect();
        let cleaned_len = cleaned.len();
        let panel = aggregate_firms(cleaned);

        debug!(
            stage = %self.kind(),
            input = input.len(),
            eligible = cleaned_len,
            firm_months = panel.firm_months.len(),
            "security records cleaned"
        );
        Ok(panel)
    }
}

/// Larger market value first; equal values prefer the lower security id.
fn representative_order(a: &SecurityRecord, b: &SecurityRecord) -> Ordering {
    let mv = |r: &SecurityRecord| r.market_value.unwrap_or(f64::NEG_INFINITY);
    mv(a).total_cmp(&mv(b)).then_with(|| b.security_id.cmp(&a.security_id))
}

fn aggregate_firms(records: Vec<SecurityRecord>) -> SecurityPanel {
    let mut groups: BTreeMap<(FirmId, YearMonth), Vec<SecurityRecord>> = BTreeMap::new();
    for record in records {
        groups.entry((record.firm_id, record.month)).or_default().push(record);
    }

    let mut panel = SecurityPanel::default();
    for ((firm_id, month), members) in groups {
        let total_market_value: f64 = members.iter().filter_map(|r| r.market_value).sum();
        let security_count = members.iter().filter(|r| r.market_value.is_some()).count();

        let Some(mut representative) =
            members.into_iter().filter(|r| r.market_value.is_some()).max_by(representative_order)
        else {
            continue;
        };

        representative.market_value = Some(total_market_value);
        panel.firm_months.push(FirmMonthRecord {
            firm_id,
            month,
            representative: representative.security_id,
            total_market_value,
            security_count,
        });
        panel.records.push(representative);
    }

    panel.records.sort_by_key(|r| (r.security_id, r.month));
    panel
}
