//! End-to-end factor construction.

use famafrench_primitives::{
    BreakpointSet, BucketAssignment, FirmCounts, FirmMonthRecord, MonthlyFactorRecord,
    RawAccountingRecord, RawSecurityRecord, ReferenceFactorRecord, YearMonth,
};
use famafrench_sorts::{SizeSort, ValueSort};
use famafrench_traits::{ConfigError, Sort, Stage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AccountingPreprocessor, AccountingSecurityMerger, AlignConfig, BreakpointConfig,
    BreakpointEngine, MergeConfig, ModelError, PortfolioAggregator, PortfolioConfig,
    SecurityConfig, SecurityPreprocessor, TemporalAligner, ValidationConfig, ValidationReport,
    ValidationReporter,
};

/// Configuration of every stage.
///
/// Deserialises with `#[serde(default)]`, so a JSON file only needs the
/// fields it overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Security universe and market value.
    pub security: SecurityConfig,
    /// Lags and rebalance calendar.
    pub align: AlignConfig,
    /// Accounting reporting lag.
    pub merge: MergeConfig,
    /// Breakpoint universe and sorts.
    pub breakpoints: BreakpointConfig,
    /// Holding-period aggregation.
    pub portfolio: PortfolioConfig,
    /// Comparison window and acceptance.
    pub validation: ValidationConfig,
}

impl PipelineConfig {
    /// Check every stage configuration and their mutual consistency.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.security.validate()?;
        self.align.validate()?;
        self.merge.validate()?;
        self.portfolio.validate()?;
        self.validation.validate()?;
        SizeSort::with_config(self.breakpoints.size.clone()).validate()?;
        ValueSort::with_config(self.breakpoints.value.clone()).validate()?;

        let rebalance = self.align.rebalance_month;
        if self.portfolio.rebalance_month != rebalance {
            return Err(ConfigError::invalid(
                "portfolio.rebalance_month",
                format!("must equal align.rebalance_month ({rebalance})"),
            ));
        }
        let available = YearMonth::clamped(0, 12)
            .checked_shift(self.merge.reporting_lag_months)
            .ok_or_else(|| ConfigError::invalid("merge.reporting_lag_months", "out of range"))?;
        if available.month() != rebalance {
            return Err(ConfigError::invalid(
                "merge.reporting_lag_months",
                format!("year-end plus lag lands in month {}, not {rebalance}", available.month()),
            ));
        }
        Ok(())
    }
}

/// Borrowed input record sets.
#[derive(Debug, Clone, Copy)]
pub struct PipelineInputs<'a> {
    /// Annual accounting records.
    pub accounting: &'a [RawAccountingRecord],
    /// Monthly security records.
    pub securities: &'a [RawSecurityRecord],
    /// Published factor series; may be empty.
    pub reference: &'a [ReferenceFactorRecord],
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Monthly factor series.
    pub factors: Vec<MonthlyFactorRecord>,
    /// Monthly cell counts.
    pub counts: Vec<FirmCounts>,
    /// Firm-month market value aggregates.
    pub firm_months: Vec<FirmMonthRecord>,
    /// Breakpoints per rebalance month.
    pub breakpoints: Vec<BreakpointSet>,
    /// Annual bucket assignments.
    pub assignments: Vec<BucketAssignment>,
    /// Comparison against the reference series.
    pub validation: ValidationReport,
}

/// Runs all stages in dependency order.
///
/// # Example
/// ```
/// use famafrench_model::{FactorPipeline, PipelineConfig, PipelineInputs};
///
/// let pipeline = FactorPipeline::with_config(PipelineConfig::default()).unwrap();
/// let output = pipeline
///     .run(PipelineInputs { accounting: &[], securities: &[], reference: &[] })
///     .unwrap();
/// assert!(output.factors.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct FactorPipeline {
    config: PipelineConfig,
    accounting: AccountingPreprocessor,
    security: SecurityPreprocessor,
    aligner: TemporalAligner,
    merger: AccountingSecurityMerger,
    breakpoints: BreakpointEngine,
    portfolio: PortfolioAggregator,
    validation: ValidationReporter,
}

impl FactorPipeline {
    /// Build a pipeline, validating the configuration up front.
    ///
    /// # Errors
    /// Returns `ModelError::Config` if the configuration is invalid.
    pub fn with_config(config: PipelineConfig) -> Result<Self, ModelError> {
        config.validate()?;
        Ok(Self {
            accounting: AccountingPreprocessor::new(),
            security: SecurityPreprocessor::with_config(config.security.clone()),
            aligner: TemporalAligner::with_config(config.align.clone()),
            merger: AccountingSecurityMerger::with_config(config.merge.clone()),
            breakpoints: BreakpointEngine::with_config(config.breakpoints.clone()),
            portfolio: PortfolioAggregator::with_config(config.portfolio.clone()),
            validation: ValidationReporter::with_config(config.validation.clone()),
            config,
        })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage over the inputs.
    ///
    /// # Errors
    /// Returns `ModelError` if a stage fails.
    pub fn run(&self, inputs: PipelineInputs<'_>) -> Result<PipelineOutput, ModelError> {
        let accounting = self.accounting.run(inputs.accounting)?;
        let securities = self.security.run(inputs.securities)?;
        let aligned = self.aligner.run(&securities.records)?;
        let merged = self.merger.run((&accounting[..], &aligned.snapshots[..]))?;
        let buckets = self.breakpoints.run(&merged)?;
        let factors = self.portfolio.run((&aligned.observations[..], &buckets.assignments[..]))?;
        let validation = self.validation.run((&factors.factors[..], inputs.reference))?;

        info!(
            months = factors.factors.len(),
            first = ?factors.factors.first().map(|f| f.month.to_string()),
            last = ?factors.factors.last().map(|f| f.month.to_string()),
            rebalance_dates = buckets.breakpoints.len(),
            smb_correlation = ?validation.smb_correlation,
            hml_correlation = ?validation.hml_correlation,
            "factor replication complete"
        );

        Ok(PipelineOutput {
            factors: factors.factors,
            counts: factors.counts,
            firm_months: securities.firm_months,
            breakpoints: buckets.breakpoints,
            assignments: buckets.assignments,
            validation,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::LagPolicy;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_overrides_named_fields() {
        let json = r#"{
            "align": { "lag_policy": "previous_observation" },
            "validation": { "start": "1970-01", "acceptance_threshold": 0.9 }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.align.lag_policy, LagPolicy::PreviousObservation);
        assert_eq!(config.align.rebalance_month, 6);
        assert_eq!(config.validation.start, YearMonth::new(1970, 1).unwrap());
        assert_eq!(config.validation.end, YearMonth::new(2020, 12).unwrap());
        assert_eq!(config.security.share_codes, [10, 11]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = PipelineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: PipelineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.validation.start, config.validation.start);
        assert_eq!(back.breakpoints.reference_min_tenure, 2);
    }

    #[rstest]
    #[case(r#"{ "portfolio": { "rebalance_month": 7 } }"#)]
    #[case(r#"{ "merge": { "reporting_lag_months": 3 } }"#)]
    #[case(r#"{ "security": { "shares_scale": 0.0 } }"#)]
    #[case(r#"{ "breakpoints": { "size": { "breakpoint": 1.5 } } }"#)]
    #[case(r#"{ "validation": { "start": "2021-01" } }"#)]
    #[case(r#"{ "merge": { "reporting_lag_months": 2147483647 } }"#)]
    #[case(r#"{ "merge": { "reporting_lag_months": -2147483648 } }"#)]
    #[case(r#"{ "merge": { "reporting_lag_months": 126 } }"#)]
    fn inconsistent_configs_are_rejected(#[case] json: &str) {
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
        assert!(FactorPipeline::with_config(config).is_err());
    }

    #[test]
    fn shifted_rebalance_month_is_consistent() {
        let json = r#"{
            "align": { "rebalance_month": 7 },
            "portfolio": { "rebalance_month": 7 },
            "merge": { "reporting_lag_months": 7 }
        }"#;
        let config: PipelineConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_month_string_fails_to_parse() {
        let json = r#"{ "validation": { "start": "1963-13" } }"#;
        assert!(serde_json::from_str::<PipelineConfig>(json).is_err());
    }
}
