//! Correlation of the replicated series against a published reference.

use std::collections::HashMap;

use famafrench_math::{pairwise_complete, pearson};
use famafrench_primitives::{MonthlyFactorRecord, ReferenceFactorRecord, YearMonth};
use famafrench_traits::{ConfigError, Stage, StageKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ModelError;

/// Configuration for validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// First month of the comparison window.
    pub start: YearMonth,
    /// Last month of the comparison window.
    pub end: YearMonth,
    /// Divisor bringing reference values to decimal returns.
    pub reference_scale: f64,
    /// Minimum correlation for a replication to be accepted.
    pub acceptance_threshold: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            start: YearMonth::clamped(1963, 7),
            end: YearMonth::clamped(2020, 12),
            reference_scale: 100.0,
            acceptance_threshold: 0.95,
        }
    }
}

impl ValidationConfig {
    /// Check the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError` for an inverted window, a non-positive scale, or a
    /// threshold outside [-1, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start > self.end {
            return Err(ConfigError::invalid(
                "window",
                format!("start {} is after end {}", self.start, self.end),
            ));
        }
        if !(self.reference_scale.is_finite() && self.reference_scale > 0.0) {
            return Err(ConfigError::invalid("reference_scale", "must be positive and finite"));
        }
        if !(-1.0..=1.0).contains(&self.acceptance_threshold) {
            return Err(ConfigError::invalid("acceptance_threshold", "must be in [-1, 1]"));
        }
        Ok(())
    }

    fn contains(&self, month: YearMonth) -> bool {
        (self.start..=self.end).contains(&month)
    }
}

/// One month of replicated and rescaled reference factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    /// Calendar month.
    pub month: YearMonth,
    /// Replicated size factor.
    pub smb: Option<f64>,
    /// Replicated value factor.
    pub hml: Option<f64>,
    /// Reference size factor in decimal units.
    pub reference_smb: Option<f64>,
    /// Reference value factor in decimal units.
    pub reference_hml: Option<f64>,
}

/// Correlations between the replicated and reference series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Replicated months inside the window, with their reference values.
    pub rows: Vec<ComparisonRow>,
    /// Pearson correlation of the size factors.
    pub smb_correlation: Option<f64>,
    /// Pearson correlation of the value factors.
    pub hml_correlation: Option<f64>,
    /// Months with both size values present.
    pub smb_observations: usize,
    /// Months with both value values present.
    pub hml_observations: usize,
    /// Acceptance threshold the report was produced with.
    pub threshold: f64,
}

impl ValidationReport {
    /// Whether both correlations are defined and reach the threshold.
    #[must_use]
    pub fn accepts(&self) -> bool {
        [self.smb_correlation, self.hml_correlation]
            .iter()
            .all(|c| c.is_some_and(|c| c >= self.threshold))
    }
}

/// Aligns the replicated factors with a reference series by month and
/// reports their correlations.
#[derive(Debug, Clone, Default)]
pub struct ValidationReporter {
    config: ValidationConfig,
}

impl ValidationReporter {
    /// Create a new reporter with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }
}

impl Stage for ValidationReporter {
    type Config = ValidationConfig;
    type Input<'a> = (&'a [MonthlyFactorRecord], &'a [ReferenceFactorRecord]);
    type Output = ValidationReport;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Validation
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        self.config.validate()?;
        let (factors, reference) = input;
        let scale = self.config.reference_scale;

        let reference: HashMap<YearMonth, &ReferenceFactorRecord> =
            reference.iter().map(|r| (r.month, r)).collect();

        let rows: Vec<ComparisonRow> = factors
            .iter()
            .filter(|f| self.config.contains(f.month))
            .map(|f| {
                let matched = reference.get(&f.month);
                ComparisonRow {
                    month: f.month,
                    smb: f.smb,
                    hml: f.hml,
                    reference_smb: matched.and_then(|r| r.smb).map(|v| v / scale),
                    reference_hml: matched.and_then(|r| r.hml).map(|v| v / scale),
                }
            })
            .collect();

        let (smb_correlation, smb_observations) = correlate(
            &rows.iter().map(|r| r.smb).collect::<Vec<_>>(),
            &rows.iter().map(|r| r.reference_smb).collect::<Vec<_>>(),
        )?;
        let (hml_correlation, hml_observations) = correlate(
            &rows.iter().map(|r| r.hml).collect::<Vec<_>>(),
            &rows.iter().map(|r| r.reference_hml).collect::<Vec<_>>(),
        )?;

        if smb_observations < 2 || hml_observations < 2 {
            warn!(
                smb_observations,
                hml_observations,
                start = %self.config.start,
                end = %self.config.end,
                "too few aligned months to correlate"
            );
        }
        debug!(
            stage = %self.kind(),
            rows = rows.len(),
            smb_observations,
            hml_observations,
            "validation aligned"
        );

        Ok(ValidationReport {
            rows,
            smb_correlation,
            hml_correlation,
            smb_observations,
            hml_observations,
            threshold: self.config.acceptance_threshold,
        })
    }
}

fn correlate(
    replicated: &[Option<f64>],
    reference: &[Option<f64>],
) -> Result<(Option<f64>, usize), ModelError> {
    let (x, y) = pairwise_complete(replicated, reference);
    Ok((pearson(x.view(), y.view())?, x.len()))
}
