//! Accounting record cleaning.

use std::collections::BTreeMap;

use famafrench_primitives::{AccountingRecord, RawAccountingRecord, SecurityId};
use famafrench_traits::{Stage, StageKind};
use tracing::debug;

use crate::ModelError;

/// Derives book equity and tenure, then keeps one record per security and
/// calendar year.
///
/// Tenure is the zero-based rank of a record among all of its security's
/// records ordered by report date, counted before duplicates within a
/// calendar year are collapsed. When a firm changes its fiscal year-end and
/// reports twice in one calendar year, the later report is kept.
#[derive(Debug, Clone, Default)]
pub struct AccountingPreprocessor {
    config: (),
}

impl AccountingPreprocessor {
    /// Create a new accounting preprocessor.
    #[must_use]
    pub const fn new() -> Self {
        Self { config: () }
    }
}

impl Stage for AccountingPreprocessor {
    type Config = ();
    type Input<'a> = &'a [RawAccountingRecord];
    type Output = Vec<AccountingRecord>;
    type Error = ModelError;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }

    fn kind(&self) -> StageKind {
        StageKind::Accounting
    }

    fn run(&self, input: Self::Input<'_>) -> Result<Self::Output, Self::Error> {
        let mut by_security: BTreeMap<SecurityId, Vec<&RawAccountingRecord>> = BTreeMap::new();
        for raw in input {
            by_security.entry(raw.security_id).or_default().push(raw);
        }

        let mut output = Vec::with_capacity(input.len());
        for (_, mut history) in by_security {
            // stable: same-day reports keep input order
            history.sort_by_key(|raw| raw.report_date);

            let mut kept: Vec<AccountingRecord> = Vec::with_capacity(history.len());
            for (tenure, raw) in history.into_iter().enumerate() {
                let record = AccountingRecord {
                    security_id: raw.security_id,
                    company_key: raw.company_key.clone(),
                    report_date: raw.report_date,
                    fiscal_year: raw.calendar_year(),
                    book_equity: raw.book_equity(),
                    tenure_count: u32::try_from(tenure).unwrap_or(u32::MAX),
                };
                match kept.last_mut() {
                    Some(last) if last.fiscal_year == record.fiscal_year => *last = record,
                    _ => kept.push(record),
                }
            }
            output.extend(kept);
        }

        debug!(
            stage = %self.kind(),
            input = input.len(),
            output = output.len(),
            with_book_equity = output.iter().filter(|r| r.book_equity.is_some()).count(),
            "accounting records cleaned"
        );
        Ok(output)
    }
}
