//! Full pipeline run over a small hand-computed universe.
#![allow(missing_docs)]

use approx::assert_relative_eq;
use famafrench_model::{FactorPipeline, PipelineConfig, PipelineInputs, PipelineOutput};
use famafrench_primitives::{
    Assignment, BucketPair, Date, FirmId, RawAccountingRecord, RawSecurityRecord,
    ReferenceFactorRecord, SecurityId, SizeBucket, ValueBucket, YearMonth,
};

const SL: BucketPair = BucketPair::new(SizeBucket::Small, ValueBucket::Low);
const SM: BucketPair = BucketPair::new(SizeBucket::Small, ValueBucket::Medium);
const SH: BucketPair = BucketPair::new(SizeBucket::Small, ValueBucket::High);
const BL: BucketPair = BucketPair::new(SizeBucket::Big, ValueBucket::Low);
const BM: BucketPair = BucketPair::new(SizeBucket::Big, ValueBucket::Medium);
const BH: BucketPair = BucketPair::new(SizeBucket::Big, ValueBucket::High);

struct Listing {
    security: u64,
    firm: u64,
    exchange: i32,
    /// Price with 1000 shares outstanding, so market value equals price.
    price: f64,
    july_return: Option<f64>,
}

const LISTINGS: [Listing; 12] = [
    Listing { security: 1, firm: 10, exchange: 1, price: 10.0, july_return: Some(0.01) },
    Listing { security: 2, firm: 20, exchange: 1, price: 20.0, july_return: Some(0.02) },
    Listing { security: 3, firm: 30, exchange: 1, price: 30.0, july_return: Some(0.03) },
    Listing { security: 4, firm: 40, exchange: 1, price: 40.0, july_return: Some(0.04) },
    Listing { security: 5, firm: 50, exchange: 1, price: 50.0, july_return: Some(0.05) },
    Listing { security: 6, firm: 60, exchange: 1, price: 60.0, july_return: Some(0.06) },
    // Nasdaq, only two years of accounting history
    Listing { security: 7, firm: 70, exchange: 3, price: 100.0, july_return: Some(0.10) },
    // NYSE, too young for the breakpoint universe
    Listing { security: 8, firm: 80, exchange: 1, price: 5.0, july_return: Some(-0.05) },
    // NYSE, negative book equity
    Listing { security: 9, firm: 90, exchange: 1, price: 70.0, july_return: Some(0.50) },
    // two share classes of one Amex firm
    Listing { security: 10, firm: 100, exchange: 2, price: 25.0, july_return: Some(0.02) },
    Listing { security: 11, firm: 100, exchange: 2, price: 15.0, july_return: Some(0.07) },
    // outside the exchange universe
    Listing { security: 12, firm: 120, exchange: 4, price: 80.0, july_return: Some(0.90) },
];

fn securities() -> Vec<RawSecurityRecord> {
    let start = YearMonth::new(2018, 12).unwrap();
    let mut rows = Vec::new();
    for listing in &LISTINGS {
        for offset in 0..9 {
            let month = start.shift(offset);
            let ret = match (month.year(), month.month()) {
                (2019, 7) => listing.july_return,
                (2019, 8) => listing.july_return.map(|r| 2.0 * r),
                _ => Some(0.0),
            };
            rows.push(RawSecurityRecord {
                security_id: SecurityId::new(listing.security),
                firm_id: FirmId::new(listing.firm),
                date: month.last_day().unwrap(),
                exchange_code: Some(listing.exchange),
                share_code: Some(10),
                ret,
                delisting_return: None,
                price: Some(if offset % 2 == 0 { listing.price } else { -listing.price }),
                shares_outstanding: Some(1000.0),
            });
        }
    }
    rows
}

fn report(
    security: u64,
    year: i32,
    month: u32,
    seq: f64,
    pstk: Option<f64>,
) -> RawAccountingRecord {
    let report_date = YearMonth::new(year, month).unwrap().last_day().unwrap();
    RawAccountingRecord {
        security_id: SecurityId::new(security),
        company_key: None,
        report_date,
        stockholders_equity: Some(seq),
        deferred_tax_credit: None,
        preferred_redemption: None,
        preferred_liquidation: None,
        preferred_par: pstk,
    }
}

fn accounting() -> Vec<RawAccountingRecord> {
    // book equity chosen so book-to-market is 0.2, 0.6, 1.2, 0.4, 0.8, 1.0
    let mut rows = Vec::new();
    for (security, be) in [(1, 2.0), (2, 12.0), (3, 36.0), (4, 16.0), (5, 40.0), (6, 60.0)] {
        for year in 2016..=2018 {
            rows.push(report(security, year, 12, be, None));
        }
    }
    // mid-year report superseded by the December one
    rows.push(report(1, 2018, 6, 999.0, None));
    for year in 2017..=2018 {
        rows.push(report(7, year, 12, 200.0, None));
        rows.push(report(8, year, 12, 25.0, None));
    }
    for year in 2016..=2018 {
        rows.push(report(9, year, 12, 10.0, Some(20.0)));
        rows.push(report(10, year, 12, 12.0, None));
        rows.push(report(12, year, 12, 40.0, None));
    }
    rows
}

fn run(reference: &[ReferenceFactorRecord]) -> PipelineOutput {
    let accounting = accounting();
    let securities = securities();
    FactorPipeline::with_config(PipelineConfig::default())
        .unwrap()
        .run(PipelineInputs { accounting: &accounting, securities: &securities, reference })
        .unwrap()
}

fn assignment_of(output: &PipelineOutput, security: u64) -> Assignment {
    output
        .assignments
        .iter()
        .find(|a| a.security_id == SecurityId::new(security))
        .map(|a| a.assignment)
        .unwrap()
}

#[test]
fn breakpoints_come_from_seasoned_nyse_firms() {
    let output = run(&[]);
    assert_eq!(output.breakpoints.len(), 1);
    let bp = &output.breakpoints[0];
    assert_eq!(bp.rebalance, YearMonth::new(2019, 6).unwrap());
    assert_eq!(bp.universe_size, 6);
    assert_relative_eq!(bp.size_median, 35.0, epsilon = 1e-12);
    assert_relative_eq!(bp.bm_p30, 0.5, epsilon = 1e-12);
    assert_relative_eq!(bp.bm_p70, 0.9, epsilon = 1e-12);
}

#[test]
fn securities_land_in_expected_cells() {
    let output = run(&[]);
    let expected =
        [(1, SL), (2, SM), (3, SH), (4, BL), (5, BM), (6, BH), (7, BH), (8, SH), (10, BL)];
    for (security, pair) in expected {
        let assignment = assignment_of(&output, security);
        assert_eq!(assignment, Assignment::Assigned(pair), "security {security}");
    }
    assert_eq!(assignment_of(&output, 9), Assignment::Unassigned);
    assert!(output.assignments.iter().all(|a| a.security_id != SecurityId::new(11)));
    assert!(output.assignments.iter().all(|a| a.security_id != SecurityId::new(12)));
}

#[test]
fn share_classes_fold_into_one_firm() {
    let output = run(&[]);
    let firm = output
        .firm_months
        .iter()
        .find(|f| f.firm_id == FirmId::new(100) && f.month == YearMonth::new(2019, 6).unwrap())
        .unwrap();
    assert_eq!(firm.representative, SecurityId::new(10));
    assert_eq!(firm.security_count, 2);
    assert_relative_eq!(firm.total_market_value, 40.0, epsilon = 1e-12);
}

#[test]
fn july_factors_match_hand_computation() {
    let output = run(&[]);
    let months: Vec<String> = output.factors.iter().map(|f| f.month.to_string()).collect();
    assert_eq!(months, ["2019-07", "2019-08"]);

    let july = &output.factors[0];
    assert_eq!(july.date, Date::from_ymd_opt(2019, 7, 31).unwrap());

    let sl = 0.01;
    let sm = 0.02;
    let sh = (30.0 * 0.03 + 5.0 * -0.05) / 35.0;
    let bl = (40.0 * 0.04 + 40.0 * 0.02) / 80.0;
    let bm = 0.05;
    let bh = (60.0 * 0.06 + 100.0 * 0.10) / 160.0;
    for (pair, expected) in [(SL, sl), (SM, sm), (SH, sh), (BL, bl), (BM, bm), (BH, bh)] {
        assert_relative_eq!(july.returns[pair].unwrap(), expected, epsilon = 1e-12);
    }

    let hml = (bh + sh) / 2.0 - (bl + sl) / 2.0;
    let smb = (sl + sm + sh) / 3.0 - (bl + bm + bh) / 3.0;
    assert_relative_eq!(july.hml.unwrap(), hml, epsilon = 1e-12);
    assert_relative_eq!(july.smb.unwrap(), smb, epsilon = 1e-12);

    let august = &output.factors[1];
    assert_relative_eq!(august.smb.unwrap(), 2.0 * smb, epsilon = 1e-12);
    assert_relative_eq!(august.hml.unwrap(), 2.0 * hml, epsilon = 1e-12);
}

#[test]
fn counts_track_cell_membership() {
    let output = run(&[]);
    let counts = &output.counts[0];
    assert_eq!([SL, SM, SH, BL, BM, BH].map(|p| counts.get(p)), [1, 1, 2, 2, 1, 2]);
    assert_eq!(counts.high(), 4);
    assert_eq!(counts.low(), 3);
    assert_eq!(counts.total(), 9);
}

#[test]
fn identical_reference_validates() {
    let first = run(&[]);
    let reference: Vec<ReferenceFactorRecord> = first
        .factors
        .iter()
        .map(|f| ReferenceFactorRecord {
            month: f.month,
            smb: f.smb.map(|v| v * 100.0),
            hml: f.hml.map(|v| v * 100.0),
        })
        .collect();

    let output = run(&reference);
    let report = &output.validation;
    assert_eq!(report.rows.len(), 2);
    assert_eq!(report.smb_observations, 2);
    assert_relative_eq!(report.smb_correlation.unwrap(), 1.0, epsilon = 1e-9);
    assert_relative_eq!(report.hml_correlation.unwrap(), 1.0, epsilon = 1e-9);
    assert!(report.accepts());
}

#[test]
fn repeated_runs_are_identical() {
    assert_eq!(run(&[]), run(&[]));
}
