//! Benchmarks for famafrench-model stages.
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use famafrench_model::{
    FactorPipeline, PipelineConfig, PipelineInputs, PortfolioAggregator, SecurityPreprocessor,
    TemporalAligner, prelude::Stage,
};
use famafrench_primitives::{
    Date, FirmId, RawAccountingRecord, RawSecurityRecord, SecurityId, YearMonth,
};
use rand::Rng;

struct Universe {
    accounting: Vec<RawAccountingRecord>,
    securities: Vec<RawSecurityRecord>,
}

fn random_universe(n_securities: u64, years: i32) -> Universe {
    let mut rng = rand::thread_rng();
    let start = YearMonth::new(1990, 1).unwrap();
    let mut universe = Universe { accounting: Vec::new(), securities: Vec::new() };

    for id in 0..n_securities {
        let exchange = rng.gen_range(1..=3);
        let mut price = rng.gen_range(5.0..200.0);
        let shares = rng.gen_range(1_000.0..500_000.0);

        for offset in 0..years * 12 {
            let month = start.shift(offset);
            let ret = rng.r#gen::<f64>() * 0.2 - 0.1;
            price *= 1.0 + ret;
            universe.securities.push(RawSecurityRecord {
                security_id: SecurityId::new(id),
                firm_id: FirmId::new(id),
                date: month.last_day().unwrap(),
                exchange_code: Some(exchange),
                share_code: Some(10),
                ret: Some(ret),
                delisting_return: None,
                price: Some(price),
                shares_outstanding: Some(shares),
            });
        }
        for year in 1990..1990 + years {
            universe.accounting.push(RawAccountingRecord {
                security_id: SecurityId::new(id),
                company_key: None,
                report_date: Date::from_ymd_opt(year, 12, 31).unwrap(),
                stockholders_equity: Some(rng.gen_range(10.0..5_000.0)),
                deferred_tax_credit: Some(rng.gen_range(0.0..50.0)),
                preferred_redemption: None,
                preferred_liquidation: None,
                preferred_par: Some(rng.gen_range(0.0..5.0)),
            });
        }
    }
    universe
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(10);

    let scenarios = [
        (100, 10, "small_universe"),
        (1000, 10, "medium_universe"),
        (3000, 20, "full_universe"),
    ];

    for (n_securities, years, name) in scenarios {
        let universe = random_universe(n_securities, years);
        group.throughput(Throughput::Elements(universe.securities.len() as u64));
        group.bench_with_input(BenchmarkId::new("scenario", name), &universe, |b, universe| {
            let pipeline = FactorPipeline::with_config(PipelineConfig::default()).unwrap();
            b.iter(|| {
                pipeline
                    .run(black_box(PipelineInputs {
                        accounting: &universe.accounting,
                        securities: &universe.securities,
                        reference: &[],
                    }))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_monthly_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("monthly_stages");
    group.sample_size(20);

    for n_securities in [500, 2000] {
        let universe = random_universe(n_securities, 10);
        let panel = SecurityPreprocessor::new().run(&universe.securities).unwrap();
        group.throughput(Throughput::Elements(universe.securities.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("security_preprocess", n_securities),
            &universe,
            |b, universe| {
                let stage = SecurityPreprocessor::new();
                b.iter(|| stage.run(black_box(&universe.securities)).unwrap());
            },
        );

        group.bench_with_input(BenchmarkId::new("lag", n_securities), &panel, |b, panel| {
            let stage = TemporalAligner::new();
            b.iter(|| stage.run(black_box(&panel.records)).unwrap());
        });

        let aligned = TemporalAligner::new().run(&panel.records).unwrap();
        let pipeline = FactorPipeline::with_config(PipelineConfig::default()).unwrap();
        let assignments = pipeline
            .run(PipelineInputs {
                accounting: &universe.accounting,
                securities: &universe.securities,
                reference: &[],
            })
            .unwrap()
            .assignments;
        group.bench_with_input(
            BenchmarkId::new("portfolio_aggregate", n_securities),
            &(aligned, assignments),
            |b, (aligned, assignments)| {
                let stage = PortfolioAggregator::new();
                b.iter(|| {
                    stage.run(black_box((&aligned.observations[..], &assignments[..]))).unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_full_pipeline, bench_monthly_stages);
criterion_main!(benches);
