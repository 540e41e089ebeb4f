//! Performance benchmarks for the fleet ledger projections.
//!
//! Every read endpoint recomputes its projection from a full snapshot, so
//! these benchmarks measure the projections over a year of history for the
//! whole roster (about 2,000 shifts and 3,000 transactions):
//! - Ledger balances and finance summary
//! - Leaderboard and salary sheet
//! - Monthly fleet report
//! - Decoding both tables from stored rows
//! - A full `GET /finance` request through the router
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use axum::{body::Body, http::Request};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{Duration, TimeZone, Utc};
use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use fleet_ledger::api::{AppState, create_router};
use fleet_ledger::calculation::{
    finance_summary, leaderboard, ledger_balances, period_report, salary_sheet,
};
use fleet_ledger::config::{ConfigLoader, FleetConfig, StoreSettings};
use fleet_ledger::engine::{FixedClock, FleetEngine};
use fleet_ledger::models::{
    ApprovalStatus, Party, Period, ReportTarget, Shift, ShiftStatus, Source, Transaction,
    TransactionType,
};
use fleet_ledger::store::{MemoryStore, Repository, Table, codec};

const DAYS: i64 = 365;

fn load_config() -> FleetConfig {
    ConfigLoader::load("./config/fleet")
        .expect("Failed to load config")
        .into_config()
        .with_store(StoreSettings::immediate())
}

/// Builds a year of settled shifts and ledger entries for the roster.
fn create_snapshot(config: &FleetConfig) -> (Vec<Shift>, Vec<Transaction>) {
    let origin = Utc.with_ymd_and_hms(2025, 1, 1, 5, 0, 0).unwrap();
    let drivers = config.drivers();
    let vehicles = config.vehicles();

    let mut shifts = Vec::new();
    let mut transactions = Vec::new();

    for day in 0..DAYS {
        for (index, driver) in drivers.iter().enumerate() {
            if (day + index as i64) % 7 == 6 {
                continue;
            }
            let start = origin + Duration::days(day) + Duration::hours(index as i64);
            let earnings = Decimal::from(150 + (day * 7 + index as i64 * 13) % 250);
            let id = format!("{:04x}{:04x}", day, index);

            shifts.push(Shift {
                id: id.clone(),
                driver: driver.clone(),
                vehicle: vehicles[index % vehicles.len()].clone(),
                status: ShiftStatus::Completed,
                approval: ApprovalStatus::Approved,
                start_time: start,
                end_time: Some(start + Duration::hours(10)),
                duration_hours: Decimal::from(10),
                total_earnings: earnings,
                start_wallet: Decimal::from(100),
                end_wallet: Decimal::from(100),
                cash_collected: earnings,
                start_fuel: 90,
                end_fuel: 30,
            });

            let (kind, approval, source) = match (day + index as i64) % 4 {
                0 => (TransactionType::Received, ApprovalStatus::Approved, Source::Manager),
                1 => (TransactionType::Received, ApprovalStatus::Pending, Source::Driver),
                2 => (TransactionType::Advance, ApprovalStatus::Approved, Source::Manager),
                _ => continue,
            };
            transactions.push(Transaction {
                id: format!("t{}", &id[1..]),
                timestamp: start + Duration::hours(11),
                party: Party::Driver(driver.clone()),
                kind,
                amount: earnings,
                method: "Cash".to_string(),
                notes: String::new(),
                approval,
                source,
            });
        }
    }

    (shifts, transactions)
}

/// Benchmark: balances and finance summary over the full ledger.
fn bench_balances(c: &mut Criterion) {
    let config = load_config();
    let (shifts, transactions) = create_snapshot(&config);

    let mut group = c.benchmark_group("balances");
    group.throughput(Throughput::Elements(transactions.len() as u64));
    group.bench_function("ledger_balances", |b| {
        b.iter(|| black_box(ledger_balances(black_box(&transactions))))
    });
    group.bench_function("finance_summary", |b| {
        b.iter(|| black_box(finance_summary(black_box(&shifts), black_box(&transactions))))
    });
    group.finish();
}

/// Benchmark: per-driver rankings and payroll.
fn bench_payroll(c: &mut Criterion) {
    let config = load_config();
    let (shifts, transactions) = create_snapshot(&config);

    c.bench_function("leaderboard", |b| {
        b.iter(|| black_box(leaderboard(black_box(&shifts), config.drivers())))
    });
    c.bench_function("salary_sheet", |b| {
        b.iter(|| {
            black_box(salary_sheet(
                black_box(&shifts),
                black_box(&transactions),
                config.drivers(),
                config.payroll(),
            ))
        })
    });
}

/// Benchmark: monthly fleet report with calendar bucketing.
fn bench_period_report(c: &mut Criterion) {
    let config = load_config();
    let (shifts, transactions) = create_snapshot(&config);
    let period = Period::Month {
        year: 2025,
        month: 6,
    };

    c.bench_function("period_report_month", |b| {
        b.iter(|| {
            black_box(period_report(
                black_box(&shifts),
                black_box(&transactions),
                &ReportTarget::Fleet,
                period,
                config.display_offset(),
            ))
        })
    });
}

/// Benchmark: decoding both tables from stored rows.
fn bench_decode(c: &mut Criterion) {
    let config = load_config();
    let (shifts, transactions) = create_snapshot(&config);
    let store = MemoryStore::new();
    let repository = Repository::new(Box::new(store.clone()), config.display_offset());
    repository.save_shifts(&shifts).unwrap();
    repository.save_transactions(&transactions).unwrap();
    let shift_rows = store.rows(Table::Shifts);

    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Elements(shift_rows.len() as u64));
    group.bench_function("shift_rows", |b| {
        b.iter(|| {
            let decoded: Vec<Shift> = shift_rows
                .iter()
                .map(|row| codec::shift_from_row(row, config.display_offset()).unwrap())
                .collect();
            black_box(decoded)
        })
    });
    group.bench_function("repository_load", |b| {
        b.iter(|| {
            black_box(repository.load_shifts().unwrap());
            black_box(repository.load_transactions().unwrap())
        })
    });
    group.finish();
}

/// Benchmark: full `GET /finance` request, including authentication.
///
/// Runs once with the default read cache and once reading through to the
/// backend on every request.
fn bench_finance_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let authorization = format!("Basic {}", STANDARD.encode("ceo:ceo786"));
    let mut group = c.benchmark_group("finance_endpoint");

    for (name, settings) in [
        ("cached", StoreSettings::default()),
        ("uncached", StoreSettings::immediate()),
    ] {
        let config = load_config().with_store(settings);
        let (shifts, transactions) = create_snapshot(&config);

        let store = MemoryStore::new();
        let seed = Repository::new(Box::new(store.clone()), config.display_offset());
        seed.save_shifts(&shifts).unwrap();
        seed.save_transactions(&transactions).unwrap();

        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2025, 12, 31, 12, 0, 0).unwrap(),
        ));
        let engine = FleetEngine::with_clock(config, Box::new(store), clock);
        let router = create_router(AppState::with_user_directory(engine));

        group.bench_function(name, |b| {
            b.to_async(&rt).iter(|| async {
                let router = router.clone();
                let response = router
                    .oneshot(
                        Request::builder()
                            .method("GET")
                            .uri("/finance")
                            .header("Authorization", authorization.as_str())
                            .body(Body::empty())
                            .unwrap(),
                    )
                    .await
                    .unwrap();
                black_box(response)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_balances,
    bench_payroll,
    bench_period_report,
    bench_decode,
    bench_finance_endpoint
);

criterion_main!(benches);
