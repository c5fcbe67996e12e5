// Ledger hot-path benchmarks for CampusCoin.
//
// Covers the fee split, a single service payment against a warm ledger, and
// batches of payments through the lock-serialized shared handle.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

use campus_contracts::payment::split_payment;
use campus_contracts::{Call, CampusCoin, SharedLedger};
use campus_protocol::config::SERVICE_FEE_BPS;
use campus_protocol::{Address, Amount};

/// A ledger with one funded student and one active provider.
fn funded_ledger() -> (CampusCoin, Address, Address) {
    let admin = Address::from_label("admin");
    let student = Address::from_label("student1");
    let provider = Address::from_label("gym");
    let mut coin = CampusCoin::deploy(admin, Address::from_label("university"));
    coin.add_student(admin, student).unwrap();
    coin.mint(admin, student, Amount::from_tokens(u32::MAX as u64))
        .unwrap();
    coin.add_service_provider(admin, provider, "Gym", "Fitness")
        .unwrap();
    (coin, student, provider)
}

fn bench_fee_split(c: &mut Criterion) {
    let gross = Amount::parse_tokens("12.345678901234567891").unwrap();
    c.bench_function("payment/fee_split", |b| {
        b.iter(|| split_payment(gross, SERVICE_FEE_BPS).unwrap());
    });
}

fn bench_pay_service(c: &mut Criterion) {
    let (coin, student, provider) = funded_ledger();
    let amount = Amount::from_tokens(1);

    // Fresh clone per iteration so the event log does not grow unbounded.
    c.bench_function("payment/pay_service", |b| {
        b.iter_batched(
            || coin.clone(),
            |mut coin| coin.pay_service(student, provider, amount).unwrap(),
            BatchSize::SmallInput,
        );
    });
}

fn bench_shared_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("payment/shared_batch");

    for size in [10u64, 100, 1_000] {
        let (coin, student, provider) = funded_ledger();

        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter_batched(
                || SharedLedger::new(coin.clone()),
                |shared| {
                    for _ in 0..size {
                        shared
                            .execute(
                                student,
                                Call::PayService {
                                    provider,
                                    amount: Amount::from_base_units(1_000),
                                },
                            )
                            .unwrap();
                    }
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_fee_split, bench_pay_service, bench_shared_batch);
criterion_main!(benches);
