use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use rust_decimal::Decimal;
use stockledger_core::ProductId;
use stockledger_infra::ledger::StockLedger;
use stockledger_infra::store::InMemoryKeyValueStore;
use stockledger_inventory::{MovementRequest, Product, StockStats};

fn catalog(size: usize) -> Vec<Product> {
    (0..size)
        .map(|i| {
            Product::new(
                ProductId::from(format!("p-{i}").as_str()),
                format!("Product {i}"),
                format!("SKU-{i:05}"),
                if i % 2 == 0 { "Parts" } else { "Tools" },
                Decimal::new((i as i64 % 500) * 100 + 99, 2),
                (i % 40) as u64,
                10,
            )
        })
        .collect()
}

/// Ledger pre-loaded with `history` movements on a 50-product catalog.
fn setup_ledger(history: usize) -> StockLedger<InMemoryKeyValueStore> {
    let ledger = StockLedger::new(InMemoryKeyValueStore::new());
    ledger.init_with(catalog(50)).unwrap();
    for i in 0..history {
        let id = ProductId::from(format!("p-{}", i % 50).as_str());
        ledger.record_movement(MovementRequest::entry(id, 1)).unwrap();
    }
    ledger
}

fn bench_record_movement_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_movement_latency");
    group.throughput(Throughput::Elements(1));

    // Every movement rewrites the full history, so latency grows with it.
    for history in [0usize, 100, 1000].iter() {
        group.bench_with_input(
            BenchmarkId::new("entry_with_history", history),
            history,
            |b, &history| {
                let ledger = setup_ledger(history);
                let id = ProductId::from("p-7");
                b.iter(|| {
                    ledger
                        .record_movement(black_box(MovementRequest::entry(id.clone(), 1)))
                        .unwrap();
                });
            },
        );
    }

    group.bench_function("rejected_exit", |b| {
        let ledger = setup_ledger(0);
        // p-0 starts at 0 units, so every exit is rejected.
        let id = ProductId::from("p-0");
        b.iter(|| {
            let _ = ledger.record_movement(black_box(MovementRequest::exit(id.clone(), 1)));
        });
    });

    group.finish();
}

fn bench_compute_stats(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_stats");

    for size in [10usize, 100, 1000, 10000].iter() {
        let products = catalog(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("from_snapshot", size), &products, |b, products| {
            b.iter(|| StockStats::compute(black_box(products)).unwrap());
        });
    }

    group.bench_function("through_store", |b| {
        let ledger = setup_ledger(0);
        b.iter(|| ledger.compute_stats().unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_record_movement_latency, bench_compute_stats);
criterion_main!(benches);
