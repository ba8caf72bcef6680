// Chain validation benchmarks for the Strata ledger.
//
// Covers block hashing, single-chain validation at various heights, and
// the instrumented wrapper overhead.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use strata_ledger::perf::Instrumented;
use strata_ledger::{Block, Blockchain};

fn chain_of_height(height: usize) -> Blockchain {
    let mut chain = Blockchain::new();
    while chain.height() < height {
        let block = Block::new(chain.top().index + 1, chain.top().hash(), vec![])
            .expect("well-formed block");
        chain.push(block);
    }
    chain
}

fn bench_block_hash(c: &mut Criterion) {
    let chain = chain_of_height(2);
    let block = chain.top();

    c.bench_function("chain/block_hash", |b| {
        b.iter(|| block.hash());
    });
}

fn bench_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain/validate");

    for height in [2, 10, 100, 1_000] {
        let chain = chain_of_height(height);

        group.throughput(Throughput::Elements(height as u64));
        group.bench_with_input(BenchmarkId::from_parameter(height), &chain, |b, chain| {
            b.iter(|| chain.validate().is_success());
        });
    }

    group.finish();
}

fn bench_instrumented_validate(c: &mut Criterion) {
    let ledger = Instrumented::new(chain_of_height(100));

    c.bench_function("chain/validate_instrumented_100", |b| {
        b.iter(|| ledger.validate().is_success());
    });
}

fn bench_push(c: &mut Criterion) {
    c.bench_function("chain/push_100", |b| {
        b.iter(|| chain_of_height(100));
    });
}

criterion_group!(
    benches,
    bench_block_hash,
    bench_validate,
    bench_instrumented_validate,
    bench_push,
);
criterion_main!(benches);
