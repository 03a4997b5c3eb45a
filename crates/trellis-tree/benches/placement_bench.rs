//! Benchmarks for the Trellis placement tree
//!
//! Measures performance of:
//! - Same-side spill resolution on deep chains
//! - Ancestor counter propagation
//! - Pre-order downline listing
//! - Code generation over large snapshots

use chrono::{DateTime, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use trellis_tree::{
    downline, next_code, propagate, resolve, Enrollment, Member, MemberCode, MemberTree, Side,
};

fn enroll(n: usize) -> Enrollment {
    Enrollment {
        name: format!("member {n}"),
        email: format!("m{n}@example.com"),
        mobile: "555-0100".to_string(),
        credential: "opaque".to_string(),
        joined_at: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// Tree with a single left spill chain of `depth` members under the root.
fn chain(depth: usize) -> MemberTree {
    let mut tree = MemberTree::new();
    let root = tree.next_code().unwrap();
    tree.attach(Member::root(root.clone(), enroll(0))).unwrap();

    for i in 0..depth {
        let placement = resolve(&tree, root.as_str(), Side::Left).unwrap();
        let code = tree.next_code().unwrap();
        tree.attach(Member::placed(code, enroll(i + 1), placement.parent.clone(), Side::Left))
            .unwrap();
        propagate(&mut tree, placement.parent.as_str(), Side::Left).unwrap();
    }
    tree
}

/// Benchmark spill resolution from the root of a deep chain
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_spill");

    for &depth in &[10usize, 100, 1_000, 10_000] {
        let tree = chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter(|| resolve(black_box(tree), black_box("MEM00001"), Side::Left))
        });
    }
    group.finish();
}

/// Benchmark counter propagation from the deepest member
fn bench_propagate(c: &mut Criterion) {
    let mut group = c.benchmark_group("propagate");
    group.sample_size(50);

    for &depth in &[10usize, 100, 1_000, 10_000] {
        let tree = chain(depth);
        let leaf = MemberCode::from_ordinal(depth as u64 + 1);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter_batched(
                || tree.clone(),
                |mut t| propagate(&mut t, black_box(leaf.as_str()), Side::Right),
                criterion::BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

/// Benchmark the full downline listing of the root
fn bench_downline(c: &mut Criterion) {
    let mut group = c.benchmark_group("downline");

    for &depth in &[100usize, 1_000, 10_000] {
        let tree = chain(depth);
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &tree, |b, tree| {
            b.iter(|| downline(black_box(tree), "MEM00001").map(|d| d.left.len()))
        });
    }
    group.finish();
}

/// Benchmark next-code computation over many existing codes
fn bench_next_code(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_code");

    for &count in &[100u64, 10_000, 100_000] {
        let codes: Vec<MemberCode> = (1..=count).map(MemberCode::from_ordinal).collect();
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &codes, |b, codes| {
            b.iter(|| next_code(black_box(codes)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_resolve,
    bench_propagate,
    bench_downline,
    bench_next_code,
);

criterion_main!(benches);
