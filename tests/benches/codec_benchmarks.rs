//! # Tonscope Codec Benchmarks
//!
//! Throughput of the hot paths behind every account query:
//!
//! | Crate | Path |
//! |-------|------|
//! | ts-01 Address Codec | friendly and raw parsing |
//! | ts-02 Cell Codec | BOC serialize / deserialize |
//! | ts-03 Stack Codec | argument parsing |
//! | ts-05 Bytecode Introspection | dispatch table scan |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use ts_02_cell_codec::{boc, Cell, CellBuilder};
use ts_04_method_decoders::method_id;
use ts_tests::integration::fixtures::{dispatch_code, WALLET_FRIENDLY, WALLET_RAW};

// ============================================================================
// TS-01: Address Codec
// ============================================================================

fn bench_address_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ts-01-address-codec");

    group.bench_function("parse_friendly", |b| {
        b.iter(|| black_box(ts_01_address_codec::parse(black_box(WALLET_FRIENDLY)).is_ok()))
    });
    group.bench_function("parse_raw", |b| {
        b.iter(|| black_box(ts_01_address_codec::parse(black_box(WALLET_RAW)).is_ok()))
    });

    group.finish();
}

// ============================================================================
// TS-02: Cell Codec
// ============================================================================

fn chain(depth: usize) -> Arc<Cell> {
    let mut cell = Arc::new(Cell::empty());
    for i in 0..depth {
        let mut b = CellBuilder::new();
        b.store_uint(64, i as u64)
            .and_then(|b| b.store_ref(cell.clone()))
            .expect("chain cell fits");
        cell = Arc::new(b.build().expect("chain cell builds"));
    }
    cell
}

fn bench_boc(c: &mut Criterion) {
    let mut group = c.benchmark_group("ts-02-cell-codec");
    group.measurement_time(Duration::from_secs(5));

    for depth in [16, 256, 1024] {
        let root = chain(depth);
        let bytes = boc::serialize_single(&root).expect("serializes");

        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::new("serialize", depth), &root, |b, root| {
            b.iter(|| black_box(boc::serialize_single(root).is_ok()))
        });
        group.bench_with_input(BenchmarkId::new("deserialize", depth), &bytes, |b, bytes| {
            b.iter(|| black_box(boc::deserialize(bytes).is_ok()))
        });
    }

    group.finish();
}

// ============================================================================
// TS-03: Stack Codec
// ============================================================================

fn bench_arguments(c: &mut Criterion) {
    let mut group = c.benchmark_group("ts-03-stack-codec");
    let tokens = [
        "0x1f",
        "-12345678901234567890",
        "Null",
        WALLET_FRIENDLY,
        "b5ee9c724101010100020000004cacb9cd",
    ];

    group.bench_function("parse_arguments", |b| {
        b.iter(|| black_box(ts_03_stack_codec::parse_arguments(black_box(&tokens)).is_ok()))
    });

    group.finish();
}

// ============================================================================
// TS-05: Bytecode Introspection
// ============================================================================

fn bench_dispatch_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("ts-05-bytecode-introspection");

    for count in [4usize, 32, 128] {
        let ids: Vec<i64> = (0..count)
            .map(|i| method_id(&format!("get_method_{i}")))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let code = dispatch_code(&ids).expect("dispatch code builds");

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("extract_method_ids", count), &code, |b, code| {
            b.iter(|| black_box(ts_05_bytecode_introspection::extract_method_ids(code).len()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_address_parsing,
    bench_boc,
    bench_arguments,
    bench_dispatch_scan,
);

criterion_main!(benches);
