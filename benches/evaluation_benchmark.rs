//! Benchmarks for evaluation passes.
//!
//! The pass is the hot path: it rebuilds the ownership arena from every
//! tile and flood-fills around each pending one.

#![allow(missing_docs)]
#![allow(clippy::unwrap_used, clippy::cast_possible_wrap, clippy::cast_possible_truncation)]

use std::hint::black_box;

use chrono::{Duration, Utc};
use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use enclave::evaluation::resolve_pass;
use enclave::tiles::TileTable;
use enclave::{Coord, Range};

/// Fill a `side` x `side` board in a checkerboard of walls with every
/// fourth hole claimed by an opponent.
fn dense_board(side: i32) -> TileTable {
    let mut table = TileTable::new();
    let start = Utc::now();
    let mut seq = 0i64;
    for y in 0..side {
        for x in 0..side {
            let owner = if (x + y) % 2 == 0 {
                1
            } else if (x * 3 + y) % 4 == 0 {
                2
            } else {
                continue;
            };
            table
                .insert(Coord::new(x, y), owner, start + Duration::milliseconds(seq))
                .unwrap();
            seq += 1;
        }
    }
    table
}

/// One big region of player 2 closed by a single late wall tile.
fn open_ring(side: i32) -> TileTable {
    let mut table = TileTable::new();
    let start = Utc::now();
    for y in 0..side {
        for x in 0..side {
            let border = x == 0 || y == 0 || x == side - 1 || y == side - 1;
            if border && (x, y) != (0, side / 2) {
                table.insert(Coord::new(x, y), 1, start).unwrap();
            } else if !border {
                table.insert(Coord::new(x, y), 2, start).unwrap();
            }
        }
    }
    table
}

fn bench_dense_pass(c: &mut Criterion) {
    for side in [32, 128] {
        let range = Range::new(0, side, 0, side).unwrap();
        let board = dense_board(side);
        c.bench_function(&format!("dense_pass_{side}x{side}"), |b| {
            b.iter_batched(
                || board.clone(),
                |mut table| black_box(resolve_pass(&mut table, black_box(range))),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_large_capture(c: &mut Criterion) {
    let side = 256;
    let range = Range::new(-1, side + 1, -1, side + 1).unwrap();
    let mut board = open_ring(side);
    // Resolve the setup so only the closing tile is pending.
    resolve_pass(&mut board, range);
    board
        .insert(Coord::new(0, side / 2), 1, Utc::now() + Duration::seconds(1))
        .unwrap();

    c.bench_function("large_capture_256", |b| {
        b.iter_batched(
            || board.clone(),
            |mut table| {
                let report = resolve_pass(&mut table, black_box(range));
                assert_eq!(report.captures.len(), 1);
                black_box(report)
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(benches, bench_dense_pass, bench_large_capture);
criterion_main!(benches);
