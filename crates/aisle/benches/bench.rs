use aisle::{Dimensions, ReservationOutcome, SeatGrid};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{sync::Arc, thread::scope, time::Instant};

// Grid side length per benchmark iteration. 64x64 keeps one iteration
// around 4k reservations, comparable across the contended and
// uncontended runs.
const SIDE: u32 = 64;

fn bench_uncontended(c: &mut Criterion) {
    let dims = Dimensions::new(SIDE, SIDE).unwrap();
    let total = dims.seat_count() as u64;

    let mut group = c.benchmark_group("try_reserve/uncontended");
    group.throughput(Throughput::Elements(total));
    group.bench_function(format!("elems/{total}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let grid = SeatGrid::new(dims);
                for row in 0..dims.rows() {
                    for col in 0..dims.cols() {
                        black_box(grid.try_reserve(row, col).unwrap());
                    }
                }
            }
            start.elapsed()
        });
    });
    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let dims = Dimensions::new(SIDE, SIDE).unwrap();
    let total = dims.seat_count() as u64;
    let threads = num_cpus::get().max(2);

    let mut group = c.benchmark_group("try_reserve/contended");
    group.throughput(Throughput::Elements(total * threads as u64));
    group.bench_function(format!("threads/{threads}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();
            for _ in 0..iters {
                let grid = Arc::new(SeatGrid::new(dims));
                scope(|s| {
                    for _ in 0..threads {
                        let grid = Arc::clone(&grid);
                        s.spawn(move || {
                            let mut wins = 0usize;
                            for row in 0..dims.rows() {
                                for col in 0..dims.cols() {
                                    if grid.try_reserve(row, col).unwrap()
                                        == ReservationOutcome::Reserved
                                    {
                                        wins += 1;
                                    }
                                }
                            }
                            black_box(wins)
                        });
                    }
                });
            }
            start.elapsed()
        });
    });
    group.finish();
}

fn benches(c: &mut Criterion) {
    bench_uncontended(c);
    bench_contended(c);
}

criterion_group!(bench, benches);
criterion_main!(bench);
