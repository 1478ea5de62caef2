use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowgen::{MonotonicClock, Poll, SnowflakeGenerator, SnowflakeId, TimeSource};
use std::{
    sync::Barrier,
    thread::scope,
    time::{Duration, Instant},
};

struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

/// Hot path: one sequence's worth of IDs against a frozen clock, so every
/// attempt is `Ready`.
fn bench_fixed_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator =
                    SnowflakeGenerator::from_components(0, 0, 0, FixedMockTime { millis: 1 })
                        .unwrap();
                for _ in 0..TOTAL_IDS {
                    match generator.try_poll_id().unwrap() {
                        Poll::Ready { id } => {
                            black_box(id);
                        }
                        Poll::Pending { .. } => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Realistic path: blocking `next_id` against the monotonic clock, spinning
/// whenever a millisecond's sequence is exhausted.
fn bench_monotonic_clock(c: &mut Criterion) {
    let mut group = c.benchmark_group("monotonic_clock");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    let generator =
        SnowflakeGenerator::with_clock(0, MonotonicClock::try_default().unwrap()).unwrap();

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for _ in 0..TOTAL_IDS {
                let id: SnowflakeId = generator.next_id().unwrap();
                black_box(id);
            }
        });
    });

    group.finish();
}

/// Contended path: every thread shares one generator.
fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for threads in [2, 4, 8, num_cpus::get()] {
        let total = (TOTAL_IDS * threads) as u64;
        group.throughput(Throughput::Elements(total));

        group.bench_function(format!("threads/{threads}/elems/{total}"), |b| {
            b.iter_custom(|iters| {
                let mut elapsed = Duration::ZERO;

                for _ in 0..iters {
                    let generator = SnowflakeGenerator::new(0).unwrap();
                    let barrier = Barrier::new(threads + 1);

                    let start = scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                barrier.wait();
                                for _ in 0..TOTAL_IDS {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                        Instant::now()
                    });

                    elapsed += start.elapsed();
                }

                elapsed
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_fixed_clock,
    bench_monotonic_clock,
    bench_contended
);
criterion_main!(benches);
