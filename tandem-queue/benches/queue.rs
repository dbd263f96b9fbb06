//! Benchmarks for the blocking queue.
//!
//! Compares tandem-queue against crossbeam-queue's SegQueue (lock-free
//! and unbounded, the natural baseline for an unbounded MPMC queue).

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use crossbeam_queue::SegQueue;
use std::sync::Arc;
use std::thread;
use tandem_queue::BlockingQueue;

// ============================================================================
// Single-operation latency benchmarks (no contention)
// ============================================================================

fn bench_queue_latency(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_latency");

    // Single push + try_pop round trip, one thread.
    group.bench_function("tandem_blocking/u64", |b| {
        let queue = BlockingQueue::<u64>::new();
        b.iter(|| {
            queue.push(black_box(42u64));
            black_box(queue.try_pop().unwrap())
        });
    });

    group.bench_function("crossbeam_seg/u64", |b| {
        let queue = SegQueue::<u64>::new();
        b.iter(|| {
            queue.push(black_box(42u64));
            black_box(queue.pop().unwrap())
        });
    });

    // 128-byte message
    #[allow(unused)]
    #[derive(Debug, Clone, Copy)]
    struct Message128([u64; 16]);

    group.bench_function("tandem_blocking/128b", |b| {
        let queue = BlockingQueue::<Message128>::new();
        let msg = Message128([42; 16]);
        b.iter(|| {
            queue.push(black_box(msg));
            black_box(queue.try_pop().unwrap())
        });
    });

    group.bench_function("crossbeam_seg/128b", |b| {
        let queue = SegQueue::<Message128>::new();
        let msg = Message128([42; 16]);
        b.iter(|| {
            queue.push(black_box(msg));
            black_box(queue.pop().unwrap())
        });
    });

    group.finish();
}

// ============================================================================
// Producer/consumer throughput, blocking consumers
// ============================================================================

fn bench_queue_blocking_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_blocking_throughput");

    const MESSAGES_PER_PRODUCER: usize = 25_000;

    for num_threads in [1, 2, 4] {
        let total = MESSAGES_PER_PRODUCER * num_threads;
        group.throughput(Throughput::Elements(total as u64));

        group.bench_with_input(
            BenchmarkId::new("tandem_blocking", num_threads),
            &num_threads,
            |b, &n| {
                b.iter(|| {
                    let queue = Arc::new(BlockingQueue::<u64>::new());

                    let producers: Vec<_> = (0..n)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for i in 0..MESSAGES_PER_PRODUCER {
                                    queue.push(i as u64);
                                }
                            })
                        })
                        .collect();

                    // Each consumer pops a fixed quota via the blocking path.
                    let consumers: Vec<_> = (0..n)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for _ in 0..MESSAGES_PER_PRODUCER {
                                    black_box(queue.pop());
                                }
                            })
                        })
                        .collect();

                    for handle in producers {
                        handle.join().unwrap();
                    }
                    for handle in consumers {
                        handle.join().unwrap();
                    }

                    // Pops == pushes; anything left over is a lost wakeup.
                    assert_eq!(queue.len(), 0);
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Producer/consumer throughput, spinning consumers (try_pop)
// ============================================================================

fn bench_queue_spinning_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue_spinning_throughput");

    const MESSAGES_PER_PRODUCER: usize = 25_000;

    for num_threads in [1, 2, 4] {
        let total = MESSAGES_PER_PRODUCER * num_threads;
        group.throughput(Throughput::Elements(total as u64));

        group.bench_with_input(
            BenchmarkId::new("tandem_blocking", num_threads),
            &num_threads,
            |b, &n| {
                b.iter(|| {
                    let queue = Arc::new(BlockingQueue::<u64>::new());

                    let producers: Vec<_> = (0..n)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for i in 0..MESSAGES_PER_PRODUCER {
                                    queue.push(i as u64);
                                }
                            })
                        })
                        .collect();

                    let consumers: Vec<_> = (0..n)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for _ in 0..MESSAGES_PER_PRODUCER {
                                    loop {
                                        if let Some(v) = queue.try_pop() {
                                            black_box(v);
                                            break;
                                        }
                                        std::hint::spin_loop();
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in producers {
                        handle.join().unwrap();
                    }
                    for handle in consumers {
                        handle.join().unwrap();
                    }

                    assert_eq!(queue.len(), 0);
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("crossbeam_seg", num_threads),
            &num_threads,
            |b, &n| {
                b.iter(|| {
                    let queue = Arc::new(SegQueue::<u64>::new());

                    let producers: Vec<_> = (0..n)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for i in 0..MESSAGES_PER_PRODUCER {
                                    queue.push(i as u64);
                                }
                            })
                        })
                        .collect();

                    let consumers: Vec<_> = (0..n)
                        .map(|_| {
                            let queue = Arc::clone(&queue);
                            thread::spawn(move || {
                                for _ in 0..MESSAGES_PER_PRODUCER {
                                    loop {
                                        if let Some(v) = queue.pop() {
                                            black_box(v);
                                            break;
                                        }
                                        std::hint::spin_loop();
                                    }
                                }
                            })
                        })
                        .collect();

                    for handle in producers {
                        handle.join().unwrap();
                    }
                    for handle in consumers {
                        handle.join().unwrap();
                    }

                    assert!(queue.is_empty());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_queue_latency,
    bench_queue_blocking_throughput,
    bench_queue_spinning_throughput,
);

criterion_main!(benches);
