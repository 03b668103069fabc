use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use limit_order_book::{Order, OrderBook, SharedOrderBook, Side, TradeCounter};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Builds a book with `levels_per_side` one-order levels on each side and no overlap.
fn populated_book(levels_per_side: u64) -> OrderBook<TradeCounter> {
    let mut order_book = OrderBook::new(TradeCounter::default());
    for i in 0..levels_per_side {
        let bid_price = 1_000_000 - i;
        let ask_price = 1_000_001 + i;
        order_book
            .submit(Order::buy("maker", bid_price, 100).unwrap())
            .unwrap();
        order_book
            .submit(Order::sell("maker", ask_price, 100).unwrap())
            .unwrap();
    }
    order_book
}

/// Random order around `mean_price`: buys skewed 1% below the mean, sells 1% above.
fn random_order(rng: &mut StdRng, mean_price: f64) -> Order {
    let side = if rng.gen_bool(0.5) { Side::Buy } else { Side::Sell };
    let skewed_mean = match side {
        Side::Buy => mean_price * 0.99,
        Side::Sell => mean_price * 1.01,
    };
    let spread = skewed_mean * 0.1;
    let price = rng.gen_range(skewed_mean - spread..skewed_mean + spread) as u64;
    let quantity = rng.gen_range(1..=1000);

    Order::new("load", side, price, quantity).unwrap()
}

/// Benchmark the performance of resting a single non-crossing order.
fn benchmark_resting_insertion(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("resting_insertion");

    benchmark_group.bench_function("insert_new_bid_level", |bencher| {
        let mut order_book = OrderBook::new(TradeCounter::default());
        let mut price_counter = 1u64;

        bencher.iter(|| {
            let order = Order::buy("maker", price_counter, 100).unwrap();
            black_box(order_book.submit(order).unwrap());
            price_counter += 1; // Ensure unique prices
        });
    });

    benchmark_group.bench_function("append_to_existing_ask_level", |bencher| {
        let mut order_book = OrderBook::new(TradeCounter::default());

        bencher.iter(|| {
            let order = Order::sell("maker", 1_000_000, 100).unwrap();
            black_box(order_book.submit(order).unwrap());
        });
    });

    benchmark_group.finish();
}

/// Benchmark a taker sweeping several levels, rebuilding the book for every iteration.
fn benchmark_crossing_submission(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("crossing_submission");

    for levels_swept in [1u64, 10, 100] {
        benchmark_group.throughput(Throughput::Elements(levels_swept));
        benchmark_group.bench_with_input(
            BenchmarkId::new("sweep_ask_levels", levels_swept),
            &levels_swept,
            |bencher, &levels_swept| {
                bencher.iter_batched(
                    || populated_book(levels_swept),
                    |mut order_book| {
                        let taker = Order::buy("taker", u64::MAX, levels_swept * 100).unwrap();
                        black_box(order_book.submit(taker).unwrap())
                    },
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }

    benchmark_group.finish();
}

/// Benchmark the performance of taking a snapshot at various book sizes.
fn benchmark_snapshot(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("snapshot");

    for book_size in [100u64, 1_000, 10_000] {
        let order_book = populated_book(book_size);

        benchmark_group.bench_with_input(
            BenchmarkId::new("snapshot", book_size),
            &order_book,
            |bencher, book| {
                bencher.iter(|| black_box(book.snapshot()));
            },
        );
    }

    benchmark_group.finish();
}

/// Benchmark concurrent snapshot readers on a shared book.
fn benchmark_concurrent_snapshot_reads(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("concurrent_snapshot_reads");
    let shared_book = SharedOrderBook::new(populated_book(1_000));

    for threads_count in [1, 2, 4, 8] {
        benchmark_group.bench_with_input(
            BenchmarkId::new("concurrent_reads", threads_count),
            &threads_count,
            |bencher, &thread_count| {
                bencher.iter(|| {
                    let mut thread_handles = vec![];

                    for _ in 0..thread_count {
                        let book_clone = shared_book.clone();
                        thread_handles.push(std::thread::spawn(move || {
                            for _ in 0..100 {
                                black_box(book_clone.snapshot());
                            }
                        }));
                    }

                    for handle in thread_handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    benchmark_group.finish();
}

/// Benchmark sustained random order flow on one book that is never reset.
fn benchmark_random_load(criterion: &mut Criterion) {
    let mut benchmark_group = criterion.benchmark_group("random_load");
    let batch_size = 10_000u64;
    benchmark_group.throughput(Throughput::Elements(batch_size));

    benchmark_group.bench_function("submit_random_orders", |bencher| {
        let mut rng = StdRng::seed_from_u64(42);
        let mut order_book = OrderBook::new(TradeCounter::default());

        bencher.iter(|| {
            for _ in 0..batch_size {
                let order = random_order(&mut rng, 1000.0);
                black_box(order_book.submit(order).unwrap());
            }
        });

        assert!(!order_book.is_crossed());
        black_box(order_book.sink().trades);
    });

    benchmark_group.finish();
}

criterion_group!(
    benches,
    benchmark_resting_insertion,
    benchmark_crossing_submission,
    benchmark_snapshot,
    benchmark_concurrent_snapshot_reads,
    benchmark_random_load
);
criterion_main!(benches);
