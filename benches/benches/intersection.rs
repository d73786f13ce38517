// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Rect;
use understory_infinite_scroll::{InfiniteScroll, PageUpdate, ScrollProps};
use understory_intersection::{
    IntersectionWatcher, RectWatcher, RectWatcherFactory, Root, WatchOptions, evaluate,
};

const ROW: f64 = 24.0;

fn viewport() -> Rect {
    Rect::new(0.0, 0.0, 400.0, 600.0)
}

fn row(index: usize, offset: f64) -> Rect {
    let top = index as f64 * ROW - offset;
    Rect::new(0.0, top, 400.0, top + ROW)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersection/evaluate");
    let options = WatchOptions::<()>::new(Root::Default)
        .with_threshold(0.5)
        .with_margin(120.0);
    let targets: Vec<Rect> = (0..1_024).map(|i| row(i, 6_000.0)).collect();
    group.throughput(Throughput::Elements(targets.len() as u64));
    group.bench_function("rows_1024", |b| {
        b.iter(|| {
            for target in &targets {
                black_box(evaluate(*target, viewport(), &options));
            }
        });
    });
    group.finish();
}

fn bench_measure(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersection/measure");

    // Every target crosses on each pass: the offset alternates between two
    // positions that put all rows in and out of view.
    for len in [1usize, 16, 256, 4_096] {
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("crossing", len), &len, |b, &len| {
            b.iter_batched(
                || {
                    let mut watcher = RectWatcher::<usize, ()>::new(WatchOptions::default());
                    for i in 0..len {
                        watcher.observe(i);
                    }
                    watcher
                },
                |mut watcher| {
                    for pass in 0..8_u64 {
                        let offset = if pass % 2 == 0 { 0.0 } else { 1.0e6 };
                        watcher.measure(viewport(), pass, |i| Some(row(*i % 25, offset)));
                    }
                    black_box(watcher.take_records());
                },
                BatchSize::SmallInput,
            );
        });

        // No crossings: the steady state while scrolling within a page.
        group.bench_with_input(BenchmarkId::new("steady", len), &len, |b, &len| {
            let mut watcher = RectWatcher::<usize, ()>::new(WatchOptions::default());
            for i in 0..len {
                watcher.observe(i);
            }
            watcher.measure(viewport(), 0, |i| Some(row(*i % 25, 0.0)));
            let _ = watcher.take_records();
            b.iter(|| black_box(watcher.measure(viewport(), 1, |i| Some(row(*i % 25, 0.0)))));
        });
    }

    group.finish();
}

fn bench_scroll_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("infinite_scroll/frame");
    let rows: Vec<usize> = (0..1_000).collect();

    group.bench_function("measure_and_process", |b| {
        let mut scroll = InfiniteScroll::new(
            RectWatcherFactory::<usize, ()>::new(),
            |update: PageUpdate| {
                black_box(update(0));
            },
            ScrollProps::new().with_margin(200.0),
        );
        scroll.sync_children(&rows, |row| *row);
        let mut time = 0_u64;
        b.iter(|| {
            time += 1;
            // Alternate between the top of the list and its end.
            let offset = if time % 2 == 0 { 0.0 } else { 23_600.0 };
            if let Some(watcher) = scroll.watcher_mut() {
                watcher.measure(viewport(), time, |i| Some(row(*i, offset)));
            }
            black_box(scroll.process_records())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_measure, bench_scroll_frame);
criterion_main!(benches);
