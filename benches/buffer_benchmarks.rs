//! Benchmarks for buffer, history and search operations.
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use fluentpad_buffer::{EditRecord, History, Selection, TextBuffer};
use fluentpad_core::search::{self, Direction, SearchQuery};

/// Generates a large text string for benchmarking.
fn generate_large_text(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("Line {}: This is a sample line of text for benchmarking purposes.\n", i))
        .collect()
}

/// Benchmarks buffer creation.
fn bench_buffer_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_creation");

    for size in [100, 1000, 10000, 100000].iter() {
        let text = generate_large_text(*size);

        group.bench_with_input(BenchmarkId::new("from_string", size), &text, |b, text| {
            b.iter(|| {
                let buffer = TextBuffer::from(black_box(text.as_str()));
                black_box(buffer)
            })
        });
    }

    group.finish();
}

/// Benchmarks insertion at various positions.
fn bench_insertion(c: &mut Criterion) {
    let mut group = c.benchmark_group("insertion");

    let base_text = generate_large_text(10000);

    group.bench_function("insert_at_start", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                buffer.insert(0, black_box("inserted text")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("insert_at_middle", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let mid = buffer.len_chars() / 2;
                buffer.insert(mid, black_box("inserted text")).unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("insert_then_line_count", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                buffer.insert(0, black_box("x\n")).unwrap();
                black_box(buffer.line_count())
            },
        )
    });

    group.finish();
}

/// Benchmarks deletion operations.
fn bench_deletion(c: &mut Criterion) {
    let mut group = c.benchmark_group("deletion");

    let base_text = generate_large_text(10000);

    group.bench_function("delete_at_start", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                buffer.delete(0, 100).unwrap();
                black_box(buffer)
            },
        )
    });

    group.bench_function("delete_at_middle", |b| {
        b.iter_with_setup(
            || TextBuffer::from(base_text.as_str()),
            |mut buffer| {
                let mid = buffer.len_chars() / 2;
                buffer.delete(mid, 100).unwrap();
                black_box(buffer)
            },
        )
    });

    group.finish();
}

/// Benchmarks undo of many separate edits.
fn bench_undo(c: &mut Criterion) {
    let mut group = c.benchmark_group("undo");

    group.bench_function("undo_100_operations", |b| {
        b.iter_with_setup(
            || {
                let mut buffer = TextBuffer::new();
                let mut history = History::new();
                for i in 0..100 {
                    let offset = i * 5;
                    buffer.insert(offset, "test ").unwrap();
                    history.commit(EditRecord::new(
                        offset,
                        "",
                        "test ",
                        Selection::cursor(offset),
                        Selection::cursor(offset + 5),
                    ));
                }
                (buffer, history, Selection::cursor(500))
            },
            |(mut buffer, mut history, mut selection)| {
                while history.can_undo() {
                    history.undo(&mut buffer, &mut selection).unwrap();
                }
                black_box(buffer)
            },
        )
    });

    group.finish();
}

/// Benchmarks line lookup.
fn bench_line_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_access");

    let text = generate_large_text(100000);
    let buffer = TextBuffer::from(text.as_str());

    group.bench_function("line_range", |b| {
        b.iter(|| black_box(buffer.line_range(black_box(50000)).unwrap()))
    });

    group.bench_function("line_of_offset", |b| {
        let mid = buffer.len_chars() / 2;
        b.iter(|| black_box(buffer.line_of_offset(black_box(mid))))
    });

    group.finish();
}

/// Benchmarks search operations.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let text = generate_large_text(10000);
    let buffer = TextBuffer::from(text.as_str());

    group.bench_function("find_all_occurrences", |b| {
        b.iter(|| black_box(search::find_all(&buffer, black_box("Line"), true).unwrap()))
    });

    group.bench_function("find_next_case_insensitive", |b| {
        let query = SearchQuery::new("PURPOSES").start(buffer.len_chars() / 2);
        b.iter(|| black_box(search::find(&buffer, &query).unwrap()))
    });

    group.bench_function("find_previous_wrapping", |b| {
        let query = SearchQuery::new("Line 9999")
            .direction(Direction::Backward)
            .start(10);
        b.iter(|| black_box(search::find(&buffer, &query).unwrap()))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_buffer_creation,
    bench_insertion,
    bench_deletion,
    bench_undo,
    bench_line_access,
    bench_search,
);

criterion_main!(benches);
