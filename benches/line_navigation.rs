use criterion::{black_box, criterion_group, criterion_main, Criterion};
use csv_pager::data::line_navigator::LineNavigator;
use csv_pager::data::window_reader::WindowReader;
use std::io::Cursor;

fn create_test_data(rows: usize) -> Vec<u8> {
    let statuses = ["open", "closed", "pending", "cancelled"];

    let mut data = Vec::with_capacity(rows * 48);
    for i in 0..rows {
        let line = format!(
            "{},trade-{:06},{:.2},{}\n",
            i,
            i * 7,
            i as f64 * 1.25,
            statuses[i % statuses.len()]
        );
        data.extend_from_slice(line.as_bytes());
    }
    data
}

fn benchmark_line_scans(c: &mut Criterion) {
    let data = create_test_data(100_000);
    let end = data.len() as u64;

    let mut group = c.benchmark_group("line_scans");

    group.bench_function("forward_1000_lines", |b| {
        let mut navigator = LineNavigator::new(Cursor::new(data.clone()));
        b.iter(|| {
            let mut offset = 0;
            for _ in 0..1000 {
                offset = navigator.next_line_start(black_box(offset)).unwrap();
            }
            offset
        });
    });

    group.bench_function("backward_1000_lines", |b| {
        let mut navigator = LineNavigator::new(Cursor::new(data.clone()));
        b.iter(|| {
            let mut offset = end;
            for _ in 0..1000 {
                offset = navigator.previous_line_start(black_box(offset)).unwrap();
            }
            offset
        });
    });

    group.finish();
}

fn benchmark_window_read(c: &mut Criterion) {
    let data = create_test_data(100_000);
    let reader = WindowReader::new(b',');

    c.bench_function("read_window_50_lines", |b| {
        let mut source = Cursor::new(data.clone());
        b.iter(|| {
            let window = reader
                .read_window(&mut source, black_box(data.len() as u64 / 2), 50)
                .unwrap();
            assert!(window.lines_read() <= 50);
        });
    });
}

criterion_group!(benches, benchmark_line_scans, benchmark_window_read);
criterion_main!(benches);
