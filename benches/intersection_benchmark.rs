use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;

use gapped_bitmap::intersect;
use gapped_bitmap::intersect::cursors;
use gapped_bitmap::SparseBitmap;

const UNIVERSE: u32 = 1 << 22;

// Random bitmap whose set bits are on average `spacing` positions apart.
fn build_bitmap(spacing: u32) -> SparseBitmap {
    let mut rng = rand::thread_rng();
    let mut bitmap = SparseBitmap::new();
    let mut position = rng.gen_range(0..spacing);
    while position < UNIVERSE {
        bitmap.set(position).unwrap();
        position += rng.gen_range(1..=2 * spacing);
    }
    bitmap
}

fn bench_intersections(c: &mut Criterion) {
    let mut group = c.benchmark_group("intersection");
    for &n_bitmaps in &[2usize, 4, 8] {
        // mix dense and sparse inputs so skipping has something to skip
        let bitmaps: Vec<SparseBitmap> = (0..n_bitmaps)
            .map(|k| build_bitmap(1 << (4 + 2 * (k as u32 % 4))))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("merge_fold", n_bitmaps),
            &bitmaps,
            |bench, input| {
                bench.iter(|| {
                    input[1..]
                        .iter()
                        .fold(input[0].clone(), |acc, b| acc.and(b))
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("nary_and", n_bitmaps),
            &bitmaps,
            |bench, input| {
                bench.iter(|| {
                    intersect::materialize(intersect::and(cursors(input)).unwrap())
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("fast_and", n_bitmaps),
            &bitmaps,
            |bench, input| {
                bench.iter(|| {
                    intersect::materialize(intersect::fast_and(cursors(input)).unwrap())
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("tree_and", n_bitmaps),
            &bitmaps,
            |bench, input| {
                bench.iter(|| {
                    intersect::materialize(intersect::tree_and(cursors(input)).unwrap())
                })
            },
        );
        group.bench_with_input(
            BenchmarkId::new("flat_and", n_bitmaps),
            &bitmaps,
            |bench, input| {
                bench.iter(|| {
                    intersect::materialize(intersect::flat_and(cursors(input)).unwrap())
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_intersections);
criterion_main!(benches);
