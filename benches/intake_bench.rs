//! Benchmarks for report intake and count assignment at varying report sizes.
//!
//! Run with: `cargo bench --bench intake_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use stockrecon::config::IntakeConfig;
use stockrecon::intake::lines::{reconstruct_document, DEFAULT_Y_TOLERANCE};
use stockrecon::intake::{IntakePipeline, PageFragments, TextFragment};
use stockrecon::{distribute, Worker};

/// Generate a stock report of `products` rows split into 40-row pages.
///
/// Fragments are emitted in scrambled x order so reconstruction has to sort.
fn generate_pages(products: usize) -> Vec<PageFragments> {
    let mut pages = Vec::new();
    for (page_idx, chunk) in (1..=products).collect::<Vec<_>>().chunks(40).enumerate() {
        let mut page = vec![
            TextFragment::new("al 05/03/2024", 400.0, 800.0),
            TextFragment::new("Reporte de Existencias", 150.0, 800.0),
            TextFragment::new("Sucursal Centro", 0.0, 800.0),
        ];
        let mut y = 780.0;
        for &i in chunk {
            page.push(TextFragment::new(format!("AB{i}"), 0.0, y));
            y -= 9.0;
            page.push(TextFragment::new((i % 500).to_string(), 300.0, y));
            page.push(TextFragment::new(format!("Producto de prueba {i}"), 0.0, y));
            y -= 9.0;
        }
        page.push(TextFragment::new(format!("Página {}", page_idx + 1), 200.0, 10.0));
        pages.push(page);
    }
    pages
}

fn bench_reconstruction(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct_lines");
    for size in [100, 1_000, 10_000] {
        let pages = generate_pages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pages, |b, pages| {
            b.iter(|| reconstruct_document(black_box(pages), DEFAULT_Y_TOLERANCE));
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let pipeline = IntakePipeline::new(IntakeConfig::default()).expect("default config is valid");
    let mut group = c.benchmark_group("intake_pipeline");
    for size in [100, 1_000, 10_000] {
        let pages = generate_pages(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &pages, |b, pages| {
            b.iter(|| pipeline.process_pages("bench", black_box(pages)).unwrap());
        });
    }
    group.finish();
}

fn bench_distribution(c: &mut Criterion) {
    let pipeline = IntakePipeline::new(IntakeConfig::default()).expect("default config is valid");
    let collection = pipeline
        .process_pages("bench", &generate_pages(10_000))
        .unwrap()
        .collection;
    let mut group = c.benchmark_group("distribute");
    for workers in [3, 12, 50] {
        let roster: Vec<Worker> = (1..=workers)
            .map(|i| Worker::new(format!("W{i}"), format!("Worker {i}")))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(workers), &roster, |b, roster| {
            b.iter_batched(
                || collection.clone(),
                |mut products| distribute(&mut products, black_box(roster), 4_321).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_reconstruction, bench_pipeline, bench_distribution);
criterion_main!(benches);
