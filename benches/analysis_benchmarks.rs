// Copyright 2025 Cowboy AI, LLC.

use catreview::{generate_report, Category, GraphBuilder, Morphism, Object};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// `files` files in `files / 10` packages, each importing the next three files
fn synthetic_codebase(files: usize) -> Category {
    let mut category = Category::new(format!("bench_{files}"));
    for i in 0..files {
        let object = Object::new(format!("pkg{}/f{}.go", i / 10, i), "file", format!("f{i}.go"))
            .with_metadata("package", format!("pkg{}", i / 10));
        category.add_object(object).unwrap();
    }
    for i in 0..files {
        for step in 1..=3 {
            let j = (i + step * 7) % files;
            if i == j {
                continue;
            }
            let source = format!("pkg{}/f{}.go", i / 10, i);
            let target = format!("pkg{}/f{}.go", j / 10, j);
            category
                .add_morphism(Morphism::new(format!("imp_{i}_{j}"), source, target, "import"))
                .unwrap();
        }
    }
    category
}

fn benchmark_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_report");
    for size in [50, 200, 800] {
        let category = synthetic_codebase(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &category, |b, category| {
            b.iter(|| generate_report(black_box(category)).unwrap());
        });
    }
    group.finish();
}

fn benchmark_graph_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("graph_build");
    for size in [50, 200, 800] {
        let category = synthetic_codebase(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &category, |b, category| {
            b.iter(|| GraphBuilder::new(black_box(category)).build());
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_report, benchmark_graph_build);
criterion_main!(benches);
