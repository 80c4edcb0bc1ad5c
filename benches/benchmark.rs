// Ranking and backfill benchmarks over synthetic catalogs
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use stylx_core::{Catalog, Product, Vector};
use stylx_similarity::{build_similar_set, rank};

const DIM: usize = 768;
const GENDERS: [&str; 3] = ["Men", "Women", "Unisex"];
const ARTICLE_TYPES: [&str; 6] = ["Shirts", "Tshirts", "Dresses", "Jeans", "Kurtas", "Tops"];

fn generate_random_vector(rng: &mut impl Rng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn generate_catalog(size: usize) -> Catalog {
    let mut rng = StdRng::seed_from_u64(42);
    let products = (0..size)
        .map(|i| {
            Product::new(
                i as u64,
                generate_random_vector(&mut rng, DIM),
                GENDERS[i % GENDERS.len()],
                ARTICLE_TYPES[i % ARTICLE_TYPES.len()],
            )
        })
        .collect();
    Catalog::new(products).unwrap()
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let mut rng = StdRng::seed_from_u64(7);
    let query = generate_random_vector(&mut rng, DIM);

    for size in [1_000, 10_000, 50_000].iter() {
        let catalog = generate_catalog(*size);
        group.bench_with_input(BenchmarkId::new("top5", size), size, |b, _| {
            b.iter(|| black_box(rank(&catalog, &query, 5).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_similar_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("similar_set");

    for size in [1_000, 10_000].iter() {
        let catalog = generate_catalog(*size);
        let anchor = catalog.products()[0].clone();
        group.bench_with_input(BenchmarkId::new("k5", size), size, |b, _| {
            b.iter(|| black_box(build_similar_set(&anchor, &catalog, 5).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rank, benchmark_similar_set);
criterion_main!(benches);
