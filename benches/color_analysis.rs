use criterion::{black_box, criterion_group, criterion_main, Criterion};
use skintone_match::{
    classify_tone, classify_undertone, describe_skin, match_by_category, match_catalog,
    CatalogEntry, Rgb,
};

fn synthetic_catalog(rows: usize) -> Vec<CatalogEntry> {
    const TYPES: [&str; 6] = ["base", "corretivo", "po_compacto", "po_solto", "contorno", "iluminador"];
    (0..rows)
        .map(|i| {
            let shade = (i * 37 % 256) as u8;
            let hex = Rgb::new(shade, shade.wrapping_mul(3), 255 - shade).hex();
            CatalogEntry::new(hex, TYPES[i % TYPES.len()]).with_id(i as i64)
        })
        .collect()
}

fn benchmark_classification(c: &mut Criterion) {
    let sample = Rgb::new(198, 160, 128);

    c.bench_function("classify_tone", |b| b.iter(|| classify_tone(black_box(sample))));
    c.bench_function("classify_undertone", |b| {
        b.iter(|| classify_undertone(black_box(sample)))
    });
    c.bench_function("describe_skin", |b| b.iter(|| describe_skin(black_box(sample))));
}

fn benchmark_matching(c: &mut Criterion) {
    let sample = Rgb::new(198, 160, 128);
    let catalog = synthetic_catalog(1000);

    c.bench_function("match_catalog_1000", |b| {
        b.iter(|| match_catalog(black_box(sample), black_box(&catalog), 5))
    });
    c.bench_function("match_by_category_1000", |b| {
        b.iter(|| match_by_category(black_box(sample), black_box(&catalog), 5))
    });
}

criterion_group!(benches, benchmark_classification, benchmark_matching);
criterion_main!(benches);
