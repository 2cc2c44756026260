//! Criterion benchmark for favorites reconciliation over large catalogs (made by FontLab https://www.fontlab.com/)

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fontfav_core::catalog::InstalledCatalog;
use fontfav_core::favorites::FavoritesStore;

fn bench_reconcile(c: &mut Criterion) {
    let installed: Vec<String> = (0..20_000).map(|i| format!("Family {i:05}")).collect();
    let catalog = InstalledCatalog::from_names(installed.iter().cloned());
    let persisted: String = (0..20_000)
        .step_by(7)
        .map(|i| format!("Family {i:05}"))
        .chain((0..500).map(|i| format!("Gone {i}")))
        .collect::<Vec<_>>()
        .join(",");

    c.bench_function("from_persisted_form 20k catalog", |b| {
        b.iter(|| FavoritesStore::from_persisted_form(black_box(&persisted), catalog.clone()))
    });

    let store = FavoritesStore::from_persisted_form(&persisted, catalog.clone());
    c.bench_function("to_persisted_form", |b| {
        b.iter(|| black_box(&store).to_persisted_form())
    });
}

criterion_group!(benches, bench_reconcile);
criterion_main!(benches);
