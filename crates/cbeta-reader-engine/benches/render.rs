use cbeta_reader_engine::rendering::{RenderOptions, render_with};
use criterion::{Criterion, criterion_group, criterion_main};
mod common;

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    group.sample_size(20);

    let xml = common::generate_tei_volume(50, 20);
    for collect_notes in [false, true] {
        let options = RenderOptions { collect_notes };
        let name = if collect_notes { "collect_notes" } else { "inline_notes" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let doc = render_with(std::hint::black_box(&xml), &options);
                std::hint::black_box(doc);
            });
        });
    }

    group.finish();
}

fn bench_offset_maps(c: &mut Criterion) {
    let mut group = c.benchmark_group("offset_maps");
    group.sample_size(20);

    let xml = common::generate_tei_volume(50, 20);
    let doc = render_with(&xml, &RenderOptions::default());

    group.bench_function("position_map", |b| {
        b.iter(|| std::hint::black_box(doc.position_map()));
    });

    group.finish();
}

criterion_group!(benches, bench_render, bench_offset_maps);
criterion_main!(benches);
