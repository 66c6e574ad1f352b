use criterion::{Criterion, black_box, criterion_group, criterion_main};

use verbdeck::engine::filter::{StatusFilter, filter};
use verbdeck::engine::pagination::paginate;
use verbdeck::store::schema::{Mark, ProgressMap, Verb};

fn make_catalog(count: u32) -> Vec<Verb> {
    (1..=count)
        .map(|id| Verb {
            id,
            word: format!("verb{id}"),
            example: format!("An example sentence for verb {id}."),
            word_translation: format!("to verb{id}"),
            example_translation: format!("Translated example {id}."),
            tips: None,
        })
        .collect()
}

fn make_progress(count: u32) -> ProgressMap {
    let mut progress = ProgressMap::default();
    for id in 1..=count {
        match id % 3 {
            0 => progress.record("tr-en", id, Mark::Learned),
            1 => progress.record("tr-en", id, Mark::NotLearned),
            _ => {} // pending
        }
    }
    progress
}

fn bench_filter(c: &mut Criterion) {
    let catalog = make_catalog(500);
    let progress = make_progress(500);

    c.bench_function("filter pending (500 verbs)", |b| {
        b.iter(|| {
            filter(
                black_box(&catalog),
                black_box(&progress),
                "tr-en",
                StatusFilter::Pending,
            )
        })
    });
}

fn bench_stats(c: &mut Criterion) {
    let progress = make_progress(500);

    c.bench_function("stats (500 verbs)", |b| {
        b.iter(|| black_box(&progress).stats("tr-en", 500))
    });
}

fn bench_page(c: &mut Criterion) {
    let catalog = make_catalog(500);
    let progress = make_progress(500);

    c.bench_function("filter + paginate page 20 (500 verbs)", |b| {
        b.iter(|| {
            let visible = filter(&catalog, &progress, "tr-en", StatusFilter::All);
            paginate(&visible, black_box(20), 6).len()
        })
    });
}

criterion_group!(benches, bench_filter, bench_stats, bench_page);
criterion_main!(benches);
