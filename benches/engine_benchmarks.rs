use std::sync::Arc;
use std::time::{Duration, Instant};

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use genequiz::catalog::{Catalog, Domain, ItemId};
use genequiz::engine::picker::{generate_options, pick_next};
use genequiz::engine::{CardDeck, Difficulty, active_pool};
use genequiz::session::{Choice, Phase, SessionController, Timing};

fn bundled(domain: Domain) -> Arc<Catalog> {
    Arc::new(Catalog::bundled(domain).expect("bundled catalog"))
}

fn bench_pool(c: &mut Criterion) {
    let deck = CardDeck::from_ids((1..=200).map(|i| ItemId::new(i.to_string())));
    let chunked = Difficulty::clamped(Domain::Classification, 2);
    let full = Difficulty::clamped(Domain::Classification, 3);

    c.bench_function("active_pool chunked (200 cards)", |b| {
        b.iter(|| active_pool(black_box(&deck), chunked).len())
    });
    c.bench_function("active_pool full (200 cards)", |b| {
        b.iter(|| active_pool(black_box(&deck), full).len())
    });
}

fn bench_picker(c: &mut Criterion) {
    let catalog = bundled(Domain::Identification);
    let deck = CardDeck::from_catalog(&catalog);
    let difficulty = Difficulty::clamped(Domain::Identification, 3);
    let mut rng = SmallRng::seed_from_u64(7);

    c.bench_function("pick_next + generate_options", |b| {
        b.iter(|| {
            let pool = active_pool(&deck, difficulty);
            let id = pick_next(&pool, None, &mut rng).expect("non-empty pool");
            let item = catalog.get(&id).expect("picked item exists");
            generate_options(black_box(item), &catalog, &mut rng)
        })
    });
}

fn bench_full_session(c: &mut Criterion) {
    let catalog = bundled(Domain::Classification);
    let timing = Timing {
        countdown_secs: 0,
        ..Timing::default()
    };

    c.bench_function("perfect classification session", |b| {
        b.iter(|| {
            let difficulty = Difficulty::clamped(Domain::Classification, 4);
            let mut ctl = SessionController::with_rng(
                catalog.clone(),
                difficulty,
                timing,
                SmallRng::seed_from_u64(42),
            );
            let mut now = Instant::now();
            ctl.start(difficulty, now);
            while ctl.phase() == Phase::Active {
                let Some(item) = ctl.current_item() else { break };
                let Some(answer) = item.classification() else { break };
                ctl.submit(&Choice::Classification(answer), now);
                now += Duration::from_secs(3);
                ctl.tick(now);
            }
            black_box(ctl.progress())
        })
    });
}

criterion_group!(benches, bench_pool, bench_picker, bench_full_session);
criterion_main!(benches);
