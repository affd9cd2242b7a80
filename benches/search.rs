use criterion::{criterion_group, criterion_main, Criterion};
use dominoes_search::config::GameConfig;
use dominoes_search::game::Game;
use dominoes_search::search::{generate_tree_stats, AlphaBeta, Minimax};
use dominoes_search::state::GameState;
use rand::{rngs::StdRng, SeedableRng};
use std::hint::black_box;

fn corpus(cfg: &GameConfig) -> Vec<GameState> {
    let mut rng = StdRng::seed_from_u64(7777);
    (0..16).map(|_| GameState::initial(&Game::random_deal(cfg, &mut rng))).collect()
}

fn bench_exact(c: &mut Criterion) {
    let cfg = GameConfig::new(4, 4).unwrap();
    let roots = corpus(&cfg);

    c.bench_function("search/minimax", |bch| {
        bch.iter(|| {
            let mut acc = 0i64;
            for root in &roots {
                acc += Minimax::new(&cfg).run(root).value as i64;
            }
            black_box(acc)
        })
    });

    c.bench_function("search/alpha_beta", |bch| {
        bch.iter(|| {
            let mut acc = 0i64;
            for root in &roots {
                acc += AlphaBeta::new(&cfg).run(root, false).unwrap().value as i64;
            }
            black_box(acc)
        })
    });

    c.bench_function("search/alpha_beta_with_path", |bch| {
        bch.iter(|| {
            let mut acc = 0usize;
            for root in &roots {
                let report = AlphaBeta::new(&cfg).run(root, true).unwrap();
                acc += report.path.map(|p| p.len()).unwrap_or(0);
            }
            black_box(acc)
        })
    });

    c.bench_function("search/tree_stats", |bch| {
        bch.iter(|| {
            let mut acc = 0u64;
            for root in &roots {
                acc += generate_tree_stats(&cfg, root).total_nodes();
            }
            black_box(acc)
        })
    });
}

criterion_group!(benches, bench_exact);
criterion_main!(benches);
