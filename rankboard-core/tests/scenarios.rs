use chrono::{DateTime, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rankboard_core::{
    AdaptiveKFactor, Entity, League, MemoryStore, PairKey, RankingConfig, RankingEngine, RatingStore, Standing,
    StrengthConfig, compute_strengths, rank_users, update,
};

fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
}

#[test]
fn test_equal_ratings_exchange_sixteen_points() {
    assert_eq!(update(1500.0, 1500.0, 32.0), (1516.0, 1484.0));
}

#[test]
fn test_favorite_gains_less_than_even_match() {
    let (winner, loser) = update(1600.0, 1500.0, 32.0);
    assert!(winner - 1600.0 < 16.0);
    assert_eq!((winner, loser), (1612.0, 1488.0));
}

#[test]
fn test_single_comparison_strengths() {
    let result = compute_strengths(&[(1, 2)], &StrengthConfig::default());
    let theta_1 = result.strength(1).unwrap();
    let theta_2 = result.strength(2).unwrap();

    assert!(theta_1 > 1.0);
    assert!(theta_2 < 1.0);
    assert!(((theta_1 * theta_2).sqrt() - 1.0).abs() < 1e-9);
}

#[test]
fn test_four_entities_all_pairs_judged_is_exhausted() {
    let engine = RankingEngine::new(
        MemoryStore::with_records((1..=4).map(Entity::new).collect(), Vec::new(), Vec::new()),
        RankingConfig::default(),
    );
    let pairs = [(1, 2), (1, 3), (1, 4), (2, 3), (2, 4), (3, 4)];
    for (i, &(w, l)) in pairs.iter().enumerate() {
        engine.record_comparison(1, w, l, at(i as i64)).unwrap();
    }

    let mut rng = StdRng::seed_from_u64(99);
    assert_eq!(engine.next_pair_with_rng(1, 0.8, &mut rng).unwrap(), None);
}

#[test]
fn test_adaptive_k_for_fifteen_comparisons() {
    assert_eq!(AdaptiveKFactor::default().for_count(15), 32.0);
}

#[test]
fn test_nine_users_league_bands() {
    let standings: Vec<Standing> = (1..=9)
        .map(|i| Standing {
            user_id: i,
            total_points: 1000 - 10 * i,
        })
        .collect();
    let ranked = rank_users(&standings);

    let league_of = |rank: usize| ranked.iter().find(|u| u.rank == rank).unwrap().league;
    assert_eq!(league_of(3), League::Gold);
    assert_eq!(league_of(4), League::Silver);
    assert_eq!(league_of(7), League::Bronze);

    let engine = RankingEngine::new(MemoryStore::new(), RankingConfig::default());
    let view = engine.leaderboard_neighborhood(&standings, 5);
    assert_eq!(view.league_breakpoints.gold, 3);
    assert_eq!(view.league_breakpoints.silver, 6);
}

#[test]
fn test_judge_session_never_repeats_and_ends_in_none() {
    let entities: Vec<Entity> = (1..=7).map(|i| Entity::with_rating(i, 1400.0 + 30.0 * i as f64)).collect();
    let engine = RankingEngine::new(
        MemoryStore::with_records(entities, Vec::new(), Vec::new()),
        RankingConfig::default(),
    );
    let mut rng = StdRng::seed_from_u64(2024);
    let mut seen = std::collections::HashSet::new();

    let mut step = 0;
    while let Some((left, right)) = engine.next_pair_with_rng(3, 0.7, &mut rng).unwrap() {
        assert!(seen.insert(PairKey::new(left, right)), "pair ({left}, {right}) repeated");
        if step % 4 == 3 {
            engine.skip_pair(3, left, right, at(step)).unwrap();
        } else {
            engine.record_comparison(3, left, right, at(step)).unwrap();
        }
        step += 1;
    }

    // 7 entities -> 21 unordered pairs, each used exactly once.
    assert_eq!(seen.len(), 21);
}

#[test]
fn test_recalculation_twice_is_bit_identical_and_keeps_benchmarks() {
    let entities = vec![
        Entity::new(1),
        Entity::with_rating(2, 1710.0),
        Entity::benchmark(3, 1600.0),
        Entity::new(4),
    ];
    let engine = RankingEngine::new(
        MemoryStore::with_records(entities, Vec::new(), Vec::new()),
        RankingConfig::default(),
    );
    let results = [(1, 2), (3, 1), (2, 4), (4, 3), (1, 4), (2, 3), (3, 2), (4, 1)];
    for (i, &(w, l)) in results.iter().enumerate() {
        engine.record_comparison(9, w, l, at(i as i64)).unwrap();
    }

    let first = engine.recalculate_all();
    let after_first: Vec<Option<u64>> = engine.store().entities().iter().map(|e| e.rating.map(f64::to_bits)).collect();
    let second = engine.recalculate_all();
    let after_second: Vec<Option<u64>> = engine.store().entities().iter().map(|e| e.rating.map(f64::to_bits)).collect();

    assert_eq!(first.comparisons_processed, 8);
    assert_eq!(second.comparisons_processed, 8);
    assert_eq!(after_first, after_second);
    assert_eq!(engine.store().entity(3).unwrap().rating, Some(1600.0));
}

#[test]
fn test_recalculation_uses_flat_k_unlike_live_updates() {
    let engine = RankingEngine::new(
        MemoryStore::with_records(vec![Entity::new(1), Entity::new(2)], Vec::new(), Vec::new()),
        RankingConfig::default(),
    );
    engine.record_comparison(1, 1, 2, at(0)).unwrap();
    // Live: provisional K = 40.
    assert_eq!(engine.store().entity(1).unwrap().rating, Some(1520.0));

    engine.recalculate_all();
    // Replay: flat K = 32.
    assert_eq!(engine.store().entity(1).unwrap().rating, Some(1516.0));
}

#[test]
fn test_concurrent_submissions_and_recalculation_do_not_deadlock() {
    let engine = RankingEngine::new(
        MemoryStore::with_records((1..=5).map(Entity::new).collect(), Vec::new(), Vec::new()),
        RankingConfig::default(),
    );

    std::thread::scope(|scope| {
        for judge in 0..4 {
            let engine = &engine;
            scope.spawn(move || {
                for i in 0..25 {
                    let winner = (i % 5) + 1;
                    let loser = ((i + judge + 1) % 5) + 1;
                    if winner != loser {
                        engine.record_comparison(judge, winner, loser, at(i)).unwrap();
                    }
                }
            });
        }
        scope.spawn(|| {
            engine.recalculate_all();
        });
    });

    // Whatever interleaving happened, a final replay is deterministic.
    let total = engine.store().comparisons().len();
    let report = engine.recalculate_all();
    assert_eq!(report.comparisons_processed, total);
}
