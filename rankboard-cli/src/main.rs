mod config;
mod input;
mod logging;
mod output;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rankboard_core::{
    Comparison, Entity, EntityId, MemoryStore, RankingEngine, RatingStore, SkippedPair, Standing, compute_strengths,
    expected_score, rank_users, update,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::RankboardConfig;

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "rankboard", version, about = "Rank entities from pairwise judgments")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: ~/.config/rankboard/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Create a default config file at ~/.config/rankboard/config.toml
    Init,
    /// Apply one Elo update to a pair of ratings
    Elo(EloArgs),
    /// Fit Bradley-Terry strengths to a comparison log
    Strengths(StrengthsArgs),
    /// Reset all ratings and replay a comparison log
    Recalculate(RecalculateArgs),
    /// Pick the next pair for a judge
    NextPair(NextPairArgs),
    /// Rank users by points, or show one user's neighborhood
    Leaderboard(LeaderboardArgs),
}

#[derive(Parser)]
struct EloArgs {
    /// Winner's rating before the comparison
    #[arg(long, allow_negative_numbers = true)]
    winner: f64,

    /// Loser's rating before the comparison
    #[arg(long, allow_negative_numbers = true)]
    loser: f64,

    /// K-factor (default: elo.default_k from config, 32)
    #[arg(long)]
    k: Option<f64>,
}

#[derive(Parser)]
struct StrengthsArgs {
    /// JSON array of comparisons
    #[arg(long)]
    comparisons: PathBuf,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct RecalculateArgs {
    /// JSON array of entities
    #[arg(long)]
    entities: PathBuf,

    /// JSON array of comparisons
    #[arg(long)]
    comparisons: PathBuf,

    /// Write the recalculated entities to this file as JSON
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct NextPairArgs {
    /// JSON array of entities
    #[arg(long)]
    entities: PathBuf,

    /// JSON array of comparisons (any judges; filtered to --judge)
    #[arg(long)]
    comparisons: PathBuf,

    /// JSON array of skipped pairs
    #[arg(long)]
    skips: Option<PathBuf>,

    /// Judge to pick for
    #[arg(long)]
    judge: i64,

    /// Probability of drawing from the closest-rated pairs (default: config, then 0.7)
    #[arg(long)]
    adaptive_ratio: Option<f64>,

    /// Seed for a reproducible pick
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser)]
struct LeaderboardArgs {
    /// JSON array of {userId, totalPoints}
    #[arg(long)]
    standings: PathBuf,

    /// Show this user's neighborhood instead of the full table
    #[arg(long)]
    user: Option<i64>,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

const DEFAULT_ADAPTIVE_RATIO: f64 = 0.7;

fn main() {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);

    let command = match cli.command {
        Commands::Init => {
            config::create_default_config(&config_path);
            println!("Created config at {}", config_path.display());
            println!("Edit it to tune K-factors, solver limits and fairness thresholds.");
            return;
        }
        other => other,
    };

    let cfg = config::load_config(&config_path);
    logging::setup_logging(cli.verbose, cfg.log_level.as_deref());

    match command {
        Commands::Init => {}
        Commands::Elo(args) => run_elo(&cfg, args),
        Commands::Strengths(args) => run_strengths(&cfg, args),
        Commands::Recalculate(args) => run_recalculate(cfg, args),
        Commands::NextPair(args) => run_next_pair(cfg, args),
        Commands::Leaderboard(args) => run_leaderboard(cfg, args),
    }
}

fn run_elo(cfg: &RankboardConfig, args: EloArgs) {
    let k = args.k.unwrap_or(cfg.engine.elo.default_k);
    let (new_winner, new_loser) = update(args.winner, args.loser, k);
    let expected = expected_score(args.winner, args.loser);

    println!("Expected winner score: {:.3} (K = {})", expected, k);
    println!("Winner: {:.0} -> {:.0} ({:+.0})", args.winner, new_winner, new_winner - args.winner);
    println!("Loser:  {:.0} -> {:.0} ({:+.0})", args.loser, new_loser, new_loser - args.loser);
}

fn run_strengths(cfg: &RankboardConfig, args: StrengthsArgs) {
    let comparisons: Vec<Comparison> = input::load_records(&args.comparisons, "comparisons");
    info!(comparisons = comparisons.len(), "Loaded comparison log");

    let outcomes: Vec<(EntityId, EntityId)> = comparisons.iter().map(Comparison::outcome).collect();
    let result = compute_strengths(&outcomes, &cfg.engine.strength);

    let mut games_played: HashMap<EntityId, usize> = HashMap::new();
    for (winner, loser) in &outcomes {
        *games_played.entry(*winner).or_insert(0) += 1;
        *games_played.entry(*loser).or_insert(0) += 1;
    }

    if args.json {
        output::print_strengths_json(&result, &games_played, outcomes.len());
    } else {
        output::print_strengths_table(&result, &games_played, outcomes.len());
    }
}

fn run_recalculate(cfg: RankboardConfig, args: RecalculateArgs) {
    let entities: Vec<Entity> = input::load_records(&args.entities, "entities");
    let comparisons: Vec<Comparison> = input::load_records(&args.comparisons, "comparisons");
    info!(entities = entities.len(), comparisons = comparisons.len(), "Loaded records");

    let default_rating = cfg.engine.elo.default_rating;
    let engine = RankingEngine::new(MemoryStore::with_records(entities, comparisons, Vec::new()), cfg.engine);
    let report = engine.recalculate_all();
    let entities = engine.store().entities();

    if let Some(ref path) = args.output {
        let json = serde_json::to_string_pretty(&entities)
            .unwrap_or_else(|e| bail(format!("Failed to serialize entities: {e}")));
        std::fs::write(path, json).unwrap_or_else(|e| bail(format!("Failed to write {}: {e}", path.display())));
        info!(path = %path.display(), "Wrote recalculated entities");
    }

    if args.json {
        output::print_recalculation_json(&report, &entities);
    } else {
        output::print_recalculation_table(&report, &entities, default_rating);
    }
}

fn run_next_pair(cfg: RankboardConfig, args: NextPairArgs) {
    let adaptive_ratio = args
        .adaptive_ratio
        .or(cfg.adaptive_ratio)
        .unwrap_or(DEFAULT_ADAPTIVE_RATIO);

    let entities: Vec<Entity> = input::load_records(&args.entities, "entities");
    let comparisons: Vec<Comparison> = input::load_records(&args.comparisons, "comparisons");
    let skips: Vec<SkippedPair> = match args.skips {
        Some(ref path) => input::load_records(path, "skipped pairs"),
        None => Vec::new(),
    };

    if entities.len() < 2 {
        warn!(entities = entities.len(), "Fewer than two entities; no pair can ever be formed");
    }

    let engine = RankingEngine::new(MemoryStore::with_records(entities, comparisons, skips), cfg.engine);
    let pick = match args.seed {
        Some(seed) => engine.next_pair_with_rng(args.judge, adaptive_ratio, &mut StdRng::seed_from_u64(seed)),
        None => engine.next_pair(args.judge, adaptive_ratio),
    }
    .unwrap_or_else(|e| bail(e));

    match pick {
        Some((left, right)) => println!("{left} vs {right}"),
        None => println!("No pairs left for judge {}", args.judge),
    }
}

fn run_leaderboard(cfg: RankboardConfig, args: LeaderboardArgs) {
    let standings: Vec<Standing> = input::load_records(&args.standings, "standings");

    match args.user {
        Some(user_id) => {
            let engine = RankingEngine::new(MemoryStore::new(), cfg.engine);
            let view = engine.leaderboard_neighborhood(&standings, user_id);
            if args.json {
                output::print_json(&view);
            } else {
                output::print_neighborhood(&view);
            }
        }
        None => {
            let ranked = rank_users(&standings);
            if args.json {
                output::print_json(&ranked);
            } else {
                output::print_leaderboard_table(&ranked);
            }
        }
    }
}
