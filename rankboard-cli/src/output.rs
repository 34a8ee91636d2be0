/// Output formatting: terminal tables and JSON.
use rankboard_core::{Entity, EntityId, Neighborhood, RankedUser, RecalculationReport, StrengthResult};
use serde::Serialize;
use std::collections::HashMap;

use crate::bail;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonStrength {
    rank: usize,
    entity: EntityId,
    strength: f64,
    log_strength: f64,
    comparisons: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonStrengthOutput {
    entities: Vec<JsonStrength>,
    iterations: usize,
    converged: bool,
    total_comparisons: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonRecalculation<'a> {
    report: &'a RecalculationReport,
    entities: &'a [Entity],
}

pub fn print_json(value: &impl Serialize) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| bail(format!("Failed to serialize output: {e}")));
    println!("{json}");
}

/// Print Bradley-Terry strengths, strongest first.
pub fn print_strengths_table(result: &StrengthResult, games_played: &HashMap<EntityId, usize>, total_comparisons: usize) {
    println!(" # | {:>10} | {:>14} | {:>8} | Comparisons", "Entity", "Strength", "ln θ");
    println!("---|-{}-|-{}-|-{}-|------------", "-".repeat(10), "-".repeat(14), "-".repeat(8));

    for (i, row) in result.ranked().iter().enumerate() {
        let games = games_played.get(&row.entity).copied().unwrap_or(0);
        println!(
            "{:>2} | {:>10} | {:>14.6e} | {:>8.3} | {:>11}",
            i + 1, row.entity, row.strength, row.log_strength, games,
        );
    }

    println!(
        "\n{} entities from {} comparisons ({} iterations{})",
        result.scores.len(),
        total_comparisons,
        result.iterations,
        if result.converged { "" } else { ", NOT converged" },
    );
}

pub fn print_strengths_json(result: &StrengthResult, games_played: &HashMap<EntityId, usize>, total_comparisons: usize) {
    print_json(&strengths_json(result, games_played, total_comparisons));
}

fn strengths_json(result: &StrengthResult, games_played: &HashMap<EntityId, usize>, total_comparisons: usize) -> JsonStrengthOutput {
    let entities = result
        .ranked()
        .iter()
        .enumerate()
        .map(|(i, row)| JsonStrength {
            rank: i + 1,
            entity: row.entity,
            strength: row.strength,
            log_strength: row.log_strength,
            comparisons: games_played.get(&row.entity).copied().unwrap_or(0),
        })
        .collect();

    JsonStrengthOutput {
        entities,
        iterations: result.iterations,
        converged: result.converged,
        total_comparisons,
    }
}

/// Print ratings after a full replay, highest first.
pub fn print_recalculation_table(report: &RecalculationReport, entities: &[Entity], default_rating: f64) {
    let mut sorted: Vec<&Entity> = entities.iter().collect();
    sorted.sort_by(|a, b| {
        let ra = a.rating.unwrap_or(default_rating);
        let rb = b.rating.unwrap_or(default_rating);
        rb.total_cmp(&ra)
    });

    println!(" # | {:>10} | {:>8} | Benchmark", "Entity", "Rating");
    println!("---|-{}-|-{}-|----------", "-".repeat(10), "-".repeat(8));
    for (i, entity) in sorted.iter().enumerate() {
        println!(
            "{:>2} | {:>10} | {:>8.0} | {}",
            i + 1,
            entity.id,
            entity.rating.unwrap_or(default_rating),
            if entity.is_benchmark { "pinned" } else { "" },
        );
    }

    println!(
        "\nReplayed {} comparisons in {} ms ({} skipped)",
        report.comparisons_processed, report.duration_ms, report.skipped,
    );
}

pub fn print_recalculation_json(report: &RecalculationReport, entities: &[Entity]) {
    print_json(&JsonRecalculation { report, entities });
}

/// Print a full leaderboard.
pub fn print_leaderboard_table(ranked: &[RankedUser]) {
    println!("Rank | {:>10} | {:>10} | League", "User", "Points");
    println!("-----|-{}-|-{}-|-------", "-".repeat(10), "-".repeat(10));
    for user in ranked {
        println!("{:>4} | {:>10} | {:>10} | {}", user.rank, user.user_id, user.total_points, user.league);
    }
}

/// Print one user's neighborhood, marking the user's own row.
pub fn print_neighborhood(view: &Neighborhood) {
    let rows = view
        .above
        .iter()
        .map(|u| (u, false))
        .chain(view.current_user.iter().map(|u| (u, true)))
        .chain(view.below.iter().map(|u| (u, false)));

    for (user, is_current) in rows {
        println!(
            "{} {:>4} | {:>10} | {:>10} | {}",
            if is_current { ">" } else { " " },
            user.rank,
            user.user_id,
            user.total_points,
            user.league,
        );
    }

    println!(
        "\n{}\n{} users; Gold through rank {}, Silver through rank {}",
        view.message, view.total_users, view.league_breakpoints.gold, view.league_breakpoints.silver,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rankboard_core::{StrengthConfig, compute_strengths};

    #[test]
    fn test_strengths_json_keys_are_camel_case() {
        let result = compute_strengths(&[(1, 2), (2, 3), (1, 3)], &StrengthConfig::default());
        let games = HashMap::from([(1, 2), (2, 2), (3, 2)]);
        let value = serde_json::to_value(strengths_json(&result, &games, 3)).unwrap();

        assert_eq!(value["totalComparisons"], 3);
        let first = &value["entities"][0];
        assert_eq!(first["entity"], 1);
        assert_eq!(first["rank"], 1);
        assert!(first.get("logStrength").is_some());
        assert!(first.get("log_strength").is_none());
    }
}
