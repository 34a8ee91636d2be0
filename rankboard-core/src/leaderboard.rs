/// Leaderboard ranks, league tiers and the per-user neighborhood view.
///
/// Operates on point totals aggregated elsewhere.
use crate::config::LeaderboardConfig;
use crate::types::{League, RankedUser, Standing, UserId};

/// Last rank in Gold and last rank in Silver for a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LeagueBreakpoints {
    pub gold: usize,
    pub silver: usize,
}

impl LeagueBreakpoints {
    /// `gold = ceil(n / 3)`, `silver = ceil(2n / 3)`.
    pub fn for_population(total_users: usize) -> Self {
        LeagueBreakpoints {
            gold: total_users.div_ceil(3),
            silver: (2 * total_users).div_ceil(3),
        }
    }

    /// League for a 1-based rank. Rank 0 (and any rank in an empty
    /// population) is Bronze.
    pub fn league_for(&self, rank: usize) -> League {
        if rank == 0 {
            League::Bronze
        } else if rank <= self.gold {
            League::Gold
        } else if rank <= self.silver {
            League::Silver
        } else {
            League::Bronze
        }
    }
}

/// Sort by points descending and hand out sequential 1-based ranks.
///
/// The sort is stable and ties are not merged: equal totals keep their
/// input order and still get distinct ranks.
pub fn rank_users(standings: &[Standing]) -> Vec<RankedUser> {
    let mut sorted: Vec<Standing> = standings.to_vec();
    sorted.sort_by(|a, b| b.total_points.cmp(&a.total_points));

    let breakpoints = LeagueBreakpoints::for_population(sorted.len());
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedUser {
            user_id: s.user_id,
            total_points: s.total_points,
            rank: i + 1,
            league: breakpoints.league_for(i + 1),
        })
        .collect()
}

/// A user's slice of the leaderboard.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Neighborhood {
    /// `None` when the user is not on the leaderboard.
    pub current_user: Option<RankedUser>,
    /// Closest users above, best first.
    pub above: Vec<RankedUser>,
    /// Closest users below, best first.
    pub below: Vec<RankedUser>,
    pub total_users: usize,
    pub league_breakpoints: LeagueBreakpoints,
    pub message: String,
}

/// Neighborhood of `user_id` within an already ranked leaderboard.
pub fn neighborhood(ranked: &[RankedUser], user_id: UserId, config: &LeaderboardConfig) -> Neighborhood {
    let total_users = ranked.len();
    let league_breakpoints = LeagueBreakpoints::for_population(total_users);

    let Some(pos) = ranked.iter().position(|u| u.user_id == user_id) else {
        return Neighborhood {
            current_user: None,
            above: Vec::new(),
            below: Vec::new(),
            total_users,
            league_breakpoints,
            message: format!("Not ranked yet. {total_users} users on the leaderboard."),
        };
    };

    let current = ranked[pos];
    let above = ranked[pos.saturating_sub(config.neighbors_above)..pos].to_vec();
    let below_end = (pos + 1 + config.neighbors_below).min(total_users);
    let below = ranked[pos + 1..below_end].to_vec();

    let message = motivational_message(&current, above.last(), total_users);

    Neighborhood {
        current_user: Some(current),
        above,
        below,
        total_users,
        league_breakpoints,
        message,
    }
}

fn motivational_message(current: &RankedUser, next_up: Option<&RankedUser>, total_users: usize) -> String {
    if current.rank == 1 {
        return "You're on top of the leaderboard!".to_string();
    }

    match next_up {
        Some(neighbor) => {
            let gap = neighbor.total_points - current.total_points;
            match gap {
                0 => format!("Tied on points with rank {}. One more point moves you up!", neighbor.rank),
                1 => format!("Just 1 point behind rank {}!", neighbor.rank),
                _ => format!("{gap} points behind rank {}. Keep climbing!", neighbor.rank),
            }
        }
        None => format!("Rank {} of {}", current.rank, total_users),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standings(points: &[i64]) -> Vec<Standing> {
        points
            .iter()
            .enumerate()
            .map(|(i, &total_points)| Standing {
                user_id: (i + 1) as UserId,
                total_points,
            })
            .collect()
    }

    #[test]
    fn test_nine_users_breakpoints() {
        let ranked = rank_users(&standings(&[90, 80, 70, 60, 50, 40, 30, 20, 10]));
        let breakpoints = LeagueBreakpoints::for_population(9);
        assert_eq!(breakpoints, LeagueBreakpoints { gold: 3, silver: 6 });
        assert_eq!(ranked[2].league, League::Gold);
        assert_eq!(ranked[3].league, League::Silver);
        assert_eq!(ranked[6].league, League::Bronze);
    }

    #[test]
    fn test_ranks_are_a_bijection_sorted_by_points() {
        let ranked = rank_users(&standings(&[5, 50, 20, 20, 0, 35, 7]));
        let ranks: Vec<usize> = ranked.iter().map(|u| u.rank).collect();
        assert_eq!(ranks, (1..=7).collect::<Vec<_>>());
        assert!(ranked.windows(2).all(|w| w[0].total_points >= w[1].total_points));
    }

    #[test]
    fn test_ties_are_not_merged_and_keep_input_order() {
        let ranked = rank_users(&standings(&[10, 30, 30, 10]));
        let order: Vec<(UserId, usize)> = ranked.iter().map(|u| (u.user_id, u.rank)).collect();
        assert_eq!(order, vec![(2, 1), (3, 2), (1, 3), (4, 4)]);
    }

    #[test]
    fn test_band_sizes() {
        for n in 0..40usize {
            let points: Vec<i64> = (0..n as i64).rev().collect();
            let ranked = rank_users(&standings(&points));
            let count = |league| ranked.iter().filter(|u| u.league == league).count();

            let gold = n.div_ceil(3);
            let silver = (2 * n).div_ceil(3) - gold;
            assert_eq!(count(League::Gold), gold, "n={n}");
            assert_eq!(count(League::Silver), silver, "n={n}");
            assert_eq!(count(League::Bronze), n - gold - silver, "n={n}");
        }
    }

    #[test]
    fn test_empty_population_defaults_to_bronze() {
        let breakpoints = LeagueBreakpoints::for_population(0);
        assert_eq!(breakpoints.league_for(1), League::Bronze);
        assert!(rank_users(&[]).is_empty());
    }

    #[test]
    fn test_neighborhood_in_the_middle() {
        let ranked = rank_users(&standings(&[100, 90, 80, 70, 60, 50, 40, 30]));
        let view = neighborhood(&ranked, 6, &LeaderboardConfig::default());

        assert_eq!(view.current_user.unwrap().rank, 6);
        let above: Vec<usize> = view.above.iter().map(|u| u.rank).collect();
        let below: Vec<usize> = view.below.iter().map(|u| u.rank).collect();
        assert_eq!(above, vec![3, 4, 5]);
        assert_eq!(below, vec![7, 8]);
        assert_eq!(view.total_users, 8);
        assert_eq!(view.message, "10 points behind rank 5. Keep climbing!");
    }

    #[test]
    fn test_neighborhood_clamps_at_edges() {
        let ranked = rank_users(&standings(&[100, 90, 80]));

        let top = neighborhood(&ranked, 1, &LeaderboardConfig::default());
        assert!(top.above.is_empty());
        assert_eq!(top.below.len(), 2);
        assert_eq!(top.message, "You're on top of the leaderboard!");

        let bottom = neighborhood(&ranked, 3, &LeaderboardConfig::default());
        assert_eq!(bottom.above.len(), 2);
        assert!(bottom.below.is_empty());
    }

    #[test]
    fn test_messages_for_small_gaps() {
        let ranked = rank_users(&standings(&[10, 10, 9]));
        assert_eq!(
            neighborhood(&ranked, 2, &LeaderboardConfig::default()).message,
            "Tied on points with rank 1. One more point moves you up!"
        );
        assert_eq!(neighborhood(&ranked, 3, &LeaderboardConfig::default()).message, "Just 1 point behind rank 2!");
    }

    #[test]
    fn test_fallback_messages() {
        let ranked = rank_users(&standings(&[10, 5]));

        let unranked = neighborhood(&ranked, 77, &LeaderboardConfig::default());
        assert!(unranked.current_user.is_none());
        assert_eq!(unranked.message, "Not ranked yet. 2 users on the leaderboard.");

        let config = LeaderboardConfig {
            neighbors_above: 0,
            neighbors_below: 0,
        };
        let hidden = neighborhood(&ranked, 2, &config);
        assert_eq!(hidden.message, "Rank 2 of 2");
    }
}
