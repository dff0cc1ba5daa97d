use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::data_loader::*;
use crate::ranking_context::RankingContext;
use crate::util::win_ratio;

/// season -> coach id -> state. Every season is its own rating universe.
pub type SeasonTable = BTreeMap<Season, HashMap<String, SeasonCoachState>>;

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonCoachState {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub total_games: u32,
    pub rating: f64,
    pub win_ratio: f64,

    // Filled in from the coach directory once the coach has a rated match.
    pub name: Option<String>,
    pub country: Option<String>,
}

impl SeasonCoachState {
    pub fn new(seed_rating: f64) -> Self {
        Self {
            wins: 0,
            draws: 0,
            losses: 0,
            total_games: 0,
            rating: seed_rating,
            win_ratio: 0.0,
            name: None,
            country: None,
        }
    }

    fn record(&mut self, goals: u32, opponent_goals: u32) {
        match goals.cmp(&opponent_goals) {
            Ordering::Greater => self.wins += 1,
            Ordering::Equal => self.draws += 1,
            Ordering::Less => self.losses += 1,
        }
        self.total_games += 1;
    }

    // Replay only moves the rating. Tallies stay as seeded and the ratio is derived from them.
    pub fn apply_rating(&mut self, rating: f64, coach: &CoachDirectoryEntry) {
        self.rating = rating;
        self.win_ratio = win_ratio(self.wins, self.draws, self.total_games);
        self.name = Some(coach.name.clone());
        self.country = Some(coach.country.clone());
    }
}

// Builds the starting tallies for every season from the seeded variants. Ratings all start at
// the seed value, they only move during replay.
pub fn seed_win_ratios(matches: &[MatchRecord], ranking_context: &RankingContext) -> SeasonTable {
    let mut table = SeasonTable::new();

    for m in matches {
        if !ranking_context.seeds(m.variant) {
            continue;
        }

        let season = table.entry(m.season).or_default();

        let sides = [
            (&m.home_coach_id, m.home_goals, m.away_goals),
            (&m.away_coach_id, m.away_goals, m.home_goals),
        ];
        for (coach_id, goals, opponent_goals) in sides {
            // A missing id only drops that side of the match
            let Some(coach_id) = coach_id else {
                continue;
            };

            season
                .entry(coach_id.clone())
                .or_insert_with(|| SeasonCoachState::new(ranking_context.seed_rating))
                .record(goals, opponent_goals);
        }
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(year: i32, variant: u32, home: &str, away: &str, hg: u32, ag: u32) -> MatchRecord {
        let date = NaiveDate::from_ymd_opt(year, 3, 3).unwrap();
        MatchRecord::new("t", date, variant, home, away, hg, ag)
    }

    #[test]
    fn tallies_wins_draws_losses() {
        let matches = vec![
            game(2019, 1, "a", "b", 2, 1),
            game(2019, 13, "b", "a", 0, 0),
            game(2019, 1, "c", "a", 3, 0),
            game(2019, 15, "a", "b", 3, 0),
            game(2020, 1, "a", "b", 0, 1),
        ];

        let table = seed_win_ratios(&matches, &RankingContext::default());

        let a = &table[&2019]["a"];
        assert_eq!((a.wins, a.draws, a.losses, a.total_games), (1, 1, 1, 3));
        assert_eq!(a.rating, 150.0);
        let b = &table[&2019]["b"];
        assert_eq!((b.wins, b.draws, b.losses, b.total_games), (0, 1, 1, 2));

        let a_next = &table[&2020]["a"];
        assert_eq!((a_next.wins, a_next.losses, a_next.total_games), (0, 1, 1));
        assert_eq!(table[&2020]["b"].wins, 1);
    }

    #[test]
    fn missing_side_is_skipped_alone() {
        let ctx = RankingContext::default();
        let table = seed_win_ratios(&[game(2019, 1, "a", "", 1, 0)], &ctx);
        assert_eq!(table[&2019].len(), 1);
        assert_eq!(table[&2019]["a"].wins, 1);
    }
}
