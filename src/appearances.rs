use std::collections::{BTreeMap, HashMap};

use crate::data_loader::*;
use crate::ranking_context::RankingContext;

/// season -> coach id -> tournaments entered that season
pub type AppearanceCounts = BTreeMap<Season, HashMap<String, u32>>;

// A participation row counts once for the season of the first match played at its tournament,
// provided that match is of a counted variant. Tournaments are assumed to hold a single variant.
pub fn count_appearances(
    participations: &[ParticipationRecord],
    matches: &[MatchRecord],
    ranking_context: &RankingContext,
) -> AppearanceCounts {
    let mut first_match: HashMap<&str, &MatchRecord> = HashMap::new();
    for m in matches {
        first_match.entry(m.tournament_id.as_str()).or_insert(m);
    }

    let mut counts = AppearanceCounts::new();
    for p in participations {
        let Some(m) = first_match.get(p.tournament_id.as_str()) else {
            continue;
        };
        if !ranking_context.counts_appearance(m.variant) {
            continue;
        }

        *counts
            .entry(m.season)
            .or_default()
            .entry(p.coach_id.clone())
            .or_default() += 1;
    }

    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn game(tournament: &str, year: i32, variant: u32) -> MatchRecord {
        let date = NaiveDate::from_ymd_opt(year, 6, 1).unwrap();
        MatchRecord::new(tournament, date, variant, "a", "b", 1, 0)
    }

    fn entry(tournament: &str, coach: &str) -> ParticipationRecord {
        ParticipationRecord {
            tournament_id: tournament.into(),
            coach_id: coach.into(),
        }
    }

    #[test]
    fn counts_per_season_and_coach() {
        let matches = vec![
            game("t1", 2019, 1),
            game("t2", 2019, 15),
            game("t3", 2020, 13),
            game("t4", 2020, 2),
        ];
        let participations = vec![
            entry("t1", "a"),
            entry("t2", "a"),
            entry("t3", "a"),
            entry("t1", "b"),
            entry("t4", "b"),
            entry("t9", "b"),
        ];

        let counts = count_appearances(&participations, &matches, &RankingContext::default());

        assert_eq!(counts[&2019]["a"], 2);
        assert_eq!(counts[&2019]["b"], 1);
        assert_eq!(counts[&2020]["a"], 1);
        assert!(!counts[&2020].contains_key("b"));
    }

    #[test]
    fn first_match_of_tournament_decides() {
        let matches = vec![game("t1", 2019, 2), game("t1", 2020, 1)];
        let counts = count_appearances(&[entry("t1", "a")], &matches, &RankingContext::default());
        assert!(counts.is_empty());

        let matches = vec![game("t1", 2019, 1), game("t1", 2020, 1)];
        let counts = count_appearances(&[entry("t1", "a")], &matches, &RankingContext::default());
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[&2019]["a"], 1);
    }
}
