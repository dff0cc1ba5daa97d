use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::appearances::*;
use crate::data_loader::*;
use crate::error::{RankingError, Result};
use crate::k_factor::*;
use crate::positions::*;
use crate::ranking_context::RankingContext;
use crate::win_ratio::*;

#[derive(Debug, Clone)]
pub struct RankingOutcome {
    pub rankings: Vec<RankedCoachRecord>,
    pub report: ReplayReport,
    pub games: Vec<RatedGame>,
}

// Runs every stage in order. Counting, seeding and K-factors only read the records, replay
// takes over the seeded table and hands it on to position assignment.
pub fn gen_rankings(
    records: &RecordSet,
    ranking_context: &RankingContext,
) -> Result<RankingOutcome> {
    let started = Instant::now();

    let appearances = timed("tournament count", || {
        count_appearances(&records.participations, &records.matches, ranking_context)
    });
    let seeds = timed("win ratio", || {
        seed_win_ratios(&records.matches, ranking_context)
    });
    let k_factors = timed("k value", || {
        calculate_k_factors(
            &records.matches,
            &records.participations,
            &records.tournaments,
            ranking_context,
        )
    });

    let directory = CoachDirectory::from_entries(&records.coaches);
    let replay = timed("rating", || {
        replay_matches(&records.matches, seeds, &k_factors, &directory, ranking_context)
    })?;
    let rankings = timed("position", || assign_positions(&appearances, replay.seasons));

    info!(
        rows = rankings.len(),
        rated = replay.report.rated,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rankings complete"
    );

    Ok(RankingOutcome {
        rankings,
        report: replay.report,
        games: replay.games,
    })
}

fn timed<T>(stage: &str, f: impl FnOnce() -> T) -> T {
    let started = Instant::now();
    let out = f();
    info!(stage, elapsed_ms = started.elapsed().as_millis() as u64, "stage finished");
    out
}

/// What the replay did with the matches it was given.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplayReport {
    pub rated: usize,
    pub skipped_unknown_coach: usize,
    pub skipped_missing_k_factor: usize,
    pub synthesized_seasons: Vec<Season>,
}

/// Pre-match expectation and actual result of the home side, kept for fit analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatedGame {
    pub expected_home: f64,
    pub home_score: f64,
}

#[derive(Debug, Clone)]
pub struct Replay {
    pub seasons: SeasonTable,
    pub report: ReplayReport,
    pub games: Vec<RatedGame>,
}

// Logistic expectation of `rating` against `opponent_rating`. The scale is elo_delta (150), not
// the usual 400.
pub fn expected_score(rating: f64, opponent_rating: f64, ranking_context: &RankingContext) -> f64 {
    1.0 / (1.0 + f64::powf(10.0, (opponent_rating - rating) / ranking_context.elo_delta))
}

// Replays the rated matches in the order given. Updates are order sensitive, so the matches must
// never be regrouped or sorted before they get here.
pub fn replay_matches(
    matches: &[MatchRecord],
    mut seasons: SeasonTable,
    k_factors: &KFactorTable,
    directory: &CoachDirectory,
    ranking_context: &RankingContext,
) -> Result<Replay> {
    let mut report = ReplayReport::default();
    let mut games = Vec::new();

    for m in matches {
        if !ranking_context.rates(m.variant) {
            continue;
        }

        let season = seasons.entry(m.season).or_insert_with(|| {
            warn!(
                season = m.season,
                tournament = %m.tournament_id,
                "season has no seeded coaches, starting it empty"
            );
            report.synthesized_seasons.push(m.season);
            HashMap::new()
        });

        let home = m.home_coach_id.as_deref().and_then(|id| directory.get(id));
        let away = m.away_coach_id.as_deref().and_then(|id| directory.get(id));
        let (Some(home), Some(away)) = (home, away) else {
            debug!(
                home = ?m.home_coach_id,
                away = ?m.away_coach_id,
                "skipping match with a coach missing from the directory"
            );
            report.skipped_unknown_coach += 1;
            continue;
        };

        let k_factor = k_factors
            .get(&m.season)
            .and_then(|t| t.get(&m.tournament_id));
        let Some(k_factor) = k_factor else {
            if ranking_context.abort_on_missing_k_factor {
                return Err(RankingError::MissingKFactor {
                    season: m.season,
                    tournament_id: m.tournament_id.clone(),
                });
            }
            warn!(
                season = m.season,
                tournament = %m.tournament_id,
                variant = m.variant,
                "no K-factor for tournament, match not rated"
            );
            report.skipped_missing_k_factor += 1;
            continue;
        };

        let home_rating = coach_state(season, &home.coach_id, ranking_context).rating;
        let away_rating = coach_state(season, &away.coach_id, ranking_context).rating;

        let expected_home = expected_score(home_rating, away_rating, ranking_context);
        let expected_away = expected_score(away_rating, home_rating, ranking_context);
        let result = m.result();

        let new_home = home_rating + k_factor.k * (result.home_score() - expected_home);
        let new_away = away_rating + k_factor.k * (result.away_score() - expected_away);

        coach_state(season, &home.coach_id, ranking_context).apply_rating(new_home, home);
        coach_state(season, &away.coach_id, ranking_context).apply_rating(new_away, away);

        report.rated += 1;
        games.push(RatedGame {
            expected_home,
            home_score: result.home_score(),
        });
    }

    if report.skipped_unknown_coach > 0 {
        info!(
            skipped = report.skipped_unknown_coach,
            "matches skipped for coaches missing from the directory"
        );
    }

    Ok(Replay { seasons, report, games })
}

// Coaches first seen during replay (a variant that isn't seeded) start from the seed rating with
// empty tallies.
fn coach_state<'a>(
    season: &'a mut HashMap<String, SeasonCoachState>,
    coach_id: &str,
    ranking_context: &RankingContext,
) -> &'a mut SeasonCoachState {
    season
        .entry(coach_id.to_string())
        .or_insert_with(|| SeasonCoachState::new(ranking_context.seed_rating))
}
