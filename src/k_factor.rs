use std::collections::{BTreeMap, HashMap};

use crate::data_loader::*;
use crate::ranking_context::RankingContext;

/// season -> tournament id -> K-factor
pub type KFactorTable = BTreeMap<Season, HashMap<String, TournamentKFactor>>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TournamentKFactor {
    pub participants: usize,
    pub major: bool,
    pub capped_participants: usize,
    pub k: f64,
}

impl TournamentKFactor {
    pub fn new(participants: usize, major: bool, ranking_context: &RankingContext) -> Self {
        let capped_participants = participants.min(ranking_context.participant_cap(major));

        Self {
            participants,
            major,
            capped_participants,
            k: ranking_context.k_value(capped_participants),
        }
    }
}

// Participation rows aren't tied to a season, so every row of a tournament counts towards the
// K-factor of each season that tournament has matches in.
pub fn calculate_k_factors(
    matches: &[MatchRecord],
    participations: &[ParticipationRecord],
    tournaments: &[TournamentRecord],
    ranking_context: &RankingContext,
) -> KFactorTable {
    let mut participants: HashMap<&str, usize> = HashMap::new();
    for p in participations {
        *participants.entry(p.tournament_id.as_str()).or_default() += 1;
    }

    let major: HashMap<&str, bool> = tournaments
        .iter()
        .map(|t| (t.tournament_id.as_str(), t.major))
        .collect();

    let mut table = KFactorTable::new();
    for m in matches {
        if !ranking_context.derives_k_factor(m.variant) || m.tournament_id.is_empty() {
            continue;
        }

        let season = table.entry(m.season).or_default();
        if season.contains_key(&m.tournament_id) {
            continue;
        }

        let tournament_id = m.tournament_id.as_str();
        let k_factor = TournamentKFactor::new(
            participants.get(tournament_id).copied().unwrap_or_default(),
            major.get(tournament_id).copied().unwrap_or_default(),
            ranking_context,
        );
        season.insert(m.tournament_id.clone(), k_factor);
    }

    table
}
