use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::appearances::AppearanceCounts;
use crate::data_loader::Season;
use crate::util::*;
use crate::win_ratio::SeasonTable;

/// One ranked coach in one season. Field names on the wire follow the published data set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedCoachRecord {
    #[serde(rename = "year")]
    pub season: Season,
    #[serde(rename = "nafNumber")]
    pub coach_id: String,
    pub name: String,
    pub country: String,
    pub rating: f64,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub total_games: u32,
    pub tournaments_played: u32,
    pub win_ratio: f64,
    pub position: usize,
    #[serde(rename = "positionCountry")]
    pub country_position: usize,
}

// Rating first, then win ratio, then fewer games ahead of more.
fn global_order(a: &RankedCoachRecord, b: &RankedCoachRecord) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| b.win_ratio.total_cmp(&a.win_ratio))
        .then_with(|| a.total_games.cmp(&b.total_games))
}

// Seasons come out in ascending order, each one in global position order.
pub fn assign_positions(
    appearances: &AppearanceCounts,
    seasons: SeasonTable,
) -> Vec<RankedCoachRecord> {
    let mut out = Vec::new();

    for (season, coaches) in seasons {
        let counts = appearances.get(&season);

        let mut ranked: Vec<RankedCoachRecord> = coaches
            .into_iter()
            .map(|(coach_id, state)| RankedCoachRecord {
                season,
                tournaments_played: counts
                    .and_then(|c| c.get(&coach_id))
                    .copied()
                    .unwrap_or_default(),
                coach_id,
                name: state.name.unwrap_or_else(|| UNKNOWN_NAME.to_string()),
                country: state.country.unwrap_or_else(|| UNDEFINED_COUNTRY.to_string()),
                rating: state.rating,
                wins: state.wins,
                draws: state.draws,
                losses: state.losses,
                total_games: state.total_games,
                win_ratio: state.win_ratio,
                position: 0,
                country_position: 0,
            })
            .collect();

        // Full ties keep coach id order
        ranked.sort_by(|a, b| a.coach_id.cmp(&b.coach_id));
        ranked.sort_by(global_order);
        for (idx, r) in ranked.iter_mut().enumerate() {
            r.position = idx + 1;
        }

        let mut countries: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, r) in ranked.iter().enumerate() {
            countries.entry(r.country.clone()).or_default().push(idx);
        }

        // Country standings only look at the rating. Equal ratings keep their global order.
        for members in countries.values_mut() {
            members.sort_by(|&a, &b| ranked[b].rating.total_cmp(&ranked[a].rating));
            for (idx, &member) in members.iter().enumerate() {
                ranked[member].country_position = idx + 1;
            }
        }

        out.extend(ranked);
    }

    out
}
