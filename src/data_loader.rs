use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_option_number_from_string;
use tracing::{debug, info, warn};

use crate::error::{RankingError, Result};
use crate::util::*;

pub type Season = i32;

pub const GAMES_FILE: &str = "naf_game";
pub const TOURNAMENTS_FILE: &str = "naf_tournament";
pub const PARTICIPATION_FILE: &str = "naf_tournamentcoach";
pub const COACHES_FILE: &str = "CoachExport";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            InputFormat::Csv => "csv",
            InputFormat::Json => "json",
        }
    }
}

/// The four record sets the engine runs on. Match order is the replay order and must never be
/// changed after loading; the other three are order-insensitive.
#[derive(Debug, Default, Clone)]
pub struct RecordSet {
    pub matches: Vec<MatchRecord>,
    pub tournaments: Vec<TournamentRecord>,
    pub participations: Vec<ParticipationRecord>,
    pub coaches: Vec<CoachDirectoryEntry>,
}

// Loads the four exports found in data_dir. Rows that can't be parsed are logged and dropped,
// a missing or unreadable file fails the whole load.
pub fn load_data(data_dir: &Path, format: InputFormat) -> Result<RecordSet> {
    let file = |name: &str| data_dir.join(format!("{name}.{}", format.extension()));

    let games: Vec<RawGame> = read_rows(&file(GAMES_FILE), format)?;
    let tournaments: Vec<RawTournament> = read_rows(&file(TOURNAMENTS_FILE), format)?;
    let participations: Vec<RawTournamentCoach> =
        read_rows(&file(PARTICIPATION_FILE), format)?;
    let coaches: Vec<RawCoach> = read_rows(&file(COACHES_FILE), format)?;

    let records = RecordSet {
        matches: games
            .into_iter()
            .filter_map(MatchRecord::from_raw)
            .collect(),
        tournaments: tournaments
            .into_iter()
            .filter_map(TournamentRecord::from_raw)
            .collect(),
        participations: participations
            .into_iter()
            .filter_map(ParticipationRecord::from_raw)
            .collect(),
        coaches: coaches
            .into_iter()
            .filter_map(CoachDirectoryEntry::from_raw)
            .collect(),
    };

    info!(
        matches = records.matches.len(),
        tournaments = records.tournaments.len(),
        participations = records.participations.len(),
        coaches = records.coaches.len(),
        "loaded records from {}",
        data_dir.display()
    );

    Ok(records)
}

fn read_rows<T: DeserializeOwned>(path: &Path, format: InputFormat) -> Result<Vec<T>> {
    match format {
        InputFormat::Csv => read_csv_rows(path),
        InputFormat::Json => read_json_rows(path),
    }
}

// Exports are semicolon separated with a header row. Columns we don't know about are ignored.
// The exports aren't always valid UTF-8 (Latin-1 names show up), so fields are decoded lossily
// before deserializing instead of losing the whole row.
fn read_csv_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| RankingError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let csv_error = |source: csv::Error| RankingError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let headers = decode_lossy(reader.byte_headers().map_err(csv_error)?);

    let mut rows = Vec::new();
    for (idx, result) in reader.byte_records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(source) if source.is_io_error() => return Err(csv_error(source)),
            Err(e) => {
                warn!(file = %path.display(), row = idx + 1, "skipping unreadable row: {e}");
                continue;
            }
        };

        match decode_lossy(&record).deserialize::<T>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => warn!(file = %path.display(), row = idx + 1, "skipping malformed row: {e}"),
        }
    }

    debug!(file = %path.display(), rows = rows.len(), "read csv");
    Ok(rows)
}

fn decode_lossy(record: &csv::ByteRecord) -> csv::StringRecord {
    let mut decoded: csv::StringRecord = record.iter().map(String::from_utf8_lossy).collect();
    decoded.trim();
    decoded
}

// JSON exports are an array of flat objects, usually with every value as a string.
fn read_json_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = File::open(path).map_err(|e| RankingError::io(path, e))?;
    let values: Vec<serde_json::Value> =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| RankingError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = Vec::with_capacity(values.len());
    for (idx, value) in values.into_iter().enumerate() {
        match serde_json::from_value::<T>(value) {
            Ok(row) => rows.push(row),
            Err(e) => warn!(file = %path.display(), row = idx + 1, "skipping malformed row: {e}"),
        }
    }

    debug!(file = %path.display(), rows = rows.len(), "read json");
    Ok(rows)
}

#[derive(Deserialize, Debug)]
struct RawGame {
    #[serde(rename(deserialize = "tournamentid"), default)]
    tournament_id: String,
    #[serde(default)]
    date: String,
    #[serde(
        rename(deserialize = "naf_variantsid"),
        default,
        deserialize_with = "deserialize_option_number_from_string"
    )]
    variant: Option<u32>,
    #[serde(rename(deserialize = "homecoachid"), default)]
    home_coach_id: String,
    #[serde(rename(deserialize = "awaycoachid"), default)]
    away_coach_id: String,
    #[serde(
        rename(deserialize = "goalshome"),
        default,
        deserialize_with = "deserialize_option_number_from_string"
    )]
    home_goals: Option<u32>,
    #[serde(
        rename(deserialize = "goalsaway"),
        default,
        deserialize_with = "deserialize_option_number_from_string"
    )]
    away_goals: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct RawTournament {
    #[serde(rename(deserialize = "tournamentid"), default)]
    tournament_id: String,
    #[serde(rename(deserialize = "tournamentmajor"), default)]
    major: String,
}

#[derive(Deserialize, Debug)]
struct RawTournamentCoach {
    #[serde(rename(deserialize = "naftournament"), default)]
    tournament_id: String,
    #[serde(rename(deserialize = "nafcoach"), default)]
    coach_id: String,
}

#[derive(Deserialize, Debug)]
struct RawCoach {
    #[serde(rename(deserialize = "NAF Nr"), default)]
    coach_id: String,
    #[serde(rename(deserialize = "NAF name"), default)]
    name: String,
    #[serde(rename(deserialize = "Country"), default)]
    country: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    HomeWin,
    Draw,
    AwayWin,
}

impl MatchResult {
    pub fn home_score(self) -> f64 {
        match self {
            MatchResult::HomeWin => 1.0,
            MatchResult::Draw => 0.5,
            MatchResult::AwayWin => 0.0,
        }
    }

    pub fn away_score(self) -> f64 {
        1.0 - self.home_score()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub tournament_id: String,
    pub date: NaiveDate,
    pub season: Season,
    pub variant: u32,
    pub home_coach_id: Option<String>,
    pub away_coach_id: Option<String>,
    pub home_goals: u32,
    pub away_goals: u32,
}

impl MatchRecord {
    pub fn new(
        tournament_id: &str,
        date: NaiveDate,
        variant: u32,
        home: &str,
        away: &str,
        home_goals: u32,
        away_goals: u32,
    ) -> Self {
        Self {
            tournament_id: tournament_id.to_string(),
            date,
            season: date.year(),
            variant,
            home_coach_id: non_empty(home),
            away_coach_id: non_empty(away),
            home_goals,
            away_goals,
        }
    }

    fn from_raw(raw: RawGame) -> Option<Self> {
        let Some(date) = parse_match_date(&raw.date) else {
            warn!(
                tournament = %raw.tournament_id,
                date = %raw.date,
                "skipping match without a usable date"
            );
            return None;
        };

        Some(Self::new(
            raw.tournament_id.trim(),
            date,
            raw.variant.unwrap_or_default(),
            &raw.home_coach_id,
            &raw.away_coach_id,
            raw.home_goals.unwrap_or_default(),
            raw.away_goals.unwrap_or_default(),
        ))
    }

    pub fn result(&self) -> MatchResult {
        match self.home_goals.cmp(&self.away_goals) {
            std::cmp::Ordering::Greater => MatchResult::HomeWin,
            std::cmp::Ordering::Equal => MatchResult::Draw,
            std::cmp::Ordering::Less => MatchResult::AwayWin,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TournamentRecord {
    pub tournament_id: String,
    pub major: bool,
}

impl TournamentRecord {
    fn from_raw(raw: RawTournament) -> Option<Self> {
        let tournament_id = non_empty(&raw.tournament_id)?;
        Some(Self {
            tournament_id,
            major: raw.major.trim().eq_ignore_ascii_case("yes"),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticipationRecord {
    pub tournament_id: String,
    pub coach_id: String,
}

impl ParticipationRecord {
    fn from_raw(raw: RawTournamentCoach) -> Option<Self> {
        Some(Self {
            tournament_id: non_empty(&raw.tournament_id)?,
            coach_id: non_empty(&raw.coach_id)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CoachDirectoryEntry {
    pub coach_id: String,
    pub name: String,
    pub country: String,
}

impl CoachDirectoryEntry {
    pub fn new(coach_id: &str, name: &str, country: Option<&str>) -> Self {
        let name = non_empty(name).unwrap_or_else(|| UNKNOWN_NAME.to_string());
        Self {
            coach_id: coach_id.trim().to_string(),
            name,
            country: normalize_country(country),
        }
    }

    fn from_raw(raw: RawCoach) -> Option<Self> {
        if raw.coach_id.trim().is_empty() {
            warn!(name = %raw.name, "skipping coach without an id");
            return None;
        }
        Some(Self::new(&raw.coach_id, &raw.name, Some(&raw.country)))
    }
}

/// Coach lookup by external id. Later entries replace earlier ones with the same id.
#[derive(Debug, Default, Clone)]
pub struct CoachDirectory {
    coaches: HashMap<String, CoachDirectoryEntry>,
}

impl CoachDirectory {
    pub fn from_entries(entries: &[CoachDirectoryEntry]) -> Self {
        let coaches = entries
            .iter()
            .map(|e| (e.coach_id.clone(), e.clone()))
            .collect();
        Self { coaches }
    }

    pub fn get(&self, coach_id: &str) -> Option<&CoachDirectoryEntry> {
        self.coaches.get(coach_id)
    }

    pub fn len(&self) -> usize {
        self.coaches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coaches.is_empty()
    }
}

// Accepts "2019-05-12" as well as anything carrying a time after the date.
pub fn parse_match_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    let day = date.get(..10).unwrap_or(date);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
