use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{RankingError, Result};
use crate::positions::RankedCoachRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// `const finalData = [...];`, ready to be dropped into a web page
    Js,
    Json,
}

// Prints the first `top` coaches of every season.
pub fn output_report(rankings: &[RankedCoachRecord], top: usize) {
    let mut season = None;

    for r in rankings {
        if season != Some(r.season) {
            season = Some(r.season);
            println!("\n== {} ==", r.season);
        }
        if r.position > top {
            continue;
        }

        println!(
            "|{0:4}. | {1:24} | {2:16} | {3:7.2} | {4:3}-{5:3}-{6:3} | {7:6.2}% | {8:3}",
            r.position,
            r.name,
            r.country,
            r.rating,
            r.wins,
            r.draws,
            r.losses,
            r.win_ratio,
            r.tournaments_played,
        );
    }
}

pub fn render(rankings: &[RankedCoachRecord], format: OutputFormat) -> Result<String> {
    let json = serde_json::to_string_pretty(rankings).map_err(RankingError::Serialize)?;

    Ok(match format {
        OutputFormat::Json => json,
        OutputFormat::Js => format!("const finalData = {json};\n"),
    })
}

pub fn publish(rankings: &[RankedCoachRecord], path: &Path, format: OutputFormat) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| RankingError::io(parent, e))?;
    }

    fs::write(path, render(rankings, format)?).map_err(|e| RankingError::io(path, e))?;
    info!(rows = rankings.len(), "wrote {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> RankedCoachRecord {
        RankedCoachRecord {
            season: 2022,
            coach_id: "42".into(),
            name: "Ana".into(),
            country: "Spain".into(),
            rating: 151.5,
            wins: 1,
            draws: 0,
            losses: 0,
            total_games: 1,
            tournaments_played: 1,
            win_ratio: 100.0,
            position: 1,
            country_position: 1,
        }
    }

    #[test]
    fn js_module_wraps_json() {
        let js = render(&[row()], OutputFormat::Js).unwrap();
        assert!(js.starts_with("const finalData = ["));
        assert!(js.ends_with("];\n"));

        let json = render(&[row()], OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["nafNumber"], "42");
    }

    #[test]
    fn publish_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("finalData.json");

        publish(&[row()], &path, OutputFormat::Json).unwrap();

        let written: Vec<serde_json::Value> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0]["positionCountry"], 1);
    }
}
