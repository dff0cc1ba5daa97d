use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{RankingError, Result};

// Variant codes accepted by each stage. Seeding and K-factors leave out 15 while counting and
// replay accept it; kept separate rather than unified.
pub const APPEARANCE_VARIANTS: [u32; 3] = [1, 13, 15];
pub const SEED_VARIANTS: [u32; 2] = [1, 13];
pub const K_FACTOR_VARIANTS: [u32; 2] = [1, 13];
pub const RATING_VARIANTS: [u32; 3] = [1, 13, 15];

/// Every tunable of the model. Missing keys in a config file fall back to the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RankingContext {
    pub seed_rating: f64,
    pub elo_delta: f64,
    pub k_multiplier: f64,

    pub major_participant_cap: usize,
    pub minor_participant_cap: usize,

    pub appearance_variants: Vec<u32>,
    pub seed_variants: Vec<u32>,
    pub k_factor_variants: Vec<u32>,
    pub rating_variants: Vec<u32>,

    // When false, a rated match without a K-factor is skipped with a warning.
    pub abort_on_missing_k_factor: bool,
}

impl Default for RankingContext {
    fn default() -> Self {
        Self {
            seed_rating: 150.0,
            elo_delta: 150.0,
            k_multiplier: 2.0,

            major_participant_cap: 60,
            minor_participant_cap: 32,

            appearance_variants: APPEARANCE_VARIANTS.to_vec(),
            seed_variants: SEED_VARIANTS.to_vec(),
            k_factor_variants: K_FACTOR_VARIANTS.to_vec(),
            rating_variants: RATING_VARIANTS.to_vec(),

            abort_on_missing_k_factor: false,
        }
    }
}

impl RankingContext {
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|e| RankingError::io(path, e))?;
        let context: RankingContext =
            serde_json::from_str(&data).map_err(|source| RankingError::Json {
                path: path.to_path_buf(),
                source,
            })?;

        context.validate()?;
        Ok(context)
    }

    pub fn validate(&self) -> Result<()> {
        if self.elo_delta.is_nan() || self.elo_delta <= 0.0 {
            return Err(RankingError::Config {
                message: format!("elo_delta must be positive, got {}", self.elo_delta),
            });
        }
        if self.k_multiplier < 0.0 {
            return Err(RankingError::Config {
                message: format!("k_multiplier must not be negative, got {}", self.k_multiplier),
            });
        }
        if self.rating_variants.is_empty() {
            return Err(RankingError::Config {
                message: "rating_variants must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn participant_cap(&self, major: bool) -> usize {
        if major {
            self.major_participant_cap
        } else {
            self.minor_participant_cap
        }
    }

    pub fn k_value(&self, capped_participants: usize) -> f64 {
        self.k_multiplier * (capped_participants as f64).sqrt()
    }

    pub fn counts_appearance(&self, variant: u32) -> bool {
        self.appearance_variants.contains(&variant)
    }

    pub fn seeds(&self, variant: u32) -> bool {
        self.seed_variants.contains(&variant)
    }

    pub fn derives_k_factor(&self, variant: u32) -> bool {
        self.k_factor_variants.contains(&variant)
    }

    pub fn rates(&self, variant: u32) -> bool {
        self.rating_variants.contains(&variant)
    }
}
