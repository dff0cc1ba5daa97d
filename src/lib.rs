//! Per-season Elo ratings and standings for tournament league coaches.
//!
//! The pipeline runs in five stages over records loaded by [`data_loader`]:
//! tournament counting, win ratio seeding, K-factor derivation, match replay and
//! position assignment. [`ranking::gen_rankings`] runs all of them in order.

pub mod appearances;
pub mod data_loader;
pub mod error;
pub mod fit;
pub mod k_factor;
pub mod positions;
pub mod ranking;
pub mod ranking_context;
pub mod report;
pub mod util;
pub mod win_ratio;

pub use data_loader::{load_data, InputFormat, RecordSet};
pub use error::{RankingError, Result};
pub use positions::RankedCoachRecord;
pub use ranking::{gen_rankings, RankingOutcome};
pub use ranking_context::RankingContext;
