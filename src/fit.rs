use crate::ranking::RatedGame;

const BUCKET_SIZE: usize = 10;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct FitBucket {
    pub played: f64,
    pub scored: f64,
    pub expected: f64,
}

// Groups rated games by the home side's pre-match expectation and compares what was expected
// with what was scored. Every game is seen from both sides so the buckets mirror each other.
pub fn fit_buckets(games: &[RatedGame]) -> [FitBucket; BUCKET_SIZE] {
    let mut buckets = [FitBucket::default(); BUCKET_SIZE];

    for g in games {
        let sides = [
            (g.expected_home, g.home_score),
            (1.0 - g.expected_home, 1.0 - g.home_score),
        ];
        for (expected, scored) in sides {
            let idx = ((expected * BUCKET_SIZE as f64).floor() as usize).min(BUCKET_SIZE - 1);
            buckets[idx].played += 1.0;
            buckets[idx].scored += scored;
            buckets[idx].expected += expected;
        }
    }

    buckets
}

// Average absolute difference between expected and actual score per game. Zero means the
// expectations were perfectly calibrated.
pub fn analyze_fit(games: &[RatedGame], verbose: bool) -> f64 {
    let buckets = fit_buckets(games);

    let mut error = 0.0;
    let mut sides_played = 0.0;
    for (i, b) in buckets.iter().enumerate() {
        error += (b.scored - b.expected).abs();
        sides_played += b.played;

        if verbose && b.played > 0.0 {
            println!(
                "Expected {0:3.1}-{1:3.1} | Played {2:6} | Scored {3:5.3} | Expected {4:5.3}",
                i as f64 / BUCKET_SIZE as f64,
                (i + 1) as f64 / BUCKET_SIZE as f64,
                b.played,
                b.scored / b.played,
                b.expected / b.played,
            );
        }
    }

    if sides_played == 0.0 {
        return 0.0;
    }

    let error = error / sides_played;
    if verbose {
        println!("Mean calibration error: {error:.4}");
    }

    error
}
