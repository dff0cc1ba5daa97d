pub const UNDEFINED_COUNTRY: &str = "Undefined";
pub const UNKNOWN_NAME: &str = "Unknown";

pub fn round_to(val: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (val * factor).round() / factor
}

// Draws count as half a win. A coach without games has a ratio of zero.
pub fn win_ratio(wins: u32, draws: u32, total_games: u32) -> f64 {
    if total_games == 0 {
        return 0.0;
    }

    let ratio = (wins as f64 + draws as f64 / 2.0) / total_games as f64 * 100.0;
    round_to(ratio, 2)
}

// Lower-cases everything, then capitalizes the first character of every word. Anything that
// isn't alphanumeric separates words, so "guinea-bissau" becomes "Guinea-Bissau".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

pub fn normalize_country(country: Option<&str>) -> String {
    let trimmed = country.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return UNDEFINED_COUNTRY.to_string();
    }
    if trimmed.eq_ignore_ascii_case("United States of America") {
        return "USA".to_string();
    }

    title_case(trimmed)
}
