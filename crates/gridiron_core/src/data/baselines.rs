//! 2024 league baselines for team constants that have no fitted model.

/// Offensive line yards before contact per carry.
const LINE_YARDS_BEFORE_CONTACT: [(&str, f64); 32] = [
    ("ATL", 2.2), ("BUF", 2.5), ("CAR", 2.7), ("CHI", 2.5), ("CIN", 2.7), ("CLE", 2.5),
    ("IND", 2.9), ("ARI", 3.0), ("DAL", 2.1), ("DEN", 2.4), ("DET", 2.6), ("GB", 2.4),
    ("HOU", 2.4), ("JAX", 2.0), ("KC", 2.4), ("MIA", 2.3), ("MIN", 2.3), ("NO", 2.5),
    ("NE", 2.4), ("NYG", 2.5), ("NYJ", 2.1), ("TEN", 2.1), ("PIT", 2.2), ("PHI", 3.2),
    ("LV", 1.9), ("LAR", 2.2), ("BAL", 3.3), ("LAC", 2.0), ("SEA", 2.4), ("SF", 2.7),
    ("TB", 2.8), ("WAS", 2.9),
];

/// Projected punt return yards and returns per team.
const PUNT_RETURNS: [(&str, f64, f64); 32] = [
    ("ATL", 258.0, 27.0), ("BUF", 317.0, 28.0), ("CAR", 231.0, 27.0), ("CHI", 257.0, 29.0),
    ("CIN", 259.0, 27.0), ("CLE", 252.0, 27.0), ("IND", 283.0, 28.0), ("ARI", 272.0, 28.0),
    ("DAL", 276.0, 27.0), ("DEN", 443.0, 29.0), ("DET", 410.0, 31.0), ("GB", 258.0, 29.0),
    ("HOU", 290.0, 30.0), ("JAX", 259.0, 27.0), ("KC", 266.0, 28.0), ("MIA", 214.0, 28.0),
    ("MIN", 284.0, 30.0), ("NO", 258.0, 27.0), ("NE", 437.0, 29.0), ("NYG", 228.0, 29.0),
    ("NYJ", 230.0, 29.0), ("TEN", 252.0, 27.0), ("PIT", 317.0, 30.0), ("PHI", 247.0, 28.0),
    ("LV", 258.0, 27.0), ("LAR", 264.0, 28.0), ("BAL", 288.0, 30.0), ("LAC", 336.0, 27.0),
    ("SEA", 206.0, 30.0), ("SF", 237.0, 27.0), ("TB", 235.0, 28.0), ("WAS", 243.0, 25.0),
];

/// Yards before contact for `team`, or the league mean for unknown teams.
pub fn line_yards_before_contact(team: &str) -> f64 {
    LINE_YARDS_BEFORE_CONTACT
        .iter()
        .find(|(abbr, _)| *abbr == team)
        .map(|(_, ybc)| *ybc)
        .unwrap_or_else(|| {
            LINE_YARDS_BEFORE_CONTACT.iter().map(|(_, ybc)| ybc).sum::<f64>()
                / LINE_YARDS_BEFORE_CONTACT.len() as f64
        })
}

/// Average yards per punt return for `team`, or the league mean for unknown teams.
pub fn punt_return_yards(team: &str) -> f64 {
    match PUNT_RETURNS.iter().find(|(abbr, _, _)| *abbr == team) {
        Some((_, yards, returns)) => yards / returns,
        None => {
            let (yards, returns) = PUNT_RETURNS
                .iter()
                .fold((0.0, 0.0), |(y, r), (_, yards, returns)| (y + yards, r + returns));
            yards / returns
        }
    }
}
