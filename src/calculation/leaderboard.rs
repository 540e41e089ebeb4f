//! Driver ranking by settled earnings.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Shift;

/// One line of the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: usize,
    /// Driver name.
    pub driver: String,
    /// Earnings over completed, approved shifts.
    pub earnings: Decimal,
    /// Number of completed, approved shifts.
    pub completed_shifts: usize,
}

/// Ranks drivers with at least one completed, approved shift.
///
/// Ordered by earnings descending. Ties go to the driver listed earlier in
/// `roster`; drivers missing from the roster come after roster drivers and
/// are ordered by name.
///
/// # Examples
///
/// ```
/// use fleet_ledger::calculation::leaderboard;
///
/// assert!(leaderboard(&[], &["Sunny".to_string()]).is_empty());
/// ```
pub fn leaderboard(shifts: &[Shift], roster: &[String]) -> Vec<LeaderboardEntry> {
    let mut totals: HashMap<&str, (Decimal, usize)> = HashMap::new();
    for shift in shifts.iter().filter(|shift| shift.is_settled()) {
        let entry = totals.entry(shift.driver.as_str()).or_default();
        entry.0 = entry.0.saturating_add(shift.total_earnings);
        entry.1 += 1;
    }

    let roster_position =
        |driver: &str| roster.iter().position(|d| d == driver).unwrap_or(usize::MAX);

    let mut ranked: Vec<(&str, Decimal, usize)> = totals
        .into_iter()
        .map(|(driver, (earnings, count))| (driver, earnings, count))
        .collect();
    ranked.sort_by(|a, b| {
        b.1.cmp(&a.1)
            .then_with(|| roster_position(a.0).cmp(&roster_position(b.0)))
            .then_with(|| a.0.cmp(b.0))
    });

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (driver, earnings, completed_shifts))| LeaderboardEntry {
            rank: index + 1,
            driver: driver.to_string(),
            earnings,
            completed_shifts,
        })
        .collect()
}
