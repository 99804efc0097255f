//! Core race result types for paddock.
//!
//! A season is represented as a flat list of [`RaceResultRecord`]s, one per
//! classified finish, in upstream order (race by race, then by position).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Highest finishing position that counts as a podium.
pub const PODIUM_POSITIONS: u32 = 3;

/// A single driver's result in a single race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaceResultRecord {
    /// Championship year.
    pub season: i32,

    /// 1-based race number within the season.
    pub round: u32,

    /// Display name of the event.
    pub race: String,

    /// Date the race was held.
    pub date: NaiveDate,

    /// Finishing order; 1 is the winner.
    pub position: u32,

    /// Driver display name, "given family".
    pub driver: String,

    /// Team display name.
    pub constructor: String,

    /// Championship points awarded for this finish.
    pub points: f64,
}

impl RaceResultRecord {
    /// Whether this finish is in the top three.
    #[must_use]
    pub fn is_podium(&self) -> bool {
        (1..=PODIUM_POSITIONS).contains(&self.position)
    }

    /// Whether this finish is a race win.
    #[must_use]
    pub fn is_win(&self) -> bool {
        self.position == 1
    }
}
