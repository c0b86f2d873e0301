use std::fmt;
use std::str::FromStr;

use foundation::time::{Month, MonthSet};
use serde::{Deserialize, Serialize};

/// Three-month filter groups. The fire year runs November to October, so
/// Winter starts in November.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    /// Months in fire-year order.
    pub fn months(self) -> [Month; 3] {
        use Month::*;
        match self {
            Season::Winter => [November, December, January],
            Season::Spring => [February, March, April],
            Season::Summer => [May, June, July],
            Season::Fall => [August, September, October],
        }
    }

    pub fn month_set(self) -> MonthSet {
        self.months().into_iter().collect()
    }

    pub fn of(month: Month) -> Season {
        Season::ALL
            .into_iter()
            .find(|s| s.months().contains(&month))
            .unwrap_or(Season::Winter)
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSeason(pub String);

impl fmt::Display for UnknownSeason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown season '{}' (expected winter, spring, summer or fall)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSeason {}

impl FromStr for Season {
    type Err = UnknownSeason;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            _ => Err(UnknownSeason(s.to_string())),
        }
    }
}

/// Selected seasons. Empty means nothing is shown; there is no implicit
/// "all seasons" state.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SeasonSet(u8);

impl SeasonSet {
    pub const fn empty() -> Self {
        SeasonSet(0)
    }

    pub fn all() -> Self {
        Season::ALL.into_iter().collect()
    }

    pub fn contains(&self, season: Season) -> bool {
        self.0 & season.bit() != 0
    }

    pub fn insert(&mut self, season: Season) {
        self.0 |= season.bit();
    }

    pub fn remove(&mut self, season: Season) {
        self.0 &= !season.bit();
    }

    /// Sets membership explicitly, as a checkbox `change` event does.
    pub fn set(&mut self, season: Season, on: bool) {
        if on {
            self.insert(season);
        } else {
            self.remove(season);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Season> + '_ {
        Season::ALL.into_iter().filter(|s| self.contains(*s))
    }

    /// Union of the months of every selected season.
    pub fn months(&self) -> MonthSet {
        self.iter()
            .fold(MonthSet::empty(), |acc, s| acc.union(s.month_set()))
    }
}

impl FromIterator<Season> for SeasonSet {
    fn from_iter<I: IntoIterator<Item = Season>>(iter: I) -> Self {
        let mut set = SeasonSet::empty();
        for s in iter {
            set.insert(s);
        }
        set
    }
}
