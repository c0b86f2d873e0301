use chrono::{Datelike, NaiveDate};

/// Session clock reading in seconds. Callers supply it; nothing here reads a
/// wall clock.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub fn after(self, delay_s: f64) -> Self {
        Time(self.0 + delay_s)
    }
}

/// Calendar month. `index()` is 0-based (January = 0).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    pub fn from_index(index: usize) -> Option<Month> {
        Month::ALL.get(index).copied()
    }

    pub fn of(date: NaiveDate) -> Month {
        // month0() is always within 0..12.
        Month::ALL[date.month0() as usize]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// 1-based month number as printed on chart axes.
    pub fn number(self) -> u32 {
        self as u32 + 1
    }

    pub fn name(self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }
}

/// A set of calendar months packed into the low 12 bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct MonthSet(u16);

impl MonthSet {
    pub const fn empty() -> Self {
        MonthSet(0)
    }

    pub fn all() -> Self {
        MonthSet(0x0fff)
    }

    pub fn insert(&mut self, month: Month) {
        self.0 |= 1 << month.index();
    }

    pub fn contains(&self, month: Month) -> bool {
        self.0 & (1 << month.index()) != 0
    }

    pub fn union(self, other: MonthSet) -> Self {
        MonthSet(self.0 | other.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = Month> + '_ {
        Month::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Month> for MonthSet {
    fn from_iter<I: IntoIterator<Item = Month>>(iter: I) -> Self {
        let mut set = MonthSet::empty();
        for m in iter {
            set.insert(m);
        }
        set
    }
}
