//! Calendar handling for the Nov–Oct fire year.
//!
//! All user-facing date ranges come from [`DatasetSpan`] and
//! [`time_frame_runs`]; season labels use the same [`fire_year_of`] rule.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use foundation::time::{Month, MonthSet};
use scene::FireRecord;

use crate::season::Season;

pub const TIME_FRAME_PREFIX: &str = "Time Frame Currently Displaying: ";

/// Fire year a calendar month belongs to: November and December count
/// towards the following year.
pub fn fire_year_of(year: i32, month: Month) -> i32 {
    if month >= Month::November {
        year + 1
    } else {
        year
    }
}

/// Calendar year of `month` within fire year `fire_year`.
pub fn calendar_year_in(fire_year: i32, month: Month) -> i32 {
    if month >= Month::November {
        fire_year - 1
    } else {
        fire_year
    }
}

/// One month slot on the dataset timeline. Orders chronologically.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    pub month: Month,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Self {
        Self { year, month }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.year(), Month::of(date))
    }

    pub fn next(self) -> Self {
        match Month::from_index(self.month.index() + 1) {
            Some(month) => Self::new(self.year, month),
            None => Self::new(self.year + 1, Month::January),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month.name(), self.year)
    }
}

/// First and last month slots covered by the data.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DatasetSpan {
    pub first: YearMonth,
    pub last: YearMonth,
}

impl DatasetSpan {
    /// Span of the valid acquisition dates, `None` when there are none.
    ///
    /// The data is cut at the end of October, so a trailing November or
    /// December is pulled back to October of that year unless that would
    /// end the span before it starts.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FireRecord>) -> Option<Self> {
        let mut dates = records.into_iter().filter_map(|r| r.acquired.map(|a| a.date));
        let first_date = dates.next()?;
        let (min, max) = dates.fold((first_date, first_date), |(lo, hi), d| (lo.min(d), hi.max(d)));

        let first = YearMonth::of(min);
        let mut last = YearMonth::of(max);
        if last.month >= Month::November {
            let clamped = YearMonth::new(last.year, Month::October);
            if clamped >= first {
                last = clamped;
            }
        }
        Some(Self { first, last })
    }

    /// The single fire year `Nov year-1 ..= Oct year`, used when the data
    /// carries no usable dates.
    pub fn fire_year(year: i32) -> Self {
        Self {
            first: YearMonth::new(year - 1, Month::November),
            last: YearMonth::new(year, Month::October),
        }
    }

    /// Fire year the season checkbox labels refer to: the one holding the
    /// last month on the timeline.
    pub fn label_fire_year(&self) -> i32 {
        fire_year_of(self.last.year, self.last.month)
    }

    pub fn timeline(&self) -> Vec<YearMonth> {
        let mut out = Vec::new();
        let mut cur = self.first;
        while cur <= self.last {
            out.push(cur);
            cur = cur.next();
        }
        out
    }
}

/// Maximal chronological runs of timeline slots whose month is selected.
pub fn time_frame_runs(timeline: &[YearMonth], months: MonthSet) -> Vec<(YearMonth, YearMonth)> {
    let mut runs = Vec::new();
    let mut open: Option<(YearMonth, YearMonth)> = None;
    for slot in timeline {
        if months.contains(slot.month) {
            open = Some(match open {
                Some((start, _)) => (start, *slot),
                None => (*slot, *slot),
            });
        } else if let Some(run) = open.take() {
            runs.push(run);
        }
    }
    runs.extend(open);
    runs
}

/// Subtitle describing which months of the dataset are on screen.
pub fn time_frame_label(span: &DatasetSpan, months: MonthSet) -> String {
    let runs = time_frame_runs(&span.timeline(), months);
    if runs.is_empty() {
        return format!("{TIME_FRAME_PREFIX}none");
    }
    let parts: Vec<String> = runs
        .iter()
        .map(|(start, end)| format!("{start}–{end}"))
        .collect();
    format!("{TIME_FRAME_PREFIX}{}", parts.join(", "))
}

impl Season {
    /// `"Winter (November 2023–January 2024)"` for fire year 2024.
    pub fn range_label(self, fire_year: i32) -> String {
        let months = self.months();
        let start = YearMonth::new(calendar_year_in(fire_year, months[0]), months[0]);
        let end = YearMonth::new(calendar_year_in(fire_year, months[2]), months[2]);
        format!("{} ({start}–{end})", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::{DatasetSpan, YearMonth, fire_year_of, time_frame_label, time_frame_runs};
    use crate::season::{Season, SeasonSet};
    use chrono::NaiveDate;
    use foundation::ids::RecordId;
    use foundation::time::{Month, MonthSet};
    use pretty_assertions::assert_eq;
    use scene::FireRecord;

    fn dated(y: i32, m: u32, d: u32) -> FireRecord {
        FireRecord::new(RecordId::new(format!("{y}-{m}-{d}")))
            .with_date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    fn seasons(list: &[Season]) -> MonthSet {
        list.iter().copied().collect::<SeasonSet>().months()
    }

    #[test]
    fn fire_year_boundary() {
        assert_eq!(fire_year_of(2023, Month::October), 2023);
        assert_eq!(fire_year_of(2023, Month::November), 2024);
        assert_eq!(YearMonth::new(2023, Month::December).next(), YearMonth::new(2024, Month::January));
    }

    #[test]
    fn span_clamps_trailing_november() {
        let records = vec![dated(2023, 11, 2), dated(2024, 6, 1), dated(2024, 11, 20)];
        let span = DatasetSpan::from_records(&records).unwrap();
        assert_eq!(span.first, YearMonth::new(2023, Month::November));
        assert_eq!(span.last, YearMonth::new(2024, Month::October));
        assert_eq!(span.label_fire_year(), 2024);
        assert_eq!(span.timeline().len(), 12);

        let only_dec = vec![dated(2024, 12, 1)];
        let span = DatasetSpan::from_records(&only_dec).unwrap();
        assert_eq!(span.first, span.last);

        let undated = vec![FireRecord::new(RecordId::new("x"))];
        assert_eq!(DatasetSpan::from_records(&undated), None);
    }

    #[test]
    fn winter_spans_the_year_boundary_as_one_run() {
        let span = DatasetSpan::fire_year(2024);
        assert_eq!(
            time_frame_label(&span, seasons(&[Season::Winter])),
            "Time Frame Currently Displaying: November 2023–January 2024"
        );
        assert_eq!(
            time_frame_label(&span, seasons(&[Season::Winter, Season::Fall])),
            "Time Frame Currently Displaying: November 2023–January 2024, August 2024–October 2024"
        );
        assert_eq!(
            time_frame_label(&span, SeasonSet::all().months()),
            "Time Frame Currently Displaying: November 2023–October 2024"
        );
        assert_eq!(
            time_frame_label(&span, MonthSet::empty()),
            "Time Frame Currently Displaying: none"
        );
    }

    #[test]
    fn runs_follow_the_dataset_timeline() {
        let span = DatasetSpan {
            first: YearMonth::new(2022, Month::December),
            last: YearMonth::new(2023, Month::March),
        };
        let runs = time_frame_runs(&span.timeline(), seasons(&[Season::Winter]));
        assert_eq!(
            runs,
            vec![(YearMonth::new(2022, Month::December), YearMonth::new(2023, Month::January))]
        );
    }

    #[test]
    fn season_labels_use_fire_year() {
        assert_eq!(
            Season::Winter.range_label(2024),
            "Winter (November 2023–January 2024)"
        );
        assert_eq!(Season::Fall.range_label(2024), "Fall (August 2024–October 2024)");
    }

    #[test]
    fn lone_december_labels_match_the_time_frame() {
        let span = DatasetSpan::from_records(&[dated(2024, 12, 5)]).unwrap();
        assert_eq!(span.label_fire_year(), 2025);
        assert_eq!(
            time_frame_label(&span, seasons(&[Season::Winter])),
            "Time Frame Currently Displaying: December 2024–December 2024"
        );
        assert_eq!(
            Season::Winter.range_label(span.label_fire_year()),
            "Winter (November 2024–January 2025)"
        );
    }
}
