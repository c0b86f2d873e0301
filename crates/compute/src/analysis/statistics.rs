use foundation::time::Month;
use scene::FireRecord;

pub struct Statistics;

impl Statistics {
    /// Mean of the finite values; `None` when there are none.
    pub fn mean(values: &[f64]) -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for &v in values.iter().filter(|v| v.is_finite()) {
            sum += v;
            n += 1;
        }
        (n > 0).then(|| sum / n as f64)
    }

    pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
        let mut it = values.iter().copied().filter(|v| v.is_finite());
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Mean brightness per calendar month. A month nothing contributed to is
/// `None`, never zero.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct MonthlyAverages {
    averages: [Option<f64>; 12],
    counts: [usize; 12],
}

impl MonthlyAverages {
    /// Records without a parseable date or a finite brightness are skipped.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a FireRecord>) -> Self {
        let mut by_month: [Vec<f64>; 12] = Default::default();
        for r in records {
            if let (Some(month), Some(b)) = (r.month(), r.brightness) {
                if b.is_finite() {
                    by_month[month.index()].push(b);
                }
            }
        }
        Self {
            averages: std::array::from_fn(|i| Statistics::mean(&by_month[i])),
            counts: std::array::from_fn(|i| by_month[i].len()),
        }
    }

    pub fn get(&self, month: Month) -> Option<f64> {
        self.averages[month.index()]
    }

    pub fn count(&self, month: Month) -> usize {
        self.counts[month.index()]
    }

    /// All twelve months, January first.
    pub fn iter(&self) -> impl Iterator<Item = (Month, Option<f64>)> + '_ {
        Month::ALL.into_iter().map(|m| (m, self.get(m)))
    }

    /// Lowest and highest defined average.
    pub fn extent(&self) -> Option<(f64, f64)> {
        let defined: Vec<f64> = self.averages.iter().flatten().copied().collect();
        Statistics::min_max(&defined)
    }
}

#[cfg(test)]
mod tests {
    use super::{MonthlyAverages, Statistics};
    use chrono::NaiveDate;
    use foundation::ids::RecordId;
    use foundation::time::Month;
    use scene::FireRecord;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    #[test]
    fn mean_works() {
        let m = Statistics::mean(&[1.0, 2.0, 3.0]).unwrap();
        assert_close(m, 2.0);
        assert_eq!(Statistics::mean(&[]), None);
        assert_eq!(Statistics::min_max(&[f64::NAN, 4.0, -1.0]), Some((-1.0, 4.0)));
    }

    #[test]
    fn empty_months_are_none() {
        let d = |m: u32| NaiveDate::from_ymd_opt(2024, m, 3).unwrap();
        let records = vec![
            FireRecord::new(RecordId::new("a")).with_brightness(330.0).with_date(d(1)),
            FireRecord::new(RecordId::new("b")).with_brightness(350.0).with_date(d(1)),
            FireRecord::new(RecordId::new("c")).with_brightness(400.0).with_date(d(6)),
            FireRecord::new(RecordId::new("d")).with_brightness(999.0),
            FireRecord::new(RecordId::new("e")).with_date(d(3)),
        ];
        let avg = MonthlyAverages::from_records(&records);
        assert_close(avg.get(Month::January).unwrap(), 340.0);
        assert_close(avg.get(Month::June).unwrap(), 400.0);
        assert_eq!(avg.get(Month::March), None);
        assert_eq!(avg.count(Month::January), 2);
        assert_eq!(avg.iter().filter(|(_, v)| v.is_none()).count(), 10);
        assert_eq!(avg.extent(), Some((340.0, 400.0)));

        let none = MonthlyAverages::from_records(std::iter::empty());
        assert!(none.iter().all(|(_, v)| v.is_none()));
        assert_eq!(none.extent(), None);
    }
}
