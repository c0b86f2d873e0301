//! The derivation pipeline: bucket, then season, then region.
//!
//! Every function here is pure. Callers re-derive from the current
//! [`FilterState`] on each change instead of patching previous output.

use scene::FireRecord;
use scene::selection::SelectionSet;

use crate::buckets::BucketedDataset;
use crate::season::SeasonSet;

#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub selected_seasons: SeasonSet,
    /// Always one of the dataset's notches.
    pub brightness_threshold: f64,
    pub selected_regions: SelectionSet,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_seasons: SeasonSet::all(),
            brightness_threshold: 325.0,
            selected_regions: SelectionSet::new(),
        }
    }
}

/// Indices of the records the map shows, in bucket (input) order.
///
/// Empty season selection yields nothing. Empty region selection applies no
/// region restriction; otherwise records without a containing region are
/// dropped.
pub fn derive_visible(
    buckets: &BucketedDataset,
    records: &[FireRecord],
    state: &FilterState,
) -> Vec<usize> {
    if state.selected_seasons.is_empty() {
        return Vec::new();
    }
    let months = state.selected_seasons.months();
    buckets
        .bucket(state.brightness_threshold)
        .iter()
        .copied()
        .filter(|&i| {
            records
                .get(i)
                .and_then(FireRecord::month)
                .is_some_and(|m| months.contains(m))
        })
        .filter(|&i| in_selected_regions(&records[i], &state.selected_regions))
        .collect()
}

/// Records feeding the monthly chart: threshold and regions apply, seasons
/// do not.
pub fn derive_chart_subset(
    buckets: &BucketedDataset,
    records: &[FireRecord],
    state: &FilterState,
) -> Vec<usize> {
    buckets
        .bucket(state.brightness_threshold)
        .iter()
        .copied()
        .filter(|&i| {
            records
                .get(i)
                .is_some_and(|r| in_selected_regions(r, &state.selected_regions))
        })
        .collect()
}

fn in_selected_regions(record: &FireRecord, selected: &SelectionSet) -> bool {
    selected.is_empty() || selected.contains_any(record.containing_regions())
}

#[cfg(test)]
mod tests {
    use super::{FilterState, derive_chart_subset, derive_visible};
    use crate::buckets::{BucketedDataset, NotchSet};
    use crate::season::{Season, SeasonSet};
    use chrono::NaiveDate;
    use foundation::ids::{RecordId, RegionId};
    use pretty_assertions::assert_eq;
    use scene::FireRecord;
    use scene::selection::SelectionSet;

    fn record(id: &str, brightness: f64, month: u32, regions: &[u32]) -> FireRecord {
        let mut r = FireRecord::new(RecordId::new(id))
            .with_brightness(brightness)
            .with_date(NaiveDate::from_ymd_opt(2024, month, 10).unwrap());
        r.set_containing_regions(regions.iter().map(|&i| RegionId(i)).collect());
        r
    }

    fn fixture() -> (Vec<FireRecord>, BucketedDataset) {
        let records = vec![
            record("a", 320.0, 1, &[0]),
            record("b", 330.0, 1, &[0]),
            record("c", 400.0, 6, &[1]),
            record("d", 500.0, 6, &[]),
        ];
        let buckets = BucketedDataset::build(&records, NotchSet::default());
        (records, buckets)
    }

    fn ids(records: &[FireRecord], idx: &[usize]) -> Vec<String> {
        idx.iter().map(|&i| records[i].id.to_string()).collect()
    }

    #[test]
    fn winter_at_325_keeps_only_the_january_330() {
        let (records, buckets) = fixture();
        let state = FilterState {
            selected_seasons: [Season::Winter].into_iter().collect(),
            ..FilterState::default()
        };
        let visible = derive_visible(&buckets, &records, &state);
        assert_eq!(ids(&records, &visible), vec!["b"]);
    }

    #[test]
    fn no_seasons_means_nothing() {
        let (records, buckets) = fixture();
        let mut state = FilterState {
            selected_seasons: SeasonSet::empty(),
            ..FilterState::default()
        };
        assert!(derive_visible(&buckets, &records, &state).is_empty());
        state.selected_regions.insert(RegionId(1));
        assert!(derive_visible(&buckets, &records, &state).is_empty());
    }

    #[test]
    fn no_regions_means_no_region_restriction() {
        let (records, buckets) = fixture();
        let state = FilterState::default();
        let visible = derive_visible(&buckets, &records, &state);
        assert_eq!(ids(&records, &visible), vec!["b", "c", "d"]);
    }

    #[test]
    fn region_filter_drops_unknown_records() {
        let (records, buckets) = fixture();
        let state = FilterState {
            selected_regions: [RegionId(1)].into_iter().collect::<SelectionSet>(),
            ..FilterState::default()
        };
        assert_eq!(ids(&records, &derive_visible(&buckets, &records, &state)), vec!["c"]);

        let nowhere = FilterState {
            selected_regions: [RegionId(7)].into_iter().collect::<SelectionSet>(),
            ..FilterState::default()
        };
        assert!(derive_visible(&buckets, &records, &nowhere).is_empty());
    }

    #[test]
    fn derivation_is_idempotent_and_toggle_safe() {
        let (records, buckets) = fixture();
        let mut state = FilterState::default();
        let before = derive_visible(&buckets, &records, &state);
        assert_eq!(before, derive_visible(&buckets, &records, &state));

        state.selected_seasons.remove(Season::Summer);
        assert_eq!(ids(&records, &derive_visible(&buckets, &records, &state)), vec!["b"]);
        state.selected_seasons.insert(Season::Summer);
        assert_eq!(derive_visible(&buckets, &records, &state), before);
    }

    #[test]
    fn chart_subset_ignores_seasons() {
        let (records, buckets) = fixture();
        let state = FilterState {
            selected_seasons: SeasonSet::empty(),
            brightness_threshold: 400.0,
            ..FilterState::default()
        };
        assert_eq!(
            ids(&records, &derive_chart_subset(&buckets, &records, &state)),
            vec!["c", "d"]
        );
    }

    #[test]
    fn undated_records_never_pass_the_season_filter() {
        let records = vec![FireRecord::new(RecordId::new("x")).with_brightness(450.0)];
        let buckets = BucketedDataset::build(&records, NotchSet::default());
        let state = FilterState::default();
        assert!(derive_visible(&buckets, &records, &state).is_empty());
        assert_eq!(derive_chart_subset(&buckets, &records, &state), vec![0]);
    }
}
