use foundation::bounds::Aabb2;
use foundation::ids::RegionId;
use geo::{Contains, Point};
use scene::{FireRecord, RegionTable};
use tracing::{debug, info};

/// Counters from one indexing pass.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct IndexSummary {
    pub records: usize,
    /// Records inside at least one region.
    pub matched: usize,
    /// Records inside no region, including those without a position.
    pub unknown: usize,
    /// Records that already carried tags and were left alone.
    pub already_indexed: usize,
    /// Exact containment tests run after the bounding-box prefilter.
    pub exact_tests: usize,
}

/// Tags records with the regions containing them.
///
/// Each region's bounding box is computed once and padded by
/// `padding_deg`; only regions whose padded box holds the point get the
/// exact polygon test. The padding only widens the prefilter, so a true
/// containment is never rejected by it.
pub struct ContainmentIndexer<'a> {
    regions: &'a RegionTable,
    candidates: Vec<(RegionId, Aabb2)>,
}

impl<'a> ContainmentIndexer<'a> {
    pub fn new(regions: &'a RegionTable, padding_deg: f64) -> Self {
        let padding = if padding_deg.is_finite() {
            padding_deg.max(0.0)
        } else {
            0.0
        };
        // Regions without usable bounds cannot contain anything.
        let candidates = regions
            .iter()
            .filter_map(|r| Some((r.id, r.bounds?.padded(padding))))
            .collect();
        Self {
            regions,
            candidates,
        }
    }

    /// Containing regions for one record, ascending by id.
    pub fn index_record(&self, record: &FireRecord) -> Vec<RegionId> {
        self.index_record_counted(record).0
    }

    fn index_record_counted(&self, record: &FireRecord) -> (Vec<RegionId>, usize) {
        let Some(pos) = record.position else {
            return (Vec::new(), 0);
        };
        let p = pos.as_array();
        if !p[0].is_finite() || !p[1].is_finite() {
            return (Vec::new(), 0);
        }
        let point = Point::new(p[0], p[1]);
        let mut tests = 0;
        let mut hits = Vec::new();
        for (id, bbox) in &self.candidates {
            if !bbox.contains(p) {
                continue;
            }
            tests += 1;
            let Some(region) = self.regions.get(*id) else {
                continue;
            };
            if region.geometry.contains(&point) {
                hits.push(*id);
            }
        }
        (hits, tests)
    }

    /// Tags every record that has not been tagged yet. Runs to completion.
    pub fn run(&self, records: &mut [FireRecord]) -> IndexSummary {
        let mut summary = IndexSummary {
            records: records.len(),
            ..IndexSummary::default()
        };
        for record in records.iter_mut() {
            if record.is_indexed() {
                summary.already_indexed += 1;
                continue;
            }
            let (hits, tests) = self.index_record_counted(record);
            summary.exact_tests += tests;
            if hits.is_empty() {
                summary.unknown += 1;
            } else {
                summary.matched += 1;
            }
            record.set_containing_regions(hits);
        }
        debug!(regions = self.candidates.len(), ?summary, "containment pass details");
        info!(
            records = summary.records,
            matched = summary.matched,
            unknown = summary.unknown,
            "containment index complete"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::{ContainmentIndexer, IndexSummary};
    use foundation::ids::{RecordId, RegionId};
    use geo::{Contains, LineString, Point, Polygon};
    use pretty_assertions::assert_eq;
    use scene::{FireRecord, RegionTable};

    fn poly(coords: &[(f64, f64)]) -> Polygon<f64> {
        Polygon::new(LineString::from(coords.to_vec()), vec![])
    }

    fn table() -> RegionTable {
        let mut t = RegionTable::new();
        t.insert(
            "Square",
            vec![poly(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0), (0.0, 0.0)])],
        );
        // Concave "L": the bbox covers (3, 3) but the shape does not.
        t.insert(
            "Ell",
            vec![poly(&[
                (2.0, 2.0),
                (6.0, 2.0),
                (6.0, 3.0),
                (3.0, 3.0),
                (3.0, 6.0),
                (2.0, 6.0),
                (2.0, 2.0),
            ])],
        );
        t.insert("Empty", vec![]);
        t
    }

    fn at(id: &str, lon: f64, lat: f64) -> FireRecord {
        FireRecord::new(RecordId::new(id)).with_position(lon, lat)
    }

    #[test]
    fn tags_overlapping_and_concave_regions() {
        let t = table();
        let idx = ContainmentIndexer::new(&t, 0.01);
        assert_eq!(idx.index_record(&at("a", 1.0, 1.0)), vec![RegionId(0)]);
        assert_eq!(
            idx.index_record(&at("b", 2.5, 2.5)),
            vec![RegionId(0), RegionId(1)]
        );
        assert_eq!(idx.index_record(&at("c", 5.0, 5.0)), Vec::<RegionId>::new());
        assert_eq!(idx.index_record(&at("d", 50.0, 5.0)), Vec::<RegionId>::new());
        assert!(idx.index_record(&FireRecord::new(RecordId::new("e"))).is_empty());
    }

    #[test]
    fn prefilter_agrees_with_brute_force() {
        let t = table();
        let idx = ContainmentIndexer::new(&t, 0.01);
        for xi in 0..=28 {
            for yi in 0..=28 {
                let (x, y) = (xi as f64 * 0.25 - 0.5, yi as f64 * 0.25 - 0.5);
                let expected: Vec<RegionId> = t
                    .iter()
                    .filter(|r| r.geometry.contains(&Point::new(x, y)))
                    .map(|r| r.id)
                    .collect();
                assert_eq!(idx.index_record(&at("p", x, y)), expected, "at ({x}, {y})");
            }
        }
    }

    #[test]
    fn run_tags_once_and_counts() {
        let t = table();
        let idx = ContainmentIndexer::new(&t, 0.01);
        let mut records = vec![at("a", 1.0, 1.0), at("b", 9.0, 9.0), FireRecord::new(RecordId::new("c"))];
        let summary = idx.run(&mut records);
        assert_eq!(summary.records, 3);
        assert_eq!(summary.matched, 1);
        assert_eq!(summary.unknown, 2);
        assert_eq!(summary.already_indexed, 0);
        assert!(records.iter().all(FireRecord::is_indexed));
        assert_eq!(records[0].containing_regions(), &[RegionId(0)]);

        let again = idx.run(&mut records);
        assert_eq!(
            again,
            IndexSummary {
                records: 3,
                already_indexed: 3,
                ..IndexSummary::default()
            }
        );
    }
}
