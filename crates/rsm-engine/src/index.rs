//! Chainage-keyed proximity index over the LMD dataset.

use std::collections::BTreeMap;

use rsm_model::{Lane, SurveyRecord};

#[derive(Debug, Clone, Copy)]
struct Entry {
    chainage: f64,
    /// Index into the LMD record slice the index was built from.
    record: usize,
}

/// Read-only range-query structure over valid LMD records.
///
/// Records are grouped by lane (when lane pre-filtering is enabled) and
/// sorted by chainage, so a query is two binary searches over one group
/// instead of a full scan. Safe to query concurrently once built.
#[derive(Debug, Clone)]
pub struct ChainageIndex {
    /// `Some(lane)` keys when grouped by lane, a single `None` key otherwise.
    groups: BTreeMap<Option<Lane>, Vec<Entry>>,
    group_by_lane: bool,
}

impl ChainageIndex {
    /// Builds the index over the records at `indices` within `records`.
    /// Callers pass only validated records (finite chainage).
    #[must_use]
    pub fn build(records: &[SurveyRecord], indices: &[usize], group_by_lane: bool) -> Self {
        let mut groups: BTreeMap<Option<Lane>, Vec<Entry>> = BTreeMap::new();
        for &record in indices {
            let key = group_by_lane.then(|| records[record].lane);
            groups.entry(key).or_default().push(Entry {
                chainage: records[record].chainage,
                record,
            });
        }
        for entries in groups.values_mut() {
            entries.sort_by(|a, b| {
                a.chainage
                    .total_cmp(&b.chainage)
                    .then(a.record.cmp(&b.record))
            });
        }
        Self {
            groups,
            group_by_lane,
        }
    }

    /// Record indices whose chainage lies within `radius` of `chainage`,
    /// restricted to `lane` when the index is lane-grouped, in ascending
    /// chainage order. Empty when no candidate exists.
    pub fn query(&self, chainage: f64, lane: Lane, radius: f64) -> impl Iterator<Item = usize> {
        let key = self.group_by_lane.then_some(lane);
        let range = self.groups.get(&key).map_or(&[][..], |entries| {
            let start = entries.partition_point(|entry| entry.chainage < chainage - radius);
            let end = entries.partition_point(|entry| entry.chainage <= chainage + radius);
            &entries[start..end]
        });
        range.iter().map(|entry| entry.record)
    }

    /// Number of indexed records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }
}
