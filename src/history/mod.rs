//! Append-only historical score store and consistent read views.
//!
//! The store is the only stateful collaborator in the pipeline. It is an
//! explicit repository seam: the scoring engines never touch it directly,
//! they receive a [`HistoryView`] captured once at the start of a
//! computation cycle. Appends after capture are invisible to that cycle,
//! so a result is always computed against one consistent set of series.

use crate::core::HistoricalSnapshot;
use std::collections::BTreeMap;

/// Repository interface for historical snapshots.
///
/// `get_history` returns snapshots ordered by period index regardless of
/// append order. Implementations may later be backed by a real database;
/// the scoring logic only sees this trait.
pub trait SnapshotStore {
    /// Record one snapshot. Append-only; nothing is ever updated or removed.
    fn append_snapshot(&mut self, snapshot: HistoricalSnapshot);

    /// Full period-ordered history for an entity. Empty when unknown.
    fn get_history(&self, entity_id: &str) -> Vec<HistoricalSnapshot>;

    /// All entity ids with at least one snapshot, in stable order.
    fn entity_ids(&self) -> Vec<String>;
}

/// In-memory snapshot store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    // BTreeMap keeps entity iteration deterministic.
    series: BTreeMap<String, Vec<HistoricalSnapshot>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemoryStore {
    fn append_snapshot(&mut self, snapshot: HistoricalSnapshot) {
        let series = self.series.entry(snapshot.entity_id.clone()).or_default();
        series.push(snapshot);
        // Stable sort: same-period appends keep arrival order.
        series.sort_by_key(|s| s.period_index);
    }

    fn get_history(&self, entity_id: &str) -> Vec<HistoricalSnapshot> {
        self.series.get(entity_id).cloned().unwrap_or_default()
    }

    fn entity_ids(&self) -> Vec<String> {
        self.series.keys().cloned().collect()
    }
}

/// Immutable view of everything one computation cycle needs from history:
/// the entity's own score series plus each peer's series.
///
/// Captured once at the start of a cycle; the engines never re-read the
/// store mid-calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryView {
    entity_scores: Vec<f64>,
    peer_scores: Vec<(String, Vec<f64>)>,
}

impl HistoryView {
    /// Capture the entity's series and the named peers' series. The entity
    /// itself is excluded from the peer set even if listed.
    pub fn capture(store: &dyn SnapshotStore, entity_id: &str, peer_ids: &[String]) -> Self {
        let entity_scores = score_series(store, entity_id);
        let peer_scores = peer_ids
            .iter()
            .filter(|id| id.as_str() != entity_id)
            .map(|id| (id.clone(), score_series(store, id)))
            .collect();
        Self {
            entity_scores,
            peer_scores,
        }
    }

    /// A view with no history at all: first-ever assessment of a cohort.
    pub fn empty() -> Self {
        Self {
            entity_scores: Vec::new(),
            peer_scores: Vec::new(),
        }
    }

    /// Period-ordered scores for the entity under computation.
    pub fn entity_scores(&self) -> &[f64] {
        &self.entity_scores
    }

    /// Period-ordered score series per peer.
    pub fn peer_scores(&self) -> &[(String, Vec<f64>)] {
        &self.peer_scores
    }

    /// Most recent recorded score for the entity, if any.
    pub fn latest_entity_score(&self) -> Option<f64> {
        self.entity_scores.last().copied()
    }
}

fn score_series(store: &dyn SnapshotStore, entity_id: &str) -> Vec<f64> {
    store
        .get_history(entity_id)
        .iter()
        .map(|s| s.score.value())
        .collect()
}

/// Early-window and recent-window averages of a period-ordered series.
///
/// The window size is `min(window, len / 2)`, floored at 1, so the two
/// windows never overlap. Returns `None` below two points; a trajectory
/// needs somewhere to travel from.
pub fn trajectory_windows(series: &[f64], window: usize) -> Option<(f64, f64)> {
    if series.len() < 2 {
        return None;
    }
    let w = window.min(series.len() / 2).max(1);
    let early = crate::core::metrics::mean(&series[..w]);
    let recent = crate::core::metrics::mean(&series[series.len() - w..]);
    Some((early, recent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Score0To100;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn snapshot(entity: &str, index: u32, score: f64) -> HistoricalSnapshot {
        HistoricalSnapshot {
            entity_id: entity.to_string(),
            period: format!("P{index}"),
            period_index: index,
            score: Score0To100::new(score),
            recorded_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_history_ordered_by_period_regardless_of_append_order() {
        let mut store = InMemoryStore::new();
        store.append_snapshot(snapshot("team-a", 3, 70.0));
        store.append_snapshot(snapshot("team-a", 1, 50.0));
        store.append_snapshot(snapshot("team-a", 2, 60.0));

        let history = store.get_history("team-a");
        let indices: Vec<_> = history.iter().map(|s| s.period_index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn test_unknown_entity_has_empty_history() {
        let store = InMemoryStore::new();
        assert!(store.get_history("nobody").is_empty());
    }

    #[test]
    fn test_view_is_isolated_from_later_appends() {
        let mut store = InMemoryStore::new();
        store.append_snapshot(snapshot("team-a", 1, 50.0));
        let view = HistoryView::capture(&store, "team-a", &[]);

        store.append_snapshot(snapshot("team-a", 2, 90.0));
        assert_eq!(view.entity_scores(), &[50.0]);
    }

    #[test]
    fn test_view_excludes_self_from_peers() {
        let mut store = InMemoryStore::new();
        store.append_snapshot(snapshot("team-a", 1, 50.0));
        store.append_snapshot(snapshot("team-b", 1, 60.0));

        let peers = vec!["team-a".to_string(), "team-b".to_string()];
        let view = HistoryView::capture(&store, "team-a", &peers);
        assert_eq!(view.peer_scores().len(), 1);
        assert_eq!(view.peer_scores()[0].0, "team-b");
    }

    #[test]
    fn test_trajectory_windows_need_two_points() {
        assert_eq!(trajectory_windows(&[], 3), None);
        assert_eq!(trajectory_windows(&[50.0], 3), None);
        assert_eq!(trajectory_windows(&[50.0, 70.0], 3), Some((50.0, 70.0)));
    }

    #[test]
    fn test_trajectory_windows_do_not_overlap() {
        // len 3 halves to window 1: first vs last point
        assert_eq!(
            trajectory_windows(&[40.0, 55.0, 70.0], 3),
            Some((40.0, 70.0))
        );
        // len 6 uses the configured window of 3
        let series = [40.0, 50.0, 60.0, 70.0, 80.0, 90.0];
        assert_eq!(trajectory_windows(&series, 3), Some((50.0, 80.0)));
    }
}
