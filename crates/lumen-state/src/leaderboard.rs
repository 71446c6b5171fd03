//! Leaderboard ranking
//!
//! A recomputed snapshot, never incrementally maintained. Recompute runs
//! after every point-affecting operation; with audiences bounded to room
//! scale this stays cheap, and that trade-off is deliberate.

use lumen_core::LeaderboardEntry;

use crate::Registry;

/// Rows broadcast / queried
pub const LEADERBOARD_SIZE: usize = 10;

/// Ranked top-N view of the registry
#[derive(Clone, Debug)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    top_n: usize,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::with_top_n(LEADERBOARD_SIZE)
    }

    pub fn with_top_n(top_n: usize) -> Self {
        Leaderboard {
            entries: Vec::new(),
            top_n,
        }
    }

    /// Rebuild from current registry state
    ///
    /// Sort is stable and the input is registry connect order, so
    /// equal-point participants rank in the order they joined. That
    /// tie-break is part of the contract.
    pub fn recompute(&mut self, registry: &Registry) {
        let mut entries: Vec<LeaderboardEntry> = registry
            .iter()
            .map(|p| LeaderboardEntry {
                id: p.id.clone(),
                name: p.name.clone(),
                points: p.points,
            })
            .collect();
        entries.sort_by(|a, b| b.points.cmp(&a.points));
        entries.truncate(self.top_n);
        self.entries = entries;
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Owned copy for broadcasts and the query surface
    pub fn to_vec(&self) -> Vec<LeaderboardEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Leaderboard {
    fn default() -> Self {
        Self::new()
    }
}
