use std::fmt;

use crate::kernel::SolidId;
use crate::math::Aabb;

/// Which half of a mirrored pair a candidate is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Pos,
    Neg,
}

impl Side {
    /// Suffix used in component names and logs.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Side::Pos => "pos",
            Side::Neg => "neg",
        }
    }
}

/// Position of a candidate in the tier tree: one slab ordinal per tier,
/// outermost first. Ordinals start at 1 in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutPath(Vec<u32>);

impl CutPath {
    /// Path of a tier-1 candidate.
    #[must_use]
    pub fn root(ordinal: u32) -> Self {
        Self(vec![ordinal])
    }

    /// Path of a child candidate one tier deeper.
    #[must_use]
    pub fn child(&self, ordinal: u32) -> Self {
        let mut segments = self.0.clone();
        segments.push(ordinal);
        Self(segments)
    }

    /// Number of tiers this path descends through (1 to 3).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for CutPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "_")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

/// One surviving cut from the tiered search.
///
/// `cut_box` is the box to subtract from the working solid if this
/// candidate is chosen; it inherits the scan-axis ranges of its ancestors
/// and stays enlarged on axes no tier has narrowed. `estimated_fraction`
/// is the candidate's estimated share of the searched solid (the product
/// of accumulated slab ratios down the tiers). `score` is `Some` for
/// every pooled candidate; volume-rejected cuts never reach the pool.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: CutPath,
    pub side: Option<Side>,
    pub solid: SolidId,
    pub cut_box: Aabb,
    pub score: Option<f64>,
    pub accepted: bool,
    pub estimated_fraction: f64,
}

/// Candidates collected by one search run.
///
/// Mirrored pairs appear as two entries sharing a path and a score.
#[derive(Debug, Default)]
pub struct CandidatePool {
    entries: Vec<Candidate>,
}

impl CandidatePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.entries.push(candidate);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.entries.iter()
    }

    /// Smallest score in the pool.
    #[must_use]
    pub fn best_score(&self) -> Option<f64> {
        let mut best = None;
        for candidate in &self.entries {
            if let Some(score) = candidate.score {
                match best {
                    Some(b) if score >= b => {}
                    _ => best = Some(score),
                }
            }
        }
        best
    }

    /// Removes and returns every entry on `path` (one entry, or a
    /// mirrored pair).
    pub fn take_path(&mut self, path: &CutPath) -> Vec<Candidate> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.entries.len());
        for candidate in self.entries.drain(..) {
            if candidate.path == *path {
                taken.push(candidate);
            } else {
                kept.push(candidate);
            }
        }
        self.entries = kept;
        taken
    }

    /// Removes and returns all entries.
    pub fn drain(&mut self) -> Vec<Candidate> {
        std::mem::take(&mut self.entries)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Aabb;
    use slotmap::SlotMap;

    fn dummy_solid() -> SolidId {
        let mut arena: SlotMap<SolidId, ()> = SlotMap::with_key();
        arena.insert(())
    }

    fn candidate(path: CutPath, side: Option<Side>, score: f64) -> Candidate {
        Candidate {
            path,
            side,
            solid: dummy_solid(),
            cut_box: Aabb::from_coords(0.0, 0.0, 0.0, 1.0, 1.0, 1.0),
            score: Some(score),
            accepted: score <= 0.4,
            estimated_fraction: 0.2,
        }
    }

    #[test]
    fn path_display_joins_segments() {
        let path = CutPath::root(3).child(1).child(2);
        assert_eq!(path.to_string(), "3_1_2");
        assert_eq!(path.depth(), 3);
    }

    #[test]
    fn best_score_over_pool() {
        let mut pool = CandidatePool::new();
        pool.push(candidate(CutPath::root(1), None, 0.7));
        pool.push(candidate(CutPath::root(2).child(1), None, 0.25));
        pool.push(candidate(CutPath::root(4), None, 0.9));
        let best = pool.best_score().unwrap();
        assert!((best - 0.25).abs() < 1e-12, "best={best}");
    }

    #[test]
    fn take_path_removes_whole_pair() {
        let mut pool = CandidatePool::new();
        let pair = CutPath::root(2).child(3);
        pool.push(candidate(pair.clone(), Some(Side::Pos), 0.3));
        pool.push(candidate(pair.clone(), Some(Side::Neg), 0.3));
        pool.push(candidate(CutPath::root(1), None, 0.5));

        let taken = pool.take_path(&pair);
        assert_eq!(taken.len(), 2);
        assert_eq!(pool.len(), 1);
        assert!(pool.iter().all(|c| c.path != pair));
    }
}
