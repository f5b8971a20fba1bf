//! Final cut selection and application.
//!
//! The search hands over a pool of scored candidates; exactly one of them
//! (or one mirrored pair) is applied. Selection is destructive: every
//! losing candidate's solid is destroyed, the chosen cut boxes are
//! subtracted from the working solid, and the chosen solids are returned
//! to the caller as the carved-off pieces.

use rand::Rng;
use tracing::{error, info};

use crate::adapter::GeometryAdapter;
use crate::config::SearchConfig;
use crate::error::{Result, SelectionError};
use crate::kernel::{MeshKernel, SolidId};
use crate::math::{Aabb, FP_TOLERANCE};
use crate::search::{Candidate, CandidatePool, CutPath, Side};

/// How to pick from the candidate pool.
///
/// `Best` takes the lowest score. `Mediocre` and `Bad` pick uniformly at
/// random among candidates whose percent score falls in the config's
/// mediocre or bad band, falling back to best when the band is empty.
/// Deliberately imperfect cuts keep a decomposition from looking
/// machine-made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutChoice {
    Best,
    Mediocre,
    Bad,
}

/// A carved-off piece of the working solid.
#[derive(Debug, Clone)]
pub struct CutPiece {
    pub solid: SolidId,
    pub cut_box: Aabb,
    pub score: f64,
    pub side: Option<Side>,
    pub accepted: bool,
    pub estimated_fraction: f64,
}

/// Picks a candidate per `choice`, destroys the rest, subtracts the
/// chosen cut box(es) from `working` and returns the pieces.
///
/// Mirrored pairs are applied as a unit. When the two half boxes adjoin
/// at the center they are merged and subtracted once, so no sliver of
/// the working solid survives between them.
///
/// # Errors
///
/// Returns [`SelectionError::NoCandidates`] on an empty pool and
/// propagates kernel errors.
pub fn select_and_apply<K: MeshKernel, R: Rng>(
    kernel: &mut K,
    mut pool: CandidatePool,
    working: SolidId,
    choice: CutChoice,
    config: &SearchConfig,
    rng: &mut R,
) -> Result<Vec<CutPiece>> {
    let Some(path) = choose_path(&pool, choice, config, rng) else {
        error!("candidate pool is empty, nothing to cut");
        return Err(SelectionError::NoCandidates.into());
    };

    let chosen = pool.take_path(&path);
    let mut adapter = GeometryAdapter::new(kernel);
    for loser in pool.drain() {
        adapter.release(loser.solid)?;
    }

    let depth = path.depth().min(config.subdivision_levels.len());
    let level = config.subdivision_levels[depth - 1];

    match pair_of(&chosen) {
        Some((pos, neg)) if adjoining(&pos.cut_box, &neg.cut_box) => {
            let merged = pos.cut_box.union(&neg.cut_box);
            adapter.carve_box(working, &merged, level)?;
        }
        _ => {
            for candidate in &chosen {
                adapter.carve_box(working, &candidate.cut_box, level)?;
            }
        }
    }

    info!(
        path = %path,
        score = ?chosen.first().and_then(|c| c.score),
        pieces = chosen.len(),
        ?choice,
        "cut applied"
    );

    Ok(chosen
        .into_iter()
        .map(|c| CutPiece {
            solid: c.solid,
            cut_box: c.cut_box,
            score: c.score.unwrap_or(f64::INFINITY),
            side: c.side,
            accepted: c.accepted,
            estimated_fraction: c.estimated_fraction,
        })
        .collect())
}

fn choose_path<R: Rng>(
    pool: &CandidatePool,
    choice: CutChoice,
    config: &SearchConfig,
    rng: &mut R,
) -> Option<CutPath> {
    match choice {
        CutChoice::Best => best_path(pool),
        CutChoice::Mediocre => {
            banded_path(pool, config.allowed_pd_aspect, config.mediocre_pd_cap, rng)
                .or_else(|| best_path(pool))
        }
        CutChoice::Bad => banded_path(pool, config.mediocre_pd_cap, config.bad_pd_cap, rng)
            .or_else(|| best_path(pool)),
    }
}

/// Path of the lowest-scored candidate; ties keep the earliest entry.
fn best_path(pool: &CandidatePool) -> Option<CutPath> {
    let mut best: Option<(f64, CutPath)> = None;
    for candidate in pool.iter() {
        let Some(score) = candidate.score else {
            continue;
        };
        let better = match &best {
            Some((b, _)) => score < *b,
            None => true,
        };
        if better {
            best = Some((score, candidate.path.clone()));
        }
    }
    best.map(|(_, path)| path)
}

/// Uniform pick among candidates whose percent score floors into
/// `[lo, hi)`. Pair halves are individual tickets, so pairs are twice as
/// likely as singles with the same score.
#[allow(clippy::cast_possible_truncation)]
fn banded_path<R: Rng>(
    pool: &CandidatePool,
    lo: f64,
    hi: f64,
    rng: &mut R,
) -> Option<CutPath> {
    let lo = (lo * 100.0).floor() as i64;
    let hi = (hi * 100.0).floor() as i64;
    let in_band: Vec<&Candidate> = pool
        .iter()
        .filter(|c| {
            c.score
                .is_some_and(|s| ((s * 100.0).floor() as i64) >= lo && ((s * 100.0).floor() as i64) < hi)
        })
        .collect();
    if in_band.is_empty() {
        return None;
    }
    let pick = rng.random_range(0..in_band.len());
    Some(in_band[pick].path.clone())
}

fn pair_of(chosen: &[Candidate]) -> Option<(&Candidate, &Candidate)> {
    if chosen.len() != 2 {
        return None;
    }
    let pos = chosen.iter().find(|c| c.side == Some(Side::Pos))?;
    let neg = chosen.iter().find(|c| c.side == Some(Side::Neg))?;
    Some((pos, neg))
}

/// True when the negative half's upper X face meets the positive half's
/// lower X face.
fn adjoining(pos_box: &Aabb, neg_box: &Aabb) -> bool {
    (pos_box.min.x - neg_box.max.x).abs() <= FP_TOLERANCE
}
