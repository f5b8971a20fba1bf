//! Cut sequence driver.
//!
//! Runs a list of cut requests against one working solid. Request
//! fractions are stated relative to the original solid; before each step
//! the driver rescales the fraction against the remaining budget, so a
//! 0.1 request after a 0.18 cut searches for 0.1 / 0.82 of what is left.
//! After every step the tier division counts escalate to the next larger
//! prime, keeping later slab boundaries off earlier cut planes.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::config::SearchConfig;
use crate::error::{RequestError, Result};
use crate::kernel::{MeshKernel, SolidId};
use crate::math::FP_TOLERANCE;
use crate::search::{SearchTarget, TieredCutSearch};
use crate::select::{select_and_apply, CutChoice, CutPiece};

/// One entry of a cut sequence.
///
/// `volume_fraction` is relative to the original solid; for symmetric
/// requests it is the fraction of one half of the mirrored pair.
/// `aspect` is the desired edge proportion triple of the piece.
#[derive(Debug, Clone)]
pub struct CutRequest {
    pub volume_fraction: f64,
    pub aspect: [f64; 3],
    pub symmetric: bool,
    pub name: Option<String>,
}

impl CutRequest {
    /// Checks the request in isolation.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] for a fraction outside `(0, 1]` or a
    /// non-positive aspect component.
    pub fn validate(&self) -> std::result::Result<(), RequestError> {
        if !self.volume_fraction.is_finite()
            || self.volume_fraction <= 0.0
            || self.volume_fraction > 1.0
        {
            return Err(RequestError::VolumeFractionOutOfRange(self.volume_fraction));
        }
        for (index, &value) in self.aspect.iter().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(RequestError::NonPositiveAspect { index, value });
            }
        }
        Ok(())
    }
}

/// Result of one sequence step: the named component and its carved
/// piece(s) (one, or a mirrored pair).
#[derive(Debug)]
pub struct ComponentCut {
    pub name: String,
    pub pieces: Vec<CutPiece>,
}

/// Drives a whole cut sequence over one kernel.
pub struct SequenceDriver<'k, K: MeshKernel> {
    kernel: &'k mut K,
    config: SearchConfig,
    rng: StdRng,
}

impl<'k, K: MeshKernel> SequenceDriver<'k, K> {
    pub fn new(kernel: &'k mut K, config: SearchConfig) -> Self {
        Self {
            kernel,
            config,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Driver with a fixed selection seed, for reproducible runs.
    pub fn with_seed(kernel: &'k mut K, config: SearchConfig, seed: u64) -> Self {
        Self {
            kernel,
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Current search configuration (escalates as steps complete).
    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Carves every requested component out of `working`, in order.
    ///
    /// `choices` pairs with `requests` by index; missing entries default
    /// to [`CutChoice::Best`]. The sequence aborts on the first invalid
    /// request, starved selection or kernel failure.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] variants for invalid requests or an
    /// exhausted budget, and propagates search and selection errors.
    pub fn run(
        &mut self,
        working: SolidId,
        requests: &[CutRequest],
        choices: &[CutChoice],
    ) -> Result<Vec<ComponentCut>> {
        let mut remaining = 1.0_f64;
        let mut outcomes = Vec::with_capacity(requests.len());

        for (step, request) in requests.iter().enumerate() {
            request.validate()?;
            if request.volume_fraction > remaining + FP_TOLERANCE {
                return Err(RequestError::BudgetExceeded {
                    requested: request.volume_fraction,
                    remaining,
                }
                .into());
            }

            let ratio = (request.volume_fraction / remaining).min(1.0);
            let target = SearchTarget::new(ratio, request.aspect, request.symmetric);
            info!(
                step = step + 1,
                fraction = request.volume_fraction,
                ratio,
                symmetric = request.symmetric,
                divs = ?self.config.tier_divs,
                "sequence step"
            );

            let pool =
                TieredCutSearch::new(&mut *self.kernel, self.config).run(working, &target)?;
            let choice = choices.get(step).copied().unwrap_or(CutChoice::Best);
            let pieces = select_and_apply(
                &mut *self.kernel,
                pool,
                working,
                choice,
                &self.config,
                &mut self.rng,
            )?;

            let name = request
                .name
                .clone()
                .unwrap_or_else(|| format!("component_{}", step + 1));
            info!(name = %name, pieces = pieces.len(), "component carved");
            outcomes.push(ComponentCut { name, pieces });

            remaining -= request.volume_fraction;
            self.config = self.config.escalated();
        }
        Ok(outcomes)
    }
}
