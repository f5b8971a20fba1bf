use crate::math::next_smallest_prime;

/// Tunable parameters for the tiered cut search.
///
/// Defaults match the production tuning: 20 slabs on the first tier, 10 on
/// the deeper ones, 10% volume tolerance and 20% aspect tolerance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    /// Slab counts per tier (tier 1 scans Y, tier 2 X, tier 3 Z).
    pub tier_divs: [usize; 3],
    /// Mesh subdivision level passed to the kernel per tier.
    pub subdivision_levels: [u32; 3],
    /// Maximum relative volume discrepancy for a candidate to pass.
    pub allowed_pd_volume: f64,
    /// Maximum per-component relative aspect discrepancy for acceptance.
    pub allowed_pd_aspect: f64,
    /// Upper bound (exclusive) of the mediocre selection band.
    pub mediocre_pd_cap: f64,
    /// Upper bound (exclusive) of the bad selection band.
    pub bad_pd_cap: f64,
    /// Maximum deviation of a face normal component from ±1 to count the
    /// face as axis-aligned in the area estimator.
    pub normal_tolerance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tier_divs: [20, 10, 10],
            subdivision_levels: [1, 1, 1],
            allowed_pd_volume: 0.1,
            allowed_pd_aspect: 0.2,
            mediocre_pd_cap: 0.8,
            bad_pd_cap: 1.5,
            normal_tolerance: 0.03,
        }
    }
}

impl SearchConfig {
    /// Config for the next cut in a sequence: every tier division count
    /// advances to the next larger prime, so successive searches never
    /// realign slab boundaries with earlier cut planes.
    #[must_use]
    pub fn escalated(&self) -> Self {
        let mut next = *self;
        for divs in &mut next.tier_divs {
            *divs = next_smallest_prime(*divs);
        }
        next
    }
}
