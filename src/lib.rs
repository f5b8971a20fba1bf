//! Recursive volume-matching cut search for solid meshes.
//!
//! Decomposes a solid into pieces of requested volume and proportions by
//! scanning axis-aligned slabs tier by tier (Y, then X, then Z),
//! estimating slab volumes from cut-surface areas, verifying materialized
//! candidates against volume and aspect tolerances, and carving the
//! chosen cut out of the working solid. A sequence driver chains cuts,
//! rescaling each request against the remaining volume budget.

pub mod adapter;
pub mod config;
pub mod error;
pub mod estimate;
pub mod kernel;
pub mod math;
pub mod search;
pub mod select;
pub mod sequence;
pub mod verify;

pub use config::SearchConfig;
pub use error::{Result, VolcutError};
pub use kernel::{BoxComplexKernel, FacePatch, MeshKernel, SolidId};
pub use search::{Candidate, CandidatePool, CutPath, SearchTarget, Side, TieredCutSearch};
pub use select::{select_and_apply, CutChoice, CutPiece};
pub use sequence::{ComponentCut, CutRequest, SequenceDriver};
