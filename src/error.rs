use thiserror::Error;

/// Top-level error type for the volcut library.
#[derive(Debug, Error)]
pub enum VolcutError {
    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Errors reported by a mesh kernel backend.
#[derive(Debug, Error)]
pub enum KernelError {
    #[error("unknown solid id")]
    UnknownSolid,

    #[error("solid has no geometry")]
    EmptySolid,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),
}

/// Errors raised while validating a cut request.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("requested volume fraction {0} is outside (0, 1]")]
    VolumeFractionOutOfRange(f64),

    #[error("aspect component {index} = {value} must be positive")]
    NonPositiveAspect { index: usize, value: f64 },

    #[error("requested fraction {requested} exceeds remaining budget {remaining}")]
    BudgetExceeded { requested: f64, remaining: f64 },
}

/// Errors raised while choosing among candidate cuts.
#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no candidate cuts survived the search")]
    NoCandidates,
}

/// Convenience type alias for results using [`VolcutError`].
pub type Result<T> = std::result::Result<T, VolcutError>;
