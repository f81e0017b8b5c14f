/// Error taxonomy for the insight pipeline.
///
/// `NotVerified` and an empty source snippet are recovered locally into
/// degraded-but-successful results; every other variant aborts the request.
/// Upstream detail is logged for diagnostics and surfaced to callers as a
/// generic failure.
#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("invalid request: {0}")]
    InvalidInput(String),
    #[error("contract {0} has no verified source")]
    NotVerified(String),
    #[error("could not decode call data: {0}")]
    Decode(String),
    #[error("completion service error: {0}")]
    Completion(String),
    #[error("lookup service error: {0}")]
    Lookup(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Config(#[from] anyhow::Error),
}
