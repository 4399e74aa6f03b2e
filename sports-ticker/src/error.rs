use thiserror::Error;

/// Failures while fetching a scoreboard payload. All of these are
/// transient from the ticker's point of view: the caller falls back to a
/// stale cache read and otherwise skips the league for the cycle.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected status code: {0}")]
    Status(reqwest::StatusCode),
}
