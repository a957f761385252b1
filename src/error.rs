/// Errors returned by the stats API client.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or body read failure
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Schedule body was not valid schedule JSON
    #[error("error parsing body: {0}")]
    Decode(#[source] serde_json::Error),
}
