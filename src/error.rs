use thiserror::Error;

/// Why one endpoint of one Impala coordinator produced nothing this scrape.
///
/// All variants are handled the same way by the collector (log and skip);
/// they are kept apart so the log line says what actually went wrong.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection refused, DNS failure, timeout, truncated body...
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The coordinator answered, but not with a 2xx.
    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The body was not the JSON shape we expect.
    #[error("cannot decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A duration string that could not be turned into seconds.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DurationError {
    #[error("component {component:?} in {input:?} does not fit in 64 bits")]
    Overflow { input: String, component: String },

    #[error("component {component:?} in {input:?} is repeated or out of order")]
    OutOfOrder { input: String, component: String },

    #[error("component {component:?} in {input:?} has an unknown unit")]
    UnknownUnit { input: String, component: String },
}

/// Startup configuration problems. These are the only fatal errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no Impala servers configured, pass at least one with --impala_servers")]
    NoTargets,

    #[error("invalid Impala server address {0:?}, expected host:port")]
    InvalidTarget(String),
}
