pub mod client;

pub use client::ImpalaClient;

use serde::Deserialize;

/// The two JSON debug pages we read from every coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Sessions,
    Queries,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::Sessions => "sessions",
            Self::Queries => "queries",
        }
    }
}

// ─── GET /sessions?json ──────────────────────────────────────────

/// Per-client connection and session counters.
/// Missing counters decode as 0, unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientHost {
    pub hostname: String,
    pub total_connections: u64,
    pub total_sessions: u64,
    pub total_active_sessions: u64,
    pub total_inactive_sessions: u64,
    pub inflight_queries: u64,
    pub total_queries: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionsResponse {
    pub client_hosts: Vec<ClientHost>,
}

// ─── GET /queries?json ───────────────────────────────────────────

/// One query that is still running on the coordinator.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InFlightQuery {
    /// Pretty-printed elapsed time, e.g. `1m30s` or `250ms`.
    pub duration: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueriesResponse {
    pub in_flight_queries: Vec<InFlightQuery>,
}
