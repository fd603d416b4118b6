//! Every metric this exporter can emit. Names and labels are part of the
//! dashboard contract and must not change.

pub const SERVER_LABEL: &str = "impala_server";
pub const CLIENT_LABEL: &str = "impala_client";

const SERVER: &[&str] = &[SERVER_LABEL];
const SERVER_CLIENT: &[&str] = &[SERVER_LABEL, CLIENT_LABEL];

/// Name, help text and label names of one gauge family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

const fn per_client(name: &'static str, help: &'static str) -> MetricDesc {
    MetricDesc {
        name,
        help,
        labels: SERVER_CLIENT,
    }
}

const fn per_server(name: &'static str, help: &'static str) -> MetricDesc {
    MetricDesc {
        name,
        help,
        labels: SERVER,
    }
}

// ─── /sessions ───────────────────────────────────────────────────

pub const TOTAL_CONNECTIONS: MetricDesc = per_client(
    "impala_total_connections",
    "Total number of connections for an Impala client",
);
pub const TOTAL_SESSIONS: MetricDesc = per_client(
    "impala_total_sessions",
    "Total number of sessions for an Impala client",
);
pub const TOTAL_ACTIVE_SESSIONS: MetricDesc = per_client(
    "impala_total_active_sessions",
    "Total number of active sessions for an Impala client",
);
pub const TOTAL_INACTIVE_SESSIONS: MetricDesc = per_client(
    "impala_total_inactive_sessions",
    "Total number of inactive sessions for an Impala client",
);
pub const INFLIGHT_QUERIES: MetricDesc = per_client(
    "impala_inflight_queries",
    "Number of inflight queries for an Impala client",
);
pub const TOTAL_QUERIES: MetricDesc = per_client(
    "impala_total_queries",
    "Total number of queries for an Impala client",
);

/// Per-client gauges, in emission order.
pub const CLIENT_METRICS: [MetricDesc; 6] = [
    TOTAL_CONNECTIONS,
    TOTAL_SESSIONS,
    TOTAL_ACTIVE_SESSIONS,
    TOTAL_INACTIVE_SESSIONS,
    INFLIGHT_QUERIES,
    TOTAL_QUERIES,
];

// ─── /queries ────────────────────────────────────────────────────

pub const INFLIGHT_QUERIES_COUNT: MetricDesc = per_server(
    "impala_inflight_queries_count",
    "Total number of in-flight queries",
);

/// A "slower than N seconds" bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlowQueryThreshold {
    pub seconds: u64,
    pub desc: MetricDesc,
}

const fn slow(seconds: u64, name: &'static str, help: &'static str) -> SlowQueryThreshold {
    SlowQueryThreshold {
        seconds,
        desc: per_server(name, help),
    }
}

/// Ascending by `seconds`.
pub const SLOW_QUERY_THRESHOLDS: [SlowQueryThreshold; 7] = [
    slow(10, "impala_slow10s_queries_count", "Number of queries slower than 10 seconds"),
    slow(30, "impala_slow30s_queries_count", "Number of queries slower than 30 seconds"),
    slow(60, "impala_slow1m_queries_count", "Number of queries slower than 1 minute"),
    slow(120, "impala_slow2m_queries_count", "Number of queries slower than 2 minutes"),
    slow(180, "impala_slow3m_queries_count", "Number of queries slower than 3 minutes"),
    slow(300, "impala_slow5m_queries_count", "Number of queries slower than 5 minutes"),
    slow(600, "impala_slow10m_queries_count", "Number of queries slower than 10 minutes"),
];

/// Every descriptor, per-client gauges first, then the in-flight count,
/// then one entry per threshold.
pub fn describe() -> impl Iterator<Item = &'static MetricDesc> {
    CLIENT_METRICS
        .iter()
        .chain(std::iter::once(&INFLIGHT_QUERIES_COUNT))
        .chain(SLOW_QUERY_THRESHOLDS.iter().map(|t| &t.desc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn describes_every_metric_once() {
        let names: Vec<&str> = describe().map(|d| d.name).collect();
        assert_eq!(names.len(), 14);
        assert_eq!(names.iter().collect::<HashSet<_>>().len(), 14);
        assert_eq!(names[6], "impala_inflight_queries_count");
        assert_eq!(names[13], "impala_slow10m_queries_count");
    }

    #[test]
    fn thresholds_are_ascending() {
        let secs: Vec<u64> = SLOW_QUERY_THRESHOLDS.iter().map(|t| t.seconds).collect();
        assert_eq!(secs, [10, 30, 60, 120, 180, 300, 600]);
    }

    #[test]
    fn label_schemas() {
        for desc in CLIENT_METRICS {
            assert_eq!(desc.labels, ["impala_server", "impala_client"]);
        }
        assert_eq!(INFLIGHT_QUERIES_COUNT.labels, ["impala_server"]);
        for t in SLOW_QUERY_THRESHOLDS {
            assert_eq!(t.desc.labels, ["impala_server"]);
        }
    }
}
