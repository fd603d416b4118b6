//! Stateless payload → record transforms. One call per target per scrape.

use tracing::warn;

use super::duration::parse_duration;
use super::schema::{CLIENT_METRICS, INFLIGHT_QUERIES_COUNT, SLOW_QUERY_THRESHOLDS};
use super::MetricRecord;
use crate::config::Target;
use crate::impala::{ClientHost, QueriesResponse, SessionsResponse};

impl ClientHost {
    /// Counter values in the same order as `CLIENT_METRICS`.
    fn values(&self) -> [u64; 6] {
        [
            self.total_connections,
            self.total_sessions,
            self.total_active_sessions,
            self.total_inactive_sessions,
            self.inflight_queries,
            self.total_queries,
        ]
    }
}

/// Six gauges per client host, in payload order. Duplicate hostnames are
/// passed through as-is.
pub fn session_metrics(target: &Target, sessions: &SessionsResponse) -> Vec<MetricRecord> {
    let mut records = Vec::with_capacity(sessions.client_hosts.len() * CLIENT_METRICS.len());

    for client in &sessions.client_hosts {
        for (desc, value) in CLIENT_METRICS.iter().zip(client.values()) {
            records.push(MetricRecord::new(
                desc,
                value as f64,
                vec![target.to_string(), client.hostname.clone()],
            ));
        }
    }

    records
}

/// The in-flight count plus one "slower than" count per threshold.
///
/// Every threshold is emitted even when nothing exceeds it. A query whose
/// duration cannot be parsed still counts as in flight but lands in no
/// bucket.
pub fn query_metrics(target: &Target, queries: &QueriesResponse) -> Vec<MetricRecord> {
    let mut slow_counts = [0u64; SLOW_QUERY_THRESHOLDS.len()];

    for query in &queries.in_flight_queries {
        let seconds = match parse_duration(&query.duration) {
            Ok(seconds) => seconds,
            Err(e) => {
                warn!(
                    server = %target,
                    duration = %query.duration,
                    error = %e,
                    "skipping query with unparseable duration"
                );
                continue;
            }
        };

        for (count, threshold) in slow_counts.iter_mut().zip(&SLOW_QUERY_THRESHOLDS) {
            if seconds > threshold.seconds as f64 {
                *count += 1;
            }
        }
    }

    let mut records = Vec::with_capacity(1 + SLOW_QUERY_THRESHOLDS.len());
    records.push(MetricRecord::new(
        &INFLIGHT_QUERIES_COUNT,
        queries.in_flight_queries.len() as f64,
        vec![target.to_string()],
    ));
    for (count, threshold) in slow_counts.iter().zip(&SLOW_QUERY_THRESHOLDS) {
        records.push(MetricRecord::new(
            &threshold.desc,
            *count as f64,
            vec![target.to_string()],
        ));
    }

    records
}
