use std::future::Future;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use tokio::time::{timeout_at, Instant};
use tracing::{debug, warn};

use super::extract::{query_metrics, session_metrics};
use super::schema::{self, MetricDesc};
use super::MetricRecord;
use crate::config::Target;
use crate::error::FetchError;
use crate::impala::{Endpoint, ImpalaClient};

// ─── Public types ────────────────────────────────────────────────

/// Polls every configured coordinator on demand and turns the answers into
/// [`MetricRecord`]s.
///
/// Holds nothing but immutable configuration, so any number of scrapes can
/// run against the same instance at once; each one does a full re-fetch.
pub struct Exporter {
    targets: Vec<Target>,
    client: ImpalaClient,
    max_concurrent_targets: usize,
    scrape_timeout: Duration,
}

// ─── Exporter impl ───────────────────────────────────────────────

impl Exporter {
    pub fn new(
        targets: Vec<Target>,
        client: ImpalaClient,
        max_concurrent_targets: usize,
        scrape_timeout: Duration,
    ) -> Self {
        Self {
            targets,
            client,
            max_concurrent_targets: max_concurrent_targets.max(1),
            scrape_timeout,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Every metric a scrape may produce, including one entry per
    /// slow-query threshold.
    pub fn describe(&self) -> impl Iterator<Item = &'static MetricDesc> {
        schema::describe()
    }

    /// Stream the records of one scrape.
    ///
    /// Targets are polled concurrently (bounded by `max_concurrent_targets`)
    /// but yielded in configured order. A target that fails contributes
    /// fewer records; the stream itself never fails.
    ///
    /// Every fetch shares one deadline, `scrape_timeout` from now. A fetch
    /// still pending at the deadline is dropped like a failed one, so the
    /// stream ends by then with whatever was already collected.
    pub fn collect(&self) -> impl Stream<Item = MetricRecord> + Send + '_ {
        let deadline = Instant::now() + self.scrape_timeout;

        stream::iter(&self.targets)
            .map(move |target| self.collect_target(target, deadline))
            .buffered(self.max_concurrent_targets)
            .flat_map(stream::iter)
    }

    /// Run one full scrape and gather the records.
    pub async fn scrape(&self) -> Vec<MetricRecord> {
        let start = Instant::now();
        let records: Vec<MetricRecord> = self.collect().collect().await;
        debug!(
            targets = self.targets.len(),
            records = records.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "scrape finished"
        );
        records
    }

    /// Sessions first, then queries. A failure in one phase never stops
    /// the other.
    async fn collect_target(&self, target: &Target, deadline: Instant) -> Vec<MetricRecord> {
        let mut records = Vec::new();

        let sessions = self.client.sessions(target);
        if let Some(sessions) = fetch_until(target, Endpoint::Sessions, deadline, sessions).await {
            records.extend(session_metrics(target, &sessions));
        }

        let queries = self.client.queries(target);
        if let Some(queries) = fetch_until(target, Endpoint::Queries, deadline, queries).await {
            records.extend(query_metrics(target, &queries));
        }

        records
    }
}

/// Await one fetch, logging and swallowing its failure or the deadline.
async fn fetch_until<T>(
    target: &Target,
    endpoint: Endpoint,
    deadline: Instant,
    fetch: impl Future<Output = Result<T, FetchError>>,
) -> Option<T> {
    match timeout_at(deadline, fetch).await {
        Ok(Ok(payload)) => Some(payload),
        Ok(Err(e)) => {
            warn!(
                server = %target,
                endpoint = endpoint.path(),
                error = %e,
                "skipping endpoint for this scrape"
            );
            None
        }
        Err(_) => {
            warn!(
                server = %target,
                endpoint = endpoint.path(),
                "scrape deadline reached, skipping endpoint"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{coordinator, silent_target, target_of};

    const SESSIONS: &str = r#"{"client_hosts":[
        {"hostname":"etl-1","total_connections":4,"total_sessions":3,"total_active_sessions":2,
         "total_inactive_sessions":1,"inflight_queries":1,"total_queries":57},
        {"hostname":"bi-2","total_connections":1,"total_sessions":1,"total_active_sessions":1,
         "total_inactive_sessions":0,"inflight_queries":0,"total_queries":9}
    ]}"#;
    const QUERIES: &str =
        r#"{"in_flight_queries":[{"duration":"5s"},{"duration":"15s"},{"duration":"1m5s"},{"duration":"10m5s"}]}"#;

    fn exporter(targets: Vec<Target>) -> Exporter {
        let client = ImpalaClient::new(Duration::from_secs(5)).unwrap();
        Exporter::new(targets, client, 4, Duration::from_secs(30))
    }

    fn from_server<'a>(records: &'a [MetricRecord], server: &Target) -> Vec<&'a MetricRecord> {
        records
            .iter()
            .filter(|r| r.label_values[0] == server.as_str())
            .collect()
    }

    #[tokio::test]
    async fn healthy_target_emits_sessions_then_queries() {
        let server = coordinator((200, SESSIONS), (200, QUERIES)).await;
        let target = target_of(&server);

        let records = exporter(vec![target.clone()]).scrape().await;

        // 2 clients * 6 gauges + in-flight count + 7 thresholds
        assert_eq!(records.len(), 20);
        assert!(records[..12].iter().all(|r| r.label_values.len() == 2));
        assert_eq!(records[12].name, "impala_inflight_queries_count");
        assert_eq!(records[12].value, 4.0);
        assert_eq!(records[13].name, "impala_slow10s_queries_count");
        assert_eq!(records[13].value, 3.0);
        assert_eq!(records[19].name, "impala_slow10m_queries_count");
        assert_eq!(records[19].value, 1.0);
    }

    #[tokio::test]
    async fn failing_target_does_not_block_others() {
        let broken = coordinator((500, "oops"), (200, QUERIES)).await;
        let healthy = coordinator((200, SESSIONS), (200, QUERIES)).await;
        let unreachable: Target = "127.0.0.1:1".parse().unwrap();
        let (a, b) = (target_of(&broken), target_of(&healthy));

        let records = exporter(vec![a.clone(), unreachable.clone(), b.clone()])
            .scrape()
            .await;

        let from_a = from_server(&records, &a);
        assert_eq!(from_a.len(), 8, "only query metrics from the broken target");
        assert!(from_a.iter().all(|r| r.label_values.len() == 1));

        assert!(from_server(&records, &unreachable).is_empty());
        assert_eq!(from_server(&records, &b).len(), 20);
    }

    #[tokio::test]
    async fn undecodable_queries_keep_session_metrics() {
        let server = coordinator((200, SESSIONS), (200, "not json")).await;
        let target = target_of(&server);

        let records = exporter(vec![target]).scrape().await;
        assert_eq!(records.len(), 12);
    }

    #[tokio::test]
    async fn output_follows_configured_target_order() {
        let first = coordinator((200, SESSIONS), (200, QUERIES)).await;
        let second = coordinator((200, r#"{"client_hosts":[]}"#), (200, "{}")).await;
        let (a, b) = (target_of(&first), target_of(&second));

        let records = exporter(vec![b.clone(), a.clone()]).scrape().await;
        assert_eq!(records.len(), 28);
        assert!(records[..8].iter().all(|r| r.label_values[0] == b.as_str()));
        assert!(records[8..].iter().all(|r| r.label_values[0] == a.as_str()));
    }

    #[tokio::test]
    async fn empty_target_emits_counts_but_no_client_gauges() {
        let server = coordinator(
            (200, r#"{"client_hosts":[]}"#),
            (200, r#"{"in_flight_queries":[]}"#),
        )
        .await;

        let records = exporter(vec![target_of(&server)]).scrape().await;
        assert_eq!(records.len(), 8);
        assert!(records.iter().all(|r| r.value == 0.0));
    }

    #[tokio::test]
    async fn identical_payloads_give_identical_scrapes() {
        let server = coordinator((200, SESSIONS), (200, QUERIES)).await;
        let exporter = exporter(vec![target_of(&server)]);

        let first = exporter.scrape().await;
        let second = exporter.scrape().await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn unreachable_fleet_yields_nothing() {
        let exporter = exporter(vec!["127.0.0.1:1".parse().unwrap()]);
        assert!(exporter.scrape().await.is_empty());
        assert_eq!(exporter.describe().count(), 14);
    }

    #[tokio::test]
    async fn deadline_keeps_records_gathered_so_far() {
        let healthy = coordinator((200, SESSIONS), (200, QUERIES)).await;
        let healthy_target = target_of(&healthy);
        let targets = vec![
            healthy_target.clone(),
            silent_target().await,
            silent_target().await,
        ];

        // fetch timeout well past the scrape deadline, one target at a time
        let client = ImpalaClient::new(Duration::from_secs(10)).unwrap();
        let exporter = Exporter::new(targets, client, 1, Duration::from_secs(1));

        let start = std::time::Instant::now();
        let records = exporter.scrape().await;

        assert!(start.elapsed() < Duration::from_secs(3), "took {:?}", start.elapsed());
        assert_eq!(records.len(), 20);
        assert_eq!(from_server(&records, &healthy_target).len(), 20);
    }
}
