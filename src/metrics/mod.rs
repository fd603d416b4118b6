pub mod collector;
pub mod duration;
pub mod encode;
pub mod extract;
pub mod schema;

pub use collector::Exporter;
pub use schema::MetricDesc;

/// A single gauge observation produced by one scrape.
///
/// `label_values` line up with the label names of the metric's
/// [`MetricDesc`]: `[server]` or `[server, client]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRecord {
    /// e.g. "impala_total_sessions"
    pub name: &'static str,
    pub value: f64,
    pub label_values: Vec<String>,
}

impl MetricRecord {
    pub fn new(desc: &MetricDesc, value: f64, label_values: Vec<String>) -> Self {
        debug_assert_eq!(desc.labels.len(), label_values.len(), "{}", desc.name);
        Self {
            name: desc.name,
            value,
            label_values,
        }
    }
}
