use std::collections::HashMap;

use prometheus::{GaugeVec, Opts, Registry, TextEncoder};
use tracing::warn;

use super::{MetricDesc, MetricRecord};

/// Render one scrape's records in the Prometheus text exposition format.
///
/// A throwaway registry is built per call, with one gauge family per
/// descriptor. Families that received no records are left out of the
/// output. Two records with the same name and label values collapse into
/// one series holding the later value.
pub fn render<'a>(
    descs: impl IntoIterator<Item = &'a MetricDesc>,
    records: &[MetricRecord],
) -> prometheus::Result<String> {
    let registry = Registry::new();
    let mut families: HashMap<&str, GaugeVec> = HashMap::new();

    for desc in descs {
        let gauge = GaugeVec::new(Opts::new(desc.name, desc.help), desc.labels)?;
        registry.register(Box::new(gauge.clone()))?;
        families.insert(desc.name, gauge);
    }

    for record in records {
        let Some(gauge) = families.get(record.name) else {
            warn!(metric = record.name, "dropping record for undescribed metric");
            continue;
        };
        let label_values: Vec<&str> = record.label_values.iter().map(String::as_str).collect();
        gauge
            .get_metric_with_label_values(label_values.as_slice())?
            .set(record.value);
    }

    let mut out = String::new();
    TextEncoder::new().encode_utf8(&registry.gather(), &mut out)?;
    Ok(out)
}
