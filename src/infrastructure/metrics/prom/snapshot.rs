//! Reading and exporting gathered snapshots.

use crate::domain::{MetricsError, Result};
use prometheus::proto::{Metric, MetricFamily};
use prometheus::{Encoder, TextEncoder};
use std::collections::HashSet;

/// Check a gathered snapshot for internal consistency.
///
/// Family names must be unique, and every metric in a family must carry the
/// same set of label names.
///
/// `prometheus::Registry::gather` already merges families sharing a name, so
/// on a registry snapshot only the label-schema check can fail. The
/// uniqueness check covers snapshots assembled by hand, e.g. by concatenating
/// the output of several gatherers.
pub(crate) fn validate(families: &[MetricFamily]) -> Result<()> {
    // ---
    let mut seen = HashSet::with_capacity(families.len());

    for family in families {
        let name = family.get_name();
        if !seen.insert(name) {
            return Err(MetricsError::GatherFailure(format!(
                "duplicate metric family `{name}`"
            )));
        }

        let mut metrics = family.get_metric().iter();
        let Some(first) = metrics.next() else {
            continue;
        };
        let schema = label_names(first);
        if let Some(bad) = metrics.find(|m| label_names(m) != schema) {
            return Err(MetricsError::GatherFailure(format!(
                "metric family `{name}` mixes label schemas {schema:?} and {:?}",
                label_names(bad)
            )));
        }
    }

    Ok(())
}

/// Encode a snapshot in the Prometheus text exposition format.
pub(crate) fn encode_text(families: &[MetricFamily]) -> Result<String> {
    // ---
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(families, &mut buffer)
        .map_err(MetricsError::Encode)?;

    String::from_utf8(buffer)
        .map_err(|err| MetricsError::Encode(prometheus::Error::Msg(err.to_string())))
}

/// Find the metric of `family_name` whose `label` equals `value`.
pub(crate) fn find_metric<'a>(
    families: &'a [MetricFamily],
    family_name: &str,
    label: &str,
    value: &str,
) -> Option<&'a Metric> {
    families
        .iter()
        .find(|family| family.get_name() == family_name)?
        .get_metric()
        .iter()
        .find(|metric| {
            metric
                .get_label()
                .iter()
                .any(|pair| pair.get_name() == label && pair.get_value() == value)
        })
}

fn label_names(metric: &Metric) -> Vec<&str> {
    let mut names: Vec<&str> = metric.get_label().iter().map(|l| l.get_name()).collect();
    names.sort_unstable();
    names
}
