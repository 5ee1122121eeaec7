use grit_core::{GritError, Result};
use grit_types::CloudwatchMetricsTarget;

use super::{non_blank, resolve_datasource};
use crate::builder::BuilderConfig;
use crate::intent::CloudwatchMetric;

const DEFAULT_DATASOURCE: &str = "cloudwatch";
const DEFAULT_REGION: &str = "default";

pub(super) fn query_target(
    metric_namespace: &str,
    config: &BuilderConfig,
    title: &str,
    metric: &CloudwatchMetric,
    ref_id: &str,
) -> Result<CloudwatchMetricsTarget> {
    if metric.name.trim().is_empty() {
        return Err(GritError::missing_field(title, "name"));
    }
    if metric.statistics.is_empty() {
        return Err(GritError::missing_field(title, "statistics"));
    }

    Ok(CloudwatchMetricsTarget {
        ref_id: ref_id.to_string(),
        namespace: non_blank(metric.namespace.as_ref())
            .unwrap_or(metric_namespace)
            .to_string(),
        metric_name: metric.name.clone(),
        statistics: metric.statistics.clone(),
        dimensions: metric.dimensions.clone(),
        datasource: resolve_datasource(metric.datasource.as_ref(), config.datasource.as_ref(), DEFAULT_DATASOURCE),
        match_exact: metric.match_exact.unwrap_or(true),
        region: non_blank(metric.region.as_ref())
            .unwrap_or(DEFAULT_REGION)
            .to_string(),
        period: String::new(),
        alias: String::new(),
        hide: false,
    })
}
