use grit_core::{GritError, Result};
use grit_types::PrometheusTarget;

use super::resolve_datasource;
use crate::builder::BuilderConfig;
use crate::intent::PrometheusMetric;

const DEFAULT_DATASOURCE: &str = "prometheus";

pub(super) fn query_target(
    config: &BuilderConfig,
    title: &str,
    metric: &PrometheusMetric,
    ref_id: &str,
) -> Result<PrometheusTarget> {
    if metric.expr.trim().is_empty() {
        return Err(GritError::missing_field(title, "expr"));
    }

    Ok(PrometheusTarget {
        ref_id: ref_id.to_string(),
        expr: metric.expr.clone(),
        legend_format: metric.legend_format.clone(),
        datasource: resolve_datasource(metric.datasource.as_ref(), config.datasource.as_ref(), DEFAULT_DATASOURCE),
        interval: String::new(),
        instant: false,
        hide: false,
    })
}
