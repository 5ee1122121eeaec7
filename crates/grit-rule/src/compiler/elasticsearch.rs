use grit_core::{GritError, Result};
use grit_types::{ElasticsearchTarget, MetricAgg};

use super::non_blank;
use crate::builder::BuilderConfig;
use crate::intent::ElasticsearchQuery;

pub(crate) const STATUS_ANNOTATION: &str = "status";

/// 渲染最后一个实例及其取值
pub(crate) const STATUS_TEMPLATE: &str = "{{- with $values -}}{{- $lastValue := \"\" -}}{{- $lastInstance := \"\" -}}{{- range $k, $v := . -}}{{- $lastValue = $v -}}{{- $lastInstance = $v.Labels -}}{{- end -}}\nInstance: {{ $lastInstance }} | Value:   {{ $lastValue }}{{- end -}}";

pub(super) fn query_target(
    config: &BuilderConfig,
    title: &str,
    query: &ElasticsearchQuery,
    ref_id: &str,
) -> Result<ElasticsearchTarget> {
    // Elasticsearch 没有通用默认数据源
    let datasource = non_blank(query.datasource.as_ref())
        .or(non_blank(config.datasource.as_ref()))
        .ok_or_else(|| GritError::missing_field(title, "datasource"))?;

    let metric_aggs = if query.metric_aggs.is_empty() {
        vec![MetricAgg::count()]
    } else {
        query.metric_aggs.clone()
    };

    let target = ElasticsearchTarget {
        bucket_aggs: query.bucket_aggs.clone(),
        metric_aggs,
        interval_ms: query.interval_ms,
        ..ElasticsearchTarget::new(ref_id, query.query.clone(), datasource)
    };

    if query.auto_bucket_agg_ids {
        Ok(target.auto_bucket_agg_ids())
    } else {
        Ok(target)
    }
}
