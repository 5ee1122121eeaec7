use grit_core::TimeRange;
use grit_types::{BackendKind, BucketAgg, ExecErrState, MetricAgg, NoDataState, ReduceFunction};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// CloudWatch 指标选择器
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudwatchMetric {
    /// 指标名称，如 "CPUUtilization"
    pub name: String,

    /// 命名空间（为空时使用构建器默认值）
    #[serde(default)]
    pub namespace: Option<String>,

    /// 统计方式，如 ["Average"]
    #[serde(default)]
    pub statistics: Vec<String>,

    #[serde(default)]
    pub dimensions: BTreeMap<String, String>,

    #[serde(default)]
    pub match_exact: Option<bool>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub datasource: Option<String>,
}

impl CloudwatchMetric {
    pub fn new(name: impl Into<String>, statistics: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            statistics,
            dimensions: BTreeMap::new(),
            match_exact: None,
            region: None,
            datasource: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(key.into(), value.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Prometheus 查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrometheusMetric {
    /// PromQL 表达式
    pub expr: String,

    #[serde(default)]
    pub legend_format: String,

    #[serde(default)]
    pub datasource: Option<String>,
}

impl PrometheusMetric {
    pub fn new(expr: impl Into<String>) -> Self {
        Self {
            expr: expr.into(),
            legend_format: String::new(),
            datasource: None,
        }
    }

    pub fn with_legend_format(mut self, legend_format: impl Into<String>) -> Self {
        self.legend_format = legend_format.into();
        self
    }
}

/// Elasticsearch 聚合查询
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElasticsearchQuery {
    /// Lucene 查询语句
    #[serde(default)]
    pub query: String,

    #[serde(default)]
    pub bucket_aggs: Vec<BucketAgg>,

    #[serde(default = "default_metric_aggs")]
    pub metric_aggs: Vec<MetricAgg>,

    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    #[serde(default)]
    pub datasource: Option<String>,

    /// 自动为缺少 ID 的桶聚合分配 ID
    #[serde(default)]
    pub auto_bucket_agg_ids: bool,
}

fn default_metric_aggs() -> Vec<MetricAgg> {
    vec![MetricAgg::count()]
}

fn default_interval_ms() -> u64 {
    1000
}

impl ElasticsearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            bucket_aggs: Vec::new(),
            metric_aggs: default_metric_aggs(),
            interval_ms: default_interval_ms(),
            datasource: None,
            auto_bucket_agg_ids: false,
        }
    }

    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    pub fn with_bucket_aggs(mut self, bucket_aggs: Vec<BucketAgg>) -> Self {
        self.bucket_aggs = bucket_aggs;
        self
    }

    pub fn with_metric_aggs(mut self, metric_aggs: Vec<MetricAgg>) -> Self {
        self.metric_aggs = metric_aggs;
        self
    }

    pub fn with_auto_bucket_agg_ids(mut self) -> Self {
        self.auto_bucket_agg_ids = true;
        self
    }
}

/// 后端相关的指标查询
#[derive(Debug, Clone, PartialEq)]
pub enum Metric {
    Cloudwatch(CloudwatchMetric),
    Prometheus(PrometheusMetric),
    Elasticsearch(ElasticsearchQuery),
}

impl Metric {
    pub fn backend(&self) -> BackendKind {
        match self {
            Self::Cloudwatch(_) => BackendKind::Cloudwatch,
            Self::Prometheus(_) => BackendKind::Prometheus,
            Self::Elasticsearch(_) => BackendKind::Elasticsearch,
        }
    }
}

impl From<CloudwatchMetric> for Metric {
    fn from(metric: CloudwatchMetric) -> Self {
        Self::Cloudwatch(metric)
    }
}

impl From<PrometheusMetric> for Metric {
    fn from(metric: PrometheusMetric) -> Self {
        Self::Prometheus(metric)
    }
}

impl From<ElasticsearchQuery> for Metric {
    fn from(query: ElasticsearchQuery) -> Self {
        Self::Elasticsearch(query)
    }
}

/// 多指标规则中的命名子指标
#[derive(Debug, Clone, PartialEq)]
pub struct NamedMetric {
    /// 归约节点引用 ID，查询节点为 `<ref_id>-QUERY`
    pub ref_id: String,
    pub metric: Metric,
}

impl NamedMetric {
    pub fn new(ref_id: impl Into<String>, metric: impl Into<Metric>) -> Self {
        Self {
            ref_id: ref_id.into(),
            metric: metric.into(),
        }
    }
}

/// 单指标或多指标
#[derive(Debug, Clone, PartialEq)]
pub enum MetricSpec {
    Single(Metric),
    Multi(Vec<NamedMetric>),
}

impl From<Metric> for MetricSpec {
    fn from(metric: Metric) -> Self {
        Self::Single(metric)
    }
}

impl From<CloudwatchMetric> for MetricSpec {
    fn from(metric: CloudwatchMetric) -> Self {
        Self::Single(metric.into())
    }
}

impl From<PrometheusMetric> for MetricSpec {
    fn from(metric: PrometheusMetric) -> Self {
        Self::Single(metric.into())
    }
}

impl From<ElasticsearchQuery> for MetricSpec {
    fn from(query: ElasticsearchQuery) -> Self {
        Self::Single(query.into())
    }
}

impl From<Vec<NamedMetric>> for MetricSpec {
    fn from(metrics: Vec<NamedMetric>) -> Self {
        Self::Multi(metrics)
    }
}

/// 已注册、尚未编译的告警声明
#[derive(Debug, Clone, PartialEq)]
pub struct AlertIntent {
    /// 规则标题（同时用于派生 UID）
    pub title: String,

    pub metric: MetricSpec,

    pub reduce_function: ReduceFunction,

    /// 条件表达式，如 "$REDUCE_EXPRESSION > 90"
    pub condition: String,

    pub time_range: TimeRange,

    /// 告警摘要，写入 `summary` 注解
    pub summary: String,

    pub labels: BTreeMap<String, String>,

    /// 额外注解，优先于自动生成的注解
    pub annotations: BTreeMap<String, String>,

    pub panel_id: u32,
    pub no_data_state: NoDataState,
    pub exec_err_state: ExecErrState,
}

impl AlertIntent {
    pub fn new(
        title: impl Into<String>,
        metric: impl Into<MetricSpec>,
        condition: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            metric: metric.into(),
            reduce_function: ReduceFunction::default(),
            condition: condition.into(),
            time_range: TimeRange::default(),
            summary: String::new(),
            labels: BTreeMap::new(),
            annotations: BTreeMap::new(),
            panel_id: 0,
            no_data_state: NoDataState::default(),
            exec_err_state: ExecErrState::default(),
        }
    }

    pub fn with_reduce_function(mut self, function: ReduceFunction) -> Self {
        self.reduce_function = function;
        self
    }

    pub fn with_time_range(mut self, time_range: TimeRange) -> Self {
        self.time_range = time_range;
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_labels(mut self, labels: BTreeMap<String, String>) -> Self {
        self.labels.extend(labels);
        self
    }

    pub fn with_annotation(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.annotations.insert(key.into(), value.into());
        self
    }

    pub fn with_panel_id(mut self, panel_id: u32) -> Self {
        self.panel_id = panel_id;
        self
    }

    pub fn with_no_data_state(mut self, state: NoDataState) -> Self {
        self.no_data_state = state;
        self
    }

    pub fn with_exec_err_state(mut self, state: ExecErrState) -> Self {
        self.exec_err_state = state;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_defaults() {
        let intent = AlertIntent::new(
            "High CPU",
            PrometheusMetric::new("rate(cpu[5m])"),
            "$REDUCE_EXPRESSION > 90",
        );

        assert_eq!(intent.reduce_function, ReduceFunction::Last);
        assert_eq!(intent.time_range, TimeRange::new("5m", "now"));
        assert_eq!(intent.no_data_state, NoDataState::KeepLast);
        assert_eq!(intent.exec_err_state, ExecErrState::Alerting);
        assert!(matches!(intent.metric, MetricSpec::Single(Metric::Prometheus(_))));
    }

    #[test]
    fn test_elasticsearch_query_defaults_from_json() {
        let query: ElasticsearchQuery = serde_json::from_str(r#"{"query": "level:error"}"#).unwrap();
        assert_eq!(query.metric_aggs, vec![MetricAgg::count()]);
        assert_eq!(query.interval_ms, 1000);
        assert!(!query.auto_bucket_agg_ids);
    }
}
