use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// CloudWatch 指标查询目标
#[derive(Debug, Clone, PartialEq)]
pub struct CloudwatchMetricsTarget {
    pub ref_id: String,
    pub namespace: String,
    pub metric_name: String,
    pub statistics: Vec<String>,
    pub dimensions: BTreeMap<String, String>,
    pub datasource: String,
    pub match_exact: bool,
    pub region: String,
    pub period: String,
    pub alias: String,
    pub hide: bool,
}

impl CloudwatchMetricsTarget {
    pub fn to_json_data(&self) -> Value {
        json!({
            "alias": self.alias,
            "datasource": self.datasource,
            "dimensions": self.dimensions,
            "expression": "",
            "hide": self.hide,
            "id": "",
            "matchExact": self.match_exact,
            "metricEditorMode": 0,
            "metricName": self.metric_name,
            "metricQueryType": 0,
            "namespace": self.namespace,
            "period": self.period,
            "queryMode": "Metrics",
            "refId": self.ref_id,
            "region": self.region,
            "statistics": self.statistics,
        })
    }
}

/// Prometheus 查询目标
#[derive(Debug, Clone, PartialEq)]
pub struct PrometheusTarget {
    pub ref_id: String,
    pub expr: String,
    pub legend_format: String,
    pub datasource: String,
    pub interval: String,
    pub instant: bool,
    pub hide: bool,
}

impl PrometheusTarget {
    pub fn to_json_data(&self) -> Value {
        json!({
            "datasource": self.datasource,
            "expr": self.expr,
            "format": "time_series",
            "hide": self.hide,
            "instant": self.instant,
            "interval": self.interval,
            "intervalFactor": 2,
            "legendFormat": self.legend_format,
            "refId": self.ref_id,
        })
    }
}

/// Elasticsearch 过滤器分组中的单个过滤条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterQuery {
    #[serde(default)]
    pub label: String,
    pub query: String,
}

/// Elasticsearch 桶聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketAgg {
    /// 聚合 ID（为空时可由 `auto_bucket_agg_ids` 自动分配）
    #[serde(default)]
    pub id: Option<u32>,

    #[serde(flatten)]
    pub kind: BucketAggKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BucketAggKind {
    DateHistogram {
        #[serde(default = "default_time_field")]
        field: String,
        #[serde(default = "default_histogram_interval")]
        interval: String,
        #[serde(default)]
        min_doc_count: u64,
    },
    Terms {
        field: String,
        #[serde(default)]
        size: u32,
        #[serde(default = "default_terms_order")]
        order: String,
        #[serde(default = "default_terms_order_by")]
        order_by: String,
        #[serde(default = "default_min_doc_count")]
        min_doc_count: u64,
    },
    Filters {
        #[serde(default)]
        filters: Vec<FilterQuery>,
    },
}

fn default_time_field() -> String {
    "@timestamp".to_string()
}

fn default_histogram_interval() -> String {
    "auto".to_string()
}

fn default_terms_order() -> String {
    "desc".to_string()
}

fn default_terms_order_by() -> String {
    "_term".to_string()
}

fn default_min_doc_count() -> u64 {
    1
}

impl BucketAgg {
    pub fn new(kind: BucketAggKind) -> Self {
        Self { id: None, kind }
    }

    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn to_json_data(&self) -> Value {
        let id = self.id.map(|id| id.to_string()).unwrap_or_default();
        match &self.kind {
            BucketAggKind::DateHistogram { field, interval, min_doc_count } => json!({
                "field": field,
                "id": id,
                "settings": {
                    "interval": interval,
                    "min_doc_count": min_doc_count,
                    "trimEdges": 0,
                },
                "type": "date_histogram",
            }),
            BucketAggKind::Terms { field, size, order, order_by, min_doc_count } => json!({
                "field": field,
                "id": id,
                "settings": {
                    "min_doc_count": min_doc_count,
                    "order": order,
                    "orderBy": order_by,
                    "size": size.to_string(),
                },
                "type": "terms",
            }),
            BucketAggKind::Filters { filters } => json!({
                "id": id,
                "settings": {
                    "filters": filters
                        .iter()
                        .map(|f| json!({ "label": f.label, "query": f.query }))
                        .collect::<Vec<_>>(),
                },
                "type": "filters",
            }),
        }
    }
}

/// Elasticsearch 指标聚合类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricAggKind {
    Count,
    Avg,
    Sum,
    Min,
    Max,
    Cardinality,
}

impl MetricAggKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Avg => "avg",
            Self::Sum => "sum",
            Self::Min => "min",
            Self::Max => "max",
            Self::Cardinality => "cardinality",
        }
    }
}

/// Elasticsearch 指标聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricAgg {
    #[serde(default)]
    pub id: u32,

    #[serde(rename = "type")]
    pub kind: MetricAggKind,

    /// 聚合字段（count 不需要）
    #[serde(default)]
    pub field: Option<String>,

    #[serde(default)]
    pub hide: bool,
}

impl MetricAgg {
    pub fn count() -> Self {
        Self {
            id: 0,
            kind: MetricAggKind::Count,
            field: None,
            hide: false,
        }
    }

    pub fn on_field(kind: MetricAggKind, field: impl Into<String>) -> Self {
        Self {
            id: 0,
            kind,
            field: Some(field.into()),
            hide: false,
        }
    }

    pub fn to_json_data(&self) -> Value {
        json!({
            "field": self.field.as_deref().unwrap_or("select field"),
            "hide": self.hide,
            "id": self.id.to_string(),
            "inlineScript": "",
            "settings": {},
            "type": self.kind.as_str(),
        })
    }
}

/// Elasticsearch 查询目标
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticsearchTarget {
    pub ref_id: String,
    pub query: String,
    pub bucket_aggs: Vec<BucketAgg>,
    pub metric_aggs: Vec<MetricAgg>,
    pub interval_ms: u64,
    pub datasource: String,
    pub time_field: String,
    pub alias: String,
    pub hide: bool,
}

impl ElasticsearchTarget {
    pub fn new(ref_id: impl Into<String>, query: impl Into<String>, datasource: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            query: query.into(),
            bucket_aggs: Vec::new(),
            metric_aggs: vec![MetricAgg::count()],
            interval_ms: 1000,
            datasource: datasource.into(),
            time_field: default_time_field(),
            alias: String::new(),
            hide: false,
        }
    }

    /// 为缺少 ID 的桶聚合依次分配未被占用的最小正整数 ID
    pub fn auto_bucket_agg_ids(mut self) -> Self {
        let taken: Vec<u32> = self.bucket_aggs.iter().filter_map(|agg| agg.id).collect();
        let mut next = 1u32;

        for agg in self.bucket_aggs.iter_mut().filter(|agg| agg.id.is_none()) {
            while taken.contains(&next) {
                next += 1;
            }
            agg.id = Some(next);
            next += 1;
        }

        self
    }

    pub fn to_json_data(&self) -> Value {
        json!({
            "alias": self.alias,
            "bucketAggs": self.bucket_aggs.iter().map(BucketAgg::to_json_data).collect::<Vec<_>>(),
            "datasource": self.datasource,
            "hide": self.hide,
            "intervalMs": self.interval_ms,
            "metrics": self.metric_aggs.iter().map(MetricAgg::to_json_data).collect::<Vec<_>>(),
            "query": self.query,
            "refId": self.ref_id,
            "timeField": self.time_field,
        })
    }
}
