pub mod dashboard;
pub mod expression;
pub mod group;
pub mod rule;
pub mod state;
pub mod target;
pub mod trigger;

pub use dashboard::Dashboard;
pub use expression::AlertExpression;
pub use group::{AlertGroup, AlertProvisioning};
pub use rule::AlertRule;
pub use state::{BackendKind, ExecErrState, ExpressionType, NoDataState, ReduceFunction, ReduceMode};
pub use target::{
    BucketAgg, BucketAggKind, CloudwatchMetricsTarget, ElasticsearchTarget, FilterQuery,
    MetricAgg, MetricAggKind, PrometheusTarget,
};
pub use trigger::Trigger;

/// 表达式节点使用的虚拟数据源 UID
pub const EXPRESSION_DATASOURCE_UID: &str = "__expr__";

/// 单指标规则的查询节点引用 ID
pub const QUERY_REF_ID: &str = "QUERY";

/// 单指标规则的归约节点引用 ID
pub const REDUCE_REF_ID: &str = "REDUCE_EXPRESSION";

/// 终止条件节点引用 ID
pub const CONDITION_REF_ID: &str = "ALERT_CONDITION";

/// 多指标规则中查询节点的引用 ID 后缀
pub const QUERY_REF_SUFFIX: &str = "-QUERY";
