pub mod builder;
pub mod compiler;
pub mod group;
pub mod intent;
pub mod panel;
pub mod registry;

pub use builder::{AlertRuleBuilder, Backend, BuilderConfig};
pub use group::AlertRulesGroup;
pub use intent::{
    AlertIntent, CloudwatchMetric, ElasticsearchQuery, Metric, MetricSpec, NamedMetric,
    PrometheusMetric,
};
pub use panel::{Panel, PanelAlert, Threshold};
pub use registry::IntentRegistry;
