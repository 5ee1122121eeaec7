use anyhow::{anyhow, bail, Context, Result};
use grit_core::TimeRange;
use grit_rule::{
    AlertIntent, AlertRuleBuilder, Backend, BuilderConfig, CloudwatchMetric, ElasticsearchQuery,
    Metric, MetricSpec, NamedMetric, PrometheusMetric,
};
use grit_types::{BackendKind, ExecErrState, NoDataState, ReduceFunction};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::environment::EnvironmentConfig;

/// alerts/*.toml 文件内容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertFile {
    #[serde(default)]
    pub groups: Vec<GroupDefinition>,
}

/// 告警组定义
#[derive(Debug, Clone, Deserialize)]
pub struct GroupDefinition {
    pub name: String,

    #[serde(default = "default_folder")]
    pub folder: String,

    #[serde(default = "default_interval")]
    pub interval: String,

    #[serde(default)]
    pub builders: Vec<BuilderDefinition>,
}

/// 构建器定义
#[derive(Debug, Clone, Deserialize)]
pub struct BuilderDefinition {
    pub backend: BackendKind,

    #[serde(default = "default_evaluate_for")]
    pub evaluate_for: String,

    #[serde(default)]
    pub dashboard_uid: String,

    /// 覆盖环境配置中的默认数据源
    #[serde(default)]
    pub datasource: Option<String>,

    /// CloudWatch 必填
    #[serde(default)]
    pub metric_namespace: Option<String>,

    #[serde(default)]
    pub lenient_time_ranges: bool,

    #[serde(default)]
    pub alerts: Vec<AlertDefinition>,
}

/// 告警声明定义
///
/// `metric` 与 `metrics` 二选一；其字段按所属构建器的后端解析。
#[derive(Debug, Clone, Deserialize)]
pub struct AlertDefinition {
    pub title: String,
    pub condition: String,

    #[serde(default)]
    pub summary: String,

    #[serde(default)]
    pub reduce_function: ReduceFunction,

    #[serde(default)]
    pub time_range: Option<TimeRange>,

    #[serde(default)]
    pub labels: BTreeMap<String, String>,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default)]
    pub panel_id: u32,

    #[serde(default)]
    pub no_data_state: NoDataState,

    #[serde(default)]
    pub exec_err_state: ExecErrState,

    #[serde(default)]
    pub metric: Option<toml::Value>,

    #[serde(default)]
    pub metrics: Vec<NamedMetricDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedMetricDefinition {
    pub ref_id: String,
    pub metric: toml::Value,
}

/// dashboards/*.toml 文件内容
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardFile {
    #[serde(default)]
    pub dashboards: Vec<DashboardDefinition>,
}

/// 仪表盘定义：指向一个 JSON 模型文件
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardDefinition {
    pub uuid: String,

    #[serde(default)]
    pub folder: String,

    /// 相对于 dashboards 目录的模型文件路径
    pub path: PathBuf,
}

fn default_folder() -> String {
    "alert".to_string()
}

fn default_interval() -> String {
    "1m".to_string()
}

fn default_evaluate_for() -> String {
    "5m".to_string()
}

impl BuilderDefinition {
    fn backend(&self) -> Result<Backend> {
        match self.backend {
            BackendKind::Cloudwatch => {
                let metric_namespace = self
                    .metric_namespace
                    .clone()
                    .ok_or_else(|| anyhow!("cloudwatch builder requires metric_namespace"))?;
                Ok(Backend::Cloudwatch { metric_namespace })
            }
            BackendKind::Prometheus => Ok(Backend::Prometheus),
            BackendKind::Elasticsearch => Ok(Backend::Elasticsearch),
        }
    }

    /// 创建构建器并注册全部声明
    ///
    /// `force_lenient` 为 true 时忽略定义中的设置，统一宽松解析时间标记。
    pub fn to_builder(&self, env: &EnvironmentConfig, force_lenient: bool) -> Result<AlertRuleBuilder> {
        let mut config = BuilderConfig::new(self.evaluate_for.clone())
            .with_dashboard_uid(self.dashboard_uid.clone())
            .with_lenient_time_ranges(self.lenient_time_ranges || force_lenient);

        if let Some(datasource) = self.datasource.as_ref().or(env.datasource_for(self.backend)) {
            config = config.with_datasource(datasource.clone());
        }

        let mut builder = AlertRuleBuilder::new(env.environment(), self.backend()?, config)?;
        for alert in &self.alerts {
            let intent = alert
                .to_intent(self.backend)
                .with_context(|| format!("invalid alert definition '{}'", alert.title))?;
            builder.register(intent);
        }

        Ok(builder)
    }
}

impl AlertDefinition {
    pub fn to_intent(&self, backend: BackendKind) -> Result<AlertIntent> {
        let metric = match (&self.metric, self.metrics.is_empty()) {
            (Some(metric), true) => MetricSpec::Single(parse_metric(backend, metric.clone())?),
            (None, false) => MetricSpec::Multi(
                self.metrics
                    .iter()
                    .map(|named| {
                        Ok(NamedMetric::new(
                            named.ref_id.clone(),
                            parse_metric(backend, named.metric.clone())?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            (Some(_), false) => bail!("set either `metric` or `metrics`, not both"),
            (None, true) => bail!("missing `metric`"),
        };

        let mut intent = AlertIntent::new(self.title.clone(), metric, self.condition.clone())
            .with_reduce_function(self.reduce_function)
            .with_summary(self.summary.clone())
            .with_labels(self.labels.clone())
            .with_panel_id(self.panel_id)
            .with_no_data_state(self.no_data_state)
            .with_exec_err_state(self.exec_err_state);

        if let Some(time_range) = &self.time_range {
            intent = intent.with_time_range(time_range.clone());
        }
        intent.annotations.extend(self.annotations.clone());

        Ok(intent)
    }
}

/// 按构建器后端解析指标表
fn parse_metric(backend: BackendKind, value: toml::Value) -> Result<Metric> {
    let metric = match backend {
        BackendKind::Cloudwatch => Metric::from(value.try_into::<CloudwatchMetric>()?),
        BackendKind::Prometheus => Metric::from(value.try_into::<PrometheusMetric>()?),
        BackendKind::Elasticsearch => Metric::from(value.try_into::<ElasticsearchQuery>()?),
    };
    Ok(metric)
}
