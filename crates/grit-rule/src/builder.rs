use grit_core::{Environment, GritError, Result};
use grit_types::{AlertRule, BackendKind};
use tracing::{debug, info};

use crate::compiler;
use crate::intent::AlertIntent;
use crate::registry::IntentRegistry;

/// CloudWatch 规则仅在环境包含该提供商时生成
const AWS_PROVIDER: &str = "aws";

/// 后端变体及其专属默认值
#[derive(Debug, Clone, PartialEq)]
pub enum Backend {
    Cloudwatch {
        /// 指标未指定命名空间时使用
        metric_namespace: String,
    },
    Prometheus,
    Elasticsearch,
}

impl Backend {
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Cloudwatch { .. } => BackendKind::Cloudwatch,
            Self::Prometheus => BackendKind::Prometheus,
            Self::Elasticsearch => BackendKind::Elasticsearch,
        }
    }
}

/// 构建器配置
#[derive(Debug, Clone, PartialEq)]
pub struct BuilderConfig {
    /// 条件持续时长，如 "5m"
    pub evaluate_for: String,

    /// 关联的仪表盘 UID，为空时不写入面板链接
    pub dashboard_uid: String,

    /// 构建器级别的数据源，指标未指定时使用
    pub datasource: Option<String>,

    /// 无法识别的时间标记按 0 处理（兼容旧产物）
    pub lenient_time_ranges: bool,
}

impl BuilderConfig {
    pub fn new(evaluate_for: impl Into<String>) -> Self {
        Self {
            evaluate_for: evaluate_for.into(),
            dashboard_uid: String::new(),
            datasource: None,
            lenient_time_ranges: false,
        }
    }

    pub fn with_dashboard_uid(mut self, dashboard_uid: impl Into<String>) -> Self {
        self.dashboard_uid = dashboard_uid.into();
        self
    }

    pub fn with_datasource(mut self, datasource: impl Into<String>) -> Self {
        self.datasource = Some(datasource.into());
        self
    }

    pub fn with_lenient_time_ranges(mut self, lenient: bool) -> Self {
        self.lenient_time_ranges = lenient;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.evaluate_for.trim().is_empty() {
            return Err(GritError::Config("evaluate_for must not be empty".to_string()));
        }

        if let Some(datasource) = &self.datasource {
            if datasource.trim().is_empty() {
                return Err(GritError::Config("datasource must not be blank when set".to_string()));
            }
        }

        Ok(())
    }
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new("5m")
    }
}

/// 告警规则构建器
///
/// 每个仪表盘 / 服务一个实例：先 `register` 若干声明，再 `build` 编译为规则。
/// `build` 不消耗声明，对相同输入重复调用得到相同结果。
#[derive(Debug, Clone)]
pub struct AlertRuleBuilder {
    environment: Environment,
    backend: Backend,
    config: BuilderConfig,
    registry: IntentRegistry,
}

impl AlertRuleBuilder {
    pub fn new(environment: Environment, backend: Backend, config: BuilderConfig) -> Result<Self> {
        config.validate()?;

        if let Backend::Cloudwatch { metric_namespace } = &backend {
            if metric_namespace.trim().is_empty() {
                return Err(GritError::Config(
                    "CloudWatch builder requires a metric namespace".to_string(),
                ));
            }
        }

        Ok(Self {
            environment,
            backend,
            config,
            registry: IntentRegistry::new(),
        })
    }

    pub fn cloudwatch(
        environment: Environment,
        metric_namespace: impl Into<String>,
        config: BuilderConfig,
    ) -> Result<Self> {
        Self::new(
            environment,
            Backend::Cloudwatch {
                metric_namespace: metric_namespace.into(),
            },
            config,
        )
    }

    pub fn prometheus(environment: Environment, config: BuilderConfig) -> Result<Self> {
        Self::new(environment, Backend::Prometheus, config)
    }

    pub fn elasticsearch(environment: Environment, config: BuilderConfig) -> Result<Self> {
        Self::new(environment, Backend::Elasticsearch, config)
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    /// 注册一条告警声明
    pub fn register(&mut self, intent: AlertIntent) -> &mut Self {
        self.registry.register(intent);
        self
    }

    /// 当前环境是否需要该后端的规则
    pub fn is_enabled(&self) -> bool {
        match self.backend {
            Backend::Cloudwatch { .. } => self.environment.has_provider(AWS_PROVIDER),
            Backend::Prometheus | Backend::Elasticsearch => true,
        }
    }

    /// 将已注册的声明编译为告警规则
    ///
    /// 任一声明出错时整体失败，不返回部分结果。
    pub fn build(&self) -> Result<Vec<AlertRule>> {
        if !self.is_enabled() {
            info!(
                backend = %self.kind(),
                environment = %self.environment.name,
                skipped = self.registry.len(),
                "Backend not provided by environment, skipping alert rules"
            );
            return Ok(Vec::new());
        }

        if self.registry.is_empty() {
            debug!(backend = %self.kind(), "No alert intents registered");
            return Ok(Vec::new());
        }

        let rules = self
            .registry
            .iter()
            .map(|intent| compiler::compile(self, intent))
            .collect::<Result<Vec<_>>>()?;

        info!(
            backend = %self.kind(),
            environment = %self.environment.name,
            count = rules.len(),
            "Alert rules built"
        );

        Ok(rules)
    }

    /// 按顺序拼接多个构建器的编译结果，不去重也不校验 UID
    pub fn build_all<'a, I>(builders: I) -> Result<Vec<AlertRule>>
    where
        I: IntoIterator<Item = &'a AlertRuleBuilder>,
    {
        let mut rules = Vec::new();
        for builder in builders {
            rules.extend(builder.build()?);
        }
        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{CloudwatchMetric, PrometheusMetric};

    fn env(providers: &[&str]) -> Environment {
        Environment::new("prod", providers.iter().map(|p| p.to_string()).collect())
    }

    #[test]
    fn test_config_validation() {
        assert!(AlertRuleBuilder::prometheus(env(&[]), BuilderConfig::new("")).is_err());
        assert!(AlertRuleBuilder::prometheus(env(&[]), BuilderConfig::new("1m").with_datasource(" ")).is_err());
        assert!(AlertRuleBuilder::cloudwatch(env(&["aws"]), "", BuilderConfig::default()).is_err());
        assert!(AlertRuleBuilder::prometheus(env(&[]), BuilderConfig::default()).is_ok());
    }

    #[test]
    fn test_cloudwatch_skipped_without_aws() {
        let mut builder = AlertRuleBuilder::cloudwatch(env(&["gcp"]), "AWS/EC2", BuilderConfig::default()).unwrap();
        builder.register(AlertIntent::new(
            "High CPU",
            CloudwatchMetric::new("CPUUtilization", vec!["Average".to_string()]),
            "$REDUCE_EXPRESSION > 90",
        ));

        assert!(!builder.is_enabled());
        assert!(builder.build().unwrap().is_empty());
    }

    #[test]
    fn test_build_all_empty() {
        let builders: Vec<AlertRuleBuilder> = Vec::new();
        assert!(AlertRuleBuilder::build_all(&builders).unwrap().is_empty());
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut builder = AlertRuleBuilder::prometheus(env(&[]), BuilderConfig::default()).unwrap();
        builder.register(AlertIntent::new("Target down", PrometheusMetric::new("up"), "$REDUCE_EXPRESSION < 1"));

        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }
}
