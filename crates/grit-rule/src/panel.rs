use std::collections::BTreeMap;
use std::fmt;

use grit_core::{GritError, Result, TimeRange};
use grit_types::{BucketAgg, MetricAgg, ReduceFunction, REDUCE_REF_ID};
use serde::{Deserialize, Serialize};

use crate::builder::AlertRuleBuilder;
use crate::intent::{AlertIntent, Metric};

const DEFAULT_ALERT_MSG: &str = "NOT_IMPLEMENTED";
const DEFAULT_TIME_FROM: &str = "1h";
const DEFAULT_TIME_SHIFT: &str = "now";

/// 告警阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Threshold {
    GreaterThan(f64),
    GreaterOrEqual(f64),
    LowerThan(f64),
    LowerOrEqual(f64),
    Equal(f64),
    NotEqual(f64),
    WithinRange(f64, f64),
    OutsideRange(f64, f64),
}

impl Threshold {
    /// 针对给定操作数生成 math 表达式
    pub fn expression(&self, operand: &str) -> String {
        match self {
            Self::GreaterThan(v) => format!("{operand} > {v}"),
            Self::GreaterOrEqual(v) => format!("{operand} >= {v}"),
            Self::LowerThan(v) => format!("{operand} < {v}"),
            Self::LowerOrEqual(v) => format!("{operand} <= {v}"),
            Self::Equal(v) => format!("{operand} == {v}"),
            Self::NotEqual(v) => format!("{operand} != {v}"),
            Self::WithinRange(lo, hi) => format!("{operand} > {lo} && {operand} < {hi}"),
            Self::OutsideRange(lo, hi) => format!("{operand} < {lo} || {operand} > {hi}"),
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::GreaterThan(0.0)
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression(&format!("${REDUCE_REF_ID}")))
    }
}

/// 面板描述：告警从面板的第一个查询派生
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: u32,
    pub title: String,

    /// 面板自定义时间范围，如 "30m"
    pub time_from: Option<String>,

    /// 面板时间偏移，如 "now-5m"
    pub time_shift: Option<String>,

    /// 面板首个查询
    pub target: Metric,
}

impl Panel {
    pub fn new(id: u32, title: impl Into<String>, target: impl Into<Metric>) -> Self {
        Self {
            id,
            title: title.into(),
            time_from: None,
            time_shift: None,
            target: target.into(),
        }
    }

    pub fn with_time_from(mut self, time_from: impl Into<String>) -> Self {
        self.time_from = Some(time_from.into());
        self
    }

    pub fn with_time_shift(mut self, time_shift: impl Into<String>) -> Self {
        self.time_shift = Some(time_shift.into());
        self
    }
}

/// 面板告警选项
#[derive(Debug, Clone, PartialEq)]
pub struct PanelAlert {
    /// 环境名称，标题前缀为 `[ENV]`
    pub env: String,

    /// 为空时使用面板标题
    pub title: Option<String>,

    /// 非空时标题追加 ` | <team>`
    pub team: Option<String>,

    pub threshold: Threshold,
    pub labels: BTreeMap<String, String>,
    pub alert_msg: String,
    pub reduce_function: ReduceFunction,

    /// 面板未设置 `time_from` 时使用
    pub time_from: String,

    /// 面板未设置 `time_shift` 时使用
    pub time_shift: String,

    /// 覆盖面板查询的桶聚合（仅 Elasticsearch）
    pub bucket_aggs: Vec<BucketAgg>,

    /// 覆盖面板查询的指标聚合（仅 Elasticsearch）
    pub metric_aggs: Vec<MetricAgg>,
}

impl PanelAlert {
    pub fn new(env: impl Into<String>) -> Self {
        Self {
            env: env.into(),
            title: None,
            team: None,
            threshold: Threshold::default(),
            labels: BTreeMap::new(),
            alert_msg: DEFAULT_ALERT_MSG.to_string(),
            reduce_function: ReduceFunction::Last,
            time_from: DEFAULT_TIME_FROM.to_string(),
            time_shift: DEFAULT_TIME_SHIFT.to_string(),
            bucket_aggs: Vec::new(),
            metric_aggs: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }

    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_alert_msg(mut self, alert_msg: impl Into<String>) -> Self {
        self.alert_msg = alert_msg.into();
        self
    }

    pub fn with_reduce_function(mut self, function: ReduceFunction) -> Self {
        self.reduce_function = function;
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

    /// 规则标题：`[ENV] <title>`，有团队时追加 ` | <team>`
    pub fn rule_title(&self, panel: &Panel) -> String {
        let title = self.title.as_deref().filter(|t| !t.is_empty()).unwrap_or(&panel.title);
        let mut rule_title = format!("[{}] {}", self.env.to_uppercase(), title);

        if let Some(team) = self.team.as_deref().filter(|t| !t.is_empty()) {
            rule_title.push_str(" | ");
            rule_title.push_str(team);
        }

        rule_title
    }

    /// 由面板派生声明（不注册）
    pub fn intent(&self, panel: &Panel) -> AlertIntent {
        let time_range = TimeRange::new(
            panel.time_from.clone().unwrap_or_else(|| self.time_from.clone()),
            panel.time_shift.clone().unwrap_or_else(|| self.time_shift.clone()),
        );

        let metric = match &panel.target {
            Metric::Elasticsearch(query) => {
                let mut query = query.clone();
                if !self.bucket_aggs.is_empty() {
                    query.bucket_aggs = self.bucket_aggs.clone();
                }
                if !self.metric_aggs.is_empty() {
                    query.metric_aggs = self.metric_aggs.clone();
                }
                Metric::Elasticsearch(query)
            }
            other => other.clone(),
        };

        AlertIntent::new(self.rule_title(panel), metric, self.threshold.to_string())
            .with_reduce_function(self.reduce_function)
            .with_time_range(time_range)
            .with_summary(self.alert_msg.clone())
            .with_labels(self.labels.clone())
            .with_panel_id(panel.id)
    }

    /// 派生声明并注册到构建器；面板查询与构建器后端不一致时立即报错
    pub fn register(&self, panel: &Panel, builder: &mut AlertRuleBuilder) -> Result<()> {
        if panel.target.backend() != builder.kind() {
            return Err(GritError::BackendMismatch {
                rule: self.rule_title(panel),
                expected: builder.kind().to_string(),
                found: panel.target.backend().to_string(),
            });
        }

        builder.register(self.intent(panel));
        Ok(())
    }
}
