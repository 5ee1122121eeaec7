//! 后端编译器：把告警声明编译为 查询 → 归约 → 条件 的求值链。
//!
//! 单指标规则固定使用 `QUERY` / `REDUCE_EXPRESSION` / `ALERT_CONDITION` 三个引用 ID；
//! 多指标规则为每个子指标生成 `<ref>-QUERY` → `<ref>` 一对节点，最后接一个条件节点。

mod cloudwatch;
mod elasticsearch;
mod prometheus;

use std::collections::{BTreeMap, HashMap, HashSet};

use grit_core::{create_uid_from_string, GritError, Result};
use grit_types::{
    AlertExpression, AlertRule, ReduceFunction, ReduceMode, Trigger, CONDITION_REF_ID,
    QUERY_REF_ID, QUERY_REF_SUFFIX, REDUCE_REF_ID,
};
use tracing::debug;

use crate::builder::{AlertRuleBuilder, Backend};
use crate::intent::{AlertIntent, Metric, MetricSpec, NamedMetric};

/// 面板 ID 注解键
pub const PANEL_ID_ANNOTATION: &str = "__panelId__";

/// 仪表盘 UID 注解键
pub const DASHBOARD_UID_ANNOTATION: &str = "__dashboardUid__";

pub const SUMMARY_ANNOTATION: &str = "summary";

/// 编译单条声明
pub(crate) fn compile(builder: &AlertRuleBuilder, intent: &AlertIntent) -> Result<AlertRule> {
    if intent.title.trim().is_empty() {
        return Err(GritError::EmptyTitle);
    }
    if intent.condition.trim().is_empty() {
        return Err(GritError::missing_field(&intent.title, "condition"));
    }

    let triggers = match &intent.metric {
        MetricSpec::Single(metric) => single_chain(builder, intent, metric)?,
        MetricSpec::Multi(metrics) => multi_chain(builder, intent, metrics)?,
    };
    check_wiring(&intent.title, &triggers)?;

    let (time_range_from, time_range_to) = intent
        .time_range
        .resolve(builder.config().lenient_time_ranges)?;

    let rule = AlertRule {
        title: intent.title.clone(),
        triggers,
        time_range_from,
        time_range_to,
        annotations: annotations(builder, intent),
        labels: intent.labels.clone(),
        condition: CONDITION_REF_ID.to_string(),
        evaluate_for: builder.config().evaluate_for.clone(),
        no_data_state: intent.no_data_state,
        exec_err_state: intent.exec_err_state,
        uid: create_uid_from_string(&intent.title),
        dashboard_uid: builder.config().dashboard_uid.clone(),
        panel_id: intent.panel_id,
    };

    debug!(
        title = %rule.title,
        uid = %rule.uid,
        backend = %builder.kind(),
        nodes = rule.triggers.len(),
        "Alert rule compiled"
    );

    Ok(rule)
}

fn single_chain(builder: &AlertRuleBuilder, intent: &AlertIntent, metric: &Metric) -> Result<Vec<Trigger>> {
    Ok(vec![
        query_node(builder, &intent.title, metric, QUERY_REF_ID)?,
        reduce_node(REDUCE_REF_ID, QUERY_REF_ID, intent.reduce_function),
        condition_node(&intent.condition),
    ])
}

fn multi_chain(
    builder: &AlertRuleBuilder,
    intent: &AlertIntent,
    metrics: &[NamedMetric],
) -> Result<Vec<Trigger>> {
    if let Backend::Elasticsearch = builder.backend() {
        return Err(GritError::Unsupported(format!(
            "rule '{}': multi-metric rules are not supported by the elasticsearch builder",
            intent.title
        )));
    }
    if metrics.is_empty() {
        return Err(GritError::missing_field(&intent.title, "metric"));
    }

    let mut triggers = Vec::with_capacity(metrics.len() * 2 + 1);
    for named in metrics {
        if named.ref_id.trim().is_empty() {
            return Err(GritError::missing_field(&intent.title, "ref_id"));
        }

        let query_ref = format!("{}{}", named.ref_id, QUERY_REF_SUFFIX);
        triggers.push(query_node(builder, &intent.title, &named.metric, &query_ref)?);
        triggers.push(reduce_node(&named.ref_id, &query_ref, intent.reduce_function));
    }
    triggers.push(condition_node(&intent.condition));

    Ok(triggers)
}

/// 按后端构造查询节点；构建器与指标后端不一致时报错
fn query_node(builder: &AlertRuleBuilder, title: &str, metric: &Metric, ref_id: &str) -> Result<Trigger> {
    let config = builder.config();
    match (builder.backend(), metric) {
        (Backend::Cloudwatch { metric_namespace }, Metric::Cloudwatch(m)) => {
            cloudwatch::query_target(metric_namespace, config, title, m, ref_id).map(Trigger::from)
        }
        (Backend::Prometheus, Metric::Prometheus(m)) => {
            prometheus::query_target(config, title, m, ref_id).map(Trigger::from)
        }
        (Backend::Elasticsearch, Metric::Elasticsearch(q)) => {
            elasticsearch::query_target(config, title, q, ref_id).map(Trigger::from)
        }
        (backend, metric) => Err(GritError::BackendMismatch {
            rule: title.to_string(),
            expected: backend.kind().to_string(),
            found: metric.backend().to_string(),
        }),
    }
}

fn reduce_node(ref_id: &str, input: &str, function: ReduceFunction) -> Trigger {
    AlertExpression::reduce(ref_id, input, function)
        .with_reduce_mode(ReduceMode::DropNonNumeric)
        .into()
}

fn condition_node(expression: &str) -> Trigger {
    AlertExpression::math(CONDITION_REF_ID, expression).into()
}

/// 校验引用关系：引用 ID 唯一，只能引用前面的节点，非终止节点恰被一个后续节点引用
fn check_wiring(title: &str, triggers: &[Trigger]) -> Result<()> {
    let mut seen = HashSet::new();
    for trigger in triggers {
        if !seen.insert(trigger.ref_id()) {
            return Err(GritError::DuplicateRefId {
                rule: title.to_string(),
                ref_id: trigger.ref_id().to_string(),
            });
        }
    }

    let mut uses: HashMap<&str, usize> = HashMap::new();
    for (index, trigger) in triggers.iter().enumerate() {
        for reference in trigger.referenced_ids() {
            let position = triggers[..index]
                .iter()
                .position(|t| t.ref_id() == reference)
                .ok_or_else(|| {
                    GritError::Config(format!(
                        "rule '{}': node '{}' references unknown or later node '{}'",
                        title,
                        trigger.ref_id(),
                        reference
                    ))
                })?;
            *uses.entry(triggers[position].ref_id()).or_default() += 1;
        }
    }

    for trigger in triggers {
        let ref_id = trigger.ref_id();
        if ref_id == CONDITION_REF_ID {
            continue;
        }
        let count = uses.get(ref_id).copied().unwrap_or(0);
        if count != 1 {
            return Err(GritError::Unwired {
                rule: title.to_string(),
                ref_id: ref_id.to_string(),
                uses: count,
            });
        }
    }

    Ok(())
}

/// 合并注解：后端默认 → 摘要 → 面板链接 → 声明显式注解
fn annotations(builder: &AlertRuleBuilder, intent: &AlertIntent) -> BTreeMap<String, String> {
    let mut annotations = BTreeMap::new();

    if let Backend::Elasticsearch = builder.backend() {
        annotations.insert(
            elasticsearch::STATUS_ANNOTATION.to_string(),
            elasticsearch::STATUS_TEMPLATE.to_string(),
        );
    }

    if !intent.summary.is_empty() {
        annotations.insert(SUMMARY_ANNOTATION.to_string(), intent.summary.clone());
    }

    let dashboard_uid = &builder.config().dashboard_uid;
    if !dashboard_uid.is_empty() {
        annotations.insert(PANEL_ID_ANNOTATION.to_string(), intent.panel_id.to_string());
        annotations.insert(DASHBOARD_UID_ANNOTATION.to_string(), dashboard_uid.clone());
    }

    annotations.extend(intent.annotations.clone());
    annotations
}

/// 显式数据源优先，其次构建器配置，最后后端默认值；空白值视为未设置
fn resolve_datasource(explicit: Option<&String>, builder_default: Option<&String>, fallback: &str) -> String {
    non_blank(explicit)
        .or(non_blank(builder_default))
        .map_or_else(|| fallback.to_string(), str::to_string)
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}
