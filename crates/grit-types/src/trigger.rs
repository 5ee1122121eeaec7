use serde_json::{json, Value};

use crate::expression::AlertExpression;
use crate::target::{CloudwatchMetricsTarget, ElasticsearchTarget, PrometheusTarget};

/// 告警规则求值链中的一个节点
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Cloudwatch(CloudwatchMetricsTarget),
    Prometheus(PrometheusTarget),
    Elasticsearch(ElasticsearchTarget),
    Expression(AlertExpression),
}

impl Trigger {
    pub fn ref_id(&self) -> &str {
        match self {
            Self::Cloudwatch(t) => &t.ref_id,
            Self::Prometheus(t) => &t.ref_id,
            Self::Elasticsearch(t) => &t.ref_id,
            Self::Expression(e) => &e.ref_id,
        }
    }

    /// 查询节点的数据源；表达式节点返回 None
    pub fn datasource(&self) -> Option<&str> {
        match self {
            Self::Cloudwatch(t) => Some(&t.datasource),
            Self::Prometheus(t) => Some(&t.datasource),
            Self::Elasticsearch(t) => Some(&t.datasource),
            Self::Expression(_) => None,
        }
    }

    /// 当前节点消费的上游引用 ID（查询节点没有上游）
    pub fn referenced_ids(&self) -> Vec<String> {
        match self {
            Self::Expression(e) => e.referenced_ids(),
            _ => Vec::new(),
        }
    }

    /// 序列化为规则 `data` 数组中的一项
    pub fn to_json_data(&self, time_range_from: u64, time_range_to: u64) -> Value {
        let model = match self {
            Self::Cloudwatch(t) => t.to_json_data(),
            Self::Prometheus(t) => t.to_json_data(),
            Self::Elasticsearch(t) => t.to_json_data(),
            Self::Expression(e) => return e.to_json_data(),
        };

        json!({
            "refId": self.ref_id(),
            "relativeTimeRange": {
                "from": time_range_from,
                "to": time_range_to,
            },
            "datasourceUid": self.datasource().unwrap_or_default(),
            "model": model,
        })
    }
}

impl From<AlertExpression> for Trigger {
    fn from(expression: AlertExpression) -> Self {
        Self::Expression(expression)
    }
}

impl From<CloudwatchMetricsTarget> for Trigger {
    fn from(target: CloudwatchMetricsTarget) -> Self {
        Self::Cloudwatch(target)
    }
}

impl From<PrometheusTarget> for Trigger {
    fn from(target: PrometheusTarget) -> Self {
        Self::Prometheus(target)
    }
}

impl From<ElasticsearchTarget> for Trigger {
    fn from(target: ElasticsearchTarget) -> Self {
        Self::Elasticsearch(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_node_wraps_model() {
        let trigger = Trigger::from(PrometheusTarget {
            ref_id: "QUERY".to_string(),
            expr: "up == 0".to_string(),
            legend_format: "{{ instance }}".to_string(),
            datasource: "prometheus".to_string(),
            interval: String::new(),
            instant: false,
            hide: false,
        });

        let json = trigger.to_json_data(300, 0);
        assert_eq!(json["refId"], "QUERY");
        assert_eq!(json["datasourceUid"], "prometheus");
        assert_eq!(json["relativeTimeRange"]["from"], 300);
        assert_eq!(json["model"]["expr"], "up == 0");
        assert!(trigger.referenced_ids().is_empty());
    }

    #[test]
    fn test_expression_node_keeps_own_range() {
        let trigger = Trigger::from(AlertExpression::math("ALERT_CONDITION", "$REDUCE_EXPRESSION > 1"));
        let json = trigger.to_json_data(300, 0);

        assert_eq!(json["relativeTimeRange"]["from"], 0);
        assert_eq!(trigger.referenced_ids(), vec!["REDUCE_EXPRESSION"]);
        assert!(trigger.datasource().is_none());
    }
}
