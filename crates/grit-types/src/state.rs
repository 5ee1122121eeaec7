use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 指标后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// AWS CloudWatch
    Cloudwatch,
    /// Prometheus
    Prometheus,
    /// Elasticsearch
    Elasticsearch,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cloudwatch => "cloudwatch",
            Self::Prometheus => "prometheus",
            Self::Elasticsearch => "elasticsearch",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cloudwatch" => Ok(Self::Cloudwatch),
            "prometheus" => Ok(Self::Prometheus),
            "elasticsearch" | "es" => Ok(Self::Elasticsearch),
            _ => Err(format!("unknown backend: {s}")),
        }
    }
}

/// 表达式节点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionType {
    Math,
    Reduce,
    Resample,
    ClassicConditions,
    Threshold,
}

impl ExpressionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Math => "math",
            Self::Reduce => "reduce",
            Self::Resample => "resample",
            Self::ClassicConditions => "classic_conditions",
            Self::Threshold => "threshold",
        }
    }
}

/// 归约函数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceFunction {
    #[default]
    Last,
    Mean,
    Min,
    Max,
    Sum,
    Count,
}

impl ReduceFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last => "last",
            Self::Mean => "mean",
            Self::Min => "min",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for ReduceFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReduceFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "last" => Ok(Self::Last),
            "mean" | "avg" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            "sum" => Ok(Self::Sum),
            "count" => Ok(Self::Count),
            _ => Err(format!("unknown reduce function: {s}")),
        }
    }
}

/// 归约模式（非数值处理方式）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReduceMode {
    #[serde(rename = "strict")]
    Strict,
    #[default]
    #[serde(rename = "dropNN")]
    DropNonNumeric,
    #[serde(rename = "replaceNN")]
    ReplaceNonNumeric,
}

impl ReduceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::DropNonNumeric => "dropNN",
            Self::ReplaceNonNumeric => "replaceNN",
        }
    }
}

/// 无数据时的告警状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NoDataState {
    Alerting,
    NoData,
    #[serde(rename = "OK")]
    Ok,
    #[default]
    KeepLast,
}

impl NoDataState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alerting => "Alerting",
            Self::NoData => "NoData",
            Self::Ok => "OK",
            Self::KeepLast => "KeepLast",
        }
    }
}

/// 执行错误时的告警状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExecErrState {
    #[default]
    Alerting,
    Error,
    #[serde(rename = "OK")]
    Ok,
    KeepLast,
}

impl ExecErrState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alerting => "Alerting",
            Self::Error => "Error",
            Self::Ok => "OK",
            Self::KeepLast => "KeepLast",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ReduceFunction::default(), ReduceFunction::Last);
        assert_eq!(ReduceMode::default().as_str(), "dropNN");
        assert_eq!(NoDataState::default().as_str(), "KeepLast");
        assert_eq!(ExecErrState::default().as_str(), "Alerting");
    }

    #[test]
    fn test_reduce_function_parse() {
        assert_eq!("mean".parse::<ReduceFunction>().unwrap(), ReduceFunction::Mean);
        assert_eq!("avg".parse::<ReduceFunction>().unwrap(), ReduceFunction::Mean);
        assert!("median".parse::<ReduceFunction>().is_err());
    }

    #[test]
    fn test_state_serde_names() {
        assert_eq!(serde_json::to_string(&NoDataState::Ok).unwrap(), "\"OK\"");
        assert_eq!(serde_json::to_string(&ReduceMode::DropNonNumeric).unwrap(), "\"dropNN\"");
        let kind: BackendKind = serde_json::from_str("\"elasticsearch\"").unwrap();
        assert_eq!(kind, BackendKind::Elasticsearch);
    }
}
