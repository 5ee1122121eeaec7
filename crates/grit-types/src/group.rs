use serde_json::{json, Value};

use crate::rule::AlertRule;

/// 告警规则组
#[derive(Debug, Clone, PartialEq)]
pub struct AlertGroup {
    /// 组名称
    pub name: String,

    /// 确定性 UID，决定输出文件名
    pub uid: String,

    /// 有序规则列表
    pub rules: Vec<AlertRule>,

    /// Grafana 文件夹
    pub folder: String,

    /// 求值间隔，如 "1m"
    pub evaluate_interval: String,
}

impl AlertGroup {
    pub fn to_json_data(&self) -> Value {
        json!({
            "orgId": 1,
            "name": self.name,
            "folder": self.folder,
            "interval": self.evaluate_interval,
            "rules": self.rules.iter().map(AlertRule::to_json_data).collect::<Vec<_>>(),
        })
    }
}

/// 告警文件预配文档
#[derive(Debug, Clone, PartialEq)]
pub struct AlertProvisioning<'a> {
    pub groups: Vec<&'a AlertGroup>,
}

impl<'a> AlertProvisioning<'a> {
    pub fn new(group: &'a AlertGroup) -> Self {
        Self { groups: vec![group] }
    }

    pub fn to_json_data(&self) -> Value {
        json!({
            "apiVersion": 1,
            "groups": self.groups.iter().map(|g| g.to_json_data()).collect::<Vec<_>>(),
        })
    }
}
