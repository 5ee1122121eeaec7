use serde_json::{json, Value};
use std::collections::BTreeMap;

use crate::state::{ExecErrState, NoDataState};
use crate::trigger::Trigger;

/// 编译完成的告警规则（Grafana 11 文件预配格式）
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRule {
    /// 规则标题
    pub title: String,

    /// 求值链：查询节点、归约节点、终止条件节点
    pub triggers: Vec<Trigger>,

    /// 查询相对时间范围起点（秒）
    pub time_range_from: u64,

    /// 查询相对时间范围终点（秒）
    pub time_range_to: u64,

    pub annotations: BTreeMap<String, String>,
    pub labels: BTreeMap<String, String>,

    /// 作为告警条件的节点引用 ID
    pub condition: String,

    /// 条件持续多久后触发，如 "5m"
    pub evaluate_for: String,

    pub no_data_state: NoDataState,
    pub exec_err_state: ExecErrState,

    /// 全局唯一 ID
    pub uid: String,

    /// 关联仪表盘 UID（为空表示不关联）
    pub dashboard_uid: String,

    /// 关联面板 ID
    pub panel_id: u32,
}

impl AlertRule {
    pub fn to_json_data(&self) -> Value {
        let data: Vec<Value> = self
            .triggers
            .iter()
            .map(|t| t.to_json_data(self.time_range_from, self.time_range_to))
            .collect();

        let mut rule = json!({
            "uid": self.uid,
            "title": self.title,
            "condition": self.condition,
            "data": data,
            "for": self.evaluate_for,
            "labels": self.labels,
            "annotations": self.annotations,
            "noDataState": self.no_data_state.as_str(),
            "execErrState": self.exec_err_state.as_str(),
            "isPaused": false,
        });

        if !self.dashboard_uid.is_empty() {
            rule["dashboardUid"] = json!(self.dashboard_uid);
            rule["panelId"] = json!(self.panel_id);
        }

        rule
    }
}
