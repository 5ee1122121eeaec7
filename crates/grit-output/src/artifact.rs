use grit_types::{AlertGroup, AlertProvisioning, Dashboard};
use serde_json::Value;

/// 待输出的产物
#[derive(Debug, Clone, PartialEq)]
pub enum Artifact {
    Alerts(AlertGroup),
    Dashboard(Dashboard),
}

impl Artifact {
    /// 产物 ID：告警组 UID 或仪表盘 UUID
    pub fn id(&self) -> &str {
        match self {
            Self::Alerts(group) => &group.uid,
            Self::Dashboard(dashboard) => &dashboard.uuid,
        }
    }

    pub fn folder(&self) -> &str {
        match self {
            Self::Alerts(group) => &group.folder,
            Self::Dashboard(dashboard) => &dashboard.folder,
        }
    }

    /// 写入文件的 JSON 文档
    pub fn to_json_data(&self) -> Value {
        match self {
            Self::Alerts(group) => AlertProvisioning::new(group).to_json_data(),
            Self::Dashboard(dashboard) => dashboard.model.clone(),
        }
    }
}

impl From<AlertGroup> for Artifact {
    fn from(group: AlertGroup) -> Self {
        Self::Alerts(group)
    }
}

impl From<Dashboard> for Artifact {
    fn from(dashboard: Dashboard) -> Self {
        Self::Dashboard(dashboard)
    }
}

/// 显式收集的产物列表，按加入顺序输出
#[derive(Debug, Clone, Default)]
pub struct ArtifactSet {
    artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, artifact: impl Into<Artifact>) {
        self.artifacts.push(artifact.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter()
    }

    pub fn alert_groups(&self) -> impl Iterator<Item = &AlertGroup> {
        self.artifacts.iter().filter_map(|a| match a {
            Artifact::Alerts(group) => Some(group),
            Artifact::Dashboard(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}
