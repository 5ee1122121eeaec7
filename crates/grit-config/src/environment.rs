use grit_core::Environment;
use grit_types::BackendKind;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 环境配置（environments/<name>.toml）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnvironmentConfig {
    pub name: String,

    /// 提供商列表，如 ["aws"]
    #[serde(default)]
    pub provider: Vec<String>,

    #[serde(default)]
    pub datasources: DatasourceConfig,

    /// 产物输出根目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// 各后端的默认数据源名称
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatasourceConfig {
    #[serde(default)]
    pub cloudwatch: Option<String>,
    #[serde(default)]
    pub prometheus: Option<String>,
    #[serde(default)]
    pub elasticsearch: Option<String>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl EnvironmentConfig {
    pub fn environment(&self) -> Environment {
        Environment::new(self.name.clone(), self.provider.clone())
    }

    pub fn datasource_for(&self, backend: BackendKind) -> Option<&String> {
        match backend {
            BackendKind::Cloudwatch => self.datasources.cloudwatch.as_ref(),
            BackendKind::Prometheus => self.datasources.prometheus.as_ref(),
            BackendKind::Elasticsearch => self.datasources.elasticsearch.as_ref(),
        }
    }
}
