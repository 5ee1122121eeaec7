use std::fs;
use std::path::{Component, Path, PathBuf};

use grit_core::{GritError, Result};
use tracing::{debug, info};

use crate::artifact::{Artifact, ArtifactSet};
use crate::json::to_canonical_json;

/// 产物输出目标
pub trait ArtifactSink {
    /// 写出单个产物，返回其逻辑路径
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf>;

    /// 按顺序写出全部产物
    fn write_all(&mut self, artifacts: &ArtifactSet) -> Result<Vec<PathBuf>> {
        artifacts.iter().map(|artifact| self.write(artifact)).collect()
    }
}

/// 产物相对输出根目录的路径
///
/// 告警组：`<env>-alerts/<folder>/<group_uid>.json`；
/// 仪表盘：`<env>/<folder>/<uuid>.json`。
/// 文件夹与 ID 不能跳出输出根目录。
pub fn relative_path(environment: &str, artifact: &Artifact) -> Result<PathBuf> {
    let id = artifact.id();
    if id.trim().is_empty() {
        let (owner, field) = match artifact {
            Artifact::Alerts(group) => (group.name.as_str(), "uid"),
            Artifact::Dashboard(_) => ("dashboard", "uuid"),
        };
        return Err(GritError::missing_field(owner, field));
    }

    let folder = Path::new(artifact.folder());
    if !folder.components().all(|c| matches!(c, Component::Normal(_))) {
        return Err(GritError::Config(format!(
            "artifact '{}': folder '{}' must be a relative path without '.' or '..'",
            id,
            artifact.folder()
        )));
    }

    let mut file_name = Path::new(id).components();
    if !matches!((file_name.next(), file_name.next()), (Some(Component::Normal(_)), None)) {
        return Err(GritError::Config(format!(
            "artifact id '{}' must be a single file name",
            id
        )));
    }

    let base = match artifact {
        Artifact::Alerts(_) => format!("{}-alerts", environment),
        Artifact::Dashboard(_) => environment.to_string(),
    };

    Ok(Path::new(&base).join(folder).join(format!("{}.json", id)))
}

/// 文件系统输出
pub struct FileSink {
    root: PathBuf,
    environment: String,
}

impl FileSink {
    pub fn new(root: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            environment: environment.into(),
        }
    }

    pub fn path_for(&self, artifact: &Artifact) -> Result<PathBuf> {
        Ok(self.root.join(relative_path(&self.environment, artifact)?))
    }
}

impl ArtifactSink for FileSink {
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        let path = self.path_for(artifact)?;
        let content = to_canonical_json(&artifact.to_json_data())?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        debug!("Writing artifact to file: {:?}", path);
        fs::write(&path, content)?;
        info!(id = %artifact.id(), path = %path.display(), "Artifact written");

        Ok(path)
    }
}

/// 内存输出，保存路径与序列化内容
#[derive(Debug, Default)]
pub struct MemorySink {
    environment: String,
    files: Vec<(PathBuf, String)>,
}

impl MemorySink {
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            environment: environment.into(),
            files: Vec::new(),
        }
    }

    pub fn files(&self) -> &[(PathBuf, String)] {
        &self.files
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files
            .iter()
            .find(|(p, _)| p == path.as_ref())
            .map(|(_, content)| content.as_str())
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, artifact: &Artifact) -> Result<PathBuf> {
        let path = relative_path(&self.environment, artifact)?;
        let content = to_canonical_json(&artifact.to_json_data())?;

        self.files.retain(|(p, _)| p != &path);
        self.files.push((path.clone(), content));

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grit_types::{AlertGroup, Dashboard};
    use serde_json::json;

    fn group(uid: &str) -> AlertGroup {
        AlertGroup {
            name: "EC2".to_string(),
            uid: uid.to_string(),
            rules: Vec::new(),
            folder: "AWS".to_string(),
            evaluate_interval: "1m".to_string(),
        }
    }

    #[test]
    fn test_relative_paths() {
        let alerts = Artifact::from(group("abc"));
        assert_eq!(
            relative_path("prod", &alerts).unwrap(),
            PathBuf::from("prod-alerts/AWS/abc.json")
        );

        let dashboard = Artifact::from(Dashboard::new("dash-1", "Infra", json!({})));
        assert_eq!(
            relative_path("prod", &dashboard).unwrap(),
            PathBuf::from("prod/Infra/dash-1.json")
        );
    }

    #[test]
    fn test_empty_uid_rejected() {
        let result = relative_path("prod", &Artifact::from(group("")));
        assert!(matches!(result, Err(GritError::MissingField { .. })));
    }

    #[test]
    fn test_paths_stay_under_root() {
        let mut escaping = group("abc");
        escaping.folder = "../..".to_string();
        assert!(matches!(
            relative_path("prod", &Artifact::from(escaping)),
            Err(GritError::Config(_))
        ));

        let mut absolute = group("abc");
        absolute.folder = "/etc".to_string();
        assert!(relative_path("prod", &Artifact::from(absolute)).is_err());

        let sneaky_id = Artifact::from(Dashboard::new("../d", "Infra", json!({})));
        assert!(relative_path("prod", &sneaky_id).is_err());

        let mut nested = group("abc");
        nested.folder = "Team/Infra".to_string();
        assert_eq!(
            relative_path("prod", &Artifact::from(nested)).unwrap(),
            PathBuf::from("prod-alerts/Team/Infra/abc.json")
        );

        let unfoldered = Artifact::from(Dashboard::new("d", "", json!({})));
        assert_eq!(relative_path("prod", &unfoldered).unwrap(), PathBuf::from("prod/d.json"));
    }

    #[test]
    fn test_memory_sink_replaces_same_path() {
        let mut sink = MemorySink::new("dev");
        sink.write(&Artifact::from(Dashboard::new("d", "f", json!({"v": 1})))).unwrap();
        sink.write(&Artifact::from(Dashboard::new("d", "f", json!({"v": 2})))).unwrap();

        assert_eq!(sink.files().len(), 1);
        assert_eq!(sink.get("dev/f/d.json"), Some("{\n  \"v\": 2\n}\n"));
    }
}
