use anyhow::{anyhow, bail, Context, Result};
use config::{Config, File, FileFormat};
use grit_types::Dashboard;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::definition::{AlertFile, DashboardFile, GroupDefinition};
use crate::environment::EnvironmentConfig;

const ENVIRONMENTS_DIR: &str = "environments";
const ALERTS_DIR: &str = "alerts";
const DASHBOARDS_DIR: &str = "dashboards";

/// 环境变量覆盖前缀，如 GRIT_OUTPUT_DIR
const ENV_PREFIX: &str = "GRIT";

/// 配置加载器
pub struct ConfigLoader {
    config_dir: PathBuf,
}

impl ConfigLoader {
    /// 创建配置加载器
    pub fn new<P: AsRef<Path>>(config_dir: P) -> Self {
        Self {
            config_dir: config_dir.as_ref().to_path_buf(),
        }
    }

    /// 加载环境配置（environments/<name>.toml，可被 GRIT_* 环境变量覆盖）
    pub fn load_environment(&self, name: &str) -> Result<EnvironmentConfig> {
        let config_path = self.config_dir.join(ENVIRONMENTS_DIR).join(format!("{}.toml", name));

        if !config_path.exists() {
            return Err(anyhow!("Environment config not found: {}", config_path.display()));
        }

        let config = Config::builder()
            .add_source(File::new(
                config_path.to_str().ok_or_else(|| anyhow!("Invalid config path"))?,
                FileFormat::Toml,
            ))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("provider"),
            )
            .build()?;

        let environment: EnvironmentConfig = config
            .try_deserialize()
            .with_context(|| format!("Invalid environment config: {}", config_path.display()))?;

        info!(environment = %environment.name, providers = ?environment.provider, "Environment loaded");
        Ok(environment)
    }

    /// 加载全部告警组定义（按文件名排序）
    pub fn load_alert_groups(&self) -> Result<Vec<GroupDefinition>> {
        let mut groups = Vec::new();

        for path in self.toml_files(ALERTS_DIR)? {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file: AlertFile = toml::from_str(&content)
                .with_context(|| format!("Invalid alert definitions: {}", path.display()))?;

            debug!(file = %path.display(), groups = file.groups.len(), "Alert definitions loaded");
            groups.extend(file.groups);
        }

        Ok(groups)
    }

    /// 加载全部仪表盘（模型文件原样读取）
    pub fn load_dashboards(&self) -> Result<Vec<Dashboard>> {
        let base = self.config_dir.join(DASHBOARDS_DIR);
        let mut dashboards = Vec::new();

        for path in self.toml_files(DASHBOARDS_DIR)? {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let file: DashboardFile = toml::from_str(&content)
                .with_context(|| format!("Invalid dashboard definitions: {}", path.display()))?;

            for definition in file.dashboards {
                let model_path = base.join(&definition.path);
                let raw = fs::read_to_string(&model_path)
                    .with_context(|| format!("Failed to read dashboard model {}", model_path.display()))?;
                let model: serde_json::Value = serde_json::from_str(&raw)
                    .with_context(|| format!("Invalid dashboard JSON {}", model_path.display()))?;

                dashboards.push(Dashboard::new(definition.uuid, definition.folder, model));
            }
        }

        Ok(dashboards)
    }

    /// 验证配置
    pub fn validate(&self, environment: &str) -> Result<()> {
        let env = self.load_environment(environment)?;

        if env.name.trim().is_empty() {
            bail!("environment name must not be empty");
        }

        let mut seen = HashSet::new();
        for group in self.load_alert_groups()? {
            if !seen.insert((group.folder.clone(), group.name.clone())) {
                bail!("alert group '{}' is defined twice in folder '{}'", group.name, group.folder);
            }
            for builder in &group.builders {
                builder
                    .to_builder(&env, false)
                    .with_context(|| format!("invalid builder in group '{}'", group.name))?;
            }
        }

        let mut uuids = HashSet::new();
        for dashboard in self.load_dashboards()? {
            if !uuids.insert(dashboard.uuid.clone()) {
                bail!("dashboard uuid '{}' is defined twice", dashboard.uuid);
            }
        }

        Ok(())
    }

    /// 子目录下的 .toml 文件；目录不存在时为空
    fn toml_files(&self, subdir: &str) -> Result<Vec<PathBuf>> {
        let dir = self.config_dir.join(subdir);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).with_context(|| format!("Failed to list {}", dir.display()))? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                files.push(path);
            }
        }
        files.sort();

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_missing_environment_is_error() {
        let temp_dir = tempdir().unwrap();
        let loader = ConfigLoader::new(temp_dir.path());

        assert!(loader.load_environment("prod").is_err());
    }

    #[test]
    fn test_missing_directories_are_empty() {
        let temp_dir = tempdir().unwrap();
        let loader = ConfigLoader::new(temp_dir.path());

        assert!(loader.load_alert_groups().unwrap().is_empty());
        assert!(loader.load_dashboards().unwrap().is_empty());
    }

    #[test]
    fn test_load_environment_from_file() {
        let temp_dir = tempdir().unwrap();
        write(
            temp_dir.path(),
            "environments/staging.toml",
            r#"
name = "staging"
provider = ["aws", "gcp"]
output_dir = "build"

[datasources]
elasticsearch = "logs"
"#,
        );

        let loader = ConfigLoader::new(temp_dir.path());
        let env = loader.load_environment("staging").unwrap();

        assert_eq!(env.name, "staging");
        assert_eq!(env.provider, vec!["aws", "gcp"]);
        assert_eq!(env.output_dir, PathBuf::from("build"));
        assert_eq!(env.datasources.elasticsearch.as_deref(), Some("logs"));
    }

    #[test]
    fn test_load_groups_and_dashboards_in_file_order() {
        let temp_dir = tempdir().unwrap();
        write(temp_dir.path(), "environments/dev.toml", "name = \"dev\"\n");
        write(
            temp_dir.path(),
            "alerts/b.toml",
            "[[groups]]\nname = \"second\"\n",
        );
        write(
            temp_dir.path(),
            "alerts/a.toml",
            "[[groups]]\nname = \"first\"\nfolder = \"Infra\"\n",
        );
        write(temp_dir.path(), "alerts/notes.md", "ignored");
        write(
            temp_dir.path(),
            "dashboards/main.toml",
            "[[dashboards]]\nuuid = \"dash-1\"\nfolder = \"Infra\"\npath = \"models/main.json\"\n",
        );
        write(temp_dir.path(), "dashboards/models/main.json", r#"{"title": "Main"}"#);

        let loader = ConfigLoader::new(temp_dir.path());
        let names: Vec<String> = loader
            .load_alert_groups()
            .unwrap()
            .into_iter()
            .map(|g| g.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);

        let dashboards = loader.load_dashboards().unwrap();
        assert_eq!(dashboards.len(), 1);
        assert_eq!(dashboards[0].model["title"], "Main");

        assert!(loader.validate("dev").is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_groups() {
        let temp_dir = tempdir().unwrap();
        write(temp_dir.path(), "environments/dev.toml", "name = \"dev\"\n");
        write(
            temp_dir.path(),
            "alerts/a.toml",
            "[[groups]]\nname = \"dup\"\n\n[[groups]]\nname = \"dup\"\n",
        );

        let loader = ConfigLoader::new(temp_dir.path());
        assert!(loader.validate("dev").is_err());
    }
}
