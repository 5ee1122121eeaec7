use std::path::PathBuf;

use anyhow::{Context, Result};
use grit_config::{ConfigLoader, EnvironmentConfig, GroupDefinition};
use grit_output::{Artifact, ArtifactSet, ArtifactSink, FileSink, MemorySink};
use grit_rule::{AlertRuleBuilder, AlertRulesGroup};
use tracing::{info, warn};

/// generate / inspect 共用选项
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub config_dir: PathBuf,
    pub environment: String,

    /// 覆盖环境配置中的 output_dir
    pub out: Option<PathBuf>,

    /// 所有构建器统一宽松解析时间标记
    pub lenient_time_ranges: bool,
}

impl GenerateOptions {
    pub fn new(config_dir: impl Into<PathBuf>, environment: impl Into<String>) -> Self {
        Self {
            config_dir: config_dir.into(),
            environment: environment.into(),
            out: None,
            lenient_time_ranges: false,
        }
    }

    pub fn with_out(mut self, out: impl Into<PathBuf>) -> Self {
        self.out = Some(out.into());
        self
    }

    pub fn with_lenient_time_ranges(mut self, lenient: bool) -> Self {
        self.lenient_time_ranges = lenient;
        self
    }

    fn output_root(&self, env: &EnvironmentConfig) -> PathBuf {
        self.out.clone().unwrap_or_else(|| env.output_dir.clone())
    }
}

/// inspect 输出的一行
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary {
    pub name: String,
    pub folder: String,
    pub uid: String,
    pub rules: Vec<String>,
    pub path: PathBuf,
}

/// 编译单个组定义：构建器 → 规则 → 校验后的告警组
fn compose_group(
    definition: &GroupDefinition,
    env: &EnvironmentConfig,
    lenient: bool,
) -> Result<AlertRulesGroup> {
    let builders = definition
        .builders
        .iter()
        .map(|b| b.to_builder(env, lenient))
        .collect::<Result<Vec<AlertRuleBuilder>>>()
        .with_context(|| format!("invalid builder in group '{}'", definition.name))?;

    let group = AlertRulesGroup::new(definition.name.clone())
        .with_folder(definition.folder.clone())
        .with_interval(definition.interval.clone())
        .with_builders(&builders)
        .with_context(|| format!("failed to compile alert group '{}'", definition.name))?;

    group.validate()?;
    Ok(group)
}

/// 加载配置并收集全部产物（告警组在前，仪表盘在后）
///
/// 先整体校验配置目录（重复的组与仪表盘、非法构建器），再编译。
pub fn collect_artifacts(options: &GenerateOptions) -> Result<(EnvironmentConfig, ArtifactSet)> {
    let loader = ConfigLoader::new(&options.config_dir);
    loader.validate(&options.environment)?;
    let env = loader.load_environment(&options.environment)?;

    let mut artifacts = ArtifactSet::new();
    for definition in loader.load_alert_groups()? {
        let group = compose_group(&definition, &env, options.lenient_time_ranges)?;
        artifacts.push(group.into_alert_group());
    }
    for dashboard in loader.load_dashboards()? {
        artifacts.push(dashboard);
    }

    if artifacts.is_empty() {
        warn!(config_dir = %options.config_dir.display(), "No alert groups or dashboards defined");
    }
    info!(environment = %env.name, artifacts = artifacts.len(), "Artifacts collected");

    Ok((env, artifacts))
}

/// 生成并写出全部预配文件
pub fn generate(options: &GenerateOptions) -> Result<Vec<PathBuf>> {
    let (env, artifacts) = collect_artifacts(options)?;
    let root = options.output_root(&env);

    let mut sink = FileSink::new(&root, env.name.clone());
    let paths = sink
        .write_all(&artifacts)
        .with_context(|| format!("failed to write artifacts under {}", root.display()))?;

    info!(environment = %env.name, files = paths.len(), root = %root.display(), "Generation complete");
    Ok(paths)
}

/// 编译但不写文件，返回各告警组摘要
pub fn inspect(options: &GenerateOptions) -> Result<Vec<GroupSummary>> {
    let (env, artifacts) = collect_artifacts(options)?;
    let mut sink = MemorySink::new(env.name.clone());

    let mut summaries = Vec::new();
    for artifact in artifacts.iter() {
        let path = sink.write(artifact)?;
        if let Artifact::Alerts(group) = artifact {
            summaries.push(GroupSummary {
                name: group.name.clone(),
                folder: group.folder.clone(),
                uid: group.uid.clone(),
                rules: group.rules.iter().map(|r| r.title.clone()).collect(),
                path,
            });
        }
    }

    Ok(summaries)
}
