use std::collections::HashMap;

use grit_core::{create_uid_from_string, GritError, Result};
use grit_types::{AlertGroup, AlertRule};
use tracing::debug;

use crate::builder::AlertRuleBuilder;

const DEFAULT_FOLDER: &str = "alert";
const DEFAULT_INTERVAL: &str = "1m";

/// 告警规则组（一个预配单元）
#[derive(Debug, Clone, PartialEq)]
pub struct AlertRulesGroup {
    pub name: String,
    pub folder: String,
    pub evaluate_interval: String,
    pub rules: Vec<AlertRule>,
}

impl AlertRulesGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            folder: DEFAULT_FOLDER.to_string(),
            evaluate_interval: DEFAULT_INTERVAL.to_string(),
            rules: Vec::new(),
        }
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.evaluate_interval = interval.into();
        self
    }

    pub fn with_rules(mut self, rules: Vec<AlertRule>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// 追加多个构建器的编译结果（保持构建器顺序）
    pub fn with_builders<'a, I>(self, builders: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a AlertRuleBuilder>,
    {
        let rules = AlertRuleBuilder::build_all(builders)?;
        Ok(self.with_rules(rules))
    }

    /// 由文件夹与组名派生的确定性 UID
    ///
    /// 文件夹带长度前缀（`<len>:<folder>/<name>`），名称中含 `/` 时也不会与其他组相撞。
    pub fn uid(&self) -> String {
        create_uid_from_string(&format!("{}:{}/{}", self.folder.len(), self.folder, self.name))
    }

    /// 校验组名、文件夹以及组内规则 UID 唯一
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GritError::Config("alert group name must not be empty".to_string()));
        }
        if self.folder.trim().is_empty() {
            return Err(GritError::Config(format!("alert group '{}' has no folder", self.name)));
        }
        if self.evaluate_interval.trim().is_empty() {
            return Err(GritError::Config(format!(
                "alert group '{}' has no evaluation interval",
                self.name
            )));
        }

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for rule in &self.rules {
            if seen.insert(&rule.uid, &rule.title).is_some() {
                return Err(GritError::DuplicateUid {
                    group: self.name.clone(),
                    uid: rule.uid.clone(),
                    title: rule.title.clone(),
                });
            }
        }

        Ok(())
    }

    /// 生成带 UID 的不可变告警组
    pub fn into_alert_group(self) -> AlertGroup {
        let uid = self.uid();
        debug!(group = %self.name, folder = %self.folder, uid = %uid, rules = self.rules.len(), "Alert group composed");

        AlertGroup {
            name: self.name,
            uid,
            rules: self.rules,
            folder: self.folder,
            evaluate_interval: self.evaluate_interval,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::BuilderConfig;
    use crate::intent::{AlertIntent, PrometheusMetric};
    use grit_core::Environment;

    fn builder(titles: &[&str]) -> AlertRuleBuilder {
        let env = Environment::new("dev", Vec::new());
        let mut builder = AlertRuleBuilder::prometheus(env, BuilderConfig::default()).unwrap();
        for title in titles {
            builder.register(AlertIntent::new(*title, PrometheusMetric::new("up"), "$REDUCE_EXPRESSION < 1"));
        }
        builder
    }

    #[test]
    fn test_group_defaults_and_uid() {
        let group = AlertRulesGroup::new("TestGroup");
        assert_eq!(group.folder, "alert");
        assert_eq!(group.evaluate_interval, "1m");
        assert_eq!(group.uid(), create_uid_from_string("5:alert/TestGroup"));

        let alert_group = group.into_alert_group();
        assert!(!alert_group.uid.is_empty());
    }

    #[test]
    fn test_uid_separates_folder_from_name() {
        let nested_folder = AlertRulesGroup::new("c").with_folder("a/b");
        let nested_name = AlertRulesGroup::new("b/c").with_folder("a");

        assert_ne!(nested_folder.uid(), nested_name.uid());
        assert_eq!(nested_folder.uid(), AlertRulesGroup::new("c").with_folder("a/b").uid());
    }

    #[test]
    fn test_validate_rejects_duplicate_uids() {
        let a = builder(&["one"]);
        let b = builder(&["two", "one"]);
        let group = AlertRulesGroup::new("g").with_builders([&a, &b]).unwrap();

        assert_eq!(group.rules.len(), 3);
        assert!(matches!(group.validate(), Err(GritError::DuplicateUid { .. })));
    }

    #[test]
    fn test_validate_accepts_unique() {
        let a = builder(&["one", "two"]);
        let group = AlertRulesGroup::new("g").with_folder("AWS").with_builders([&a]).unwrap();
        assert!(group.validate().is_ok());
        assert!(AlertRulesGroup::new(" ").validate().is_err());
    }
}
