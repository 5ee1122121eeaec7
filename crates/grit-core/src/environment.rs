use serde::{Deserialize, Serialize};

/// 部署环境
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    /// 环境名称，如 "prod"
    pub name: String,

    /// 可用的云提供商 / 后端标识，如 ["aws", "gcp"]
    #[serde(default)]
    pub provider: Vec<String>,
}

impl Environment {
    pub fn new(name: impl Into<String>, provider: Vec<String>) -> Self {
        Self {
            name: name.into(),
            provider,
        }
    }

    pub fn has_provider(&self, provider: &str) -> bool {
        self.provider.iter().any(|p| p == provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_provider() {
        let env = Environment::new("prod", vec!["aws".to_string(), "gcp".to_string()]);
        assert!(env.has_provider("aws"));
        assert!(!env.has_provider("azure"));
        assert!(!Environment::new("dev", Vec::new()).has_provider("aws"));
    }
}
