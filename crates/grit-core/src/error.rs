use thiserror::Error;

/// GRIT 统一错误类型
#[derive(Error, Debug)]
pub enum GritError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Alert rule title must not be empty")]
    EmptyTitle,

    #[error("Rule '{rule}' is missing required field '{field}'")]
    MissingField { rule: String, field: String },

    #[error("Rule '{rule}' uses a {found} metric but the builder compiles {expected} rules")]
    BackendMismatch {
        rule: String,
        expected: String,
        found: String,
    },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Invalid time range token: '{0}'")]
    InvalidTimeRange(String),

    #[error("Rule '{rule}' assigns reference id '{ref_id}' more than once")]
    DuplicateRefId { rule: String, ref_id: String },

    #[error("Rule '{rule}': node '{ref_id}' must feed exactly one later node, found {uses}")]
    Unwired {
        rule: String,
        ref_id: String,
        uses: usize,
    },

    #[error("Alert group '{group}' contains rule uid '{uid}' more than once (title '{title}')")]
    DuplicateUid {
        group: String,
        uid: String,
        title: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GritError {
    pub fn missing_field(rule: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MissingField {
            rule: rule.into(),
            field: field.into(),
        }
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GritError>;
