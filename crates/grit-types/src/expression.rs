use serde_json::{json, Value};

use crate::state::{ExpressionType, ReduceFunction, ReduceMode};
use crate::EXPRESSION_DATASOURCE_UID;

/// 服务端表达式节点（reduce / math 等）
#[derive(Debug, Clone, PartialEq)]
pub struct AlertExpression {
    /// 引用 ID
    pub ref_id: String,

    /// 表达式类型
    pub expression_type: ExpressionType,

    /// 表达式内容：reduce 时为输入节点的引用 ID，math 时为计算表达式
    pub expression: String,

    /// 归约函数（仅 reduce 使用）
    pub reduce_function: ReduceFunction,

    /// 归约模式（仅 reduce 使用）
    pub reduce_mode: ReduceMode,

    /// replaceNN 模式下的替换值
    pub reduce_replace_with: f64,

    pub interval_ms: u64,
    pub max_data_points: u64,
    pub hide: bool,
}

impl AlertExpression {
    fn base(ref_id: impl Into<String>, expression_type: ExpressionType, expression: impl Into<String>) -> Self {
        Self {
            ref_id: ref_id.into(),
            expression_type,
            expression: expression.into(),
            reduce_function: ReduceFunction::default(),
            reduce_mode: ReduceMode::default(),
            reduce_replace_with: 0.0,
            interval_ms: 1000,
            max_data_points: 43200,
            hide: false,
        }
    }

    /// 创建 reduce 节点，`input` 为被归约节点的引用 ID
    pub fn reduce(ref_id: impl Into<String>, input: impl Into<String>, function: ReduceFunction) -> Self {
        Self {
            reduce_function: function,
            ..Self::base(ref_id, ExpressionType::Reduce, input)
        }
    }

    /// 创建 math 节点
    pub fn math(ref_id: impl Into<String>, expression: impl Into<String>) -> Self {
        Self::base(ref_id, ExpressionType::Math, expression)
    }

    pub fn with_reduce_mode(mut self, mode: ReduceMode) -> Self {
        self.reduce_mode = mode;
        self
    }

    /// 当前节点消费的上游引用 ID
    pub fn referenced_ids(&self) -> Vec<String> {
        match self.expression_type {
            ExpressionType::Reduce | ExpressionType::Resample | ExpressionType::Threshold => {
                vec![self.expression.clone()]
            }
            ExpressionType::Math | ExpressionType::ClassicConditions => {
                parse_math_references(&self.expression)
            }
        }
    }

    pub fn to_json_data(&self) -> Value {
        json!({
            "refId": self.ref_id,
            "queryType": "",
            "relativeTimeRange": { "from": 0, "to": 0 },
            "datasourceUid": EXPRESSION_DATASOURCE_UID,
            "model": {
                "conditions": [],
                "datasource": { "type": EXPRESSION_DATASOURCE_UID, "uid": EXPRESSION_DATASOURCE_UID },
                "expression": self.expression,
                "hide": self.hide,
                "intervalMs": self.interval_ms,
                "maxDataPoints": self.max_data_points,
                "refId": self.ref_id,
                "type": self.expression_type.as_str(),
                "reducer": self.reduce_function.as_str(),
                "settings": {
                    "mode": self.reduce_mode.as_str(),
                    "replaceWithValue": self.reduce_replace_with,
                },
            },
        })
    }
}

/// 解析 math 表达式中的 `$NAME` 与 `${NAME}` 引用
pub fn parse_math_references(expression: &str) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();
    let mut chars = expression.char_indices().peekable();

    while let Some((_, c)) = chars.next() {
        if c != '$' {
            continue;
        }

        let mut name = String::new();
        if let Some(&(_, '{')) = chars.peek() {
            chars.next();
            for (_, c) in chars.by_ref() {
                if c == '}' {
                    break;
                }
                name.push(c);
            }
        } else {
            while let Some(&(_, c)) = chars.peek() {
                if c.is_ascii_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
        }

        if !name.is_empty() && !refs.contains(&name) {
            refs.push(name);
        }
    }

    refs
}
