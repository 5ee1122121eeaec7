use serde_json::Value;

/// 仪表盘（模型本身不透明，原样输出）
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// 调用方指定的 UUID，决定输出文件名
    pub uuid: String,

    /// 输出文件夹
    pub folder: String,

    /// 仪表盘 JSON 模型
    pub model: Value,
}

impl Dashboard {
    pub fn new(uuid: impl Into<String>, folder: impl Into<String>, model: Value) -> Self {
        Self {
            uuid: uuid.into(),
            folder: folder.into(),
            model,
        }
    }
}
