use crate::intent::AlertIntent;

/// 构建器私有的告警声明队列（按注册顺序）
#[derive(Debug, Clone, Default)]
pub struct IntentRegistry {
    intents: Vec<AlertIntent>,
}

impl IntentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, intent: AlertIntent) {
        self.intents.push(intent);
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlertIntent> {
        self.intents.iter()
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}
