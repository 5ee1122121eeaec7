use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GritError, Result};

const NOW: &str = "now";
const NOW_PREFIX: &str = "now-";

fn unit_seconds(unit: char) -> Option<u64> {
    match unit {
        'm' => Some(60),
        'h' => Some(3_600),
        'd' => Some(86_400),
        'w' => Some(604_800),
        _ => None,
    }
}

/// 严格解析相对时间标记，返回相对 "now" 的秒数
///
/// 支持 `now`、`now-<N><unit>` 与 `<N><unit>`，unit 为 m / h / d / w。
pub fn try_normalize(token: &str) -> Result<u64> {
    if token == NOW {
        return Ok(0);
    }

    let body = token.strip_prefix(NOW_PREFIX).unwrap_or(token);
    let invalid = || GritError::InvalidTimeRange(token.to_string());

    let unit = body.chars().last().ok_or_else(invalid)?;
    let seconds = unit_seconds(unit).ok_or_else(invalid)?;

    let amount = &body[..body.len() - unit.len_utf8()];
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    amount
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(seconds))
        .ok_or_else(invalid)
}

/// 宽松解析：无法识别的标记返回 0
pub fn normalize(token: &str) -> u64 {
    try_normalize(token).unwrap_or(0)
}

/// 查询相对时间范围
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
}

impl TimeRange {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    /// 解析两端为秒数
    ///
    /// `lenient` 为 true 时无法识别的标记按 0 处理并记录警告。
    pub fn resolve(&self, lenient: bool) -> Result<(u64, u64)> {
        Ok((resolve_bound(&self.from, lenient)?, resolve_bound(&self.to, lenient)?))
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::new("5m", NOW)
    }
}

fn resolve_bound(token: &str, lenient: bool) -> Result<u64> {
    match try_normalize(token) {
        Ok(seconds) => Ok(seconds),
        Err(_) if lenient => {
            warn!(token = %token, "Unrecognized time range token, using 0");
            Ok(0)
        }
        Err(e) => Err(e),
    }
}
