use sha2::{Digest, Sha256};

/// 由字符串派生确定性 UID（SHA-256 十六进制）
///
/// 相同输入始终得到相同结果，不依赖进程状态、调用顺序或时间，
/// 重复生成时已预配的告警文件保持不变。
pub fn create_uid_from_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uid_is_deterministic() {
        assert_eq!(create_uid_from_string("High CPU"), create_uid_from_string("High CPU"));
    }

    #[test]
    fn test_uid_distinct_titles() {
        assert_ne!(create_uid_from_string("High CPU"), create_uid_from_string("High CPU "));
        assert_ne!(create_uid_from_string("a"), create_uid_from_string("b"));
    }

    #[test]
    fn test_uid_known_digest() {
        assert_eq!(
            create_uid_from_string(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(create_uid_from_string("High CPU").len(), 64);
    }
}
