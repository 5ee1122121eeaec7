use grit_core::Result;
use serde_json::{Map, Value};

/// 键按字典序排列、两空格缩进、以换行结尾的 JSON
///
/// 相同输入产生逐字节相同的输出。
pub fn to_canonical_json(value: &Value) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&sorted(value))?;
    out.push('\n');
    Ok(out)
}

fn sorted(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut ordered = Map::new();
            for key in keys {
                ordered.insert(key.clone(), sorted(&map[key]));
            }
            Value::Object(ordered)
        }
        Value::Array(items) => Value::Array(items.iter().map(sorted).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_sorted_and_indented() {
        let value = json!({ "b": 1, "a": { "z": true, "c": [ { "y": 1, "x": 2 } ] } });
        let out = to_canonical_json(&value).unwrap();

        assert_eq!(
            out,
            "{\n  \"a\": {\n    \"c\": [\n      {\n        \"x\": 2,\n        \"y\": 1\n      }\n    ],\n    \"z\": true\n  },\n  \"b\": 1\n}\n"
        );
    }

    #[test]
    fn test_output_is_stable() {
        let value = json!({ "uid": "x", "data": [1, 2, 3], "for": "5m" });
        assert_eq!(to_canonical_json(&value).unwrap(), to_canonical_json(&value).unwrap());
    }
}
