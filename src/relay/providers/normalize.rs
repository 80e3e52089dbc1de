//! 响应归一化
//!
//! 上游可能返回多种响应包装，这里按固定优先级依次尝试提取器，
//! 第一个认领该响应的提取器决定结果：
//!
//! 1. `choices` — OpenAI 兼容格式，取 `choices[0].message.content`
//! 2. `data` — RAGFlow 原生格式，`data.answer` / `data.content` / 字符串 / 原样文本
//! 3. `answer` — 顶层直接返回 answer
//!
//! 都不匹配时返回整个响应体的 JSON 文本，保证调用方总能拿到内容。

use crate::relay::log_codes::nrm;
use crate::relay::RelayError;
use serde_json::{Map, Value};

/// 提取器：`None` 表示该响应形状不归它处理，`Some` 即为最终结果
type Extractor = fn(&Map<String, Value>) -> Option<Result<String, RelayError>>;

const EXTRACTORS: &[(&str, Extractor)] = &[
    ("choices", extract_choices),
    ("data", extract_data),
    ("answer", extract_answer),
];

/// 将上游 200 响应体归一为纯文本回复
pub fn normalize_reply(body: &Value) -> Result<String, RelayError> {
    let object = body
        .as_object()
        .ok_or_else(|| RelayError::malformed("响应体不是 JSON 对象"))?;

    for (shape, extractor) in EXTRACTORS {
        if let Some(result) = extractor(object) {
            log::debug!("[{}] 响应按 `{shape}` 格式解析", nrm::SHAPE_MATCHED);
            return result;
        }
    }

    log::debug!("[{}] 未识别的响应格式，原样返回", nrm::PASSTHROUGH);
    Ok(body.to_string())
}

/// 非空字段；JSON `null` 视为不存在
fn present<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|v| !v.is_null())
}

fn required_str(value: &Value, field: &str) -> Result<String, RelayError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| RelayError::malformed(format!("{field} 不是字符串")))
}

/// OpenAI 兼容格式：`choices[0].message.content`
pub(crate) fn extract_choices(object: &Map<String, Value>) -> Option<Result<String, RelayError>> {
    let choices = present(object, "choices")?;
    let content = choices
        .get(0)
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .ok_or_else(|| RelayError::malformed("choices[0].message.content 缺失"))
        .and_then(|content| required_str(content, "choices[0].message.content"));
    Some(content)
}

fn extract_data(object: &Map<String, Value>) -> Option<Result<String, RelayError>> {
    let data = present(object, "data")?;
    let result = match data {
        Value::Object(inner) => {
            if let Some(answer) = inner.get("answer") {
                required_str(answer, "data.answer")
            } else if let Some(content) = inner.get("content") {
                required_str(content, "data.content")
            } else {
                Ok(data.to_string())
            }
        }
        Value::String(text) => Ok(text.clone()),
        other => Ok(other.to_string()),
    };
    Some(result)
}

fn extract_answer(object: &Map<String, Value>) -> Option<Result<String, RelayError>> {
    let answer = object.get("answer")?;
    Some(required_str(answer, "answer"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_choices_envelope() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "hello"}}]});
        assert_eq!(normalize_reply(&body).unwrap(), "hello");
    }

    #[test]
    fn test_choices_wins_over_data() {
        let body = json!({
            "choices": [{"message": {"content": "from choices"}}],
            "data": {"answer": "from data"}
        });
        assert_eq!(normalize_reply(&body).unwrap(), "from choices");
    }

    #[test]
    fn test_null_choices_falls_through_to_data() {
        let body = json!({"choices": null, "data": {"answer": "X"}});
        assert_eq!(normalize_reply(&body).unwrap(), "X");
    }

    #[test]
    fn test_data_answer() {
        let body = json!({"code": 0, "data": {"answer": "X", "reference": {}}});
        assert_eq!(normalize_reply(&body).unwrap(), "X");
    }

    #[test]
    fn test_data_content_when_no_answer() {
        let body = json!({"data": {"content": "C"}});
        assert_eq!(normalize_reply(&body).unwrap(), "C");
    }

    #[test]
    fn test_data_object_without_known_fields_returns_text() {
        let body = json!({"data": {"id": "abc"}});
        assert_eq!(normalize_reply(&body).unwrap(), r#"{"id":"abc"}"#);
    }

    #[test]
    fn test_data_string_is_verbatim() {
        let body = json!({"data": "plain answer"});
        assert_eq!(normalize_reply(&body).unwrap(), "plain answer");
    }

    #[test]
    fn test_data_other_value_returns_text() {
        assert_eq!(normalize_reply(&json!({"data": true})).unwrap(), "true");
        assert_eq!(normalize_reply(&json!({"data": [1, 2]})).unwrap(), "[1,2]");
    }

    #[test]
    fn test_top_level_answer() {
        let body = json!({"answer": "Y"});
        assert_eq!(normalize_reply(&body).unwrap(), "Y");
    }

    #[test]
    fn test_unknown_shape_passthrough() {
        let body = json!({"code": 102, "message": "no permission"});
        assert_eq!(normalize_reply(&body).unwrap(), body.to_string());
    }

    #[test]
    fn test_empty_choices_is_malformed() {
        let body = json!({"choices": []});
        assert!(matches!(
            normalize_reply(&body),
            Err(RelayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_string_answer_is_malformed() {
        let body = json!({"data": {"answer": 42}});
        assert!(matches!(
            normalize_reply(&body),
            Err(RelayError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        assert!(matches!(
            normalize_reply(&json!(["a"])),
            Err(RelayError::MalformedResponse(_))
        ));
    }
}
