//! JSON 트랜스포머 — 소스/싱크와 필드 단위 직렬화/역직렬화
//!
//! [`JsonFieldTransform`]은 문서의 한 필드를 JSON으로 다루는
//! SimpleTransformer입니다. 역직렬화 모드는 원본 구현의 quick-check를
//! 그대로 유지합니다: 앞뒤 공백을 제외한 첫 바이트가 `{`이고 마지막이
//! `}`일 때만 파서를 부릅니다 — 필드 안의 JSON 배열은 절대 역직렬화되지
//! 않습니다.

use bytes::Bytes;
use signalpost_core::builder::ObjectBuilder;
use signalpost_core::transform::{ErrorAction, FieldTransformConfig, SuccessAction, Transform};
use signalpost_core::value::Value;
use signalpost_core::{Patch, PatchOp};

use crate::json;
use crate::transform::{is_empty_scalar, DEFAULT_MAX_INPUT_SIZE};

/// JSON 소스 트랜스포머: 원시 프레임 → 문서
///
/// 파싱에 실패한 프레임은 debug 로그와 함께 버려집니다 — 바이트 입력에는
/// "변경 없이 통과"시킬 출력 타입이 없습니다.
#[derive(Debug, Clone)]
pub struct JsonSource {
    /// 최대 허용 입력 크기 (바이트)
    max_input_size: usize,
}

impl JsonSource {
    /// 기본 설정으로 생성합니다.
    pub fn new() -> Self {
        Self {
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }
}

impl Default for JsonSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for JsonSource {
    type Input = Bytes;
    type Output = Value;

    fn apply(&mut self, input: Bytes) -> Option<Value> {
        if input.len() > self.max_input_size {
            tracing::debug!(
                size = input.len(),
                max = self.max_input_size,
                "dropping oversized json frame"
            );
            return None;
        }
        match json::parse(&input) {
            Ok(doc) => Some(doc),
            Err(error) => {
                tracing::debug!(%error, "dropping malformed json frame");
                None
            }
        }
    }
}

/// JSON 싱크 트랜스포머: 문서 → 정규 JSON 바이트 (실패 없음)
#[derive(Debug, Clone, Default)]
pub struct JsonSink;

impl JsonSink {
    /// 싱크를 생성합니다.
    pub fn new() -> Self {
        Self
    }
}

impl Transform for JsonSink {
    type Input = Value;
    type Output = Bytes;

    fn apply(&mut self, input: Value) -> Option<Bytes> {
        Some(json::stringify(&input))
    }
}

/// 필드 변환 방향
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonMode {
    /// 필드 값 → JSON 텍스트
    Serialize,
    /// JSON 텍스트 필드 → 구조화 값
    Deserialize,
}

/// 필드 단위 JSON 트랜스포머 (문서 → 문서)
///
/// # 사용 예시
/// ```
/// use signalpost_codec::transform::{JsonFieldTransform, JsonMode};
/// use signalpost_codec::json;
/// use signalpost_core::{FieldTransformConfig, Pointer, Transform};
///
/// let config = FieldTransformConfig::new(Pointer::root() / "payload");
/// let mut t = JsonFieldTransform::new(config, JsonMode::Deserialize);
///
/// let doc = json::parse(br#"{"payload":"{\"ok\":true}"}"#).unwrap();
/// let out = t.apply(doc).unwrap();
/// assert!(out.get("payload").unwrap().get("ok").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct JsonFieldTransform {
    config: FieldTransformConfig,
    mode: JsonMode,
}

impl JsonFieldTransform {
    /// 설정과 방향으로 트랜스포머를 만듭니다.
    pub fn new(config: FieldTransformConfig, mode: JsonMode) -> Self {
        Self { config, mode }
    }

    /// 역직렬화 트랜스포머를 만듭니다.
    pub fn deserialize(config: FieldTransformConfig) -> Self {
        Self::new(config, JsonMode::Deserialize)
    }

    /// 직렬화 트랜스포머를 만듭니다.
    pub fn serialize(config: FieldTransformConfig) -> Self {
        Self::new(config, JsonMode::Serialize)
    }

    /// 실패 정책을 적용합니다.
    fn on_error(&self, input: Value, reason: &str) -> Option<Value> {
        match self.config.on_error {
            ErrorAction::Skip => {
                tracing::debug!(source = %self.config.source, reason, "field transform skipped");
                Some(input)
            }
            ErrorAction::Discard => {
                tracing::debug!(source = %self.config.source, reason, "field transform discarded element");
                None
            }
        }
    }

    /// 변환 결과를 target에 기록하고 on_success 정책을 적용합니다.
    fn write_target(&self, input: Value, produced: Value) -> Option<Value> {
        let target = self.config.resolved_target().clone();

        let mut out = if target.is_root() {
            // 루트 대상 + 오브젝트 결과: 최상위에 필드 병합 (충돌은 덮어씀)
            let merged = match &produced {
                Value::Object(fields) => ObjectBuilder::from_value(&input).map(|mut builder| {
                    for (name, value) in fields.iter() {
                        builder.put(name.clone(), value.clone());
                    }
                    builder.result()
                }),
                _ => None,
            };
            // 그 외에는 값이 요소 전체를 대체
            merged.unwrap_or(produced)
        } else {
            let patch = Patch::from(vec![PatchOp::Add {
                path: target.clone(),
                value: produced,
            }]);
            match input.try_patch(&patch) {
                Ok(out) => out,
                Err(error) => {
                    tracing::debug!(%error, "target path not writable");
                    return self.on_error(input, "target path not writable");
                }
            }
        };

        if self.config.on_success == SuccessAction::Remove && self.config.source != target {
            let removal = Patch::from(vec![PatchOp::Remove {
                path: self.config.source.clone(),
                must_exist: false,
            }]);
            if let Ok(cleaned) = out.try_patch(&removal) {
                out = cleaned;
            }
        }

        Some(out)
    }

    fn apply_deserialize(&self, input: Value, raw: Vec<u8>) -> Option<Value> {
        // quick-check: 공백을 제외한 첫 바이트 '{', 마지막 바이트 '}'
        let trimmed = trim_ascii_ws(&raw);
        if !(trimmed.first() == Some(&b'{') && trimmed.last() == Some(&b'}')) {
            return Some(input);
        }
        match json::parse(trimmed) {
            Ok(parsed) => self.write_target(input, parsed),
            Err(error) => self.on_error(input, &error.to_string()),
        }
    }

    fn apply_serialize(&self, input: Value, source_value: &Value) -> Option<Value> {
        let text = json::stringify(source_value);
        match String::from_utf8(text.to_vec()) {
            Ok(text) => self.write_target(input, Value::from(text)),
            Err(_) => self.on_error(input, "non-utf8 stringify output"),
        }
    }
}

impl Transform for JsonFieldTransform {
    type Input = Value;
    type Output = Value;

    fn apply(&mut self, input: Value) -> Option<Value> {
        // fast-skip: 소스 부재 또는 빈 스칼라
        let Some(source_value) = self.config.source.evaluate(&input) else {
            return Some(input);
        };
        if is_empty_scalar(source_value) {
            return Some(input);
        }

        match self.mode {
            JsonMode::Deserialize => {
                let raw: Vec<u8> = match source_value {
                    Value::String(text) => text.as_bytes().to_vec(),
                    Value::Bytes(bytes) => bytes.to_vec(),
                    // 텍스트가 아닌 소스는 역직렬화 대상이 아니다
                    _ => return Some(input),
                };
                self.apply_deserialize(input, raw)
            }
            JsonMode::Serialize => {
                let source_value = source_value.clone();
                self.apply_serialize(input, &source_value)
            }
        }
    }
}

fn trim_ascii_ws(raw: &[u8]) -> &[u8] {
    let start = raw
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let end = raw
        .iter()
        .rposition(|b| !b.is_ascii_whitespace())
        .map_or(start, |i| i + 1);
    &raw[start..end]
}
