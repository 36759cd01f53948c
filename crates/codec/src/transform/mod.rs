//! 파이프라인 트랜스포머 — 코덱을 [`Transform`] 계약으로 감싼 구현들
//!
//! - [`json::JsonSource`] / [`json::JsonSink`]: bytes ↔ 문서 (JSON)
//! - [`json::JsonFieldTransform`]: 문서 내 한 필드의 JSON 직렬화/역직렬화
//! - [`syslog::SyslogSource`] / [`syslog::SyslogSink`]: bytes ↔ 문서 (syslog)
//!
//! 트랜스포머는 내부 코덱의 에러를 전부 받아서 정책(`on_error`)으로
//! 소화합니다. 스트리밍 레이어는 변형된 요소, 변경 없는 입력, 또는 요소
//! 생략(`None`)만 봅니다 — 에러가 위로 전파되는 일은 없습니다.
//!
//! [`Transform`]: signalpost_core::Transform

pub mod json;
pub mod syslog;

pub use json::{JsonFieldTransform, JsonMode, JsonSink, JsonSource};
pub use syslog::{SyslogFormat, SyslogSink, SyslogSource};

use signalpost_core::value::Value;

/// 소스 트랜스포머의 기본 입력 상한 (1 MiB)
pub(crate) const DEFAULT_MAX_INPUT_SIZE: usize = 1024 * 1024;

/// fast-skip 판정: 빈 문자열 / 빈 바이트열
pub(crate) fn is_empty_scalar(value: &Value) -> bool {
    match value {
        Value::String(s) => s.is_empty(),
        Value::Bytes(b) => b.is_empty(),
        _ => false,
    }
}
