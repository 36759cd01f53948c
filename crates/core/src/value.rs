//! 문서 값 모델 — 파이프라인을 흐르는 이벤트의 메모리 표현
//!
//! [`Value`]는 JSON 형태의 값 트리이며 바이트열([`Value::Bytes`])과
//! 세분화된 숫자 변형을 추가로 가집니다. 컨테이너(`String`/`Array`/`Object`)는
//! `Arc`로 공유되어 빌더의 freeze-on-result와 스레드 간 읽기 공유를 모두
//! 값싸게 만듭니다.
//!
//! # 동등성
//!
//! 구조적 동등성입니다. 오브젝트는 필드 순서를 무시하고 키 집합과 값으로
//! 비교하며(삽입 순서는 순회에서만 관찰됩니다), 배열은 위치까지 비교합니다.
//! 숫자 변형끼리는 수학적으로 같아도 변형이 다르면 같지 않습니다
//! (`Int(1) != Long(1)`). 변형을 넘는 비교가 필요하면 [`Value::to_i64`] 같은
//! 명시적 변환 접근자를 사용하십시오.

use std::fmt;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use indexmap::IndexMap;

use crate::canon;
use crate::decimal::Decimal;
use crate::merge;
use crate::pointer::Pointer;

/// 구조화 문서 값
///
/// # 사용 예시
/// ```
/// use signalpost_core::{ObjectBuilder, Value};
///
/// let mut b = ObjectBuilder::new();
/// b.put("host", "web-01").put("port", 514);
/// let doc = b.result();
/// assert_eq!(doc.get("host").and_then(Value::as_str), Some("web-01"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// null
    Null,
    /// 불리언
    Bool(bool),
    /// 32비트 부호 있는 정수
    Int(i32),
    /// 64비트 부호 있는 정수
    Long(i64),
    /// 32비트 IEEE-754
    Float(f32),
    /// 64비트 IEEE-754
    Double(f64),
    /// 임의 정밀도 십진수
    BigDecimal(Decimal),
    /// UTF-8 문자열
    String(Arc<str>),
    /// 불투명 바이트열 — JSON으로는 base64 문자열로 표현됩니다
    Bytes(Bytes),
    /// 순서 있는 배열
    Array(Arc<Vec<Value>>),
    /// 삽입 순서를 보존하는 오브젝트
    Object(Arc<IndexMap<String, Value>>),
}

impl Value {
    /// 변형 이름을 반환합니다 (에러 메시지용).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::Double(_) => "double",
            Value::BigDecimal(_) => "bigdecimal",
            Value::String(_) => "string",
            Value::Bytes(_) => "bytes",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// null인지 확인합니다.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// 불리언 값을 반환합니다.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// 문자열 슬라이스를 반환합니다.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// 바이트열을 반환합니다.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    /// 배열 슬라이스를 반환합니다.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// 오브젝트 필드 맵을 반환합니다.
    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(m) => Some(m),
            _ => None,
        }
    }

    /// 오브젝트에서 필드를 조회합니다. 오브젝트가 아니면 `None`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_object().and_then(|m| m.get(name))
    }

    /// 포인터를 평가합니다. [`Pointer::evaluate`] 참고.
    pub fn at<'v>(&'v self, pointer: &Pointer) -> Option<&'v Value> {
        pointer.evaluate(self)
    }

    /// 숫자 변형을 i32로 변환합니다 (범위를 벗어나면 `None`).
    pub fn to_i32(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Long(n) => i32::try_from(*n).ok(),
            Value::BigDecimal(d) => d.to_i32(),
            _ => None,
        }
    }

    /// 숫자 변형을 i64로 변환합니다.
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(i64::from(*n)),
            Value::Long(n) => Some(*n),
            Value::BigDecimal(d) => d.to_i64(),
            _ => None,
        }
    }

    /// 숫자 변형을 f32로 변환합니다.
    pub fn to_f32(&self) -> Option<f32> {
        match self {
            Value::Int(n) => Some(*n as f32),
            Value::Long(n) => Some(*n as f32),
            Value::Float(x) => Some(*x),
            Value::Double(x) => Some(*x as f32),
            Value::BigDecimal(d) => Some(d.to_f32()),
            _ => None,
        }
    }

    /// 숫자 변형을 f64로 변환합니다.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(f64::from(*n)),
            Value::Long(n) => Some(*n as f64),
            Value::Float(x) => Some(f64::from(*x)),
            Value::Double(x) => Some(*x),
            Value::BigDecimal(d) => Some(d.to_f64()),
            _ => None,
        }
    }

    /// 정규 JSON 문자열화의 정확한 바이트 길이를 반환합니다.
    ///
    /// 인코더가 출력 버퍼를 한 번에 할당하는 데 사용합니다. 문자열은
    /// 이스케이프 확장까지 반영하므로 실제 출력 길이와 항상 일치합니다.
    pub fn size_hint(&self) -> usize {
        match self {
            Value::Null => 4,
            Value::Bool(true) => 4,
            Value::Bool(false) => 5,
            Value::Int(n) => canon::int_len(i64::from(*n)),
            Value::Long(n) => canon::int_len(*n),
            Value::Float(x) => canon::float_text(*x).len(),
            Value::Double(x) => canon::double_text(*x).len(),
            Value::BigDecimal(d) => d.canonical_len(),
            Value::String(s) => canon::escaped_len(s) + 2,
            Value::Bytes(b) => canon::base64_len(b.len()) + 2,
            Value::Array(items) => {
                let commas = items.len().saturating_sub(1);
                2 + commas + items.iter().map(Value::size_hint).sum::<usize>()
            }
            Value::Object(fields) => {
                let commas = fields.len().saturating_sub(1);
                2 + commas
                    + fields
                        .iter()
                        .map(|(k, v)| canon::escaped_len(k) + 3 + v.size_hint())
                        .sum::<usize>()
            }
        }
    }

    /// 얕은 병합 — `other`의 최상위 필드가 우선합니다. [`merge::merge`] 참고.
    pub fn merge(&self, other: &Value) -> Value {
        merge::merge(self, other)
    }

    /// 깊은 병합 — 양쪽이 모두 컨테이너이면 재귀합니다. [`merge::deep_merge`] 참고.
    pub fn deep_merge(&self, other: &Value) -> Value {
        merge::deep_merge(self, other)
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl fmt::Display for Value {
    /// 정규 JSON 텍스트로 표시합니다. 출력 길이는 [`Value::size_hint`]와 같습니다.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = BytesMut::with_capacity(self.size_hint());
        canon::write_value(self, &mut out);
        f.write_str(std::str::from_utf8(&out).map_err(|_| fmt::Error)?)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<f32> for Value {
    fn from(x: f32) -> Self {
        Value::Float(x)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Double(x)
    }
}

impl From<Decimal> for Value {
    fn from(d: Decimal) -> Self {
        Value::BigDecimal(d)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s.as_str()))
    }
}

impl From<Bytes> for Value {
    fn from(b: Bytes) -> Self {
        Value::Bytes(b)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Arc::new(items))
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(fields: IndexMap<String, Value>) -> Self {
        Value::Object(Arc::new(fields))
    }
}
