//! 바인더 — 원시 스칼라와 문서 필드 사이의 이름 있는 타입 프로젝터
//!
//! 정방향으로는 파서의 capture 슬라이스(또는 타입 있는 스칼라)를 받아
//! 오브젝트 빌더의 필드로 변환해 넣고, 역방향으로는 문서의 필드를 읽어
//! 출력 바이트 버퍼에 정규 텍스트를 덧붙입니다. 두 방향 모두 `bool`을
//! 반환하며 실패 시 부수효과가 없습니다.
//!
//! 정방향 실패(예: 숫자 바인더에 숫자가 아닌 바이트)는 파서 실패로
//! 전파되어 `alt` 수준의 백트래킹을 일으킵니다. 역방향의 `pre` 훅은
//! 매치가 확정된 뒤, 값 텍스트 직전에만 호출됩니다 — 구분자 바이트를
//! 내보내는 자리입니다.

use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use signalpost_core::builder::ObjectBuilder;
use signalpost_core::canon;
use signalpost_core::value::Value;

/// 문자열 바인더의 바이트 해석 문자집합
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// UTF-8 (기본값) — 유효하지 않은 시퀀스는 바인딩 실패
    #[default]
    Utf8,
    /// ISO-8859-1 — 모든 바이트가 그대로 U+00..U+FF로 매핑
    Latin1,
}

impl Charset {
    /// 바이트열을 문자열로 해석합니다.
    pub fn decode(&self, raw: &[u8]) -> Option<String> {
        match self {
            Charset::Utf8 => std::str::from_utf8(raw).ok().map(str::to_owned),
            Charset::Latin1 => Some(raw.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// 문자열을 바이트열로 인코딩하여 `out`에 덧붙입니다.
    ///
    /// Latin-1은 U+00FF 초과 문자를 표현할 수 없으므로 그런 문자가 있으면
    /// 아무것도 쓰지 않고 `false`를 반환합니다.
    pub fn encode_into(&self, text: &str, out: &mut BytesMut) -> bool {
        match self {
            Charset::Utf8 => {
                out.extend_from_slice(text.as_bytes());
                true
            }
            Charset::Latin1 => {
                if text.chars().any(|c| u32::from(c) > 0xFF) {
                    return false;
                }
                for c in text.chars() {
                    out.put_u8(c as u8);
                }
                true
            }
        }
    }
}

/// 바인더에 들어오는 원시 스칼라
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawScalar<'a> {
    /// 불리언
    Bool(bool),
    /// 32비트 정수
    Int(i32),
    /// 64비트 정수
    Long(i64),
    /// 32비트 부동소수
    Float(f32),
    /// 64비트 부동소수
    Double(f64),
    /// 문자열
    Str(&'a str),
    /// 바이트 슬라이스 (파서 capture)
    Bytes(&'a [u8]),
}

/// 이름 있는 타입 프로젝터
///
/// # 사용 예시
/// ```
/// use signalpost_codec::binder::{Binder, RawScalar};
/// use signalpost_core::{ObjectBuilder, Value};
///
/// let binder = Binder::int("severity");
/// let mut builder = ObjectBuilder::new();
/// assert!(binder.bind(&mut builder, RawScalar::Bytes(b"3")));
/// assert_eq!(builder.get("severity"), Some(&Value::Int(3)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binder {
    /// 불활성 바인더 — 항상 거부합니다. 선택적 capture 그룹을 건너뛰는
    /// 센티널로 씁니다.
    None,
    /// 문자열 필드
    String {
        /// 필드 이름
        key: String,
        /// 바이트 해석 문자집합
        #[serde(default)]
        charset: Charset,
    },
    /// 바이트열 필드
    Bytes {
        /// 필드 이름
        key: String,
    },
    /// i32 필드
    Int {
        /// 필드 이름
        key: String,
    },
    /// i64 필드
    Long {
        /// 필드 이름
        key: String,
    },
    /// f32 필드
    Float {
        /// 필드 이름
        key: String,
    },
    /// f64 필드
    Double {
        /// 필드 이름
        key: String,
    },
}

impl Binder {
    /// UTF-8 문자열 바인더를 만듭니다.
    pub fn string(key: impl Into<String>) -> Self {
        Binder::String {
            key: key.into(),
            charset: Charset::Utf8,
        }
    }

    /// 지정 문자집합의 문자열 바인더를 만듭니다.
    pub fn string_with_charset(key: impl Into<String>, charset: Charset) -> Self {
        Binder::String {
            key: key.into(),
            charset,
        }
    }

    /// 바이트열 바인더를 만듭니다.
    pub fn bytes(key: impl Into<String>) -> Self {
        Binder::Bytes { key: key.into() }
    }

    /// i32 바인더를 만듭니다.
    pub fn int(key: impl Into<String>) -> Self {
        Binder::Int { key: key.into() }
    }

    /// i64 바인더를 만듭니다.
    pub fn long(key: impl Into<String>) -> Self {
        Binder::Long { key: key.into() }
    }

    /// f32 바인더를 만듭니다.
    pub fn float(key: impl Into<String>) -> Self {
        Binder::Float { key: key.into() }
    }

    /// f64 바인더를 만듭니다.
    pub fn double(key: impl Into<String>) -> Self {
        Binder::Double { key: key.into() }
    }

    /// 바인더의 필드 이름 (`None` 바인더는 없음)
    pub fn key(&self) -> Option<&str> {
        match self {
            Binder::None => None,
            Binder::String { key, .. }
            | Binder::Bytes { key }
            | Binder::Int { key }
            | Binder::Long { key }
            | Binder::Float { key }
            | Binder::Double { key } => Some(key),
        }
    }

    /// 불활성 바인더인지 확인합니다.
    pub fn is_none(&self) -> bool {
        matches!(self, Binder::None)
    }

    /// 정방향 계약: 원시 스칼라를 변환해 빌더 필드로 넣습니다.
    ///
    /// 성공 시 `key` 아래에 기록하고 `true`, 실패 시 부수효과 없이 `false`.
    pub fn bind(&self, builder: &mut ObjectBuilder, raw: RawScalar<'_>) -> bool {
        let (key, value) = match self {
            Binder::None => return false,
            Binder::String { key, charset } => match coerce_string(raw, *charset) {
                Some(text) => (key, Value::from(text)),
                None => return false,
            },
            Binder::Bytes { key } => match coerce_bytes(raw) {
                Some(bytes) => (key, Value::Bytes(bytes)),
                None => return false,
            },
            Binder::Int { key } => match coerce_i64(raw).and_then(|n| i32::try_from(n).ok()) {
                Some(n) => (key, Value::Int(n)),
                None => return false,
            },
            Binder::Long { key } => match coerce_i64(raw) {
                Some(n) => (key, Value::Long(n)),
                None => return false,
            },
            Binder::Float { key } => match coerce_f64(raw) {
                Some(x) => (key, Value::Float(x as f32)),
                None => return false,
            },
            Binder::Double { key } => match coerce_f64(raw) {
                Some(x) => (key, Value::Double(x)),
                None => return false,
            },
        };
        builder.put(key.clone(), value);
        true
    }

    /// 파서 capture 슬라이스를 정방향 바인딩합니다.
    pub fn bind_slice(&self, builder: &mut ObjectBuilder, raw: &[u8]) -> bool {
        self.bind(builder, RawScalar::Bytes(raw))
    }

    /// 역방향 계약: 문서의 `key` 필드를 읽어 `out`에 정규 텍스트를 덧붙입니다.
    ///
    /// 필드가 있고 변형이 맞으면 `pre` 훅(보통 구분자 출력)을 먼저 호출한 뒤
    /// 값을 쓰고 `true`를 반환합니다. 부재하거나 변형이 다르면 훅 없이 `false`.
    pub fn bind_out(
        &self,
        out: &mut BytesMut,
        doc: &Value,
        pre: impl FnOnce(&mut BytesMut),
    ) -> bool {
        let Some(key) = self.key() else {
            return false;
        };
        let Some(field) = doc.get(key) else {
            return false;
        };

        match (self, field) {
            (Binder::String { charset, .. }, Value::String(text)) => {
                if matches!(charset, Charset::Latin1)
                    && text.chars().any(|c| u32::from(c) > 0xFF)
                {
                    return false;
                }
                pre(out);
                charset.encode_into(text, out)
            }
            (Binder::Bytes { .. }, Value::Bytes(raw)) => {
                pre(out);
                out.extend_from_slice(raw);
                true
            }
            (Binder::Int { .. }, Value::Int(n)) => {
                pre(out);
                canon::write_int(out, i64::from(*n));
                true
            }
            (Binder::Int { .. }, Value::Long(n)) => {
                if i32::try_from(*n).is_err() {
                    return false;
                }
                pre(out);
                canon::write_int(out, *n);
                true
            }
            (Binder::Long { .. }, Value::Int(n)) => {
                pre(out);
                canon::write_int(out, i64::from(*n));
                true
            }
            (Binder::Long { .. }, Value::Long(n)) => {
                pre(out);
                canon::write_int(out, *n);
                true
            }
            (Binder::Float { .. }, Value::Float(x)) => {
                pre(out);
                canon::write_float(out, *x);
                true
            }
            (Binder::Double { .. }, Value::Double(x)) => {
                pre(out);
                canon::write_double(out, *x);
                true
            }
            (Binder::Double { .. }, Value::Float(x)) => {
                pre(out);
                canon::write_double(out, f64::from(*x));
                true
            }
            _ => false,
        }
    }
}

fn coerce_string(raw: RawScalar<'_>, charset: Charset) -> Option<String> {
    match raw {
        RawScalar::Bool(b) => Some(b.to_string()),
        RawScalar::Int(n) => Some(n.to_string()),
        RawScalar::Long(n) => Some(n.to_string()),
        RawScalar::Float(x) => Some(canon::float_text(x)),
        RawScalar::Double(x) => Some(canon::double_text(x)),
        RawScalar::Str(text) => Some(text.to_owned()),
        RawScalar::Bytes(raw) => charset.decode(raw),
    }
}

fn coerce_bytes(raw: RawScalar<'_>) -> Option<Bytes> {
    match raw {
        RawScalar::Bool(b) => Some(Bytes::from(b.to_string())),
        RawScalar::Int(n) => Some(Bytes::from(n.to_string())),
        RawScalar::Long(n) => Some(Bytes::from(n.to_string())),
        RawScalar::Float(x) => Some(Bytes::from(canon::float_text(x))),
        RawScalar::Double(x) => Some(Bytes::from(canon::double_text(x))),
        RawScalar::Str(text) => Some(Bytes::copy_from_slice(text.as_bytes())),
        RawScalar::Bytes(raw) => Some(Bytes::copy_from_slice(raw)),
    }
}

/// 정수 바인더의 공통 해석: 십진 ASCII, bool은 1/0, 부동소수는 무손실일 때만
fn coerce_i64(raw: RawScalar<'_>) -> Option<i64> {
    match raw {
        RawScalar::Bool(b) => Some(i64::from(b)),
        RawScalar::Int(n) => Some(i64::from(n)),
        RawScalar::Long(n) => Some(n),
        RawScalar::Float(x) => integral_f64(f64::from(x)),
        RawScalar::Double(x) => integral_f64(x),
        RawScalar::Str(text) => parse_decimal_ascii(text.as_bytes()),
        RawScalar::Bytes(raw) => parse_decimal_ascii(raw),
    }
}

fn integral_f64(x: f64) -> Option<i64> {
    if x.fract() != 0.0 || x < i64::MIN as f64 || x > i64::MAX as f64 {
        return None;
    }
    Some(x as i64)
}

fn parse_decimal_ascii(raw: &[u8]) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    std::str::from_utf8(raw).ok()?.parse().ok()
}

fn coerce_f64(raw: RawScalar<'_>) -> Option<f64> {
    match raw {
        RawScalar::Bool(b) => Some(if b { 1.0 } else { 0.0 }),
        RawScalar::Int(n) => Some(f64::from(n)),
        RawScalar::Long(n) => Some(n as f64),
        RawScalar::Float(x) => Some(f64::from(x)),
        RawScalar::Double(x) => Some(x),
        RawScalar::Str(text) => text.parse().ok(),
        RawScalar::Bytes(raw) => std::str::from_utf8(raw).ok()?.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(binder: &Binder, raw: RawScalar<'_>) -> Option<Value> {
        let mut builder = ObjectBuilder::new();
        if binder.bind(&mut builder, raw) {
            binder.key().and_then(|k| builder.get(k)).cloned()
        } else {
            None
        }
    }

    #[test]
    fn none_binder_always_rejects() {
        let mut builder = ObjectBuilder::new();
        assert!(!Binder::None.bind(&mut builder, RawScalar::Int(1)));
        assert!(builder.is_empty());
        assert_eq!(Binder::None.key(), None);
    }

    #[test]
    fn int_binder_parses_decimal_ascii() {
        let b = Binder::int("n");
        assert_eq!(bound(&b, RawScalar::Bytes(b"42")), Some(Value::Int(42)));
        assert_eq!(bound(&b, RawScalar::Bytes(b"-17")), Some(Value::Int(-17)));
        assert_eq!(bound(&b, RawScalar::Str("7")), Some(Value::Int(7)));
        assert_eq!(bound(&b, RawScalar::Bytes(b"abc")), None);
        assert_eq!(bound(&b, RawScalar::Bytes(b"")), None);
    }

    #[test]
    fn int_binder_overflow_rejected() {
        let b = Binder::int("n");
        assert_eq!(bound(&b, RawScalar::Bytes(b"2147483648")), None);
        assert_eq!(bound(&b, RawScalar::Long(i64::MAX)), None);
        assert_eq!(
            bound(&b, RawScalar::Long(5)),
            Some(Value::Int(5))
        );
    }

    #[test]
    fn bool_maps_to_numeric_one_zero() {
        assert_eq!(
            bound(&Binder::int("n"), RawScalar::Bool(true)),
            Some(Value::Int(1))
        );
        assert_eq!(
            bound(&Binder::long("n"), RawScalar::Bool(false)),
            Some(Value::Long(0))
        );
        assert_eq!(
            bound(&Binder::double("n"), RawScalar::Bool(true)),
            Some(Value::Double(1.0))
        );
    }

    #[test]
    fn long_binder_full_range() {
        let b = Binder::long("n");
        assert_eq!(
            bound(&b, RawScalar::Bytes(b"9223372036854775807")),
            Some(Value::Long(i64::MAX))
        );
        assert_eq!(bound(&b, RawScalar::Bytes(b"9223372036854775808")), None);
    }

    #[test]
    fn float_double_binders_parse() {
        assert_eq!(
            bound(&Binder::double("x"), RawScalar::Bytes(b"2.5")),
            Some(Value::Double(2.5))
        );
        assert_eq!(
            bound(&Binder::float("x"), RawScalar::Str("0.25")),
            Some(Value::Float(0.25))
        );
        assert_eq!(bound(&Binder::double("x"), RawScalar::Bytes(b"x")), None);
    }

    #[test]
    fn numeric_binder_accepts_integral_float_only() {
        assert_eq!(
            bound(&Binder::int("n"), RawScalar::Double(3.0)),
            Some(Value::Int(3))
        );
        assert_eq!(bound(&Binder::int("n"), RawScalar::Double(3.5)), None);
    }

    #[test]
    fn string_binder_decodes_utf8() {
        let b = Binder::string("s");
        assert_eq!(
            bound(&b, RawScalar::Bytes("한글".as_bytes())),
            Some(Value::from("한글"))
        );
        // 유효하지 않은 UTF-8은 거부
        assert_eq!(bound(&b, RawScalar::Bytes(&[0xFF, 0xFE])), None);
    }

    #[test]
    fn string_binder_latin1_never_rejects_bytes() {
        let b = Binder::string_with_charset("s", Charset::Latin1);
        assert_eq!(
            bound(&b, RawScalar::Bytes(&[0x61, 0xFF])),
            Some(Value::from("a\u{ff}"))
        );
    }

    #[test]
    fn string_binder_coerces_scalars() {
        let b = Binder::string("s");
        assert_eq!(bound(&b, RawScalar::Int(5)), Some(Value::from("5")));
        assert_eq!(bound(&b, RawScalar::Bool(true)), Some(Value::from("true")));
        assert_eq!(
            bound(&b, RawScalar::Double(1.0)),
            Some(Value::from("1.0"))
        );
    }

    #[test]
    fn bytes_binder_wraps_strings_as_utf8() {
        let b = Binder::bytes("b");
        assert_eq!(
            bound(&b, RawScalar::Str("hi")),
            Some(Value::Bytes(Bytes::from_static(b"hi")))
        );
        assert_eq!(
            bound(&b, RawScalar::Bytes(&[0xFF])),
            Some(Value::Bytes(Bytes::from_static(&[0xFF])))
        );
    }

    #[test]
    fn failed_bind_leaves_builder_untouched() {
        let mut builder = ObjectBuilder::new();
        builder.put("n", 1);
        assert!(!Binder::int("n").bind(&mut builder, RawScalar::Bytes(b"zzz")));
        assert_eq!(builder.get("n"), Some(&Value::Int(1)));
    }

    // --- 역방향 ---

    fn doc_with(key: &str, value: Value) -> Value {
        let mut b = ObjectBuilder::new();
        b.put(key, value);
        b.result()
    }

    #[test]
    fn reverse_writes_value_after_pre_hook() {
        let doc = doc_with("severity", Value::Int(3));
        let mut out = BytesMut::new();
        let ok = Binder::int("severity").bind_out(&mut out, &doc, |o| o.put_u8(b' '));
        assert!(ok);
        assert_eq!(&out[..], b" 3");
    }

    #[test]
    fn reverse_missing_field_no_hook() {
        let doc = doc_with("other", Value::Int(3));
        let mut out = BytesMut::new();
        let ok = Binder::int("severity").bind_out(&mut out, &doc, |o| o.put_u8(b' '));
        assert!(!ok);
        assert!(out.is_empty());
    }

    #[test]
    fn reverse_type_mismatch_no_hook() {
        let doc = doc_with("severity", Value::from("high"));
        let mut out = BytesMut::new();
        assert!(!Binder::int("severity").bind_out(&mut out, &doc, |o| o.put_u8(b' ')));
        assert!(out.is_empty());
    }

    #[test]
    fn reverse_int_accepts_small_long() {
        let doc = doc_with("n", Value::Long(7));
        let mut out = BytesMut::new();
        assert!(Binder::int("n").bind_out(&mut out, &doc, |_| {}));
        assert_eq!(&out[..], b"7");

        let doc = doc_with("n", Value::Long(i64::MAX));
        let mut out = BytesMut::new();
        assert!(!Binder::int("n").bind_out(&mut out, &doc, |_| {}));
        assert!(out.is_empty());
    }

    #[test]
    fn reverse_string_and_bytes() {
        let doc = doc_with("s", Value::from("text"));
        let mut out = BytesMut::new();
        assert!(Binder::string("s").bind_out(&mut out, &doc, |o| o.put_u8(b' ')));
        assert_eq!(&out[..], b" text");

        let doc = doc_with("b", Value::Bytes(Bytes::from_static(&[1, 2])));
        let mut out = BytesMut::new();
        assert!(Binder::bytes("b").bind_out(&mut out, &doc, |_| {}));
        assert_eq!(&out[..], &[1, 2]);
    }

    #[test]
    fn reverse_latin1_rejects_wide_chars_without_hook() {
        let b = Binder::string_with_charset("s", Charset::Latin1);
        let doc = doc_with("s", Value::from("한글"));
        let mut out = BytesMut::new();
        assert!(!b.bind_out(&mut out, &doc, |o| o.put_u8(b' ')));
        assert!(out.is_empty());
    }

    #[test]
    fn reverse_float_canonical_text() {
        let doc = doc_with("x", Value::Double(1.0));
        let mut out = BytesMut::new();
        assert!(Binder::double("x").bind_out(&mut out, &doc, |_| {}));
        assert_eq!(&out[..], b"1.0");
    }

    #[test]
    fn reverse_on_non_object_doc() {
        let mut out = BytesMut::new();
        assert!(!Binder::int("n").bind_out(&mut out, &Value::Int(1), |_| {}));
    }

    #[test]
    fn binder_serialize_deserialize() {
        let b = Binder::string_with_charset("hostname", Charset::Latin1);
        let json = serde_json::to_string(&b).unwrap();
        let back: Binder = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);
    }
}
