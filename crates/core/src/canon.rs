//! 정규 JSON 텍스트 형식 — 스칼라 렌더링과 길이 계산의 단일 소스
//!
//! [`Value::size_hint`]와 JSON 인코더는 반드시 같은 바이트 수를 말해야 합니다.
//! 그래서 숫자 렌더링, 문자열 이스케이프, base64 길이 계산을 이 모듈 한 곳에
//! 모아두고 양쪽이 공유합니다.
//!
//! - 정수: 십진 표기, 음수는 `-` 접두
//! - f32/f64: ryu의 최단 round-trip 표기 (정수 값도 `1.0`처럼 소수부 포함),
//!   NaN/무한대는 JSON에 없으므로 `null`
//! - 문자열: RFC 8259 이스케이프 (`"` `\` 제어문자), `/`는 그대로
//! - Bytes: 표준 base64 (패딩 포함)
//!
//! [`Value::size_hint`]: crate::value::Value::size_hint

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::{BufMut, BytesMut};

use crate::value::Value;

/// i64의 십진 표기 바이트 길이를 반환합니다.
pub fn int_len(n: i64) -> usize {
    let sign = usize::from(n < 0);
    let mut abs = n.unsigned_abs();
    let mut len = 1;
    while abs >= 10 {
        abs /= 10;
        len += 1;
    }
    sign + len
}

/// i64를 십진 표기로 출력합니다.
pub fn write_int(out: &mut BytesMut, n: i64) {
    out.extend_from_slice(n.to_string().as_bytes());
}

/// f64의 정규 텍스트를 반환합니다.
///
/// 유한 값은 최단 round-trip 표기이며 정수 값에도 소수부가 붙습니다
/// (`1.0`). NaN/무한대는 `null`.
pub fn double_text(x: f64) -> String {
    if !x.is_finite() {
        return "null".to_owned();
    }
    ryu::Buffer::new().format_finite(x).to_owned()
}

/// f32의 정규 텍스트를 반환합니다.
pub fn float_text(x: f32) -> String {
    if !x.is_finite() {
        return "null".to_owned();
    }
    ryu::Buffer::new().format_finite(x).to_owned()
}

/// f64를 정규 텍스트로 출력합니다.
pub fn write_double(out: &mut BytesMut, x: f64) {
    out.extend_from_slice(double_text(x).as_bytes());
}

/// f32를 정규 텍스트로 출력합니다.
pub fn write_float(out: &mut BytesMut, x: f32) {
    out.extend_from_slice(float_text(x).as_bytes());
}

/// 한 바이트의 이스케이프 후 길이
fn escaped_byte_len(b: u8) -> usize {
    match b {
        b'"' | b'\\' | 0x08 | 0x09 | 0x0A | 0x0C | 0x0D => 2,
        0x00..=0x1F => 6, // \u00XX
        _ => 1,
    }
}

/// 문자열의 이스케이프 후 바이트 길이 (따옴표 제외)
pub fn escaped_len(s: &str) -> usize {
    s.bytes().map(escaped_byte_len).sum()
}

/// 문자열을 따옴표로 감싸 이스케이프하여 출력합니다.
pub fn write_quoted(out: &mut BytesMut, s: &str) {
    out.put_u8(b'"');
    for b in s.bytes() {
        match b {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x09 => out.extend_from_slice(b"\\t"),
            0x0A => out.extend_from_slice(b"\\n"),
            0x0C => out.extend_from_slice(b"\\f"),
            0x0D => out.extend_from_slice(b"\\r"),
            0x00..=0x1F => {
                const HEX: &[u8; 16] = b"0123456789abcdef";
                out.extend_from_slice(b"\\u00");
                out.put_u8(HEX[(b >> 4) as usize]);
                out.put_u8(HEX[(b & 0x0F) as usize]);
            }
            _ => out.put_u8(b),
        }
    }
    out.put_u8(b'"');
}

/// n바이트의 base64 인코딩 길이 (패딩 포함)
pub fn base64_len(n: usize) -> usize {
    n.div_ceil(3) * 4
}

/// 값 트리 전체를 정규 JSON으로 출력합니다.
///
/// [`Value::size_hint`]와 항상 같은 바이트 수를 씁니다. `Display`와
/// JSON 인코더가 이 워커 하나를 공유합니다.
pub fn write_value(value: &Value, out: &mut BytesMut) {
    match value {
        Value::Null => out.extend_from_slice(b"null"),
        Value::Bool(true) => out.extend_from_slice(b"true"),
        Value::Bool(false) => out.extend_from_slice(b"false"),
        Value::Int(n) => write_int(out, i64::from(*n)),
        Value::Long(n) => write_int(out, *n),
        Value::Float(x) => write_float(out, *x),
        Value::Double(x) => write_double(out, *x),
        Value::BigDecimal(d) => out.extend_from_slice(d.to_canonical_string().as_bytes()),
        Value::String(s) => write_quoted(out, s),
        Value::Bytes(b) => write_base64_quoted(out, b),
        Value::Array(items) => {
            out.put_u8(b'[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.put_u8(b',');
                }
                write_value(item, out);
            }
            out.put_u8(b']');
        }
        Value::Object(fields) => {
            out.put_u8(b'{');
            for (i, (name, item)) in fields.iter().enumerate() {
                if i > 0 {
                    out.put_u8(b',');
                }
                write_quoted(out, name);
                out.put_u8(b':');
                write_value(item, out);
            }
            out.put_u8(b'}');
        }
    }
}

/// 바이트열을 따옴표로 감싼 base64 문자열로 출력합니다.
pub fn write_base64_quoted(out: &mut BytesMut, raw: &[u8]) {
    out.put_u8(b'"');
    out.extend_from_slice(BASE64.encode(raw).as_bytes());
    out.put_u8(b'"');
}
