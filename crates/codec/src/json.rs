//! JSON 코덱 — RFC 8259 파서와 정규 문자열화
//!
//! 파서는 [`Scanner`] 조합기 위의 재귀 하강이며 숫자 리터럴을 다음 규칙으로
//! 변형에 배정합니다:
//!
//! - 소수점/지수 없는 리터럴: i32에 맞으면 `Int`, i64에 맞으면 `Long`,
//!   그 외에는 `BigDecimal`
//! - `.` 또는 `e`/`E`가 있는 리터럴: 정밀도 손실을 피해 항상 `BigDecimal`
//!
//! JSON 프레임은 입력 전체입니다: 값 하나와 뒤따르는 공백 뒤에 입력이
//! 끝나야 합니다. 문자열화는 삽입 순서를 그대로 내보내고, 출력 버퍼를
//! [`Value::size_hint`]로 한 번에 할당합니다.

use bytes::{Bytes, BytesMut};
use signalpost_core::builder::{ArrayBuilder, ObjectBuilder};
use signalpost_core::canon;
use signalpost_core::decimal::Decimal;
use signalpost_core::error::{DecimalParseError, ParseError};
use signalpost_core::value::Value;

use crate::error::{ScanError, ScanErrorKind};
use crate::scan::{ScanResult, Scanner};

/// 최대 중첩 깊이 — 초과 시 스택 오버플로 대신 파싱 실패
const MAX_NESTING_DEPTH: usize = 128;

/// JSON 바이트를 문서 값으로 파싱합니다.
///
/// # 사용 예시
/// ```
/// use signalpost_codec::json;
/// use signalpost_core::Value;
///
/// let doc = json::parse(br#"{"status":200}"#).unwrap();
/// assert_eq!(doc.get("status"), Some(&Value::Int(200)));
/// ```
pub fn parse(input: &[u8]) -> Result<Value, ParseError> {
    let mut s = Scanner::new(input);
    skip_ws(&mut s);
    let value = parse_value(&mut s, 0)?;
    skip_ws(&mut s);
    s.expect_eof()?;
    Ok(value)
}

/// UTF-8 문자열을 문서 값으로 파싱합니다.
pub fn parse_str(input: &str) -> Result<Value, ParseError> {
    parse(input.as_bytes())
}

/// 문서 값을 정규 JSON 바이트로 직렬화합니다.
///
/// 출력 길이는 항상 [`Value::size_hint`]와 같습니다.
pub fn stringify(value: &Value) -> Bytes {
    let mut out = BytesMut::with_capacity(value.size_hint());
    canon::write_value(value, &mut out);
    out.freeze()
}

fn skip_ws(s: &mut Scanner<'_>) {
    s.take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
}

fn parse_value(s: &mut Scanner<'_>, depth: usize) -> ScanResult<Value> {
    match s.peek() {
        Some(b'{') => parse_object(s, depth),
        Some(b'[') => parse_array(s, depth),
        Some(b'"') => parse_string(s).map(Value::from),
        Some(b't') => s.literal(b"true").map(|_| Value::Bool(true)),
        Some(b'f') => s.literal(b"false").map(|_| Value::Bool(false)),
        Some(b'n') => s.literal(b"null").map(|_| Value::Null),
        Some(b'-') | Some(b'0'..=b'9') => parse_number(s),
        Some(_) => Err(s.expected("json value")),
        None => Err(s.error(ScanErrorKind::EndOfInput)),
    }
}

fn parse_object(s: &mut Scanner<'_>, depth: usize) -> ScanResult<Value> {
    if depth >= MAX_NESTING_DEPTH {
        tracing::warn!(
            offset = s.pos(),
            "json nesting depth exceeds limit ({}), rejecting input",
            MAX_NESTING_DEPTH
        );
        return Err(s.expected("nesting within depth limit"));
    }
    s.ch(b'{')?;
    skip_ws(s);
    let mut builder = ObjectBuilder::new();
    if s.opt(|s| s.ch(b'}')).is_some() {
        return Ok(builder.result());
    }
    loop {
        skip_ws(s);
        let name = parse_string(s)?;
        skip_ws(s);
        s.ch(b':')?;
        skip_ws(s);
        let value = parse_value(s, depth + 1)?;
        builder.put(name, value);
        skip_ws(s);
        match s.bump() {
            Some(b',') => continue,
            Some(b'}') => return Ok(builder.result()),
            Some(_) => {
                return Err(ScanError {
                    offset: s.pos() - 1,
                    kind: ScanErrorKind::Expected("',' or '}'"),
                })
            }
            None => return Err(s.error(ScanErrorKind::EndOfInput)),
        }
    }
}

fn parse_array(s: &mut Scanner<'_>, depth: usize) -> ScanResult<Value> {
    if depth >= MAX_NESTING_DEPTH {
        tracing::warn!(
            offset = s.pos(),
            "json nesting depth exceeds limit ({}), rejecting input",
            MAX_NESTING_DEPTH
        );
        return Err(s.expected("nesting within depth limit"));
    }
    s.ch(b'[')?;
    skip_ws(s);
    let mut builder = ArrayBuilder::new();
    if s.opt(|s| s.ch(b']')).is_some() {
        return Ok(builder.result());
    }
    loop {
        skip_ws(s);
        let value = parse_value(s, depth + 1)?;
        builder.add(value);
        skip_ws(s);
        match s.bump() {
            Some(b',') => continue,
            Some(b']') => return Ok(builder.result()),
            Some(_) => {
                return Err(ScanError {
                    offset: s.pos() - 1,
                    kind: ScanErrorKind::Expected("',' or ']'"),
                })
            }
            None => return Err(s.error(ScanErrorKind::EndOfInput)),
        }
    }
}

fn parse_hex4(s: &mut Scanner<'_>) -> ScanResult<u32> {
    let mut code = 0u32;
    for _ in 0..4 {
        let b = match s.bump() {
            Some(b) => b,
            None => return Err(s.error(ScanErrorKind::EndOfInput)),
        };
        let digit = match b {
            b'0'..=b'9' => u32::from(b - b'0'),
            b'a'..=b'f' => u32::from(b - b'a' + 10),
            b'A'..=b'F' => u32::from(b - b'A' + 10),
            _ => {
                return Err(ScanError {
                    offset: s.pos() - 1,
                    kind: ScanErrorKind::Expected("hex digit"),
                })
            }
        };
        code = code * 16 + digit;
    }
    Ok(code)
}

fn push_code_point(out: &mut Vec<u8>, code: u32, err: ScanError) -> ScanResult<()> {
    let c = char::from_u32(code).ok_or(err)?;
    let mut buf = [0u8; 4];
    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    Ok(())
}

fn parse_string(s: &mut Scanner<'_>) -> ScanResult<String> {
    let start = s.pos();
    s.ch(b'"')?;
    let mut raw: Vec<u8> = Vec::new();
    loop {
        let b = match s.bump() {
            Some(b) => b,
            None => return Err(s.error(ScanErrorKind::EndOfInput)),
        };
        match b {
            b'"' => break,
            b'\\' => {
                let esc = match s.bump() {
                    Some(e) => e,
                    None => return Err(s.error(ScanErrorKind::EndOfInput)),
                };
                match esc {
                    b'"' => raw.push(b'"'),
                    b'\\' => raw.push(b'\\'),
                    b'/' => raw.push(b'/'),
                    b'b' => raw.push(0x08),
                    b'f' => raw.push(0x0C),
                    b'n' => raw.push(b'\n'),
                    b'r' => raw.push(b'\r'),
                    b't' => raw.push(b'\t'),
                    b'u' => {
                        let esc_offset = s.pos() - 2;
                        let bad = ScanError {
                            offset: esc_offset,
                            kind: ScanErrorKind::Expected("valid unicode escape"),
                        };
                        let hi = parse_hex4(s)?;
                        match hi {
                            0xD800..=0xDBFF => {
                                // surrogate pair 필수
                                s.literal(b"\\u").map_err(|_| bad)?;
                                let lo = parse_hex4(s)?;
                                if !(0xDC00..=0xDFFF).contains(&lo) {
                                    return Err(bad);
                                }
                                let code =
                                    0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                                push_code_point(&mut raw, code, bad)?;
                            }
                            0xDC00..=0xDFFF => return Err(bad),
                            _ => push_code_point(&mut raw, hi, bad)?,
                        }
                    }
                    _ => {
                        return Err(ScanError {
                            offset: s.pos() - 1,
                            kind: ScanErrorKind::Expected("valid escape"),
                        })
                    }
                }
            }
            0x00..=0x1F => {
                return Err(ScanError {
                    offset: s.pos() - 1,
                    kind: ScanErrorKind::Expected("escaped control character"),
                })
            }
            _ => raw.push(b),
        }
    }
    String::from_utf8(raw).map_err(|_| ScanError {
        offset: start,
        kind: ScanErrorKind::Expected("valid utf-8 string"),
    })
}

fn parse_number(s: &mut Scanner<'_>) -> ScanResult<Value> {
    let start = s.pos();
    let (is_decimal, literal) = s.capture(|s| {
        s.opt(|s| s.ch(b'-'));
        if s.opt(|s| s.ch(b'0')).is_none() {
            s.range(b'1'..=b'9')?;
            s.take_while(|b| b.is_ascii_digit());
        }
        let mut decimal = false;
        if s.opt(|s| {
            s.atomic(|s| {
                s.ch(b'.')?;
                s.take_while1("digit", |b| b.is_ascii_digit())?;
                Ok(())
            })
        })
        .is_some()
        {
            decimal = true;
        }
        if s.opt(|s| {
            s.atomic(|s| {
                s.any_of(b"eE")?;
                s.opt(|s| s.any_of(b"+-"));
                s.take_while1("digit", |b| b.is_ascii_digit())?;
                Ok(())
            })
        })
        .is_some()
        {
            decimal = true;
        }
        Ok(decimal)
    })?;

    let text = std::str::from_utf8(literal).map_err(|_| ScanError {
        offset: start,
        kind: ScanErrorKind::Expected("ascii number"),
    })?;

    if is_decimal {
        return decimal_value(text, start);
    }

    match text.parse::<i64>() {
        Ok(n) => match i32::try_from(n) {
            Ok(small) => Ok(Value::Int(small)),
            Err(_) => Ok(Value::Long(n)),
        },
        // i64를 넘는 정수 리터럴
        Err(_) => decimal_value(text, start),
    }
}

fn decimal_value(text: &str, offset: usize) -> ScanResult<Value> {
    match text.parse::<Decimal>() {
        Ok(d) => Ok(Value::BigDecimal(d)),
        Err(DecimalParseError::ExponentOverflow) => Err(ScanError {
            offset,
            kind: ScanErrorKind::Overflow,
        }),
        Err(DecimalParseError::Malformed) => Err(ScanError {
            offset,
            kind: ScanErrorKind::Expected("valid number"),
        }),
    }
}
