//! RFC 3164 (BSD syslog) 파서
//!
//! 문법:
//! ```text
//! <PRI>TIMESTAMP SP HOSTNAME SP TAG[PID]: MSG
//! ```
//!
//! TIMESTAMP는 `MMM dd HH:MM:SS` (일은 공백 또는 숫자 패딩), TAG는
//! 영숫자 최대 32바이트, PID는 대괄호 안의 숫자이며 선택적입니다.
//! 모드 손잡이는 없습니다. 콜론 뒤 공백 하나는 메시지에서 제외합니다.

use signalpost_core::builder::ObjectBuilder;
use signalpost_core::error::ParseError;
use signalpost_core::value::Value;

use crate::binder::RawScalar;
use crate::error::{ScanError, ScanErrorKind};
use crate::scan::{ScanResult, Scanner};
use crate::syslog::{bind_or_fail, is_print_usascii, parse_pri, Rfc3164Config};

/// TAG 최대 길이 (바이트)
const MAX_TAG_LEN: usize = 32;

const MONTHS: [&[u8]; 12] = [
    b"Jan", b"Feb", b"Mar", b"Apr", b"May", b"Jun", b"Jul", b"Aug", b"Sep", b"Oct", b"Nov",
    b"Dec",
];

/// RFC 3164 프레임을 문서로 파싱합니다.
///
/// # 사용 예시
/// ```
/// use signalpost_codec::syslog::{rfc3164, Rfc3164Config};
/// use signalpost_core::Value;
///
/// let doc = rfc3164::parse(
///     b"<34>Jan 15 12:00:00 myhost sshd[1234]: Failed password",
///     &Rfc3164Config::default(),
/// )
/// .unwrap();
/// assert_eq!(doc.get("appName").and_then(Value::as_str), Some("sshd"));
/// assert_eq!(doc.get("procId").and_then(Value::as_str), Some("1234"));
/// ```
pub fn parse(input: &[u8], config: &Rfc3164Config) -> Result<Value, ParseError> {
    let mut s = Scanner::new(input);
    let mut builder = ObjectBuilder::new();
    parse_into(&mut s, config, &mut builder)?;
    Ok(builder.result())
}

fn parse_into(
    s: &mut Scanner<'_>,
    config: &Rfc3164Config,
    builder: &mut ObjectBuilder,
) -> ScanResult<()> {
    let binding = &config.binding;

    // <PRI>
    s.ch(b'<')?;
    let pri_offset = s.pos();
    let pri = parse_pri(s)?;
    s.ch(b'>')?;
    bind_or_fail(
        builder,
        &binding.facility,
        RawScalar::Int(i32::from(pri / 8)),
        pri_offset,
    )?;
    bind_or_fail(
        builder,
        &binding.severity,
        RawScalar::Int(i32::from(pri % 8)),
        pri_offset,
    )?;

    // TIMESTAMP: MMM dd HH:MM:SS
    let ts_offset = s.pos();
    let (_, ts) = s.capture(timestamp)?;
    bind_or_fail(builder, &binding.timestamp, RawScalar::Bytes(ts), ts_offset)?;
    s.ch(b' ')?;

    // HOSTNAME
    let host_offset = s.pos();
    let host = s.take_while1("hostname", is_print_usascii)?;
    bind_or_fail(builder, &binding.hostname, RawScalar::Bytes(host), host_offset)?;
    s.ch(b' ')?;

    // TAG (영숫자, 최대 32)
    let tag_offset = s.pos();
    let tag = s.take_while1("tag", |b| b.is_ascii_alphanumeric())?;
    if tag.len() > MAX_TAG_LEN {
        return Err(ScanError {
            offset: tag_offset,
            kind: ScanErrorKind::Expected("tag within length limit"),
        });
    }
    bind_or_fail(builder, &binding.app_name, RawScalar::Bytes(tag), tag_offset)?;

    // [PID] (선택)
    let pid = s.opt(|s| {
        s.atomic(|s| {
            s.ch(b'[')?;
            let digits = s.take_while1("pid digit", |b| b.is_ascii_digit())?;
            s.ch(b']')?;
            Ok(digits)
        })
    });
    if let Some(digits) = pid {
        bind_or_fail(builder, &binding.proc_id, RawScalar::Bytes(digits), tag_offset)?;
    }

    // ':' 뒤 공백 하나는 구분자로 소비
    s.ch(b':')?;
    s.opt(|s| s.ch(b' '));

    let msg_offset = s.pos();
    let msg = s.take_rest();
    bind_or_fail(builder, &binding.message, RawScalar::Bytes(msg), msg_offset)?;

    Ok(())
}

/// `MMM dd HH:MM:SS` — 일은 ` 5` 또는 `15` 형태
fn timestamp(s: &mut Scanner<'_>) -> ScanResult<()> {
    let month_offset = s.pos();
    let month = s.take_while1("month", |b| b.is_ascii_alphabetic())?;
    if !MONTHS.contains(&month) {
        return Err(ScanError {
            offset: month_offset,
            kind: ScanErrorKind::Expected("month name"),
        });
    }
    s.ch(b' ')?;

    // day: 공백 패딩 한 자리 또는 1-2자리 숫자
    if s.opt(|s| {
        s.atomic(|s| {
            s.ch(b' ')?;
            s.range(b'0'..=b'9').map(|_| ())
        })
    })
    .is_none()
    {
        s.range(b'0'..=b'9')?;
        s.opt(|s| s.range(b'0'..=b'9'));
    }
    s.ch(b' ')?;

    two_digits(s)?;
    s.ch(b':')?;
    two_digits(s)?;
    s.ch(b':')?;
    two_digits(s)?;
    Ok(())
}

fn two_digits(s: &mut Scanner<'_>) -> ScanResult<()> {
    s.range(b'0'..=b'9')?;
    s.range(b'0'..=b'9').map(|_| ())
}
