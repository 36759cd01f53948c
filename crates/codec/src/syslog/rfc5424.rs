//! RFC 5424 syslog 파서
//!
//! 문법 (요약):
//! ```text
//! <PRI>VERSION SP TIMESTAMP SP HOSTNAME SP APP-NAME SP PROCID SP MSGID
//!     SP STRUCTURED-DATA [SP MSG]
//! ```
//!
//! `PRI = facility*8 + severity`이고 0..=191만 유효합니다. VERSION은 `1`.
//! 모든 필수 필드는 NILVALUE(`-`)일 수 있으며 그 경우 바인더를 호출하지
//! 않습니다. STRUCTURED-DATA는 `[id k="v" ...]...` 전체를 슬라이스 하나로
//! capture하여 structData 바인더에 넘깁니다.
//!
//! 길이 상한은 [`Mode`]가 정합니다 — Strict를 통과하는 프레임은 Lenient도
//! 항상 같은 문서로 받아들입니다.

use signalpost_core::builder::ObjectBuilder;
use signalpost_core::error::ParseError;
use signalpost_core::value::Value;

use crate::binder::RawScalar;
use crate::error::{ScanError, ScanErrorKind};
use crate::scan::{ScanResult, Scanner};
use crate::syslog::{bind_or_fail, is_print_usascii, parse_pri, Mode, Rfc5424Config};

/// RFC 5424 프레임을 문서로 파싱합니다.
///
/// # 사용 예시
/// ```
/// use signalpost_codec::syslog::{rfc5424, Mode, Rfc5424Config};
/// use signalpost_core::Value;
///
/// let config = Rfc5424Config::new(Mode::Strict);
/// let doc = rfc5424::parse(
///     b"<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - hello",
///     &config,
/// )
/// .unwrap();
/// assert_eq!(doc.get("facility"), Some(&Value::Int(4)));
/// assert_eq!(doc.get("severity"), Some(&Value::Int(2)));
/// ```
pub fn parse(input: &[u8], config: &Rfc5424Config) -> Result<Value, ParseError> {
    let mut s = Scanner::new(input);
    let mut builder = ObjectBuilder::new();
    parse_into(&mut s, config, &mut builder)?;
    Ok(builder.result())
}

fn parse_into(
    s: &mut Scanner<'_>,
    config: &Rfc5424Config,
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

    // VERSION
    s.ch(b'1')?;
    s.ch(b' ')?;

    // TIMESTAMP
    let (offset, token) = header_field(s, "timestamp")?;
    if let Some(token) = token {
        if !is_valid_timestamp(token) {
            return Err(ScanError {
                offset,
                kind: ScanErrorKind::Expected("rfc3339 timestamp"),
            });
        }
        bind_or_fail(builder, &binding.timestamp, RawScalar::Bytes(token), offset)?;
    }
    s.ch(b' ')?;

    // HOSTNAME / APP-NAME / PROCID / MSGID
    capped_field(s, builder, &binding.hostname, "hostname", config.mode.max_hostname())?;
    s.ch(b' ')?;
    capped_field(s, builder, &binding.app_name, "app-name", config.mode.max_app_name())?;
    s.ch(b' ')?;
    capped_field(s, builder, &binding.proc_id, "procid", config.mode.max_proc_id())?;
    s.ch(b' ')?;
    capped_field(s, builder, &binding.msg_id, "msgid", config.mode.max_msg_id())?;
    s.ch(b' ')?;

    // STRUCTURED-DATA
    if s.opt(nilvalue).is_none() {
        let sd_offset = s.pos();
        let (_, sd) = s.capture(|s| s.times(1, None, sd_element))?;
        bind_or_fail(builder, &binding.struct_data, RawScalar::Bytes(sd), sd_offset)?;
    }

    // [SP MSG]
    if s.opt(|s| s.ch(b' ')).is_some() {
        let msg_offset = s.pos();
        let msg = s.take_rest();
        bind_or_fail(builder, &binding.message, RawScalar::Bytes(msg), msg_offset)?;
    } else {
        s.expect_eof()?;
    }

    Ok(())
}

/// 공백으로 끝나는 헤더 필드 하나를 읽습니다. NILVALUE면 `None`.
fn header_field<'a>(
    s: &mut Scanner<'a>,
    what: &'static str,
) -> ScanResult<(usize, Option<&'a [u8]>)> {
    let offset = s.pos();
    let token = s.take_while1(what, is_print_usascii)?;
    if token == b"-" {
        Ok((offset, None))
    } else {
        Ok((offset, Some(token)))
    }
}

/// 길이 상한이 있는 헤더 필드를 읽어 바인딩합니다.
fn capped_field(
    s: &mut Scanner<'_>,
    builder: &mut ObjectBuilder,
    binder: &Option<crate::binder::Binder>,
    what: &'static str,
    cap: usize,
) -> ScanResult<()> {
    let (offset, token) = header_field(s, what)?;
    let Some(token) = token else {
        return Ok(());
    };
    if token.len() > cap {
        return Err(ScanError {
            offset,
            kind: ScanErrorKind::Expected("field within length limit"),
        });
    }
    bind_or_fail(builder, binder, RawScalar::Bytes(token), offset)
}

/// NILVALUE: 필드 전체가 `-` 하나
fn nilvalue(s: &mut Scanner<'_>) -> ScanResult<()> {
    s.atomic(|s| {
        s.ch(b'-')?;
        match s.peek() {
            None | Some(b' ') => Ok(()),
            Some(_) => Err(s.expected("nilvalue")),
        }
    })
}

/// SD-ELEMENT 하나: `[` 부터 따옴표/이스케이프를 존중하며 짝이 맞는 `]`까지
fn sd_element(s: &mut Scanner<'_>) -> ScanResult<()> {
    s.atomic(|s| {
        s.ch(b'[')?;
        let mut in_quote = false;
        let mut escaped = false;
        loop {
            let b = match s.bump() {
                Some(b) => b,
                None => return Err(s.error(ScanErrorKind::EndOfInput)),
            };
            if escaped {
                escaped = false;
                continue;
            }
            match b {
                b'\\' if in_quote => escaped = true,
                b'"' => in_quote = !in_quote,
                b']' if !in_quote => return Ok(()),
                _ => {}
            }
        }
    })
}

/// RFC 3339 타임스탬프 문법 검사 (달력 변환 없이 형태만)
///
/// `YYYY-MM-DDTHH:MM:SS[.frac](Z|±HH:MM)`
fn is_valid_timestamp(token: &[u8]) -> bool {
    let mut s = Scanner::new(token);
    timestamp(&mut s).is_ok() && s.is_eof()
}

fn timestamp<'a>(s: &mut Scanner<'a>) -> ScanResult<()> {
    fixed_digits(s, 4)?;
    s.ch(b'-')?;
    fixed_digits(s, 2)?;
    s.ch(b'-')?;
    fixed_digits(s, 2)?;
    s.ch(b'T')?;
    fixed_digits(s, 2)?;
    s.ch(b':')?;
    fixed_digits(s, 2)?;
    s.ch(b':')?;
    fixed_digits(s, 2)?;
    s.opt(|s| {
        s.atomic(|s| {
            s.ch(b'.')?;
            let frac = s.take_while1("fraction digit", |b| b.is_ascii_digit())?;
            if frac.len() > 6 {
                Err(s.expected("at most 6 fraction digits"))
            } else {
                Ok(())
            }
        })
    });
    s.alt(
        "time offset",
        &[
            zulu_offset as fn(&mut Scanner<'a>) -> ScanResult<()>,
            numeric_offset as fn(&mut Scanner<'a>) -> ScanResult<()>,
        ],
    )
}

fn zulu_offset(s: &mut Scanner<'_>) -> ScanResult<()> {
    s.ch(b'Z')
}

fn numeric_offset(s: &mut Scanner<'_>) -> ScanResult<()> {
    s.any_of(b"+-")?;
    fixed_digits(s, 2)?;
    s.ch(b':')?;
    fixed_digits(s, 2)?;
    Ok(())
}

fn fixed_digits(s: &mut Scanner<'_>, count: usize) -> ScanResult<()> {
    s.times(count, Some(count), |s| s.range(b'0'..=b'9'))
        .map(|_| ())
}
