//! Syslog 인쇄기 — 문서에서 와이어 형식 바이트로
//!
//! 고정된 필드 순서를 걸으며 각 바인더의 역방향 계약을 호출합니다.
//! `pre` 훅이 정규 구분자(`<`, `>`, 공백, `[` 등)를 내보내므로 매치에
//! 실패한 필드는 구분자도 남기지 않습니다. RFC 5424는 빠진 필드를
//! NILVALUE(`-`)로, RFC 3164는 구분자째 생략으로 처리합니다.
//!
//! 인쇄기는 출력 시 facility/severity의 숫자 범위를 검증하지 않습니다 —
//! 유효한 값을 만드는 것은 파이프라인의 책임입니다.

use bytes::{BufMut, Bytes, BytesMut};
use signalpost_core::canon;
use signalpost_core::value::Value;

use crate::binder::Binder;
use crate::syslog::SyslogBinding;

/// 문서를 RFC 5424 프레임으로 인쇄합니다.
///
/// # 사용 예시
/// ```
/// use signalpost_codec::syslog::{printer, rfc5424, Mode, Rfc5424Config};
///
/// let config = Rfc5424Config::new(Mode::Strict);
/// let doc = rfc5424::parse(b"<34>1 - host su - - - hi", &config).unwrap();
/// let wire = printer::print_rfc5424(&doc, &config.binding);
/// assert_eq!(&wire[..], b"<34>1 - host su - - - hi");
/// ```
pub fn print_rfc5424(doc: &Value, binding: &SyslogBinding) -> Bytes {
    let mut out = BytesMut::with_capacity(64 + doc.size_hint());

    out.put_u8(b'<');
    canon::write_int(&mut out, read_pri(doc, binding));
    out.extend_from_slice(b">1");

    for binder in [
        &binding.timestamp,
        &binding.hostname,
        &binding.app_name,
        &binding.proc_id,
        &binding.msg_id,
        &binding.struct_data,
    ] {
        let bound = binder
            .as_ref()
            .is_some_and(|b| b.bind_out(&mut out, doc, |o| o.put_u8(b' ')));
        if !bound {
            out.extend_from_slice(b" -");
        }
    }

    // MSG는 있을 때만, 구분자와 함께
    if let Some(binder) = &binding.message {
        binder.bind_out(&mut out, doc, |o| o.put_u8(b' '));
    }

    out.freeze()
}

/// 문서를 RFC 3164 프레임으로 인쇄합니다. 빠진 필드는 구분자째 생략됩니다.
pub fn print_rfc3164(doc: &Value, binding: &SyslogBinding) -> Bytes {
    let mut out = BytesMut::with_capacity(64 + doc.size_hint());

    out.put_u8(b'<');
    canon::write_int(&mut out, read_pri(doc, binding));
    out.put_u8(b'>');

    let mut wrote_any = false;

    for binder in [&binding.timestamp, &binding.hostname] {
        if let Some(binder) = binder {
            let bound = binder.bind_out(&mut out, doc, |o| {
                if wrote_any {
                    o.put_u8(b' ');
                }
            });
            wrote_any = wrote_any || bound;
        }
    }

    let mut tag_written = false;
    if let Some(binder) = &binding.app_name {
        tag_written = binder.bind_out(&mut out, doc, |o| {
            if wrote_any {
                o.put_u8(b' ');
            }
        });
        wrote_any = wrote_any || tag_written;
    }

    // TAG 바로 뒤에 [PID]
    if let Some(binder) = &binding.proc_id {
        if binder.bind_out(&mut out, doc, |o| o.put_u8(b'[')) {
            out.put_u8(b']');
            tag_written = true;
            wrote_any = true;
        }
    }

    if tag_written {
        out.put_u8(b':');
    }

    if let Some(binder) = &binding.message {
        binder.bind_out(&mut out, doc, |o| o.put_u8(b' '));
    }

    out.freeze()
}

/// 바인딩된 facility/severity 필드에서 PRI를 계산합니다. 빠진 쪽은 0.
fn read_pri(doc: &Value, binding: &SyslogBinding) -> i64 {
    let read = |binder: &Option<Binder>| {
        binder
            .as_ref()
            .and_then(Binder::key)
            .and_then(|key| doc.get(key))
            .and_then(Value::to_i64)
            .unwrap_or(0)
    };
    read(&binding.facility) * 8 + read(&binding.severity)
}
