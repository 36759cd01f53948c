//! Syslog 트랜스포머 — 프레임 코덱을 소스/싱크로 감쌉니다
//!
//! [`SyslogSource`]는 원시 프레임을 문서로, [`SyslogSink`]는 문서를
//! 와이어 바이트로 변환합니다. 형식은 [`SyslogFormat`]으로 고릅니다.

use bytes::Bytes;
use signalpost_core::transform::Transform;
use signalpost_core::value::Value;

use crate::syslog::{printer, rfc3164, rfc5424, Rfc3164Config, Rfc5424Config};
use crate::transform::DEFAULT_MAX_INPUT_SIZE;

/// 프레임 형식과 그 설정
#[derive(Debug, Clone, PartialEq)]
pub enum SyslogFormat {
    /// RFC 5424
    Rfc5424(Rfc5424Config),
    /// RFC 3164 (BSD)
    Rfc3164(Rfc3164Config),
}

/// Syslog 소스 트랜스포머: 원시 프레임 → 문서
///
/// # 사용 예시
/// ```
/// use bytes::Bytes;
/// use signalpost_codec::syslog::{Mode, Rfc5424Config};
/// use signalpost_codec::transform::{SyslogFormat, SyslogSource};
/// use signalpost_core::{Transform, Value};
///
/// let mut source = SyslogSource::new(SyslogFormat::Rfc5424(Rfc5424Config::new(Mode::Strict)));
/// let doc = source
///     .apply(Bytes::from_static(b"<34>1 - host su - - - hi"))
///     .unwrap();
/// assert_eq!(doc.get("appName").and_then(Value::as_str), Some("su"));
/// ```
#[derive(Debug, Clone)]
pub struct SyslogSource {
    format: SyslogFormat,
    max_input_size: usize,
}

impl SyslogSource {
    /// 형식을 지정해 소스를 만듭니다.
    pub fn new(format: SyslogFormat) -> Self {
        Self {
            format,
            max_input_size: DEFAULT_MAX_INPUT_SIZE,
        }
    }

    /// 최대 입력 크기를 설정합니다.
    pub fn with_max_input_size(mut self, size: usize) -> Self {
        self.max_input_size = size;
        self
    }
}

impl Transform for SyslogSource {
    type Input = Bytes;
    type Output = Value;

    fn apply(&mut self, input: Bytes) -> Option<Value> {
        if input.len() > self.max_input_size {
            tracing::debug!(
                size = input.len(),
                max = self.max_input_size,
                "dropping oversized syslog frame"
            );
            return None;
        }
        let parsed = match &self.format {
            SyslogFormat::Rfc5424(config) => rfc5424::parse(&input, config),
            SyslogFormat::Rfc3164(config) => rfc3164::parse(&input, config),
        };
        match parsed {
            Ok(doc) => Some(doc),
            Err(error) => {
                tracing::debug!(%error, "dropping malformed syslog frame");
                None
            }
        }
    }
}

/// Syslog 싱크 트랜스포머: 문서 → 와이어 바이트 (실패 없음)
#[derive(Debug, Clone)]
pub struct SyslogSink {
    format: SyslogFormat,
}

impl SyslogSink {
    /// 형식을 지정해 싱크를 만듭니다.
    pub fn new(format: SyslogFormat) -> Self {
        Self { format }
    }
}

impl Transform for SyslogSink {
    type Input = Value;
    type Output = Bytes;

    fn apply(&mut self, input: Value) -> Option<Bytes> {
        let wire = match &self.format {
            SyslogFormat::Rfc5424(config) => printer::print_rfc5424(&input, &config.binding),
            SyslogFormat::Rfc3164(config) => printer::print_rfc3164(&input, &config.binding),
        };
        Some(wire)
    }
}
