//! Syslog 코덱 — RFC 5424 / RFC 3164 파싱과 인쇄
//!
//! 두 문법 모두 [`Scanner`] 조합기 위에서 동작하며, 필드 추출은 전부
//! [`Binder`]를 통합니다: capture된 슬라이스가 바인더로 넘어가 문서 필드가
//! 되고, 인쇄는 같은 바인더의 역방향 계약으로 문서 필드를 와이어 텍스트로
//! 되돌립니다.
//!
//! # 모듈 구성
//! - [`rfc5424`]: `<PRI>1 TIMESTAMP HOSTNAME APP PROCID MSGID SD [MSG]`
//! - [`rfc3164`]: `<PRI>TIMESTAMP HOSTNAME TAG[PID]: MSG`
//! - [`printer`]: 문서 → 와이어 바이트 (양쪽 RFC)
//!
//! [`Scanner`]: crate::scan::Scanner
//! [`Binder`]: crate::binder::Binder

pub mod printer;
pub mod rfc3164;
pub mod rfc5424;

use serde::{Deserialize, Serialize};
use signalpost_core::builder::ObjectBuilder;

use crate::binder::{Binder, RawScalar};
use crate::error::{ScanError, ScanErrorKind};
use crate::scan::{ScanResult, Scanner};

/// RFC 5424에서 유효한 최대 PRI 값
/// facility 최댓값 23 * 8 + severity 최댓값 7 = 191
pub(crate) const MAX_PRI: u16 = 191;

/// PRINTUSASCII (%d33-126) — 헤더 필드에 허용되는 바이트
pub(crate) fn is_print_usascii(b: u8) -> bool {
    (0x21..=0x7E).contains(&b)
}

/// `<PRI>`의 숫자 부분을 파싱합니다 (여는 `<`는 소비된 상태).
pub(crate) fn parse_pri(s: &mut Scanner<'_>) -> ScanResult<u16> {
    let offset = s.pos();
    let digits = s.take_while1("pri digit", |b| b.is_ascii_digit())?;
    if digits.len() > 3 {
        return Err(ScanError {
            offset,
            kind: ScanErrorKind::Expected("pri of at most 3 digits"),
        });
    }
    let mut pri = 0u16;
    for &b in digits {
        pri = pri * 10 + u16::from(b - b'0');
    }
    if pri > MAX_PRI {
        return Err(ScanError {
            offset,
            kind: ScanErrorKind::Expected("pri in 0..=191"),
        });
    }
    Ok(pri)
}

/// 바인더가 설정되어 있으면 바인딩하고, 거부하면 파서 실패로 전파합니다.
pub(crate) fn bind_or_fail(
    builder: &mut ObjectBuilder,
    binder: &Option<Binder>,
    raw: RawScalar<'_>,
    offset: usize,
) -> ScanResult<()> {
    let Some(binder) = binder else {
        return Ok(());
    };
    if binder.is_none() {
        return Ok(());
    }
    if binder.bind(builder, raw) {
        Ok(())
    } else {
        Err(ScanError {
            offset,
            kind: binder_failure_kind(binder),
        })
    }
}

fn binder_failure_kind(binder: &Binder) -> ScanErrorKind {
    match binder {
        Binder::Int { .. } | Binder::Long { .. } | Binder::Float { .. } | Binder::Double { .. } => {
            ScanErrorKind::Overflow
        }
        _ => ScanErrorKind::Expected("bindable field value"),
    }
}

/// RFC 5424 파서 모드 — 필드별 길이 상한만 다릅니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// RFC 그대로의 상한
    #[default]
    Strict,
    /// appName/msgId 상한을 늘린 확장 모드
    Lenient,
}

impl Mode {
    /// HOSTNAME 최대 길이
    pub fn max_hostname(self) -> usize {
        255
    }

    /// APP-NAME 최대 길이
    pub fn max_app_name(self) -> usize {
        match self {
            Mode::Strict => 48,
            Mode::Lenient => 96,
        }
    }

    /// PROCID 최대 길이
    pub fn max_proc_id(self) -> usize {
        128
    }

    /// MSGID 최대 길이 — Lenient 64는 RFC(32)를 의도적으로 넘는 확장입니다.
    pub fn max_msg_id(self) -> usize {
        match self {
            Mode::Strict => 32,
            Mode::Lenient => 64,
        }
    }
}

/// 필드별 바인더 집합
///
/// `None`인 필드는 capture만 하고 버립니다. 기본값은 모든 필드를
/// 표준 키(`facility`, `severity`, `timestamp`, `hostname`, `appName`,
/// `procId`, `msgId`, `structData`, `message`)로 바인딩합니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyslogBinding {
    /// PRI에서 계산된 facility (0..=23)
    #[serde(default)]
    pub facility: Option<Binder>,
    /// PRI에서 계산된 severity (0..=7)
    #[serde(default)]
    pub severity: Option<Binder>,
    /// TIMESTAMP 필드
    #[serde(default)]
    pub timestamp: Option<Binder>,
    /// HOSTNAME 필드
    #[serde(default)]
    pub hostname: Option<Binder>,
    /// APP-NAME (RFC 3164에서는 TAG)
    #[serde(default)]
    pub app_name: Option<Binder>,
    /// PROCID (RFC 3164에서는 `[PID]`)
    #[serde(default)]
    pub proc_id: Option<Binder>,
    /// MSGID (RFC 5424 전용)
    #[serde(default)]
    pub msg_id: Option<Binder>,
    /// STRUCTURED-DATA 원본 슬라이스 (RFC 5424 전용)
    #[serde(default)]
    pub struct_data: Option<Binder>,
    /// MSG 꼬리
    #[serde(default)]
    pub message: Option<Binder>,
}

impl Default for SyslogBinding {
    fn default() -> Self {
        Self {
            facility: Some(Binder::int("facility")),
            severity: Some(Binder::int("severity")),
            timestamp: Some(Binder::string("timestamp")),
            hostname: Some(Binder::string("hostname")),
            app_name: Some(Binder::string("appName")),
            proc_id: Some(Binder::string("procId")),
            msg_id: Some(Binder::string("msgId")),
            struct_data: Some(Binder::string("structData")),
            message: Some(Binder::string("message")),
        }
    }
}

impl SyslogBinding {
    /// 아무 필드도 바인딩하지 않는 집합 (전부 capture 후 폐기)
    pub fn empty() -> Self {
        Self {
            facility: None,
            severity: None,
            timestamp: None,
            hostname: None,
            app_name: None,
            proc_id: None,
            msg_id: None,
            struct_data: None,
            message: None,
        }
    }

    /// facility 바인더를 지정합니다.
    pub fn with_facility(mut self, binder: Binder) -> Self {
        self.facility = Some(binder);
        self
    }

    /// severity 바인더를 지정합니다.
    pub fn with_severity(mut self, binder: Binder) -> Self {
        self.severity = Some(binder);
        self
    }

    /// timestamp 바인더를 지정합니다.
    pub fn with_timestamp(mut self, binder: Binder) -> Self {
        self.timestamp = Some(binder);
        self
    }

    /// hostname 바인더를 지정합니다.
    pub fn with_hostname(mut self, binder: Binder) -> Self {
        self.hostname = Some(binder);
        self
    }

    /// appName 바인더를 지정합니다.
    pub fn with_app_name(mut self, binder: Binder) -> Self {
        self.app_name = Some(binder);
        self
    }

    /// procId 바인더를 지정합니다.
    pub fn with_proc_id(mut self, binder: Binder) -> Self {
        self.proc_id = Some(binder);
        self
    }

    /// msgId 바인더를 지정합니다.
    pub fn with_msg_id(mut self, binder: Binder) -> Self {
        self.msg_id = Some(binder);
        self
    }

    /// structData 바인더를 지정합니다.
    pub fn with_struct_data(mut self, binder: Binder) -> Self {
        self.struct_data = Some(binder);
        self
    }

    /// message 바인더를 지정합니다.
    pub fn with_message(mut self, binder: Binder) -> Self {
        self.message = Some(binder);
        self
    }
}

/// RFC 5424 파서 설정
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rfc5424Config {
    /// 길이 상한 모드
    #[serde(default)]
    pub mode: Mode,
    /// 필드 바인더
    #[serde(default)]
    pub binding: SyslogBinding,
}

impl Rfc5424Config {
    /// 기본 바인딩으로 설정을 만듭니다.
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            binding: SyslogBinding::default(),
        }
    }

    /// 바인딩을 지정합니다.
    pub fn with_binding(mut self, binding: SyslogBinding) -> Self {
        self.binding = binding;
        self
    }
}

/// RFC 3164 파서 설정 — 모드 손잡이가 없습니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rfc3164Config {
    /// 필드 바인더
    #[serde(default)]
    pub binding: SyslogBinding,
}

impl Rfc3164Config {
    /// 바인딩을 지정합니다.
    pub fn with_binding(mut self, binding: SyslogBinding) -> Self {
        self.binding = binding;
        self
    }
}
