//! 코덱 에러 타입
//!
//! [`ScanError`]는 스캐너 수준의 에러로 실패 오프셋과 짧은 종류 태그를
//! 가집니다. 코덱 경계에서는 [`ParseError::Malformed`]로 접어서 내보내므로
//! 호출자는 단일 에러 종류만 봅니다. `From` 변환이 있어 `?` 연산자로
//! 자연스럽게 전파할 수 있습니다.

use std::fmt;

use signalpost_core::error::ParseError;

/// 스캐너 수준 파싱 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at offset {offset}")]
pub struct ScanError {
    /// 실패 위치 (바이트 오프셋)
    pub offset: usize,
    /// 실패 종류
    pub kind: ScanErrorKind,
}

/// 스캐너 에러 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanErrorKind {
    /// 기대한 토큰이 없음
    Expected(&'static str),
    /// 입력이 끝남
    EndOfInput,
    /// 숫자가 대상 타입 범위를 벗어남
    Overflow,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected(what) => write!(f, "expected {what}"),
            Self::EndOfInput => write!(f, "unexpected end of input"),
            Self::Overflow => write!(f, "numeric overflow"),
        }
    }
}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        ParseError::Malformed { offset: err.offset }
    }
}
