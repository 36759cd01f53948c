//! 에러 타입 — 도메인별 에러 정의
//!
//! 파싱과 패치의 실패는 모두 값으로 전달됩니다 (fallible return).
//! 트랜스포머는 내부 코덱의 에러를 전부 소화하여 정책으로 바꾸므로,
//! 스트리밍 레이어는 코어로부터 예외를 받지 않습니다.

use crate::pointer::Pointer;

/// Signalpost 최상위 에러 타입
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SignalpostError {
    /// 파싱 에러
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// 패치 적용 에러
    #[error("patch error: {0}")]
    Patch(#[from] PatchError),
}

/// 파싱 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// 문법 위반
    #[error("malformed input at offset {offset}")]
    Malformed {
        /// 실패 위치 (바이트 오프셋)
        offset: usize,
    },

    /// 입력 데이터 초과
    #[error("input too large: {size} bytes (max: {max})")]
    TooLarge {
        /// 입력 크기
        size: usize,
        /// 허용 최대치
        max: usize,
    },
}

/// 패치 적용 에러
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// 필요한 경로가 없음
    #[error("missing path: {0}")]
    Missing(Pointer),

    /// 경로의 값이 연산에 맞지 않는 변형임
    #[error("type mismatch at path: {path}")]
    TypeMismatch {
        /// 문제가 된 경로
        path: Pointer,
    },

    /// Test 연산의 기대값 불일치
    #[error("test failed at path: {0}")]
    TestFailed(Pointer),
}

/// 포인터 문자열 파싱 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PointerParseError {
    /// 비어 있지 않은 포인터는 `/`로 시작해야 함
    #[error("pointer must start with '/'")]
    MissingSlash,

    /// `~` 뒤에는 `0` 또는 `1`만 올 수 있음
    #[error("invalid '~' escape in pointer")]
    BadEscape,

    /// 인덱스 토큰이 usize 범위를 벗어남
    #[error("index token out of range")]
    IndexOverflow,
}

/// 십진수 리터럴 파싱 에러
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecimalParseError {
    /// 숫자 문법 위반
    #[error("malformed decimal literal")]
    Malformed,

    /// 지수가 표현 범위를 벗어남
    #[error("decimal exponent out of range")]
    ExponentOverflow,
}
