//! 트랜스포머 계약 — 파이프라인 계산의 단위
//!
//! 모든 파이프라인 구성요소는 [`Transform`] 하나를 구현합니다: 입력 하나가
//! 출력 0개 또는 1개가 됩니다. 소스(bytes→문서), 싱크(문서→bytes),
//! 필드 변환(문서→문서)이 전부 같은 모양입니다.
//!
//! 인스턴스는 스트림당 하나이며 동시에 한 스레드만 사용합니다. 내부 스크래치
//! 버퍼를 가질 수 있도록 [`Transform::apply`]는 `&mut self`를 받습니다.
//! 구현체는 에러를 절대 밖으로 던지지 않고 설정된 정책으로 소화합니다.

use serde::{Deserialize, Serialize};

use crate::pointer::Pointer;

/// 요소 단위 변환
///
/// # 구현 예시
/// ```ignore
/// struct Upcase;
///
/// impl Transform for Upcase {
///     type Input = String;
///     type Output = String;
///
///     fn apply(&mut self, input: String) -> Option<String> {
///         Some(input.to_uppercase())
///     }
/// }
/// ```
pub trait Transform {
    /// 입력 요소 타입
    type Input;
    /// 출력 요소 타입
    type Output;

    /// 요소 하나를 변환합니다.
    ///
    /// `None`은 요소가 버려졌음을 뜻합니다. 순서는 호출 순서 그대로이며,
    /// 구현체는 실패를 전파하는 대신 정책에 따라 입력을 그대로 반환하거나
    /// `None`을 반환합니다.
    fn apply(&mut self, input: Self::Input) -> Option<Self::Output>;
}

/// 성공 후 원본 필드 처리
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessAction {
    /// 원본 필드를 그대로 둡니다.
    #[default]
    Skip,
    /// 원본 필드를 삭제합니다.
    Remove,
}

/// 변환 실패 시 요소 처리
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorAction {
    /// 요소를 변경 없이 통과시킵니다.
    #[default]
    Skip,
    /// 요소를 버립니다.
    Discard,
}

/// 필드 단위 트랜스포머 설정
///
/// `source`의 값을 읽어 변환하고 `target`(기본값은 `source`)에 씁니다.
///
/// # 사용 예시
/// ```
/// use signalpost_core::{ErrorAction, FieldTransformConfig, Pointer};
///
/// let config = FieldTransformConfig::new(Pointer::root() / "message")
///     .with_target(Pointer::root())
///     .with_error_action(ErrorAction::Discard);
/// assert!(config.target.is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTransformConfig {
    /// 읽을 필드
    pub source: Pointer,
    /// 쓸 위치 (생략 시 `source`)
    #[serde(default)]
    pub target: Option<Pointer>,
    /// 성공 후 원본 처리
    #[serde(default)]
    pub on_success: SuccessAction,
    /// 실패 시 요소 처리
    #[serde(default)]
    pub on_error: ErrorAction,
}

impl FieldTransformConfig {
    /// 기본 동작(제자리 쓰기, Skip/Skip)으로 설정을 생성합니다.
    pub fn new(source: Pointer) -> Self {
        Self {
            source,
            target: None,
            on_success: SuccessAction::default(),
            on_error: ErrorAction::default(),
        }
    }

    /// 쓰기 위치를 지정합니다.
    pub fn with_target(mut self, target: Pointer) -> Self {
        self.target = Some(target);
        self
    }

    /// 성공 후 동작을 지정합니다.
    pub fn with_success_action(mut self, action: SuccessAction) -> Self {
        self.on_success = action;
        self
    }

    /// 실패 시 동작을 지정합니다.
    pub fn with_error_action(mut self, action: ErrorAction) -> Self {
        self.on_error = action;
        self
    }

    /// 실제 쓰기 위치를 반환합니다 (`target`이 없으면 `source`).
    pub fn resolved_target(&self) -> &Pointer {
        self.target.as_ref().unwrap_or(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_skip() {
        let config = FieldTransformConfig::new(Pointer::root() / "message");
        assert_eq!(config.on_success, SuccessAction::Skip);
        assert_eq!(config.on_error, ErrorAction::Skip);
        assert_eq!(config.target, None);
        assert_eq!(config.resolved_target(), &config.source);
    }

    #[test]
    fn builder_style_setters() {
        let config = FieldTransformConfig::new(Pointer::root() / "message")
            .with_target(Pointer::root())
            .with_success_action(SuccessAction::Remove)
            .with_error_action(ErrorAction::Discard);
        assert_eq!(config.on_success, SuccessAction::Remove);
        assert_eq!(config.on_error, ErrorAction::Discard);
        assert!(config.resolved_target().is_root());
    }

    #[test]
    fn config_serialize_deserialize() {
        let config = FieldTransformConfig::new(Pointer::root() / "message")
            .with_error_action(ErrorAction::Discard);
        let json = serde_json::to_string(&config).unwrap();
        let back: FieldTransformConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn config_deserialize_with_defaults() {
        let config: FieldTransformConfig =
            serde_json::from_str(r#"{"source":"/message"}"#).unwrap();
        assert_eq!(config.source.to_string(), "/message");
        assert_eq!(config.on_error, ErrorAction::Skip);
    }

    // 계약 확인용 mock
    struct Passthrough;

    impl Transform for Passthrough {
        type Input = i32;
        type Output = i32;

        fn apply(&mut self, input: i32) -> Option<i32> {
            Some(input)
        }
    }

    struct DropOdd;

    impl Transform for DropOdd {
        type Input = i32;
        type Output = i32;

        fn apply(&mut self, input: i32) -> Option<i32> {
            (input % 2 == 0).then_some(input)
        }
    }

    #[test]
    fn transform_preserves_order() {
        let mut t = Passthrough;
        let out: Vec<i32> = (0..5).filter_map(|n| t.apply(n)).collect();
        assert_eq!(out, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn discard_omits_position() {
        let mut t = DropOdd;
        let out: Vec<i32> = (0..5).filter_map(|n| t.apply(n)).collect();
        assert_eq!(out, [0, 2, 4]);
    }
}
