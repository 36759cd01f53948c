#![doc = include_str!("../README.md")]

pub mod builder;
pub mod canon;
pub mod decimal;
pub mod error;
pub mod merge;
pub mod patch;
pub mod pointer;
pub mod transform;
pub mod value;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 값 모델
pub use value::Value;

// 십진수
pub use decimal::Decimal;

// 빌더
pub use builder::{ArrayBuilder, ObjectBuilder};

// 포인터
pub use pointer::{Pointer, Token};

// 패치
pub use patch::{Patch, PatchOp};

// 병합
pub use merge::{deep_merge, merge};

// 트랜스포머 계약
pub use transform::{ErrorAction, FieldTransformConfig, SuccessAction, Transform};

// 에러
pub use error::{
    DecimalParseError, ParseError, PatchError, PointerParseError, SignalpostError,
};
