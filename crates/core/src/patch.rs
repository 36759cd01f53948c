//! 패치 연산 — 문서에 대한 RFC 6902 스타일 변경 목록
//!
//! [`Patch`]는 순서 있는 연산 목록이며 적용은 패치 전체 단위로
//! all-or-nothing입니다. 중간 연산이 실패하면 앞선 변경은 모두 버려지고
//! 원본 값은 그대로 남습니다.
//!
//! 컨테이너가 `Arc` 공유라서 루트 복제는 참조 카운트 증가일 뿐이고,
//! 실제 복사는 변경 경로를 따라가며 copy-on-write로만 일어납니다.

use std::sync::Arc;

use crate::error::PatchError;
use crate::pointer::{Pointer, Token};
use crate::value::Value;

/// 단일 패치 연산
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// 경로에 값을 삽입하거나 덮어씁니다. 배열 인덱스는 `len` 이하에서
    /// 삽입(시프트)이 됩니다. 중간 노드가 없으면 실패합니다.
    Add {
        /// 대상 경로
        path: Pointer,
        /// 넣을 값
        value: Value,
    },
    /// 경로의 값을 삭제합니다.
    Remove {
        /// 대상 경로
        path: Pointer,
        /// true면 대상 부재가 에러, false면 no-op
        must_exist: bool,
    },
    /// 경로의 값을 교체합니다. 대상이 반드시 존재해야 합니다.
    Replace {
        /// 대상 경로
        path: Pointer,
        /// 새 값
        value: Value,
    },
    /// `from`의 값을 `to`에 복사합니다.
    Copy {
        /// 원본 경로 (반드시 존재)
        from: Pointer,
        /// 대상 경로
        to: Pointer,
    },
    /// `from`의 값을 `to`로 이동합니다. 자기 하위로의 이동은 실패합니다.
    Move {
        /// 원본 경로 (반드시 존재)
        from: Pointer,
        /// 대상 경로
        to: Pointer,
    },
    /// 경로의 값이 기대값과 같은지 검사합니다.
    Test {
        /// 대상 경로
        path: Pointer,
        /// 기대값
        value: Value,
    },
    /// 묶음 적용
    Bulk(Vec<PatchOp>),
}

/// 순서 있는 패치 연산 목록
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    /// 빈 패치를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 연산을 추가합니다.
    pub fn push(&mut self, op: PatchOp) -> &mut Self {
        self.ops.push(op);
        self
    }

    /// 연산 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// 연산이 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// 연산을 순회합니다.
    pub fn iter(&self) -> std::slice::Iter<'_, PatchOp> {
        self.ops.iter()
    }
}

impl From<Vec<PatchOp>> for Patch {
    fn from(ops: Vec<PatchOp>) -> Self {
        Self { ops }
    }
}

impl FromIterator<PatchOp> for Patch {
    fn from_iter<I: IntoIterator<Item = PatchOp>>(iter: I) -> Self {
        Self {
            ops: iter.into_iter().collect(),
        }
    }
}

impl Value {
    /// 패치를 적용한 새 값을 반환합니다. 어떤 연산이든 실패하면 `None`.
    pub fn patch(&self, patch: &Patch) -> Option<Value> {
        self.try_patch(patch).ok()
    }

    /// 패치를 적용한 새 값을 반환합니다. 실패 시 원인을 담은 에러를 반환하며
    /// 원본은 변하지 않습니다.
    pub fn try_patch(&self, patch: &Patch) -> Result<Value, PatchError> {
        let mut out = self.clone();
        for op in patch.iter() {
            apply_op(&mut out, op)?;
        }
        Ok(out)
    }
}

fn apply_op(root: &mut Value, op: &PatchOp) -> Result<(), PatchError> {
    match op {
        PatchOp::Add { path, value } => add(root, path, value.clone()),
        PatchOp::Remove { path, must_exist } => remove(root, path, *must_exist).map(|_| ()),
        PatchOp::Replace { path, value } => replace(root, path, value.clone()),
        PatchOp::Copy { from, to } => {
            let value = from
                .evaluate(root)
                .ok_or_else(|| PatchError::Missing(from.clone()))?
                .clone();
            add(root, to, value)
        }
        PatchOp::Move { from, to } => {
            if to.starts_with(from) && to != from {
                return Err(PatchError::TypeMismatch { path: to.clone() });
            }
            if to == from {
                // 제자리 이동 — 원본 존재만 확인
                from.evaluate(root)
                    .ok_or_else(|| PatchError::Missing(from.clone()))?;
                return Ok(());
            }
            let value = remove(root, from, true)?
                .ok_or_else(|| PatchError::Missing(from.clone()))?;
            add(root, to, value)
        }
        PatchOp::Test { path, value } => {
            let actual = path
                .evaluate(root)
                .ok_or_else(|| PatchError::Missing(path.clone()))?;
            if actual == value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
        PatchOp::Bulk(ops) => {
            for inner in ops {
                apply_op(root, inner)?;
            }
            Ok(())
        }
    }
}

/// 경로의 부모 컨테이너까지 copy-on-write로 내려갑니다.
fn descend<'a>(
    root: &'a mut Value,
    tokens: &[Token],
    full: &Pointer,
) -> Result<&'a mut Value, PatchError> {
    let mut current = root;
    for token in tokens {
        current = match token {
            Token::Name(name) => match current {
                Value::Object(fields) => Arc::make_mut(fields)
                    .get_mut(name.as_str())
                    .ok_or_else(|| PatchError::Missing(full.clone()))?,
                _ => return Err(PatchError::TypeMismatch { path: full.clone() }),
            },
            Token::Index(index) => match current {
                Value::Array(items) => Arc::make_mut(items)
                    .get_mut(*index)
                    .ok_or_else(|| PatchError::Missing(full.clone()))?,
                _ => return Err(PatchError::TypeMismatch { path: full.clone() }),
            },
        };
    }
    Ok(current)
}

fn add(root: &mut Value, path: &Pointer, value: Value) -> Result<(), PatchError> {
    let Some((parent, last)) = path.split_last() else {
        *root = value;
        return Ok(());
    };
    let container = descend(root, parent, path)?;
    match last {
        Token::Name(name) => match container {
            Value::Object(fields) => {
                Arc::make_mut(fields).insert(name.clone(), value);
                Ok(())
            }
            _ => Err(PatchError::TypeMismatch { path: path.clone() }),
        },
        Token::Index(index) => match container {
            Value::Array(items) => {
                let items = Arc::make_mut(items);
                if *index > items.len() {
                    return Err(PatchError::Missing(path.clone()));
                }
                items.insert(*index, value);
                Ok(())
            }
            _ => Err(PatchError::TypeMismatch { path: path.clone() }),
        },
    }
}

fn replace(root: &mut Value, path: &Pointer, value: Value) -> Result<(), PatchError> {
    if path.evaluate(root).is_none() {
        return Err(PatchError::Missing(path.clone()));
    }
    let slot = descend(root, path.tokens(), path)?;
    *slot = value;
    Ok(())
}

/// 경로의 값을 제거합니다. 부재 시 `must_exist`에 따라 에러 또는 `Ok(None)`.
fn remove(root: &mut Value, path: &Pointer, must_exist: bool) -> Result<Option<Value>, PatchError> {
    if path.evaluate(root).is_none() {
        return if must_exist {
            Err(PatchError::Missing(path.clone()))
        } else {
            Ok(None)
        };
    }
    let Some((parent, last)) = path.split_last() else {
        // 루트는 삭제할 수 없다
        return Err(PatchError::TypeMismatch { path: path.clone() });
    };
    let container = descend(root, parent, path)?;
    match (last, container) {
        (Token::Name(name), Value::Object(fields)) => {
            Ok(Arc::make_mut(fields).shift_remove(name.as_str()))
        }
        (Token::Index(index), Value::Array(items)) => {
            Ok(Some(Arc::make_mut(items).remove(*index)))
        }
        _ => Err(PatchError::TypeMismatch { path: path.clone() }),
    }
}
