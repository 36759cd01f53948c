//! 병합 — 두 문서를 하나로 합치는 연산
//!
//! [`merge`]는 최상위 필드만 보는 얕은 병합, [`deep_merge`]는 양쪽이 같은
//! 컨테이너 종류일 때 재귀하는 깊은 병합입니다. 두 연산 모두 오른쪽(`b`)이
//! 우선하며, `b`의 `Null`도 `a`의 값을 덮어씁니다.

use std::sync::Arc;

use crate::value::Value;

/// 얕은 병합 — `b`의 최상위 필드가 `a`를 덮어씁니다.
///
/// 둘 중 하나라도 오브젝트가 아니면 `b`를 반환합니다.
pub fn merge(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let mut fields = (**left).clone();
            for (name, value) in right.iter() {
                fields.insert(name.clone(), value.clone());
            }
            Value::Object(Arc::new(fields))
        }
        _ => b.clone(),
    }
}

/// 깊은 병합 — 같은 경로의 양쪽이 모두 오브젝트(또는 모두 배열)이면
/// 재귀적으로 병합하고, 그 외에는 `b`의 값이 이깁니다.
///
/// 배열은 인덱스 단위로 재귀합니다: 겹치는 인덱스는 병합, `a`에만 있는
/// 꼬리는 유지, `b`에만 있는 꼬리는 덧붙입니다.
pub fn deep_merge(a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Object(left), Value::Object(right)) => {
            let mut fields = (**left).clone();
            for (name, value) in right.iter() {
                let merged = match fields.get(name) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                fields.insert(name.clone(), merged);
            }
            Value::Object(Arc::new(fields))
        }
        (Value::Array(left), Value::Array(right)) => {
            let mut items = Vec::with_capacity(left.len().max(right.len()));
            let overlap = left.len().min(right.len());
            for i in 0..overlap {
                items.push(deep_merge(&left[i], &right[i]));
            }
            items.extend(left.iter().skip(overlap).cloned());
            items.extend(right.iter().skip(overlap).cloned());
            Value::Array(Arc::new(items))
        }
        _ => b.clone(),
    }
}
