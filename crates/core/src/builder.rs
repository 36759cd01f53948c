//! 값 빌더 — 일회성 가변 누산기
//!
//! [`ObjectBuilder`]와 [`ArrayBuilder`]는 파서와 트랜스포머가 문서를 조립할 때
//! 쓰는 가변 누산기입니다. [`ObjectBuilder::result`]는 몇 번이고 호출할 수
//! 있으며, 이후의 변형은 이미 반환된 값에 영향을 주지 않습니다.
//!
//! 내부 저장소는 `Arc`이므로 `result()`는 참조 카운트만 올리는 freeze이고,
//! 다음 변형이 `Arc::make_mut`으로 새 저장소를 만듭니다 (copy-on-write).

use std::sync::Arc;

use indexmap::IndexMap;

use crate::value::Value;

/// 오브젝트 누산기
///
/// # 사용 예시
/// ```
/// use signalpost_core::ObjectBuilder;
///
/// let mut b = ObjectBuilder::new();
/// b.put("host", "web-01");
/// let frozen = b.result();
/// b.put("port", 514);
/// // 이전 스냅샷은 변하지 않는다
/// assert_eq!(frozen.as_object().unwrap().len(), 1);
/// assert_eq!(b.result().as_object().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ObjectBuilder {
    fields: Arc<IndexMap<String, Value>>,
}

impl ObjectBuilder {
    /// 빈 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정 용량으로 빌더를 생성합니다.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Arc::new(IndexMap::with_capacity(capacity)),
        }
    }

    /// 기존 오브젝트 값에서 빌더를 만듭니다. 오브젝트가 아니면 `None`.
    ///
    /// 저장소 `Arc`를 공유하므로 복사 비용이 없습니다.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self {
                fields: Arc::clone(fields),
            }),
            _ => None,
        }
    }

    /// 필드를 넣습니다. 같은 이름이 있으면 값을 덮어쓰되 위치는 유지합니다.
    pub fn put(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        Arc::make_mut(&mut self.fields).insert(name.into(), value.into());
        self
    }

    /// 필드를 제거하고 값을 반환합니다. 나머지 필드의 순서는 유지됩니다.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        Arc::make_mut(&mut self.fields).shift_remove(name)
    }

    /// 다른 빌더의 모든 필드를 넣습니다 (충돌 시 `other`가 우선).
    pub fn put_all(&mut self, other: &ObjectBuilder) -> &mut Self {
        let fields = Arc::make_mut(&mut self.fields);
        for (name, value) in other.fields.iter() {
            fields.insert(name.clone(), value.clone());
        }
        self
    }

    /// 필드를 조회합니다.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// 필드 존재 여부를 확인합니다.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// 필드 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// 필드가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 현재 내용의 스냅샷을 값으로 반환합니다.
    pub fn result(&self) -> Value {
        Value::Object(Arc::clone(&self.fields))
    }
}

/// 배열 누산기
#[derive(Debug, Clone, Default)]
pub struct ArrayBuilder {
    items: Arc<Vec<Value>>,
}

impl ArrayBuilder {
    /// 빈 빌더를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정 용량으로 빌더를 생성합니다.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Arc::new(Vec::with_capacity(capacity)),
        }
    }

    /// 요소를 끝에 추가합니다.
    pub fn add(&mut self, value: impl Into<Value>) -> &mut Self {
        Arc::make_mut(&mut self.items).push(value.into());
        self
    }

    /// 인덱스의 요소를 제거하고 반환합니다. 범위 밖이면 `None`.
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        let items = Arc::make_mut(&mut self.items);
        (index < items.len()).then(|| items.remove(index))
    }

    /// 다른 빌더의 모든 요소를 끝에 추가합니다.
    pub fn add_all(&mut self, other: &ArrayBuilder) -> &mut Self {
        Arc::make_mut(&mut self.items).extend(other.items.iter().cloned());
        self
    }

    /// 인덱스의 요소를 조회합니다.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// 요소 개수를 반환합니다.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 요소가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 현재 내용의 스냅샷을 값으로 반환합니다.
    pub fn result(&self) -> Value {
        Value::Array(Arc::clone(&self.items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_get() {
        let mut b = ObjectBuilder::new();
        b.put("a", 1).put("b", "two");
        assert_eq!(b.get("a"), Some(&Value::Int(1)));
        assert!(b.contains("b"));
        assert!(!b.contains("c"));
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn put_overwrites_in_place() {
        let mut b = ObjectBuilder::new();
        b.put("a", 1).put("b", 2).put("a", 3);
        let doc = b.result();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "b"]);
        assert_eq!(doc.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn remove_preserves_order() {
        let mut b = ObjectBuilder::new();
        b.put("a", 1).put("b", 2).put("c", 3);
        assert_eq!(b.remove("b"), Some(Value::Int(2)));
        assert_eq!(b.remove("b"), None);
        let doc = b.result();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, ["a", "c"]);
    }

    #[test]
    fn result_is_snapshot() {
        let mut b = ObjectBuilder::new();
        b.put("a", 1);
        let first = b.result();
        b.put("b", 2);
        let second = b.result();

        assert_eq!(first.as_object().unwrap().len(), 1);
        assert_eq!(second.as_object().unwrap().len(), 2);
    }

    #[test]
    fn repeated_result_without_mutation_shares() {
        let mut b = ObjectBuilder::new();
        b.put("a", 1);
        assert_eq!(b.result(), b.result());
    }

    #[test]
    fn put_all_overwrites() {
        let mut a = ObjectBuilder::new();
        a.put("x", 1).put("y", 1);
        let mut b = ObjectBuilder::new();
        b.put("y", 2).put("z", 2);
        a.put_all(&b);
        let doc = a.result();
        assert_eq!(doc.get("x"), Some(&Value::Int(1)));
        assert_eq!(doc.get("y"), Some(&Value::Int(2)));
        assert_eq!(doc.get("z"), Some(&Value::Int(2)));
    }

    #[test]
    fn from_value_seeds_builder() {
        let mut b = ObjectBuilder::new();
        b.put("a", 1);
        let doc = b.result();

        let mut seeded = ObjectBuilder::from_value(&doc).unwrap();
        seeded.put("b", 2);
        assert_eq!(seeded.len(), 2);
        // 원본 값은 변하지 않는다
        assert_eq!(doc.as_object().unwrap().len(), 1);

        assert!(ObjectBuilder::from_value(&Value::Int(1)).is_none());
    }

    #[test]
    fn array_add_remove() {
        let mut b = ArrayBuilder::new();
        b.add(1).add(2).add(3);
        assert_eq!(b.len(), 3);
        assert_eq!(b.remove(1), Some(Value::Int(2)));
        assert_eq!(b.remove(9), None);
        assert_eq!(b.result(), Value::from(vec![Value::Int(1), Value::Int(3)]));
    }

    #[test]
    fn array_result_is_snapshot() {
        let mut b = ArrayBuilder::new();
        b.add(1);
        let first = b.result();
        b.add(2);
        assert_eq!(first.as_array().unwrap().len(), 1);
        assert_eq!(b.result().as_array().unwrap().len(), 2);
    }

    #[test]
    fn array_add_all() {
        let mut a = ArrayBuilder::new();
        a.add(1);
        let mut b = ArrayBuilder::new();
        b.add(2).add(3);
        a.add_all(&b);
        assert_eq!(a.len(), 3);
    }

    #[test]
    fn empty_builders() {
        assert!(ObjectBuilder::new().is_empty());
        assert!(ArrayBuilder::new().is_empty());
        assert_eq!(ObjectBuilder::new().result().as_object().unwrap().len(), 0);
    }
}
