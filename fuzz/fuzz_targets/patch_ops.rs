#![no_main]

use libfuzzer_sys::fuzz_target;
use signalpost_core::{ArrayBuilder, ObjectBuilder, Patch, PatchOp, Pointer, Value};

/// 패치 대상으로 쓰는 작은 중첩 문서
fn base_doc() -> Value {
    let mut inner = ObjectBuilder::new();
    inner.put("c", "x").put("d", 2i64);

    let mut xs = ArrayBuilder::new();
    xs.add(1).add(Value::Null).add(inner.result());

    let mut root = ObjectBuilder::new();
    root.put("a", 1).put("b", true).put("xs", xs.result());
    root.result()
}

fn take(data: &mut &[u8]) -> u8 {
    match data.split_first() {
        Some((&b, rest)) => {
            *data = rest;
            b
        }
        None => 0,
    }
}

fn pointer(data: &mut &[u8]) -> Pointer {
    let mut p = Pointer::root();
    for _ in 0..(take(data) % 4) {
        let t = take(data);
        p = match t % 6 {
            0 => p / "a",
            1 => p / "b",
            2 => p / "xs",
            3 => p / "c",
            4 => p / (usize::from(t >> 3) % 5),
            _ => p / "missing",
        };
    }
    p
}

fn scalar(data: &mut &[u8]) -> Value {
    let t = take(data);
    match t % 5 {
        0 => Value::Null,
        1 => Value::Bool(t & 0x80 != 0),
        2 => Value::Int(i32::from(t)),
        3 => Value::Long(i64::from(take(data))),
        _ => Value::from("v"),
    }
}

fn op(data: &mut &[u8], depth: u8) -> PatchOp {
    let t = take(data);
    match t % 8 {
        0 => PatchOp::Add {
            path: pointer(data),
            value: scalar(data),
        },
        1 => PatchOp::Remove {
            path: pointer(data),
            must_exist: t & 0x80 != 0,
        },
        2 => PatchOp::Replace {
            path: pointer(data),
            value: scalar(data),
        },
        3 => PatchOp::Copy {
            from: pointer(data),
            to: pointer(data),
        },
        4 => PatchOp::Move {
            from: pointer(data),
            to: pointer(data),
        },
        5 => PatchOp::Test {
            path: pointer(data),
            value: scalar(data),
        },
        _ if depth < 2 => {
            let mut inner = Vec::new();
            for _ in 0..(take(data) % 4) {
                inner.push(op(data, depth + 1));
            }
            PatchOp::Bulk(inner)
        }
        _ => PatchOp::Test {
            path: Pointer::root(),
            value: scalar(data),
        },
    }
}

fuzz_target!(|data: &[u8]| {
    let mut cursor = data;
    let mut ops = Vec::new();
    while !cursor.is_empty() && ops.len() < 16 {
        ops.push(op(&mut cursor, 0));
    }
    let patch = Patch::from(ops);

    let doc = base_doc();
    let before = doc.clone();

    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    match doc.try_patch(&patch) {
        Ok(patched) => assert_eq!(doc.patch(&patch), Some(patched)),
        Err(_) => assert_eq!(doc.patch(&patch), None),
    }

    // 성공이든 실패든 원본은 관찰 가능한 변화가 없어야 한다
    assert_eq!(doc, before);
});
