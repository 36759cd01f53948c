//! 통합 테스트 -- 바이트에서 문서를 거쳐 다시 바이트까지의 전체 흐름 검증

use bytes::Bytes;
use signalpost_codec::json;
use signalpost_codec::syslog::{printer, rfc5424, Mode, Rfc5424Config};
use signalpost_codec::transform::{
    JsonFieldTransform, JsonMode, JsonSink, JsonSource, SyslogFormat, SyslogSink, SyslogSource,
};
use signalpost_core::{FieldTransformConfig, Pointer, Transform, Value};

/// 지수 리터럴은 BigDecimal로 보존되어 E-표기로 되돌아간다
#[test]
fn scenario_big_decimal_round_trip() {
    let doc = json::parse(br#"{"bd":2e128}"#).unwrap();
    assert_eq!(
        doc.get("bd"),
        Some(&Value::BigDecimal("2e128".parse().unwrap()))
    );
    assert_eq!(&json::stringify(&doc)[..], br#"{"bd":2E+128}"#);
}

/// RFC 5424 예제 프레임의 전체 필드 추출 (Strict)
#[test]
fn scenario_rfc5424_strict_example() {
    let raw = b"<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - BOM'su root' failed for lonvick on /dev/pts/8";
    let doc = rfc5424::parse(raw, &Rfc5424Config::new(Mode::Strict)).unwrap();
    assert_eq!(doc.get("facility"), Some(&Value::Int(4)));
    assert_eq!(doc.get("severity"), Some(&Value::Int(2)));
    assert_eq!(
        doc.get("hostname").and_then(Value::as_str),
        Some("mymachine.example.com")
    );
    assert_eq!(doc.get("appName").and_then(Value::as_str), Some("su"));
    assert_eq!(doc.get("procId"), None);
    assert_eq!(doc.get("msgId").and_then(Value::as_str), Some("ID47"));
    assert_eq!(
        doc.get("message").and_then(Value::as_str),
        Some("BOM'su root' failed for lonvick on /dev/pts/8")
    );
}

/// 오브젝트처럼 생기지 않은 필드는 역직렬화가 short-circuit된다
#[test]
fn scenario_deserialize_short_circuit() {
    let mut t = JsonFieldTransform::new(
        FieldTransformConfig::new("/message".parse().unwrap()),
        JsonMode::Deserialize,
    );
    let input = json::parse(br#"{"message":"foobar"}"#).unwrap();
    let out = t.apply(input.clone()).unwrap();
    assert_eq!(out, input);
}

/// 루트 대상 역직렬화는 최상위 오브젝트에 필드를 병합한다
#[test]
fn scenario_deserialize_to_root_merge() {
    let mut t = JsonFieldTransform::new(
        FieldTransformConfig::new("/message".parse().unwrap()).with_target(Pointer::root()),
        JsonMode::Deserialize,
    );
    let input = json::parse(br#"{"message":"{\"test\":\"foobar\"}"}"#).unwrap();
    let out = t.apply(input).unwrap();
    assert_eq!(
        out.get("message").and_then(Value::as_str),
        Some("{\"test\":\"foobar\"}")
    );
    assert_eq!(out.get("test").and_then(Value::as_str), Some("foobar"));
}

/// 불변식 1: JSON round-trip (파서가 만드는 변형에 대해)
#[test]
fn invariant_parse_stringify_identity() {
    for raw in [
        &br#"{"a":1,"b":[true,null,"x"],"c":{"d":2E+128}}"#[..],
        br#"[0,-1,2147483648,"\n"]"#,
        br#"{"nested":{"deep":{"deeper":[{"leaf":0.5}]}}}"#,
        br#""plain string""#,
        b"null",
    ] {
        let doc = json::parse(raw).unwrap();
        assert_eq!(json::parse(&json::stringify(&doc)).unwrap(), doc);
    }
}

/// 불변식 4: size_hint = 문자열화 길이
#[test]
fn invariant_size_hint_exact() {
    let raw = br#"{"msg":"an \"escaped\" string","nums":[1,-2,3.5,2e128],"flag":true,"none":null}"#;
    let doc = json::parse(raw).unwrap();
    assert_eq!(doc.size_hint(), json::stringify(&doc).len());

    let bytes_doc = Value::Bytes(Bytes::from_static(&[0, 1, 2, 3, 4]));
    assert_eq!(bytes_doc.size_hint(), json::stringify(&bytes_doc).len());
}

/// 불변식 6: Strict가 받는 프레임은 Lenient도 같은 문서로 받는다
#[test]
fn invariant_strict_implies_lenient() {
    let frames: [&[u8]; 4] = [
        b"<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - body",
        b"<0>1 - - - - - -",
        b"<191>1 2024-06-30T01:02:03.999999+09:00 h a p m [x y=\"z\"] tail",
        b"<13>1 - host app proc msgid - ",
    ];
    for raw in frames {
        let strict = rfc5424::parse(raw, &Rfc5424Config::new(Mode::Strict)).unwrap();
        let lenient = rfc5424::parse(raw, &Rfc5424Config::new(Mode::Lenient)).unwrap();
        assert_eq!(strict, lenient, "frame {:?}", raw);
    }
}

/// 불변식 7: on_error=Skip 트랜스포머는 전함수다
#[test]
fn invariant_skip_transformer_is_total() {
    let mut t = JsonFieldTransform::new(
        FieldTransformConfig::new("/m".parse().unwrap()),
        JsonMode::Deserialize,
    );
    let inputs = [
        json::parse(br#"{"m":"{\"ok\":1}"}"#).unwrap(),
        json::parse(br#"{"m":"{broken"}"#).unwrap(),
        json::parse(br#"{"m":""}"#).unwrap(),
        json::parse(br#"{"m":[1,2]}"#).unwrap(),
        json::parse(br#"{}"#).unwrap(),
        Value::Int(7),
        Value::Null,
    ];
    for input in inputs {
        assert!(t.apply(input).is_some());
    }
}

/// syslog 수신 → 필드 역직렬화 → JSON 송신 파이프라인
#[test]
fn pipeline_syslog_to_json() {
    let mut source = SyslogSource::new(SyslogFormat::Rfc5424(Rfc5424Config::new(Mode::Strict)));
    let mut field = JsonFieldTransform::new(
        FieldTransformConfig::new("/message".parse().unwrap()).with_target(Pointer::root()),
        JsonMode::Deserialize,
    );
    let mut sink = JsonSink::new();

    let frame = Bytes::from_static(
        b"<165>1 2024-01-15T12:00:00Z web-01 nginx - - - {\"status\":503,\"path\":\"/api\"}",
    );

    let doc = source.apply(frame).unwrap();
    let doc = field.apply(doc).unwrap();
    assert_eq!(doc.get("status"), Some(&Value::Int(503)));
    assert_eq!(doc.get("hostname").and_then(Value::as_str), Some("web-01"));

    let out = sink.apply(doc).unwrap();
    let round = json::parse(&out).unwrap();
    assert_eq!(round.get("path").and_then(Value::as_str), Some("/api"));
}

/// JSON 수신 → syslog 송신 파이프라인 (문서 → 와이어)
#[test]
fn pipeline_json_to_syslog() {
    let mut source = JsonSource::new();
    let mut sink = SyslogSink::new(SyslogFormat::Rfc5424(Rfc5424Config::new(Mode::Strict)));

    let doc = source
        .apply(Bytes::from_static(
            br#"{"facility":4,"severity":2,"hostname":"db-01","appName":"postgres","message":"checkpoint complete"}"#,
        ))
        .unwrap();
    let wire = sink.apply(doc).unwrap();
    assert_eq!(&wire[..], b"<34>1 - db-01 postgres - - - checkpoint complete");
}

/// 파싱 → 인쇄 → 파싱 고정점
#[test]
fn syslog_print_parse_fixed_point() {
    let config = Rfc5424Config::new(Mode::Strict);
    let frames: [&[u8]; 3] = [
        b"<34>1 2003-10-11T22:14:15.003Z mymachine.example.com su - ID47 - body text",
        b"<0>1 - - - - - -",
        b"<165>1 2024-01-15T12:00:00Z h app 12 ID [sd k=\"v\"] tail",
    ];
    for raw in frames {
        let doc = rfc5424::parse(raw, &config).unwrap();
        let wire = printer::print_rfc5424(&doc, &config.binding);
        let doc2 = rfc5424::parse(&wire, &config).unwrap();
        assert_eq!(doc, doc2, "fixed point of {:?}", raw);
    }
}

/// 요소 순서 보존: 버려진 요소는 자리만 빠진다
#[test]
fn ordering_with_discards() {
    let mut source = JsonSource::new();
    let frames: Vec<&'static [u8]> = vec![
        br#"{"n":1}"#,
        b"garbage",
        br#"{"n":2}"#,
        b"[1,2",
        br#"{"n":3}"#,
    ];
    let out: Vec<Value> = frames
        .into_iter()
        .filter_map(|raw| source.apply(Bytes::from_static(raw)))
        .collect();
    let ns: Vec<i32> = out
        .iter()
        .map(|d| match d.get("n") {
            Some(Value::Int(n)) => *n,
            _ => panic!("missing n"),
        })
        .collect();
    assert_eq!(ns, [1, 2, 3]);
}
