#![no_main]

use libfuzzer_sys::fuzz_target;
use signalpost_codec::json;

fuzz_target!(|data: &[u8]| {
    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    if let Ok(doc) = json::parse(data) {
        // 파싱에 성공했다면 힌트와 출력 길이가 일치해야 한다
        let out = json::stringify(&doc);
        assert_eq!(doc.size_hint(), out.len());
        // 정규 출력은 되읽혀야 하고, 한 번 더 돌리면 고정점이어야 한다
        let doc2 = json::parse(&out).unwrap();
        assert_eq!(&json::stringify(&doc2)[..], &out[..]);
    }
});
