#![no_main]

use libfuzzer_sys::fuzz_target;
use signalpost_core::Decimal;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(d) = text.parse::<Decimal>() {
        // 정규 출력은 자기 자신으로 되읽혀야 한다
        let back: Decimal = d.to_string().parse().unwrap();
        assert_eq!(back, d);
    }
});
