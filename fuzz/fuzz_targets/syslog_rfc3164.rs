#![no_main]

use libfuzzer_sys::fuzz_target;
use signalpost_codec::syslog::{rfc3164, Rfc3164Config};

fuzz_target!(|data: &[u8]| {
    // 크래시나 패닉 없이 Ok 또는 Err을 반환해야 한다
    let _ = rfc3164::parse(data, &Rfc3164Config::default());
});
