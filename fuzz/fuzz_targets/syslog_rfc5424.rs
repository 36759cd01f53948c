#![no_main]

use libfuzzer_sys::fuzz_target;
use signalpost_codec::syslog::{rfc5424, Mode, Rfc5424Config};

fuzz_target!(|data: &[u8]| {
    let strict = Rfc5424Config::new(Mode::Strict);
    let lenient = Rfc5424Config::new(Mode::Lenient);

    // Strict가 받는 프레임은 Lenient도 같은 문서로 받아야 한다
    if let Ok(doc) = rfc5424::parse(data, &strict) {
        assert_eq!(rfc5424::parse(data, &lenient).unwrap(), doc);
    } else {
        let _ = rfc5424::parse(data, &lenient);
    }
});
