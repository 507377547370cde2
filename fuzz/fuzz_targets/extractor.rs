#![no_main]

use libfuzzer_sys::fuzz_target;

use reviewcheck::extractor::reviews::join_reviews;
use reviewcheck::normalizer::normalize;

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data);

    // Review parsing must never panic on hostile markup
    if let Some(text) = join_reviews(&html) {
        let normalized = normalize(&text);
        assert!(normalized.bytes().all(|b| b.is_ascii_lowercase() || b == b' '));
        assert_eq!(normalize(&normalized), normalized);
    }
});
