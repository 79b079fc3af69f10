//! Fuzz target for link extraction on untrusted message text
//!
//! # Invariants
//!
//! - Concatenated span text reproduces the input exactly
//! - Every link target is an absolute http(s) URL
//! - No link target contains characters that could break out of an
//!   attribute (`"`, `<`, `>`, whitespace)
//! - No empty text spans
//! - Every link's display text starts with an ASCII `http://`, `https://` or
//!   `www.` prefix and its href keeps that scheme (`https` for `www.`)
//! - No link target carries userinfo

#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;
use whispernet_core::{Span, extract_spans};

fuzz_target!(|text: String| {
    let spans = extract_spans(&text);

    let rebuilt: String = spans.iter().map(Span::display_text).collect();
    assert_eq!(rebuilt, text);

    for span in &spans {
        match span {
            Span::Text(value) => assert!(!value.is_empty()),
            Span::Link { display, href } => {
                assert!(href.starts_with("http://") || href.starts_with("https://"));
                assert!(!href.chars().any(|c| matches!(c, '"' | '<' | '>') || c.is_whitespace()));

                let lowered = display.to_ascii_lowercase();
                let assumed_https = lowered.starts_with("https://") || lowered.starts_with("www.");
                let expected_scheme = if assumed_https {
                    "https"
                } else {
                    assert!(lowered.starts_with("http://"), "unexpected link prefix: {display:?}");
                    "http"
                };

                let url = Url::parse(href).unwrap();
                assert_eq!(url.scheme(), expected_scheme);
                assert!(url.username().is_empty() && url.password().is_none());
            },
        }
    }
});
