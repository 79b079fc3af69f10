//! Fuzz target for push frame decoding
//!
//! # Strategy
//!
//! - Random text: arbitrary strings handed straight to the decoder
//! - Deeply nested: payload arrays/objects nested to arbitrary depth
//! - Type confusion: a known `type` tag with an arbitrary payload
//! - Mixed peer entries: strings, objects and garbage in one peer list
//!
//! # Invariants
//!
//! - Decoding never panics
//! - Anything that decodes re-encodes and decodes to the same event

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use whispernet_proto::PushEvent;

#[derive(Debug, Clone, Arbitrary)]
enum FrameAttack {
    RandomText { text: String },
    DeeplyNested { depth: u8, object: bool },
    TypeConfusion { known: bool, payload: String },
    MixedPeers { entries: Vec<PeerShape> },
}

#[derive(Debug, Clone, Arbitrary)]
enum PeerShape {
    Bare(String),
    Object { identity: String, nickname: Option<String> },
    Number(i64),
    Null,
}

fn json_string(value: &str) -> String {
    let escaped: String = value
        .chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
            c => vec![c],
        })
        .collect();
    format!("\"{escaped}\"")
}

fn check(frame: &str) {
    let Ok(event) = PushEvent::decode(frame) else {
        return;
    };
    if let PushEvent::Unknown { .. } = event {
        return;
    }
    let encoded = event.encode().expect("decoded events encode");
    assert_eq!(PushEvent::decode(&encoded).ok(), Some(event));
}

fuzz_target!(|attack: FrameAttack| {
    match attack {
        FrameAttack::RandomText { text } => check(&text),

        FrameAttack::DeeplyNested { depth, object } => {
            let depth = usize::from(depth);
            let (open, close) = if object { ("{\"a\":", "}") } else { ("[", "]") };
            let payload = format!("{}1{}", open.repeat(depth), close.repeat(depth));
            check(&format!(r#"{{"type":"PEER_LIST_UPDATE","payload":{payload}}}"#));
            check(&format!(r#"{{"type":"NEW_MESSAGE","payload":{payload}}}"#));
        },

        FrameAttack::TypeConfusion { known, payload } => {
            let kind = if known { "NEW_MESSAGE" } else { "PEER_LIST_UPDATE" };
            check(&format!(r#"{{"type":"{kind}","payload":{payload}}}"#));
        },

        FrameAttack::MixedPeers { entries } => {
            let entries: Vec<String> = entries
                .iter()
                .map(|entry| match entry {
                    PeerShape::Bare(identity) => json_string(identity),
                    PeerShape::Object { identity, nickname: Some(nickname) } => format!(
                        r#"{{"identity":{},"nickname":{}}}"#,
                        json_string(identity),
                        json_string(nickname)
                    ),
                    PeerShape::Object { identity, nickname: None } => {
                        format!(r#"{{"identity":{}}}"#, json_string(identity))
                    },
                    PeerShape::Number(n) => n.to_string(),
                    PeerShape::Null => "null".to_owned(),
                })
                .collect();
            check(&format!(r#"{{"type":"PEER_LIST_UPDATE","payload":[{}]}}"#, entries.join(",")));
        },
    }
});
