//! Plan string codec behaviour against hand-built payloads.

use std::io::Write;

use base64::Engine;
use blueprint_kit_lib::codec::{decode_plan, decode_to_json, encode_from_json, encode_plan};
use blueprint_kit_lib::plan::{BlueprintBook, Plan};
use blueprint_kit_lib::Error;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::json;

mod common;

const BLUEPRINT_JSON: &str = r#"{
    "blueprint": {
        "item": "blueprint",
        "label": "Smelter",
        "icons": [{"signal": {"type": "item", "name": "stone-furnace"}, "index": 1}],
        "entities": [
            {"entity_number": 1, "name": "stone-furnace", "position": {"x": 1, "y": 1}},
            {"entity_number": 2, "name": "inserter", "position": {"x": 0.5, "y": 2.5}, "direction": 8, "override_stack_size": 1}
        ],
        "snap-to-grid": {"x": 2, "y": 3},
        "version": 562949954076673
    }
}"#;

fn pack(payload: &[u8]) -> String {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(payload).expect("compress payload");
    let compressed = encoder.finish().expect("finish payload");
    format!(
        "0{}",
        base64::engine::general_purpose::STANDARD.encode(compressed)
    )
}

#[test]
fn encode_then_decode_reproduces_the_plan() {
    let plan = Plan::Blueprint(common::blueprint_of(&["pipe", "pipe", "small-pole"]));
    let encoded = encode_plan(&plan).expect("encode");
    assert!(encoded.starts_with('0'));
    assert_eq!(decode_plan(&encoded).expect("decode"), plan);
}

#[test]
fn unknown_fields_survive_a_json_round_trip() {
    let encoded = encode_from_json(BLUEPRINT_JSON).expect("encode json");
    let pretty = decode_to_json(&encoded).expect("decode json");

    let original: serde_json::Value = serde_json::from_str(BLUEPRINT_JSON).expect("parse input");
    let round_tripped: serde_json::Value = serde_json::from_str(&pretty).expect("parse output");
    assert_eq!(
        round_tripped["blueprint"]["snap-to-grid"],
        original["blueprint"]["snap-to-grid"]
    );
    assert_eq!(
        round_tripped["blueprint"]["entities"][1]["override_stack_size"],
        json!(1)
    );
    assert_eq!(round_tripped["blueprint"]["version"], json!(562949954076673u64));
}

#[test]
fn pretty_json_uses_four_space_indent() {
    let encoded = encode_from_json(BLUEPRINT_JSON).expect("encode json");
    let pretty = decode_to_json(&encoded).expect("decode json");
    assert!(pretty.starts_with("{\n    \"blueprint\": {\n        "));
}

#[test]
fn books_decode_recursively() {
    let book = Plan::BlueprintBook(BlueprintBook::with_plans([
        Plan::Blueprint(common::blueprint_of(&["pipe"])),
        Plan::BlueprintBook(BlueprintBook::with_plans([Plan::Blueprint(
            common::blueprint_of(&["rail"]),
        )])),
    ]));
    let decoded = decode_plan(&encode_plan(&book).expect("encode")).expect("decode");
    match decoded {
        Plan::BlueprintBook(decoded_book) => {
            assert_eq!(decoded_book.blueprints.len(), 2);
            assert!(matches!(
                decoded_book.blueprints[1].plan,
                Plan::BlueprintBook(_)
            ));
        }
        other => panic!("unexpected plan: {:?}", other),
    }
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let encoded = encode_from_json(BLUEPRINT_JSON).expect("encode json");
    let padded = format!("  {encoded}\n");
    assert_eq!(
        decode_plan(&padded).expect("decode padded"),
        decode_plan(&encoded).expect("decode")
    );
}

#[test]
fn empty_string_is_rejected() {
    for input in ["", "   \n"] {
        match decode_plan(input) {
            Err(Error::EmptyPlanString) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

#[test]
fn unknown_version_is_rejected() {
    let encoded = encode_from_json(BLUEPRINT_JSON).expect("encode json");
    let bumped = format!("1{}", &encoded[1..]);
    match decode_plan(&bumped) {
        Err(Error::UnsupportedPlanVersion { version }) => assert_eq!(version, '1'),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn malformed_base64_is_rejected() {
    assert!(matches!(
        decode_plan("0not*base64!"),
        Err(Error::PlanBase64 { .. })
    ));
}

#[test]
fn payload_that_is_not_zlib_is_rejected() {
    let raw = format!(
        "0{}",
        base64::engine::general_purpose::STANDARD.encode(b"plain text")
    );
    assert!(matches!(
        decode_plan(&raw),
        Err(Error::PlanCompression { .. })
    ));
}

#[test]
fn payload_that_is_not_plan_json_is_rejected() {
    assert!(matches!(
        decode_plan(&pack(b"[1, 2, 3")),
        Err(Error::PlanJson { .. })
    ));
    assert!(matches!(
        decode_plan(&pack(br#"{"spaceship": {}}"#)),
        Err(Error::PlanJson { .. })
    ));
}

#[test]
fn malformed_json_cannot_be_encoded() {
    assert!(matches!(
        encode_from_json("{\"blueprint\": "),
        Err(Error::PlanJson { .. })
    ));
}
