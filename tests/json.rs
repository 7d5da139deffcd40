// Test serialization using json
#![cfg(feature = "serde")]

use kas_atlas::fonts::FamilyName;
use kas_atlas::{CodepointRange, Glyph, Transform};
use serde::{de::Deserialize, ser::Serialize};
use std::cmp::PartialEq;
use std::fmt::Debug;

fn test<X: Debug + PartialEq + Serialize + for<'a> Deserialize<'a>>(x: X, t: &str) {
    match serde_json::to_string(&x) {
        Ok(text) => assert_eq!(text, t),
        Err(err) => panic!("Ser of '{x:?}' failed: {err}"),
    }

    match serde_json::from_str::<X>(t) {
        Ok(v) => assert_eq!(v, x),
        Err(err) => panic!("Deser of '{t}' failed: {err}"),
    }
}

#[test]
fn range() {
    test(CodepointRange::single(0x41), "{\"first\":65,\"last\":65}");
}

#[test]
fn transform() {
    test(
        Transform::new(1.0, 0.25, 0.0, 2.0),
        "{\"xx\":1.0,\"xy\":0.25,\"yx\":0.0,\"yy\":2.0}",
    );
}

#[test]
fn glyph() {
    let g = Glyph {
        codepoint: 0xE9,
        top: 9,
        left: -1,
        width: 6,
        height: 10,
        advance_x: 7,
        advance_y: 0,
        offset_x: 120,
    };
    test(
        g,
        "{\"codepoint\":233,\"top\":9,\"left\":-1,\"width\":6,\"height\":10,\"advance_x\":7,\"advance_y\":0,\"offset_x\":120}",
    );
}

#[test]
fn family() {
    test(FamilyName::Named("abc".to_string()), "{\"Named\":\"abc\"}");
    test(FamilyName::Monospace, "\"Monospace\"");
}
