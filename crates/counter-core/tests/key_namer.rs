//! Storage key derivation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use counter_core::KeyNamer;

#[test]
fn key_layout() {
    let namer = KeyNamer::new("counter");
    assert_eq!(namer.derive_key("foobar").as_str(), "counter.next.foobar");
    assert_eq!(namer.derive_key("default").to_string(), "counter.next.default");
}

#[test]
fn prefix_is_configurable() {
    let namer = KeyNamer::new("svc-a");
    assert_eq!(namer.prefix(), "svc-a");
    assert_eq!(namer.derive_key("x1").as_str(), "svc-a.next.x1");
}

#[test]
fn deterministic() {
    let namer = KeyNamer::new("counter");
    assert_eq!(namer.derive_key("abc"), namer.derive_key("abc"));
}

#[test]
fn separator_in_label_is_escaped() {
    let namer = KeyNamer::new("counter");
    assert_eq!(namer.derive_key("a.b").as_str(), "counter.next.a%2Eb");
    assert_eq!(namer.derive_key("50%").as_str(), "counter.next.50%25");
}

#[test]
fn escaping_keeps_keys_distinct() {
    let namer = KeyNamer::new("counter");
    let labels = ["a.b", "a%2Eb", "a%252Eb", "a", "a.", "a%", "a%25"];
    let keys: std::collections::HashSet<_> = labels.iter().map(|l| namer.derive_key(l)).collect();
    assert_eq!(keys.len(), labels.len());
}
