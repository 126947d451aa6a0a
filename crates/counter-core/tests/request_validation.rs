//! Query parsing and label validation.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use counter_core::request::{is_valid_label, parse_query};
use counter_core::{CounterRequest, ValidationError, DEFAULT_LABEL};

#[test]
fn missing_query_uses_default_label() {
    let req = CounterRequest::from_query(None).unwrap();
    assert_eq!(req.label(), DEFAULT_LABEL);

    let req = CounterRequest::from_query(Some("")).unwrap();
    assert_eq!(req.label(), "default");
}

#[test]
fn label_is_taken_from_query() {
    let req = CounterRequest::from_query(Some("label=foobar")).unwrap();
    assert_eq!(req.label(), "foobar");
}

#[test]
fn unknown_params_are_ignored() {
    let req = CounterRequest::from_query(Some("x=1&label=abc&y")).unwrap();
    assert_eq!(req.label(), "abc");

    let req = CounterRequest::from_query(Some("other=zzz")).unwrap();
    assert_eq!(req.label(), "default");
}

#[test]
fn repeated_label_last_wins() {
    let req = CounterRequest::from_query(Some("label=first&label=second")).unwrap();
    assert_eq!(req.label(), "second");
}

#[test]
fn label_match_is_not_anchored() {
    let req = CounterRequest::from_query(Some("label=%21%21%21abc%21%21%21")).unwrap();
    assert_eq!(req.label(), "!!!abc!!!");
    assert!(is_valid_label("a-b c"));
}

#[test]
fn label_without_alphanumeric_is_rejected() {
    let err = CounterRequest::from_query(Some("label=%21%40%23")).unwrap_err();
    assert_eq!(err, ValidationError::InvalidLabel);
    assert_eq!(err.to_string(), "invalid label");

    assert!(!is_valid_label("---"));
}

#[test]
fn empty_label_is_not_the_default() {
    let err = CounterRequest::from_query(Some("label=")).unwrap_err();
    assert_eq!(err, ValidationError::InvalidLabel);
}

#[test]
fn bad_escape_is_malformed() {
    let err = CounterRequest::from_query(Some("label=%!@")).unwrap_err();
    assert_eq!(
        err,
        ValidationError::Malformed(r#"invalid URL escape "%!@""#.into())
    );

    let err = parse_query("label=ab%4").unwrap_err();
    assert!(matches!(err, ValidationError::Malformed(_)));
}

#[test]
fn semicolon_separator_is_malformed() {
    let err = parse_query("label=a;b=c").unwrap_err();
    assert_eq!(
        err,
        ValidationError::Malformed("invalid semicolon separator in query".into())
    );
}

#[test]
fn plus_and_percent_decoding() {
    let pairs = parse_query("a=hello+world&b=%41%62c&c").unwrap();
    assert_eq!(
        pairs,
        vec![
            ("a".to_string(), "hello world".to_string()),
            ("b".to_string(), "Abc".to_string()),
            ("c".to_string(), String::new()),
        ]
    );
}

#[test]
fn invalid_utf8_is_malformed() {
    let err = parse_query("label=%FF").unwrap_err();
    assert!(matches!(err, ValidationError::Malformed(_)));
}

#[test]
fn encoded_plus_is_kept_literal() {
    let pairs = parse_query("label=a%2Bb+c").unwrap();
    assert_eq!(pairs, vec![("label".to_string(), "a+b c".to_string())]);
}

#[test]
fn escapes_are_checked_anywhere_in_the_pair() {
    let err = parse_query("lab%el=x").unwrap_err();
    assert_eq!(err, ValidationError::Malformed(r#"invalid URL escape "%el""#.into()));

    let err = parse_query("label=abc%").unwrap_err();
    assert_eq!(err, ValidationError::Malformed(r#"invalid URL escape "%""#.into()));

    let pairs = parse_query("label=%e2%82%ac").unwrap();
    assert_eq!(pairs[0].1, "€");
}
