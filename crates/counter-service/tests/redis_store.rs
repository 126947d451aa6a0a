//! Redis store client construction and failure mapping (no server required).

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use counter_core::{KeyNamer, StoreError};
use counter_service::config::RedisSection;
use counter_service::store::{CounterStore, RedisStore};

#[test]
fn client_builds_without_connecting() {
    let mut cfg = RedisSection::default();
    cfg.password = "secret".into();
    cfg.db = 2;
    assert!(RedisStore::new(&cfg).is_ok());
}

#[tokio::test]
async fn unreachable_store_is_unavailable() {
    // Grab a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut cfg = RedisSection::default();
    cfg.url = addr.to_string();
    let store = RedisStore::new(&cfg).unwrap();

    let key = KeyNamer::new("counter").derive_key("x");
    let err = tokio::time::timeout(Duration::from_secs(10), store.increment(&key))
        .await
        .expect("increment must fail fast")
        .unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)), "{err}");
}
