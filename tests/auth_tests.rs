mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{make_token, now_secs};
use snaplist_client::error::Error;
use snaplist_client::prelude::*;
use snaplist_client::token::{MemoryStorage, TokenStorage};

fn client_with_storage(url: &str, storage: Arc<MemoryStorage>) -> Snaplist {
    Snaplist::new_with_options(url, ClientOptions::default(), Box::new(storage))
}

#[tokio::test]
async fn login_success_activates_session() {
    let mock_server = MockServer::start().await;
    let token = make_token("alice", 7, now_secs() + 3600);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "username": "alice", "password": "pw" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(&mock_server)
        .await;

    let snaplist = Snaplist::new(&mock_server.uri());
    let user = snaplist.auth().login("alice", "pw").await.unwrap();

    assert_eq!(user.username, "alice");
    assert_eq!(user.uid, 7);
    assert!(snaplist.auth().is_authenticated());
    assert_eq!(snaplist.token_store().get(), Some(token));
}

#[tokio::test]
async fn login_replaces_the_previous_session_wholesale() {
    let mock_server = MockServer::start().await;
    let alice = make_token("alice", 7, now_secs() + 3600);
    let bob = make_token("bob", 8, now_secs() + 3600);

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": alice })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    let snaplist = Snaplist::new(&mock_server.uri());
    snaplist.auth().login("alice", "pw").await.unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": bob })))
        .mount(&mock_server)
        .await;

    snaplist.auth().login("bob", "pw").await.unwrap();

    let user = snaplist.auth().current_user().unwrap();
    assert_eq!(user.username, "bob");
    assert_eq!(user.uid, 8);
    assert_eq!(snaplist.token_store().get(), Some(bob));
}

#[tokio::test]
async fn login_failure_surfaces_the_server_body_verbatim() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "bad credentials" })),
        )
        .mount(&mock_server)
        .await;

    let snaplist = Snaplist::new(&mock_server.uri());
    let err = snaplist.auth().login("alice", "wrong").await.unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("bad credentials"));
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(!snaplist.auth().is_authenticated());
    assert!(snaplist.token_store().get().is_none());
}

#[tokio::test]
async fn login_with_undecodable_token_stays_anonymous() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": "garbage" })))
        .mount(&mock_server)
        .await;

    let snaplist = Snaplist::new(&mock_server.uri());
    let err = snaplist.auth().login("alice", "pw").await.unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert!(!snaplist.auth().is_authenticated());
    assert!(snaplist.token_store().get().is_none());
}

#[tokio::test]
async fn login_validation_rejects_empty_fields_before_any_request() {
    let mock_server = MockServer::start().await;
    let snaplist = Snaplist::new(&mock_server.uri());

    let err = snaplist.auth().login("", "").await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn register_posts_the_signup_payload() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/register"))
        .and(body_json(json!({
            "username": "alice",
            "email": "alice@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let snaplist = Snaplist::new(&mock_server.uri());
    snaplist
        .auth()
        .register("alice", "alice@example.com", "pw")
        .await
        .unwrap();

    // registering never logs in by itself
    assert!(!snaplist.auth().is_authenticated());
}

#[tokio::test]
async fn restore_with_no_token_is_anonymous_and_offline() {
    let mock_server = MockServer::start().await;
    let snaplist = Snaplist::new(&mock_server.uri());

    assert!(snaplist.auth().restore_session().is_none());
    assert!(!snaplist.auth().is_authenticated());
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn restore_with_expired_token_purges_the_persisted_copy() {
    let storage = Arc::new(MemoryStorage::default());
    storage.save(&make_token("alice", 7, now_secs() - 60));

    let snaplist = client_with_storage("http://localhost:0", Arc::clone(&storage));

    assert!(snaplist.auth().restore_session().is_none());
    assert!(!snaplist.auth().is_authenticated());
    assert!(storage.load().is_none());
}

#[tokio::test]
async fn restore_with_corrupt_token_fails_silently_to_anonymous() {
    let storage = Arc::new(MemoryStorage::default());
    storage.save("not-a-jwt");

    let snaplist = client_with_storage("http://localhost:0", Arc::clone(&storage));

    assert!(snaplist.auth().restore_session().is_none());
    assert!(storage.load().is_none());
}

#[tokio::test]
async fn restore_with_valid_token_reactivates_the_session() {
    let storage = Arc::new(MemoryStorage::default());
    storage.save(&make_token("alice", 7, now_secs() + 3600));

    let snaplist = client_with_storage("http://localhost:0", Arc::clone(&storage));

    let user = snaplist.auth().restore_session().unwrap();
    assert_eq!(user.username, "alice");
    assert_eq!(user.uid, 7);
    assert!(snaplist.auth().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn auto_logout_fires_at_expiry() {
    let snaplist = Snaplist::new("http://localhost:0");
    let token = make_token("alice", 7, now_secs() + 3600);

    snaplist.auth().set_credentials(&token).unwrap();
    assert!(snaplist.auth().is_authenticated());

    // let the logout task register its timer, then run past the expiry
    tokio::task::yield_now().await;
    tokio::time::sleep(Duration::from_secs(3601)).await;

    assert!(!snaplist.auth().is_authenticated());
    assert!(snaplist.auth().current_user().is_none());
    assert!(snaplist.token_store().get().is_none());
}

#[tokio::test(start_paused = true)]
async fn rearming_cancels_the_previous_logout_timer() {
    let snaplist = Snaplist::new("http://localhost:0");

    snaplist
        .auth()
        .set_credentials(&make_token("alice", 7, now_secs() + 100))
        .unwrap();
    tokio::task::yield_now().await;

    snaplist
        .auth()
        .set_credentials(&make_token("alice", 7, now_secs() + 3600))
        .unwrap();
    tokio::task::yield_now().await;

    // past the first expiry: the first timer must not have fired
    tokio::time::sleep(Duration::from_secs(200)).await;
    assert!(snaplist.auth().is_authenticated());

    // past the second expiry: the live timer fires
    tokio::time::sleep(Duration::from_secs(3500)).await;
    assert!(!snaplist.auth().is_authenticated());
}

#[tokio::test(start_paused = true)]
async fn logout_clears_state_and_cancels_the_timer() {
    let storage = Arc::new(MemoryStorage::default());
    let snaplist = client_with_storage("http://localhost:0", Arc::clone(&storage));

    snaplist
        .auth()
        .set_credentials(&make_token("alice", 7, now_secs() + 3600))
        .unwrap();
    tokio::task::yield_now().await;

    snaplist.auth().logout();

    assert!(!snaplist.auth().is_authenticated());
    assert!(snaplist.token_store().get().is_none());
    assert!(storage.load().is_none());

    // a new session armed after logout is not clobbered by the old timer
    snaplist
        .auth()
        .set_credentials(&make_token("bob", 8, now_secs() + 7200))
        .unwrap();
    tokio::task::yield_now().await;

    tokio::time::sleep(Duration::from_secs(3601)).await;
    assert!(snaplist.auth().is_authenticated());
}

#[tokio::test]
async fn set_credentials_with_expired_token_is_rejected() {
    let snaplist = Snaplist::new("http://localhost:0");

    let err = snaplist
        .auth()
        .set_credentials(&make_token("alice", 7, now_secs() - 1))
        .unwrap_err();

    assert!(matches!(err, Error::Decode(_)));
    assert!(!snaplist.auth().is_authenticated());
}
