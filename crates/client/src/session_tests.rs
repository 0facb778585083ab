// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn temp_session_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("session.json")
}

#[tokio::test]
async fn load_missing_file_is_unauthenticated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = SessionStore::load(temp_session_path(&dir));

    assert!(!store.is_authenticated().await);
    assert!(store.roles().await.is_empty());
    assert!(!store.has_role(ROLE_ADMIN).await);
    assert!(!store.has_any_role(&[ROLE_ADMIN, ROLE_CUSTOMER]).await);
}

#[tokio::test]
async fn establish_persists_and_reloads() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = temp_session_path(&dir);

    let store = SessionStore::load(path.clone());
    store
        .establish("tok-123".to_owned(), vec![ROLE_CUSTOMER.to_owned()])
        .await;

    assert!(store.is_authenticated().await);
    assert_eq!(store.token().await.as_deref(), Some("tok-123"));
    assert!(store.is_customer().await);
    assert!(!store.is_admin().await);

    // A fresh store rehydrates the same token and roles from disk.
    let reloaded = SessionStore::load(path);
    assert_eq!(reloaded.token().await.as_deref(), Some("tok-123"));
    assert_eq!(reloaded.roles().await, vec![ROLE_CUSTOMER.to_owned()]);
}

#[tokio::test]
async fn establish_broadcasts_logged_in_with_roles() {
    let store = SessionStore::ephemeral();
    let mut rx = store.subscribe();

    store
        .establish("tok".to_owned(), vec![ROLE_ADMIN.to_owned()])
        .await;

    // The session is readable before the event arrives: no unauthenticated
    // window between login and the first read.
    assert!(store.is_authenticated().await);
    match rx.try_recv().expect("event") {
        AuthEvent::LoggedIn { roles } => assert_eq!(roles, vec![ROLE_ADMIN.to_owned()]),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn clear_removes_file_and_broadcasts_logged_out() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = temp_session_path(&dir);

    let store = SessionStore::load(path.clone());
    store.establish("tok".to_owned(), vec![ROLE_CUSTOMER.to_owned()]).await;
    assert!(path.exists());

    let mut rx = store.subscribe();
    store.clear().await;

    assert!(!store.is_authenticated().await);
    assert!(store.roles().await.is_empty());
    assert!(!path.exists());
    assert!(matches!(rx.try_recv(), Ok(AuthEvent::LoggedOut)));
}

#[tokio::test]
async fn expire_broadcasts_redirect_to_login() {
    let store = SessionStore::ephemeral();
    store.establish("tok".to_owned(), vec![ROLE_CUSTOMER.to_owned()]).await;

    let mut rx = store.subscribe();
    store.expire().await;

    assert!(!store.is_authenticated().await);
    match rx.try_recv().expect("event") {
        AuthEvent::SessionExpired { redirect_to } => assert_eq!(redirect_to, LOGIN_ROUTE),
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn corrupt_file_is_ignored() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = temp_session_path(&dir);
    std::fs::write(&path, "{not json").expect("write");

    let store = SessionStore::load(path);
    assert!(!store.is_authenticated().await);
}

#[tokio::test]
async fn empty_token_in_file_is_unauthenticated() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = temp_session_path(&dir);
    std::fs::write(&path, r#"{"accessToken": "", "roles": ["ADMIN"]}"#).expect("write");

    let store = SessionStore::load(path);
    assert!(!store.is_authenticated().await);
    assert!(!store.has_role(ROLE_ADMIN).await);
}

#[test]
fn role_predicates_are_flat_membership() {
    let session = Session {
        token: Some("tok".to_owned()),
        roles: vec![ROLE_CUSTOMER.to_owned()],
    };
    assert!(session.has_role(ROLE_CUSTOMER));
    assert!(!session.has_role(ROLE_ADMIN));
    assert!(session.has_any_role(&[ROLE_ADMIN, ROLE_CUSTOMER]));
    assert!(!session.has_any_role(&[ROLE_ADMIN]));

    // Roles without a token never match.
    let stale = Session { token: None, roles: vec![ROLE_ADMIN.to_owned()] };
    assert!(!stale.has_role(ROLE_ADMIN));
    assert!(!stale.has_any_role(&[ROLE_ADMIN]));
}
