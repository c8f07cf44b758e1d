//! Client and authentication tests against the stub backend.

mod common;

use common::{StubBackend, DEVICE_ID, VALID_PASSWORD, VALID_TOKEN};
use docdesk::api::{AuthService, FolderService, GroupService};
use docdesk::model::{GroupUpdate, NewGroup, NewUser, Role, UserUpdate};
use docdesk::session::SessionStore;
use docdesk::DocdeskError;
use serde_json::json;
use tempfile::TempDir;

fn session_store(dir: &TempDir) -> SessionStore {
    SessionStore::open(dir.path().join("session.json")).unwrap()
}

#[tokio::test]
async fn test_every_request_carries_device_id_and_token() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let client = backend.client();

    AuthService::new(&client).profile().await.unwrap();

    let request = backend.last_request();
    assert_eq!(request.path, "/api/users/perfil");
    assert_eq!(request.device_id.as_deref(), Some(DEVICE_ID));
    assert_eq!(
        request.authorization,
        Some(format!("Bearer {VALID_TOKEN}"))
    );
}

#[tokio::test]
async fn test_login_stores_session() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let dir = TempDir::new().unwrap();
    let mut store = session_store(&dir);
    let client = backend.anonymous_client();

    let login = AuthService::new(&client)
        .login(&mut store, " admin@docdesk.test ", VALID_PASSWORD)
        .await
        .unwrap();
    assert_eq!(login.token, VALID_TOKEN);
    assert_eq!(login.user.rol, Role::Admin);
    assert!(login.user.is_admin());

    let request = backend.last_request();
    assert_eq!(request.authorization, None);
    assert_eq!(
        request.json(),
        json!({
            "email": "admin@docdesk.test",
            "password": VALID_PASSWORD,
            "deviceId": DEVICE_ID
        })
    );

    let reopened = session_store(&dir);
    assert!(reopened.is_authenticated());
    assert_eq!(reopened.token(), Some(VALID_TOKEN));
    assert_eq!(reopened.current_user().unwrap().id, "u1");
}

#[tokio::test]
async fn test_login_failure_uses_backend_message() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let dir = TempDir::new().unwrap();
    let mut store = session_store(&dir);
    let client = backend.anonymous_client();

    let err = AuthService::new(&client)
        .login(&mut store, "admin@docdesk.test", "wrong")
        .await
        .unwrap_err();
    match err {
        DocdeskError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Credenciales inválidas");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_rejected_token_is_unauthorized() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let client = backend
        .anonymous_client()
        .with_token(Some("expired".to_string()));

    let err = FolderService::new(&client).list_folders().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn test_logout_clears_everything() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let dir = TempDir::new().unwrap();
    let mut store = session_store(&dir);
    store.device_id().unwrap();
    let client = backend.anonymous_client();
    let auth = AuthService::new(&client);
    auth.login(&mut store, "admin@docdesk.test", VALID_PASSWORD)
        .await
        .unwrap();

    let client = client.with_token(store.token().map(str::to_string));
    AuthService::new(&client).logout(&mut store).await.unwrap();

    assert_eq!(
        backend.last_request().json(),
        json!({ "deviceId": DEVICE_ID })
    );
    assert!(!store.is_authenticated());
    assert!(store.state().device_id.is_none());
}

#[tokio::test]
async fn test_logout_clears_session_even_when_backend_fails() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let dir = TempDir::new().unwrap();
    let mut store = session_store(&dir);
    store.set_login(Default::default(), "stale").unwrap();

    // The stub rejects the stale token; logout still succeeds locally.
    let client = backend.anonymous_client().with_token(Some("stale".into()));
    AuthService::new(&client).logout(&mut store).await.unwrap();
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_change_password_validates_before_sending() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let dir = TempDir::new().unwrap();
    let mut store = session_store(&dir);
    let client = backend.client();
    let auth = AuthService::new(&client);

    let err = auth
        .change_password(&mut store, VALID_PASSWORD, "short", "short")
        .await
        .unwrap_err();
    assert!(matches!(err, DocdeskError::Validation(_)));
    assert!(backend.requests().is_empty());

    store.set_login(Default::default(), VALID_TOKEN).unwrap();
    auth.change_password(&mut store, VALID_PASSWORD, "Nueva123", "Nueva123")
        .await
        .unwrap();
    assert_eq!(
        backend.last_request().json(),
        json!({ "currentPassword": VALID_PASSWORD, "newPassword": "Nueva123" })
    );
    assert!(!store.is_authenticated());
}

#[tokio::test]
async fn test_user_administration() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let client = backend.client();
    let auth = AuthService::new(&client);

    let users = auth.list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[1].display_name(), "Transportes Ana");

    let invalid = NewUser::new("not-an-email", "").with_max_sessions(11);
    assert!(matches!(
        auth.create_user(&invalid).await,
        Err(DocdeskError::Validation(_))
    ));
    assert_eq!(backend.requests().len(), 1);

    let created = auth
        .create_user(&NewUser::new("nuevo@cliente.com", "Cliente Nuevo").with_max_sessions(2))
        .await
        .unwrap();
    assert_eq!(created.email, "nuevo@cliente.com");
    assert_eq!(created.max_sessions, Some(2));
    assert_eq!(
        backend.last_request().json()["companyName"],
        "Cliente Nuevo"
    );

    let update = UserUpdate {
        max_sessions: Some(0),
        ..UserUpdate::new()
    };
    assert!(auth.update_user("u2", &update).await.is_err());

    let generated = auth.reset_user_password("u2", None).await.unwrap();
    assert_eq!(generated.as_deref(), Some("Tmp4567"));
    assert_eq!(backend.last_request().path, "/api/users/reset-password/u2");
}

#[tokio::test]
async fn test_groups() {
    let backend = StubBackend::start(common::Stub::new()).await;
    let client = backend.client();
    let groups = GroupService::new(&client);

    let listed = groups.list_groups().await.unwrap();
    assert_eq!(listed[0].user_ids(), vec!["u1", "u2"]);

    let created = groups
        .create_group(&NewGroup {
            name: "Contabilidad".into(),
            users: vec!["u2".into()],
        })
        .await
        .unwrap();
    assert!(created.contains("u2"));

    groups.add_user("g1", "u3").await.unwrap();
    let request = backend.last_request();
    assert_eq!(request.method, "POST");
    assert_eq!(request.path, "/api/groups/g1/usuarios/u3");
    assert!(request.body.is_empty());

    let group = groups.get_group("g1").await.unwrap();
    assert_eq!(group.name, "Oficina");
    assert_eq!(backend.last_request().path, "/api/groups/g1");

    let renamed = groups
        .update_group(
            "g1",
            &GroupUpdate {
                name: Some("Oficina central".into()),
                users: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Oficina central");
    let request = backend.last_request();
    assert_eq!((request.method.as_str(), request.path.as_str()), ("PUT", "/api/groups/g1"));
    assert_eq!(request.json(), json!({ "name": "Oficina central" }));

    groups.remove_user("g1", "u3").await.unwrap();
    assert_eq!(backend.last_request().method, "DELETE");
    assert_eq!(backend.last_request().path, "/api/groups/g1/usuarios/u3");

    let before = backend.requests().len();
    assert!(groups
        .create_group(&NewGroup {
            name: "  ".into(),
            users: vec![],
        })
        .await
        .is_err());
    assert_eq!(backend.requests().len(), before);
}
