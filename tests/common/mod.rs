//! Test helpers for end-to-end tests.
//!
//! Starts an in-process stub of the document backend on an ephemeral port and
//! records every request it receives.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use docdesk::api::ApiClient;
use docdesk::config::ApiConfig;

/// Token the stub accepts.
pub const VALID_TOKEN: &str = "tok-123";

/// Password the stub accepts at login.
pub const VALID_PASSWORD: &str = "Secret1";

/// Device id used by test clients.
pub const DEVICE_ID: &str = "web_1700000000000_abcdefghijklmno";

/// Content served by the download endpoint.
pub const DOWNLOAD_BODY: &[u8] = b"%PDF-1.4 stub";

/// One request seen by the stub.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub device_id: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Mutable stub state.
#[derive(Default)]
pub struct Stub {
    pub requests: Mutex<Vec<Recorded>>,
    /// Flat listing served by `GET /api/folders/listar`.
    pub folders: Mutex<Vec<Value>>,
    /// Root folders served by `GET /api/folders/jerarquia`.
    pub hierarchy: Mutex<Vec<Value>>,
    /// Folder ids whose DELETE fails with 500.
    pub failing_deletes: Mutex<Vec<String>>,
    next_id: Mutex<usize>,
}

impl Stub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_folders(self, folders: Vec<Value>) -> Self {
        *self.folders.lock().unwrap() = folders;
        self
    }

    pub fn with_hierarchy(self, roots: Vec<Value>) -> Self {
        *self.hierarchy.lock().unwrap() = roots;
        self
    }

    pub fn failing_delete(self, id: &str) -> Self {
        self.failing_deletes.lock().unwrap().push(id.to_string());
        self
    }

    fn next_id(&self, prefix: &str) -> String {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        format!("{prefix}{}", *next)
    }

    fn find_folder(&self, id: &str) -> Option<Value> {
        self.folders
            .lock()
            .unwrap()
            .iter()
            .find(|f| f["_id"] == id)
            .cloned()
    }
}

/// A running stub backend.
pub struct StubBackend {
    pub addr: SocketAddr,
    pub stub: Arc<Stub>,
}

impl StubBackend {
    /// Start `stub` on `127.0.0.1:0`.
    pub async fn start(stub: Stub) -> Self {
        let stub = Arc::new(stub);
        let app = Router::new().fallback(handle).with_state(stub.clone());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr, stub }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url(),
            ..ApiConfig::default()
        }
    }

    /// Client without a token.
    pub fn anonymous_client(&self) -> ApiClient {
        ApiClient::new(&self.api_config(), DEVICE_ID).unwrap()
    }

    /// Client logged in with the accepted token.
    pub fn client(&self) -> ApiClient {
        self.anonymous_client()
            .with_token(Some(VALID_TOKEN.to_string()))
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.stub.requests.lock().unwrap().clone()
    }

    /// `"METHOD /path"` for every request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().unwrap()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn ok(value: Value) -> Response {
    (StatusCode::OK, Json(value)).into_response()
}

fn fail(status: StatusCode, mensaje: &str) -> Response {
    (status, Json(json!({ "mensaje": mensaje }))).into_response()
}

async fn handle(
    State(stub): State<Arc<Stub>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let recorded = Recorded {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        device_id: header(&headers, "x-device-id"),
        authorization: header(&headers, "authorization"),
        content_type: header(&headers, "content-type"),
        body: body.to_vec(),
    };
    stub.requests.lock().unwrap().push(recorded.clone());

    let segments: Vec<&str> = recorded.path.trim_start_matches('/').split('/').collect();
    if let ("POST", ["api", "users", "login"]) = (recorded.method.as_str(), segments.as_slice()) {
        return login(&recorded);
    }
    let expected = format!("Bearer {VALID_TOKEN}");
    if recorded.authorization.as_deref() != Some(expected.as_str()) {
        return fail(StatusCode::UNAUTHORIZED, "Token inválido o expirado");
    }

    match (recorded.method.as_str(), segments.as_slice()) {
        ("POST", ["api", "users", "cerrar-sesion-actual"]) => ok(json!({ "ok": true })),
        ("GET", ["api", "users", "perfil"]) => ok(admin_user()),
        ("GET", ["api", "users", "listar"]) => ok(json!({
            "users": [
                admin_user(),
                { "_id": "u2", "email": "ana@transportes.com", "companyName": "Transportes Ana", "rol": "usuario" }
            ]
        })),
        ("POST", ["api", "users", "registro"]) => {
            let mut user = recorded.json();
            user["_id"] = json!(stub.next_id("u"));
            ok(json!({ "user": user }))
        }
        ("POST", ["api", "users", "cambiar-contrasena"]) => {
            if recorded.json()["currentPassword"] == VALID_PASSWORD {
                ok(json!({ "mensaje": "Contraseña actualizada" }))
            } else {
                fail(StatusCode::BAD_REQUEST, "La contraseña actual es incorrecta")
            }
        }
        ("POST", ["api", "users", "reset-password", _]) => {
            ok(json!({ "newPassword": "Tmp4567" }))
        }
        ("GET", ["api", "folders", "listar"]) => ok(Value::Array(stub.folders.lock().unwrap().clone())),
        ("GET", ["api", "folders", "jerarquia"]) => {
            ok(json!({ "carpetas": stub.hierarchy.lock().unwrap().clone() }))
        }
        ("POST", ["api", "folders", "crear"]) => {
            let mut folder = recorded.json();
            folder["_id"] = json!(stub.next_id("f"));
            stub.folders.lock().unwrap().push(folder.clone());
            ok(json!({ "mensaje": "Carpeta creada", "folder": folder }))
        }
        ("GET", ["api", "folders", id, "subcarpetas"]) => {
            let subs: Vec<Value> = stub
                .folders
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f["parentFolder"] == *id)
                .cloned()
                .collect();
            ok(json!({ "subcarpetas": subs }))
        }
        ("POST", ["api", "folders", id, "subcarpetas"]) => {
            let mut folder = recorded.json();
            folder["_id"] = json!(stub.next_id("s"));
            folder["parentFolder"] = json!(id);
            stub.folders.lock().unwrap().push(folder.clone());
            ok(json!({ "folder": folder }))
        }
        ("PUT", ["api", "folders", _, "usuarios"]) => {
            if recorded.json()["usuarios"].is_array() {
                ok(json!({ "mensaje": "Usuarios asignados" }))
            } else {
                fail(StatusCode::BAD_REQUEST, "Se requiere la lista de usuarios")
            }
        }
        ("GET", ["api", "folders", "categoria", category]) => {
            let matching: Vec<Value> = stub
                .folders
                .lock()
                .unwrap()
                .iter()
                .filter(|f| f["category"] == *category)
                .cloned()
                .collect();
            ok(json!({ "carpetas": matching }))
        }
        ("POST", ["api", "folders", "crear-prueba"]) => {
            ok(json!({ "mensaje": "Carpetas de prueba creadas", "creadas": 3 }))
        }
        ("POST", ["api", "folders", "limpiar"]) => {
            let mut folders = stub.folders.lock().unwrap();
            let removed = folders.len();
            folders.clear();
            ok(json!({ "mensaje": "Carpetas eliminadas", "eliminadas": removed }))
        }
        ("GET", ["api", "folders", "debug"]) => {
            let total = stub.folders.lock().unwrap().len();
            ok(json!({ "totalCarpetas": total }))
        }
        ("GET", ["api", "folders", id]) => match stub.find_folder(id) {
            Some(folder) => ok(json!({ "folder": folder })),
            None => fail(StatusCode::NOT_FOUND, "Carpeta no encontrada"),
        },
        ("PUT", ["api", "folders", _]) => ok(json!({ "mensaje": "Carpeta actualizada" })),
        ("DELETE", ["api", "folders", id]) => {
            if stub.failing_deletes.lock().unwrap().iter().any(|f| f == id) {
                fail(StatusCode::INTERNAL_SERVER_ERROR, "No se pudo eliminar la carpeta")
            } else {
                ok(json!({ "mensaje": "Carpeta eliminada" }))
            }
        }
        ("GET", ["api", "files", "listar"]) => ok(json!({
            "archivos": [
                { "_id": "file1", "name": "contrato", "size": 2048, "description": "PDF document" },
                { "_id": "file2", "name": "logo", "size": 1536 }
            ]
        })),
        ("POST", ["api", "files", "subir"]) => ok(json!({
            "file": { "_id": "file9", "name": "uploaded", "size": recorded.body.len() }
        })),
        ("GET", ["api", "files", "descargar", _]) => {
            (StatusCode::OK, DOWNLOAD_BODY.to_vec()).into_response()
        }
        ("DELETE", ["api", "files", _]) => StatusCode::NO_CONTENT.into_response(),
        ("GET", ["api", "groups", "listar"]) => ok(json!([
            { "_id": "g1", "name": "Oficina", "users": ["u1", { "_id": "u2", "email": "ana@transportes.com" }] }
        ])),
        ("POST", ["api", "groups", "crear"]) => {
            let mut group = recorded.json();
            group["_id"] = json!(stub.next_id("g"));
            ok(json!({ "group": group }))
        }
        ("GET", ["api", "groups", id]) => ok(json!({
            "group": { "_id": id, "name": "Oficina", "users": ["u1", "u2"] }
        })),
        ("PUT", ["api", "groups", id]) => {
            let mut group = recorded.json();
            group["_id"] = json!(id);
            ok(json!({ "group": group }))
        }
        ("POST", ["api", "groups", _, "usuarios", _]) => {
            if recorded.body.is_empty() {
                ok(json!({ "ok": true }))
            } else {
                fail(StatusCode::BAD_REQUEST, "Cuerpo no esperado")
            }
        }
        ("POST", ["api", "groups", _, "usuarios"]) => {
            fail(StatusCode::NOT_FOUND, "Ruta no encontrada")
        }
        ("DELETE", ["api", "groups", _, "usuarios", _]) => ok(json!({ "ok": true })),
        ("DELETE", ["api", "groups", _]) => ok(json!({ "ok": true })),
        _ => fail(StatusCode::NOT_FOUND, "Ruta no encontrada"),
    }
}

fn admin_user() -> Value {
    json!({
        "_id": "u1",
        "email": "admin@docdesk.test",
        "companyName": "Docdesk",
        "rol": "admin",
        "folders": ["f-root"],
        "maxSessions": 3
    })
}

fn login(recorded: &Recorded) -> Response {
    let body = recorded.json();
    if body["password"] != VALID_PASSWORD {
        return fail(StatusCode::BAD_REQUEST, "Credenciales inválidas");
    }
    let mut response = admin_user();
    response["token"] = json!(VALID_TOKEN);
    ok(response)
}
