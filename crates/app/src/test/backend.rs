//! In-process stand-in for the bakery REST API.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::{
    Json, Router,
    extract::{FromRequest, Multipart, Path, Query, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Map, Value, json};

/// Password of every seeded account.
pub(crate) const PASSWORD: &str = "rahasia";

const INTEGER_FIELDS: [&str; 3] = ["stock", "order", "category"];

#[derive(Debug, Clone)]
struct Account {
    id: i64,
    username: String,
    password: String,
    role: &'static str,
    email: String,
    nama_lengkap: String,
    phone: String,
    address: String,
    notes: String,
    is_active: bool,
}

impl Account {
    fn new(id: i64, username: &str, role: &'static str) -> Self {
        Self {
            id,
            username: username.to_string(),
            password: PASSWORD.to_string(),
            role,
            email: format!("{username}@buckery.test"),
            nama_lengkap: username.to_string(),
            phone: String::new(),
            address: String::new(),
            notes: String::new(),
            is_active: true,
        }
    }

    fn is_back_office(&self) -> bool {
        matches!(self.role, "ADMIN" | "STAFF")
    }

    fn profile(&self) -> Value {
        json!({
            "username": self.username,
            "email": self.email,
            "nama_lengkap": self.nama_lengkap,
            "phone": self.phone,
            "address": self.address,
            "notes": self.notes,
        })
    }

    fn staff_record(&self) -> Value {
        json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "nama_lengkap": self.nama_lengkap,
            "is_active": self.is_active,
        })
    }
}

/// A request the backend received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Recorded {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub authorization: Option<String>,
}

#[derive(Debug)]
struct BackendState {
    accounts: Vec<Account>,
    collections: HashMap<String, Vec<Value>>,
    payments: Vec<Value>,
    next_id: i64,
    revoked: bool,
    requests: Vec<Recorded>,
}

/// Fake backend seeded with a customer (`sari`), an admin (`bos`), a staff
/// member (`staf`), two categories and two products, one of them inactive.
///
/// Tokens are `token-<username>`.
#[derive(Debug, Clone)]
pub(crate) struct FakeBackend {
    state: Arc<Mutex<BackendState>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        let mut collections = HashMap::new();

        collections.insert(
            "categories".to_string(),
            vec![
                json!({"id": 1, "name": "Roti", "description": null}),
                json!({"id": 2, "name": "Kue", "description": "Kue basah"}),
            ],
        );
        collections.insert(
            "products".to_string(),
            vec![
                json!({
                    "id": 1, "name": "Roti Sobek", "price": "20000.00", "description": "",
                    "stock": 10, "image": "/media/products/roti.png", "category": 1,
                    "is_active": true
                }),
                json!({
                    "id": 2, "name": "Bolu Pandan", "price": "35000.00", "description": "",
                    "stock": 0, "image": null, "category": 2, "is_active": false
                }),
            ],
        );
        collections.insert(
            "contact-info".to_string(),
            vec![json!({
                "id": 1, "location": "Jl. Tuparev 10, Karawang",
                "whatsapp_number": "6281234567890", "email": "info@buckery.id"
            })],
        );
        for name in ["testimonials", "team-members", "timeline-events"] {
            collections.insert(name.to_string(), Vec::new());
        }

        Self {
            state: Arc::new(Mutex::new(BackendState {
                accounts: vec![
                    Account::new(1, "sari", "USER"),
                    Account::new(2, "bos", "ADMIN"),
                    Account::new(3, "staf", "STAFF"),
                ],
                collections,
                payments: Vec::new(),
                next_id: 100,
                revoked: false,
                requests: Vec::new(),
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Every request received so far.
    pub(crate) fn requests(&self) -> Vec<Recorded> {
        self.state().requests.clone()
    }

    /// Requests to one method and path.
    pub(crate) fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == *method && request.path == path)
            .collect()
    }

    /// Records of a collection, e.g. `products`.
    pub(crate) fn records(&self, collection: &str) -> Vec<Value> {
        self.state()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    /// Stored payments.
    pub(crate) fn payments(&self) -> Vec<Value> {
        self.state().payments.clone()
    }

    /// Make every issued token invalid, as a server restart would.
    pub(crate) fn revoke_tokens(&self) {
        self.state().revoked = true;
    }

    pub(crate) fn router(&self) -> Router {
        Router::new()
            .route("/api/login/", post(login))
            .route("/api/register/", post(register))
            .route("/api/logout/", post(logout))
            .route("/api/user/profile/", get(profile).put(update_profile))
            .route("/api/payments/", get(list_payments).post(create_payment))
            .route("/api/payments/{id}/", patch(review_payment))
            .route("/api/admin/staff/", get(list_staff).post(create_staff))
            .route("/api/admin/staff/{id}/", patch(update_staff))
            .route("/api/{collection}/", get(list_records).post(create_record))
            .route(
                "/api/{collection}/{id}/",
                get(get_record)
                    .put(replace_record)
                    .patch(update_record)
                    .delete(delete_record),
            )
            .layer(middleware::from_fn_with_state(self.clone(), record))
            .with_state(self.clone())
    }

    fn account(&self, headers: &HeaderMap) -> Option<Account> {
        let token = headers
            .get(header::AUTHORIZATION)?
            .to_str()
            .ok()?
            .strip_prefix("Token ")?;
        let username = token.strip_prefix("token-")?;

        let state = self.state();
        if state.revoked {
            return None;
        }

        state
            .accounts
            .iter()
            .find(|account| account.username == username && account.is_active)
            .cloned()
    }

    fn next_id(&self) -> i64 {
        let mut state = self.state();
        state.next_id += 1;
        state.next_id
    }
}

async fn record(State(backend): State<FakeBackend>, request: Request, next: Next) -> Response {
    let recorded = {
        let text = |name: header::HeaderName| {
            request
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };

        Recorded {
            method: request.method().clone(),
            path: request.uri().path().to_string(),
            content_type: text(header::CONTENT_TYPE),
            authorization: text(header::AUTHORIZATION),
        }
    };
    backend.state().requests.push(recorded);

    next.run(request).await
}

fn error(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn unauthorized() -> Response {
    error(
        StatusCode::UNAUTHORIZED,
        json!({"detail": "Invalid token."}),
    )
}

fn forbidden() -> Response {
    error(
        StatusCode::FORBIDDEN,
        json!({"detail": "You do not have permission to perform this action."}),
    )
}

fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, json!({"detail": "Not found."}))
}

/// Fields of a JSON or multipart body, with uploaded files stored as media
/// paths.
async fn read_body(request: Request, collection: &str) -> Result<Map<String, Value>, Response> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("multipart/form-data"));

    if !is_multipart {
        let Json(body) = Json::<Map<String, Value>>::from_request(request, &())
            .await
            .map_err(IntoResponse::into_response)?;

        return Ok(body
            .into_iter()
            .map(|(name, value)| match value {
                Value::String(text) => {
                    let value = coerce(&name, text);
                    (name, value)
                }
                value => (name, value),
            })
            .collect());
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(IntoResponse::into_response)?;
    let mut fields = Map::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(IntoResponse::into_response)?
    {
        let name = field.name().unwrap_or_default().to_string();

        if let Some(file_name) = field.file_name().map(str::to_string) {
            fields.insert(name, json!(format!("/media/{collection}/{file_name}")));
            continue;
        }

        let text = field.text().await.map_err(IntoResponse::into_response)?;
        let value = coerce(&name, text);

        fields.insert(name, value);
    }

    Ok(fields)
}

/// Form text as the typed value the API stores.
fn coerce(name: &str, text: String) -> Value {
    match name {
        "is_active" => Value::Bool(text == "true"),
        name if INTEGER_FIELDS.contains(&name) => text
            .parse::<i64>()
            .map_or_else(|_| Value::String(text.clone()), Value::from),
        _ => Value::String(text),
    }
}

async fn login(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let username = body.get("username").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let account = backend
        .state()
        .accounts
        .iter()
        .find(|account| {
            account.username == username && account.password == password && account.is_active
        })
        .cloned();

    match account {
        Some(account) => Json(json!({
            "token": format!("token-{}", account.username),
            "username": account.username,
            "user_type": account.role,
        }))
        .into_response(),
        None => error(
            StatusCode::BAD_REQUEST,
            json!({"error": "Invalid credentials"}),
        ),
    }
}

async fn register(State(backend): State<FakeBackend>, Json(body): Json<Value>) -> Response {
    let field = |name| {
        body.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let username = field("username");

    let id = backend.next_id();
    let mut state = backend.state();

    if state.accounts.iter().any(|account| account.username == username) {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"username": ["A user with that username already exists."]}),
        );
    }

    let mut account = Account::new(id, &username, "USER");
    account.password = field("password");
    account.email = field("email");
    account.nama_lengkap = field("nama_lengkap");
    state.accounts.push(account);

    (
        StatusCode::CREATED,
        Json(json!({"message": "Registrasi berhasil"})),
    )
        .into_response()
}

async fn logout() -> Response {
    Json(json!({"message": "Logged out"})).into_response()
}

async fn profile(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    match backend.account(&headers) {
        Some(account) => Json(account.profile()).into_response(),
        None => unauthorized(),
    }
}

async fn update_profile(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(account) = backend.account(&headers) else {
        return unauthorized();
    };

    let mut state = backend.state();
    let Some(stored) = state
        .accounts
        .iter_mut()
        .find(|stored| stored.username == account.username)
    else {
        return not_found();
    };

    for (field, target) in [
        ("phone", &mut stored.phone),
        ("address", &mut stored.address),
        ("notes", &mut stored.notes),
    ] {
        if let Some(value) = body.get(field).and_then(Value::as_str) {
            *target = value.to_string();
        }
    }

    Json(stored.profile()).into_response()
}

async fn list_payments(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    let Some(account) = backend.account(&headers) else {
        return unauthorized();
    };

    let payments: Vec<Value> = backend
        .payments()
        .into_iter()
        .filter(|payment| {
            account.is_back_office()
                || payment.get("owner").and_then(Value::as_str) == Some(account.username.as_str())
        })
        .collect();

    Json(payments).into_response()
}

async fn create_payment(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    let owner = backend.account(&headers).map(|account| account.username);

    let mut fields = match read_body(request, "payment_proofs").await {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    for required in ["customer_name", "items", "total", "payment_proof"] {
        if !fields.contains_key(required) {
            let mut body = Map::new();
            body.insert(required.to_string(), json!(["This field is required."]));

            return error(StatusCode::BAD_REQUEST, Value::Object(body));
        }
    }

    let id = backend.next_id();
    fields.insert("id".to_string(), json!(id));
    fields.insert("order_number".to_string(), json!(format!("BK-{id:04}")));
    fields.insert("owner".to_string(), json!(owner));
    fields.insert("status".to_string(), json!("pending"));

    let payment = Value::Object(fields);
    backend.state().payments.push(payment.clone());

    (StatusCode::CREATED, Json(payment)).into_response()
}

async fn review_payment(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    match backend.account(&headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let mut state = backend.state();
    let Some(payment) = state
        .payments
        .iter_mut()
        .find(|payment| payment.get("id") == Some(&json!(id)))
    else {
        return not_found();
    };

    if let (Some(status), Some(object)) = (body.get("status"), payment.as_object_mut()) {
        object.insert("status".to_string(), status.clone());
    }

    Json(payment.clone()).into_response()
}

async fn list_staff(State(backend): State<FakeBackend>, headers: HeaderMap) -> Response {
    match backend.account(&headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let staff: Vec<Value> = backend
        .state()
        .accounts
        .iter()
        .filter(|account| account.role == "STAFF")
        .map(Account::staff_record)
        .collect();

    Json(staff).into_response()
}

async fn create_staff(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    match backend.account(&headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let field = |name| {
        body.get(name)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mut account = Account::new(backend.next_id(), &field("username"), "STAFF");
    account.password = field("password");
    account.email = field("email");
    account.nama_lengkap = field("nama_lengkap");

    let record = account.staff_record();
    backend.state().accounts.push(account);

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn update_staff(
    State(backend): State<FakeBackend>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    match backend.account(&headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let mut state = backend.state();
    let Some(account) = state
        .accounts
        .iter_mut()
        .find(|account| account.id == id && account.role == "STAFF")
    else {
        return not_found();
    };

    if let Some(active) = body.get("is_active").and_then(Value::as_bool) {
        account.is_active = active;
    }

    Json(account.staff_record()).into_response()
}

fn matches_query(record: &Value, query: &HashMap<String, String>) -> bool {
    query.iter().all(|(name, expected)| {
        let field = if name == "type" { "member_type" } else { name.as_str() };

        match record.get(field) {
            Some(Value::String(value)) => value == expected,
            Some(Value::Number(value)) => value.to_string() == *expected,
            _ => false,
        }
    })
}

async fn list_records(
    State(backend): State<FakeBackend>,
    Path(collection): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let state = backend.state();
    let Some(records) = state.collections.get(&collection) else {
        return not_found();
    };

    let records: Vec<Value> = records
        .iter()
        .filter(|record| matches_query(record, &query))
        .cloned()
        .collect();

    Json(records).into_response()
}

async fn get_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, i64)>,
) -> Response {
    backend
        .records(&collection)
        .into_iter()
        .find(|record| record.get("id") == Some(&json!(id)))
        .map_or_else(not_found, |record| Json(record).into_response())
}

async fn create_record(
    State(backend): State<FakeBackend>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    match backend.account(&headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let mut fields = match read_body(request, &collection).await {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    if fields
        .get("name")
        .is_some_and(|name| name.as_str() == Some(""))
    {
        return error(
            StatusCode::BAD_REQUEST,
            json!({"name": ["This field may not be blank."]}),
        );
    }

    fields.insert("id".to_string(), json!(backend.next_id()));
    let record = Value::Object(fields);

    let mut state = backend.state();
    let Some(records) = state.collections.get_mut(&collection) else {
        return not_found();
    };
    records.push(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn change_record(
    backend: &FakeBackend,
    collection: &str,
    id: i64,
    headers: &HeaderMap,
    request: Request,
) -> Response {
    match backend.account(headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let fields = match read_body(request, collection).await {
        Ok(fields) => fields,
        Err(response) => return response,
    };

    let mut state = backend.state();
    let Some(record) = state
        .collections
        .get_mut(collection)
        .and_then(|records| {
            records
                .iter_mut()
                .find(|record| record.get("id") == Some(&json!(id)))
        })
        .and_then(Value::as_object_mut)
    else {
        return not_found();
    };

    record.extend(fields);

    Json(Value::Object(record.clone())).into_response()
}

async fn replace_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    change_record(&backend, &collection, id, &headers, request).await
}

async fn update_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
    request: Request,
) -> Response {
    change_record(&backend, &collection, id, &headers, request).await
}

async fn delete_record(
    State(backend): State<FakeBackend>,
    Path((collection, id)): Path<(String, i64)>,
    headers: HeaderMap,
) -> Response {
    match backend.account(&headers) {
        None => return unauthorized(),
        Some(account) if !account.is_back_office() => return forbidden(),
        Some(_) => {}
    }

    let mut state = backend.state();
    let Some(records) = state.collections.get_mut(&collection) else {
        return not_found();
    };

    let before = records.len();
    records.retain(|record| record.get("id") != Some(&json!(id)));

    if records.len() == before {
        not_found()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
