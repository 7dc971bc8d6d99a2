//! Shared wiremock setup for the business integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use corral_business::screens::Services;
use corral_business::{
    ApiClient, BusinessConfig, MemoryTokenStore, Notification, NotificationReceiver, Notifier,
    Session, TokenStore as _,
};
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

/// A mock backend plus a client wired to it over an in-memory session.
pub struct TestContext {
    pub mock_server: MockServer,
    pub store: Arc<MemoryTokenStore>,
    pub services: Services,
    pub receiver: NotificationReceiver,
}

impl TestContext {
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let config = BusinessConfig::new(format!("{}/api", mock_server.uri()));
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(store.clone(), &config);
        let api = ApiClient::new(config, session).unwrap();
        let (notifier, receiver) = Notifier::channel();

        Self {
            mock_server,
            store,
            services: Services::new(api, notifier),
            receiver,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.services.api
    }

    /// Stores `token` as the access token, as a previous login would have.
    pub fn set_authenticated(&self, token: &str) {
        self.store.set("access_token", token).unwrap();
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.receiver.drain()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notifications().into_iter().map(|n| n.message).collect()
    }

    /// Mounts `GET route` answering `body` with status 200, only for `Bearer test_token`.
    pub async fn mock_get(&self, route: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(route))
            .and(header("Authorization", "Bearer test_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_status(&self, verb: &str, route: &str, status: u16, body: Value) {
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.mock_server)
            .await;
    }

    pub async fn mock_categories(&self) {
        self.mock_get("/api/costs/categories/", ok(categories_json()))
            .await;
    }
}

/// `{"success": true, "data": data}`
pub fn ok(data: Value) -> Value {
    json!({"success": true, "message": "", "data": data})
}

pub fn categories_json() -> Value {
    json!([
        {"id": 1, "code": "1", "name": "Alimentación", "description": "",
         "parent": null, "level": 1, "is_movement": false},
        {"id": 2, "code": "1.1", "name": "Concentrado", "description": "Bultos",
         "parent": 1, "level": 2, "is_movement": true},
        {"id": 3, "code": "2", "name": "Sanidad", "description": null,
         "parent": null, "level": 1, "is_movement": true}
    ])
}

pub fn cost_json(id: u64, day: u32, amount: &str) -> Value {
    json!({
        "id": id, "category": 2, "category_name": "Concentrado",
        "date_incurred": format!("2025-03-{day:02}"), "description": format!("Gasto {id}"),
        "amount": amount, "notes": null,
        "created_at": "2025-03-01T10:00:00Z", "updated_at": "2025-03-01T10:00:00Z"
    })
}

pub fn auth_json() -> Value {
    json!({
        "user": {"id": 1, "username": "mvelez", "email": "m@finca.co",
                 "first_name": "María", "last_name": "Vélez"},
        "tokens": {"access": "test_token", "refresh": "test_refresh"}
    })
}
