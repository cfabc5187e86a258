//! Shared fixtures for the HTTP integration tests.
//!
//! Every test gets its own SQLite file in a temporary directory and an
//! in-memory object store, so tests never observe each other's rows.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use assignment_portal::config::{DatabaseConfig, IdentityConfig};
use assignment_portal::identity::{IdentityVerifier, JwtIdentityVerifier};
use assignment_portal::models::users::entities::{User, UserRole};
use assignment_portal::models::users::requests::CreateUserRequest;
use assignment_portal::object_store::ObjectStore;
use assignment_portal::object_store::backends::memory::MemoryObjectStore;
use assignment_portal::routes;
use assignment_portal::storage::Storage;
use assignment_portal::storage::sea_orm_storage::SeaOrmStorage;
use assignment_portal::utils::password::hash_password;
use assignment_portal::utils::{json_error_handler, query_error_handler};
use serde_json::Value;
use tempfile::TempDir;

pub const IDENTITY_CLIENT_ID: &str = "portal-integration";
pub const IDENTITY_SECRET: &str = "integration-identity-secret";
pub const BOUNDARY: &str = "----portal-test-boundary";

/// Zip local file header followed by filler bytes.
pub const ZIP_BYTES: &[u8] = b"PK\x03\x04\x14\x00\x00\x00\x08\x00homework";

static NEXT_CLIENT: AtomicU32 = AtomicU32::new(1);

pub struct TestContext {
    // Keeps the SQLite file alive for the duration of the test.
    _dir: TempDir,
    pub storage: Arc<dyn Storage>,
    pub objects: Arc<MemoryObjectStore>,
    pub identity: Arc<dyn IdentityVerifier>,
    /// Unique client address so the shared auth rate limiter never trips.
    pub client_ip: String,
}

impl TestContext {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let db_path = dir.path().join("portal-test.db");
        let storage = SeaOrmStorage::connect(&DatabaseConfig {
            url: db_path.to_string_lossy().into_owned(),
            pool_size: 5,
            timeout: 10,
        })
        .await
        .expect("sqlite storage");

        let identity = JwtIdentityVerifier::from_config(&IdentityConfig {
            client_id: IDENTITY_CLIENT_ID.to_string(),
            issuers: Vec::new(),
            verification_key: IDENTITY_SECRET.to_string(),
            algorithm: "HS256".to_string(),
            require_verified_email: true,
        });

        let n = NEXT_CLIENT.fetch_add(1, Ordering::Relaxed);
        Self {
            _dir: dir,
            storage: Arc::new(storage),
            objects: Arc::new(MemoryObjectStore::new("http://portal.test")),
            identity: Arc::new(identity),
            client_ip: format!("10.{}.{}.{}", (n >> 16) & 0xff, (n >> 8) & 0xff, n & 0xff),
        }
    }

    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        let object_store: Arc<dyn ObjectStore> = self.objects.clone();
        self.app_with(self.storage.clone(), object_store).await
    }

    /// Same route table, with the storage and object store swapped for the given ones.
    pub async fn app_with(
        &self,
        storage: Arc<dyn Storage>,
        object_store: Arc<dyn ObjectStore>,
    ) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(object_store))
                .app_data(web::Data::new(self.identity.clone()))
                .configure(routes::configure_routes)
                .default_service(web::to(routes::not_found)),
        )
        .await
    }

    pub fn get(&self, uri: &str) -> TestRequest {
        TestRequest::get()
            .uri(uri)
            .insert_header(("X-Forwarded-For", self.client_ip.as_str()))
    }

    pub fn post(&self, uri: &str) -> TestRequest {
        TestRequest::post()
            .uri(uri)
            .insert_header(("X-Forwarded-For", self.client_ip.as_str()))
    }

    /// Inserts a user directly through storage.
    pub async fn create_user(&self, email: &str, password: &str, role: UserRole) -> User {
        self.storage
            .create_user(CreateUserRequest {
                email: email.to_string(),
                password_hash: Some(hash_password(password).expect("hash")),
                full_name: "Seeded User".to_string(),
                role,
                external_id: None,
                matric_number: None,
            })
            .await
            .expect("create user")
    }

    /// Inserts a password-less user already bound to an external identity.
    pub async fn create_external_user(&self, email: &str, external_id: &str) -> User {
        self.storage
            .create_user(CreateUserRequest {
                email: email.to_string(),
                password_hash: None,
                full_name: "Federated User".to_string(),
                role: UserRole::User,
                external_id: Some(external_id.to_string()),
                matric_number: None,
            })
            .await
            .expect("create external user")
    }

    pub fn token_for(&self, user: &User) -> String {
        user.generate_access_token().expect("access token")
    }
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Builds a multipart/form-data body with text fields and an optional file part.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    if let Some((file_name, content_type, data)) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> (header::HeaderName, String) {
    (
        header::CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    )
}

/// Standard upload form for a student.
pub fn assignment_fields<'a>(student_name: &'a str, matric: &'a str) -> Vec<(&'a str, &'a str)> {
    vec![
        ("studentName", student_name),
        ("matricNumber", matric),
        ("level", "300"),
        ("courseCode", "CSC301"),
    ]
}

pub async fn read_json(response: ServiceResponse<BoxBody>) -> Value {
    test::read_body_json(response).await
}
