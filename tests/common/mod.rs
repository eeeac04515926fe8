#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use courses_api::app::{app, AppState};
use courses_api::auth::{Argon2Params, PasswordHasher};
use courses_api::database::models::{CourseFields, NewUser};
use courses_api::database::{CourseStore, MemoryStore, UserStore};

/// A server bound to an ephemeral port, backed by an in-memory store the
/// test can seed directly.
pub struct TestApp {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub hasher: Arc<PasswordHasher>,
    pub client: reqwest::Client,
}

// Cheap parameters keep the suite fast; production cost comes from config.
fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("valid argon2 params")
}

pub async fn spawn_app() -> Result<TestApp> {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store.clone(), test_hasher());
    let hasher = Arc::clone(&state.hasher);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("failed to bind test listener")?;
    let addr = listener.local_addr()?;

    let router = app(state);
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });

    Ok(TestApp {
        base_url: format!("http://{}", addr),
        store,
        hasher,
        client: reqwest::Client::new(),
    })
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Insert a user with a properly hashed password and return its id
    pub async fn seed_user(&self, email: &str, password: &str) -> Result<i64> {
        let user = self
            .store
            .create_user(NewUser {
                first_name: "Test".into(),
                last_name: "User".into(),
                email_address: email.into(),
                password_hash: self.hasher.hash(password)?,
            })
            .await?;
        Ok(user.id)
    }

    /// Insert a course owned by `owner_id` and return its id
    pub async fn seed_course(&self, owner_id: i64, title: &str) -> Result<i64> {
        let course = self
            .store
            .create_course(
                owner_id,
                CourseFields {
                    title: title.into(),
                    description: format!("About {}", title),
                    estimated_time: None,
                    materials_needed: None,
                },
            )
            .await?;
        Ok(course.id)
    }
}
