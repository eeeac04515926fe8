use std::sync::Arc;

use axum::http::HeaderMap;
use secrecy::ExposeSecret;
use thiserror::Error;

use super::basic::Credentials;
use super::password::{PasswordError, PasswordHasher};
use crate::database::models::UserProfile;
use crate::database::{DatabaseError, UserStore};

/// Why a request failed to authenticate. All variants are answered with
/// the same 401 body; the variant is only for server-side logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    #[error("missing or malformed Authorization header")]
    MissingCredentials,
    #[error("no user with the supplied email address")]
    UnknownIdentity,
    #[error("password did not match")]
    BadPassword,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Failure(#[from] AuthFailure),

    #[error("credential lookup failed: {0}")]
    Store(#[from] DatabaseError),

    #[error("password verification failed: {0}")]
    Hasher(#[from] PasswordError),

    #[error("password verification task failed: {0}")]
    Task(String),
}

/// The authenticated user for the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedContext {
    pub identity: UserProfile,
}

/// Resolve the Basic credentials in `headers` to a stored user.
pub async fn authenticate<S>(
    store: &S,
    hasher: &Arc<PasswordHasher>,
    headers: &HeaderMap,
) -> Result<AuthenticatedContext, AuthError>
where
    S: UserStore + ?Sized,
{
    let Credentials { name, pass } =
        Credentials::from_headers(headers).ok_or(AuthFailure::MissingCredentials)?;

    let user = store.find_user_by_email(&name).await?;

    let Some(user) = user else {
        // Spend the same hashing cost as a real check
        run_blocking(hasher, move |h| {
            h.verify_decoy(pass.expose_secret());
            Ok(())
        })
        .await?;
        return Err(AuthFailure::UnknownIdentity.into());
    };

    let digest = user.password_hash.clone();
    let verified = run_blocking(hasher, move |h| h.verify(pass.expose_secret(), &digest)).await?;

    if !verified {
        return Err(AuthFailure::BadPassword.into());
    }

    Ok(AuthenticatedContext {
        identity: UserProfile::from(user),
    })
}

/// Argon2 is CPU-bound; keep it off the async workers.
async fn run_blocking<T, F>(hasher: &Arc<PasswordHasher>, f: F) -> Result<T, AuthError>
where
    T: Send + 'static,
    F: FnOnce(&PasswordHasher) -> Result<T, PasswordError> + Send + 'static,
{
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || f(&hasher))
        .await
        .map_err(|e| AuthError::Task(e.to_string()))?
        .map_err(AuthError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::test_hasher;
    use crate::database::models::NewUser;
    use crate::database::MemoryStore;
    use async_trait::async_trait;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    fn basic(raw: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Basic {}", STANDARD.encode(raw))).unwrap(),
        );
        headers
    }

    async fn fixture() -> (MemoryStore, Arc<PasswordHasher>, i64) {
        let hasher = Arc::new(test_hasher());
        let store = MemoryStore::new();
        let user = store
            .create_user(NewUser {
                first_name: "Joe".into(),
                last_name: "Smith".into(),
                email_address: "a@x.com".into(),
                password_hash: hasher.hash("rightpass").unwrap(),
            })
            .await
            .unwrap();
        (store, hasher, user.id)
    }

    fn failure(result: Result<AuthenticatedContext, AuthError>) -> AuthFailure {
        match result {
            Err(AuthError::Failure(f)) => f,
            other => panic!("expected an auth failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn authenticates_valid_credentials() {
        let (store, hasher, id) = fixture().await;
        let ctx = authenticate(&store, &hasher, &basic("a@x.com:rightpass"))
            .await
            .unwrap();
        assert_eq!(ctx.identity.id, id);
        assert_eq!(ctx.identity.email_address, "a@x.com");
    }

    #[tokio::test]
    async fn classifies_failures() {
        let (store, hasher, _) = fixture().await;

        let missing = authenticate(&store, &hasher, &HeaderMap::new()).await;
        assert_eq!(failure(missing), AuthFailure::MissingCredentials);

        let malformed = authenticate(&store, &hasher, &basic("no-colon")).await;
        assert_eq!(failure(malformed), AuthFailure::MissingCredentials);

        let unknown = authenticate(&store, &hasher, &basic("b@x.com:rightpass")).await;
        assert_eq!(failure(unknown), AuthFailure::UnknownIdentity);

        let wrong = authenticate(&store, &hasher, &basic("a@x.com:wrongpass")).await;
        assert_eq!(failure(wrong), AuthFailure::BadPassword);
    }

    #[tokio::test]
    async fn email_match_is_case_sensitive() {
        let (store, hasher, _) = fixture().await;
        let result = authenticate(&store, &hasher, &basic("A@X.COM:rightpass")).await;
        assert_eq!(failure(result), AuthFailure::UnknownIdentity);
    }

    #[tokio::test]
    async fn empty_and_prefix_passwords_fail() {
        let (store, hasher, _) = fixture().await;
        for attempt in ["a@x.com:", "a@x.com:right", "a@x.com:rightpass2"] {
            let result = authenticate(&store, &hasher, &basic(attempt)).await;
            assert_eq!(failure(result), AuthFailure::BadPassword, "{}", attempt);
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn find_user_by_email(&self, _: &str) -> Result<Option<crate::database::models::User>, DatabaseError> {
            Err(DatabaseError::ConnectionError("connection refused".into()))
        }

        async fn create_user(&self, _: NewUser) -> Result<crate::database::models::User, DatabaseError> {
            Err(DatabaseError::ConnectionError("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn store_errors_are_not_auth_failures() {
        let hasher = Arc::new(test_hasher());
        let result = authenticate(&BrokenStore, &hasher, &basic("a@x.com:pw")).await;
        assert!(matches!(result, Err(AuthError::Store(_))));
    }

    #[tokio::test]
    async fn corrupt_digest_is_not_an_auth_failure() {
        let hasher = Arc::new(test_hasher());
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                first_name: "Joe".into(),
                last_name: "Smith".into(),
                email_address: "a@x.com".into(),
                password_hash: "not-a-phc-string".into(),
            })
            .await
            .unwrap();

        let result = authenticate(&store, &hasher, &basic("a@x.com:pw")).await;
        assert!(matches!(result, Err(AuthError::Hasher(PasswordError::MalformedDigest(_)))));
    }
}
