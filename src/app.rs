use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::PasswordHasher;
use crate::config::AppConfig;
use crate::database::Store;
use crate::handlers::{courses, root, users};
use crate::middleware::basic_auth_middleware;

/// Shared, explicitly passed dependencies for every request
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub hasher: Arc<PasswordHasher>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher) -> Self {
        Self {
            store,
            hasher: Arc::new(hasher),
        }
    }
}

/// Router with CORS, tracing and body limits taken from `config`
pub fn app_with_config(state: AppState, config: &AppConfig) -> Router {
    let mut router = app(state).layer(DefaultBodyLimit::max(config.api.max_request_size_bytes));

    if config.security.enable_cors {
        router = router.layer(cors_layer(&config.security.cors_origins));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

/// Every route. Writes go through the Basic auth gate; reads of courses and
/// account registration are public.
pub fn app(state: AppState) -> Router {
    let gate = from_fn_with_state(state.clone(), basic_auth_middleware);

    let api = Router::new()
        .route(
            "/users",
            get(users::current)
                .route_layer(gate.clone())
                .merge(post(users::create)),
        )
        .route(
            "/courses",
            get(courses::list).merge(post(courses::create).route_layer(gate.clone())),
        )
        .route(
            "/courses/:id",
            get(courses::get).merge(
                put(courses::update)
                    .delete(courses::delete)
                    .route_layer(gate),
            ),
        );

    Router::new()
        .route("/", get(root::welcome))
        .route("/health", get(root::health))
        .nest("/api", api)
        .fallback(root::not_found)
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", o);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ])
        .expose_headers([axum::http::header::LOCATION])
}
