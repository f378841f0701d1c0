use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, auth, projects, user};
use crate::middleware::{jwt_auth_middleware, not_found, redact_internal_errors};
use crate::state::AppState;

/// Full application router with all layers applied
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/projects", project_routes(&state))
        .nest("/user", user_routes(&state))
        .nest("/auth", auth_routes(&state));

    let mut router = Router::new()
        .route("/", get(handlers::service::root))
        .route("/health", get(handlers::service::health))
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors_layer(&state.config.security.cors_origins))
                .layer(from_fn_with_state(state.clone(), redact_internal_errors))
                .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes)),
        );

    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn project_routes(state: &AppState) -> Router<AppState> {
    let public: Router<AppState> = Router::new()
        .route("/", get(projects::projects_list))
        .route("/:id", get(projects::project_get));

    let protected: Router<AppState> = Router::new()
        .route("/", post(projects::projects_post))
        .route("/upload", post(projects::project_upload))
        .route("/:id", put(projects::project_put).delete(projects::project_delete))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    public.merge(protected)
}

fn user_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/loggedInUser", get(user::user_logged_in))
        .route("/edit", put(user::user_edit))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    let protected: Router<AppState> = Router::new()
        .route("/me", get(auth::auth_me))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/signup", post(auth::auth_signup))
        .route("/login", post(auth::auth_login))
        .merge(protected)
}

/// Any origin when none are configured, otherwise only the listed ones
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
