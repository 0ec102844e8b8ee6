use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post, put},
    Extension, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{auth, blogs, comments, health, users};
use crate::middleware::jwt_auth_middleware;
use crate::server::Service;
use crate::state::AppState;

/// Build the complete router for `service`, global middleware included.
pub fn app(service: Service, state: AppState) -> Router {
    let routes = match service {
        Service::User => user_routes(&state),
        Service::Blog => blog_routes(&state),
        Service::Comment => comment_routes(&state),
    };

    let mut router = routes
        .route("/health", get(health::health))
        .layer(Extension(service))
        .with_state(state.clone());

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security.cors_origins));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn user_routes(state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route(
            "/users/:id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        // Token acquisition
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .merge(protected)
}

fn blog_routes(state: &AppState) -> Router<AppState> {
    let require_auth = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);

    let writes = put(blogs::update_blog).delete(blogs::delete_blog);
    let writes = if state.config.security.enforce_ownership {
        writes.route_layer(require_auth.clone())
    } else {
        writes
    };

    Router::new()
        .route(
            "/blogs",
            get(blogs::list_blogs).merge(post(blogs::create_blog).route_layer(require_auth)),
        )
        .route("/blogs/:id", get(blogs::get_blog).merge(writes))
}

fn comment_routes(state: &AppState) -> Router<AppState> {
    let require_auth = middleware::from_fn_with_state(state.clone(), jwt_auth_middleware);

    Router::new().route(
        "/comments",
        get(comments::list_comments)
            .merge(post(comments::create_comment).route_layer(require_auth)),
    )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
