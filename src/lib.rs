use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
    routing::get,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod credentials;
pub mod error;
pub mod handlers;
pub mod models;
pub mod policies;
pub mod repository;
pub mod storage;

// Route tables segregated by access level (Public, Authenticated).
pub mod routes;
use routes::{authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use credentials::{CredentialState, LocalCredentials};
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};
pub use storage::{MockStorageService, S3StorageClient, StorageState};

/// ApiDoc
///
/// OpenAPI document for every `/api` handler, served through Swagger UI at `/swagger-ui`
/// with the raw JSON at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::register, handlers::auth::login, handlers::auth::get_profile,
        handlers::auth::list_users, handlers::category::list_categories,
        handlers::course::create_course, handlers::course::get_instructor_courses,
        handlers::course::find_courses, handlers::course::find_course,
        handlers::course::update_course, handlers::course::delete_course,
        handlers::upload::get_presigned_url
    ),
    components(
        schemas(
            models::Role, models::Category, models::UploadFile, models::User,
            models::UserProfile, models::Course, models::PublishedStatus,
            models::RegisterRequest, models::LoginRequest, models::CourseInput,
            models::CourseRequest, models::PresignedUrlRequest, models::AuthResponse,
            models::LoginResponse, models::CourseCreatedResponse,
            models::InstructorCoursesResponse, models::CourseData, models::CourseListData,
            models::CategoryListData, models::PresignedUrlResponse,
            error::ErrorResponse, error::ErrorDetail,
        )
    ),
    tags(
        (name = "eduhub", description = "EduHub course platform API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single shared container for every service a handler can reach. Cloning is cheap:
/// each service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Entity store (Postgres, or in-memory when no database is configured).
    pub repo: RepositoryState,
    /// Password hashing and token issuance.
    pub credentials: CredentialState,
    /// S3/MinIO presigned uploads.
    pub storage: StorageState,
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for CredentialState {
    fn from_ref(app_state: &AppState) -> CredentialState {
        app_state.credentials.clone()
    }
}

impl FromRef<AppState> for StorageState {
    fn from_ref(app_state: &AppState) -> StorageState {
        app_state.storage.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the full application: the `/api` route tables (with the authentication policy
/// on the protected half), health check, Swagger UI, and the request-id/trace/CORS stack.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let api = Router::new()
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                policies::is_authenticated,
            )),
        );

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Opens the per-request span, tagged with the `x-request-id` set by the layer above so
/// every log line of one request can be correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
