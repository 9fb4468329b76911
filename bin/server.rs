// Skill Tagger - Web Server
// REST API with Axum over a shared, read-only taxonomy registry

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use skill_tagger::{
    Category, ClassificationReport, Classifier, Group, Settings, TaxonomyError, TaxonomyRegistry,
};

/// Shared application state
///
/// The registry is immutable after startup, so an Arc is enough: no Mutex.
#[derive(Clone)]
struct AppState {
    registry: Arc<TaxonomyRegistry>,
    classifier: Classifier,
    default_threshold: f64,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

/// Library errors mapped onto HTTP status codes
struct ApiError(TaxonomyError);

impl From<TaxonomyError> for ApiError {
    fn from(err: TaxonomyError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TaxonomyError::NotFound(_) => StatusCode::NOT_FOUND,
            TaxonomyError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            TaxonomyError::MalformedTaxonomy(msg) => {
                error!("Taxonomy error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(ApiResponse::<()>::err(self.0.to_string()))).into_response()
    }
}

/// Taxonomy response: groups with their categories, in declaration order
#[derive(Serialize)]
struct TaxonomyResponse {
    fingerprint: String,
    groups: Vec<GroupResponse>,
}

#[derive(Serialize)]
struct GroupResponse {
    id: String,
    name: String,
    categories: Vec<CategoryResponse>,
}

/// Category response (simplified for API)
#[derive(Serialize)]
struct CategoryResponse {
    id: String,
    group: String,
    label: String,
    description: String,
    triggers: Vec<String>,
}

impl From<&Category> for CategoryResponse {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            group: category.group.clone(),
            label: category.label.clone(),
            description: category.description.clone(),
            triggers: category.triggers.iter().cloned().collect(),
        }
    }
}

impl GroupResponse {
    fn build(group: &Group, registry: &TaxonomyRegistry) -> Self {
        Self {
            id: group.id.clone(),
            name: group.name.clone(),
            categories: registry
                .categories_in_group(&group.id)
                .into_iter()
                .map(CategoryResponse::from)
                .collect(),
        }
    }
}

/// POST /api/classify body
#[derive(Deserialize)]
struct ClassifyRequest {
    text: String,
    threshold: Option<f64>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/taxonomy - Full catalog
async fn get_taxonomy(State(state): State<AppState>) -> impl IntoResponse {
    let registry = &state.registry;
    let response = TaxonomyResponse {
        fingerprint: registry.fingerprint(),
        groups: registry
            .groups()
            .iter()
            .map(|group| GroupResponse::build(group, registry))
            .collect(),
    };

    Json(ApiResponse::ok(response))
}

/// GET /api/categories/:id - One category
async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let category = state.registry.get_category(&id)?;
    Ok(Json(ApiResponse::ok(CategoryResponse::from(category))))
}

/// POST /api/classify - Classify a document
async fn classify_document(
    State(state): State<AppState>,
    Json(request): Json<ClassifyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let threshold = request.threshold.unwrap_or(state.default_threshold);
    let matches = state
        .classifier
        .classify(&request.text, &state.registry, threshold)?;

    Ok(Json(ApiResponse::ok(ClassificationReport::new(
        &state.registry,
        threshold,
        matches,
    ))))
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/taxonomy", get(get_taxonomy))
        .route("/categories/:id", get(get_category))
        .route("/classify", post(classify_document))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.rust_log)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skill Tagger API v{}", skill_tagger::VERSION);

    let registry = settings.load_registry()?;
    info!(
        categories = registry.count(),
        fingerprint = %registry.fingerprint(),
        "Taxonomy loaded"
    );

    let state = AppState {
        registry: Arc::new(registry),
        classifier: settings.classifier()?,
        default_threshold: settings.threshold,
    };

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    info!("Server running on http://{}", settings.bind_addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
