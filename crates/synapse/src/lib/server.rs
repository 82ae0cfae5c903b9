//! # HTTP surface
//!
//! JSON endpoints for the summarize / translate pipeline plus the server
//! rendered page that drives it.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::{
    article::ArticleLoader,
    catalog::ModelCatalog,
    error::{Error, ErrorCategory},
    types::{ErrorResponse, SummarizeRequest, SummaryResponse, TranslateRequest, TranslationResponse},
    ui::{
        page::{render_page, PageForm},
        FlowState, FormFields,
    },
    yt::TranscriptFetcher,
    ModelInvoker, Synapse,
};

type SharedSynapse<T, A, M> = Arc<Synapse<T, A, M>>;

/// [`Error`] as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        ApiError(value)
    }
}

pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Fetch => StatusCode::BAD_REQUEST,
        ErrorCategory::Configuration | ErrorCategory::Model | ErrorCategory::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(self.0.category());
        let body = ErrorResponse {
            error: self.0.public_message(),
            details: self.0.details(),
        };

        (status, Json(body)).into_response()
    }
}

pub fn router<T, A, M>(synapse: SharedSynapse<T, A, M>) -> Router
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(index::<T, A, M>))
        .route("/health", get(|| async { "OK" }))
        .route("/models", get(models::<T, A, M>))
        .route("/summarize", post(summarize::<T, A, M>))
        .route("/translate", post(translate::<T, A, M>))
        .route("/ui/summarize", post(ui_summarize::<T, A, M>))
        .route("/ui/translate", post(ui_translate::<T, A, M>))
        .layer(CorsLayer::permissive())
        .with_state(synapse)
}

async fn models<T, A, M>(State(synapse): State<SharedSynapse<T, A, M>>) -> Json<ModelCatalog>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    Json(synapse.catalog().clone())
}

async fn summarize<T, A, M>(
    State(synapse): State<SharedSynapse<T, A, M>>,
    Json(req): Json<SummarizeRequest>,
) -> Result<Json<SummaryResponse>, ApiError>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    let resp = synapse.summarize(&req).await?;
    Ok(Json(resp))
}

async fn translate<T, A, M>(
    State(synapse): State<SharedSynapse<T, A, M>>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslationResponse>, ApiError>
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    let resp = synapse.translate(&req).await?;
    Ok(Json(resp))
}

fn page_response(state: &FlowState, catalog: &ModelCatalog, details: Option<&str>) -> Response {
    match render_page(state, catalog, details) {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to render page");
            ApiError(e).into_response()
        }
    }
}

async fn index<T, A, M>(State(synapse): State<SharedSynapse<T, A, M>>) -> Response
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    let catalog = synapse.catalog();
    let state = FlowState::new(FormFields::new(catalog.default_model().identifier));
    page_response(&state, catalog, None)
}

async fn ui_summarize<T, A, M>(
    State(synapse): State<SharedSynapse<T, A, M>>,
    Form(form): Form<PageForm>,
) -> Response
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    let catalog = synapse.catalog();
    let mut state = form.into_state(catalog);

    let req = match state.begin_summarize() {
        Ok(req) => req,
        Err(e) => return (StatusCode::CONFLICT, e.to_string()).into_response(),
    };

    let (outcome, details) = match synapse.summarize(&req).await {
        Ok(resp) => (Ok(resp.summary), None),
        Err(e) => (
            Err("Failed to summarize content. Please try again.".to_string()),
            Some(e.to_string()),
        ),
    };

    if let Err(e) = state.finish_summarize(outcome) {
        return (StatusCode::CONFLICT, e.to_string()).into_response();
    }
    page_response(&state, catalog, details.as_deref())
}

async fn ui_translate<T, A, M>(
    State(synapse): State<SharedSynapse<T, A, M>>,
    Form(form): Form<PageForm>,
) -> Response
where
    T: TranscriptFetcher + Send + Sync + 'static,
    A: ArticleLoader + Send + Sync + 'static,
    M: ModelInvoker + Send + Sync + 'static,
{
    let catalog = synapse.catalog();
    let mut state = form.into_state(catalog);

    let req = match state.begin_translate() {
        Ok(req) => req,
        Err(e) => {
            state.error = Some(e.to_string());
            return (StatusCode::BAD_REQUEST, page_response(&state, catalog, None)).into_response();
        }
    };

    let (outcome, details) = match synapse.translate(&req).await {
        Ok(resp) => (Ok(resp.translated_text), None),
        Err(e) => (
            Err("Failed to translate content. Please try again.".to_string()),
            Some(e.to_string()),
        ),
    };

    if let Err(e) = state.finish_translate(outcome) {
        return (StatusCode::CONFLICT, e.to_string()).into_response();
    }
    page_response(&state, catalog, details.as_deref())
}
