use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::ScreeningPipeline;
use crate::article::Article;

/// Router builder exposing the grader over HTTP.
pub fn screening_router(pipeline: Arc<ScreeningPipeline>) -> Router {
    Router::new()
        .route("/api/v1/articles/evaluate", post(evaluate_handler))
        .route("/api/v1/articles/screen", post(screen_handler))
        .with_state(pipeline)
}

#[derive(Debug, Deserialize)]
pub(crate) struct EvaluateRequest {
    pub(crate) article: Article,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScreenRequest {
    pub(crate) articles: Vec<Article>,
    #[serde(default)]
    pub(crate) threshold: Option<u16>,
    #[serde(default)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) async fn evaluate_handler(
    State(pipeline): State<Arc<ScreeningPipeline>>,
    Json(request): Json<EvaluateRequest>,
) -> Response {
    let result = pipeline.evaluate(&request.article, request.today);
    (StatusCode::OK, Json(result)).into_response()
}

pub(crate) async fn screen_handler(
    State(pipeline): State<Arc<ScreeningPipeline>>,
    Json(request): Json<ScreenRequest>,
) -> Response {
    let ScreenRequest {
        articles,
        threshold,
        today,
    } = request;

    let report = match threshold {
        Some(threshold) if threshold > 100 => {
            let payload = json!({
                "error": format!("threshold {threshold} exceeds the maximum score of 100"),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
        Some(threshold) => pipeline.with_threshold(threshold).screen(articles, today),
        None => pipeline.screen(articles, today),
    };

    (StatusCode::OK, Json(report)).into_response()
}
