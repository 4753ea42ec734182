use axum::Json;
use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::HeaderMap;
use axum::http::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::error::RelayError;
use crate::types::{
    AnalyzeRequest, AnalyzeResponse, CaptionResponse, ImageUpload, StoryRequest, StoryResponse,
};

const IMAGE_FIELD: &str = "image";

fn has_content_type(headers: &HeaderMap, expected: &str) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(expected))
}

fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, RelayError> {
    serde_json::from_slice(body)
        .map_err(|e| RelayError::InvalidInput(format!("Invalid JSON body: {e}")))
}

pub(super) async fn hello() -> Json<Value> {
    Json(json!({ "message": "Hello from the hfrelay API!" }))
}

pub(super) async fn echo(body: Bytes) -> Result<Json<Value>, ApiError> {
    let data: Value = parse_json(&body)?;
    Ok(Json(json!({ "receivedData": data })))
}

pub(super) async fn analyze(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    if !has_content_type(&headers, "application/json") {
        return Err(RelayError::InvalidInput(
            "Invalid content type. Use application/json for text analysis.".into(),
        )
        .into());
    }
    let req: AnalyzeRequest = parse_json(&body)?;
    Ok(Json(state.service.analyze(req).await?))
}

pub(super) async fn storyteller(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StoryResponse>, ApiError> {
    if !has_content_type(&headers, "application/json") {
        return Err(
            RelayError::InvalidInput("Invalid content type. Use application/json.".into()).into(),
        );
    }
    let req: StoryRequest = parse_json(&body)?;
    Ok(Json(state.service.story(req).await?))
}

pub(super) async fn caption(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        tracing::debug!(%rejection, "caption request is not multipart");
        ApiError::caption(RelayError::InvalidInput(
            "Invalid content type. Expected multipart/form-data".into(),
        ))
    })?;

    let upload = read_image_field(&mut multipart)
        .await
        .map_err(ApiError::caption)?
        .ok_or_else(|| ApiError::caption(RelayError::InvalidInput("Missing image file".into())))?;

    state
        .service
        .caption(upload)
        .await
        .map(Json)
        .map_err(ApiError::caption)
}

async fn read_image_field(multipart: &mut Multipart) -> Result<Option<ImageUpload>, RelayError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::InvalidInput(e.body_text()))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RelayError::InvalidInput(e.body_text()))?;
        return Ok(Some(ImageUpload {
            bytes,
            content_type,
            file_name,
        }));
    }
    Ok(None)
}
