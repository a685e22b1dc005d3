use crate::error::{AppError, Result};
use crate::model::{InfoQuery, ShortenRequest, ShortlinkResponse};
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use portal_core::base62::MAX_LEN;
use portal_core::{LinkDetail, ShortenerError, StoreError};
use tracing::{debug, warn};

pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ShortlinkResponse>)> {
    let Json(request) = payload.map_err(|e| {
        debug!(error = %e, "Rejected shorten request body");
        AppError::Validation("parse parameters failed".to_string())
    })?;

    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url must not be empty".to_string()));
    }
    // it must fit in a Location header to be redirectable
    if HeaderValue::try_from(request.url.as_str()).is_err() {
        return Err(AppError::Validation(
            "url contains characters not allowed in a redirect".to_string(),
        ));
    }
    let ttl_minutes = u64::try_from(request.expiration_in_minutes).map_err(|_| {
        AppError::Validation(format!(
            "expiration_in_minutes must be non-negative, got {}",
            request.expiration_in_minutes
        ))
    })?;

    let code = state.shortener().shorten(&request.url, ttl_minutes).await?;
    Ok((
        StatusCode::CREATED,
        Json(ShortlinkResponse {
            shortlink: code.into_string(),
        }),
    ))
}

pub async fn info_handler(
    State(state): State<AppState>,
    query: std::result::Result<Query<InfoQuery>, QueryRejection>,
) -> Result<Json<LinkDetail>> {
    let Query(query) =
        query.map_err(|_| AppError::Validation("missing query parameter 'url'".to_string()))?;
    let detail = state.shortener().info(&query.url).await?;
    Ok(Json(detail))
}

pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(shortlink): Path<String>,
) -> Result<Response> {
    if !is_shortlink(&shortlink) {
        return Err(ShortenerError::NotFound("unknown short-link".to_string()).into());
    }
    let url = state.shortener().unshorten(&shortlink).await?;
    let location = HeaderValue::try_from(url).map_err(|e| {
        warn!(code = %shortlink, error = %e, "Stored url is not a valid Location header");
        AppError::Shortener(
            StoreError::InvalidData(format!("url for '{shortlink}' is not redirectable")).into(),
        )
    })?;
    Ok((StatusCode::TEMPORARY_REDIRECT, [(header::LOCATION, location)]).into_response())
}

/// `[a-zA-Z0-9]{1,11}`
fn is_shortlink(candidate: &str) -> bool {
    (1..=MAX_LEN).contains(&candidate.len()) && candidate.bytes().all(|b| b.is_ascii_alphanumeric())
}
