//! API utility functions
//!
//! Pure, stateless helpers for request processing, kept apart from the
//! handlers so they can be unit tested.

use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::api::error::ApiError;

/// Parses and validates Content-Type header for application/json
///
/// Accepts:
/// - `application/json`
/// - `application/json; charset=utf-8`
///
/// Rejects:
/// - `application/jsonp`
/// - `application/json-patch+json`
/// - `text/json`
/// - Malformed media types
pub fn parse_content_type(content_type: &str) -> Result<mime::Mime, ApiError> {
    let media_type: mime::Mime = content_type.parse().map_err(|_| {
        ApiError::InvalidBody(format!("invalid Content-Type: {}", content_type))
    })?;

    if media_type.type_() != mime::APPLICATION || media_type.subtype() != mime::JSON {
        return Err(ApiError::InvalidBody(format!(
            "Content-Type must be application/json, got: {}/{}",
            media_type.type_(),
            media_type.subtype()
        )));
    }

    Ok(media_type)
}

/// Reads a request body, failing once it grows past `max_size` bytes
pub async fn read_body(body: axum::body::Body, max_size: usize) -> Result<Vec<u8>, ApiError> {
    let collected = Limited::new(body, max_size).collect().await.map_err(|err| {
        if err.downcast_ref::<LengthLimitError>().is_some() {
            ApiError::PayloadTooLarge(max_size)
        } else {
            ApiError::Internal(format!("failed to read request body: {err}"))
        }
    })?;

    Ok(collected.to_bytes().to_vec())
}

/// Numeric coercion for a single `offset`/`limit` query value.
///
/// Blank strings count as zero, fractions are truncated and negatives clamp
/// to zero. `None` means the value is not a number at all; callers treat
/// that as an unsatisfiable bound.
pub fn coerce_index(raw: &str) -> Option<usize> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0);
    }

    match raw.parse::<f64>() {
        Ok(value) if value.is_nan() => None,
        Ok(value) if value > 0.0 => Some(value.trunc() as usize),
        Ok(_) => Some(0),
        Err(_) => None,
    }
}
