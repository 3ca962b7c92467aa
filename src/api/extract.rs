//! Request extractors that fail with [`ApiError`] instead of axum's
//! plain-text rejections.

use axum::{
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header::CONTENT_TYPE, request::Parts},
};
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{error::ApiError, state::AppState, utils};
use crate::catalog::{DEFAULT_LIMIT, ListQuery};

/// Raw `offset`, `limit` and `tag` query values, coerced by [`ListParams::to_query`].
///
/// Every occurrence of a key is kept, so repeated keys never reject the request.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListParams {
    pub offset: Vec<String>,
    pub limit: Vec<String>,
    pub tag: Vec<String>,
}

impl ListParams {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "offset" => params.offset.push(value),
                "limit" => params.limit.push(value),
                "tag" => params.tag.push(value),
                _ => {}
            }
        }
        params
    }

    /// Coerces the raw values into a [`ListQuery`].
    ///
    /// A repeated `offset` or `limit` is not a number. A non-numeric bound
    /// leaves nothing to slice, so the page is empty. A repeated `tag` is
    /// compared as its comma-joined values.
    pub fn to_query(&self) -> ListQuery {
        let tag = Some(self.tag.join(",")).filter(|tag| !tag.is_empty());

        match (numeric(&self.offset, 0), numeric(&self.limit, DEFAULT_LIMIT)) {
            (Some(offset), Some(limit)) => ListQuery { offset, limit, tag },
            _ => ListQuery {
                offset: 0,
                limit: 0,
                tag,
            },
        }
    }
}

fn numeric(values: &[String], default: usize) -> Option<usize> {
    match values {
        [] => Some(default),
        [single] => utils::coerce_index(single),
        _ => None,
    }
}

impl<S> FromRequestParts<S> for ListParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;
        Ok(Self::from_pairs(pairs))
    }
}

/// `{id}` path segment of `/products/{id}`
#[derive(Debug, Deserialize, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ProductPath {
    pub id: String,
}

/// JSON request body.
///
/// Requests without an `application/json` content type are not read and yield
/// an empty object, as does an empty JSON body.
#[derive(Debug)]
pub struct JsonBody(pub Value);

impl FromRequest<AppState> for JsonBody {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| utils::parse_content_type(value).is_ok());

        if !is_json {
            return Ok(JsonBody(Value::Object(Map::new())));
        }

        let bytes = utils::read_body(req.into_body(), state.config.server.max_body_bytes).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody(Value::Object(Map::new())));
        }

        Ok(JsonBody(serde_json::from_slice(&bytes)?))
    }
}
