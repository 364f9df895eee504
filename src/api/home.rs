//! Cache-aside greeting endpoints

use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::cache::{CacheExt, cache_key};

/// Response header carrying cache provenance. The `http` crate stores
/// header names lowercase; the wire is case-insensitive.
pub const CACHE_STATUS_HEADER: &str = "x-cache";

/// Key namespace for the home endpoint; keys look like `/home:{username}`.
const HOME_NAMESPACE: &str = "/home";

#[derive(Debug, Deserialize)]
pub struct HomeParams {
    pub username: String,
}

/// Payload cached and served by the home endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeting {
    pub success: bool,
    pub message: String,
}

impl Greeting {
    fn compute(_username: &str) -> Self {
        Self {
            success: true,
            message: "2 World".to_string(),
        }
    }
}

/// GET /
pub async fn index() -> &'static str {
    "alive!"
}

/// GET /home?username=<u>
///
/// Cache-aside: consult the cache first; on a miss compute the greeting and
/// populate the cache for subsequent calls. The `X-cache` header reports
/// which path served the response, and a hit body carries `"cache": true`.
pub async fn home(
    State(state): State<AppState>,
    Query(params): Query<HomeParams>,
) -> Result<Response, ApiError> {
    let key = cache_key(HOME_NAMESPACE, &params.username);

    if let Some(found) = state.cache.get::<Greeting>(&key).await? {
        debug!(%key, "cache hit");
        return Ok(with_cache_status(Json(found), "hit"));
    }

    debug!(%key, "cache miss, computing");
    let greeting = Greeting::compute(&params.username);

    // The write is advisory: a failed or unacknowledged save still serves
    // the freshly computed value.
    match state.cache.save(&key, &greeting, state.cache_ttl).await {
        Ok(true) => debug!(%key, "cache populated"),
        Ok(false) => warn!(%key, "store did not acknowledge cache write"),
        Err(error) => warn!(%key, %error, "cache write failed"),
    }

    Ok(with_cache_status(Json(greeting), "miss"))
}

fn with_cache_status<T: Serialize>(body: Json<T>, status: &'static str) -> Response {
    let mut response = body.into_response();
    response
        .headers_mut()
        .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(status));
    response
}
