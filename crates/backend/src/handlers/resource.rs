//! Generic CRUD handlers shared by all registered resources

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::shared::store::{self, ListQuery, StoreError};

/// Query string of a list request; `filter` and `variables` arrive as
/// JSON-encoded objects
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListRequest {
    #[serde(default)]
    pub page: usize,
    #[serde(default)]
    pub per_page: usize,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub q: Option<String>,
    pub filter: Option<String>,
    pub variables: Option<String>,
}

impl ListRequest {
    fn into_query(self) -> ListQuery {
        ListQuery {
            page: self.page,
            per_page: self.per_page,
            descending: self.order.as_deref() == Some("desc"),
            sort: self.sort,
            search: self.q,
            filter: parse_json_param(self.filter),
            variables: parse_json_param(self.variables),
        }
    }
}

fn parse_json_param(param: Option<String>) -> Option<Value> {
    param.and_then(|raw| serde_json::from_str(&raw).ok())
}

fn status_of(error: &StoreError) -> StatusCode {
    match error {
        StoreError::UnknownResource(_) => StatusCode::NOT_FOUND,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        StoreError::Poisoned => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(error: StoreError) -> (StatusCode, Json<Value>) {
    tracing::warn!("request failed: {}", error);
    (status_of(&error), Json(json!({"error": error.to_string()})))
}

/// GET /api/:resource
pub async fn list(
    Path(resource): Path<String>,
    Query(request): Query<ListRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let (items, total) =
        store::list(&resource, &request.into_query()).map_err(error_response)?;
    Ok(Json(json!({"items": items, "totalCount": total})))
}

/// GET /api/:resource/:id
pub async fn get_by_id(
    Path((resource, id)): Path<(String, String)>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let record = store::get_by_id(&resource, &id).map_err(error_response)?;
    Ok(Json(record))
}

/// POST /api/:resource
pub async fn create(
    Path(resource): Path<String>,
    Json(values): Json<Value>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, Json<Value>)> {
    let record = store::create(&resource, &values).map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/:resource/:id
pub async fn update(
    Path((resource, id)): Path<(String, String)>,
    Json(values): Json<Value>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let record = store::update(&resource, &id, &values).map_err(error_response)?;
    Ok(Json(record))
}

/// DELETE /api/:resource/:id
pub async fn delete(
    Path((resource, id)): Path<(String, String)>,
) -> Result<StatusCode, (StatusCode, Json<Value>)> {
    store::delete(&resource, &id).map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}
