//! REST implementation of the engine's data-access seam
//!
//! Talks to the backend's generic `/api/{resource}` CRUD surface with
//! `gloo-net`. Query/mutation names from the schema metadata are passed
//! through as-is; the backend routes purely on the resource segment.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde_json::Value;

use contracts::engine::{DataProvider, ListParams, ListResult, ProviderError};

use super::api_utils::api_base;

#[derive(Debug, Clone, Default)]
pub struct RestProvider;

impl RestProvider {
    pub fn new() -> Self {
        Self
    }

    fn list_url(&self, resource: &str, params: &ListParams) -> String {
        let base = format!("{}/api/{}", api_base(), resource);
        let query = list_query_string(params);
        if query.is_empty() {
            base
        } else {
            format!("{}?{}", base, query)
        }
    }
}

fn list_query_string(params: &ListParams) -> String {
    let mut query: Vec<(String, String)> = Vec::new();
    if let Some(pagination) = &params.pagination {
        query.push(("page".into(), pagination.page.to_string()));
        query.push(("perPage".into(), pagination.per_page.to_string()));
    }
    if let Some(sort) = &params.sort {
        query.push(("sort".into(), sort.field.clone()));
        query.push((
            "order".into(),
            if sort.ascending { "asc" } else { "desc" }.into(),
        ));
    }
    if let Some(search) = &params.search {
        if !search.is_empty() {
            query.push(("q".into(), search.clone()));
        }
    }
    if let Some(filter) = &params.filters {
        query.push(("filter".into(), filter.to_string()));
    }
    if let Some(variables) = &params.variables {
        query.push(("variables".into(), variables.to_string()));
    }

    query
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}


fn id_segment(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn read_error(response: gloo_net::http::Response) -> ProviderError {
    let status = response.status();
    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("error").and_then(Value::as_str).map(String::from))
        .unwrap_or_else(|| format!("HTTP {}", status));
    ProviderError::new(detail)
}

#[async_trait(?Send)]
impl DataProvider for RestProvider {
    async fn list(
        &self,
        resource: &str,
        _query: Option<&str>,
        params: &ListParams,
    ) -> Result<ListResult, ProviderError> {
        let response = Request::get(&self.list_url(resource, params))
            .send()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;
        if !response.ok() {
            return Err(read_error(response).await);
        }
        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;

        let items = body
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        let total_count = body
            .get("totalCount")
            .and_then(Value::as_u64)
            .unwrap_or(items.len() as u64) as usize;
        Ok(ListResult { items, total_count })
    }

    async fn get_one(
        &self,
        resource: &str,
        id: &Value,
        _query: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let url = format!("{}/api/{}/{}", api_base(), resource, id_segment(id));
        let response = Request::get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;
        if !response.ok() {
            return Err(read_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))
    }

    async fn create(
        &self,
        resource: &str,
        values: &Value,
        _mutation: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let url = format!("{}/api/{}", api_base(), resource);
        let response = Request::post(&url)
            .json(values)
            .map_err(|e| ProviderError::new(e.to_string()))?
            .send()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;
        if !response.ok() {
            return Err(read_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))
    }

    async fn update(
        &self,
        resource: &str,
        id: &Value,
        values: &Value,
        _mutation: Option<&str>,
    ) -> Result<Value, ProviderError> {
        let url = format!("{}/api/{}/{}", api_base(), resource, id_segment(id));
        let response = Request::put(&url)
            .json(values)
            .map_err(|e| ProviderError::new(e.to_string()))?
            .send()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;
        if !response.ok() {
            return Err(read_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))
    }
}
