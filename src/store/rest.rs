use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::core::config::Settings;

use super::{Direction, DocumentStore, Filter, OrderBy, StoreError, StoredDocument};

/// JSON-over-HTTP client for the external document database.
///
/// The wire contract mirrors the generic store interface: `POST
/// {base}/{collection}/query` with an equality-filter body, `GET`/`PATCH`
/// `{base}/{collection}/{id}`, and `POST {base}/{collection}` returning the
/// new document id. Timestamps are stamped by the backend.
#[derive(Debug, Clone)]
pub struct RestDocumentStore {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct DocumentBody {
    id: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct CreatedBody {
    id: String,
}

impl RestDocumentStore {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.store().timeout_seconds);
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("Failed to build document store HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.store().base_url.trim_end_matches('/').to_string(),
            api_key: settings.store().api_key.clone(),
        })
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    async fn read_body(response: reqwest::Response) -> Result<(u16, Value), StoreError> {
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|err| StoreError::Transport(format!("failed to read response body: {err}")))?;

        if raw.trim().is_empty() {
            return Ok((status, Value::Null));
        }

        let parsed = serde_json::from_str(&raw)
            .map_err(|err| StoreError::MalformedResponse(format!("{err}: {raw}")))?;
        Ok((status, parsed))
    }

    fn check_status(status: u16, body: &Value) -> Result<(), StoreError> {
        if (200..300).contains(&status) {
            return Ok(());
        }

        Err(StoreError::Rejected { status, detail: extract_detail(body) })
    }
}

fn extract_detail(body: &Value) -> String {
    body.get("detail")
        .or_else(|| body.get("error"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error")
        .to_string()
}

fn query_body(filters: &[Filter], order_by: Option<&OrderBy>) -> Value {
    let filters: Vec<Value> = filters
        .iter()
        .map(|filter| serde_json::json!({ "field": filter.field, "eq": filter.value }))
        .collect();

    let mut body = serde_json::json!({ "filters": filters });
    if let Some(order) = order_by {
        let direction = match order.direction {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        };
        body["orderBy"] = serde_json::json!({ "field": order.field, "direction": direction });
    }
    body
}

#[async_trait]
impl DocumentStore for RestDocumentStore {
    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
        order_by: Option<&OrderBy>,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let url = format!("{}/query", self.collection_url(collection));
        let response = self
            .client
            .post(&url)
            .header("X-Api-Key", &self.api_key)
            .json(&query_body(filters, order_by))
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let (status, body) = Self::read_body(response).await?;
        Self::check_status(status, &body)?;

        let documents: Vec<DocumentBody> = serde_json::from_value(body)
            .map_err(|err| StoreError::MalformedResponse(err.to_string()))?;

        Ok(documents
            .into_iter()
            .map(|document| StoredDocument { id: document.id, data: document.data })
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<StoredDocument>, StoreError> {
        let response = self
            .client
            .get(self.document_url(collection, id))
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let (status, body) = Self::read_body(response).await?;
        if status == 404 {
            return Ok(None);
        }
        Self::check_status(status, &body)?;

        let document: DocumentBody = serde_json::from_value(body)
            .map_err(|err| StoreError::MalformedResponse(err.to_string()))?;
        Ok(Some(StoredDocument { id: document.id, data: document.data }))
    }

    async fn add(&self, collection: &str, data: Value) -> Result<String, StoreError> {
        let response = self
            .client
            .post(self.collection_url(collection))
            .header("X-Api-Key", &self.api_key)
            .json(&data)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let (status, body) = Self::read_body(response).await?;
        Self::check_status(status, &body)?;

        let created: CreatedBody = serde_json::from_value(body)
            .map_err(|err| StoreError::MalformedResponse(err.to_string()))?;
        Ok(created.id)
    }

    async fn update(&self, collection: &str, id: &str, patch: Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.document_url(collection, id))
            .header("X-Api-Key", &self.api_key)
            .json(&patch)
            .send()
            .await
            .map_err(|err| StoreError::Transport(err.to_string()))?;

        let (status, body) = Self::read_body(response).await?;
        if status == 404 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        Self::check_status(status, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_body_carries_filters_and_order() {
        let filters = [Filter::not_deleted()];
        let order = OrderBy::desc("createdAt");
        let body = query_body(&filters, Some(&order));

        assert_eq!(body["filters"][0]["field"], "isDeleted");
        assert_eq!(body["filters"][0]["eq"], false);
        assert_eq!(body["orderBy"]["field"], "createdAt");
        assert_eq!(body["orderBy"]["direction"], "desc");
    }

    #[test]
    fn extract_detail_prefers_detail_field() {
        let body = serde_json::json!({ "detail": "nope", "error": "other" });
        assert_eq!(extract_detail(&body), "nope");
        assert_eq!(extract_detail(&Value::Null), "unknown error");
    }
}
