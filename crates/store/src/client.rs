use std::time::Duration;

use async_trait::async_trait;
use spriteboard_core::{DocumentStore, StoreError};
use spriteboard_protocol::schema::{SPRITE_IMAGES_SCHEMA_ID, SPRITES_SCHEMA_ID};
use spriteboard_protocol::{
    DocumentId, Page, QueryArgs, SpriteFields, SpriteImage, SpriteImageFields, SpriteRecord,
};
use tracing::debug;

use crate::query;
use crate::response::{self, Envelope};

/// Per-request timeout; the node is expected to be local or near-local.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for a document node's GraphQL and blob endpoints.
pub struct GraphqlStore {
    http: reqwest::Client,
    graphql_endpoint: String,
    blobs_endpoint: String,
}

impl GraphqlStore {
    /// `node_address` is the node's HTTP base, e.g. `http://localhost:2020/`.
    pub fn new(node_address: &str) -> Result<Self, StoreError> {
        let base = node_address.trim_end_matches('/');
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            graphql_endpoint: format!("{base}/graphql"),
            blobs_endpoint: format!("{base}/blobs"),
        })
    }

    /// Stable URL the given blob's bytes are served from.
    pub fn blob_url(&self, id: &DocumentId) -> String {
        format!("{}/{id}", self.blobs_endpoint)
    }

    async fn execute(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<Envelope, StoreError> {
        let response = self
            .http
            .post(&self.graphql_endpoint)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(format!("http status {status}")));
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))
    }

    async fn create_document<F: serde::Serialize>(
        &self,
        schema_id: &str,
        fields: &F,
    ) -> Result<DocumentId, StoreError> {
        let fields_json =
            serde_json::to_value(fields).map_err(|e| StoreError::Malformed(e.to_string()))?;
        let variables = serde_json::json!({ "schemaId": schema_id, "fields": fields_json });

        let envelope = self
            .execute(query::CREATE_DOCUMENT_MUTATION, variables)
            .await?;
        let id = response::parse_created_id(envelope.take("createDocument")?)?;
        debug!(%id, schema_id, "created document");
        Ok(id)
    }
}

#[async_trait]
impl DocumentStore for GraphqlStore {
    async fn create_sprite(&self, fields: &SpriteFields) -> Result<DocumentId, StoreError> {
        self.create_document(SPRITES_SCHEMA_ID, fields).await
    }

    async fn create_sprite_image(
        &self,
        fields: &SpriteImageFields,
    ) -> Result<DocumentId, StoreError> {
        self.create_document(SPRITE_IMAGES_SCHEMA_ID, fields).await
    }

    async fn create_blob(&self, data: &[u8]) -> Result<DocumentId, StoreError> {
        let response = self
            .http
            .post(&self.blobs_endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Rejected(format!("http status {status}")));
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        let id = response::parse_created_id(value)?;
        debug!(%id, bytes = data.len(), "uploaded blob");
        Ok(id)
    }

    async fn sprites(&self, args: &QueryArgs) -> Result<Page<SpriteRecord>, StoreError> {
        let envelope = self
            .execute(&query::sprites_query(args), serde_json::json!({}))
            .await?;
        let payload = envelope.take(&query::collection_name(SPRITES_SCHEMA_ID))?;
        response::parse_sprite_page(payload)
    }

    async fn sprite_images(&self, args: &QueryArgs) -> Result<Page<SpriteImage>, StoreError> {
        let envelope = self
            .execute(&query::sprite_images_query(args), serde_json::json!({}))
            .await?;
        let payload = envelope.take(&query::collection_name(SPRITE_IMAGES_SCHEMA_ID))?;
        response::parse_image_page(payload)
    }
}
