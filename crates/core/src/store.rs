use async_trait::async_trait;
use spriteboard_protocol::{
    DocumentId, Page, QueryArgs, SpriteFields, SpriteImage, SpriteImageFields, SpriteRecord,
};
use thiserror::Error;

/// Errors surfaced by the document store collaborator.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced a usable response (connection, I/O).
    #[error("transport: {0}")]
    Transport(String),
    /// The store answered but rejected the operation.
    #[error("store rejected request: {0}")]
    Rejected(String),
    /// The response arrived but did not have the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Capability set of the backing document store.
///
/// The store is append-only from this client's perspective and eventually
/// consistent: a successful create may not be visible to queries
/// immediately. Queries are cursor-paginated and ordered by the documents'
/// `timestamp` field; the `not_in` filter of [`QueryArgs`] excludes
/// documents by id server-side.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Submit a new sprite document. Returns the store-assigned id.
    async fn create_sprite(&self, fields: &SpriteFields) -> Result<DocumentId, StoreError>;

    /// Submit a new sprite image document.
    async fn create_sprite_image(
        &self,
        fields: &SpriteImageFields,
    ) -> Result<DocumentId, StoreError>;

    /// Upload binary content. Returns the blob document id.
    async fn create_blob(&self, data: &[u8]) -> Result<DocumentId, StoreError>;

    /// Query sprite documents with their referenced image resolved inline.
    async fn sprites(&self, args: &QueryArgs) -> Result<Page<SpriteRecord>, StoreError>;

    /// Query sprite image documents.
    async fn sprite_images(&self, args: &QueryArgs) -> Result<Page<SpriteImage>, StoreError>;
}
