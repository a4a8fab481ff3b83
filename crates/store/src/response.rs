//! Deserialization of the node's GraphQL responses into protocol types.

use serde::Deserialize;
use spriteboard_core::StoreError;
use spriteboard_protocol::{Color, DocumentId, Page, Position, SpriteImage, SpriteRecord};

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphqlError {
    pub message: String,
}

impl Envelope {
    /// Extract the payload under `data.<key>`, surfacing GraphQL-level
    /// errors as rejections.
    pub(crate) fn take(mut self, key: &str) -> Result<serde_json::Value, StoreError> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|e| e.message).collect();
            return Err(StoreError::Rejected(messages.join("; ")));
        }
        self.data
            .as_mut()
            .and_then(|data| data.get_mut(key))
            .map(serde_json::Value::take)
            .filter(|value| !value.is_null())
            .ok_or_else(|| StoreError::Malformed(format!("response missing data.{key}")))
    }
}

#[derive(Debug, Deserialize)]
struct RawPage<T> {
    #[serde(rename = "totalCount")]
    total_count: u64,
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
    documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct Meta {
    #[serde(rename = "documentId")]
    document_id: DocumentId,
}

#[derive(Debug, Deserialize)]
struct SpriteDocument {
    fields: SpriteDocumentFields,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct SpriteDocumentFields {
    colour: String,
    pos_x: i64,
    pos_y: i64,
    timestamp: i64,
    img: ImageDocument,
}

#[derive(Debug, Deserialize)]
struct ImageDocument {
    fields: ImageDocumentFields,
    meta: Meta,
}

#[derive(Debug, Deserialize)]
struct ImageDocumentFields {
    description: String,
    timestamp: i64,
    blob: BlobRelation,
}

#[derive(Debug, Deserialize)]
struct BlobRelation {
    meta: Meta,
}

impl From<ImageDocument> for SpriteImage {
    fn from(doc: ImageDocument) -> Self {
        Self {
            id: doc.meta.document_id,
            blob: doc.fields.blob.meta.document_id,
            description: doc.fields.description,
            timestamp: doc.fields.timestamp,
        }
    }
}

impl From<SpriteDocument> for SpriteRecord {
    fn from(doc: SpriteDocument) -> Self {
        Self {
            id: doc.meta.document_id,
            position: Position::new(doc.fields.pos_x, doc.fields.pos_y),
            color: Color::from(doc.fields.colour),
            timestamp: doc.fields.timestamp,
            image: doc.fields.img.into(),
        }
    }
}

fn parse_page<D, T>(value: serde_json::Value) -> Result<Page<T>, StoreError>
where
    D: for<'de> Deserialize<'de> + Into<T>,
{
    let raw: RawPage<D> =
        serde_json::from_value(value).map_err(|e| StoreError::Malformed(e.to_string()))?;
    Ok(Page {
        total_count: raw.total_count,
        has_next_page: raw.has_next_page,
        end_cursor: raw.end_cursor,
        documents: raw.documents.into_iter().map(Into::into).collect(),
    })
}

pub(crate) fn parse_sprite_page(value: serde_json::Value) -> Result<Page<SpriteRecord>, StoreError> {
    parse_page::<SpriteDocument, _>(value)
}

pub(crate) fn parse_image_page(value: serde_json::Value) -> Result<Page<SpriteImage>, StoreError> {
    parse_page::<ImageDocument, _>(value)
}

/// Parse the id out of a `createDocument` mutation payload.
pub(crate) fn parse_created_id(value: serde_json::Value) -> Result<DocumentId, StoreError> {
    #[derive(Deserialize)]
    struct Created {
        #[serde(rename = "documentId")]
        document_id: DocumentId,
    }
    let created: Created =
        serde_json::from_value(value).map_err(|e| StoreError::Malformed(e.to_string()))?;
    Ok(created.document_id)
}
