use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use spriteboard_protocol::{Page, QueryArgs, SpriteImage, SpriteImageFields};
use thiserror::Error;
use tracing::{debug, info};

use crate::store::{DocumentStore, StoreError};

/// Visibility polls before a resolution attempt gives up.
const MAX_POLL_ATTEMPTS: u32 = 20;

/// Delay between visibility polls.
const POLL_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The store never reflected the image create within the poll budget.
    #[error("canonical sprite image not visible after {attempts} polls")]
    Timeout { attempts: u32 },
}

/// Resolves the canonical sprite image all new sprites reference, creating
/// it when no client has yet.
///
/// The create is deliberately not guarded across clients: two racing
/// clients may both observe zero matches and both create an image. Rather
/// than distributed mutual exclusion, convergence comes from re-querying —
/// every client settles on the same most-recent document once the store
/// reflects all creates. Until then clients may transiently disagree.
pub struct AssetBootstrapper {
    store: Arc<dyn DocumentStore>,
    default_asset: Cow<'static, [u8]>,
    description: String,
    cached: Option<SpriteImage>,
}

impl AssetBootstrapper {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        default_asset: impl Into<Cow<'static, [u8]>>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            store,
            default_asset: default_asset.into(),
            description: description.into(),
            cached: None,
        }
    }

    /// Resolve the canonical image, creating it first if the store has
    /// none. Memoized for the process lifetime: the second call returns
    /// without touching the store.
    ///
    /// Store errors propagate un-retried; only the gap between a
    /// successful create and its query visibility is bridged, by a bounded
    /// poll loop.
    pub async fn resolve(&mut self) -> Result<SpriteImage, BootstrapError> {
        if let Some(image) = &self.cached {
            return Ok(image.clone());
        }

        let page = self.query_latest().await?;
        let image = if page.total_count == 0 {
            self.create_default_image().await?;
            self.poll_until_visible().await?
        } else {
            first_document(page)?
        };

        info!(id = %image.id, "canonical sprite image resolved");
        self.cached = Some(image.clone());
        Ok(image)
    }

    /// The single most-recently-created image, page size 1.
    async fn query_latest(&self) -> Result<Page<SpriteImage>, StoreError> {
        self.store
            .sprite_images(&QueryArgs::first(1).descending())
            .await
    }

    async fn create_default_image(&self) -> Result<(), StoreError> {
        let blob = self.store.create_blob(&self.default_asset).await?;
        let fields = SpriteImageFields {
            timestamp: crate::time::unix_timestamp(),
            description: self.description.clone(),
            blob,
        };
        let id = self.store.create_sprite_image(&fields).await?;
        debug!(%id, "created sprite image document");
        Ok(())
    }

    /// Re-query until the create is reflected, bridging the store's
    /// eventual-consistency delay.
    async fn poll_until_visible(&self) -> Result<SpriteImage, BootstrapError> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            let page = self.query_latest().await?;
            if page.total_count > 0 {
                return Ok(first_document(page)?);
            }
            debug!(attempt, "sprite image not visible yet");
            // No point waiting out the interval once the attempt budget
            // is spent.
            if attempt < MAX_POLL_ATTEMPTS {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        }
        Err(BootstrapError::Timeout {
            attempts: MAX_POLL_ATTEMPTS,
        })
    }
}

fn first_document(page: Page<SpriteImage>) -> Result<SpriteImage, StoreError> {
    page.documents.into_iter().next().ok_or_else(|| {
        StoreError::Malformed("non-zero total count with an empty document list".into())
    })
}
