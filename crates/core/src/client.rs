use std::borrow::Cow;
use std::sync::Arc;

use spriteboard_protocol::{Position, SpriteFields, SpriteRecord};
use thiserror::Error;
use tracing::info;

use crate::bootstrap::{AssetBootstrapper, BootstrapError};
use crate::color::derive_color;
use crate::render::Renderer;
use crate::store::{DocumentStore, StoreError};
use crate::sync::{SyncEngine, SyncStats};

#[derive(Debug, Error)]
pub enum PlaceError {
    #[error(transparent)]
    Bootstrap(#[from] BootstrapError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Everything one client process needs to keep its canvas in sync.
///
/// All shared mutable state — the render set and the canonical-image cache
/// — lives in fields here rather than process globals, and is only touched
/// through `&mut self`, which serializes the background sync against the
/// creation path. Built in order: identity, store, bootstrapper, sync
/// engine.
pub struct CanvasClient {
    public_id: String,
    store: Arc<dyn DocumentStore>,
    bootstrapper: AssetBootstrapper,
    sync: SyncEngine,
}

impl CanvasClient {
    pub fn new(
        public_id: impl Into<String>,
        store: Arc<dyn DocumentStore>,
        default_asset: impl Into<Cow<'static, [u8]>>,
        asset_description: impl Into<String>,
    ) -> Self {
        let bootstrapper =
            AssetBootstrapper::new(Arc::clone(&store), default_asset, asset_description);
        let sync = SyncEngine::new(Arc::clone(&store));
        Self {
            public_id: public_id.into(),
            store,
            bootstrapper,
            sync,
        }
    }

    /// Stable public identifier of this client's identity.
    pub fn public_id(&self) -> &str {
        &self.public_id
    }

    /// Number of sprites handed to a renderer so far.
    pub fn rendered_count(&self) -> usize {
        self.sync.rendered_count()
    }

    /// One background sync pass. See [`SyncEngine::sync_once`].
    pub async fn sync_once(&mut self, renderer: &mut dyn Renderer) -> Result<SyncStats, StoreError> {
        self.sync.sync_once(renderer).await
    }

    /// Place a sprite at `position` and draw it immediately, without
    /// waiting for a background pass to observe it.
    ///
    /// Resolves the canonical image (cached after the first call), derives
    /// the color from this client's identity, submits the record, then
    /// renders it under the store-assigned id. The id enters the render
    /// set before the draw, so later sync passes exclude it at the query
    /// layer. If the create fails nothing is drawn or recorded.
    pub async fn place_sprite(
        &mut self,
        position: Position,
        renderer: &mut dyn Renderer,
    ) -> Result<SpriteRecord, PlaceError> {
        let image = self.bootstrapper.resolve().await?;
        let color = derive_color(&self.public_id);
        let timestamp = crate::time::unix_timestamp();

        let fields = SpriteFields::new(position, color.clone(), timestamp, image.id.clone());
        let id = self.store.create_sprite(&fields).await?;

        let record = SpriteRecord {
            id: id.clone(),
            position,
            color,
            timestamp,
            image,
        };
        self.sync.mark_rendered(id);
        renderer.draw(&record);
        info!(id = %record.id, x = position.x, y = position.y, "placed sprite");
        Ok(record)
    }
}
