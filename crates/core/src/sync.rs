use std::collections::HashSet;
use std::sync::Arc;

use spriteboard_protocol::{DocumentId, QueryArgs};
use tracing::debug;

use crate::render::Renderer;
use crate::store::{DocumentStore, StoreError};

/// Sprites fetched per page.
const PAGE_SIZE: u32 = 10;

/// Counters describing one completed sync pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    pub pages: u32,
    pub rendered: u32,
}

/// Walks the store's sprite pages and hands every not-yet-rendered record
/// to the renderer exactly once.
///
/// Owns the local render set: the ids already given to a renderer, whether
/// by a sync pass or by the creation path. The set only grows for the
/// process lifetime.
pub struct SyncEngine {
    store: Arc<dyn DocumentStore>,
    rendered: HashSet<DocumentId>,
}

impl SyncEngine {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            rendered: HashSet::new(),
        }
    }

    /// Record an id as rendered. Returns `false` if it already was.
    pub fn mark_rendered(&mut self, id: DocumentId) -> bool {
        self.rendered.insert(id)
    }

    pub fn is_rendered(&self, id: &DocumentId) -> bool {
        self.rendered.contains(id)
    }

    pub fn rendered_count(&self) -> usize {
        self.rendered.len()
    }

    /// Run one full pass: page through every sprite not yet rendered, in
    /// ascending timestamp order, drawing each and recording its id.
    ///
    /// The exclusion filter is the render set snapshotted at pass start,
    /// applied at the query layer — already-seen records are not pulled
    /// over the wire at all. Records that become rendered mid-pass (via
    /// the creation path, or an overlapping pass) are additionally skipped
    /// through the render set just before drawing, so an id can never
    /// reach the renderer twice.
    ///
    /// A query error aborts the pass. Anything already drawn stays drawn;
    /// the next scheduled pass retries with the updated exclusion set.
    pub async fn sync_once(&mut self, renderer: &mut dyn Renderer) -> Result<SyncStats, StoreError> {
        let exclude: Vec<DocumentId> = self.rendered.iter().cloned().collect();
        let mut stats = SyncStats::default();
        let mut cursor: Option<String> = None;

        loop {
            let mut args = QueryArgs::first(PAGE_SIZE).excluding(exclude.iter().cloned());
            if let Some(cursor) = cursor.take() {
                args = args.after(cursor);
            }

            let page = self.store.sprites(&args).await?;
            stats.pages += 1;

            for sprite in page.documents {
                if self.rendered.insert(sprite.id.clone()) {
                    renderer.draw(&sprite);
                    stats.rendered += 1;
                }
            }

            if !page.has_next_page {
                break;
            }
            match page.end_cursor {
                Some(next) => cursor = Some(next),
                None => {
                    return Err(StoreError::Malformed(
                        "further page reported without an end cursor".into(),
                    ));
                }
            }
        }

        debug!(
            pages = stats.pages,
            rendered = stats.rendered,
            "sync pass complete"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use spriteboard_protocol::{
        Color, Page, Position, SpriteFields, SpriteImage, SpriteImageFields, SpriteRecord,
    };

    use super::*;

    /// In-memory sprite store that mimics cursor pagination and the
    /// server-side `not_in` filter, recording every query it receives.
    #[derive(Default)]
    struct SpriteStore {
        sprites: Mutex<Vec<SpriteRecord>>,
        queries: Mutex<Vec<QueryArgs>>,
    }

    impl SpriteStore {
        fn with_sprites(sprites: Vec<SpriteRecord>) -> Self {
            Self {
                sprites: Mutex::new(sprites),
                queries: Mutex::new(Vec::new()),
            }
        }

        fn recorded_queries(&self) -> Vec<QueryArgs> {
            self.queries.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl DocumentStore for SpriteStore {
        async fn create_sprite(&self, _: &SpriteFields) -> Result<DocumentId, StoreError> {
            Err(StoreError::Rejected("not supported by fake".into()))
        }

        async fn create_sprite_image(
            &self,
            _: &SpriteImageFields,
        ) -> Result<DocumentId, StoreError> {
            Err(StoreError::Rejected("not supported by fake".into()))
        }

        async fn create_blob(&self, _: &[u8]) -> Result<DocumentId, StoreError> {
            Err(StoreError::Rejected("not supported by fake".into()))
        }

        async fn sprites(&self, args: &QueryArgs) -> Result<Page<SpriteRecord>, StoreError> {
            self.queries.lock().expect("lock").push(args.clone());

            let mut matches: Vec<SpriteRecord> = self
                .sprites
                .lock()
                .expect("lock")
                .iter()
                .filter(|s| !args.not_in.contains(&s.id))
                .cloned()
                .collect();
            matches.sort_by_key(|s| s.timestamp);

            let total = matches.len();
            let start = match &args.after {
                Some(cursor) => {
                    cursor.parse::<usize>().map_err(|_| {
                        StoreError::Rejected(format!("bad cursor {cursor:?}"))
                    })? + 1
                }
                None => 0,
            };
            let len = args.first.map_or(total, |first| first as usize);
            let end = (start + len).min(total);

            Ok(Page {
                total_count: total as u64,
                has_next_page: end < total,
                end_cursor: if end > start {
                    Some((end - 1).to_string())
                } else {
                    None
                },
                documents: matches[start.min(total)..end].to_vec(),
            })
        }

        async fn sprite_images(&self, _: &QueryArgs) -> Result<Page<SpriteImage>, StoreError> {
            Err(StoreError::Rejected("not supported by fake".into()))
        }
    }

    /// Renderer that records what it was handed.
    #[derive(Default)]
    struct Recorder {
        drawn: Vec<SpriteRecord>,
    }

    impl crate::render::Renderer for Recorder {
        fn draw(&mut self, sprite: &SpriteRecord) {
            self.drawn.push(sprite.clone());
        }
    }

    impl Recorder {
        fn timestamps(&self) -> Vec<i64> {
            self.drawn.iter().map(|s| s.timestamp).collect()
        }

        fn ids(&self) -> Vec<DocumentId> {
            self.drawn.iter().map(|s| s.id.clone()).collect()
        }
    }

    fn sprite(n: i64) -> SpriteRecord {
        SpriteRecord {
            id: DocumentId::from(format!("0020sprite{n:03}")),
            position: Position::new(n * 10, n * 5),
            color: Color::hsl(120),
            timestamp: n,
            image: SpriteImage {
                id: DocumentId::from("0020img"),
                blob: DocumentId::from("0020blob"),
                description: "a sprite".into(),
                timestamp: 0,
            },
        }
    }

    #[tokio::test]
    async fn full_pass_pages_through_everything_in_order() {
        // 25 pre-existing sprites, empty render set: one pass must issue
        // three page requests (10, 10, 5) and render all 25 ascending.
        let store = Arc::new(SpriteStore::with_sprites((1..=25).map(sprite).collect()));
        let mut engine = SyncEngine::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

        let mut renderer = Recorder::default();
        let stats = engine.sync_once(&mut renderer).await.expect("sync");

        assert_eq!(stats, SyncStats { pages: 3, rendered: 25 });
        assert_eq!(renderer.timestamps(), (1..=25).collect::<Vec<_>>());
        assert_eq!(engine.rendered_count(), 25);
    }

    #[tokio::test]
    async fn second_pass_issues_one_empty_query() {
        let store = Arc::new(SpriteStore::with_sprites((1..=25).map(sprite).collect()));
        let mut engine = SyncEngine::new(Arc::clone(&store) as Arc<dyn DocumentStore>);

        let mut renderer = Recorder::default();
        engine.sync_once(&mut renderer).await.expect("first pass");
        let stats = engine.sync_once(&mut renderer).await.expect("second pass");

        assert_eq!(stats, SyncStats { pages: 1, rendered: 0 });

        // The second pass's single query must exclude all 25 ids.
        let queries = store.recorded_queries();
        let last = queries.last().expect("at least one query");
        assert_eq!(last.not_in.len(), 25);
    }

    #[tokio::test]
    async fn excluded_ids_never_travel_the_wire() {
        let store = Arc::new(SpriteStore::with_sprites((1..=5).map(sprite).collect()));
        let mut engine = SyncEngine::new(Arc::clone(&store) as Arc<dyn DocumentStore>);
        engine.mark_rendered(sprite(2).id);
        engine.mark_rendered(sprite(4).id);

        let mut renderer = Recorder::default();
        engine.sync_once(&mut renderer).await.expect("sync");

        let drawn = renderer.ids();
        assert_eq!(drawn.len(), 3);
        assert!(!drawn.contains(&sprite(2).id));
        assert!(!drawn.contains(&sprite(4).id));
        for query in store.recorded_queries() {
            assert!(query.not_in.contains(&sprite(2).id));
            assert!(query.not_in.contains(&sprite(4).id));
        }
    }

    #[tokio::test]
    async fn repeated_passes_are_idempotent() {
        let store = Arc::new(SpriteStore::with_sprites((1..=12).map(sprite).collect()));
        let mut engine = SyncEngine::new(store as Arc<dyn DocumentStore>);

        let mut renderer = Recorder::default();
        let mut total = 0u32;
        for _ in 0..4 {
            let stats = engine.sync_once(&mut renderer).await.expect("sync");
            total += stats.rendered;
        }
        assert_eq!(total, 12);
        assert_eq!(renderer.drawn.len(), 12);
    }

    #[tokio::test]
    async fn query_error_aborts_pass_and_keeps_rendered_state() {
        #[derive(Default)]
        struct FailingStore {
            calls: Mutex<u32>,
        }

        #[async_trait]
        impl DocumentStore for FailingStore {
            async fn create_sprite(&self, _: &SpriteFields) -> Result<DocumentId, StoreError> {
                Err(StoreError::Rejected("not supported by fake".into()))
            }
            async fn create_sprite_image(
                &self,
                _: &SpriteImageFields,
            ) -> Result<DocumentId, StoreError> {
                Err(StoreError::Rejected("not supported by fake".into()))
            }
            async fn create_blob(&self, _: &[u8]) -> Result<DocumentId, StoreError> {
                Err(StoreError::Rejected("not supported by fake".into()))
            }
            async fn sprites(&self, _: &QueryArgs) -> Result<Page<SpriteRecord>, StoreError> {
                let mut calls = self.calls.lock().expect("lock");
                *calls += 1;
                if *calls == 1 {
                    // First page succeeds, then the transport drops.
                    Ok(Page {
                        total_count: 11,
                        has_next_page: true,
                        end_cursor: Some("9".into()),
                        documents: (1..=10).map(sprite).collect(),
                    })
                } else {
                    Err(StoreError::Transport("connection reset".into()))
                }
            }
            async fn sprite_images(&self, _: &QueryArgs) -> Result<Page<SpriteImage>, StoreError> {
                Err(StoreError::Rejected("not supported by fake".into()))
            }
        }

        let mut engine = SyncEngine::new(Arc::new(FailingStore::default()));
        let mut renderer = Recorder::default();
        let err = engine.sync_once(&mut renderer).await.expect_err("fails");

        assert!(matches!(err, StoreError::Transport(_)));
        // The partial page stays rendered for the next pass to exclude.
        assert_eq!(renderer.drawn.len(), 10);
        assert_eq!(engine.rendered_count(), 10);
    }
}
