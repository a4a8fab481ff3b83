//! Client-side synchronization core for a shared sprite canvas.
//!
//! Keeps a local scene in step with an append-only, eventually-consistent
//! document store: cursor-paginated discovery of not-yet-rendered sprites,
//! an idempotent bootstrap of the shared sprite image, and an optimistic
//! creation path that never double-draws. The store and the rendering
//! surface are collaborators behind the [`DocumentStore`] and [`Renderer`]
//! traits.

pub mod bootstrap;
pub mod client;
pub mod color;
pub mod render;
pub mod store;
pub mod sync;
mod time;

pub use bootstrap::{AssetBootstrapper, BootstrapError};
pub use client::{CanvasClient, PlaceError};
pub use color::derive_color;
pub use render::Renderer;
pub use store::{DocumentStore, StoreError};
pub use sync::{SyncEngine, SyncStats};
