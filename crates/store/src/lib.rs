//! GraphQL transport for talking to a document node.
//!
//! Implements [`spriteboard_core::DocumentStore`] over the node's HTTP API:
//! cursor-paginated collection queries named `all_<schema id>`, a
//! `createDocument` mutation, and raw blob uploads. Binary assets are
//! served back from the stable `<base>/blobs/<id>` URL pattern.

mod client;
mod query;
mod response;

pub use client::GraphqlStore;
