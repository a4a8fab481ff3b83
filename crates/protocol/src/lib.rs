pub mod query;
pub mod records;
pub mod schema;
pub mod types;

pub use query::{OrderDirection, Page, QueryArgs};
pub use records::{SpriteFields, SpriteImage, SpriteImageFields, SpriteRecord};
pub use types::{Color, DocumentId, Position};
