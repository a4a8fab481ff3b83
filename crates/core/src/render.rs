use spriteboard_protocol::SpriteRecord;

/// Rendering surface collaborator.
///
/// Given a fully-resolved sprite record, produces a visible element. The
/// core only calls `draw` — it never inspects what was drawn, and it
/// guarantees the same id is never drawn twice (see
/// [`SyncEngine`](crate::SyncEngine)).
pub trait Renderer {
    fn draw(&mut self, sprite: &SpriteRecord);
}
