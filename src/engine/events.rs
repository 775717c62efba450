use uuid::Uuid;

/// Scope of a cache invalidation emitted after a successful mutation.
///
/// Readers that cache "list boards" refresh on [`Invalidation::BoardList`];
/// readers that cache "get board by id" refresh on a matching
/// [`Invalidation::Board`]. The engine only signals staleness — it never
/// pushes data to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidation {
    /// The set of boards changed (a board was created, renamed or deleted).
    BoardList,
    /// The identified board's contents changed.
    Board(Uuid),
}
