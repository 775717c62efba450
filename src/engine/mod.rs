//! The mutation engine: every create/rename/delete/reorder/move operation
//! over the board snapshot.
//!
//! Each write follows the same cycle: take the writer guard, load the full
//! snapshot, locate the target, validate, mutate in memory, persist the
//! full snapshot, then emit an invalidation. An error anywhere before the
//! save leaves persisted state untouched; a failed save discards the
//! in-memory mutation along with the operation.

use crate::domain::validate::{
    ensure_unique_board_title, ensure_unique_column_title, validate_board_title,
    validate_card_content, validate_column_title,
};
use crate::domain::{Board, Card, Column};
use crate::error::{KanriError, Result};
use crate::storage::SnapshotStore;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

pub mod events;

pub use events::Invalidation;

/// Mutation engine over a snapshot store.
///
/// All writers serialize through one internal lock held across the whole
/// load-mutate-save cycle, so two in-process operations can never race the
/// backing store into a lost update. Reads never take the lock.
pub struct Engine<S: SnapshotStore> {
    store: S,
    write_guard: Mutex<()>,
    events: broadcast::Sender<Invalidation>,
}

impl<S: SnapshotStore> Engine<S> {
    const EVENT_CAPACITY: usize = 64;

    /// Creates an engine over the given store.
    pub fn new(store: S) -> Self {
        let (events, _) = broadcast::channel(Self::EVENT_CAPACITY);
        Self {
            store,
            write_guard: Mutex::new(()),
            events,
        }
    }

    /// Subscribes to invalidation events emitted after successful mutations.
    pub fn subscribe(&self) -> broadcast::Receiver<Invalidation> {
        self.events.subscribe()
    }

    fn notify(&self, event: Invalidation) {
        // Nobody listening is fine.
        let _ = self.events.send(event);
    }

    // ── Reads ──

    /// Returns all boards in stored order, columns and cards included.
    pub async fn list_boards(&self) -> Result<Vec<Board>> {
        Ok(self.store.load().await?.boards)
    }

    /// Returns the board with the given id, or `None` if absent.
    pub async fn get_board(&self, id: Uuid) -> Result<Option<Board>> {
        let snapshot = self.store.load().await?;
        Ok(snapshot.board(id).cloned())
    }

    // ── Boards ──

    /// Creates a board and appends it to the end of the boards sequence.
    pub async fn create_board(&self, title: &str) -> Result<Board> {
        validate_board_title(title)?;

        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        ensure_unique_board_title(&snapshot.boards, title, None)?;

        let board = Board::new(title.to_string());
        snapshot.boards.push(board.clone());
        self.store.save(&snapshot).await?;

        tracing::debug!(board_id = %board.id, "created board");
        self.notify(Invalidation::BoardList);
        Ok(board)
    }

    /// Renames a board in place.
    ///
    /// Runs the same uniqueness check as creation, excluding the board
    /// itself, so renaming to the current title always succeeds.
    pub async fn rename_board(&self, id: Uuid, title: &str) -> Result<()> {
        validate_board_title(title)?;

        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        if snapshot.board(id).is_none() {
            return Err(KanriError::BoardNotFound(id));
        }
        ensure_unique_board_title(&snapshot.boards, title, Some(id))?;

        let board = snapshot.board_mut(id).ok_or(KanriError::BoardNotFound(id))?;
        board.set_title(title.to_string());
        self.store.save(&snapshot).await?;

        self.notify(Invalidation::BoardList);
        self.notify(Invalidation::Board(id));
        Ok(())
    }

    /// Deletes a board, cascading to all of its columns and cards.
    pub async fn delete_board(&self, id: Uuid) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        if snapshot.board(id).is_none() {
            return Err(KanriError::BoardNotFound(id));
        }

        snapshot.boards.retain(|b| b.id != id);
        self.store.save(&snapshot).await?;

        tracing::debug!(board_id = %id, "deleted board");
        self.notify(Invalidation::BoardList);
        Ok(())
    }

    // ── Columns ──

    /// Creates a column at the end of the board's column sequence.
    pub async fn create_column(&self, board_id: Uuid, title: &str) -> Result<Column> {
        validate_column_title(title)?;

        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        ensure_unique_column_title(board, title, None)?;

        let column = Column::new(title.to_string());
        board.columns.push(column.clone());
        board.touch();
        self.store.save(&snapshot).await?;

        tracing::debug!(board_id = %board_id, column_id = %column.id, "created column");
        self.notify(Invalidation::Board(board_id));
        Ok(column)
    }

    /// Renames a column within its board, with the same self-excluding
    /// uniqueness rule as [`Engine::rename_board`].
    pub async fn rename_column(&self, board_id: Uuid, column_id: Uuid, title: &str) -> Result<()> {
        validate_column_title(title)?;

        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        if board.column(column_id).is_none() {
            return Err(KanriError::ColumnNotFound(column_id));
        }
        ensure_unique_column_title(board, title, Some(column_id))?;

        let column = board
            .column_mut(column_id)
            .ok_or(KanriError::ColumnNotFound(column_id))?;
        column.set_title(title.to_string());
        self.store.save(&snapshot).await?;

        self.notify(Invalidation::Board(board_id));
        Ok(())
    }

    /// Deletes a column, cascading to its cards.
    pub async fn delete_column(&self, board_id: Uuid, column_id: Uuid) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        if board.column(column_id).is_none() {
            return Err(KanriError::ColumnNotFound(column_id));
        }

        board.columns.retain(|c| c.id != column_id);
        board.touch();
        self.store.save(&snapshot).await?;

        tracing::debug!(board_id = %board_id, column_id = %column_id, "deleted column");
        self.notify(Invalidation::Board(board_id));
        Ok(())
    }

    // ── Cards ──

    /// Creates a card at the end of the column's card sequence.
    pub async fn create_card(
        &self,
        board_id: Uuid,
        column_id: Uuid,
        content: &str,
    ) -> Result<Card> {
        validate_card_content(content)?;

        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        let column = board
            .column_mut(column_id)
            .ok_or(KanriError::ColumnNotFound(column_id))?;

        let card = Card::new(content.to_string());
        column.cards.push(card.clone());
        column.touch();
        self.store.save(&snapshot).await?;

        tracing::debug!(board_id = %board_id, card_id = %card.id, "created card");
        self.notify(Invalidation::Board(board_id));
        Ok(card)
    }

    /// Replaces a card's content.
    pub async fn update_card(
        &self,
        board_id: Uuid,
        column_id: Uuid,
        card_id: Uuid,
        content: &str,
    ) -> Result<()> {
        validate_card_content(content)?;

        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        let column = board
            .column_mut(column_id)
            .ok_or(KanriError::ColumnNotFound(column_id))?;
        let card = column
            .card_mut(card_id)
            .ok_or(KanriError::CardNotFound(card_id))?;

        card.set_content(content.to_string());
        self.store.save(&snapshot).await?;

        self.notify(Invalidation::Board(board_id));
        Ok(())
    }

    /// Deletes a card by identity.
    pub async fn delete_card(&self, board_id: Uuid, column_id: Uuid, card_id: Uuid) -> Result<()> {
        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        let column = board
            .column_mut(column_id)
            .ok_or(KanriError::ColumnNotFound(column_id))?;
        if column.card(card_id).is_none() {
            return Err(KanriError::CardNotFound(card_id));
        }

        column.cards.retain(|c| c.id != card_id);
        column.touch();
        self.store.save(&snapshot).await?;

        tracing::debug!(board_id = %board_id, card_id = %card_id, "deleted card");
        self.notify(Invalidation::Board(board_id));
        Ok(())
    }

    /// Rebuilds a column's card sequence to match `order`.
    ///
    /// The result is exactly the subsequence of the column's current cards
    /// whose ids appear in `order`, in `order`'s order. Unknown ids are
    /// skipped silently; current cards omitted from `order` are dropped.
    /// Applying the same full list twice yields the same sequence.
    pub async fn reorder_cards(
        &self,
        board_id: Uuid,
        column_id: Uuid,
        order: &[Uuid],
    ) -> Result<Vec<Card>> {
        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;
        let column = board
            .column_mut(column_id)
            .ok_or(KanriError::ColumnNotFound(column_id))?;

        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            // Taking cards out as they match keeps a repeated id in the
            // input from duplicating a card.
            if let Some(pos) = column.cards.iter().position(|c| c.id == *id) {
                reordered.push(column.cards.remove(pos));
            }
        }
        if !column.cards.is_empty() {
            tracing::warn!(
                board_id = %board_id,
                column_id = %column_id,
                dropped = column.cards.len(),
                "reorder dropped cards omitted from the order list"
            );
        }
        column.cards = reordered;
        column.touch();
        let cards = column.cards.clone();
        self.store.save(&snapshot).await?;

        self.notify(Invalidation::Board(board_id));
        Ok(cards)
    }

    /// Moves a card to `to_column_id`, placing it per the `order` list.
    ///
    /// The card is removed from whichever column of the board currently
    /// holds it, then the destination sequence is rebuilt the same way as
    /// [`Engine::reorder_cards`], with the moved card inserted where its id
    /// appears in `order`. If `order` omits the moved card's id entirely,
    /// the card is kept at the destination's tail rather than lost.
    pub async fn move_card(
        &self,
        board_id: Uuid,
        card_id: Uuid,
        to_column_id: Uuid,
        order: &[Uuid],
    ) -> Result<Vec<Card>> {
        let _guard = self.write_guard.lock().await;
        let mut snapshot = self.store.load().await?;
        let board = snapshot
            .board_mut(board_id)
            .ok_or(KanriError::BoardNotFound(board_id))?;

        // The card lives in exactly one column; scan with early exit.
        let mut moved: Option<Card> = None;
        for column in &mut board.columns {
            if let Some(pos) = column.cards.iter().position(|c| c.id == card_id) {
                moved = Some(column.cards.remove(pos));
                column.touch();
                break;
            }
        }
        let mut moved = Some(moved.ok_or(KanriError::CardNotFound(card_id))?);

        let destination = board
            .column_mut(to_column_id)
            .ok_or(KanriError::ColumnNotFound(to_column_id))?;

        let mut reordered = Vec::with_capacity(order.len());
        for id in order {
            if *id == card_id {
                if let Some(card) = moved.take() {
                    reordered.push(card);
                }
            } else if let Some(pos) = destination.cards.iter().position(|c| c.id == *id) {
                reordered.push(destination.cards.remove(pos));
            }
        }
        if let Some(card) = moved.take() {
            reordered.push(card);
        }
        destination.cards = reordered;
        destination.touch();
        let cards = destination.cards.clone();
        self.store.save(&snapshot).await?;

        tracing::debug!(
            board_id = %board_id,
            card_id = %card_id,
            to_column_id = %to_column_id,
            "moved card"
        );
        self.notify(Invalidation::Board(board_id));
        Ok(cards)
    }
}
