use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_schema_version() -> u32 {
    1
}

/// The persisted document: every board, embedded columns and cards included.
///
/// This is the unit of persistence — storage backends load and save it
/// whole, never individual entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshots written before versioning was introduced deserialize as 1.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub boards: Vec<Board>,
}

impl Snapshot {
    pub const SCHEMA_VERSION: u32 = 1;

    /// Creates an empty snapshot at the current schema version.
    pub fn new() -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION,
            boards: Vec::new(),
        }
    }

    /// Finds a board by id.
    pub fn board(&self, id: Uuid) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == id)
    }

    /// Finds a board by id, mutably.
    pub fn board_mut(&mut self, id: Uuid) -> Option<&mut Board> {
        self.boards.iter_mut().find(|b| b.id == id)
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::new()
    }
}

/// A kanban board holding an ordered sequence of columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    pub id: Uuid,
    pub title: String,
    pub columns: Vec<Column>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Creates a new board with a fresh id and no columns.
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            columns: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    /// Finds a column by id.
    pub fn column(&self, id: Uuid) -> Option<&Column> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Finds a column by id, mutably.
    pub fn column_mut(&mut self, id: Uuid) -> Option<&mut Column> {
        self.columns.iter_mut().find(|c| c.id == id)
    }

    /// Marks the board as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Checks whether any column of this board holds the card.
    pub fn contains_card(&self, card_id: Uuid) -> bool {
        self.columns.iter().any(|c| c.card(card_id).is_some())
    }

    /// Total number of cards across all columns.
    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}

/// A column within a board, holding an ordered sequence of cards.
///
/// A column is owned by exactly one board; a card by exactly one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub id: Uuid,
    pub title: String,
    pub cards: Vec<Card>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Column {
    /// Creates a new column with a fresh id and no cards.
    pub fn new(title: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            cards: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the title
    pub fn set_title(&mut self, title: String) {
        self.title = title;
        self.updated_at = Utc::now();
    }

    /// Finds a card by id.
    pub fn card(&self, id: Uuid) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Finds a card by id, mutably.
    pub fn card_mut(&mut self, id: Uuid) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    /// Marks the column as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// A single card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Creates a new card with a fresh id.
    pub fn new(content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the content
    pub fn set_content(&mut self, content: String) {
        self.content = content;
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_creation() {
        let snapshot = Snapshot::new();
        assert_eq!(snapshot.schema_version, Snapshot::SCHEMA_VERSION);
        assert!(snapshot.boards.is_empty());
    }

    #[test]
    fn test_board_lookup() {
        let mut snapshot = Snapshot::new();
        let board = Board::new("Sprint 1".to_string());
        let id = board.id;
        snapshot.boards.push(board);

        assert!(snapshot.board(id).is_some());
        assert!(snapshot.board(Uuid::new_v4()).is_none());
    }

    #[test]
    fn test_column_and_card_lookup() {
        let mut board = Board::new("Sprint 1".to_string());
        let mut column = Column::new("Todo".to_string());
        let card = Card::new("Write docs".to_string());
        let card_id = card.id;
        column.cards.push(card);
        let column_id = column.id;
        board.columns.push(column);

        assert!(board.column(column_id).is_some());
        assert!(board.contains_card(card_id));
        assert_eq!(board.card_count(), 1);
        assert!(!board.contains_card(Uuid::new_v4()));
    }

    #[test]
    fn test_set_title_updates_updated_at() {
        let mut board = Board::new("Sprint 1".to_string());
        let initial_updated_at = board.updated_at;

        std::thread::sleep(std::time::Duration::from_millis(10));
        board.set_title("Sprint 2".to_string());

        assert_eq!(board.title, "Sprint 2");
        assert!(board.updated_at > initial_updated_at);
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Card::new("First".to_string());
        let b = Card::new("First".to_string());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut snapshot = Snapshot::new();
        let mut board = Board::new("Sprint 1".to_string());
        let mut column = Column::new("Todo".to_string());
        column.cards.push(Card::new("Card A".to_string()));
        column.cards.push(Card::new("Card B".to_string()));
        board.columns.push(column);
        snapshot.boards.push(board);

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: Snapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.schema_version, snapshot.schema_version);
        assert_eq!(restored.boards.len(), 1);
        assert_eq!(restored.boards[0].title, "Sprint 1");
        assert_eq!(restored.boards[0].columns[0].cards.len(), 2);
        assert_eq!(restored.boards[0].columns[0].cards[0].content, "Card A");
        assert_eq!(restored.boards[0].columns[0].cards[1].content, "Card B");
    }

    #[test]
    fn test_unversioned_snapshot_deserializes_as_version_one() {
        let old_json = r#"{ "boards": [] }"#;
        let snapshot: Snapshot = serde_json::from_str(old_json).unwrap();
        assert_eq!(snapshot.schema_version, 1);
    }
}
