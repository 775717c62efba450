use crate::domain::board::Board;
use crate::error::{KanriError, Result};
use uuid::Uuid;

/// Validates a board title: required, at least 2 characters.
pub fn validate_board_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(KanriError::validation("title", "Board title is required"));
    }
    if title.chars().count() < 2 {
        return Err(KanriError::validation(
            "title",
            "Board title must be at least 2 characters",
        ));
    }
    Ok(())
}

/// Validates a column title: required, at least 2 characters.
pub fn validate_column_title(title: &str) -> Result<()> {
    if title.is_empty() {
        return Err(KanriError::validation("title", "Column title is required"));
    }
    if title.chars().count() < 2 {
        return Err(KanriError::validation(
            "title",
            "Column title must be at least 2 characters",
        ));
    }
    Ok(())
}

/// Validates card content: required, at least 3 characters.
pub fn validate_card_content(content: &str) -> Result<()> {
    if content.is_empty() {
        return Err(KanriError::validation("content", "Card content is required"));
    }
    if content.chars().count() < 3 {
        return Err(KanriError::validation(
            "content",
            "Card content must be at least 3 characters",
        ));
    }
    Ok(())
}

/// Rejects a board title already used by another board, case-insensitively.
///
/// `exclude` carries the id of the board being renamed so that renaming a
/// board to its current title is not a collision.
pub fn ensure_unique_board_title(
    boards: &[Board],
    title: &str,
    exclude: Option<Uuid>,
) -> Result<()> {
    let wanted = title.to_lowercase();
    let taken = boards
        .iter()
        .filter(|b| Some(b.id) != exclude)
        .any(|b| b.title.to_lowercase() == wanted);
    if taken {
        return Err(KanriError::validation(
            "title",
            "A board with this title already exists",
        ));
    }
    Ok(())
}

/// Rejects a column title already used within the owning board,
/// case-insensitively. Same `exclude` contract as for boards.
pub fn ensure_unique_column_title(board: &Board, title: &str, exclude: Option<Uuid>) -> Result<()> {
    let wanted = title.to_lowercase();
    let taken = board
        .columns
        .iter()
        .filter(|c| Some(c.id) != exclude)
        .any(|c| c.title.to_lowercase() == wanted);
    if taken {
        return Err(KanriError::validation(
            "title",
            "A column with this title already exists in this board",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::Column;

    #[test]
    fn test_board_title_rules() {
        assert!(validate_board_title("Sprint 1").is_ok());
        assert!(validate_board_title("ab").is_ok());
        assert!(validate_board_title("a").is_err());
        assert!(validate_board_title("").is_err());
    }

    #[test]
    fn test_card_content_rules() {
        assert!(validate_card_content("abc").is_ok());
        assert!(validate_card_content("ab").is_err());
        assert!(validate_card_content("").is_err());
    }

    #[test]
    fn test_validation_errors_are_field_scoped() {
        let err = validate_card_content("").unwrap_err();
        assert!(err.is_validation());
        match err {
            KanriError::Validation { field, .. } => assert_eq!(field, "content"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_board_title_uniqueness_case_insensitive() {
        let boards = vec![Board::new("Sprint 1".to_string())];

        assert!(ensure_unique_board_title(&boards, "Sprint 2", None).is_ok());
        assert!(ensure_unique_board_title(&boards, "Sprint 1", None).is_err());
        assert!(ensure_unique_board_title(&boards, "sprint 1", None).is_err());
        assert!(ensure_unique_board_title(&boards, "SPRINT 1", None).is_err());
    }

    #[test]
    fn test_board_rename_to_own_title_allowed() {
        let boards = vec![Board::new("Sprint 1".to_string())];
        let id = boards[0].id;

        assert!(ensure_unique_board_title(&boards, "sprint 1", Some(id)).is_ok());
    }

    #[test]
    fn test_column_title_uniqueness_scoped_to_board() {
        let mut board = Board::new("Sprint 1".to_string());
        board.columns.push(Column::new("Todo".to_string()));
        let other = Board::new("Sprint 2".to_string());

        assert!(ensure_unique_column_title(&board, "todo", None).is_err());
        // The scope is the owning board only.
        assert!(ensure_unique_column_title(&other, "Todo", None).is_ok());
    }

    #[test]
    fn test_column_rename_excludes_self() {
        let mut board = Board::new("Sprint 1".to_string());
        board.columns.push(Column::new("Todo".to_string()));
        board.columns.push(Column::new("Doing".to_string()));
        let todo_id = board.columns[0].id;

        assert!(ensure_unique_column_title(&board, "Todo", Some(todo_id)).is_ok());
        assert!(ensure_unique_column_title(&board, "Doing", Some(todo_id)).is_err());
    }
}
