//! Board tests - grid queries, footprints and atomic placement

use drop_merge::core::{Board, BoardGeometry};
use drop_merge::types::{BOARD_WIDTH, SPAWN_BUFFER, TILE_SIZE};

#[test]
fn test_board_new_empty() {
    let board = Board::default();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.visible_height(), 12);
    assert_eq!(board.height(), 12 + SPAWN_BUFFER);

    for y in 0..board.height() as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert!(board.is_in_bounds(x, y), "Cell ({}, {}) should exist", x, y);
            assert!(!board.is_occupied(x, y));
        }
    }
    assert!(board.all_tiles().is_empty());
}

#[test]
fn test_geometry_is_per_instance() {
    let small = Board::new(BoardGeometry { visible_height: 4 });
    let tall = Board::new(BoardGeometry { visible_height: 20 });
    assert_eq!(small.height(), 6);
    assert_eq!(tall.height(), 22);
    assert!(!small.is_in_bounds(0, 6));
    assert!(tall.is_in_bounds(0, 6));
}

#[test]
fn test_bounds_and_visible_bounds() {
    let board = Board::default();
    assert!(!board.is_in_bounds(-1, 0));
    assert!(!board.is_in_bounds(0, -1));
    assert!(!board.is_in_bounds(BOARD_WIDTH as i8, 0));
    assert!(!board.is_in_bounds(0, board.height() as i8));

    // Spawn buffer rows exist but are not visible
    assert!(board.is_in_bounds(0, 0));
    assert!(!board.is_in_visible_bounds(0, 0));
    assert!(!board.is_in_visible_bounds(0, SPAWN_BUFFER as i8 - 1));
    assert!(board.is_in_visible_bounds(0, SPAWN_BUFFER as i8));
}

#[test]
fn test_visible_lookup_hides_spawn_buffer() {
    let mut board = Board::default();
    let buffered = board.create_tile(1, 0, 0);
    assert!(board.place_tile(buffered));
    let visible = board.create_tile(2, 4, Board::to_grid_y(0));
    assert!(board.place_tile(visible));

    assert_eq!(board.get(0, 0), Some(buffered));
    assert_eq!(board.get_visible(0, -2), None);
    assert_eq!(board.get_visible(4, 0), Some(visible));
    assert_eq!(board.get_visible(5, 1), Some(visible));
    assert_eq!(board.get_visible(4, 12), None);
}

#[test]
fn test_place_covers_whole_footprint() {
    let mut board = Board::default();
    let id = board.create_tile(3, 2, 6);
    assert!(board.can_place_tile(2, 6));
    assert!(board.place_tile(id));

    for (x, y) in [(2, 6), (3, 6), (2, 7), (3, 7)] {
        assert_eq!(board.get(x, y), Some(id));
    }
    assert!(!board.is_occupied(4, 6));
    assert!(!board.can_place_tile(3, 7));
    assert_eq!(board.all_tiles().len(), (TILE_SIZE * TILE_SIZE) as usize);
    assert_eq!(board.distinct_tiles(), vec![id]);
}

#[test]
fn test_blocked_place_changes_nothing() {
    let mut board = Board::default();
    let blocker = board.create_tile(1, 4, 8);
    assert!(board.place_tile(blocker));

    // Overlaps the blocker in one corner only
    let id = board.create_tile(2, 5, 9);
    assert!(!board.place_tile(id));
    assert!(!board.is_occupied(6, 9));
    assert!(!board.is_occupied(6, 10));
    assert!(!board.is_occupied(5, 10));
    assert_eq!(board.distinct_tiles(), vec![blocker]);

    // Hanging off the right edge
    let edge = board.create_tile(2, 9, 4);
    assert!(!board.place_tile(edge));
    assert!(!board.is_occupied(9, 4));
}

#[test]
fn test_remove_only_clears_own_cells() {
    let mut board = Board::default();
    let id = board.create_tile(1, 0, 4);
    assert!(board.place_tile(id));
    board.remove_tile_from_grid(id);
    assert!(board.all_tiles().is_empty());
    // Still allocated, just not on the grid
    assert!(board.tile(id).is_some());
    assert!(!board.is_at_recorded_position(id));

    let other = board.create_tile(2, 0, 4);
    assert!(board.place_tile(other));
    board.remove_tile_from_grid(id);
    assert_eq!(board.get(0, 4), Some(other));
}

#[test]
fn test_released_ids_are_stale() {
    let mut board = Board::default();
    let id = board.create_tile(1, 0, 4);
    assert!(board.place_tile(id));
    assert!(board.release_tile(id).is_some());
    assert!(board.tile(id).is_none());
    assert!(board.release_tile(id).is_none());

    // The slot is reused under a new generation
    let reused = board.create_tile(1, 0, 4);
    assert_eq!(reused.index(), id.index());
    assert_ne!(reused, id);
    assert!(board.place_tile(reused));
    assert!(!board.is_at_recorded_position(id));
}

#[test]
fn test_move_tile_is_atomic() {
    let mut board = Board::default();
    let id = board.create_tile(1, 0, 4);
    assert!(board.place_tile(id));
    let wall = board.create_tile(2, 2, 8);
    assert!(board.place_tile(wall));

    assert!(board.move_tile(0, 4, 0, 8));
    assert!(!board.is_occupied(0, 4));
    assert_eq!(board.get(1, 9), Some(id));

    // Overlapping the wall fails and leaves the tile in place
    assert!(!board.move_tile(0, 8, 1, 8));
    assert_eq!(board.tile(id).unwrap().position(), (0, 8));
    assert_eq!(board.get(0, 8), Some(id));
    assert_eq!(board.get(2, 8), Some(wall));

    // Only the anchor cell can start a move
    assert!(!board.move_tile(1, 9, 0, 10));
}

#[test]
fn test_clear_and_max_exponent() {
    let mut board = Board::default();
    assert_eq!(board.max_exponent(), None);
    for (k, x) in [(1, 0), (7, 2), (3, 4)] {
        let id = board.create_tile(k, x, 12);
        assert!(board.place_tile(id));
    }
    assert_eq!(board.tile_count(), 3);
    assert_eq!(board.max_exponent(), Some(7));

    board.clear();
    assert_eq!(board.tile_count(), 0);
    assert_eq!(board.max_exponent(), None);
}

#[test]
fn test_exponent_rows() {
    let mut board = Board::new(BoardGeometry { visible_height: 4 });
    let id = board.create_tile(5, 8, 4);
    assert!(board.place_tile(id));
    let rows = board.exponent_rows();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[2], vec![0, 0, 0, 0, 0, 0, 0, 0, 5, 5]);
    assert_eq!(rows[0], vec![0; 10]);
}
