use std::collections::HashMap;

use komaban::errors::{KomaError, SessionError, TurnError};
use komaban::{
    Board, BoardCell, Game, GameConfig, Orientation, Player, Position, Session, Tile, TileBag, Word,
};

fn tile(face: char, variants: &str, points: u32) -> Tile {
    Tile::new(face.to_string(), std::iter::once(face).chain(variants.chars()), points, None).unwrap()
}

fn ka() -> Tile {
    tile('か', "が", 1)
}

fn ki() -> Tile {
    tile('き', "ぎ", 1)
}

fn sa() -> Tile {
    tile('さ', "ざ", 2)
}

fn game(hands: Vec<Vec<Tile>>, bonuses: HashMap<Position, BoardCell>, bag: Vec<Tile>) -> Game {
    let players = hands
        .into_iter()
        .zip(["A", "B", "C"])
        .map(|(hand, name)| Player::with_hand(name, hand))
        .collect();
    let board = Board::empty(15, bonuses).unwrap();
    Game::new(players, board, TileBag::new(bag, Some(7)), 7).unwrap()
}

fn word(characters: &str, tiles: Vec<Tile>, row: usize, col: usize, orientation: Orientation) -> Word {
    Word::new(characters, tiles, Position::new(row, col), orientation).unwrap()
}

#[test]
fn test_two_player_turn_end_to_end() {
    let mut game = game(
        vec![vec![ka(), ki(), sa()], vec![sa()]],
        HashMap::new(),
        vec![sa(); 10],
    );

    let summary = game
        .play_turn(&[word("かき", vec![ka(), ki()], 7, 7, Orientation::Horizontal)])
        .unwrap();
    assert_eq!(summary.player, "A");
    assert_eq!(summary.points, 2);
    assert_eq!(summary.tiles_placed, 2);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.players[0].score, 2);
    assert_eq!(snapshot.board[7][7], ka());
    assert_eq!(snapshot.board[7][8], ki());
    assert_eq!(snapshot.words.len(), 1);
    assert_eq!(snapshot.current_turn, 1);

    // the spent tiles left the hand, which was then topped up from the bag
    let hand = &snapshot.players[0].hand;
    assert_eq!(hand.len(), 7);
    assert!(!hand.contains(&ka()));
    assert!(!hand.contains(&ki()));
    assert_eq!(snapshot.tiles_in_bag, 4);
}

#[test]
fn test_triple_word_bonus_is_consumed() {
    let mut bonuses = HashMap::new();
    bonuses.insert(Position::new(0, 0), BoardCell::TripleWord);
    let mut game = game(vec![vec![ka(); 3], vec![ka()]], bonuses, Vec::new());

    let summary = game
        .play_turn(&[word("かかか", vec![ka(); 3], 0, 0, Orientation::Horizontal)])
        .unwrap();
    assert_eq!(summary.points, 9);
    assert_eq!(game.snapshot().bonus_at(Position::new(0, 0)), None);

    // a later word through the same cell scores it plainly
    let summary = game
        .play_turn(&[word("かか", vec![ka(); 2], 0, 0, Orientation::Vertical)])
        .unwrap();
    assert_eq!(summary.points, 2);
    assert_eq!(summary.tiles_placed, 1);
}

#[test]
fn test_shared_bonus_cell_counts_for_the_first_word_only() {
    let mut bonuses = HashMap::new();
    bonuses.insert(Position::new(1, 1), BoardCell::TripleWord);
    let mut game = game(vec![vec![ka(), ki(), ki()]], bonuses, Vec::new());

    let across = word("かき", vec![ka(), ki()], 1, 1, Orientation::Horizontal);
    let down = word("かき", vec![ka(), ki()], 1, 1, Orientation::Vertical);
    let summary = game.play_turn(&[across, down]).unwrap();

    // (1 + 1) * 3 across, then 1 + 1 down
    assert_eq!(summary.points, 8);
    assert_eq!(summary.tiles_placed, 3);
    assert_eq!(game.snapshot().bonus_at(Position::new(1, 1)), None);
}

#[test]
fn test_letter_and_word_bonuses_combine() {
    let mut bonuses = HashMap::new();
    bonuses.insert(Position::new(4, 4), BoardCell::TripleLetter);
    bonuses.insert(Position::new(4, 5), BoardCell::DoubleWord);
    let mut game = game(vec![vec![ka(), sa()]], bonuses, Vec::new());

    // (1 * 3 + 2) * 2
    let summary = game
        .play_turn(&[word("かさ", vec![ka(), sa()], 4, 4, Orientation::Horizontal)])
        .unwrap();
    assert_eq!(summary.points, 10);
    assert!(game.snapshot().bonus_cells.is_empty());
}

#[test]
fn test_rejected_turn_leaves_state_unchanged() {
    let mut game = game(vec![vec![ka()], vec![ki()]], HashMap::new(), vec![sa(); 3]);
    let before = game.snapshot();

    // second copy of か is not in the hand
    let err = game
        .play_turn(&[word("かか", vec![ka(), ka()], 2, 2, Orientation::Horizontal)])
        .unwrap_err();
    assert!(matches!(err, TurnError::MissingHandTile { .. }));
    assert_eq!(game.snapshot(), before);
}

#[test]
fn test_word_past_the_last_column_is_rejected() {
    let mut game = game(vec![vec![ka(), ka(), ka()]], HashMap::new(), Vec::new());
    let before = game.snapshot();

    let err = game
        .play_turn(&[word("かかか", vec![ka(); 3], 5, 13, Orientation::Horizontal)])
        .unwrap_err();
    assert!(matches!(err, TurnError::OutOfBounds { .. }));
    assert_eq!(game.snapshot(), before);

    // ending exactly on the last column fits
    let summary = game
        .play_turn(&[word("かか", vec![ka(); 2], 5, 13, Orientation::Horizontal)])
        .unwrap();
    assert_eq!(summary.tiles_placed, 2);
    assert_eq!(game.snapshot().board[5][14], ka());
}

#[test]
fn test_claimed_cell_must_hold_the_same_tile() {
    let mut game = game(vec![vec![ka(), ka()], vec![ki(), ki()]], HashMap::new(), Vec::new());
    game.play_turn(&[word("かか", vec![ka(); 2], 3, 3, Orientation::Horizontal)])
        .unwrap();
    let before = game.snapshot();

    let err = game
        .play_turn(&[word("きき", vec![ki(); 2], 3, 3, Orientation::Vertical)])
        .unwrap_err();
    assert!(matches!(err, TurnError::SlotMismatch { position, .. } if position == Position::new(3, 3)));
    assert_eq!(game.snapshot(), before);
}

#[test]
fn test_all_words_are_checked_before_anything_commits() {
    let mut game = game(vec![vec![ka(), ka(), ki()]], HashMap::new(), vec![sa(); 5]);
    let before = game.snapshot();

    let words = [
        word("かか", vec![ka(); 2], 0, 0, Orientation::Horizontal),
        word("きき", vec![ki(); 2], 4, 4, Orientation::Vertical),
    ];
    assert!(game.play_turn(&words).is_err());
    assert_eq!(game.snapshot(), before);
    assert_eq!(game.tiles_in_bag(), 5);
}

#[test]
fn test_refill_stops_at_an_empty_bag() {
    let mut game = game(vec![vec![ka(), ki(), sa()]], HashMap::new(), vec![sa()]);

    let summary = game
        .play_turn(&[word("かき", vec![ka(), ki()], 1, 1, Orientation::Horizontal)])
        .unwrap();
    assert_eq!(summary.tiles_drawn, 1);
    assert_eq!(game.players()[0].hand().len(), 2);
    assert_eq!(game.tiles_in_bag(), 0);

    let summary = game.pass_turn();
    assert_eq!(summary.tiles_drawn, 0);
    assert!(game.players()[0].hand().len() <= game.hand_capacity());
}

#[test]
fn test_tile_equality_ignores_face() {
    let plain = Tile::new("か", ['か', 'が'], 1, None).unwrap();
    let relabelled = Tile::new("が", ['が', 'か'], 1, None).unwrap();
    assert_eq!(plain, relabelled);
    assert_ne!(plain, Tile::new("か", ['か', 'が'], 2, None).unwrap());
}

#[test]
fn test_wildcard_is_played_resolved() {
    let wildcard = Tile::new("", ['か', 'き', 'さ'], 0, None).unwrap();
    let resolved = Tile::new("き", ['か', 'き', 'さ'], 0, Some('き')).unwrap();
    let mut game = game(vec![vec![ka(), wildcard.clone()]], HashMap::new(), Vec::new());

    let summary = game
        .play_turn(&[word("かき", vec![ka(), resolved.clone()], 6, 6, Orientation::Horizontal)])
        .unwrap();
    assert_eq!(summary.points, 1);

    let snapshot = game.snapshot();
    assert_eq!(snapshot.board[6][7], resolved);
    assert!(snapshot.players[0].hand.is_empty());
}

#[test]
fn test_seeded_session_plays_a_dealt_word() {
    let mut session = Session::new(GameConfig::seeded(11));
    session.join("A").unwrap();
    session.join("B").unwrap();
    let start = session.start_game().unwrap().snapshot();
    assert!(start.players.iter().all(|p| p.hand.len() == 7 && p.score == 0));

    // spell whatever the first two dealt tiles can stand for
    let tiles = start.players[0].hand[..2].to_vec();
    let characters: String = tiles
        .iter()
        .map(|t| *t.representable().iter().next().unwrap())
        .collect();
    let across = word(&characters, tiles.clone(), 7, 7, Orientation::Horizontal);

    let err = session.submit_turn("B", &[across.clone()]).unwrap_err();
    assert!(matches!(err, KomaError::Session(SessionError::NotPlayersTurn { .. })));

    let summary = session.submit_turn("A", &[across]).unwrap();
    // the centre cell doubles the word
    let expected = (tiles[0].points() + tiles[1].points()) * 2;
    assert_eq!(summary.points, expected);
    assert_eq!(summary.tiles_placed, 2);
    assert_eq!(summary.tiles_drawn, 2);

    let after = session.snapshot().unwrap();
    assert_eq!(after.players[0].score, expected);
    assert_eq!(after.players[0].hand.len(), 7);
    assert_eq!(after.board[7][7], tiles[0]);
    assert_eq!(after.board[7][8], tiles[1]);
    assert_eq!(after.bonus_at(Position::new(7, 7)), None);
    assert_eq!(after.tiles_in_bag, start.tiles_in_bag - 2);
    assert_eq!(after.current_turn, 1);
}
