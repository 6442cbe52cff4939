//! Rules engine and enumerator properties over random playouts
//!
//! Each playout starts from a named layout and picks moves with a seeded RNG,
//! so failures are reproducible from the (layout, seed) pair in the message.

use abalone_core::{
    apply, legal_moves, resolve, summarize, BlockReason, Cell, Direction, Layout, Move, MoveError, MoveKind,
    Player, Position,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;

const PLAYOUT_PLIES: usize = 80;
const SEEDS: u64 = 6;

// ============================================================================
// TEST FIXTURES
// ============================================================================

fn cell(s: &str) -> Cell {
    s.parse().unwrap()
}

fn cells(list: &[&str]) -> Vec<Cell> {
    list.iter().map(|s| cell(s)).collect()
}

fn on_board(position: &Position) -> usize {
    position.marble_count(Player::Black) + position.marble_count(Player::White)
}

/// Check every property of one ply, then return the position after `chosen`
fn check_ply(position: &Position, player: Player, chosen: Move, context: &str) -> Position {
    let moves = legal_moves(position, player);
    let unique: HashSet<Move> = moves.iter().copied().collect();
    assert_eq!(unique.len(), moves.len(), "{context}: duplicate moves");

    for &mv in &moves {
        let (next, outcome) = apply(position, mv, player).unwrap_or_else(|e| panic!("{context}: {mv} rejected: {e}"));

        // Marble counts never grow and the mover never loses one
        assert_eq!(next.marble_count(player), position.marble_count(player), "{context}: {mv}");
        assert!(next.marble_count(player.opponent()) <= position.marble_count(player.opponent()));

        if outcome.pushoff {
            assert!(outcome.is_push());
            assert_eq!(on_board(&next), on_board(position) - 1, "{context}: {mv}");
            assert_eq!(next.captured(player), position.captured(player) + 1);
            assert_eq!(next.captured(player.opponent()), position.captured(player.opponent()));
        } else {
            assert_eq!(on_board(&next), on_board(position), "{context}: {mv}");
            assert_eq!(next.captured(player), position.captured(player));
        }

        // Notation identifies the same move again
        let text = mv.notation(outcome.is_push());
        assert_eq!(resolve(position, player, &text), Ok(mv), "{context}: {text}");
    }

    assert!(moves.contains(&chosen));
    apply(position, chosen, player).unwrap().0
}

// ============================================================================
// RANDOM PLAYOUTS
// ============================================================================

#[test]
fn test_random_playouts_keep_invariants() {
    for layout in Layout::ALL {
        for seed in 0..SEEDS {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut position = Position::from_layout(layout);
            let mut player = Player::Black;

            for ply in 0..PLAYOUT_PLIES {
                if position.winner().is_some() {
                    break;
                }
                let moves = legal_moves(&position, player);
                let Some(&chosen) = moves.choose(&mut rng) else {
                    break;
                };
                let context = format!("{} seed {seed} ply {ply}", layout.name());
                position = check_ply(&position, player, chosen, &context);
                player = player.opponent();
            }
        }
    }
}

#[test]
fn test_playouts_are_reproducible() {
    let play = |seed: u64| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut position = Position::standard();
        let mut player = Player::Black;
        let mut log = Vec::new();
        for _ in 0..30 {
            let moves = legal_moves(&position, player);
            let &mv = moves.choose(&mut rng).unwrap();
            log.push(mv.to_string());
            position = apply(&position, mv, player).unwrap().0;
            player = player.opponent();
        }
        (position, log)
    };
    assert_eq!(play(7), play(7));
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_standard_opening_partition() {
    let summary = summarize(&Position::standard(), Player::Black);
    assert_eq!(summary.legal, 44);
    let partition: Vec<usize> = MoveKind::ALL.iter().map(|&k| summary.count(k)).collect();
    assert_eq!(partition, vec![14, 12, 8, 8, 2]);
}

#[test]
fn test_single_step_into_empty_cell() {
    let mut position = Position::standard();
    position.set(cell("c5"), None);
    position.set(cell("e4"), Some(Player::Black));

    let mv: Move = "1:e4e5".parse().unwrap();
    assert_eq!(mv.direction(), Direction::E);
    let (next, outcome) = apply(&position, mv, Player::Black).unwrap();
    assert!(outcome.pushed.is_empty());
    assert!(!outcome.pushoff);
    assert_eq!(next.occupant(cell("e5")), Some(Player::Black));
    assert_eq!(next.occupant(cell("e4")), None);
}

#[test]
fn test_three_push_two() {
    let position = Position::from_marbles(&cells(&["e2", "e3", "e4"]), &cells(&["e5", "e6"]));
    let mv = Move::new(&cells(&["e2", "e3", "e4"]), Direction::E).unwrap();
    let (next, outcome) = apply(&position, mv, Player::Black).unwrap();

    assert_eq!(outcome.pushed, cells(&["e5", "e6"]));
    assert!(!outcome.pushoff);
    assert_eq!(next.occupant(cell("e2")), None);
    for c in ["e3", "e4", "e5"] {
        assert_eq!(next.occupant(cell(c)), Some(Player::Black), "{c}");
    }
    for c in ["e6", "e7"] {
        assert_eq!(next.occupant(cell(c)), Some(Player::White), "{c}");
    }
    assert_eq!(mv.notation(outcome.is_push()), "3:e2e5*");
}

#[test]
fn test_equal_run_is_blocked() {
    for (black, white) in [
        (vec!["e3"], vec!["e4"]),
        (vec!["e3", "e4"], vec!["e5", "e6"]),
        (vec!["e3", "e4"], vec!["e5", "e6", "e7"]),
        (vec!["e2", "e3", "e4"], vec!["e5", "e6", "e7"]),
    ] {
        let position = Position::from_marbles(&cells(&black), &cells(&white));
        let mv = Move::new(&cells(&black), Direction::E).unwrap();
        assert_eq!(
            apply(&position, mv, Player::Black),
            Err(MoveError::Blocked(BlockReason::Outnumbered)),
            "{black:?} vs {white:?}"
        );
        assert!(!legal_moves(&position, Player::Black).contains(&mv));
    }
}

#[test]
fn test_group_enumerated_once_from_either_end() {
    let position = Position::from_marbles(&cells(&["e4", "e5", "e6"]), &[]);
    let moves = legal_moves(&position, Player::Black);
    let triples: Vec<&Move> = moves.iter().filter(|m| m.count() == 3).collect();
    // Two inline directions and four broadside directions
    assert_eq!(triples.len(), 6);
    let forward = Move::new(&cells(&["e4", "e5", "e6"]), Direction::E).unwrap();
    let backward = Move::new(&cells(&["e6", "e5", "e4"]), Direction::E).unwrap();
    assert_eq!(forward, backward);
}
