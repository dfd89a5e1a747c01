//! Domain-agnostic tests for the alpha-beta search algorithm using Nim.
//!
//! Test coverage:
//! - Basic search functionality (winning moves, losing positions, game completion)
//! - Error handling (zero depth, no moves, time budget)
//! - Timeouts in the middle of a pass
//! - Transposition and PV tables
//! - Killer moves
//! - Aspiration re-search, quiescence search and search options
//! - Win scoring and early termination

use super::*;
use std::cell::{Cell, RefCell};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

/// State of a Nim game: players take 1-3 objects, last to take wins.
#[derive(Clone, Debug)]
struct NimState {
    pile: u8,
    is_player_one_turn: bool,
}

impl NimState {
    fn new(pile: u8) -> Self {
        Self {
            pile,
            is_player_one_turn: true,
        }
    }
}

impl GameState for NimState {
    fn position_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.pile.hash(&mut hasher);
        self.is_player_one_turn.hash(&mut hasher);
        hasher.finish()
    }

    fn is_maximizing_player(&self) -> bool {
        self.is_player_one_turn
    }

    fn toggle_turn(&mut self) {
        self.is_player_one_turn = !self.is_player_one_turn;
    }
}

#[derive(Clone, Debug, PartialEq)]
struct NimMove {
    take: u8,
}

impl GameMove for NimMove {
    type State = NimState;
    type Error = &'static str;

    fn apply(&self, state: &mut NimState) -> Result<(), Self::Error> {
        if self.take > state.pile || self.take == 0 || self.take > 3 {
            return Err("Invalid move");
        }
        state.pile -= self.take;
        Ok(())
    }

    fn undo(&self, state: &mut NimState) -> Result<(), Self::Error> {
        state.pile += self.take;
        Ok(())
    }

    // Emptying the pile is the only forcing move in Nim.
    fn is_tactical(&self, state: &mut NimState) -> bool {
        self.take == state.pile
    }

    fn is_winning(&self, state: &mut NimState) -> bool {
        state.pile == 0
    }
}

#[derive(Clone)]
struct NimMoveGenerator;

impl MoveGenerator<NimState> for NimMoveGenerator {
    type Move = NimMove;
    type MoveList = Vec<NimMove>;

    fn generate_moves(&self, state: &mut NimState) -> Vec<NimMove> {
        if state.pile == 0 {
            return vec![];
        }
        (1..=std::cmp::min(3, state.pile))
            .map(|take| NimMove { take })
            .collect()
    }
}

#[derive(Clone)]
struct NimEvaluator;

impl Evaluator<NimState> for NimEvaluator {
    fn evaluate(&self, state: &mut NimState) -> i32 {
        // pile % 4 == 0 is a losing position for the player to move
        let mover_is_losing = state.pile % 4 == 0;
        if mover_is_losing == state.is_player_one_turn {
            -100
        } else {
            100
        }
    }
}

/// Puts the PV move first and the killers after it, otherwise keeps the
/// generator's order. Remembers the hints it was handed.
struct HintOrderer<M> {
    root_pv: RefCell<Vec<Option<M>>>,
    killer_hints: Cell<usize>,
}

impl<M> HintOrderer<M> {
    fn new() -> Self {
        Self {
            root_pv: RefCell::new(Vec::new()),
            killer_hints: Cell::new(0),
        }
    }
}

impl<S: GameState, M: Clone + PartialEq> MoveOrderer<S, M> for HintOrderer<M> {
    fn order_moves(&self, moves: &mut [M], _state: &mut S, hints: &OrderingHints<M>) {
        if hints.ply == 0 {
            self.root_pv.borrow_mut().push(hints.pv_move.cloned());
        }
        if hints.killers.iter().any(Option::is_some) {
            self.killer_hints.set(self.killer_hints.get() + 1);
        }

        if let Some(pv) = hints.pv_move {
            if let Some(pos) = moves.iter().position(|m| m == pv) {
                moves[0..=pos].rotate_right(1);
            }
        }
        let killer_start = if hints.pv_move.is_some() { 1 } else { 0 };
        for killer in hints.killers.iter().flatten().rev() {
            if Some(killer) == hints.pv_move {
                continue;
            }
            if let Some(pos) = moves.iter().position(|m| m == killer) {
                if pos > killer_start {
                    moves[killer_start..=pos].rotate_right(1);
                }
            }
        }
    }
}

/// Tries the largest take first.
struct GreedyOrderer;

impl MoveOrderer<NimState, NimMove> for GreedyOrderer {
    fn order_moves(
        &self,
        moves: &mut [NimMove],
        _state: &mut NimState,
        _hints: &OrderingHints<NimMove>,
    ) {
        moves.sort_by(|a, b| b.take.cmp(&a.take));
    }
}

fn search_with(
    context: &mut SearchContext<NimMove>,
    state: &mut NimState,
    orderer: &HintOrderer<NimMove>,
) -> Result<NimMove, SearchError> {
    alpha_beta_search(context, state, &NimMoveGenerator, &NimEvaluator, orderer)
}

fn search(context: &mut SearchContext<NimMove>, state: &mut NimState) -> Result<NimMove, SearchError> {
    search_with(context, state, &HintOrderer::new())
}

const TREE_WIDTH: u8 = 30;

/// An endless game with `TREE_WIDTH` moves everywhere, where no two move
/// sequences reach the same position.
struct TreeState {
    path: Vec<u8>,
}

impl GameState for TreeState {
    fn position_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.path.hash(&mut hasher);
        hasher.finish()
    }

    fn is_maximizing_player(&self) -> bool {
        self.path.len() % 2 == 0
    }

    // the side to move follows from the path length
    fn toggle_turn(&mut self) {}
}

#[derive(Clone, Debug, PartialEq)]
struct Branch(u8);

impl GameMove for Branch {
    type State = TreeState;
    type Error = &'static str;

    fn apply(&self, state: &mut TreeState) -> Result<(), Self::Error> {
        state.path.push(self.0);
        Ok(())
    }

    fn undo(&self, state: &mut TreeState) -> Result<(), Self::Error> {
        state.path.pop().map(|_| ()).ok_or("nothing to undo")
    }
}

struct TreeMoveGenerator;

impl MoveGenerator<TreeState> for TreeMoveGenerator {
    type Move = Branch;
    type MoveList = Vec<Branch>;

    fn generate_moves(&self, _state: &mut TreeState) -> Vec<Branch> {
        (0..TREE_WIDTH).map(Branch).collect()
    }
}

/// Scores leaves pseudo-randomly. The first leaf deeper than `fast_depth`
/// stalls for `stall`, so the passes up to `fast_depth` finish at once and
/// the next one runs out of time.
struct StallingEvaluator {
    fast_depth: usize,
    stall: Duration,
    stalled: Cell<bool>,
}

impl Evaluator<TreeState> for StallingEvaluator {
    fn evaluate(&self, state: &mut TreeState) -> i32 {
        if state.path.len() > self.fast_depth && !self.stalled.get() {
            self.stalled.set(true);
            std::thread::sleep(self.stall);
        }
        (state.position_hash() % 201) as i32 - 100
    }
}

#[test]
fn test_nim_finds_winning_move_from_5() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::<NimMove>::new(10);

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(
        best_move.take, 1,
        "From pile of 5, should take 1 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_6() {
    let mut state = NimState::new(6);
    let mut context = SearchContext::<NimMove>::new(10);

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(
        best_move.take, 2,
        "From pile of 6, should take 2 to leave opponent with 4"
    );
}

#[test]
fn test_nim_finds_winning_move_from_7() {
    let mut state = NimState::new(7);
    let mut context = SearchContext::<NimMove>::new(10);

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(
        best_move.take, 3,
        "From pile of 7, should take 3 to leave opponent with 4"
    );
}

#[test]
fn test_nim_minimizing_player_finds_winning_move() {
    let mut state = NimState {
        pile: 6,
        is_player_one_turn: false,
    };
    let mut context = SearchContext::<NimMove>::new(10);

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(best_move.take, 2);
    let score = context.last_score().unwrap();
    assert!(score < 0 && is_win_score(score));
}

#[test]
fn test_nim_losing_position() {
    let mut state = NimState::new(4);
    let mut context = SearchContext::<NimMove>::new(10);

    let result = search(&mut context, &mut state);

    assert!(
        result.is_ok(),
        "Should return a move even from losing position"
    );
    let score = context.last_score().unwrap();
    assert!(score < 0 && is_win_score(score), "score {}", score);
    assert_eq!(state.pile, 4, "search must restore the state");
}

#[test]
fn test_nim_takes_last_objects() {
    let mut state = NimState::new(3);
    let mut context = SearchContext::<NimMove>::new(3);

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(best_move.take, 3);
    assert_eq!(context.last_score(), Some(WIN_SCORE));
    assert_eq!(context.completed_depth(), 1);
}

#[test]
fn test_nim_play_to_completion() {
    let mut state = NimState::new(21);
    let mut context = SearchContext::<NimMove>::new(8);
    let mut last_mover_was_player_one = false;

    while state.pile > 0 {
        context.reset_stats();
        let best_move = search(&mut context, &mut state).unwrap();
        last_mover_was_player_one = state.is_player_one_turn;
        best_move.apply(&mut state).unwrap();
        state.toggle_turn();
    }

    assert!(
        last_mover_was_player_one,
        "player one starts on a winning pile and must take the last object"
    );
}

#[test]
fn test_forced_win_stops_iterative_deepening() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::<NimMove>::new(10);
    context.set_options(SearchOptions {
        quiescence: false,
        ..SearchOptions::default()
    });

    search(&mut context, &mut state).unwrap();

    // take 1, any reply, take the rest: the win is visible from depth 3
    assert_eq!(context.completed_depth(), 3);
    assert_eq!(context.last_score(), Some(WIN_SCORE - 2 * WIN_PLY_PENALTY));
}

#[test]
fn test_zero_depth_errors() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::<NimMove>::new(0);

    assert_eq!(
        search(&mut context, &mut state),
        Err(SearchError::DepthTooLow)
    );
}

#[test]
fn test_no_moves_errors() {
    let mut state = NimState::new(0);
    let mut context = SearchContext::<NimMove>::new(3);

    assert_eq!(
        search(&mut context, &mut state),
        Err(SearchError::NoAvailableMoves)
    );
}

#[test]
fn test_spent_time_budget_errors() {
    let mut state = NimState::new(9);
    let mut context = SearchContext::<NimMove>::with_time_budget(6, Duration::from_secs(0));

    assert_eq!(
        search(&mut context, &mut state),
        Err(SearchError::TimeExceeded)
    );
    assert_eq!(state.pile, 9);
}

#[test]
fn test_timeout_mid_pass_keeps_last_completed_depth() {
    let mut state = TreeState { path: Vec::new() };
    let budget = Duration::from_millis(500);
    let mut context = SearchContext::<Branch>::with_time_budget(6, budget);
    context.set_options(SearchOptions {
        quiescence: false,
        late_move_reductions: false,
        ..SearchOptions::default()
    });
    let evaluator = StallingEvaluator {
        fast_depth: 3,
        stall: budget + Duration::from_millis(100),
        stalled: Cell::new(false),
    };
    let orderer = HintOrderer::new();

    let best_move =
        alpha_beta_search(&mut context, &mut state, &TreeMoveGenerator, &evaluator, &orderer)
            .unwrap();

    assert!(evaluator.stalled.get());
    assert!(context.timed_out());
    assert_eq!(context.completed_depth(), 3);
    // the answer is depth 3's, which depth 4 was handed as its PV move
    let root_pv = orderer.root_pv.borrow();
    assert_eq!(root_pv.len(), 4);
    assert_eq!(root_pv[3], Some(best_move));
    assert!(state.path.is_empty());
}

#[test]
fn test_generous_time_budget_completes_all_depths() {
    let mut state = NimState::new(8);
    let mut context = SearchContext::<NimMove>::with_time_budget(4, Duration::from_secs(60));

    search(&mut context, &mut state).unwrap();

    assert!(!context.timed_out());
    assert_eq!(context.completed_depth(), 4);
    assert!(context.last_search_duration().is_some());
}

#[test]
fn test_transposition_table_reduces_search() {
    let mut state = NimState::new(8);
    let mut context = SearchContext::<NimMove>::new(6);

    search(&mut context, &mut state).unwrap();
    let first_count = context.searched_position_count();
    assert!(context.tt_stores() > 0);

    // tables and counters carry over until reset_stats
    search(&mut context, &mut state).unwrap();
    let second_count = context.searched_position_count() - first_count;

    assert!(
        second_count < first_count,
        "warm table should visit fewer nodes ({} vs {})",
        second_count,
        first_count
    );
    assert!(context.tt_hits() > 0);
}

#[test]
fn test_pv_move_leads_the_next_pass() {
    let mut state = NimState::new(6);
    let mut context = SearchContext::<NimMove>::new(4);
    let orderer = HintOrderer::new();

    let best_move = search_with(&mut context, &mut state, &orderer).unwrap();

    let root_pv = orderer.root_pv.borrow();
    assert_eq!(root_pv[0], None);
    assert!(root_pv.len() >= 2);
    assert!(root_pv[1..].iter().all(|pv| pv.as_ref() == Some(&best_move)));

    // a second search starts from the stored PV move
    let orderer = HintOrderer::new();
    search_with(&mut context, &mut state, &orderer).unwrap();
    assert_eq!(orderer.root_pv.borrow()[0], Some(best_move));
}

#[test]
fn test_reset_stats_clears_tables() {
    let mut state = NimState::new(6);
    let mut context = SearchContext::<NimMove>::new(4);
    search(&mut context, &mut state).unwrap();
    assert!(context.searched_position_count() > 0);

    context.reset_stats();

    assert_eq!(context.searched_position_count(), 0);
    assert_eq!(context.tt_hits(), 0);
    assert_eq!(context.completed_depth(), 0);
    assert_eq!(context.last_score(), None);

    let orderer = HintOrderer::new();
    search_with(&mut context, &mut state, &orderer).unwrap();
    assert_eq!(orderer.root_pv.borrow()[0], None);
}

#[test]
fn test_cutoff_moves_become_killer_hints() {
    let mut state = NimState::new(11);
    let mut context = SearchContext::<NimMove>::new(6);
    let orderer = HintOrderer::new();

    search_with(&mut context, &mut state, &orderer).unwrap();

    assert!(context.cutoffs() > 0);
    assert!(orderer.killer_hints.get() > 0);
}

#[test]
fn test_search_counts_cutoffs() {
    let mut state = NimState::new(11);
    let mut context = SearchContext::<NimMove>::new(6);

    search(&mut context, &mut state).unwrap();

    assert!(context.cutoffs() > 0);
    assert!(context.tt_lookups() > 0);
}

#[test]
fn test_aspiration_miss_is_searched_again() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::<NimMove>::new(10);
    context.set_options(SearchOptions {
        quiescence: false,
        ..SearchOptions::default()
    });

    let best_move = search(&mut context, &mut state).unwrap();

    // depths 1 and 2 score 100, depth 3 sees the win far above the window
    assert_eq!(best_move.take, 1);
    assert_eq!(context.aspiration_researches(), 1);
    assert_eq!(context.last_score(), Some(WIN_SCORE - 2 * WIN_PLY_PENALTY));

    let mut context = SearchContext::<NimMove>::new(10);
    context.set_options(SearchOptions {
        quiescence: false,
        aspiration_window: false,
        ..SearchOptions::default()
    });
    assert_eq!(search(&mut context, &mut state), Ok(best_move));
    assert_eq!(context.aspiration_researches(), 0);
    assert_eq!(context.last_score(), Some(WIN_SCORE - 2 * WIN_PLY_PENALTY));
}

#[test]
fn test_root_win_skips_remaining_moves() {
    let mut state = NimState::new(3);
    let mut context = SearchContext::<NimMove>::new(2);

    let best_move = alpha_beta_search(
        &mut context,
        &mut state,
        &NimMoveGenerator,
        &NimEvaluator,
        &GreedyOrderer,
    )
    .unwrap();

    assert_eq!(best_move.take, 3);
    assert_eq!(context.last_score(), Some(WIN_SCORE));
    // taking all three wins on the spot, so taking two or one is never searched
    assert_eq!(context.searched_position_count(), 0);
}

#[test]
fn test_quiescence_sees_past_horizon() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::<NimMove>::new(2);

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(best_move.take, 1);
    assert!(context.quiescence_nodes() > 0);
    assert_eq!(context.last_score(), Some(WIN_SCORE - 2 * WIN_PLY_PENALTY));
}

#[test]
fn test_without_quiescence_horizon_is_static() {
    let mut state = NimState::new(5);
    let mut context = SearchContext::<NimMove>::new(2);
    context.set_options(SearchOptions {
        quiescence: false,
        ..SearchOptions::default()
    });

    let best_move = search(&mut context, &mut state).unwrap();

    assert_eq!(best_move.take, 1);
    assert_eq!(context.quiescence_nodes(), 0);
    assert_eq!(context.last_score(), Some(100));
}

#[test]
fn test_search_options_do_not_change_winning_move() {
    for pile in 5..=11 {
        if pile % 4 == 0 {
            continue;
        }
        let mut state = NimState::new(pile);
        let mut context = SearchContext::<NimMove>::new(8);
        context.set_options(SearchOptions {
            quiescence: false,
            late_move_reductions: false,
            aspiration_window: false,
        });

        let best_move = search(&mut context, &mut state).unwrap();
        assert_eq!(best_move.take, pile % 4, "pile {}", pile);
    }
}

#[test]
fn test_win_score_helpers() {
    assert!(is_win_score(WIN_SCORE));
    assert!(is_win_score(-(WIN_SCORE - 10 * WIN_PLY_PENALTY)));
    assert!(!is_win_score(WIN_SCORE - WIN_MARGIN - 1));
    assert!(!is_win_score(0));
}
