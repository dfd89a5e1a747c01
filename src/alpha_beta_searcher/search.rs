//! Alpha-beta search algorithm implementation.
//!
//! # Core Algorithm
//!
//! Alpha-beta pruning is an optimization of minimax search that maintains a window [alpha, beta]
//! representing the range of scores that matter. Moves that fall outside this window can be
//! pruned without affecting the final result. Both sides are searched by the same code with
//! the comparisons mirrored: the maximizing player raises alpha, the minimizing player lowers
//! beta.
//!
//! # Optimizations
//!
//! ## Iterative Deepening
//! Searches at increasing depths (1..target_depth). The best move of each completed pass is
//! stored in the PV table and tried first by the next, deeper pass.
//!
//! ## Aspiration Windows
//! From the second pass on, the root is searched with a window of `ASPIRATION_WINDOW` around
//! the previous score. A result outside the window is re-searched with an unbounded window.
//!
//! ## Transposition Table
//! Caches scores by position hash together with the depth searched and whether the score is
//! exact, a lower bound or an upper bound.
//!
//! ## Move Ordering
//! The game's `MoveOrderer` receives the PV move for the node and the killer moves for the ply,
//! and is told about every cutoff so it can keep its own history.
//!
//! ## Principal Variation Search and Late Move Reductions
//! The first move at a node is searched with the full window. Later moves are scouted with a
//! null window, at reduced depth when they come late in the ordering and are not tactical,
//! and only re-searched in full when the scout says they could beat the current bound.
//!
//! ## Quiescence Search
//! At the horizon, tactical moves are searched for up to `QUIESCENCE_DEPTH` more plies with
//! the static evaluation as a stand-pat baseline.
//!
//! ## Time Control
//! The clock is read every `TIME_CHECK_INTERVAL` nodes. Once the budget is spent every node
//! returns a neutral score, the pass in progress is discarded and the result of the last
//! completed pass is returned.

use std::cmp::{max, min};
use std::time::{Duration, Instant};

use log::debug;
use thiserror::Error;

use super::killer_moves::KillerMoves;
use super::pv_table::PvTable;
use super::transposition_table::{BoundType, TTLookup, TranspositionTable};
use super::{
    Evaluator, GameMove, GameState, MoveCollection, MoveGenerator, MoveOrderer, OrderingHints,
};

/// Score of a win found at the root. Wins further down the tree score `WIN_PLY_PENALTY`
/// less per ply so that faster wins are preferred.
pub const WIN_SCORE: i32 = 100_000;
pub const WIN_PLY_PENALTY: i32 = 50;
/// Scores within this distance of `WIN_SCORE` are treated as forced wins.
pub const WIN_MARGIN: i32 = 1_000;
pub const ASPIRATION_WINDOW: i32 = 500;
pub const QUIESCENCE_DEPTH: u8 = 3;
pub const TIME_CHECK_INTERVAL: usize = 1_000;

const INFINITY: i32 = 1_000_000;

#[derive(Error, Debug, PartialEq)]
pub enum SearchError {
    #[error("no available moves")]
    NoAvailableMoves,
    #[error("depth must be at least 1")]
    DepthTooLow,
    #[error("no search iteration completed within the time budget")]
    TimeExceeded,
}

/// Returns true for scores that can only come from a forced win for either side.
pub fn is_win_score(score: i32) -> bool {
    score.abs() >= WIN_SCORE - WIN_MARGIN
}

/// Score for a win by the player to move at `ply`.
fn win_score(maximizing_player: bool, ply: u8) -> i32 {
    let score = WIN_SCORE - WIN_PLY_PENALTY * ply as i32;
    if maximizing_player {
        score
    } else {
        -score
    }
}

/// Optional search features. All are enabled by default.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchOptions {
    pub quiescence: bool,
    pub late_move_reductions: bool,
    pub aspiration_window: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            quiescence: true,
            late_move_reductions: true,
            aspiration_window: true,
        }
    }
}

/// Search configuration parameters.
struct SearchConfig {
    depth: u8,
    time_budget: Option<Duration>,
    options: SearchOptions,
}

/// Statistics collected during search.
#[derive(Default)]
struct SearchStats {
    position_count: usize,
    quiescence_nodes: usize,
    tt_lookups: usize,
    tt_stores: usize,
    cutoffs: usize,
    aspiration_researches: usize,
    completed_depth: u8,
    last_score: Option<i32>,
    last_duration: Option<Duration>,
}

impl SearchStats {
    fn reset(&mut self) {
        *self = Self::default();
    }

    fn record_result(&mut self, score: i32, depth: u8, duration: Duration) {
        self.last_score = Some(score);
        self.completed_depth = depth;
        self.last_duration = Some(duration);
    }
}

pub struct SearchContext<M> {
    config: SearchConfig,
    stats: SearchStats,
    transposition_table: TranspositionTable,
    pv_table: PvTable<M>,
    killers: KillerMoves<M>,
    started_at: Instant,
    timed_out: bool,
}

impl<M: Clone + PartialEq> SearchContext<M> {
    pub fn new(depth: u8) -> Self {
        Self {
            config: SearchConfig {
                depth,
                time_budget: None,
                options: SearchOptions::default(),
            },
            stats: SearchStats::default(),
            transposition_table: TranspositionTable::default(),
            pv_table: PvTable::default(),
            killers: KillerMoves::new(depth),
            started_at: Instant::now(),
            timed_out: false,
        }
    }

    pub fn with_time_budget(depth: u8, time_budget: Duration) -> Self {
        let mut context = Self::new(depth);
        context.config.time_budget = Some(time_budget);
        context
    }

    pub fn set_search_depth(&mut self, depth: u8) {
        self.config.depth = depth;
    }

    pub fn set_time_budget(&mut self, time_budget: Option<Duration>) {
        self.config.time_budget = time_budget;
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        self.config.options = options;
    }

    pub fn options(&self) -> SearchOptions {
        self.config.options
    }

    /// Clears statistics and every table.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
        self.transposition_table.clear();
        self.pv_table.clear();
        self.killers.clear();
    }

    pub fn searched_position_count(&self) -> usize {
        self.stats.position_count
    }

    pub fn quiescence_nodes(&self) -> usize {
        self.stats.quiescence_nodes
    }

    pub fn search_depth(&self) -> u8 {
        self.config.depth
    }

    pub fn time_budget(&self) -> Option<Duration> {
        self.config.time_budget
    }

    /// Deepest iteration that finished inside the time budget during the last search.
    pub fn completed_depth(&self) -> u8 {
        self.stats.completed_depth
    }

    pub fn last_score(&self) -> Option<i32> {
        self.stats.last_score
    }

    pub fn last_search_duration(&self) -> Option<Duration> {
        self.stats.last_duration
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn cutoffs(&self) -> usize {
        self.stats.cutoffs
    }

    /// Passes whose score fell outside the aspiration window and were searched again.
    pub fn aspiration_researches(&self) -> usize {
        self.stats.aspiration_researches
    }

    pub fn tt_lookups(&self) -> usize {
        self.stats.tt_lookups
    }

    pub fn tt_hits(&self) -> usize {
        self.transposition_table.hits()
    }

    pub fn tt_stores(&self) -> usize {
        self.stats.tt_stores
    }

    fn begin_search(&mut self) {
        let depth = self.config.depth;
        self.killers.ensure_capacity(depth.saturating_add(QUIESCENCE_DEPTH));
        self.killers.clear();
        self.started_at = Instant::now();
        self.timed_out = false;
    }

    fn time_exhausted(&self) -> bool {
        match self.config.time_budget {
            Some(budget) => self.started_at.elapsed() >= budget,
            None => false,
        }
    }

    /// Counts a node and reports whether the search must unwind.
    fn visit_node(&mut self) -> bool {
        self.stats.position_count += 1;
        if !self.timed_out && self.stats.position_count % TIME_CHECK_INTERVAL == 0 {
            self.timed_out = self.time_exhausted();
        }
        self.timed_out
    }
}

/// Applies a move, executes a closure with the new state, then undoes the move.
/// Handles turn toggling automatically.
fn with_move_applied<S, M, F, R>(game_move: &M, state: &mut S, f: F) -> Result<R, SearchError>
where
    S: GameState,
    M: GameMove<State = S>,
    F: FnOnce(&mut S) -> Result<R, SearchError>,
{
    game_move
        .apply(state)
        .expect("move application should succeed in search");
    state.toggle_turn();

    let result = f(state);

    game_move
        .undo(state)
        .expect("move undo should succeed in search");
    state.toggle_turn();

    result
}

/// Updates best score and move if new score is better.
/// Returns true if best_score was updated.
fn update_best<M: Clone>(
    score: i32,
    candidate_move: &M,
    maximizing_player: bool,
    best_score: &mut i32,
    best_move: &mut Option<M>,
) -> bool {
    let is_better = if maximizing_player {
        score > *best_score
    } else {
        score < *best_score
    };

    if is_better {
        *best_score = score;
        *best_move = Some(candidate_move.clone());
    }
    is_better
}

/// Depth reduction for the move at `index` in the ordered list, `depth` plies from the horizon.
fn late_move_reduction(index: usize, depth: u8) -> u8 {
    if index >= 10 && depth >= 7 {
        3
    } else if index >= 6 && depth >= 5 {
        2
    } else if index >= 3 && depth >= 3 {
        1
    } else {
        0
    }
}

/// Searches for the best move using alpha-beta pruning with iterative deepening.
///
/// This is the main entry point for the search algorithm. It performs iterative deepening,
/// searching at depths 1 through the target depth, and stops early when the time budget is
/// spent or a forced win for the side to move is found.
///
/// # Returns
///
/// - `Ok(best_move)` - The best move of the deepest completed iteration
/// - `Err(SearchError::DepthTooLow)` - If search depth is < 1
/// - `Err(SearchError::NoAvailableMoves)` - If no legal moves available
/// - `Err(SearchError::TimeExceeded)` - If not even the first iteration completed in time
///
/// # Examples
///
/// ```ignore
/// let mut context = SearchContext::with_time_budget(6, Duration::from_secs(3));
/// let best_move = alpha_beta_search(
///     &mut context,
///     &mut state,
///     &move_gen,
///     &evaluator,
///     &move_orderer,
/// )?;
/// ```
#[must_use = "search returns the best move found"]
pub fn alpha_beta_search<S, G, E, O>(
    context: &mut SearchContext<G::Move>,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    move_orderer: &O,
) -> Result<G::Move, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    G::Move: GameMove<State = S>,
    E: Evaluator<S>,
    O: MoveOrderer<S, G::Move>,
{
    debug!("alpha-beta search depth: {}", context.search_depth());
    let target_depth = context.search_depth();

    if target_depth < 1 {
        return Err(SearchError::DepthTooLow);
    }

    context.begin_search();
    let current_player_is_maximizing = state.is_maximizing_player();
    let mut candidates = move_generator.generate_moves(state);

    if candidates.is_empty() {
        return Err(SearchError::NoAvailableMoves);
    }

    let hash = state.position_hash();
    let mut best: Option<(G::Move, i32)> = None;

    for depth in 1..=target_depth {
        if context.time_exhausted() {
            debug!("time budget spent before depth {}", depth);
            break;
        }

        let pv_move = context.pv_table.get(hash);
        let killers = context.killers.get(0);
        move_orderer.order_moves(
            candidates.as_mut(),
            state,
            &OrderingHints {
                pv_move: pv_move.as_ref(),
                killers: &killers,
                ply: 0,
            },
        );

        // Aspiration window around the previous pass, unless that pass found a win
        let (window_alpha, window_beta) = match best {
            Some((_, score))
                if context.config.options.aspiration_window && !is_win_score(score) =>
            {
                (score - ASPIRATION_WINDOW, score + ASPIRATION_WINDOW)
            }
            _ => (-INFINITY, INFINITY),
        };

        let mut result = search_root(
            context,
            state,
            move_generator,
            evaluator,
            move_orderer,
            candidates.as_ref(),
            depth,
            current_player_is_maximizing,
            window_alpha,
            window_beta,
        )?;

        // If score falls outside aspiration window, re-search with full window
        let narrowed = window_alpha > -INFINITY || window_beta < INFINITY;
        if narrowed && !context.timed_out && (result.0 <= window_alpha || result.0 >= window_beta)
        {
            debug!(
                "aspiration re-search at depth {} (score {} outside [{}, {}])",
                depth, result.0, window_alpha, window_beta
            );
            context.stats.aspiration_researches += 1;
            result = search_root(
                context,
                state,
                move_generator,
                evaluator,
                move_orderer,
                candidates.as_ref(),
                depth,
                current_player_is_maximizing,
                -INFINITY,
                INFINITY,
            )?;
        }

        if context.timed_out {
            debug!("time budget spent during depth {}, keeping depth {}", depth, depth - 1);
            break;
        }

        let (score, move_found) = result;
        let move_found = match move_found {
            Some(mv) => mv,
            None => break,
        };

        context.pv_table.store(hash, move_found.clone());
        context
            .stats
            .record_result(score, depth, context.started_at.elapsed());
        debug!(
            "depth {} complete: score {}, nodes {}, elapsed {:?}",
            depth,
            score,
            context.stats.position_count,
            context.started_at.elapsed()
        );
        best = Some((move_found, score));

        let mover_wins = if current_player_is_maximizing {
            score >= WIN_SCORE - WIN_MARGIN
        } else {
            score <= -(WIN_SCORE - WIN_MARGIN)
        };
        if mover_wins {
            debug!("forced win found at depth {}", depth);
            break;
        }
    }

    best.map(|(mv, _)| mv).ok_or(SearchError::TimeExceeded)
}

#[allow(clippy::too_many_arguments)]
fn search_root<S, G, E, O>(
    context: &mut SearchContext<G::Move>,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    move_orderer: &O,
    candidates: &[G::Move],
    depth: u8,
    maximizing_player: bool,
    alpha: i32,
    beta: i32,
) -> Result<(i32, Option<G::Move>), SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    G::Move: GameMove<State = S>,
    E: Evaluator<S>,
    O: MoveOrderer<S, G::Move>,
{
    let mut best_score = if maximizing_player {
        -INFINITY - 1
    } else {
        INFINITY + 1
    };
    let mut best_move = None;
    let mut current_alpha = alpha;
    let mut current_beta = beta;

    for game_move in candidates.iter() {
        let mut wins_outright = false;
        let score = with_move_applied(game_move, state, |state| {
            if game_move.is_winning(state) {
                wins_outright = true;
                return Ok(win_score(maximizing_player, 0));
            }
            alpha_beta_minimax(
                context,
                state,
                move_generator,
                evaluator,
                move_orderer,
                depth - 1,
                1,
                current_alpha,
                current_beta,
                !maximizing_player,
            )
        })?;

        if context.timed_out {
            break;
        }

        update_best(
            score,
            game_move,
            maximizing_player,
            &mut best_score,
            &mut best_move,
        );
        if wins_outright {
            break;
        }

        if maximizing_player {
            current_alpha = max(current_alpha, score);
        } else {
            current_beta = min(current_beta, score);
        }
        if current_beta <= current_alpha {
            break;
        }
    }

    Ok((best_score, best_move))
}

/// Quiescence search to avoid the horizon effect.
///
/// Extends the search beyond the nominal depth by only considering tactical moves.
/// The static evaluation is the stand-pat score: the side to move may always decline
/// to continue the forcing sequence.
#[allow(clippy::too_many_arguments)]
fn quiescence_search<S, G, E, O>(
    context: &mut SearchContext<G::Move>,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    move_orderer: &O,
    mut alpha: i32,
    mut beta: i32,
    maximizing_player: bool,
    ply: u8,
    qdepth: u8,
) -> Result<i32, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    G::Move: GameMove<State = S>,
    E: Evaluator<S>,
    O: MoveOrderer<S, G::Move>,
{
    if context.visit_node() {
        return Ok(0);
    }
    context.stats.quiescence_nodes += 1;

    let stand_pat = evaluator.evaluate(state);
    if qdepth >= QUIESCENCE_DEPTH {
        return Ok(stand_pat);
    }

    if maximizing_player {
        if stand_pat >= beta {
            return Ok(stand_pat);
        }
        alpha = max(alpha, stand_pat);
    } else {
        if stand_pat <= alpha {
            return Ok(stand_pat);
        }
        beta = min(beta, stand_pat);
    }

    let candidates = move_generator.generate_moves(state);
    let mut tactical_moves: Vec<G::Move> = Vec::with_capacity(candidates.len());
    for game_move in candidates.as_ref().iter() {
        if game_move.is_tactical(state) {
            tactical_moves.push(game_move.clone());
        }
    }

    if tactical_moves.is_empty() {
        return Ok(stand_pat);
    }

    let killers = [None, None];
    move_orderer.order_moves(
        &mut tactical_moves,
        state,
        &OrderingHints {
            pv_move: None,
            killers: &killers,
            ply,
        },
    );

    let mut best_score = stand_pat;
    for game_move in tactical_moves.iter() {
        let score = with_move_applied(game_move, state, |state| {
            if game_move.is_winning(state) {
                return Ok(win_score(maximizing_player, ply));
            }
            quiescence_search(
                context,
                state,
                move_generator,
                evaluator,
                move_orderer,
                alpha,
                beta,
                !maximizing_player,
                ply + 1,
                qdepth + 1,
            )
        })?;

        if maximizing_player {
            best_score = max(best_score, score);
            alpha = max(alpha, score);
        } else {
            best_score = min(best_score, score);
            beta = min(beta, score);
        }
        if beta <= alpha {
            break;
        }
    }

    Ok(best_score)
}

/// Core alpha-beta minimax search with pruning.
///
/// Recursively searches the game tree using alpha-beta pruning. The [alpha, beta] window
/// represents the range of scores that matter - moves outside this window can be pruned.
///
/// # Parameters
///
/// - `depth` - Remaining search depth (decrements each ply)
/// - `ply` - Current distance from root (increments each ply, used for killer moves and win scores)
/// - `alpha` - Lower bound of search window
/// - `beta` - Upper bound of search window
/// - `maximizing_player` - True if current player wants to maximize score
///
/// # Returns
///
/// The score for this position. Scores at or below alpha are upper bounds and scores at or
/// above beta are lower bounds.
#[allow(clippy::too_many_arguments)]
fn alpha_beta_minimax<S, G, E, O>(
    context: &mut SearchContext<G::Move>,
    state: &mut S,
    move_generator: &G,
    evaluator: &E,
    move_orderer: &O,
    depth: u8,
    ply: u8,
    alpha: i32,
    beta: i32,
    maximizing_player: bool,
) -> Result<i32, SearchError>
where
    S: GameState,
    G: MoveGenerator<S>,
    G::Move: GameMove<State = S>,
    E: Evaluator<S>,
    O: MoveOrderer<S, G::Move>,
{
    if context.visit_node() {
        return Ok(0);
    }

    let hash = state.position_hash();

    context.stats.tt_lookups += 1;
    let (mut alpha, mut beta) = match context.transposition_table.lookup(hash, depth, alpha, beta)
    {
        TTLookup::Cutoff(score) => return Ok(score),
        TTLookup::Window(alpha, beta) => (alpha, beta),
    };

    if depth == 0 {
        if context.config.options.quiescence {
            let _span = phase_span!("quiescence");
            return quiescence_search(
                context,
                state,
                move_generator,
                evaluator,
                move_orderer,
                alpha,
                beta,
                maximizing_player,
                ply,
                0,
            );
        }
        return Ok(evaluator.evaluate(state));
    }

    let mut candidates = move_generator.generate_moves(state);
    if candidates.is_empty() {
        return Ok(evaluator.evaluate(state));
    }

    let pv_move = context.pv_table.get(hash);
    let killers = context.killers.get(ply);
    move_orderer.order_moves(
        candidates.as_mut(),
        state,
        &OrderingHints {
            pv_move: pv_move.as_ref(),
            killers: &killers,
            ply,
        },
    );

    let window_alpha = alpha;
    let window_beta = beta;
    let mut best_move = None;
    let mut best_score = if maximizing_player {
        -INFINITY - 1
    } else {
        INFINITY + 1
    };

    for (index, game_move) in candidates.as_ref().iter().enumerate() {
        let score = if index == 0 {
            // Search first move with full window
            with_move_applied(game_move, state, |state| {
                if game_move.is_winning(state) {
                    return Ok(win_score(maximizing_player, ply));
                }
                alpha_beta_minimax(
                    context,
                    state,
                    move_generator,
                    evaluator,
                    move_orderer,
                    depth - 1,
                    ply + 1,
                    alpha,
                    beta,
                    !maximizing_player,
                )
            })?
        } else {
            let mut reduction = if context.config.options.late_move_reductions {
                late_move_reduction(index, depth)
            } else {
                0
            };
            if reduction > 0 && game_move.is_tactical(state) {
                reduction = 0;
            }

            let (scout_alpha, scout_beta) = if maximizing_player {
                (alpha, alpha + 1)
            } else {
                (beta - 1, beta)
            };

            with_move_applied(game_move, state, |state| {
                if game_move.is_winning(state) {
                    return Ok(win_score(maximizing_player, ply));
                }

                let scout = alpha_beta_minimax(
                    context,
                    state,
                    move_generator,
                    evaluator,
                    move_orderer,
                    (depth - 1).saturating_sub(reduction),
                    ply + 1,
                    scout_alpha,
                    scout_beta,
                    !maximizing_player,
                )?;

                // Re-search in full when the scout beats the bound. A full-depth scout
                // that already fails past the far bound is a valid cutoff as is.
                let needs_research = if maximizing_player {
                    scout > alpha && (reduction > 0 || scout < beta)
                } else {
                    scout < beta && (reduction > 0 || scout > alpha)
                };
                if !needs_research {
                    return Ok(scout);
                }

                alpha_beta_minimax(
                    context,
                    state,
                    move_generator,
                    evaluator,
                    move_orderer,
                    depth - 1,
                    ply + 1,
                    alpha,
                    beta,
                    !maximizing_player,
                )
            })?
        };

        if context.timed_out {
            return Ok(0);
        }

        update_best(
            score,
            game_move,
            maximizing_player,
            &mut best_score,
            &mut best_move,
        );

        if maximizing_player {
            alpha = max(alpha, score);
        } else {
            beta = min(beta, score);
        }

        if beta <= alpha {
            context.stats.cutoffs += 1;
            context.killers.store(ply, game_move.clone());
            move_orderer.record_cutoff(game_move, state, depth);
            break;
        }
    }

    let bound_type = if best_score <= window_alpha {
        BoundType::Upper
    } else if best_score >= window_beta {
        BoundType::Lower
    } else {
        BoundType::Exact
    };

    context.stats.tt_stores += 1;
    context
        .transposition_table
        .store(hash, best_score, depth, bound_type);
    if let Some(best_move) = best_move {
        context.pv_table.store(hash, best_move);
    }

    Ok(best_score)
}
