//! Picks the engine's move: opening book, tactical shortcuts, then a timed
//! alpha-beta search with a cheap fallback.

use std::fmt;
use std::time::Instant;

use log::{debug, info};

use crate::alpha_beta_searcher::SearchContext;
use crate::board::player::Player;
use crate::board::pos::{Move, Pos, CENTER};
use crate::board::Board;
use crate::book::{Book, BookLine};
use crate::gomoku_search::{search_best_move, GomokuState};
use crate::pattern::PatternKind;

use super::difficulty::{adaptive_depth, Difficulty, DifficultyProfile};

/// Which step of the controller produced a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveSource {
    Book(BookLine),
    Win,
    Block,
    Vcf,
    VcfBlock,
    Vct,
    OpenFour,
    BlockOpenFour,
    DoubleFour,
    BlockDoubleFour,
    Critical,
    BlockCritical,
    WinningCombo,
    BlockWinningCombo,
    Search { depth: u8, score: Option<i32> },
    AliveThree,
    BlockAliveThree,
    BestCandidate,
}

impl fmt::Display for MoveSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MoveSource::Book(line) => write!(f, "book: {}", line),
            MoveSource::Win => write!(f, "immediate win"),
            MoveSource::Block => write!(f, "block five"),
            MoveSource::Vcf => write!(f, "VCF"),
            MoveSource::VcfBlock => write!(f, "block VCF"),
            MoveSource::Vct => write!(f, "VCT"),
            MoveSource::OpenFour => write!(f, "open four"),
            MoveSource::BlockOpenFour => write!(f, "block open four"),
            MoveSource::DoubleFour => write!(f, "double four"),
            MoveSource::BlockDoubleFour => write!(f, "block double four"),
            MoveSource::Critical => write!(f, "critical move"),
            MoveSource::BlockCritical => write!(f, "block critical move"),
            MoveSource::WinningCombo => write!(f, "winning combination"),
            MoveSource::BlockWinningCombo => write!(f, "block winning combination"),
            MoveSource::Search { depth, score } => match score {
                Some(score) => write!(f, "search depth {} score {}", depth, score),
                None => write!(f, "search depth {}", depth),
            },
            MoveSource::AliveThree => write!(f, "alive three"),
            MoveSource::BlockAliveThree => write!(f, "block alive three"),
            MoveSource::BestCandidate => write!(f, "best candidate"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Decision {
    pub pos: Pos,
    pub source: MoveSource,
}

impl Decision {
    fn new(pos: Pos, source: MoveSource) -> Self {
        Self { pos, source }
    }
}

/// Owns the search state that persists between the engine's turns. Caches and
/// tables are cleared at the start of every turn.
pub struct MoveController {
    state: GomokuState,
    context: SearchContext<Move>,
    book: Book,
}

impl Default for MoveController {
    fn default() -> Self {
        let profile = Difficulty::default().profile();
        Self {
            state: GomokuState::new(Board::new(), Player::Black),
            context: SearchContext::with_time_budget(profile.max_depth, profile.time_budget),
            book: Book::new(),
        }
    }
}

impl MoveController {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn search_context(&self) -> &SearchContext<Move> {
        &self.context
    }

    /// The move `player` should make on `board`, or `None` when the board is
    /// full.
    pub fn compute_move(
        &mut self,
        board: &Board,
        player: Player,
        difficulty: Difficulty,
    ) -> Option<Move> {
        self.decide(board, player, &difficulty.profile())
            .map(|decision| Move::new(decision.pos, player))
    }

    /// Like `compute_move`, with an explicit profile and the step that chose
    /// the move. The whole call stays within `profile.time_budget`: the
    /// forced-win scans may use the first half of it, the search whatever is
    /// left.
    pub fn decide(
        &mut self,
        board: &Board,
        player: Player,
        profile: &DifficultyProfile,
    ) -> Option<Decision> {
        if board.is_full() {
            return None;
        }

        let started = Instant::now();
        let scan_deadline = started + profile.time_budget / 2;
        self.state.set_position(board.clone(), player);
        self.state.clear_turn_caches();
        self.context.reset_stats();

        let decision = self
            .shortcut(player, profile, scan_deadline)
            .or_else(|| self.search(player, profile, started))
            .or_else(|| self.fallback(player))?;

        debug_assert_eq!(self.state.board().hash(), board.hash());
        debug_assert!(board.is_empty_at(decision.pos));
        info!("{} plays {} ({})", player, decision.pos, decision.source);
        Some(decision)
    }

    fn shortcut(
        &mut self,
        player: Player,
        profile: &DifficultyProfile,
        deadline: Instant,
    ) -> Option<Decision> {
        let _span = phase_span!("shortcut");
        let opponent = player.opposite();

        if let Some(pos) = self.state.threats().find_immediate_win(player) {
            return Some(Decision::new(pos, MoveSource::Win));
        }
        if let Some(pos) = self.state.threats().find_immediate_win(opponent) {
            return Some(Decision::new(pos, MoveSource::Block));
        }
        if let Some(reply) = self.book.lookup(self.state.board(), player) {
            if self.state.board().is_empty_at(reply.pos) {
                return Some(Decision::new(reply.pos, MoveSource::Book(reply.line)));
            }
        }
        if let Some(decision) = self.forced_win(player, profile, deadline) {
            return Some(decision);
        }

        if profile.shape_shortcuts {
            let checks = [
                (player, MoveSource::OpenFour),
                (opponent, MoveSource::BlockOpenFour),
            ];
            for &(side, source) in checks.iter() {
                if let Some(pos) = self
                    .state
                    .threats()
                    .find_pattern_move(side, PatternKind::OpenFour)
                {
                    return Some(Decision::new(pos, source));
                }
            }

            let checks = [
                (player, MoveSource::DoubleFour),
                (opponent, MoveSource::BlockDoubleFour),
            ];
            for &(side, source) in checks.iter() {
                if let Some(pos) = self.state.threats().find_double_four(side) {
                    return Some(Decision::new(pos, source));
                }
            }
        }

        if profile.critical_shortcut {
            let checks = [
                (player, MoveSource::Critical),
                (opponent, MoveSource::BlockCritical),
            ];
            for &(side, source) in checks.iter() {
                if let Some(pos) = self.state.threats().find_critical_move(side) {
                    return Some(Decision::new(pos, source));
                }
            }
        }

        if profile.combo_shortcut {
            let checks = [
                (player, MoveSource::WinningCombo),
                (opponent, MoveSource::BlockWinningCombo),
            ];
            for &(side, source) in checks.iter() {
                if let Some(pos) = self.state.threats().find_winning_combo(side) {
                    return Some(Decision::new(pos, source));
                }
            }
        }

        None
    }

    /// VCF, the hard tier's VCF block and VCT, all stopping at `deadline`.
    fn forced_win(
        &mut self,
        player: Player,
        profile: &DifficultyProfile,
        deadline: Instant,
    ) -> Option<Decision> {
        let opponent = player.opposite();
        let mut threats = self.state.threats().with_deadline(deadline);
        if let Some(pos) = threats.find_forced_win_vcf(player, profile.vcf_depth) {
            return Some(Decision::new(pos, MoveSource::Vcf));
        }
        if let Some(defense) = profile.vcf_defense {
            if let Some(pos) = threats.find_forced_win_vcf(opponent, defense.depth) {
                let still_lost = threats.with_stone(pos, player, |threats| {
                    threats
                        .find_forced_win_vcf(opponent, defense.safety_depth)
                        .is_some()
                });
                if !still_lost {
                    return Some(Decision::new(pos, MoveSource::VcfBlock));
                }
                debug!("blocking {} does not stop the opponent's fours", pos);
            }
        }
        if let Some(depth) = profile.vct_depth {
            if let Some(pos) = threats.find_forced_win_vct(player, depth) {
                return Some(Decision::new(pos, MoveSource::Vct));
            }
        }
        if threats.out_of_time() {
            debug!("forced-win scans stopped at the deadline");
        }
        None
    }

    fn search(
        &mut self,
        player: Player,
        profile: &DifficultyProfile,
        started: Instant,
    ) -> Option<Decision> {
        let _span = phase_span!("search");
        let stones = self.state.board().stone_count();
        let threats = self.state.threats().count_active_threats();
        let depth = adaptive_depth(profile.max_depth, stones, threats);
        let remaining = profile.time_budget.saturating_sub(started.elapsed());

        self.context.set_search_depth(depth);
        self.context.set_time_budget(Some(remaining));
        debug!(
            "searching for {} at depth {} ({} stones, {} threats, {:?} left)",
            player, depth, stones, threats, remaining
        );

        match search_best_move(&mut self.context, &mut self.state) {
            Ok(best) => Some(Decision::new(
                best.pos,
                MoveSource::Search {
                    depth: self.context.completed_depth(),
                    score: self.context.last_score(),
                },
            )),
            Err(error) => {
                debug!("search gave no move: {}", error);
                None
            }
        }
    }

    /// Single-ply choice for when no search pass completed.
    fn fallback(&mut self, player: Player) -> Option<Decision> {
        let _span = phase_span!("fallback");
        if self.state.board().is_empty() {
            return Some(Decision::new(CENTER, MoveSource::BestCandidate));
        }
        if let Some(pos) = self.state.threats().find_alive_three(player) {
            return Some(Decision::new(pos, MoveSource::AliveThree));
        }
        if let Some(pos) = self.state.threats().find_alive_three(player.opposite()) {
            return Some(Decision::new(pos, MoveSource::BlockAliveThree));
        }

        let (board, evaluator) = self.state.board_and_evaluator();
        let candidates: Vec<Pos> = board.neighborhood(2).collect();
        candidates
            .into_iter()
            .max_by_key(|&pos| evaluator.quick_score(board, pos, player))
            .or_else(|| board.empty_cells().next())
            .map(|pos| Decision::new(pos, MoveSource::BestCandidate))
    }
}

/// One-shot move computation with a fresh controller.
pub fn compute_move(board: &Board, player: Player, difficulty: Difficulty) -> Option<Move> {
    MoveController::new().compute_move(board, player, difficulty)
}
