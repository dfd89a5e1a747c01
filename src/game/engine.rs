use std::time::Duration;

use crate::board::error::BoardError;
use crate::board::player::Player;
use crate::board::pos::{Move, Pos};
use crate::board::Board;
use thiserror::Error;

use super::controller::{Decision, MoveController, MoveSource};
use super::difficulty::Difficulty;

/// Core engine state and configuration
#[derive(Clone)]
pub struct EngineConfig {
    pub difficulty: Difficulty,
    pub starting_position: Board,
    pub human_player: Player,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            starting_position: Board::default(),
            human_player: Player::Black,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEnding {
    Win { player: Player, line: [Pos; 5] },
    Draw,
}

/// Game state and runtime info
#[derive(Clone)]
pub struct GameState {
    board: Board,
    turn: Player,
    last_decision: Option<Decision>,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Board::default())
    }
}

impl GameState {
    fn new(starting_position: Board) -> Self {
        let turn = starting_position.next_player();
        Self {
            board: starting_position,
            turn,
            last_decision: None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum EngineError {
    #[error("Invalid move")]
    InvalidMove,
    #[error("The game is over")]
    GameOver,
    #[error("No move found, the board is full")]
    NoMoveFound,
    #[error("Board error: {error:?}")]
    BoardError { error: BoardError },
}

impl From<BoardError> for EngineError {
    fn from(error: BoardError) -> Self {
        EngineError::BoardError { error }
    }
}

/// A game session: the real board, whose turn it is and the engine that
/// answers the human.
pub struct Engine {
    state: GameState,
    starting_position: Board,
    difficulty: Difficulty,
    human_player: Player,
    controller: MoveController,
}

impl Default for Engine {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            state: GameState::new(config.starting_position.clone()),
            starting_position: config.starting_position,
            difficulty: config.difficulty,
            human_player: config.human_player,
            controller: MoveController::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.state.board
    }

    pub fn turn(&self) -> Player {
        self.state.turn
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn human_player(&self) -> Player {
        self.human_player
    }

    pub fn last_move(&self) -> Option<Move> {
        self.state.board.last_move()
    }

    /// Which step chose the engine's most recent move.
    pub fn last_move_source(&self) -> Option<MoveSource> {
        self.state.last_decision.map(|decision| decision.source)
    }

    /// A five on the board wins; a full board without one is a draw.
    pub fn check_game_over(&self) -> Option<GameEnding> {
        let board = &self.state.board;
        let from_last = board
            .last_move()
            .and_then(|mv| board.winning_line(mv.pos).map(|line| (mv.player, line)));
        // loaded positions may hold a five that is not the last move
        let win = from_last.or_else(|| {
            Pos::all().find_map(|pos| {
                let player = board.get(pos).player()?;
                board.winning_line(pos).map(|line| (player, line))
            })
        });

        match win {
            Some((player, line)) => Some(GameEnding::Win { player, line }),
            None if board.is_full() => Some(GameEnding::Draw),
            None => None,
        }
    }

    /// Places a stone for the side to move.
    pub fn make_move(&mut self, pos: Pos) -> Result<Move, EngineError> {
        if self.check_game_over().is_some() {
            return Err(EngineError::GameOver);
        }
        if !pos.is_valid() || !self.state.board.is_empty_at(pos) {
            return Err(EngineError::InvalidMove);
        }

        let mv = Move::new(pos, self.state.turn);
        self.apply_move(mv)?;
        Ok(mv)
    }

    /// The engine's choice for the side to move, without playing it.
    pub fn get_best_move(&mut self) -> Result<Move, EngineError> {
        if self.check_game_over().is_some() {
            return Err(EngineError::GameOver);
        }

        let turn = self.state.turn;
        let profile = self.difficulty.profile();
        let decision = self
            .controller
            .decide(&self.state.board, turn, &profile)
            .ok_or(EngineError::NoMoveFound)?;

        self.state.last_decision = Some(decision);
        Ok(Move::new(decision.pos, turn))
    }

    pub fn make_best_move(&mut self) -> Result<Move, EngineError> {
        let best_move = self.get_best_move()?;
        self.apply_move(best_move)?;
        Ok(best_move)
    }

    /// Takes back the last move. If that was the engine's reply, the human's
    /// move before it goes too, so the human is to move again.
    pub fn undo(&mut self) -> Result<Vec<Move>, EngineError> {
        let mut undone = vec![self.undo_one()?];

        if undone[0].player != self.human_player {
            if let Some(previous) = self.state.board.last_move() {
                if previous.player == self.human_player {
                    undone.push(self.undo_one()?);
                }
            }
        }
        Ok(undone)
    }

    /// Back to the configured starting position.
    pub fn restart(&mut self) {
        self.state = GameState::new(self.starting_position.clone());
    }

    pub fn get_search_stats(&self) -> SearchStats {
        let context = self.controller.search_context();
        SearchStats {
            positions_searched: context.searched_position_count(),
            quiescence_nodes: context.quiescence_nodes(),
            depth: context.completed_depth(),
            last_score: context.last_score(),
            last_search_duration: context.last_search_duration(),
            tt_hits: context.tt_hits(),
            cutoffs: context.cutoffs(),
            source: self.last_move_source(),
        }
    }

    fn apply_move(&mut self, mv: Move) -> Result<(), EngineError> {
        self.state.board.apply_move(mv)?;
        self.state.turn = mv.player.opposite();
        Ok(())
    }

    fn undo_one(&mut self) -> Result<Move, EngineError> {
        let mv = self.state.board.undo_move()?;
        self.state.turn = mv.player;
        self.state.last_decision = None;
        Ok(mv)
    }
}

/// Search performance statistics
#[derive(Debug, Clone)]
pub struct SearchStats {
    pub positions_searched: usize,
    pub quiescence_nodes: usize,
    pub depth: u8,
    pub last_score: Option<i32>,
    pub last_search_duration: Option<Duration>,
    pub tt_hits: usize,
    pub cutoffs: usize,
    pub source: Option<MoveSource>,
}

// Tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::pos::CENTER;
    use crate::gomoku_position;

    fn engine_with(starting_position: Board, difficulty: Difficulty) -> Engine {
        Engine::with_config(EngineConfig {
            difficulty,
            starting_position,
            human_player: Player::Black,
        })
    }

    #[test]
    fn test_center_reply_and_undo() {
        let mut engine = engine_with(Board::new(), Difficulty::Easy);

        engine.make_move(CENTER).unwrap();
        let reply = engine.make_best_move().unwrap();
        assert_eq!(reply.player, Player::White);
        assert_eq!(reply.pos.distance(CENTER), 1);
        assert_eq!(engine.turn(), Player::Black);

        // the engine's reply and the human's move go together
        let undone = engine.undo().unwrap();
        assert_eq!(undone.len(), 2);
        assert!(engine.board().is_empty());
        assert_eq!(engine.board().hash(), 0);
        assert_eq!(engine.turn(), Player::Black);
    }

    #[test]
    fn test_undo_single_human_move() {
        let mut engine = engine_with(Board::new(), Difficulty::Easy);
        engine.make_move(CENTER).unwrap();

        let undone = engine.undo().unwrap();
        assert_eq!(undone, vec![Move::new(CENTER, Player::Black)]);
        assert!(engine.board().is_empty());
        assert_eq!(
            engine.undo(),
            Err(EngineError::BoardError {
                error: BoardError::NothingToUndo
            })
        );
    }

    #[test]
    fn test_rejects_occupied_cell() {
        let mut engine = engine_with(Board::new(), Difficulty::Easy);
        engine.make_move(CENTER).unwrap();
        assert_eq!(engine.make_move(CENTER), Err(EngineError::InvalidMove));
        assert_eq!(engine.turn(), Player::White);
    }

    #[test]
    fn test_five_ends_the_game() {
        let mut engine = engine_with(
            Board::from_moves("d8 d1 e8 e1 f8 f1 g8 g1").unwrap(),
            Difficulty::Easy,
        );
        assert_eq!(engine.turn(), Player::Black);
        assert_eq!(engine.check_game_over(), None);

        let winning = engine.make_best_move().unwrap();
        assert_eq!(engine.last_move_source(), Some(MoveSource::Win));

        match engine.check_game_over() {
            Some(GameEnding::Win { player, line }) => {
                assert_eq!(player, Player::Black);
                assert!(line.contains(&winning.pos));
                assert!(line.iter().all(|&pos| pos.row == 7));
            }
            other => panic!("expected a win, got {:?}", other),
        }
        assert_eq!(engine.make_move(Pos::new(0, 0)), Err(EngineError::GameOver));
        assert_eq!(engine.get_best_move(), Err(EngineError::GameOver));
    }

    #[test]
    fn test_loaded_five_is_found() {
        let board = gomoku_position! {
            . . . . . . . . . . . . . . .
            . X . . . . . . . . . . . . .
            . . X . . . . . . . . . . . .
            . . . X . . . . . . . . . . .
            . . . . X . . . . . . . . . .
            . . . . . X . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . O O O O . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
            . . . . . . . . . . . . . . .
        };
        let engine = engine_with(board, Difficulty::Easy);
        assert_eq!(
            engine.check_game_over(),
            Some(GameEnding::Win {
                player: Player::Black,
                line: [
                    Pos::new(1, 1),
                    Pos::new(2, 2),
                    Pos::new(3, 3),
                    Pos::new(4, 4),
                    Pos::new(5, 5)
                ],
            })
        );
    }

    #[test]
    fn test_restart() {
        let start = Board::from_moves("h8 h9").unwrap();
        let mut engine = engine_with(start, Difficulty::Easy);
        engine.make_move(Pos::new(6, 6)).unwrap();
        engine.make_best_move().unwrap();

        engine.restart();

        assert_eq!(engine.board().stone_count(), 2);
        assert_eq!(engine.turn(), Player::Black);
        assert_eq!(engine.last_move_source(), None);
    }

    #[test]
    fn test_search_stats_report_the_source() {
        let mut engine = engine_with(Board::new(), Difficulty::Easy);
        engine.make_best_move().unwrap();
        let stats = engine.get_search_stats();
        assert!(matches!(stats.source, Some(MoveSource::Book(_))));
        assert_eq!(stats.positions_searched, 0);
    }
}
