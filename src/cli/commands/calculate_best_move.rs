//! Calculate best move command - determine the engine's move for a position.

use gomoku::board::player::Player;
use gomoku::board::Board;
use gomoku::game::difficulty::Difficulty;
use gomoku::game::MoveController;
use structopt::StructOpt;

use super::util::starting_position;
use super::Command;

#[derive(StructOpt)]
pub struct CalculateBestMoveArgs {
    #[structopt(short, long, default_value = "medium")]
    pub difficulty: Difficulty,
    #[structopt(long = "moves", conflicts_with = "position", help = "Move list, e.g. \"h8 h9 i9\"")]
    pub moves: Option<String>,
    #[structopt(long = "position", help = "15 rows of `.XO` separated by `/`")]
    pub position: Option<Board>,
    #[structopt(short, long, help = "Side to move (default: inferred from the stone count)")]
    pub player: Option<Player>,
}

impl Command for CalculateBestMoveArgs {
    fn execute(self) {
        let board = match self.position {
            Some(board) => board,
            None => match starting_position(self.moves.as_deref()) {
                Ok(board) => board,
                Err(error) => {
                    eprintln!("Invalid --moves: {}", error);
                    std::process::exit(1);
                }
            },
        };
        let player = self.player.unwrap_or_else(|| board.next_player());

        let mut controller = MoveController::new();
        let decision = match controller.decide(&board, player, &self.difficulty.profile()) {
            Some(decision) => decision,
            None => {
                eprintln!("There are no empty cells in the given position.");
                return;
            }
        };

        println!("{}", decision.pos);

        let context = controller.search_context();
        eprintln!("source:     {}", decision.source);
        eprintln!("depth:      {}", context.completed_depth());
        eprintln!("nodes:      {}", context.searched_position_count());
        eprintln!("quiescence: {}", context.quiescence_nodes());
        eprintln!(
            "tt:         {} lookups, {} hits, {} stores",
            context.tt_lookups(),
            context.tt_hits(),
            context.tt_stores()
        );
        eprintln!("cutoffs:    {}", context.cutoffs());
        eprintln!("re-searches: {}", context.aspiration_researches());
        if let Some(duration) = context.last_search_duration() {
            eprintln!("time:       {:?}", duration);
        }
    }
}
